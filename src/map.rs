//! `TopologyMap`: the finished arrival-to-arrival rewiring.
//!
//! A key is an arrival endpoint from the original world; its value is the
//! new arrival reached when using the link that originally led to that key.
//! The map is created fresh by each shuffle and treated as immutable by all
//! consumers once returned.
//!
//! # Persisted format
//! One text line of comma-separated `key=value` entries, both sides in the
//! canonical `"<region>:<slot>"` endpoint form, e.g. `"0:1=2:3,2:3=0:1"`.
//!
//! # Limitations
//! - No escaping is defined; identifiers must not contain `,`, `=`, or `:`.
//! - An empty map encodes to an empty string. A corrupt string is rejected
//!   whole; there is no partial recovery.

use crate::shuffle_error::ShuffleError;
use crate::topology::point::Endpoint;
use itertools::Itertools;
use std::collections::BTreeMap;

/// Mapping from original arrival endpoints to their replacements.
///
/// Only fully resolved entries are present; arrivals the shuffler could not
/// resolve are reported in the
/// [`ShuffleReport`](crate::shuffle::ShuffleReport) and absent here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopologyMap {
    entries: BTreeMap<Endpoint, Endpoint>,
}

impl TopologyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from resolved `(original, replacement)` pairs.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Endpoint, Endpoint)>,
    {
        TopologyMap {
            entries: entries.into_iter().collect(),
        }
    }

    /// Looks up the replacement for an original arrival endpoint.
    ///
    /// `None` means the endpoint is not covered by this map and the caller
    /// should leave the connection unchanged.
    pub fn redirect(&self, original: Endpoint) -> Option<Endpoint> {
        self.entries.get(&original).copied()
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in canonical (key) order.
    pub fn iter(&self) -> impl Iterator<Item = (&Endpoint, &Endpoint)> {
        self.entries.iter()
    }

    /// Encodes the map as a single text line, entries in canonical key
    /// order. An empty map encodes to an empty string.
    pub fn encode(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .join(",")
    }

    /// Decodes a non-empty persisted line back into a map.
    ///
    /// Fails on a missing `=`, a non-numeric endpoint field, or a duplicate
    /// key; the whole string is rejected, nothing is recovered.
    pub fn decode(text: &str) -> Result<Self, ShuffleError> {
        let mut entries = BTreeMap::new();
        for raw in text.split(',') {
            let (key_raw, value_raw) = raw
                .split_once('=')
                .ok_or_else(|| ShuffleError::MalformedEntry(raw.to_owned()))?;
            let key: Endpoint = key_raw.parse()?;
            let value: Endpoint = value_raw.parse()?;
            if entries.insert(key, value).is_some() {
                return Err(ShuffleError::DuplicateMapKey(key));
            }
        }
        Ok(TopologyMap { entries })
    }

    /// Decodes an optionally-present persisted line.
    ///
    /// An absent or empty string yields an absent map (`None`), not an empty
    /// one.
    pub fn decode_opt(text: Option<&str>) -> Result<Option<Self>, ShuffleError> {
        match text {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => Self::decode(raw).map(Some),
        }
    }
}

impl<'a> IntoIterator for &'a TopologyMap {
    type Item = (&'a Endpoint, &'a Endpoint);
    type IntoIter = std::collections::btree_map::Iter<'a, Endpoint, Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::point::RegionId;

    fn ep(region: u32, slot: u32) -> Endpoint {
        Endpoint::new(RegionId::new(region), slot)
    }

    #[test]
    fn encode_decode_roundtrip() {
        let map = TopologyMap::from_entries([
            (ep(0, 1), ep(2, 3)),
            (ep(2, 3), ep(0, 1)),
            (ep(7, 0), ep(4, 2)),
        ]);
        let text = map.encode();
        assert_eq!(TopologyMap::decode(&text).unwrap(), map);
    }

    #[test]
    fn encode_is_canonical_key_order() {
        let map = TopologyMap::from_entries([(ep(2, 3), ep(0, 1)), (ep(0, 1), ep(2, 3))]);
        assert_eq!(map.encode(), "0:1=2:3,2:3=0:1");
    }

    #[test]
    fn empty_map_encodes_to_empty_string() {
        assert_eq!(TopologyMap::new().encode(), "");
    }

    #[test]
    fn decode_opt_absent_and_empty_are_absent() {
        assert_eq!(TopologyMap::decode_opt(None).unwrap(), None);
        assert_eq!(TopologyMap::decode_opt(Some("")).unwrap(), None);
        let decoded = TopologyMap::decode_opt(Some("0:1=2:3")).unwrap().unwrap();
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn decode_rejects_missing_separator() {
        let err = TopologyMap::decode("0:1").unwrap_err();
        assert_eq!(err, ShuffleError::MalformedEntry("0:1".to_owned()));
    }

    #[test]
    fn decode_rejects_bad_endpoint() {
        let err = TopologyMap::decode("0:1=x:3").unwrap_err();
        assert_eq!(err, ShuffleError::MalformedEndpoint("x:3".to_owned()));
    }

    #[test]
    fn decode_rejects_duplicate_key() {
        let err = TopologyMap::decode("0:1=2:3,0:1=4:5").unwrap_err();
        assert_eq!(err, ShuffleError::DuplicateMapKey(ep(0, 1)));
    }

    #[test]
    fn redirect_hit_and_miss() {
        let map = TopologyMap::from_entries([(ep(0, 1), ep(2, 3))]);
        assert_eq!(map.redirect(ep(0, 1)), Some(ep(2, 3)));
        assert_eq!(map.redirect(ep(9, 9)), None);
    }
}
