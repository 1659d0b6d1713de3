//! `RegionId` and `Endpoint`: strong handles for places in the world graph
//!
//! An endpoint addresses a single spot one can arrive at or depart from: a
//! region identifier plus a slot index within that region. Identifiers are
//! plain values, never an enumeration baked into the algorithm, so worlds can
//! be supplied as data.
//!
//! This module provides:
//! - A transparent `RegionId` newtype around `u32`.
//! - `Endpoint` with structural equality and ordering (region, then slot).
//! - A canonical text form `"<region>:<slot>"` via `Display`, parsed back
//!   losslessly by `FromStr` (the slot defaults to 0 when omitted).
//! - String-based serde so fixtures stay compact and round-trip through the
//!   same canonical form.

use crate::shuffle_error::ShuffleError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier of a world region.
///
/// # Memory layout
/// `repr(transparent)` over `u32`; a `RegionId` is exactly its raw value.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct RegionId(u32);

impl RegionId {
    /// Creates a new `RegionId` from a raw `u32` value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        RegionId(raw)
    }

    /// Returns the inner `u32` value of this `RegionId`.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RegionId").field(&self.0).finish()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single addressable (region, slot) spot that can be a departure or an
/// arrival.
///
/// Equality and ordering are structural: region first, then slot. The value
/// is immutable once constructed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Endpoint {
    /// Region this endpoint belongs to.
    pub region: RegionId,
    /// Slot index within the region.
    pub slot: u32,
}

impl Endpoint {
    /// Creates a new endpoint.
    #[inline]
    pub const fn new(region: RegionId, slot: u32) -> Self {
        Endpoint { region, slot }
    }
}

/// Prints the canonical form, e.g. `Endpoint(2:7)`.
impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Endpoint({self})")
    }
}

/// Canonical text form: `"<region>:<slot>"`.
impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.region, self.slot)
    }
}

/// Parses the canonical form back losslessly.
///
/// The slot may be omitted (`"12"` parses as `12:0`). Non-numeric fields are
/// rejected; no escaping is defined, so identifiers must not contain `,`,
/// `=`, or `:`.
impl FromStr for Endpoint {
    type Err = ShuffleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ShuffleError::MalformedEndpoint(s.to_owned());
        let (region_raw, slot_raw) = match s.split_once(':') {
            Some((region, slot)) => (region, Some(slot)),
            None => (s, None),
        };
        let region = region_raw.parse::<u32>().map_err(|_| malformed())?;
        let slot = match slot_raw {
            Some(raw) => raw.parse::<u32>().map_err(|_| malformed())?,
            None => 0,
        };
        Ok(Endpoint::new(RegionId::new(region), slot))
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EndpointVisitor;

        impl Visitor<'_> for EndpointVisitor {
            type Value = Endpoint;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an endpoint string `<region>[:<slot>]`")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Endpoint, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(EndpointVisitor)
    }
}
