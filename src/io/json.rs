//! JSON group-table reader and writer.
//!
//! # Format
//! A JSON array of group records:
//!
//! ```json
//! [
//!   {"id": 0, "links": [{"from": "0:1", "to": "2:3"}], "one_way_to": [4]}
//! ]
//! ```
//!
//! Endpoints use the canonical `"<region>:<slot>"` string form;
//! `one_way_to` may be omitted.

use crate::shuffle_error::ShuffleError;
use crate::topology::group::Group;
use std::io::{Read, Write};

/// Reads a group table from a JSON reader.
pub fn read_groups<R: Read>(reader: R) -> Result<Vec<Group>, ShuffleError> {
    serde_json::from_reader(reader).map_err(|e| ShuffleError::TableParse(e.to_string()))
}

/// Parses a group table from a JSON string.
pub fn groups_from_str(raw: &str) -> Result<Vec<Group>, ShuffleError> {
    serde_json::from_str(raw).map_err(|e| ShuffleError::TableParse(e.to_string()))
}

/// Writes a group table as pretty-printed JSON.
pub fn write_groups<W: Write>(writer: W, groups: &[Group]) -> Result<(), ShuffleError> {
    serde_json::to_writer_pretty(writer, groups).map_err(|e| ShuffleError::TableParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::group::GroupId;
    use crate::topology::link::Link;
    use crate::topology::point::{Endpoint, RegionId};

    #[test]
    fn table_roundtrip() {
        let groups = vec![
            Group::new(
                GroupId::new(0),
                vec![Link::new(
                    Endpoint::new(RegionId::new(0), 1),
                    Endpoint::new(RegionId::new(2), 3),
                )],
            )
            .with_one_way(vec![GroupId::new(4)]),
            Group::new(
                GroupId::new(4),
                vec![Link::new(
                    Endpoint::new(RegionId::new(4), 0),
                    Endpoint::new(RegionId::new(5), 0),
                )],
            ),
        ];
        let mut raw = Vec::new();
        write_groups(&mut raw, &groups).unwrap();
        let parsed = read_groups(raw.as_slice()).unwrap();
        assert_eq!(parsed, groups);
    }

    #[test]
    fn one_way_defaults_to_empty() {
        let parsed =
            groups_from_str(r#"[{"id": 7, "links": [{"from": "1:0", "to": "2:0"}]}]"#).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].one_way_to.is_empty());
    }

    #[test]
    fn malformed_table_is_rejected() {
        assert!(matches!(
            groups_from_str("[{\"id\": \"not-a-number\"}]"),
            Err(ShuffleError::TableParse(_))
        ));
    }
}
