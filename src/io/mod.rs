//! External data formats for world fixtures.
//!
//! The group table that describes a world is injected data, not code; this
//! module reads and writes it. The persisted form of a finished
//! [`TopologyMap`](crate::map::TopologyMap) is its own compact text line and
//! lives with the type.

pub mod json;

pub use json::{groups_from_str, read_groups, write_groups};
