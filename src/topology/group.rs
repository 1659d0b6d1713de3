//! `Group`: the unit of connectivity the shuffler reasons about.
//!
//! A group is a set of links that are mutually reachable from one another by
//! means outside this crate (walking, ladders, ...), plus an optional list of
//! other groups reachable through a one-directional openable passage. Groups
//! are classified at shuffle start; the classification is derived, never
//! stored.

use crate::topology::link::Link;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a group. Plain value; worlds supply these as data.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct GroupId(u32);

impl GroupId {
    /// Creates a new `GroupId` from a raw `u32` value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        GroupId(raw)
    }

    /// Returns the inner `u32` value of this `GroupId`.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("GroupId").field(&self.0).finish()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derived classification of a group, recomputed at the start of every
/// shuffle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GroupClass {
    /// Exactly one link and no one-way targets.
    SingleExit,
    /// More than one link, or at least one one-way target.
    MultiExit,
    /// Multi-exit with a link count at or above the configured hub
    /// threshold; preferentially connected early.
    Hub,
}

impl GroupClass {
    /// Hubs are multi-exit groups too.
    #[inline]
    pub const fn is_multi_exit(self) -> bool {
        matches!(self, GroupClass::MultiExit | GroupClass::Hub)
    }
}

/// A named set of mutually reachable links.
///
/// Invariant over the whole input set: every link's `to` endpoint is unique.
/// Violations are a data-integrity warning at indexing time (the later
/// occurrence is dropped), not a crash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Identifier, unique across the input set.
    pub id: GroupId,
    /// Ordered, non-empty list of links owned by this group.
    pub links: Vec<Link>,
    /// Groups reachable from here through a one-way openable passage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub one_way_to: Vec<GroupId>,
}

impl Group {
    /// Creates a group with no one-way targets.
    pub fn new(id: GroupId, links: Vec<Link>) -> Self {
        Group {
            id,
            links,
            one_way_to: Vec::new(),
        }
    }

    /// Adds one-way targets, builder style.
    #[must_use]
    pub fn with_one_way(mut self, targets: Vec<GroupId>) -> Self {
        self.one_way_to = targets;
        self
    }

    /// Classifies this group against `hub_threshold`.
    pub fn class(&self, hub_threshold: usize) -> GroupClass {
        if self.links.len() > 1 || !self.one_way_to.is_empty() {
            if self.links.len() >= hub_threshold {
                GroupClass::Hub
            } else {
                GroupClass::MultiExit
            }
        } else {
            GroupClass::SingleExit
        }
    }
}
