//! `Link`: a directed connection between two endpoints.

use crate::topology::point::Endpoint;
use serde::{Deserialize, Serialize};

/// A directed pair of endpoints: using this link takes you from `from` to
/// `to`.
///
/// `from` is where the traversal originates (and is itself the arrival point
/// of some other link); `to` is the destination one arrives at. A link is
/// owned by exactly one [`Group`](crate::topology::group::Group).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    /// Departure endpoint.
    pub from: Endpoint,
    /// Arrival endpoint.
    pub to: Endpoint,
}

impl Link {
    /// Creates a new link.
    #[inline]
    pub const fn new(from: Endpoint, to: Endpoint) -> Self {
        Link { from, to }
    }
}
