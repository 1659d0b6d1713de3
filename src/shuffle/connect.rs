//! The shared connect primitive: wiring one core link to one group.
//!
//! A connection scans the destination group's links in a randomly rotated
//! order for one whose arrival is still unresolved, then installs both
//! directions of the new pairing atomically. Under the no-vanilla-repeat
//! policy the first attempt refuses to reconstruct the original pairing;
//! the bounded second attempt accepts it rather than fail the connection.

use crate::shuffle::state::ShuffleState;
use crate::topology::group::{Group, GroupId};
use crate::topology::link::Link;
use crate::topology::point::Endpoint;
use rand::Rng;

/// Explicit state for the bounded connection retry.
///
/// The first attempt must not accept a vanilla pairing; the escape attempt
/// must. There is no third attempt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Attempt {
    index: u8,
}

impl Attempt {
    /// Initial attempt: vanilla pairings are rejected.
    pub(crate) const fn first() -> Self {
        Attempt { index: 0 }
    }

    /// True once the policy must accept any available destination.
    pub(crate) const fn must_accept(self) -> bool {
        self.index > 0
    }

    /// Transition to the escape attempt, or `None` when already there.
    pub(crate) const fn escalate(self) -> Option<Self> {
        if self.index == 0 {
            Some(Attempt { index: 1 })
        } else {
            None
        }
    }
}

impl<'g> ShuffleState<'g> {
    /// Scans `group`'s links in rotated order for the first one whose
    /// arrival is unresolved, skipping any whose departure matches
    /// `forbidden_from`.
    fn pick_available_link<R: Rng>(
        &self,
        rng: &mut R,
        group: &Group,
        forbidden_from: Option<Endpoint>,
    ) -> Option<Link> {
        if group.links.is_empty() {
            return None;
        }
        let offset = rng.gen_range(0..group.links.len());
        group
            .links
            .iter()
            .cycle()
            .skip(offset)
            .take(group.links.len())
            .copied()
            .find(|link| self.is_unresolved(link.to) && Some(link.from) != forbidden_from)
    }

    /// Installs both directions of a new pairing atomically and takes both
    /// links out of circulation.
    fn install_pair(&mut self, source: Link, dest: Link) {
        self.pending.insert(source.to, Some(dest.from));
        self.pending.insert(dest.to, Some(source.from));
        self.mark_resolved(source.to);
        self.mark_resolved(dest.to);
        self.drop_from_frontier(source);
        self.drop_from_frontier(dest);
    }

    /// Connects `source` to some available link of group `dest_id`.
    ///
    /// Returns false (after logging and counting the failure) when the
    /// destination group has no available arrival at all; the attempt is
    /// abandoned and the caller decides how to proceed.
    pub(crate) fn connect_link_to_group<R: Rng>(
        &mut self,
        rng: &mut R,
        source: Link,
        dest_id: GroupId,
        avoid_vanilla: bool,
    ) -> bool {
        let Some(dest_group) = self.group(dest_id) else {
            log::warn!("cannot connect to unknown group {dest_id}");
            self.report.failed_connections += 1;
            return false;
        };

        let mut attempt = Attempt::first();
        loop {
            let forbidden = (avoid_vanilla && !attempt.must_accept()).then_some(source.to);
            if let Some(dest) = self.pick_available_link(rng, dest_group, forbidden) {
                self.install_pair(source, dest);
                return true;
            }
            match attempt.escalate() {
                Some(next) => attempt = next,
                None => break,
            }
        }

        log::warn!("no available exit on group {dest_id} for source {}", source.to);
        self.report.failed_connections += 1;
        false
    }
}
