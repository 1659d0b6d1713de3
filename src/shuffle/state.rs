//! Per-invocation working indexes for the shuffler.
//!
//! Everything here is rebuilt from the static group set on each call; no
//! state survives between invocations. Collections that feed random
//! selection are input-ordered vectors so an identical seed and input order
//! reproduce an identical result; hash maps are used for lookups only.

use crate::map::TopologyMap;
use crate::shuffle::{ShuffleOutcome, ShuffleReport};
use crate::shuffle_error::ShuffleError;
use crate::topology::group::{Group, GroupClass, GroupId};
use crate::topology::link::Link;
use crate::topology::point::Endpoint;
use hashbrown::{HashMap, HashSet};
use rand::Rng;

/// Working indexes for one shuffle invocation.
#[derive(Debug)]
pub(crate) struct ShuffleState<'g> {
    groups: &'g [Group],
    group_idx: HashMap<GroupId, usize>,
    group_of_departure: HashMap<Endpoint, GroupId>,
    /// Unconnected multi-exit groups, input order.
    pub(crate) multi_exit: Vec<GroupId>,
    /// Unconnected single-exit groups, input order.
    pub(crate) single_exit: Vec<GroupId>,
    /// Unconnected hub groups; a subset of `multi_exit`.
    pub(crate) hubs: Vec<GroupId>,
    /// The mapping under construction; `None` marks an unresolved arrival.
    pub(crate) pending: HashMap<Endpoint, Option<Endpoint>>,
    /// Arrival endpoint back to the departure of the link that owns it.
    pub(crate) reverse_of: HashMap<Endpoint, Endpoint>,
    /// Arrivals with no assigned replacement yet.
    pub(crate) unresolved: Vec<Endpoint>,
    /// Links whose arrival is unresolved and whose group is in the core.
    pub(crate) frontier: Vec<Link>,
    absorbed: HashSet<GroupId>,
    pub(crate) report: ShuffleReport,
}

impl<'g> ShuffleState<'g> {
    /// Builds all indexes from scratch. Duplicate arrivals are dropped with
    /// a warning (first write wins); an empty group set is fatal.
    pub(crate) fn index(groups: &'g [Group], hub_threshold: usize) -> Result<Self, ShuffleError> {
        if groups.is_empty() {
            return Err(ShuffleError::NoGroupData);
        }

        let mut state = ShuffleState {
            groups,
            group_idx: HashMap::with_capacity(groups.len()),
            group_of_departure: HashMap::new(),
            multi_exit: Vec::new(),
            single_exit: Vec::new(),
            hubs: Vec::new(),
            pending: HashMap::new(),
            reverse_of: HashMap::new(),
            unresolved: Vec::new(),
            frontier: Vec::new(),
            absorbed: HashSet::new(),
            report: ShuffleReport::default(),
        };

        for (idx, group) in groups.iter().enumerate() {
            if state.group_idx.contains_key(&group.id) {
                log::warn!("duplicate group id {}; keeping the first occurrence", group.id);
                continue;
            }
            state.group_idx.insert(group.id, idx);

            match group.class(hub_threshold) {
                GroupClass::SingleExit => state.single_exit.push(group.id),
                GroupClass::MultiExit => state.multi_exit.push(group.id),
                GroupClass::Hub => {
                    state.multi_exit.push(group.id);
                    state.hubs.push(group.id);
                }
            }

            for link in &group.links {
                if state.pending.contains_key(&link.to) {
                    log::warn!("duplicate arrival {}; dropping the later link", link.to);
                    state.report.duplicate_arrivals += 1;
                    continue;
                }
                state.pending.insert(link.to, None);
                state.unresolved.push(link.to);
                state.reverse_of.insert(link.to, link.from);
                state.group_of_departure.entry(link.from).or_insert(group.id);
            }
        }

        Ok(state)
    }

    /// Group data by id. The returned reference outlives `&self`; it borrows
    /// the caller's group slice.
    pub(crate) fn group(&self, id: GroupId) -> Option<&'g Group> {
        let groups = self.groups;
        self.group_idx.get(&id).map(move |&idx| &groups[idx])
    }

    /// Group owning the link that departs from `point`.
    pub(crate) fn departure_group(&self, point: Endpoint) -> Option<GroupId> {
        self.group_of_departure.get(&point).copied()
    }

    /// True while `arrival` has no assigned replacement.
    pub(crate) fn is_unresolved(&self, arrival: Endpoint) -> bool {
        matches!(self.pending.get(&arrival), Some(None))
    }

    /// Removes `id` from every unconnected-group worklist.
    pub(crate) fn retire(&mut self, id: GroupId) {
        for set in [&mut self.multi_exit, &mut self.single_exit, &mut self.hubs] {
            if let Some(pos) = set.iter().position(|&g| g == id) {
                set.swap_remove(pos);
            }
        }
    }

    /// Marks `id` retired without absorbing it (used once its only link has
    /// been consumed directly).
    pub(crate) fn retire_permanently(&mut self, id: GroupId) {
        self.retire(id);
        self.absorbed.insert(id);
    }

    /// Absorbs a group into the connected core: retires it, contributes its
    /// unresolved links to the frontier, and follows `one_way_to` targets
    /// transitively. An explicit stack plus the absorbed set make
    /// termination on cyclic one-way graphs structural.
    pub(crate) fn absorb(&mut self, id: GroupId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if !self.absorbed.insert(id) {
                continue;
            }
            self.retire(id);
            let Some(group) = self.group(id) else {
                log::warn!("one-way target {id} has no group data");
                continue;
            };
            for &link in &group.links {
                if self.is_unresolved(link.to) && !self.frontier.contains(&link) {
                    self.frontier.push(link);
                }
            }
            stack.extend(group.one_way_to.iter().copied());
        }
    }

    /// Uniform random pick from the current frontier, or `None` when the
    /// core has no link left to connect from. The link stays in the
    /// frontier until a connection consumes it.
    pub(crate) fn random_frontier_link<R: Rng>(&self, rng: &mut R) -> Option<Link> {
        if self.frontier.is_empty() {
            return None;
        }
        Some(self.frontier[rng.gen_range(0..self.frontier.len())])
    }

    /// Removes a resolved arrival from the unresolved worklist.
    pub(crate) fn mark_resolved(&mut self, arrival: Endpoint) {
        if let Some(pos) = self.unresolved.iter().position(|&p| p == arrival) {
            self.unresolved.swap_remove(pos);
        } else {
            log::warn!("arrival {arrival} was not in the unresolved worklist");
        }
    }

    /// Drops a link from the frontier if it is still there.
    pub(crate) fn drop_from_frontier(&mut self, link: Link) {
        if let Some(pos) = self.frontier.iter().position(|&l| l == link) {
            self.frontier.swap_remove(pos);
        }
    }

    /// Freezes the pending mapping into the returned outcome. Unresolved
    /// arrivals stay absent from the map and are reported instead.
    pub(crate) fn finish(mut self) -> ShuffleOutcome {
        let mut unresolved: Vec<Endpoint> = self
            .pending
            .iter()
            .filter_map(|(&arrival, value)| value.is_none().then_some(arrival))
            .collect();
        unresolved.sort_unstable();
        if !unresolved.is_empty() {
            log::warn!("{} arrivals were left unresolved", unresolved.len());
        }

        let map = TopologyMap::from_entries(
            self.pending
                .iter()
                .filter_map(|(&arrival, &value)| value.map(|v| (arrival, v))),
        );
        self.report.unresolved = unresolved;
        ShuffleOutcome {
            map,
            report: self.report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::point::RegionId;

    fn ep(region: u32, slot: u32) -> Endpoint {
        Endpoint::new(RegionId::new(region), slot)
    }

    fn link(from: (u32, u32), to: (u32, u32)) -> Link {
        Link::new(ep(from.0, from.1), ep(to.0, to.1))
    }

    fn gid(raw: u32) -> GroupId {
        GroupId::new(raw)
    }

    #[test]
    fn empty_input_is_fatal() {
        assert_eq!(
            ShuffleState::index(&[], 10).unwrap_err(),
            ShuffleError::NoGroupData
        );
    }

    #[test]
    fn indexing_classifies_groups() {
        let groups = vec![
            Group::new(gid(0), vec![link((0, 0), (10, 0)), link((0, 1), (11, 0))]),
            Group::new(gid(1), vec![link((1, 0), (12, 0))]),
            Group::new(
                gid(2),
                (0..4).map(|i| link((2, i), (20 + i, 0))).collect(),
            ),
        ];
        let state = ShuffleState::index(&groups, 4).unwrap();
        assert_eq!(state.multi_exit, vec![gid(0), gid(2)]);
        assert_eq!(state.single_exit, vec![gid(1)]);
        assert_eq!(state.hubs, vec![gid(2)]);
        assert_eq!(state.unresolved.len(), 7);
        assert_eq!(state.departure_group(ep(1, 0)), Some(gid(1)));
        assert_eq!(state.departure_group(ep(9, 9)), None);
    }

    #[test]
    fn duplicate_arrival_is_dropped_first_write_wins() {
        let groups = vec![
            Group::new(gid(0), vec![link((0, 0), (10, 0)), link((0, 1), (11, 0))]),
            Group::new(gid(1), vec![link((1, 0), (10, 0))]),
        ];
        let state = ShuffleState::index(&groups, 10).unwrap();
        assert_eq!(state.report.duplicate_arrivals, 1);
        assert_eq!(state.unresolved.len(), 2);
        assert_eq!(state.reverse_of[&ep(10, 0)], ep(0, 0));
        // The dropped link contributed no departure index either.
        assert_eq!(state.departure_group(ep(1, 0)), None);
    }

    #[test]
    fn absorb_follows_one_way_chains_and_cycles() {
        let groups = vec![
            Group::new(gid(0), vec![link((0, 0), (10, 0)), link((0, 1), (11, 0))])
                .with_one_way(vec![gid(1)]),
            Group::new(gid(1), vec![link((1, 0), (12, 0)), link((1, 1), (13, 0))])
                .with_one_way(vec![gid(0), gid(2)]),
            Group::new(gid(2), vec![link((2, 0), (14, 0))]),
        ];
        let mut state = ShuffleState::index(&groups, 10).unwrap();
        state.absorb(gid(0));
        assert!(state.multi_exit.is_empty());
        assert!(state.single_exit.is_empty());
        assert_eq!(state.frontier.len(), 5);
    }

    #[test]
    fn absorb_skips_unknown_one_way_target() {
        let groups = vec![
            Group::new(gid(0), vec![link((0, 0), (10, 0))]).with_one_way(vec![gid(9)]),
        ];
        let mut state = ShuffleState::index(&groups, 10).unwrap();
        state.absorb(gid(0));
        assert_eq!(state.frontier.len(), 1);
    }

    #[test]
    fn finish_reports_unresolved_in_canonical_order() {
        let groups = vec![Group::new(
            gid(0),
            vec![link((0, 0), (11, 0)), link((0, 1), (10, 0))],
        )];
        let state = ShuffleState::index(&groups, 10).unwrap();
        let outcome = state.finish();
        assert!(outcome.map.is_empty());
        assert_eq!(outcome.report.unresolved, vec![ep(10, 0), ep(11, 0)]);
    }
}
