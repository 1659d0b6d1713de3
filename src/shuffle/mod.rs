//! Reachability-preserving topology shuffling.
//!
//! [`shuffle`] consumes a static description of groups and a start endpoint
//! and produces a new mapping between arrival endpoints that keeps every
//! group reachable from the start. Construction runs in three ordered
//! phases: connect every multi-exit group, attach every single-exit group,
//! then pair whatever arrivals remain. No phase is re-entered, and the
//! terminal state always yields whatever mapping was built, even when some
//! arrivals are left unresolved.
//!
//! All randomized decisions use a `SmallRng` seeded from
//! [`ShuffleConfig::rng_seed`] so runs are reproducible for an identical
//! seed and identical input ordering; [`shuffle_with_rng`] accepts any
//! caller-supplied generator instead.

mod connect;
mod phases;
mod policy;
mod state;

use crate::map::TopologyMap;
use crate::shuffle_error::ShuffleError;
use crate::topology::group::{Group, GroupId};
use crate::topology::point::Endpoint;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use state::ShuffleState;

/// Tuning knobs for one shuffle invocation.
#[derive(Debug, Clone)]
pub struct ShuffleConfig {
    /// Link count at which a multi-exit group counts as a hub and is
    /// preferentially connected early.
    pub hub_threshold: usize,
    /// When true, avoid reconnecting a link to its original destination.
    /// Best-effort: a bounded retry accepts the original pairing when it is
    /// the last candidate left.
    pub avoid_vanilla: bool,
    /// Optional one-time rule attaching a designated auxiliary group to the
    /// first hub-sized target that connects. Disabled when `None`.
    pub hub_attach: Option<HubAttach>,
    /// Seed for the internal `SmallRng` used by [`shuffle`].
    pub rng_seed: u64,
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            hub_threshold: 10,
            avoid_vanilla: true,
            hub_attach: None,
            rng_seed: 42,
        }
    }
}

/// Configuration for the one-time hub-attach rule.
///
/// The first time a connected target's link count meets the hub threshold,
/// the `auxiliary` single-exit group is attached directly to that target and
/// retired from all further processing, guaranteeing one otherwise
/// peripheral area is never isolated. `exempt` names the primordial hub
/// that must not trigger the rule. The rule fires at most once per shuffle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HubAttach {
    /// Single-exit group to force-attach.
    pub auxiliary: GroupId,
    /// Hub-sized group that does not trigger the rule.
    pub exempt: GroupId,
}

/// Aggregated warnings from one shuffle invocation.
///
/// Everything here was already logged at `warn` level; callers should treat
/// a map with a non-empty [`unresolved`](Self::unresolved) list as usable
/// but imperfect and surface the count in diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuffleReport {
    /// Arrival endpoints that appeared in more than one link; the later
    /// occurrence was dropped.
    pub duplicate_arrivals: usize,
    /// Multi-exit groups left unconnected when the core frontier ran out.
    pub stranded_multi_exit: usize,
    /// Single-exit groups left unconnected when the core frontier ran out.
    pub stranded_single_exit: usize,
    /// Connection attempts abandoned because the destination group had no
    /// available arrival.
    pub failed_connections: usize,
    /// Arrival endpoints with no replacement at the end of the leftover
    /// pass, in canonical order. Absent from the returned map.
    pub unresolved: Vec<Endpoint>,
}

impl ShuffleReport {
    /// True when the invocation produced a fully resolved map with no data
    /// or construction warnings.
    pub fn is_clean(&self) -> bool {
        self.duplicate_arrivals == 0
            && self.stranded_multi_exit == 0
            && self.stranded_single_exit == 0
            && self.failed_connections == 0
            && self.unresolved.is_empty()
    }
}

/// A finished shuffle: the frozen map plus its construction report.
#[derive(Debug, Clone)]
pub struct ShuffleOutcome {
    /// The arrival-to-arrival rewiring.
    pub map: TopologyMap,
    /// Aggregated warnings from construction.
    pub report: ShuffleReport,
}

/// Shuffles `groups` from `start`, seeding a `SmallRng` from
/// `cfg.rng_seed`.
///
/// Fatal only when the group set is empty or the start endpoint is not the
/// departure of any indexed link; every other problem is logged, counted in
/// the report, and recovered locally.
pub fn shuffle(
    groups: &[Group],
    start: Endpoint,
    cfg: &ShuffleConfig,
) -> Result<ShuffleOutcome, ShuffleError> {
    let mut rng = SmallRng::seed_from_u64(cfg.rng_seed);
    shuffle_with_rng(groups, start, cfg, &mut rng)
}

/// [`shuffle`] with a caller-supplied random generator.
pub fn shuffle_with_rng<R: Rng>(
    groups: &[Group],
    start: Endpoint,
    cfg: &ShuffleConfig,
    rng: &mut R,
) -> Result<ShuffleOutcome, ShuffleError> {
    let mut state = ShuffleState::index(groups, cfg.hub_threshold)?;
    let start_group = state
        .departure_group(start)
        .ok_or(ShuffleError::StartGroupNotFound(start))?;

    log::debug!(
        "unresolved arrivals before shuffling: {}",
        state.unresolved.len()
    );
    state.absorb(start_group);

    phases::connect_multi_exit(&mut state, cfg, rng);
    phases::attach_single_exit(&mut state, cfg, rng);
    phases::pair_leftovers(&mut state, cfg, rng);

    Ok(state.finish())
}
