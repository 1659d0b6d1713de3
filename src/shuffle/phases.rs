//! The three ordered construction phases.
//!
//! Phase order is fixed: every multi-exit group is connected first (leaving
//! any hub unconnected could strand all groups behind it), then every
//! single-exit group is attached, then the remaining unresolved arrivals are
//! paired off. No phase is re-entered.

use crate::shuffle::ShuffleConfig;
use crate::shuffle::policy::{EarlyHubBias, HubAttachPolicy};
use crate::shuffle::state::ShuffleState;
use rand::Rng;

/// Connects every multi-exit group to the core.
pub(crate) fn connect_multi_exit<R: Rng>(
    state: &mut ShuffleState<'_>,
    cfg: &ShuffleConfig,
    rng: &mut R,
) {
    let mut bias = EarlyHubBias::roll(rng);
    let mut attach = HubAttachPolicy::new(cfg.hub_attach);

    while !state.multi_exit.is_empty() {
        let Some(source) = state.random_frontier_link(rng) else {
            log::warn!(
                "core frontier exhausted with {} multi-exit groups unconnected",
                state.multi_exit.len()
            );
            state.report.stranded_multi_exit = state.multi_exit.len();
            break;
        };

        let prefer_hub = bias.active() && !state.hubs.is_empty();
        let target = if prefer_hub {
            state.hubs[rng.gen_range(0..state.hubs.len())]
        } else {
            state.multi_exit[rng.gen_range(0..state.multi_exit.len())]
        };

        if state.connect_link_to_group(rng, source, target, cfg.avoid_vanilla) {
            state.absorb(target);
            if prefer_hub {
                bias.spend();
            }
            attach.try_fire(state, rng, target, cfg);
        } else {
            // Keep the phase terminating: an unconnectable target is retired
            // rather than re-drawn forever.
            state.retire(target);
        }
        bias.tick();
    }

    log::debug!(
        "unresolved arrivals after multi-exit pass: {}",
        state.unresolved.len()
    );
}

/// Attaches every single-exit group to the core. The target is retired
/// regardless of connection success.
pub(crate) fn attach_single_exit<R: Rng>(
    state: &mut ShuffleState<'_>,
    cfg: &ShuffleConfig,
    rng: &mut R,
) {
    while !state.single_exit.is_empty() {
        let Some(source) = state.random_frontier_link(rng) else {
            for id in &state.single_exit {
                log::warn!("no frontier link left to attach single-exit group {id}");
            }
            state.report.stranded_single_exit = state.single_exit.len();
            break;
        };

        let idx = rng.gen_range(0..state.single_exit.len());
        let target = state.single_exit.swap_remove(idx);
        state.connect_link_to_group(rng, source, target, cfg.avoid_vanilla);
    }

    log::debug!(
        "unresolved arrivals after single-exit pass: {}",
        state.unresolved.len()
    );
}

/// Pairs off the arrivals still unresolved after the first two phases.
///
/// These are typically extra exits of multi-exit groups: every hub has more
/// exits than the minimum needed to connect it once. Resolution is
/// best-effort; an arrival that finds no acceptable partner in one full scan
/// stays unresolved and is reported, never fatal.
pub(crate) fn pair_leftovers<R: Rng>(
    state: &mut ShuffleState<'_>,
    cfg: &ShuffleConfig,
    rng: &mut R,
) {
    while !state.unresolved.is_empty() {
        let idx = rng.gen_range(0..state.unresolved.len());
        let target = state.unresolved.swap_remove(idx);

        let Some(&target_src) = state.reverse_of.get(&target) else {
            log::warn!("arrival {target} has no matching departure; dropped unresolved");
            continue;
        };

        let remaining = state.unresolved.len();
        if remaining == 0 {
            log::warn!("no partner left for arrival {target}; dropped unresolved");
            continue;
        }

        // Accept a vanilla pairing only once a single point is left.
        let must_accept = remaining <= 1;
        let offset = rng.gen_range(0..remaining);
        let mut paired = false;
        for step in 0..remaining {
            let other = state.unresolved[(step + offset) % remaining];
            let Some(&other_src) = state.reverse_of.get(&other) else {
                log::warn!("arrival {other} has no matching departure; skipped");
                continue;
            };
            if cfg.avoid_vanilla && !must_accept && target == other_src {
                continue;
            }
            state.pending.insert(other, Some(target_src));
            state.pending.insert(target, Some(other_src));
            state.mark_resolved(other);
            paired = true;
            break;
        }
        if !paired {
            log::warn!("no acceptable partner for arrival {target}; dropped unresolved");
        }
    }
}
