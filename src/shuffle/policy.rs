//! Connection policies for the multi-exit pass.
//!
//! Both policies are isolated behind small objects with explicit spent/fired
//! flags so they can be disabled or replaced without touching the phase
//! logic.

use crate::shuffle::state::ShuffleState;
use crate::shuffle::{HubAttach, ShuffleConfig};
use crate::topology::group::GroupId;
use rand::Rng;

/// Countdown bias that front-loads one hub-to-hub connection early in the
/// multi-exit pass, controlling topological sprawl.
///
/// The countdown is rolled once per shuffle as a uniform integer in `[1, 2]`
/// and ticks down every iteration; the preference becomes active when it
/// reaches zero and is spent by its first successful use.
#[derive(Debug)]
pub(crate) struct EarlyHubBias {
    countdown: i32,
    spent: bool,
}

impl EarlyHubBias {
    pub(crate) fn roll<R: Rng>(rng: &mut R) -> Self {
        EarlyHubBias {
            countdown: rng.gen_range(1..3),
            spent: false,
        }
    }

    /// True while the phase should prefer a hub target.
    pub(crate) fn active(&self) -> bool {
        !self.spent && self.countdown <= 0
    }

    pub(crate) fn tick(&mut self) {
        self.countdown -= 1;
    }

    pub(crate) fn spend(&mut self) {
        self.spent = true;
    }
}

/// One-shot rule attaching the configured auxiliary single-exit group to the
/// first hub-sized target that connects.
///
/// The rule is spent the first time an eligible target connects, even when
/// the auxiliary group has already been consumed by then.
#[derive(Debug)]
pub(crate) struct HubAttachPolicy {
    rule: Option<HubAttach>,
    fired: bool,
}

impl HubAttachPolicy {
    pub(crate) fn new(rule: Option<HubAttach>) -> Self {
        HubAttachPolicy { rule, fired: false }
    }

    /// Fires on `target` if it is the first hub-sized, non-exempt group to
    /// connect. Does nothing once fired or when unconfigured.
    pub(crate) fn try_fire<R: Rng>(
        &mut self,
        state: &mut ShuffleState<'_>,
        rng: &mut R,
        target: GroupId,
        cfg: &ShuffleConfig,
    ) {
        if self.fired {
            return;
        }
        let Some(rule) = self.rule else {
            return;
        };
        let Some(target_group) = state.group(target) else {
            return;
        };
        if target_group.links.len() < cfg.hub_threshold || target == rule.exempt {
            return;
        }
        self.fired = true;

        if !state.single_exit.contains(&rule.auxiliary) {
            return;
        }
        let Some(aux_group) = state.group(rule.auxiliary) else {
            log::warn!("auxiliary group {} has no group data", rule.auxiliary);
            return;
        };
        let Some(&aux_link) = aux_group.links.first() else {
            log::warn!("auxiliary group {} has no links", rule.auxiliary);
            return;
        };
        log::debug!("attaching auxiliary group {} to hub {target}", rule.auxiliary);
        state.connect_link_to_group(rng, aux_link, target, cfg.avoid_vanilla);
        state.retire_permanently(rule.auxiliary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::group::{Group, GroupId};
    use crate::topology::link::Link;
    use crate::topology::point::{Endpoint, RegionId};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn link(from: (u32, u32), to: (u32, u32)) -> Link {
        Link::new(
            Endpoint::new(RegionId::new(from.0), from.1),
            Endpoint::new(RegionId::new(to.0), to.1),
        )
    }

    fn fixture() -> Vec<Group> {
        let hub = Group::new(
            GroupId::new(0),
            (0..3).map(|i| link((0, i), (10 + i, 0))).collect(),
        );
        let aux = Group::new(GroupId::new(1), vec![link((1, 0), (20, 0))]);
        vec![hub, aux]
    }

    #[test]
    fn bias_counts_down_and_spends_once() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut bias = EarlyHubBias::roll(&mut rng);
        assert!(!bias.active());
        // A roll is 1 or 2; after two ticks the bias must be active.
        bias.tick();
        bias.tick();
        assert!(bias.active());
        bias.spend();
        assert!(!bias.active());
        bias.tick();
        assert!(!bias.active());
    }

    #[test]
    fn unconfigured_attach_policy_does_nothing() {
        let groups = fixture();
        let cfg = ShuffleConfig {
            hub_threshold: 3,
            ..ShuffleConfig::default()
        };
        let mut state = ShuffleState::index(&groups, cfg.hub_threshold).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut policy = HubAttachPolicy::new(None);
        policy.try_fire(&mut state, &mut rng, GroupId::new(0), &cfg);
        assert!(!policy.fired);
        assert!(state.is_unresolved(Endpoint::new(RegionId::new(20), 0)));
    }

    #[test]
    fn attach_policy_fires_once_and_wires_the_auxiliary() {
        let groups = fixture();
        let cfg = ShuffleConfig {
            hub_threshold: 3,
            hub_attach: Some(HubAttach {
                auxiliary: GroupId::new(1),
                exempt: GroupId::new(9),
            }),
            ..ShuffleConfig::default()
        };
        let mut state = ShuffleState::index(&groups, cfg.hub_threshold).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut policy = HubAttachPolicy::new(cfg.hub_attach);
        policy.try_fire(&mut state, &mut rng, GroupId::new(0), &cfg);
        assert!(policy.fired);
        // The auxiliary arrival got a replacement inside the hub.
        assert!(!state.is_unresolved(Endpoint::new(RegionId::new(20), 0)));
        assert!(!state.single_exit.contains(&GroupId::new(1)));
        // A second eligible target does not re-fire the rule.
        policy.try_fire(&mut state, &mut rng, GroupId::new(0), &cfg);
        assert!(policy.fired);
    }

    #[test]
    fn exempt_target_does_not_spend_the_rule() {
        let groups = fixture();
        let cfg = ShuffleConfig {
            hub_threshold: 3,
            hub_attach: Some(HubAttach {
                auxiliary: GroupId::new(1),
                exempt: GroupId::new(0),
            }),
            ..ShuffleConfig::default()
        };
        let mut state = ShuffleState::index(&groups, cfg.hub_threshold).unwrap();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut policy = HubAttachPolicy::new(cfg.hub_attach);
        policy.try_fire(&mut state, &mut rng, GroupId::new(0), &cfg);
        assert!(!policy.fired);
        assert!(state.is_unresolved(Endpoint::new(RegionId::new(20), 0)));
    }
}
