//! Accrual properties of the reward index.
//!
//! - pending reward is stable across repeated reads at one tick
//! - equal stakes over the same interval accrue equally
//! - a rate change only prices ticks after it
//! - `claim` pays exactly what `pending_rewards` reported

use proptest::prelude::*;
use staking::rewards;

use crate::support::Harness;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_pending_is_stable_between_mutations(
        amount in 1i128..=1_000_000i128,
        rate in 0i128..=10_000i128,
        ticks in 0u32..=500u32,
        reads in 2usize..=5usize,
    ) {
        let h = Harness::new(rate);
        let staker = h.staker(0);
        h.client.deposit(staker, &amount);
        h.advance(ticks);

        let first = h.client.pending_rewards(staker);
        for _ in 1..reads {
            prop_assert_eq!(h.client.pending_rewards(staker), first);
        }
        prop_assert_eq!(h.client.get_last_sync_tick(), crate::support::START);
    }

    #[test]
    fn prop_equal_stakes_accrue_equally(
        amount in 1i128..=1_000_000i128,
        other in 1i128..=1_000_000i128,
        rate in 0i128..=10_000i128,
        lead in 0u32..=50u32,
        ticks in 1u32..=200u32,
    ) {
        let h = Harness::new(rate);
        // A third staker joins earlier so the pool is not split evenly.
        h.client.deposit(h.staker(2), &other);
        h.advance(lead);

        h.client.deposit(h.staker(0), &amount);
        h.client.deposit(h.staker(1), &amount);
        let a0 = h.client.pending_rewards(h.staker(0));
        let b0 = h.client.pending_rewards(h.staker(1));

        h.advance(ticks);
        let a1 = h.client.pending_rewards(h.staker(0));
        let b1 = h.client.pending_rewards(h.staker(1));

        prop_assert_eq!(a1 - a0, b1 - b0);
    }

    #[test]
    fn prop_rate_change_is_not_retroactive(
        amount in 1i128..=1_000_000i128,
        old_rate in 0i128..=10_000i128,
        new_rate in 0i128..=10_000i128,
        before in 1u32..=200u32,
        after in 1u32..=200u32,
    ) {
        let h = Harness::new(old_rate);
        let staker = h.staker(0);
        h.client.deposit(staker, &amount);

        h.advance(before);
        let at_change = h.client.pending_rewards(staker);
        h.client.set_reward_rate(&h.owner, &new_rate);
        prop_assert_eq!(h.client.pending_rewards(staker), at_change);

        h.advance(after);
        let index = rewards::index_after(0, old_rate, before, amount)
            .and_then(|i| rewards::index_after(i, new_rate, after, amount))
            .unwrap();
        let expected = rewards::accrued(amount, index, 0).unwrap();
        prop_assert_eq!(h.client.pending_rewards(staker), expected);
    }

    #[test]
    fn prop_claim_pays_reported_pending(
        amount in 1i128..=1_000_000i128,
        rate in 1i128..=10_000i128,
        ticks in 1u32..=500u32,
    ) {
        let h = Harness::new(rate);
        let staker = h.staker(0);
        h.client.deposit(staker, &amount);
        h.advance(ticks);

        let pending = h.client.pending_rewards(staker);
        prop_assume!(pending > 0);
        prop_assert_eq!(h.client.claim(staker), pending);
        prop_assert_eq!(h.client.pending_rewards(staker), 0);
    }
}
