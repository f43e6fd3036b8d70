/// Fixed-point scaling factor for `acc_reward_per_share`.
///
/// Index values are stored multiplied by this constant so that sub-unit
/// reward per unit of stake survives integer arithmetic. 10^12 leaves ample
/// headroom in `i128` for token amounts up to 10^18 and rates of the same
/// order.
pub const PRECISION: i128 = 1_000_000_000_000;

// ── Reward index ────────────────────────────────────────────────────────────

/// Value of the reward index after `elapsed` ticks at `reward_rate`.
///
/// ```text
/// index' = index + reward_rate × elapsed × PRECISION / total_staked
/// ```
///
/// With nothing staked the index is returned unchanged: reward for that
/// interval is never allocated to anyone.
///
/// Returns `None` on overflow.
pub fn index_after(
    index: i128,
    reward_rate: i128,
    elapsed: u32,
    total_staked: i128,
) -> Option<i128> {
    if elapsed == 0 || total_staked <= 0 {
        return Some(index);
    }

    // Division last, so truncation happens once per sync.
    let delta = reward_rate
        .checked_mul(i128::from(elapsed))?
        .checked_mul(PRECISION)?
        .checked_div(total_staked)?;

    index.checked_add(delta)
}

// ── Settlement ──────────────────────────────────────────────────────────────

/// Reward earned by `staked` units between `checkpoint` and `index`.
///
/// ```text
/// owed = staked × (index − checkpoint) / PRECISION
/// ```
///
/// Truncates toward zero, so the ledger underpays by strictly less than one
/// reward unit per settlement and never overpays.
pub fn accrued(staked: i128, index: i128, checkpoint: i128) -> Option<i128> {
    staked
        .checked_mul(index.checked_sub(checkpoint)?)?
        .checked_div(PRECISION)
}

/// Total claimable reward: freshly accrued plus already settled.
pub fn pending(staked: i128, index: i128, checkpoint: i128, settled: i128) -> Option<i128> {
    settled.checked_add(accrued(staked, index, checkpoint)?)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure math, no Soroban environment.
