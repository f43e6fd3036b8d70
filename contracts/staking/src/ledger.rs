use soroban_sdk::{contracttype, log, symbol_short, Address, Env, Symbol};

use crate::{rewards, ContractError};

// ── Storage keys ────────────────────────────────────────────────────────────

const STATE: Symbol = symbol_short!("STATE");

// Per-staker persistent storage uses tuple keys: (prefix, staker_address)
const STAKER: Symbol = symbol_short!("STAKER");

// ── TTL constants ───────────────────────────────────────────────────────────

const DAY_IN_LEDGERS: u32 = 17_280;
const BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const BUMP_THRESHOLD: u32 = BUMP_AMOUNT - DAY_IN_LEDGERS;

// ── Types ───────────────────────────────────────────────────────────────────

/// Pool-wide accounting, one per contract instance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GlobalState {
    /// Principal allowed to change the rate and configure the token.
    pub owner: Address,
    /// Sum of every staker's `staked_amount`.
    pub total_staked: i128,
    /// Reward units emitted per tick across all stakers.
    pub reward_rate: i128,
    /// Cumulative reward per unit of stake, scaled by `rewards::PRECISION`.
    pub acc_reward_per_share: i128,
    /// Ledger sequence at which `acc_reward_per_share` was last advanced.
    pub last_sync_tick: u32,
}

/// A depositor's position. Created on first deposit and never removed.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StakerAccount {
    pub staked_amount: i128,
    /// `acc_reward_per_share` at this account's last settlement.
    pub reward_checkpoint: i128,
    /// Reward banked by settlement but not yet claimed.
    pub settled_pending: i128,
}

impl GlobalState {
    /// Index value a sync at `tick` would produce, without committing it.
    pub fn preview_index(&self, tick: u32) -> Result<i128, ContractError> {
        let elapsed = tick.saturating_sub(self.last_sync_tick);
        rewards::index_after(
            self.acc_reward_per_share,
            self.reward_rate,
            elapsed,
            self.total_staked,
        )
        .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Advance the index to `tick` at the rate currently in force.
    ///
    /// Must run before any change to `total_staked` or `reward_rate`.
    /// Calling it twice at the same tick leaves the index unchanged.
    pub fn sync(&mut self, env: &Env, tick: u32) -> Result<(), ContractError> {
        if tick <= self.last_sync_tick {
            return Ok(());
        }
        if self.total_staked == 0 && self.reward_rate > 0 {
            log!(
                env,
                "no stake, interval left unallocated",
                self.last_sync_tick,
                tick
            );
        }
        self.acc_reward_per_share = self.preview_index(tick)?;
        self.last_sync_tick = tick;
        Ok(())
    }

    pub fn add_stake(&mut self, amount: i128) -> Result<(), ContractError> {
        self.total_staked = self
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(())
    }

    pub fn remove_stake(&mut self, amount: i128) -> Result<(), ContractError> {
        self.total_staked = self
            .total_staked
            .checked_sub(amount)
            .filter(|total| *total >= 0)
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(())
    }
}

impl StakerAccount {
    /// Reward claimable if the index stood at `index`.
    pub fn pending_at(&self, index: i128) -> Result<i128, ContractError> {
        rewards::pending(
            self.staked_amount,
            index,
            self.reward_checkpoint,
            self.settled_pending,
        )
        .ok_or(ContractError::ArithmeticOverflow)
    }

    /// Bank everything earned since the last checkpoint and move the
    /// checkpoint to `index`.
    pub fn settle(&mut self, index: i128) -> Result<(), ContractError> {
        self.settled_pending = self.pending_at(index)?;
        self.reward_checkpoint = index;
        Ok(())
    }

    /// Take the whole settled balance, leaving zero behind.
    pub fn take_settled(&mut self) -> i128 {
        core::mem::take(&mut self.settled_pending)
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

/// Current tick: the ledger sequence number.
pub fn current_tick(env: &Env) -> u32 {
    env.ledger().sequence()
}

pub fn has_state(env: &Env) -> bool {
    env.storage().instance().has(&STATE)
}

pub fn load_state(env: &Env) -> Option<GlobalState> {
    env.storage().instance().get(&STATE)
}

pub fn store_state(env: &Env, state: &GlobalState) {
    env.storage().instance().set(&STATE, state);
    env.storage()
        .instance()
        .extend_ttl(BUMP_THRESHOLD, BUMP_AMOUNT);
}

fn staker_key(staker: &Address) -> (Symbol, Address) {
    (STAKER, staker.clone())
}

/// Load a staker's account, or an empty one if they never deposited.
///
/// Reading an existing account also extends its TTL, so an account that is
/// only ever queried stays live.
pub fn load_account(env: &Env, staker: &Address) -> StakerAccount {
    let key = staker_key(staker);
    match env.storage().persistent().get::<_, StakerAccount>(&key) {
        Some(account) => {
            env.storage()
                .persistent()
                .extend_ttl(&key, BUMP_THRESHOLD, BUMP_AMOUNT);
            account
        }
        None => StakerAccount::default(),
    }
}

pub fn store_account(env: &Env, staker: &Address, account: &StakerAccount) {
    let key = staker_key(staker);
    env.storage().persistent().set(&key, account);
    env.storage()
        .persistent()
        .extend_ttl(&key, BUMP_THRESHOLD, BUMP_AMOUNT);
}
