#![no_std]

pub mod events;
pub mod ledger;
pub mod rewards;
pub mod treasury;

use common::entry_guard;
use soroban_sdk::{contract, contractimpl, contracttype, log, symbol_short, Address, Env, Symbol};

use ledger::GlobalState;

// ── Storage key constants ────────────────────────────────────────────────────

const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientStake = 5,
    NothingToClaim = 6,
    ReentrantCall = 7,
    TransferFailed = 8,
    TokenNotConfigured = 9,
    TokenAlreadyConfigured = 10,
    ArithmeticOverflow = 11,
    NoPendingOwner = 12,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Snapshot of a staker's position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub staked: i128,
    pub pending_rewards: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the ledger.
    ///
    /// * `owner`       – principal allowed to set the rate and configure the token.
    /// * `reward_rate` – reward units emitted **per ledger** across all stakers.
    ///
    /// Accrual starts at the current ledger sequence.
    pub fn initialize(env: Env, owner: Address, reward_rate: i128) -> Result<(), ContractError> {
        if ledger::has_state(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_rate < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let state = GlobalState {
            owner: owner.clone(),
            total_staked: 0,
            reward_rate,
            acc_reward_per_share: 0,
            last_sync_tick: ledger::current_tick(&env),
        };
        ledger::store_state(&env, &state);

        events::publish_initialized(&env, owner, reward_rate);

        Ok(())
    }

    /// Point the ledger at the token used for both stake and rewards.
    ///
    /// Setup-time only: the token cannot be swapped once configured, since
    /// recorded stakes are denominated in it.
    pub fn configure_token(
        env: Env,
        caller: Address,
        token: Address,
        decimals: u32,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        with_entry_guard(&env, || {
            let state = Self::load_state(&env)?;
            Self::require_owner(&state, &caller)?;

            if treasury::is_configured(&env) {
                return Err(ContractError::TokenAlreadyConfigured);
            }
            if decimals > treasury::MAX_DECIMALS {
                return Err(ContractError::InvalidAmount);
            }

            treasury::configure(&env, &token, decimals);
            events::publish_token_configured(&env, token.clone(), decimals);
            Ok(())
        })
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` tokens as stake.
    ///
    /// The index is synced and the staker settled before the balance grows,
    /// so the new tokens earn nothing for the interval already elapsed. The
    /// tokens are pulled with `transfer_from`, so the staker must have
    /// approved this contract for at least `amount` beforehand.
    pub fn deposit(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();
        with_entry_guard(&env, || {
            if amount <= 0 {
                return Err(ContractError::InvalidAmount);
            }
            let mut state = Self::load_state(&env)?;
            let token = treasury::token(&env)?;

            // 1. Sync the index and settle the staker.
            let mut account = ledger::load_account(&env, &staker);
            state.sync(&env, ledger::current_tick(&env))?;
            account.settle(state.acc_reward_per_share)?;

            // 2. Grow the staker's balance and the pool total.
            account.staked_amount = account
                .staked_amount
                .checked_add(amount)
                .ok_or(ContractError::ArithmeticOverflow)?;
            state.add_stake(amount)?;

            ledger::store_state(&env, &state);
            ledger::store_account(&env, &staker, &account);
            events::publish_stake(&env, staker.clone(), amount, state.total_staked);

            // 3. Pull the tokens last.
            treasury::pull(&env, &token, &staker, amount)
        })
    }

    /// Return `amount` of the staker's principal.
    ///
    /// Settled reward stays on the account; it is paid only by `claim`.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();
        with_entry_guard(&env, || {
            if amount <= 0 {
                return Err(ContractError::InvalidAmount);
            }
            let mut state = Self::load_state(&env)?;
            let token = treasury::token(&env)?;

            let mut account = ledger::load_account(&env, &staker);
            if amount > account.staked_amount {
                return Err(ContractError::InsufficientStake);
            }

            // 1. Sync the index and settle the staker.
            state.sync(&env, ledger::current_tick(&env))?;
            account.settle(state.acc_reward_per_share)?;

            // 2. Shrink the staker's balance and the pool total.
            account.staked_amount -= amount;
            state.remove_stake(amount)?;

            ledger::store_state(&env, &state);
            ledger::store_account(&env, &staker, &account);
            events::publish_withdraw(&env, staker.clone(), amount, state.total_staked);

            // 3. Send the principal back last.
            treasury::push(&env, &token, &staker, amount)
        })
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything the staker has earned up to the current ledger.
    ///
    /// Fails with `NothingToClaim` rather than transferring zero.
    pub fn claim(env: Env, staker: Address) -> Result<i128, ContractError> {
        staker.require_auth();
        with_entry_guard(&env, || {
            let mut state = Self::load_state(&env)?;
            let token = treasury::token(&env)?;

            // 1. Sync the index and settle the staker.
            let mut account = ledger::load_account(&env, &staker);
            state.sync(&env, ledger::current_tick(&env))?;
            account.settle(state.acc_reward_per_share)?;

            // 2. Zero the settled balance before paying it.
            let amount = account.take_settled();
            if amount == 0 {
                return Err(ContractError::NothingToClaim);
            }

            ledger::store_state(&env, &state);
            ledger::store_account(&env, &staker, &account);
            events::publish_claim(&env, staker.clone(), amount);

            // 3. Pay the reward last.
            treasury::push(&env, &token, &staker, amount)?;
            Ok(amount)
        })
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Reward `staker` could claim at the current ledger, computed without
    /// touching storage.
    pub fn pending_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        let Some(state) = ledger::load_state(&env) else {
            return Ok(0);
        };
        let index = state.preview_index(ledger::current_tick(&env))?;
        ledger::load_account(&env, &staker).pending_at(index)
    }

    /// Return the staker's current staked balance.
    pub fn get_staked(env: Env, staker: Address) -> i128 {
        ledger::load_account(&env, &staker).staked_amount
    }

    /// Return the combined staking position for a staker.
    pub fn get_staker_info(env: Env, staker: Address) -> Result<StakerInfo, ContractError> {
        Ok(StakerInfo {
            staked: Self::get_staked(env.clone(), staker.clone()),
            pending_rewards: Self::pending_rewards(env, staker)?,
        })
    }

    /// Return the sum of all currently staked tokens.
    pub fn get_total_staked(env: Env) -> i128 {
        ledger::load_state(&env).map_or(0, |s| s.total_staked)
    }

    /// Return the reward units emitted per ledger.
    pub fn get_reward_rate(env: Env) -> i128 {
        ledger::load_state(&env).map_or(0, |s| s.reward_rate)
    }

    /// Return the committed reward index (scaled by `rewards::PRECISION`).
    pub fn get_acc_reward_per_share(env: Env) -> i128 {
        ledger::load_state(&env).map_or(0, |s| s.acc_reward_per_share)
    }

    /// Return the ledger sequence of the last index sync.
    pub fn get_last_sync_tick(env: Env) -> u32 {
        ledger::load_state(&env).map_or(0, |s| s.last_sync_tick)
    }

    pub fn get_token(env: Env) -> Result<Address, ContractError> {
        treasury::token(&env)
    }

    pub fn get_token_decimals(env: Env) -> Result<u32, ContractError> {
        treasury::decimals(&env).ok_or(ContractError::TokenNotConfigured)
    }

    pub fn is_initialized(env: Env) -> bool {
        ledger::has_state(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        Ok(Self::load_state(&env)?.owner)
    }

    // ── Rate control ─────────────────────────────────────────────────────────

    /// Change the reward emission rate.
    ///
    /// The index is synced at the old rate first, so the old rate prices every
    /// ledger up to now and the new rate only what comes after.
    pub fn set_reward_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), ContractError> {
        caller.require_auth();
        with_entry_guard(&env, || {
            let mut state = Self::load_state(&env)?;
            Self::require_owner(&state, &caller)?;

            if new_rate < 0 {
                return Err(ContractError::InvalidAmount);
            }

            // Flush at the old rate before changing.
            state.sync(&env, ledger::current_tick(&env))?;
            state.reward_rate = new_rate;
            ledger::store_state(&env, &state);

            events::publish_rate_changed(&env, new_rate);
            Ok(())
        })
    }

    // ── Ownership transfer (two-step) ───────────────────────────────────────

    /// Propose a new owner. The proposed address must call `accept_owner`.
    pub fn propose_owner(
        env: Env,
        current_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        current_owner.require_auth();
        with_entry_guard(&env, || {
            let state = Self::load_state(&env)?;
            Self::require_owner(&state, &current_owner)?;

            env.storage().instance().set(&PENDING_OWNER, &new_owner);

            events::publish_owner_proposed(&env, current_owner.clone(), new_owner.clone());
            Ok(())
        })
    }

    /// Accept a pending ownership transfer. Only the proposed owner can call this.
    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        new_owner.require_auth();
        with_entry_guard(&env, || {
            let mut state = Self::load_state(&env)?;
            let pending: Address = env
                .storage()
                .instance()
                .get(&PENDING_OWNER)
                .ok_or(ContractError::NoPendingOwner)?;

            if new_owner != pending {
                return Err(ContractError::Unauthorized);
            }

            let old_owner = core::mem::replace(&mut state.owner, new_owner.clone());
            ledger::store_state(&env, &state);
            env.storage().instance().remove(&PENDING_OWNER);

            events::publish_owner_accepted(&env, old_owner, new_owner.clone());
            Ok(())
        })
    }

    /// Cancel a pending ownership transfer. Only the current owner can call this.
    pub fn cancel_owner_transfer(env: Env, current_owner: Address) -> Result<(), ContractError> {
        current_owner.require_auth();
        with_entry_guard(&env, || {
            let state = Self::load_state(&env)?;
            Self::require_owner(&state, &current_owner)?;

            let pending: Address = env
                .storage()
                .instance()
                .get(&PENDING_OWNER)
                .ok_or(ContractError::NoPendingOwner)?;
            env.storage().instance().remove(&PENDING_OWNER);

            events::publish_owner_transfer_cancelled(&env, current_owner.clone(), pending);
            Ok(())
        })
    }

    /// Get the pending owner address, if any.
    pub fn get_pending_owner(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_OWNER)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn load_state(env: &Env) -> Result<GlobalState, ContractError> {
        ledger::load_state(env).ok_or(ContractError::NotInitialized)
    }

    /// Guard: revert if `caller` is not the owner.
    fn require_owner(state: &GlobalState, caller: &Address) -> Result<(), ContractError> {
        if *caller != state.owner {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }
}

/// Run `op` with the entry guard held.
///
/// A call arriving while another guarded call is still running fails with
/// `ReentrantCall`. The guard is released on every return path.
fn with_entry_guard<T>(
    env: &Env,
    op: impl FnOnce() -> Result<T, ContractError>,
) -> Result<T, ContractError> {
    if !entry_guard::enter(env) {
        log!(env, "reentrant call refused");
        return Err(ContractError::ReentrantCall);
    }
    let result = op();
    entry_guard::exit(env);
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_entry_guard;
