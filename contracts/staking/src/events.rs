#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub reward_rate: i128,
    pub tick: u32,
}

/// Fired when the owner wires up the token collaborator.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenConfiguredEvent {
    pub token: Address,
    pub decimals: u32,
    pub tick: u32,
}

/// Fired when a staker deposits.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeEvent {
    pub staker: Address,
    pub amount: i128,
    pub total_staked: i128,
    pub tick: u32,
}

/// Fired when a staker takes principal back out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub staker: Address,
    pub amount: i128,
    pub total_staked: i128,
    pub tick: u32,
}

/// Fired when a staker claims settled reward.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimEvent {
    pub staker: Address,
    pub amount: i128,
    pub tick: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateChangedEvent {
    pub new_rate: i128,
    pub tick: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub tick: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub tick: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferCancelledEvent {
    pub owner: Address,
    pub cancelled_proposed: Address,
    pub tick: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, reward_rate: i128) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            reward_rate,
            tick: env.ledger().sequence(),
        },
    );
}

pub fn publish_token_configured(env: &Env, token: Address, decimals: u32) {
    env.events().publish(
        (symbol_short!("TOKEN_CFG"),),
        TokenConfiguredEvent {
            token,
            decimals,
            tick: env.ledger().sequence(),
        },
    );
}

pub fn publish_stake(env: &Env, staker: Address, amount: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("STAKE"), staker.clone()),
        StakeEvent {
            staker,
            amount,
            total_staked,
            tick: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdraw(env: &Env, staker: Address, amount: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), staker.clone()),
        WithdrawEvent {
            staker,
            amount,
            total_staked,
            tick: env.ledger().sequence(),
        },
    );
}

pub fn publish_claim(env: &Env, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIM"), staker.clone()),
        ClaimEvent {
            staker,
            amount,
            tick: env.ledger().sequence(),
        },
    );
}

pub fn publish_rate_changed(env: &Env, new_rate: i128) {
    env.events().publish(
        (symbol_short!("RATE_CHG"),),
        RateChangedEvent {
            new_rate,
            tick: env.ledger().sequence(),
        },
    );
}

pub fn publish_owner_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerProposedEvent {
            current_owner,
            proposed_owner,
            tick: env.ledger().sequence(),
        },
    );
}

pub fn publish_owner_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerAcceptedEvent {
            old_owner,
            new_owner,
            tick: env.ledger().sequence(),
        },
    );
}

pub fn publish_owner_transfer_cancelled(env: &Env, owner: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), owner.clone()),
        OwnerTransferCancelledEvent {
            owner,
            cancelled_proposed,
            tick: env.ledger().sequence(),
        },
    );
}
