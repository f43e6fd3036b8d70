//! Boundary with the token collaborator.
//!
//! Every movement of value in or out of the ledger goes through [`pull`] or
//! [`push`]. Both are issued as the final step of an entry point, after the
//! ledger has committed its own bookkeeping, and both surface collaborator
//! failures as [`ContractError::TransferFailed`] so the host rolls back the
//! whole invocation.

use soroban_sdk::{log, symbol_short, token, Address, Env, Symbol};

use crate::ContractError;

const TOKEN: Symbol = symbol_short!("TOKEN");
const DECIMALS: Symbol = symbol_short!("DECIMALS");

/// Largest decimals value whose unit still fits in an `i128`.
pub const MAX_DECIMALS: u32 = 38;

pub fn is_configured(env: &Env) -> bool {
    env.storage().instance().has(&TOKEN)
}

pub fn configure(env: &Env, token: &Address, decimals: u32) {
    env.storage().instance().set(&TOKEN, token);
    env.storage().instance().set(&DECIMALS, &decimals);
}

/// Token used for both stake and rewards.
pub fn token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&TOKEN)
        .ok_or(ContractError::TokenNotConfigured)
}

pub fn decimals(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DECIMALS)
}

/// Pull `amount` from `from` into the contract using a prior allowance.
pub fn pull(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), ContractError> {
    let this = env.current_contract_address();
    match token::Client::new(env, token).try_transfer_from(&this, from, &this, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "token pull failed", from.clone(), amount);
            Err(ContractError::TransferFailed)
        }
    }
}

/// Send `amount` from the contract's own balance to `to`.
pub fn push(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
    let this = env.current_contract_address();
    match token::Client::new(env, token).try_transfer(&this, to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => {
            log!(env, "token push failed", to.clone(), amount);
            Err(ContractError::TransferFailed)
        }
    }
}
