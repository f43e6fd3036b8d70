//! # Entry guard
//!
//! A per-contract-instance "busy" flag used to reject reentrant calls into a
//! contract's mutating surface.
//!
//! The flag lives in instance storage, so it is scoped to the contract that
//! calls these helpers. A caller must pair every successful [`enter`] with an
//! [`exit`] on all return paths:
//!
//! ```ignore
//! if !entry_guard::enter(&env) {
//!     return Err(ContractError::ReentrantCall);
//! }
//! let result = do_work(&env);
//! entry_guard::exit(&env);
//! result
//! ```
//!
//! Refusal is reported as `false` rather than an error so each contract can map
//! it onto its own error code.

use soroban_sdk::{symbol_short, Env, Symbol};

const ENTRY_LOCK: Symbol = symbol_short!("ENTRY_LK");

/// Returns `true` while a guarded call is in progress.
pub fn is_entered(env: &Env) -> bool {
    env.storage()
        .instance()
        .get::<_, bool>(&ENTRY_LOCK)
        .unwrap_or(false)
}

/// Marks the guarded surface as busy.
///
/// Returns `false`, leaving storage untouched, when the surface is already
/// busy.
pub fn enter(env: &Env) -> bool {
    if is_entered(env) {
        return false;
    }
    env.storage().instance().set(&ENTRY_LOCK, &true);
    true
}

/// Clears the busy flag. Calling it when the flag is not set is a no-op.
pub fn exit(env: &Env) {
    env.storage().instance().remove(&ENTRY_LOCK);
}
