//! Shared building blocks for the staking contracts.
//!
//! - [`entry_guard`] — per-instance reentrancy flag for mutating entry points.

#![no_std]

pub mod entry_guard;
