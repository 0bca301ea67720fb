//! Instruction handlers for the Vault Staking program.
//!
//! This module contains all instruction implementations.

pub mod deposit;
pub mod initialize;
pub mod query;
pub mod withdraw;

pub use deposit::*;
pub use initialize::*;
pub use query::*;
pub use withdraw::*;
