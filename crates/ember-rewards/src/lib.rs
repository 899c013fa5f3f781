//! # ember-rewards
//!
//! The liquidity-lock reward engine. Accounts lock LP shares of one of
//! the two native-currency pools into the engine's custody; the reward
//! for an unbroken lock grows with the square root of `amount * age`
//! relative to the pool's total share supply, and is paid in gilt.

pub mod engine;
pub mod isqrt;
pub mod pool;

pub use engine::{RewardEngine, Ticket};
pub use isqrt::isqrt;
pub use pool::{PoolKind, PoolToken};
