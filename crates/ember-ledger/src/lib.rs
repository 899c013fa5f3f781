//! # ember-ledger — Decaying-balance ledger.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! Balances here are nominal; every public read subtracts the decay a
//! [`decay::DecaySchedule`] has accrued by the supplied timestamp, and
//! every write realizes that decay and rebuilds the schedule against the
//! account's current shield holdings. Shield balances are read through
//! the injected [`ember_core::traits::ShieldBalanceProvider`], never held
//! locally.

pub mod decay;
pub mod ledger;

pub use decay::DecaySchedule;
pub use ledger::DecayingLedger;
