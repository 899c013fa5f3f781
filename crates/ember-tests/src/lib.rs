//! Integration test suite for the Ember economy.
//!
//! This crate wires the deployed shape of the system — decaying ledger,
//! period auction with its gilt token, and the liquidity reward engine —
//! and verifies the cross-component economics: auctions feed decay
//! shields, shields halt decay, rewards mint against the shared gilt cap.

pub mod helpers;
