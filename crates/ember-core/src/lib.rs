//! # ember-core
//! Foundation types, errors and configuration for the Ember economy.

pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod ownership;
pub mod traits;
pub mod types;
