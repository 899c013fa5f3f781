//! # ember-auction — Recurring sealed-style gilt auction.
//!
//! Bids are denominated in ember ledger balance and destroyed on
//! acceptance; each 24-hour period's fixed gilt allocation is paid out
//! pro-rata to locked bids after the period closes. The gilt token minted
//! here doubles as the ledger's decay shield.
//!
//! Periods close purely by timestamp comparison — there is no close
//! transaction, and every operation takes the current time from the
//! caller.

pub mod auction;
pub mod token;

pub use auction::{Auction, Claim, Period};
pub use token::GiltToken;
