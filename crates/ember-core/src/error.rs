//! Error types for the Ember economy.
//!
//! Errors are categorical: authorization, bounds/validation, state-machine
//! preconditions and resource exhaustion. Every failed call aborts before
//! any state is mutated; there is no internal retry.
use thiserror::Error;

use crate::types::Amount;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipError {
    #[error("sender is not owner")] NotOwner,
    #[error("owner already set")] OwnerAlreadySet,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)] Ownership(#[from] OwnershipError),
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("amount not unlocked: allowance {allowance}, need {need}")] AmountNotUnlocked { allowance: Amount, need: Amount },
    #[error("value overflow")] ValueOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuctionError {
    #[error(transparent)] Ownership(#[from] OwnershipError),
    #[error("not authorized")] NotAuthorized,
    #[error("auction has closed")] AuctionClosed,
    #[error("minimum ledger supply not reached")] BelowMinimumSupply,
    #[error("bid amount too small: {amount} < {min}")] BidTooSmall { amount: Amount, min: Amount },
    #[error("bid amount too high: {amount} > {max}")] BidTooHigh { amount: Amount, max: Amount },
    #[error("auction fee too low: paid {paid}, need {need}")] AuctionFeeTooLow { paid: Amount, need: Amount },
    #[error("too many unprocessed claims")] TooManyUnprocessedClaims,
    #[error("auction must end")] AuctionNotEnded,
    #[error("insufficient remaining supply: {remaining} left")] InsufficientRemainingSupply { remaining: Amount },
    #[error("insufficient funds: have {have}, need {need}")] InsufficientFunds { have: Amount, need: Amount },
    #[error("cannot exceed max supply")] MaxSupplyExceeded,
    #[error(transparent)] Ledger(#[from] LedgerError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error(transparent)] Ownership(#[from] OwnershipError),
    #[error("liquidity not found")] LiquidityNotFound,
    #[error("amount not approved: allowance {allowance}, need {need}")] AmountNotApproved { allowance: Amount, need: Amount },
    #[error("share transfer failed: {0}")] Shares(#[from] LedgerError),
    #[error("reward mint failed: {0}")] Mint(#[from] AuctionError),
}

#[derive(Error, Debug)]
pub enum EmberError {
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Auction(#[from] AuctionError),
    #[error(transparent)] Reward(#[from] RewardError),
}
