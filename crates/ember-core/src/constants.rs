//! Economy constants. All monetary values in base units (1 token = 10^18 units).

use crate::types::Amount;

/// Base units per whole token.
pub const UNIT: Amount = 1_000_000_000_000_000_000;

/// Hard cap on gilt supply, across auction allocations, rewards and
/// administrative transfers.
pub const MAX_GILT_SUPPLY: Amount = 150_000_000 * UNIT;

/// Duration of one auction period in seconds (24 hours).
pub const PERIOD_DURATION_SECS: u64 = 86_400;

/// Maximum unresolved claims an account may hold before further bids are
/// rejected. Bounds per-account claim storage deterministically.
pub const MAX_UNPROCESSED_CLAIMS: usize = 5;

/// Number of periods after which the late bid band and the proportional
/// deposit fee apply.
pub const FEE_RAMP_PERIODS: usize = 7;

/// Bid band multipliers of `min_bid` while the period count is at or
/// below [`FEE_RAMP_PERIODS`]: `[min_bid, min_bid * 10]`.
pub const EARLY_BID_MULTIPLIERS: (Amount, Amount) = (1, 10);

/// Bid band multipliers once the period count exceeds
/// [`FEE_RAMP_PERIODS`]: `[min_bid * 50, min_bid * 500]`.
pub const LATE_BID_MULTIPLIERS: (Amount, Amount) = (50, 500);

/// Default time over which an unshielded balance decays to zero (60 days).
pub const DEFAULT_DECAY_DURATION_SECS: u64 = 60 * 86_400;
