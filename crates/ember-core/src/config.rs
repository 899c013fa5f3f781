//! Component configuration.
//!
//! Each component takes its config at construction. Fields that stay
//! adjustable after deployment (`max_periods`, the deposit fee, the
//! funding address, the reward constant) are mutated only through
//! owner-gated setters on the component itself.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DECAY_DURATION_SECS, UNIT};
use crate::types::{Address, Amount};

/// DecayingLedger parameters.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Divisor applied to an account's raw shield balance: holding
    /// `decay_halt_fee` shield units halts decay on one ledger unit.
    pub decay_halt_fee: Amount,
    /// Seconds over which the unshielded portion decays to zero.
    pub decay_duration_secs: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            decay_halt_fee: 2 * UNIT,
            decay_duration_secs: DEFAULT_DECAY_DURATION_SECS,
        }
    }
}

/// PeriodAuction parameters.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuctionConfig {
    /// Minimum total ledger supply before the first period may open.
    pub min_ledger_supply: Amount,
    /// Maximum number of periods the auction will ever create.
    pub max_periods: usize,
    /// Gilt allocated to each period at creation.
    pub supply_per_period: Amount,
    /// Base bid size; the dynamic band is expressed in multiples of it.
    pub min_bid: Amount,
    /// Recipient of deposit fees, sole authority for sink withdrawals.
    pub funding_address: Address,
    /// Base-currency deposit fee per bid unit, charged once the period
    /// count passes the fee ramp.
    pub fee_per_unit: Amount,
}

/// LiquidityRewardEngine parameters.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewardConfig {
    /// Flat bonus added to every computed liquidity reward.
    pub reward_k: Amount,
}
