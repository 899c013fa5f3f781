//! Linear decay schedules.
//!
//! A schedule decays a fixed portion of a balance linearly between a start
//! and an end time. The zeroed schedule means "no decay". Schedules are
//! pure data; the ledger decides when to rebuild them.

use serde::{Deserialize, Serialize};

use ember_core::math::mul_div;
use ember_core::types::{Amount, Timestamp};

/// Per-account decay state: `decayable` units accrue away linearly from
/// `start_time`, all gone by `end_time`.
///
/// The accrued amount is `decayable * elapsed / window`, dividing last,
/// so even balances far smaller than the window decay without a flooring
/// cliff.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct DecaySchedule {
    /// Units decaying over the window. Zero means the balance is frozen.
    pub decayable: Amount,
    /// Instant decay starts accruing.
    pub start_time: Timestamp,
    /// Instant the full `decayable` amount is gone.
    pub end_time: Timestamp,
}

impl DecaySchedule {
    /// The halted schedule: no decay at all.
    pub const NONE: Self = Self {
        decayable: 0,
        start_time: 0,
        end_time: 0,
    };

    /// Whether this schedule accrues no decay.
    pub fn is_halted(&self) -> bool {
        self.decayable == 0
    }

    /// Decay accrued by `now`.
    ///
    /// Zero at or before `start_time`, proportional to elapsed time in
    /// between, frozen at `decayable` from `end_time` onward.
    pub fn decayed_amount(&self, now: Timestamp) -> Amount {
        if self.decayable == 0 || now <= self.start_time {
            return 0;
        }
        let elapsed = now.min(self.end_time) - self.start_time;
        let window = self.end_time - self.start_time;
        if elapsed >= window {
            return self.decayable;
        }
        // elapsed < window bounds the quotient below `decayable`.
        mul_div(self.decayable, Amount::from(elapsed), Amount::from(window))
            .unwrap_or(self.decayable)
    }

    /// Build the schedule for a balance of `spendable` units shielded to
    /// the extent of `shield_amount`, starting at `now`.
    ///
    /// Shielding at or above the spendable balance halts decay entirely.
    /// Otherwise the unshielded portion decays to zero over
    /// `duration_secs`.
    pub fn rebuild(
        spendable: Amount,
        shield_amount: Amount,
        now: Timestamp,
        duration_secs: u64,
    ) -> Self {
        if shield_amount >= spendable || duration_secs == 0 {
            return Self::NONE;
        }
        Self {
            decayable: spendable - shield_amount,
            start_time: now,
            end_time: now + duration_secs,
        }
    }
}
