//! Trait interfaces between the economy's components.
//!
//! The ledger never holds shield balances itself; it reads them through
//! [`ShieldBalanceProvider`], injected per call. In production the gilt
//! token implements it; tests inject fixed-balance stubs so decay math can
//! be verified in isolation.

use crate::types::{Address, Amount};

/// Read-only view of an account's shield-token balance.
pub trait ShieldBalanceProvider {
    /// Raw shield-token balance of `account`, in base units.
    fn shield_balance(&self, account: Address) -> Amount;
}

/// A provider with no shield holdings at all. Decay runs unshielded.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShield;

impl ShieldBalanceProvider for NoShield {
    fn shield_balance(&self, _account: Address) -> Amount {
        0
    }
}
