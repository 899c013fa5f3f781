//! LP-share pools against the native currency.
//!
//! The economy rewards liquidity in exactly two pairs. [`PoolToken`] is
//! the share credential for one of them: it stands in for the DEX pair
//! contract, so it is deliberately minimal — shares are issued by the
//! pair on deposit (`mint` here) and the engine only ever moves them
//! through the usual allowance mechanism.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ember_core::error::LedgerError;
use ember_core::types::{Address, Amount};

/// The two pools the reward engine recognizes.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash,
    bincode::Encode, bincode::Decode,
)]
pub enum PoolKind {
    /// Gilt / native currency.
    GiltNative,
    /// Ember / native currency.
    EmberNative,
}

/// LP-share balances of one pool.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PoolToken {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl PoolToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    pub fn approve(&mut self, caller: Address, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(caller, spender));
        } else {
            self.allowances.insert((caller, spender), amount);
        }
    }

    /// Issue `amount` shares to `to`, as the pair does on deposit.
    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<(), LedgerError> {
        let balance = self.balances.entry(to).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(LedgerError::ValueOverflow)?;
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::ValueOverflow)?;
        Ok(())
    }

    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let have = self.balance_of(caller);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        if self.balance_of(to).checked_add(amount).is_none() {
            return Err(LedgerError::ValueOverflow);
        }
        *self.balances.entry(caller).or_insert(0) -= amount;
        *self.balances.entry(to).or_insert(0) += amount;
        self.balances.retain(|_, v| *v > 0);
        Ok(())
    }

    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            return Err(LedgerError::AmountNotUnlocked { allowance, need: amount });
        }
        self.transfer(owner, to, amount)?;
        self.approve(owner, spender, allowance - amount);
        Ok(())
    }
}
