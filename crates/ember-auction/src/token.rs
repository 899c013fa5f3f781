//! The gilt token: auction payout currency and decay shield.
//!
//! A plain fungible balance store with a hard supply cap and the
//! owner-set-once mint authority. Holding gilt shields ember balances
//! from decay, so the token implements [`ShieldBalanceProvider`] for the
//! ledger's recomputation hook.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ember_core::constants::MAX_GILT_SUPPLY;
use ember_core::error::{AuctionError, LedgerError, OwnershipError};
use ember_core::ownership::Ownership;
use ember_core::traits::ShieldBalanceProvider;
use ember_core::types::{Address, Amount};

/// The gilt fungible token.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GiltToken {
    ownership: Ownership,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    minted: Amount,
}

impl GiltToken {
    /// A fresh token owned by `deployer`.
    pub fn new(deployer: Address) -> Self {
        Self {
            ownership: Ownership::new(deployer),
            balances: HashMap::new(),
            allowances: HashMap::new(),
            minted: 0,
        }
    }

    /// The current mint authority.
    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// One-time handoff of mint authority (deployment wiring).
    pub fn set_owner_once(&mut self, caller: Address, new_owner: Address) -> Result<(), OwnershipError> {
        self.ownership.set_owner_once(caller, new_owner)
    }

    /// Units minted so far, net of nothing — gilt is never burned.
    pub fn total_supply(&self) -> Amount {
        self.minted
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

    /// Mint `amount` to `to`. Owner-gated, capped at
    /// [`MAX_GILT_SUPPLY`].
    pub fn mint(&mut self, caller: Address, to: Address, amount: Amount) -> Result<(), AuctionError> {
        self.ownership.require_owner(caller)?;
        self.mint_unchecked(to, amount)
    }

    /// Cap-checked mint without the owner gate. Crate-internal: the
    /// auction settles claims with it under its own preconditions.
    pub(crate) fn mint_unchecked(&mut self, to: Address, amount: Amount) -> Result<(), AuctionError> {
        if !self.can_mint(amount) {
            return Err(AuctionError::MaxSupplyExceeded);
        }
        *self.balances.entry(to).or_default() += amount;
        self.minted += amount;
        debug!(account = %to, amount, "gilt mint");
        Ok(())
    }

    /// Whether minting `amount` more stays within the supply cap.
    pub(crate) fn can_mint(&self, amount: Amount) -> bool {
        self.minted
            .checked_add(amount)
            .is_some_and(|total| total <= MAX_GILT_SUPPLY)
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<(), AuctionError> {
        let have = self.balance_of(from);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount }.into());
        }
        *self.balances.entry(from).or_default() -= amount;
        *self.balances.entry(to).or_default() += amount;
        Ok(())
    }

    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AuctionError> {
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            return Err(LedgerError::AmountNotUnlocked { allowance, need: amount }.into());
        }
        self.transfer(owner, to, amount)?;
        self.approve(owner, spender, allowance - amount);
        Ok(())
    }
}

impl ShieldBalanceProvider for GiltToken {
    fn shield_balance(&self, account: Address) -> Amount {
        self.balance_of(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::constants::UNIT;

    fn addr(seed: u8) -> Address {
        Address([seed; 32])
    }

    #[test]
    fn owner_mints_up_to_the_cap() {
        let mut t = GiltToken::new(addr(0));
        t.mint(addr(0), addr(1), MAX_GILT_SUPPLY).unwrap();
        assert_eq!(t.balance_of(addr(1)), MAX_GILT_SUPPLY);
        assert_eq!(t.mint(addr(0), addr(1), 1), Err(AuctionError::MaxSupplyExceeded));
    }

    #[test]
    fn non_owner_cannot_mint() {
        let mut t = GiltToken::new(addr(0));
        assert_eq!(
            t.mint(addr(1), addr(1), 100),
            Err(AuctionError::Ownership(OwnershipError::NotOwner))
        );
    }

    #[test]
    fn mint_authority_moves_exactly_once() {
        let mut t = GiltToken::new(addr(0));
        t.set_owner_once(addr(0), addr(7)).unwrap();
        t.mint(addr(7), addr(1), 100).unwrap();
        assert_eq!(
            t.set_owner_once(addr(7), addr(0)),
            Err(OwnershipError::OwnerAlreadySet)
        );
    }

    #[test]
    fn transfer_moves_balances() {
        let mut t = GiltToken::new(addr(0));
        t.mint(addr(0), addr(1), 10 * UNIT).unwrap();
        t.transfer(addr(1), addr(2), 4 * UNIT).unwrap();
        assert_eq!(t.balance_of(addr(1)), 6 * UNIT);
        assert_eq!(t.balance_of(addr(2)), 4 * UNIT);
        assert!(t.transfer(addr(1), addr(2), 7 * UNIT).is_err());
    }

    #[test]
    fn transfer_from_respects_allowance() {
        let mut t = GiltToken::new(addr(0));
        t.mint(addr(0), addr(1), 100).unwrap();
        t.approve(addr(1), addr(9), 40);
        t.transfer_from(addr(9), addr(1), addr(2), 40).unwrap();
        assert_eq!(t.allowance(addr(1), addr(9)), 0);
        assert!(t.transfer_from(addr(9), addr(1), addr(2), 1).is_err());
    }

    #[test]
    fn shield_balance_is_raw_balance() {
        let mut t = GiltToken::new(addr(0));
        t.mint(addr(0), addr(1), 5 * UNIT).unwrap();
        assert_eq!(t.shield_balance(addr(1)), 5 * UNIT);
        assert_eq!(t.shield_balance(addr(2)), 0);
    }
}
