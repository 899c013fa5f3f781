//! The decaying-balance account store.
//!
//! Mint, burn and transfer operate on nominal balances, but every public
//! balance read applies the account's decay schedule at the supplied
//! timestamp — there are no background jobs. Writes first realize the
//! decay accrued so far (destroying it from supply), then rebuild the
//! schedule against the account's current shield holdings, so spendable
//! balances stay continuous across mutations.
//!
//! Not thread-safe — the hosting environment serializes calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use ember_core::config::LedgerConfig;
use ember_core::error::{LedgerError, OwnershipError};
use ember_core::ownership::Ownership;
use ember_core::traits::ShieldBalanceProvider;
use ember_core::types::{Address, Amount, Timestamp};

use crate::decay::DecaySchedule;

/// One ledger account: nominal units plus the active decay schedule.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Account {
    /// Minted/transferred units net of realized decay. Never negative.
    pub nominal: Amount,
    /// Active decay schedule; [`DecaySchedule::NONE`] when fully shielded.
    pub decay: DecaySchedule,
}

impl Account {
    /// Spendable units at `now`: nominal minus accrued decay.
    pub fn spendable(&self, now: Timestamp) -> Amount {
        self.nominal.saturating_sub(self.decay.decayed_amount(now))
    }
}

/// The decaying-balance ledger.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DecayingLedger {
    config: LedgerConfig,
    ownership: Ownership,
    accounts: HashMap<Address, Account>,
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl DecayingLedger {
    /// A fresh ledger owned by `deployer`.
    pub fn new(deployer: Address, config: LedgerConfig) -> Self {
        Self {
            config,
            ownership: Ownership::new(deployer),
            accounts: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
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

    /// Total supply net of burns and realized decay.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Nominal balance of `account` (pre-decay).
    pub fn nominal_balance(&self, account: Address) -> Amount {
        self.accounts.get(&account).map_or(0, |a| a.nominal)
    }

    /// Spendable balance of `account` at `now` (decay applied lazily).
    pub fn spendable_balance(&self, account: Address, now: Timestamp) -> Amount {
        self.accounts.get(&account).map_or(0, |a| a.spendable(now))
    }

    /// The account's decay schedule, for inspection.
    pub fn decay_schedule(&self, account: Address) -> DecaySchedule {
        self.accounts.get(&account).map_or(DecaySchedule::NONE, |a| a.decay)
    }

    /// Remaining spend authorization from `owner` to `spender`.
    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    /// Authorize `spender` to move up to `amount` of the caller's balance.
    pub fn approve(&mut self, caller: Address, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(caller, spender));
        } else {
            self.allowances.insert((caller, spender), amount);
        }
    }

    /// Mint `amount` to `to`. Owner-gated.
    pub fn mint(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
        shield: &dyn ShieldBalanceProvider,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.ownership.require_owner(caller)?;
        let account = self.accounts.entry(to).or_default();
        account.nominal = account
            .nominal
            .checked_add(amount)
            .ok_or(LedgerError::ValueOverflow)?;
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::ValueOverflow)?;
        self.settle_and_rebuild(to, shield, now);
        debug!(account = %to, amount, "ledger mint");
        Ok(())
    }

    /// Burn `amount` of the caller's spendable balance.
    pub fn burn(
        &mut self,
        caller: Address,
        amount: Amount,
        shield: &dyn ShieldBalanceProvider,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let have = self.spendable_balance(caller, now);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        self.settle(caller, now);
        let account = self.accounts.entry(caller).or_default();
        account.nominal -= amount;
        self.total_supply -= amount;
        self.settle_and_rebuild(caller, shield, now);
        debug!(account = %caller, amount, "ledger burn");
        Ok(())
    }

    /// Allowance-consuming burn: the auction's bid-locking primitive.
    pub fn burn_from(
        &mut self,
        spender: Address,
        owner: Address,
        amount: Amount,
        shield: &dyn ShieldBalanceProvider,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.consume_allowance(owner, spender, amount)?;
        self.burn(owner, amount, shield, now).inspect_err(|_| {
            self.restore_allowance(owner, spender, amount);
        })
    }

    /// Move `amount` of the caller's spendable balance to `to`.
    ///
    /// Decay schedules of both parties are rebuilt afterwards.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
        shield: &dyn ShieldBalanceProvider,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let have = self.spendable_balance(from, now);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        if self.nominal_balance(to).checked_add(amount).is_none() {
            return Err(LedgerError::ValueOverflow);
        }

        self.settle(from, now);
        self.settle(to, now);
        self.accounts.entry(from).or_default().nominal -= amount;
        self.accounts.entry(to).or_default().nominal += amount;
        self.settle_and_rebuild(from, shield, now);
        self.settle_and_rebuild(to, shield, now);
        debug!(%from, %to, amount, "ledger transfer");
        Ok(())
    }

    /// Allowance-consuming transfer on behalf of `owner`.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
        shield: &dyn ShieldBalanceProvider,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        self.consume_allowance(owner, spender, amount)?;
        self.transfer(owner, to, amount, shield, now).inspect_err(|_| {
            self.restore_allowance(owner, spender, amount);
        })
    }

    /// Burn the caller's entire spendable balance for migration to a
    /// remote chain, logging the opaque remote address.
    ///
    /// Returns the amount burned.
    pub fn burn_for_migration(
        &mut self,
        caller: Address,
        remote_addr: &[u8],
        shield: &dyn ShieldBalanceProvider,
        now: Timestamp,
    ) -> Result<Amount, LedgerError> {
        let amount = self.spendable_balance(caller, now);
        self.burn(caller, amount, shield, now)?;
        debug!(
            account = %caller,
            amount,
            remote_addr = %hex_of(remote_addr),
            "burn for migration"
        );
        Ok(amount)
    }

    /// Rebuild the account's decay schedule against its current shield
    /// holdings.
    ///
    /// The callback contract of the shield link: invoked after every
    /// balance change on this ledger, and to be invoked by the hosting
    /// layer after every shield-token balance change. Idempotent given an
    /// unchanged balance pair and timestamp.
    pub fn recompute_decay(
        &mut self,
        account: Address,
        shield: &dyn ShieldBalanceProvider,
        now: Timestamp,
    ) {
        self.settle_and_rebuild(account, shield, now);
    }

    /// Realize decay accrued by `now`: fold it into the nominal balance
    /// and destroy it from supply. Leaves the schedule pointing at `now`.
    fn settle(&mut self, account: Address, now: Timestamp) {
        let Some(acct) = self.accounts.get_mut(&account) else {
            return;
        };
        let decayed = acct.decay.decayed_amount(now);
        if decayed > 0 {
            acct.nominal = acct.nominal.saturating_sub(decayed);
            acct.decay.decayable = acct.decay.decayable.saturating_sub(decayed);
            self.total_supply = self.total_supply.saturating_sub(decayed);
        }
        // Remaining accrual restarts from now; rebuild decides the rest.
        acct.decay.start_time = acct.decay.start_time.max(now.min(acct.decay.end_time));
    }

    fn settle_and_rebuild(
        &mut self,
        account: Address,
        shield: &dyn ShieldBalanceProvider,
        now: Timestamp,
    ) {
        self.settle(account, now);
        let shield_amount = shield.shield_balance(account) / self.config.decay_halt_fee.max(1);
        let Some(acct) = self.accounts.get_mut(&account) else {
            return;
        };
        if acct.nominal == 0 {
            self.accounts.remove(&account);
            return;
        }
        let spendable = acct.nominal;
        acct.decay = DecaySchedule::rebuild(
            spendable,
            shield_amount,
            now,
            self.config.decay_duration_secs,
        );
    }

    fn consume_allowance(
        &mut self,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let allowance = self.allowance(owner, spender);
        if allowance < amount {
            return Err(LedgerError::AmountNotUnlocked { allowance, need: amount });
        }
        self.approve(owner, spender, allowance - amount);
        Ok(())
    }

    fn restore_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        let current = self.allowance(owner, spender);
        self.approve(owner, spender, current + amount);
    }
}

fn hex_of(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
