//! The reward engine proper.
//!
//! One ticket per `(account, pool)`. Locking is additive but resets the
//! ticket's age; claiming pays out and resets the age; unlocking returns
//! the full principal and deletes the ticket. Elapsed time is therefore
//! never rewarded twice, and principal is only ever moved by its owner.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ember_auction::GiltToken;
use ember_core::config::RewardConfig;
use ember_core::error::{OwnershipError, RewardError};
use ember_core::math::mul_div;
use ember_core::ownership::Ownership;
use ember_core::types::{Address, Amount, Timestamp};

use crate::isqrt::isqrt;
use crate::pool::{PoolKind, PoolToken};

/// One account's locked position in one pool.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Ticket {
    /// Custodied LP shares.
    pub amount: Amount,
    /// Start of the current reward window.
    pub locked_at: Timestamp,
}

/// Custodies LP shares and mints gilt rewards for lock age.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RewardEngine {
    config: RewardConfig,
    ownership: Ownership,
    /// Account identity the engine custodies shares under.
    address: Address,
    tickets: HashMap<(Address, PoolKind), Ticket>,
}

impl RewardEngine {
    pub fn new(deployer: Address, address: Address, config: RewardConfig) -> Self {
        Self {
            config,
            ownership: Ownership::new(deployer),
            address,
            tickets: HashMap::new(),
        }
    }

    /// The account LP holders must approve share spending to.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn ticket(&self, account: Address, pool: PoolKind) -> Option<Ticket> {
        self.tickets.get(&(account, pool)).copied()
    }

    /// Lock `amount` LP shares of `pool` into custody.
    ///
    /// Amounts accumulate; `locked_at` resets to `now` on every lock, so
    /// adding to a position restarts its reward window.
    pub fn lock(
        &mut self,
        pool: PoolKind,
        shares: &mut PoolToken,
        account: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), RewardError> {
        let allowance = shares.allowance(account, self.address);
        if allowance < amount {
            return Err(RewardError::AmountNotApproved { allowance, need: amount });
        }
        shares.transfer_from(self.address, account, self.address, amount)?;

        let ticket = self
            .tickets
            .entry((account, pool))
            .or_insert(Ticket { amount: 0, locked_at: now });
        ticket.amount += amount;
        ticket.locked_at = now;
        debug!(account = %account, ?pool, amount, total = ticket.amount, "liquidity locked");
        Ok(())
    }

    /// Return the account's full custodied position and delete the ticket.
    pub fn unlock(
        &mut self,
        pool: PoolKind,
        shares: &mut PoolToken,
        account: Address,
    ) -> Result<Amount, RewardError> {
        let ticket = self
            .tickets
            .remove(&(account, pool))
            .ok_or(RewardError::LiquidityNotFound)?;
        shares.transfer(self.address, account, ticket.amount)?;
        debug!(account = %account, ?pool, amount = ticket.amount, "liquidity unlocked");
        Ok(ticket.amount)
    }

    /// The reward the account would earn if it claimed at `as_of`:
    /// `floor(sqrt(amount * age / total_shares)) + k`.
    pub fn calc_reward(
        &self,
        pool: PoolKind,
        shares: &PoolToken,
        account: Address,
        as_of: Timestamp,
    ) -> Result<Amount, RewardError> {
        let ticket = self
            .tickets
            .get(&(account, pool))
            .ok_or(RewardError::LiquidityNotFound)?;
        let age = as_of.saturating_sub(ticket.locked_at);
        let total = shares.total_supply();
        if age == 0 || total == 0 {
            return Ok(self.config.reward_k);
        }
        let scaled = mul_div(ticket.amount, Amount::from(age), total)
            .ok_or(ember_core::error::LedgerError::ValueOverflow)?;
        Ok(isqrt(scaled) + self.config.reward_k)
    }

    /// Pay the current reward in gilt and restart the reward window.
    ///
    /// The engine must hold the gilt token's mint authority. Principal is
    /// untouched; only `locked_at` moves.
    pub fn claim_reward(
        &mut self,
        pool: PoolKind,
        shares: &PoolToken,
        gilt: &mut GiltToken,
        account: Address,
        now: Timestamp,
    ) -> Result<Amount, RewardError> {
        let reward = self.calc_reward(pool, shares, account, now)?;
        if reward > 0 {
            gilt.mint(self.address, account, reward)?;
        }
        if let Some(ticket) = self.tickets.get_mut(&(account, pool)) {
            ticket.locked_at = now;
        }
        info!(account = %account, ?pool, reward, "reward claimed");
        Ok(reward)
    }

    // --- owner-gated configuration ---

    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    pub fn set_owner_once(&mut self, caller: Address, new_owner: Address) -> Result<(), OwnershipError> {
        self.ownership.set_owner_once(caller, new_owner)
    }

    pub fn reward_k(&self) -> Amount {
        self.config.reward_k
    }

    /// Flat bonus added to every reward. Defaults to zero.
    pub fn set_k(&mut self, caller: Address, k: Amount) -> Result<(), RewardError> {
        self.ownership.require_owner(caller)?;
        self.config.reward_k = k;
        Ok(())
    }
}
