//! Shared helpers for the integration tests.

use ember_auction::Auction;
use ember_core::config::{AuctionConfig, LedgerConfig, RewardConfig};
use ember_core::constants::PERIOD_DURATION_SECS;
use ember_core::error::EmberError;
use ember_core::types::{Address, Amount, Timestamp};
use ember_ledger::DecayingLedger;
use ember_rewards::RewardEngine;

/// Account address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address([seed; 32])
}

/// The account that deploys and initially administers every component.
pub fn deployer() -> Address {
    addr(0)
}

pub fn auction_addr() -> Address {
    addr(250)
}

pub fn engine_addr() -> Address {
    addr(251)
}

pub fn funding_addr() -> Address {
    addr(252)
}

/// The deployed system: ledger, auction (with embedded gilt) and the
/// reward engine, wired the way production deployment wires them. The
/// gilt mint authority is handed to the reward engine; auction claim
/// settlement uses its internal allocation path and needs no authority.
pub struct Economy {
    pub ledger: DecayingLedger,
    pub auction: Auction,
    pub rewards: RewardEngine,
}

impl Economy {
    pub fn deploy(auction_config: AuctionConfig) -> Self {
        let ledger = DecayingLedger::new(deployer(), LedgerConfig::default());
        let mut auction = Auction::new(deployer(), auction_addr(), auction_config);
        let rewards = RewardEngine::new(deployer(), engine_addr(), RewardConfig::default());
        auction
            .token_mut()
            .set_owner_once(deployer(), rewards.address())
            .unwrap();
        Self { ledger, auction, rewards }
    }

    /// Mint `amount` ember to `account` and approve the auction to burn
    /// it, mirroring a bidder's funding-plus-unlock step.
    pub fn fund_bidder(&mut self, account: Address, amount: Amount, now: Timestamp) {
        self.ledger
            .mint(deployer(), account, amount, self.auction.token(), now)
            .unwrap();
        self.ledger.approve(account, self.auction.address(), amount);
    }

    /// Keep the ledger's view of `account`'s shield current, as the
    /// hosting layer does after every gilt balance change.
    pub fn refresh_shield(&mut self, account: Address, now: Timestamp) {
        self.ledger.recompute_decay(account, self.auction.token(), now);
    }

    /// Drive one full funding, bid and claim round for `account`,
    /// surfacing any component failure through the aggregate error type.
    pub fn auction_round(
        &mut self,
        account: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Amount, EmberError> {
        self.ledger
            .mint(deployer(), account, amount, self.auction.token(), now)?;
        self.ledger.approve(account, self.auction.address(), amount);
        self.auction.bid(&mut self.ledger, account, amount, 0, now)?;
        Ok(self.auction.claim(account, now + PERIOD_DURATION_SECS + 1)?)
    }
}

/// An auction config small enough to drive scenarios with round numbers.
pub fn small_auction(max_periods: usize, supply_per_period: Amount) -> AuctionConfig {
    AuctionConfig {
        min_ledger_supply: 100,
        max_periods,
        supply_per_period,
        min_bid: 100,
        funding_address: funding_addr(),
        fee_per_unit: 0,
    }
}
