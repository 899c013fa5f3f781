//! The period auction state machine.
//!
//! Periods are append-only and close purely by timestamp: `NONE → OPEN`
//! at creation, `OPEN → CLOSED` once `now >= end_time`. Bids burn ember
//! through the ledger's allowance mechanism and append a claim to the
//! bidder's bounded FIFO queue; settlement mints gilt pro-rata to each
//! claim's share of its period's total bids.
//!
//! Every mutating call validates completely before touching state, so a
//! rejected call leaves the auction, the ledger and the claim queues
//! exactly as they were.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ember_core::config::AuctionConfig;
use ember_core::constants::{
    EARLY_BID_MULTIPLIERS, FEE_RAMP_PERIODS, LATE_BID_MULTIPLIERS, MAX_UNPROCESSED_CLAIMS,
    PERIOD_DURATION_SECS,
};
use ember_core::error::{AuctionError, LedgerError, OwnershipError};
use ember_core::math::mul_div;
use ember_core::ownership::Ownership;
use ember_core::types::{Address, Amount, Timestamp};
use ember_ledger::DecayingLedger;

use crate::token::GiltToken;

/// One 24-hour auction round.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Period {
    /// Instant the period closes. Fixed at creation.
    pub end_time: Timestamp,
    /// Gilt allocated to this period. Fixed at creation.
    pub supply: Amount,
    /// Cumulative bids accepted before `end_time`.
    pub total_bids: Amount,
}

impl Period {
    /// Whether the period has closed by `now`.
    pub fn is_closed(&self, now: Timestamp) -> bool {
        now >= self.end_time
    }
}

/// A bidder's pending right to a pro-rata share of one period's supply.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct Claim {
    /// Index of the period the bid landed in.
    pub period: u64,
    /// The locked bid amount.
    pub bid: Amount,
}

/// The recurring gilt auction.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Auction {
    config: AuctionConfig,
    ownership: Ownership,
    /// Account identity bidders approve ledger spending to.
    address: Address,
    token: GiltToken,
    periods: Vec<Period>,
    /// Per-account bounded FIFO claim queues.
    claims: HashMap<Address, Vec<Claim>>,
    /// Gilt allocated across all created periods.
    allocated: Amount,
    /// Gilt minted through claim settlement and unallocated transfers.
    settled: Amount,
    /// Base currency accrued from deposit fees and direct funding.
    sink_balance: Amount,
}

impl Auction {
    /// A fresh auction owned by `deployer`, reachable at `address`.
    ///
    /// The embedded gilt token starts owned by the same deployer; its
    /// mint authority is handed off separately at wiring time.
    pub fn new(deployer: Address, address: Address, config: AuctionConfig) -> Self {
        Self {
            config,
            ownership: Ownership::new(deployer),
            address,
            token: GiltToken::new(deployer),
            periods: Vec::new(),
            claims: HashMap::new(),
            allocated: 0,
            settled: 0,
            sink_balance: 0,
        }
    }

    /// The account bidders must approve ledger spending to.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The gilt token (payout currency and decay shield).
    pub fn token(&self) -> &GiltToken {
        &self.token
    }

    /// Mutable token access for wiring (`set_owner_once`) and for holders
    /// of the mint authority (the reward engine).
    pub fn token_mut(&mut self) -> &mut GiltToken {
        &mut self.token
    }

    pub fn num_periods(&self) -> usize {
        self.periods.len()
    }

    pub fn period(&self, index: usize) -> Option<&Period> {
        self.periods.get(index)
    }

    /// Unresolved claims of `account`, oldest first.
    pub fn claims_of(&self, account: Address) -> &[Claim] {
        self.claims.get(&account).map_or(&[], Vec::as_slice)
    }

    pub fn num_claims_of(&self, account: Address) -> usize {
        self.claims_of(account).len()
    }

    /// Whether the auction has run its course: all configured periods
    /// created and the last one closed.
    pub fn has_ended(&self, now: Timestamp) -> bool {
        self.periods.len() >= self.config.max_periods
            && self.periods.last().is_some_and(|p| p.is_closed(now))
    }

    /// Base-currency balance held for the funding address.
    pub fn sink_balance(&self) -> Amount {
        self.sink_balance
    }

    /// Accept a direct base-currency deposit into the funding sink.
    pub fn fund(&mut self, amount: Amount) -> Result<(), AuctionError> {
        self.sink_balance = self
            .sink_balance
            .checked_add(amount)
            .ok_or(LedgerError::ValueOverflow)?;
        Ok(())
    }

    /// Open the next period explicitly.
    ///
    /// Returns `Ok(None)` when the newest period is still open (nothing
    /// to do). `total_ledger_supply` is the ember ledger's current total
    /// supply, gating the very existence of the auction.
    ///
    /// # Errors
    ///
    /// - [`AuctionError::AuctionClosed`] once `max_periods` exist
    /// - [`AuctionError::BelowMinimumSupply`] under the configured floor
    pub fn open_period(
        &mut self,
        total_ledger_supply: Amount,
        now: Timestamp,
    ) -> Result<Option<u64>, AuctionError> {
        if self.periods.last().is_some_and(|p| !p.is_closed(now)) {
            return Ok(None);
        }
        if self.periods.len() >= self.config.max_periods {
            return Err(AuctionError::AuctionClosed);
        }
        if total_ledger_supply < self.config.min_ledger_supply {
            return Err(AuctionError::BelowMinimumSupply);
        }
        Ok(Some(self.push_period(now)))
    }

    /// Lock `amount` of the bidder's ember into the current period.
    ///
    /// Opens a period lazily when the previous one has closed. The bid is
    /// validated completely — auction state, ledger allowance, dynamic
    /// band, deposit fee, claim-queue bound, spendable balance — before
    /// anything is mutated; on success the amount is burned from the
    /// bidder's ledger balance and a claim is queued.
    pub fn bid(
        &mut self,
        ledger: &mut DecayingLedger,
        bidder: Address,
        amount: Amount,
        fee_paid: Amount,
        now: Timestamp,
    ) -> Result<(), AuctionError> {
        if self.has_ended(now) {
            return Err(AuctionError::AuctionClosed);
        }

        let allowance = ledger.allowance(bidder, self.address);
        if allowance < amount {
            return Err(LedgerError::AmountNotUnlocked { allowance, need: amount }.into());
        }

        let needs_new = self.periods.last().is_none_or(|p| p.is_closed(now));
        if needs_new {
            if self.periods.len() >= self.config.max_periods {
                return Err(AuctionError::AuctionClosed);
            }
            if ledger.total_supply() < self.config.min_ledger_supply {
                return Err(AuctionError::BelowMinimumSupply);
            }
        }
        let period_count = self.periods.len() + usize::from(needs_new);

        let (min, max) = self.bid_band(period_count);
        if amount < min {
            return Err(AuctionError::BidTooSmall { amount, min });
        }
        if amount > max {
            return Err(AuctionError::BidTooHigh { amount, max });
        }

        let fee_due = self.fee_due(period_count, amount)?;
        if fee_paid < fee_due {
            return Err(AuctionError::AuctionFeeTooLow { paid: fee_paid, need: fee_due });
        }

        if self.num_claims_of(bidder) >= MAX_UNPROCESSED_CLAIMS {
            return Err(AuctionError::TooManyUnprocessedClaims);
        }

        let new_sink = self
            .sink_balance
            .checked_add(fee_paid)
            .ok_or(LedgerError::ValueOverflow)?;

        let have = ledger.spendable_balance(bidder, now);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount }.into());
        }

        // All checks passed; mutate.
        if needs_new {
            self.push_period(now);
        }
        ledger.burn_from(self.address, bidder, amount, &self.token, now)?;
        let index = self.periods.len() - 1;
        self.periods[index].total_bids += amount;
        self.sink_balance = new_sink;
        self.claims
            .entry(bidder)
            .or_default()
            .push(Claim { period: index as u64, bid: amount });

        debug!(bidder = %bidder, amount, period = index, "bid locked");
        Ok(())
    }

    /// Settle every claim of `account` whose period has closed.
    ///
    /// Pays `floor(bid * supply / total_bids)` gilt per settled claim and
    /// removes it, preserving the FIFO order of the remaining claims.
    /// Claims for still-open periods are skipped silently. Returns the
    /// total gilt paid out.
    pub fn claim(&mut self, account: Address, now: Timestamp) -> Result<Amount, AuctionError> {
        let Some(queue) = self.claims.get(&account) else {
            return Ok(0);
        };

        // First pass: compute payouts without mutating.
        let mut payouts: Vec<Option<Amount>> = Vec::with_capacity(queue.len());
        let mut total: Amount = 0;
        for claim in queue {
            let period = &self.periods[claim.period as usize];
            if period.is_closed(now) {
                let payout = mul_div(claim.bid, period.supply, period.total_bids)
                    .ok_or(LedgerError::ValueOverflow)?;
                total += payout;
                payouts.push(Some(payout));
            } else {
                payouts.push(None);
            }
        }
        if !self.token.can_mint(total) {
            return Err(AuctionError::MaxSupplyExceeded);
        }

        // Second pass: mint and rebuild the queue in order.
        let queue = self.claims.remove(&account).unwrap_or_default();
        let mut remaining = Vec::new();
        for (claim, payout) in queue.into_iter().zip(payouts) {
            match payout {
                Some(payout) => {
                    self.token.mint_unchecked(account, payout)?;
                    self.settled += payout;
                    debug!(account = %account, period = claim.period, payout, "claim settled");
                }
                None => remaining.push(claim),
            }
        }
        if !remaining.is_empty() {
            self.claims.insert(account, remaining);
        }
        Ok(total)
    }

    /// Transfer still-unallocated gilt once the auction has fully ended.
    ///
    /// The remaining supply is the sum of all periods' allocations minus
    /// everything already minted through claims or earlier transfers.
    pub fn transfer_unallocated(
        &mut self,
        caller: Address,
        to: Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<(), AuctionError> {
        self.ownership.require_owner(caller)?;
        if !self.has_ended(now) {
            return Err(AuctionError::AuctionNotEnded);
        }
        let remaining = self.allocated.saturating_sub(self.settled);
        if amount > remaining {
            return Err(AuctionError::InsufficientRemainingSupply { remaining });
        }
        self.token.mint_unchecked(to, amount)?;
        self.settled += amount;
        info!(to = %to, amount, "unallocated supply transferred");
        Ok(())
    }

    /// Withdraw base currency from the funding sink.
    ///
    /// Only the funding address may withdraw.
    pub fn withdraw(&mut self, caller: Address, amount: Amount) -> Result<(), AuctionError> {
        if caller != self.config.funding_address {
            return Err(AuctionError::NotAuthorized);
        }
        if amount > self.sink_balance {
            return Err(AuctionError::InsufficientFunds {
                have: self.sink_balance,
                need: amount,
            });
        }
        self.sink_balance -= amount;
        Ok(())
    }

    // --- owner-gated configuration ---

    pub fn owner(&self) -> Address {
        self.ownership.owner()
    }

    /// One-time handoff of auction administration (deployment wiring).
    pub fn set_owner_once(&mut self, caller: Address, new_owner: Address) -> Result<(), OwnershipError> {
        self.ownership.set_owner_once(caller, new_owner)
    }

    pub fn max_periods(&self) -> usize {
        self.config.max_periods
    }

    pub fn set_max_periods(&mut self, caller: Address, max_periods: usize) -> Result<(), AuctionError> {
        self.ownership.require_owner(caller)?;
        self.config.max_periods = max_periods;
        Ok(())
    }

    pub fn fee_per_unit(&self) -> Amount {
        self.config.fee_per_unit
    }

    pub fn set_fee(&mut self, caller: Address, fee_per_unit: Amount) -> Result<(), AuctionError> {
        self.ownership.require_owner(caller)?;
        self.config.fee_per_unit = fee_per_unit;
        Ok(())
    }

    pub fn funding_address(&self) -> Address {
        self.config.funding_address
    }

    pub fn set_funding_address(&mut self, caller: Address, addr: Address) -> Result<(), AuctionError> {
        self.ownership.require_owner(caller)?;
        self.config.funding_address = addr;
        Ok(())
    }

    // --- internals ---

    /// Bid band for a given period count: multiples of `min_bid`, wider
    /// once the count passes the fee ramp.
    fn bid_band(&self, period_count: usize) -> (Amount, Amount) {
        let (lo, hi) = if period_count > FEE_RAMP_PERIODS {
            LATE_BID_MULTIPLIERS
        } else {
            EARLY_BID_MULTIPLIERS
        };
        (self.config.min_bid * lo, self.config.min_bid * hi)
    }

    /// Proportional deposit fee due for a bid, zero before the ramp.
    fn fee_due(&self, period_count: usize, amount: Amount) -> Result<Amount, AuctionError> {
        if period_count <= FEE_RAMP_PERIODS {
            return Ok(0);
        }
        self.config
            .fee_per_unit
            .checked_mul(amount)
            .ok_or_else(|| LedgerError::ValueOverflow.into())
    }

    fn push_period(&mut self, now: Timestamp) -> u64 {
        let index = self.periods.len() as u64;
        let end_time = now + PERIOD_DURATION_SECS;
        self.periods.push(Period {
            end_time,
            supply: self.config.supply_per_period,
            total_bids: 0,
        });
        self.allocated += self.config.supply_per_period;
        info!(index, end_time, supply = self.config.supply_per_period, "new period");
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::config::LedgerConfig;
    use ember_core::constants::UNIT;
    use proptest::prelude::*;

    const DAY: u64 = PERIOD_DURATION_SECS;

    fn addr(seed: u8) -> Address {
        Address([seed; 32])
    }

    fn deployer() -> Address {
        addr(0)
    }

    fn auction_addr() -> Address {
        addr(100)
    }

    fn config(max_periods: usize) -> AuctionConfig {
        AuctionConfig {
            min_ledger_supply: 100,
            max_periods,
            supply_per_period: 100,
            min_bid: 100,
            funding_address: addr(5),
            fee_per_unit: 0,
        }
    }

    fn setup(max_periods: usize) -> (Auction, DecayingLedger) {
        let auction = Auction::new(deployer(), auction_addr(), config(max_periods));
        let ledger = DecayingLedger::new(deployer(), LedgerConfig::default());
        (auction, ledger)
    }

    /// Mint and approve `amount` for `account`, mirroring the bidder's
    /// unlock step.
    fn unlock(auction: &Auction, ledger: &mut DecayingLedger, account: Address, amount: Amount) {
        ledger
            .mint(deployer(), account, amount, auction.token(), 0)
            .unwrap();
        ledger.approve(account, auction.address(), amount);
    }

    // --- open_period ---

    #[test]
    fn open_period_requires_minimum_ledger_supply() {
        let (mut auction, ledger) = setup(2);
        assert_eq!(
            auction.open_period(ledger.total_supply(), 0),
            Err(AuctionError::BelowMinimumSupply)
        );
    }

    #[test]
    fn open_period_creates_24h_round_with_supply() {
        let (mut auction, mut ledger) = setup(2);
        ledger.mint(deployer(), addr(1), 100, auction.token(), 0).unwrap();
        let index = auction.open_period(ledger.total_supply(), 1_000).unwrap();
        assert_eq!(index, Some(0));
        assert_eq!(auction.num_periods(), 1);
        let period = auction.period(0).unwrap();
        assert_eq!(period.end_time, 1_000 + DAY);
        assert_eq!(period.supply, 100);
        assert_eq!(period.total_bids, 0);
    }

    #[test]
    fn open_period_is_a_noop_while_one_is_open() {
        let (mut auction, mut ledger) = setup(2);
        ledger.mint(deployer(), addr(1), 100, auction.token(), 0).unwrap();
        auction.open_period(ledger.total_supply(), 0).unwrap();
        assert_eq!(auction.open_period(ledger.total_supply(), 100), Ok(None));
        assert_eq!(auction.num_periods(), 1);
    }

    #[test]
    fn open_period_rejects_beyond_max_periods() {
        let (mut auction, mut ledger) = setup(2);
        ledger.mint(deployer(), addr(1), 100, auction.token(), 0).unwrap();
        auction.open_period(ledger.total_supply(), 0).unwrap();
        auction.open_period(ledger.total_supply(), DAY).unwrap();
        assert_eq!(auction.num_periods(), 2);
        assert_eq!(
            auction.open_period(ledger.total_supply(), 2 * DAY),
            Err(AuctionError::AuctionClosed)
        );
    }

    // --- bid ---

    #[test]
    fn bid_rejects_after_last_period_closes() {
        let (mut auction, mut ledger) = setup(1);
        unlock(&auction, &mut ledger, addr(1), 1_000);
        auction.bid(&mut ledger, addr(1), 1_000, 0, 0).unwrap();
        let err = auction.bid(&mut ledger, addr(1), 100, 0, DAY + 200).unwrap_err();
        assert_eq!(err, AuctionError::AuctionClosed);
    }

    #[test]
    fn bid_requires_minimum_ledger_supply() {
        let (mut auction, mut ledger) = setup(2);
        // Approval alone does not reach the supply floor.
        ledger.approve(addr(1), auction.address(), 1_000);
        let err = auction.bid(&mut ledger, addr(1), 1_000, 0, 0).unwrap_err();
        assert_eq!(err, AuctionError::BelowMinimumSupply);
        assert_eq!(auction.num_periods(), 0);
    }

    #[test]
    fn bid_requires_unlocked_amount() {
        let (mut auction, mut ledger) = setup(1);
        let err = auction.bid(&mut ledger, addr(1), 1_000, 0, 0).unwrap_err();
        assert!(matches!(
            err,
            AuctionError::Ledger(LedgerError::AmountNotUnlocked { .. })
        ));
    }

    #[test]
    fn bid_enforces_early_band() {
        let (mut auction, mut ledger) = setup(1);
        unlock(&auction, &mut ledger, addr(1), 100_000);

        let err = auction.bid(&mut ledger, addr(1), 99, 0, 0).unwrap_err();
        assert_eq!(err, AuctionError::BidTooSmall { amount: 99, min: 100 });

        // Max is min_bid * 10.
        let err = auction.bid(&mut ledger, addr(1), 1_001, 0, 0).unwrap_err();
        assert_eq!(err, AuctionError::BidTooHigh { amount: 1_001, max: 1_000 });

        // Exactly min_bid and exactly the cap are both accepted.
        auction.bid(&mut ledger, addr(1), 100, 0, 0).unwrap();
        auction.bid(&mut ledger, addr(1), 1_000, 0, 0).unwrap();
    }

    #[test]
    fn bid_burns_ember_and_queues_claim() {
        let (mut auction, mut ledger) = setup(1);
        unlock(&auction, &mut ledger, addr(1), 1_000);
        auction.bid(&mut ledger, addr(1), 1_000, 0, 0).unwrap();

        assert_eq!(ledger.spendable_balance(addr(1), 0), 0);
        assert_eq!(ledger.allowance(addr(1), auction.address()), 0);
        assert_eq!(auction.period(0).unwrap().total_bids, 1_000);
        assert_eq!(
            auction.claims_of(addr(1)),
            &[Claim { period: 0, bid: 1_000 }]
        );
    }

    #[test]
    fn bids_span_periods_lazily() {
        let (mut auction, mut ledger) = setup(2);
        unlock(&auction, &mut ledger, addr(1), 1_500);
        auction.bid(&mut ledger, addr(1), 500, 0, 0).unwrap();
        auction.bid(&mut ledger, addr(1), 500, 0, 10).unwrap();
        auction.bid(&mut ledger, addr(1), 500, 0, DAY + 100).unwrap();

        assert_eq!(auction.num_periods(), 2);
        assert_eq!(auction.period(0).unwrap().total_bids, 1_000);
        assert_eq!(auction.period(1).unwrap().total_bids, 500);
        assert_eq!(
            auction.claims_of(addr(1)),
            &[
                Claim { period: 0, bid: 500 },
                Claim { period: 0, bid: 500 },
                Claim { period: 1, bid: 500 },
            ]
        );
    }

    #[test]
    fn sixth_outstanding_claim_is_rejected() {
        let (mut auction, mut ledger) = setup(2);
        unlock(&auction, &mut ledger, addr(1), 600);
        for _ in 0..5 {
            auction.bid(&mut ledger, addr(1), 100, 0, 0).unwrap();
        }
        assert_eq!(auction.num_claims_of(addr(1)), 5);
        let err = auction.bid(&mut ledger, addr(1), 100, 0, 0).unwrap_err();
        assert_eq!(err, AuctionError::TooManyUnprocessedClaims);
    }

    #[test]
    fn bidding_resumes_after_a_claim_settles() {
        let (mut auction, mut ledger) = setup(3);
        unlock(&auction, &mut ledger, addr(1), 700);
        for _ in 0..5 {
            auction.bid(&mut ledger, addr(1), 100, 0, 0).unwrap();
        }
        auction.claim(addr(1), DAY + 100).unwrap();
        assert_eq!(auction.num_claims_of(addr(1)), 0);
        auction.bid(&mut ledger, addr(1), 100, 0, DAY + 100).unwrap();
    }

    // --- late band and deposit fee ---

    fn run_to_late_periods(auction: &mut Auction, ledger: &mut DecayingLedger) -> Timestamp {
        unlock(auction, ledger, addr(1), 100_000_000);
        let mut now = 0;
        for _ in 0..5 {
            auction.bid(ledger, addr(1), 100, 0, now).unwrap();
            now += DAY + 100;
        }
        auction.claim(addr(1), now).unwrap();
        for _ in 0..2 {
            auction.bid(ledger, addr(1), 100, 0, now).unwrap();
            now += DAY + 100;
        }
        now
    }

    #[test]
    fn late_periods_require_fifty_fold_minimum() {
        let (mut auction, mut ledger) = setup(10);
        auction.set_fee(deployer(), 1_000).unwrap();
        let now = run_to_late_periods(&mut auction, &mut ledger);

        // Period 8 is about to open: the late band applies.
        let err = auction
            .bid(&mut ledger, addr(1), 50 * 100 - 1, u128::MAX, now)
            .unwrap_err();
        assert!(matches!(err, AuctionError::BidTooSmall { .. }));
    }

    #[test]
    fn late_periods_require_proportional_fee() {
        let (mut auction, mut ledger) = setup(10);
        auction.set_fee(deployer(), 1_000).unwrap();
        let now = run_to_late_periods(&mut auction, &mut ledger);

        let bid = 50 * 100;
        let err = auction.bid(&mut ledger, addr(1), bid, 100, now).unwrap_err();
        assert_eq!(
            err,
            AuctionError::AuctionFeeTooLow { paid: 100, need: 1_000 * bid }
        );

        auction.bid(&mut ledger, addr(1), bid, 1_000 * bid, now).unwrap();
        assert_eq!(auction.sink_balance(), 1_000 * bid);
    }

    // --- claim ---

    #[test]
    fn sole_bidder_takes_whole_period_supply() {
        let (mut auction, mut ledger) = setup(2);
        auction.config.supply_per_period = 1_000;
        unlock(&auction, &mut ledger, addr(1), 500);
        auction.bid(&mut ledger, addr(1), 500, 0, 0).unwrap();
        auction.claim(addr(1), DAY + 100).unwrap();
        assert_eq!(auction.token().balance_of(addr(1)), 1_000);
        assert_eq!(auction.num_claims_of(addr(1)), 0);
    }

    #[test]
    fn open_period_claims_are_left_queued() {
        let (mut auction, mut ledger) = setup(2);
        auction.config.supply_per_period = 1_000;
        unlock(&auction, &mut ledger, addr(1), 500);
        auction.bid(&mut ledger, addr(1), 500, 0, 0).unwrap();
        auction.claim(addr(1), 100).unwrap();
        assert_eq!(auction.token().balance_of(addr(1)), 0);
        assert_eq!(auction.num_claims_of(addr(1)), 1);
    }

    #[test]
    fn same_account_double_bid_loses_one_unit_to_flooring() {
        let (mut auction, mut ledger) = setup(2);
        auction.config.supply_per_period = 1_000;
        unlock(&auction, &mut ledger, addr(1), 1_200);
        auction.bid(&mut ledger, addr(1), 500, 0, 0).unwrap();
        auction.bid(&mut ledger, addr(1), 700, 0, 0).unwrap();
        auction.claim(addr(1), DAY + 100).unwrap();
        // floor(500*1000/1200) + floor(700*1000/1200) = 416 + 583
        assert_eq!(auction.token().balance_of(addr(1)), 999);
    }

    #[test]
    fn three_bidders_split_pro_rata_exactly() {
        let (mut auction, mut ledger) = setup(2);
        auction.config.supply_per_period = 1_000;
        for (account, amount) in [(addr(1), 500), (addr(2), 700), (addr(3), 200)] {
            unlock(&auction, &mut ledger, account, amount);
            auction.bid(&mut ledger, account, amount, 0, 0).unwrap();
        }
        for account in [addr(1), addr(2), addr(3)] {
            auction.claim(account, DAY + 100).unwrap();
        }
        assert_eq!(auction.token().balance_of(addr(1)), 357);
        assert_eq!(auction.token().balance_of(addr(2)), 500);
        assert_eq!(auction.token().balance_of(addr(3)), 142);
    }

    #[test]
    fn settling_one_account_leaves_others_untouched() {
        let (mut auction, mut ledger) = setup(2);
        auction.config.supply_per_period = 1_000;
        for (account, amount) in [(addr(1), 500), (addr(2), 700), (addr(3), 200)] {
            unlock(&auction, &mut ledger, account, amount);
            auction.bid(&mut ledger, account, amount, 0, 0).unwrap();
        }
        auction.claim(addr(1), DAY + 100).unwrap();
        assert_eq!(auction.token().balance_of(addr(1)), 357);
        assert_eq!(auction.token().balance_of(addr(2)), 0);
        assert_eq!(auction.token().balance_of(addr(3)), 0);
        assert_eq!(auction.claims_of(addr(2)), &[Claim { period: 0, bid: 700 }]);
        assert_eq!(auction.claims_of(addr(3)), &[Claim { period: 0, bid: 200 }]);
    }

    #[test]
    fn settlement_preserves_fifo_of_remaining_claims() {
        let (mut auction, mut ledger) = setup(3);
        unlock(&auction, &mut ledger, addr(1), 500);
        auction.bid(&mut ledger, addr(1), 100, 0, 0).unwrap();
        auction.bid(&mut ledger, addr(1), 200, 0, DAY + 10).unwrap();
        auction.bid(&mut ledger, addr(1), 200, 0, 2 * (DAY + 10)).unwrap();
        // Settle just the first period; the later two claims keep order.
        auction.claim(addr(1), DAY + 10).unwrap();
        assert_eq!(
            auction.claims_of(addr(1)),
            &[
                Claim { period: 1, bid: 200 },
                Claim { period: 2, bid: 200 },
            ]
        );
    }

    #[test]
    fn one_bidder_across_two_periods_takes_both_supplies() {
        let (mut auction, mut ledger) = setup(2);
        auction.config.supply_per_period = 1_000;
        unlock(&auction, &mut ledger, addr(1), 1_000);
        auction.bid(&mut ledger, addr(1), 500, 0, 0).unwrap();
        auction.bid(&mut ledger, addr(1), 500, 0, DAY + 100).unwrap();
        assert_eq!(auction.num_periods(), 2);
        auction.claim(addr(1), 2 * (DAY + 100)).unwrap();
        assert_eq!(auction.token().balance_of(addr(1)), 2_000);
        assert_eq!(auction.num_claims_of(addr(1)), 0);
    }

    // --- transfer_unallocated ---

    #[test]
    fn unallocated_transfer_requires_auction_end() {
        let (mut auction, mut ledger) = setup(2);
        let err = auction
            .transfer_unallocated(deployer(), addr(3), 1_000, 0)
            .unwrap_err();
        assert_eq!(err, AuctionError::AuctionNotEnded);

        // One of two periods elapsed: still not ended.
        unlock(&auction, &mut ledger, addr(1), 100);
        auction.bid(&mut ledger, addr(1), 100, 0, 0).unwrap();
        let err = auction
            .transfer_unallocated(deployer(), addr(3), 1_000, DAY + 100)
            .unwrap_err();
        assert_eq!(err, AuctionError::AuctionNotEnded);
    }

    #[test]
    fn unallocated_transfer_is_bounded_by_unclaimed_allocation() {
        let (mut auction, mut ledger) = setup(1);
        auction.config.supply_per_period = 1_000;
        unlock(&auction, &mut ledger, addr(1), 100);
        auction.bid(&mut ledger, addr(1), 100, 0, 0).unwrap();
        auction.claim(addr(1), DAY + 100).unwrap();

        // The sole bidder claimed the full 1000; nothing remains.
        let err = auction
            .transfer_unallocated(deployer(), addr(3), 1, DAY + 100)
            .unwrap_err();
        assert_eq!(err, AuctionError::InsufficientRemainingSupply { remaining: 0 });
    }

    #[test]
    fn unallocated_transfer_mints_the_remainder() {
        let (mut auction, mut ledger) = setup(1);
        auction.config.supply_per_period = 1_000;
        unlock(&auction, &mut ledger, addr(1), 100);
        auction.bid(&mut ledger, addr(1), 100, 0, 0).unwrap();

        // No claim yet: the full allocation is transferable.
        auction
            .transfer_unallocated(deployer(), addr(3), 1_000, DAY + 100)
            .unwrap();
        assert_eq!(auction.token().balance_of(addr(3)), 1_000);
        assert_eq!(
            auction.transfer_unallocated(deployer(), addr(3), 1, DAY + 100),
            Err(AuctionError::InsufficientRemainingSupply { remaining: 0 })
        );
    }

    // --- funding sink ---

    #[test]
    fn sink_additions_are_overflow_checked() {
        let (mut auction, mut ledger) = setup(1);
        auction.fund(Amount::MAX).unwrap();
        assert_eq!(
            auction.fund(1),
            Err(AuctionError::Ledger(LedgerError::ValueOverflow))
        );

        // A bid whose fee payment would wrap the sink is rejected whole.
        unlock(&auction, &mut ledger, addr(1), 1_000);
        let err = auction.bid(&mut ledger, addr(1), 100, 1, 0).unwrap_err();
        assert_eq!(err, AuctionError::Ledger(LedgerError::ValueOverflow));
        assert_eq!(auction.num_claims_of(addr(1)), 0);
        assert_eq!(ledger.spendable_balance(addr(1), 0), 1_000);
        assert_eq!(auction.sink_balance(), Amount::MAX);
    }

    #[test]
    fn only_funding_address_withdraws() {
        let (mut auction, _) = setup(2);
        auction.fund(10 * UNIT).unwrap();
        assert_eq!(
            auction.withdraw(deployer(), 1_000),
            Err(AuctionError::NotAuthorized)
        );
        assert_eq!(
            auction.withdraw(addr(5), 11 * UNIT),
            Err(AuctionError::InsufficientFunds { have: 10 * UNIT, need: 11 * UNIT })
        );
        auction.withdraw(addr(5), 5 * UNIT).unwrap();
        assert_eq!(auction.sink_balance(), 5 * UNIT);
    }

    // --- properties ---

    proptest! {
        /// The early band accepts exactly `[min_bid, min_bid * 10]`.
        #[test]
        fn early_band_acceptance(amount in 0u128..=2_000) {
            let (mut auction, mut ledger) = setup(1);
            unlock(&auction, &mut ledger, addr(1), 100_000);
            let outcome = auction.bid(&mut ledger, addr(1), amount, 0, 0);
            if (100..=1_000).contains(&amount) {
                prop_assert!(outcome.is_ok());
            } else {
                let rejected = matches!(
                    outcome,
                    Err(AuctionError::BidTooSmall { .. } | AuctionError::BidTooHigh { .. })
                );
                prop_assert!(rejected, "unexpected outcome: {:?}", outcome);
            }
        }

        /// Pro-rata settlement of one period never exceeds its supply.
        #[test]
        fn settlement_never_exceeds_period_supply(
            a in 100u128..=1_000,
            b in 100u128..=1_000,
        ) {
            let (mut auction, mut ledger) = setup(1);
            auction.config.supply_per_period = 999;
            unlock(&auction, &mut ledger, addr(1), a);
            unlock(&auction, &mut ledger, addr(2), b);
            auction.bid(&mut ledger, addr(1), a, 0, 0).unwrap();
            auction.bid(&mut ledger, addr(2), b, 0, 0).unwrap();
            let paid_a = auction.claim(addr(1), DAY + 1).unwrap();
            let paid_b = auction.claim(addr(2), DAY + 1).unwrap();
            prop_assert!(paid_a + paid_b <= 999);
            prop_assert!(999 - (paid_a + paid_b) < 2);
        }
    }

    // --- admin setters ---

    #[test]
    fn setters_are_owner_gated() {
        let (mut auction, _) = setup(2);
        assert!(auction.set_max_periods(addr(2), 10).is_err());
        auction.set_max_periods(deployer(), 10).unwrap();
        assert_eq!(auction.max_periods(), 10);

        assert!(auction.set_fee(addr(2), 10_000).is_err());
        auction.set_fee(deployer(), 10_000).unwrap();
        assert_eq!(auction.fee_per_unit(), 10_000);

        assert!(auction.set_funding_address(addr(2), addr(6)).is_err());
        auction.set_funding_address(deployer(), addr(6)).unwrap();
        assert_eq!(auction.funding_address(), addr(6));
    }
}
