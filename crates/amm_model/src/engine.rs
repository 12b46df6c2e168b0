//! Pool engine: liquidity additions and swaps against the constant product
//!
//! Every operation is a load → validate → mutate → save transaction against
//! the injected [`StateStore`]. Validation happens on a loaded copy; nothing
//! is saved unless every check passes, and a failed save leaves the previous
//! state as the committed one.

use log::{debug, info, warn};

use crate::math::{amount_out, price_impact_pct, reserves_after, validate_amount};
use crate::state::{Direction, Pool, State, Wallet};
use crate::store::{StateStore, StoreError};
use crate::{AmmError, Result};

/// Priced but uncommitted swap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapQuote {
    pub direction: Direction,
    pub amount_in: f64,
    pub amount_out: f64,
    /// Output per unit input before the trade
    pub spot_price: f64,
    /// Output per unit input actually received
    pub effective_price: f64,
    pub price_impact_pct: f64,
}

/// Committed swap together with the state it produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapResult {
    pub direction: Direction,
    pub amount_in: f64,
    pub amount_out: f64,
    pub pool: Pool,
    pub wallet: Wallet,
}

pub struct PoolEngine<S> {
    store: S,
}

impl<S: StateStore> PoolEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn pool_status(&self) -> Result<Pool> {
        Ok(self.store.load()?.pool)
    }

    pub fn user_balance(&self) -> Result<Wallet> {
        Ok(self.store.load()?.wallet)
    }

    /// Deposit `amount_a` of A and the same nominal amount of B.
    ///
    /// The contribution ratio is fixed at 1:1 regardless of the pool price,
    /// and the wallet is not debited. K is recomputed from the new reserves.
    pub fn add_liquidity(&mut self, amount_a: f64) -> Result<Pool> {
        let amount = validate_amount(amount_a).map_err(|e| rejected("add_liquidity", e))?;
        let mut state = self.store.load()?;

        let pool = &mut state.pool;
        pool.reserve_a += amount;
        pool.reserve_b += amount;
        pool.k = pool.reserve_a * pool.reserve_b;

        self.commit("add_liquidity", &state)?;
        info!(
            "liquidity added: amount={} reserves=({}, {}) k={}",
            amount, state.pool.reserve_a, state.pool.reserve_b, state.pool.k
        );
        Ok(state.pool)
    }

    /// Price a swap against the current state without committing it.
    pub fn quote(&self, direction: Direction, amount_in: f64) -> Result<SwapQuote> {
        let amount_in = validate_amount(amount_in).map_err(|e| rejected("quote", e))?;
        let state = self.store.load()?;
        price_swap(&state, direction, amount_in).map_err(|e| rejected("quote", e))
    }

    /// Swap `amount_in` of the direction's input asset for its output asset.
    ///
    /// K is held fixed, so the reserve product after the trade equals K up
    /// to floating-point rounding.
    pub fn swap(&mut self, direction: Direction, amount_in: f64) -> Result<SwapResult> {
        let amount_in = validate_amount(amount_in).map_err(|e| rejected("swap", e))?;
        let mut state = self.store.load()?;
        let quote = price_swap(&state, direction, amount_in).map_err(|e| rejected("swap", e))?;

        let (input, output) = (direction.input(), direction.output());
        let (reserve_in, _) = state.pool.reserves(direction);
        let (new_reserve_in, new_reserve_out) = reserves_after(reserve_in, state.pool.k, amount_in);
        *state.wallet.balance_mut(input) -= amount_in;
        *state.wallet.balance_mut(output) += quote.amount_out;
        *state.pool.reserve_mut(input) = new_reserve_in;
        *state.pool.reserve_mut(output) = new_reserve_out;

        self.commit("swap", &state)?;
        info!(
            "swap {}: in={} out={} reserves=({}, {})",
            direction, amount_in, quote.amount_out, state.pool.reserve_a, state.pool.reserve_b
        );
        debug!(
            "k={} product={} drift={:e}",
            state.pool.k,
            state.pool.product(),
            state.pool.product() - state.pool.k
        );

        Ok(SwapResult {
            direction,
            amount_in,
            amount_out: quote.amount_out,
            pool: state.pool,
            wallet: state.wallet,
        })
    }

    /// Save `state` only if the next load would accept it.
    fn commit(&mut self, op: &str, state: &State) -> Result<()> {
        state.validate().map_err(|e| {
            let reason = match e {
                StoreError::Corrupt { reason } => reason,
                other => other.to_string(),
            };
            rejected(op, AmmError::InvalidResult { reason })
        })?;
        self.store.save(state)?;
        Ok(())
    }
}

fn price_swap(state: &State, direction: Direction, amount_in: f64) -> Result<SwapQuote> {
    let input = direction.input();
    let available = state.wallet.balance(input);
    if amount_in > available {
        return Err(AmmError::InsufficientBalance {
            asset: input,
            available,
            requested: amount_in,
        });
    }

    let (reserve_in, reserve_out) = state.pool.reserves(direction);
    let out = amount_out(reserve_in, reserve_out, state.pool.k, amount_in)?;

    Ok(SwapQuote {
        direction,
        amount_in,
        amount_out: out,
        spot_price: reserve_out / reserve_in,
        effective_price: out / amount_in,
        price_impact_pct: price_impact_pct(reserve_in, amount_in),
    })
}

fn rejected(op: &str, err: AmmError) -> AmmError {
    warn!("{} rejected: {}", op, err);
    err
}
