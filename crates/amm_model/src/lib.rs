//! AMM Model - Constant product pool engine (x·y=k) for the DEX simulator
//!
//! This crate holds everything that decides what a liquidity addition or a
//! swap does to the pool and the user's wallet. It never touches the
//! filesystem or the terminal: state comes in and goes out through a
//! [`StateStore`], so the same engine runs against the JSON file used by the
//! CLI and against [`MemoryStore`] in tests.

pub mod engine;
pub mod math;
pub mod state;
pub mod store;

pub use engine::{PoolEngine, SwapQuote, SwapResult};
pub use math::{amount_out, parse_amount, price_impact_pct, reserves_after, validate_amount};
pub use state::{Asset, Direction, Pool, State, Wallet};
pub use store::{MemoryStore, StateStore, StoreError};

/// Relative tolerance used when comparing K against the reserve product.
pub const K_TOLERANCE: f64 = 1e-9;

/// Error types for pool engine operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmmError {
    /// Non-numeric, non-finite or non-positive quantity
    #[error("Invalid amount '{input}': expected a number greater than zero")]
    InvalidAmount { input: String },

    /// Wallet does not hold enough of the input asset
    #[error("Insufficient {asset} balance: have {available}, need {requested}")]
    InsufficientBalance {
        asset: Asset,
        available: f64,
        requested: f64,
    },

    /// Pool has no liquidity to price a swap against
    #[error("Pool has no liquidity; add liquidity before swapping")]
    EmptyPool,

    /// Input too small to move the curve at floating-point precision
    #[error("Swap of {amount_in} is too small to produce any output")]
    OutputTooSmall { amount_in: f64 },

    /// Swap would drain the output reserve
    #[error("Insufficient liquidity in pool")]
    InsufficientLiquidity,

    /// Operation would commit a state that fails validation
    #[error("Operation rejected: result is out of range ({reason})")]
    InvalidResult { reason: String },

    /// Backing store could not be read or written
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// Convenience alias so every module can write `Result<T>`.
pub type Result<T> = std::result::Result<T, AmmError>;
