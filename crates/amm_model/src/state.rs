//! Pool and wallet records, and the persisted state that groups them

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::store::StoreError;
use crate::K_TOLERANCE;

/// One side of the trading pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Asset {
    A,
    B,
}

impl Asset {
    pub fn other(self) -> Asset {
        match self {
            Asset::A => Asset::B,
            Asset::B => Asset::A,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::A => write!(f, "Token A"),
            Asset::B => write!(f, "Token B"),
        }
    }
}

/// Which asset the user pays in and which one they receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    AToB,
    BToA,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::AToB, Direction::BToA];

    /// Asset debited from the wallet and credited to the pool
    pub fn input(self) -> Asset {
        match self {
            Direction::AToB => Asset::A,
            Direction::BToA => Asset::B,
        }
    }

    /// Asset debited from the pool and credited to the wallet
    pub fn output(self) -> Asset {
        self.input().other()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input(), self.output())
    }
}

/// Two-asset reserve priced by the constant product `k = reserve_a * reserve_b`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pool {
    #[serde(rename = "tokenA")]
    pub reserve_a: f64,
    #[serde(rename = "tokenB")]
    pub reserve_b: f64,
    #[serde(rename = "K")]
    pub k: f64,
}

impl Pool {
    /// Pool with K derived from the reserves
    pub fn new(reserve_a: f64, reserve_b: f64) -> Self {
        Self {
            reserve_a,
            reserve_b,
            k: reserve_a * reserve_b,
        }
    }

    pub fn reserve(&self, asset: Asset) -> f64 {
        match asset {
            Asset::A => self.reserve_a,
            Asset::B => self.reserve_b,
        }
    }

    pub(crate) fn reserve_mut(&mut self, asset: Asset) -> &mut f64 {
        match asset {
            Asset::A => &mut self.reserve_a,
            Asset::B => &mut self.reserve_b,
        }
    }

    /// `(reserve_in, reserve_out)` for a swap in `direction`
    pub fn reserves(&self, direction: Direction) -> (f64, f64) {
        (
            self.reserve(direction.input()),
            self.reserve(direction.output()),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.k <= 0.0 || self.reserve_a <= 0.0 || self.reserve_b <= 0.0
    }

    pub fn product(&self) -> f64 {
        self.reserve_a * self.reserve_b
    }

    /// Marginal output received per unit of input, before price impact.
    pub fn spot_price(&self, direction: Direction) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let (reserve_in, reserve_out) = self.reserves(direction);
        Some(reserve_out / reserve_in)
    }
}

/// The single user's off-pool balances
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wallet {
    #[serde(rename = "tokenA")]
    pub balance_a: f64,
    #[serde(rename = "tokenB")]
    pub balance_b: f64,
}

impl Wallet {
    pub fn new(balance_a: f64, balance_b: f64) -> Self {
        Self {
            balance_a,
            balance_b,
        }
    }

    pub fn balance(&self, asset: Asset) -> f64 {
        match asset {
            Asset::A => self.balance_a,
            Asset::B => self.balance_b,
        }
    }

    pub(crate) fn balance_mut(&mut self, asset: Asset) -> &mut f64 {
        match asset {
            Asset::A => &mut self.balance_a,
            Asset::B => &mut self.balance_b,
        }
    }
}

/// Everything persisted between invocations
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct State {
    pub pool: Pool,
    #[serde(rename = "userBalance")]
    pub wallet: Wallet,
}

impl State {
    pub fn new(pool: Pool, wallet: Wallet) -> Self {
        Self { pool, wallet }
    }

    /// Reject states the engine must never operate on.
    ///
    /// Every figure must be finite and non-negative, a positive K needs both
    /// reserves positive, and K must match the reserve product within
    /// [`K_TOLERANCE`] relative error.
    pub fn validate(&self) -> Result<(), StoreError> {
        let figures = [
            ("pool.tokenA", self.pool.reserve_a),
            ("pool.tokenB", self.pool.reserve_b),
            ("pool.K", self.pool.k),
            ("userBalance.tokenA", self.wallet.balance_a),
            ("userBalance.tokenB", self.wallet.balance_b),
        ];
        for (field, value) in figures {
            if !value.is_finite() || value < 0.0 {
                return Err(StoreError::Corrupt {
                    reason: format!("{field} must be a finite non-negative number, found {value}"),
                });
            }
        }

        let pool = &self.pool;
        if pool.k > 0.0 && (pool.reserve_a <= 0.0 || pool.reserve_b <= 0.0) {
            return Err(StoreError::Corrupt {
                reason: format!(
                    "K is {} but a reserve is empty (tokenA={}, tokenB={})",
                    pool.k, pool.reserve_a, pool.reserve_b
                ),
            });
        }

        let product = pool.product();
        let scale = pool.k.max(product);
        if (pool.k - product).abs() > K_TOLERANCE * scale {
            return Err(StoreError::Corrupt {
                reason: format!("K is {} but tokenA * tokenB is {}", pool.k, product),
            });
        }

        Ok(())
    }
}
