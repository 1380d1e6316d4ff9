// src/optimizer/sharpe.rs
//
// Randomized search for a high-Sharpe allocation.
// Expected return and volatility of each candidate are synthetic uniform
// draws rather than statistics of the assets themselves.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Symbols used when the request carries no assets.
pub const PLACEHOLDER_SYMBOLS: [&str; 5] = ["SPY", "QQQ", "TLT", "GLD", "VNQ"];

/// Range of the synthetic expected return drawn per candidate.
const RETURN_RANGE: (f64, f64) = (0.05, 0.15);

/// Range of the synthetic volatility drawn per candidate.
const VOLATILITY_RANGE: (f64, f64) = (0.10, 0.30);

// =============================================================================
// Input / Settings
// =============================================================================

/// An asset offered to the optimizer. Extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
}

impl Asset {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into() }
    }
}

/// Request payload for `OPTIMIZE_PORTFOLIO`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationParams {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

fn default_risk_free_rate() -> f64 {
    0.02
}

impl Default for OptimizationParams {
    fn default() -> Self {
        Self {
            assets: Vec::new(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

/// Engine-side settings for the optimizer (the `[optimizer]` config section).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SharpeConfig {
    /// Number of random candidates evaluated
    #[serde(default = "default_search_iterations")]
    pub search_iterations: usize,
}

fn default_search_iterations() -> usize {
    5000
}

impl Default for SharpeConfig {
    fn default() -> Self {
        Self {
            search_iterations: default_search_iterations(),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub symbol: String,
    /// Fraction of the portfolio, in [0, 1]
    pub allocation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizationStatus {
    Optimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub expected_return: f64,
    pub expected_risk: f64,
    pub sharpe_ratio: f64,
    /// Sorted by allocation, largest first
    pub allocations: Vec<AssetAllocation>,
    pub status: OptimizationStatus,
}

// =============================================================================
// Search
// =============================================================================

/// Best candidate seen so far.
struct Candidate {
    weights: Vec<f64>,
    expected_return: f64,
    volatility: f64,
    sharpe: f64,
}

/// Searches random weight vectors for the best Sharpe ratio.
pub fn optimize_portfolio<R: Rng + ?Sized>(
    params: &OptimizationParams,
    config: &SharpeConfig,
    rng: &mut R,
) -> OptimizationResult {
    let symbols: Vec<String> = if params.assets.is_empty() {
        PLACEHOLDER_SYMBOLS.iter().map(|s| s.to_string()).collect()
    } else {
        params.assets.iter().map(|a| a.symbol.clone()).collect()
    };

    let n = symbols.len();
    // Equal weights stand in if the search runs zero times
    let mut best = Candidate {
        weights: vec![1.0 / n as f64; n],
        expected_return: 0.0,
        volatility: 0.0,
        sharpe: f64::NEG_INFINITY,
    };

    for _ in 0..config.search_iterations {
        let mut weights: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            continue;
        }
        for w in &mut weights {
            *w /= total;
        }

        let expected_return = rng.gen_range(RETURN_RANGE.0..RETURN_RANGE.1);
        let volatility = rng.gen_range(VOLATILITY_RANGE.0..VOLATILITY_RANGE.1);
        let sharpe = (expected_return - params.risk_free_rate) / volatility;

        if sharpe > best.sharpe {
            best = Candidate {
                weights,
                expected_return,
                volatility,
                sharpe,
            };
        }
    }

    let mut allocations: Vec<AssetAllocation> = symbols
        .into_iter()
        .zip(best.weights)
        .map(|(symbol, allocation)| AssetAllocation { symbol, allocation })
        .collect();
    allocations.sort_by(|a, b| b.allocation.total_cmp(&a.allocation));

    let sharpe_ratio = if best.sharpe.is_finite() { best.sharpe } else { 0.0 };

    OptimizationResult {
        expected_return: best.expected_return,
        expected_risk: best.volatility,
        sharpe_ratio,
        allocations,
        status: OptimizationStatus::Optimal,
    }
}
