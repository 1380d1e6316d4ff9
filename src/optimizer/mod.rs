// src/optimizer/mod.rs
//
// Sharpe-ratio portfolio optimizer using randomized weight search.

pub mod sharpe;

pub use sharpe::{
    optimize_portfolio, Asset, AssetAllocation, OptimizationParams, OptimizationResult,
    OptimizationStatus, SharpeConfig,
};
