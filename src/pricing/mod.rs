// src/pricing/mod.rs
//
// Price-path simulation under Geometric Brownian Motion.

pub mod gbm;

pub use gbm::{simulate_price_paths, GbmConfig, Quantiles, SimulationParams, SimulationResult};
