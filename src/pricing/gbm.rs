// src/pricing/gbm.rs
//
// Monte Carlo price-path simulation under Geometric Brownian Motion.
// Produces a sample fan of paths for display, closed-form quantile bands,
// and risk statistics over the simulated terminal values.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::TryReserveError;
use std::f64::consts::PI;

/// One-sided 95% z-score used for the p5/p95 envelopes.
pub const Z_95: f64 = 1.645;

// =============================================================================
// Input / Settings
// =============================================================================

/// Request payload for `SIMULATE_PRICE_PATHS`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    #[serde(default = "default_initial_value")]
    pub initial_value: f64,
    /// Annualized drift
    #[serde(default = "default_mean_return")]
    pub mean_return: f64,
    /// Annualized volatility
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    /// Any JSON number; fractional values act as loop bounds
    #[serde(default = "default_time_horizon_days")]
    pub time_horizon_days: f64,
    #[serde(default = "default_iterations")]
    pub iterations: f64,
}

fn default_initial_value() -> f64 {
    1_000_000.0
}

fn default_mean_return() -> f64 {
    0.08
}

fn default_volatility() -> f64 {
    0.15
}

fn default_time_horizon_days() -> f64 {
    252.0
}

fn default_iterations() -> f64 {
    1000.0
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            initial_value: default_initial_value(),
            mean_return: default_mean_return(),
            volatility: default_volatility(),
            time_horizon_days: default_time_horizon_days(),
            iterations: default_iterations(),
        }
    }
}

/// Engine-side settings for the simulator (the `[simulation]` config section).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GbmConfig {
    /// Steps per year; the time step is its reciprocal
    #[serde(default = "default_trading_days_per_year")]
    pub trading_days_per_year: f64,
    /// Number of full paths kept for visualization
    #[serde(default = "default_sample_paths")]
    pub sample_paths: usize,
}

fn default_trading_days_per_year() -> f64 {
    252.0
}

fn default_sample_paths() -> usize {
    50
}

impl Default for GbmConfig {
    fn default() -> Self {
        Self {
            trading_days_per_year: default_trading_days_per_year(),
            sample_paths: default_sample_paths(),
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Analytic p5/p50/p95 envelopes, one value per time step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quantiles {
    pub p5: Vec<f64>,
    pub p50: Vec<f64>,
    pub p95: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Full paths of the first few trials
    pub paths: Vec<Vec<f64>>,
    pub quantiles: Quantiles,
    pub percentile5: f64,
    pub percentile50: f64,
    pub percentile95: f64,
    pub expected_value: f64,
    /// Fraction of trials ending below the initial value
    pub probability_of_loss: f64,
    pub expected_return: f64,
    pub iterations_run: usize,
}

// =============================================================================
// Simulation
// =============================================================================

/// Draws a standard normal variate with the Box-Muller transform.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // u1 in (0, 1] keeps the log finite
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Number of trials: the integers `i` with `0 <= i < iterations`.
pub fn trial_count(iterations: f64) -> usize {
    if iterations > 0.0 {
        iterations.ceil() as usize
    } else {
        0
    }
}

/// Number of simulated steps: the integers `t` with `1 <= t <= days`.
pub fn step_count(days: f64) -> usize {
    if days >= 1.0 {
        days.floor() as usize
    } else {
        0
    }
}

/// Number of envelope points: the integers `t` with `0 <= t <= days`.
fn envelope_len(days: f64) -> usize {
    if days >= 0.0 {
        (days.floor() as usize).saturating_add(1)
    } else {
        0
    }
}

/// Allocates room for `len` values, reporting failure instead of aborting.
fn reserve<T>(len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)?;
    Ok(v)
}

/// Runs the Monte Carlo simulation.
///
/// Non-positive `iterations` or `time_horizon_days` are not rejected: they
/// produce an empty sample or single-point paths respectively. Sizes too
/// large to allocate are returned as an error before any work starts.
pub fn simulate_price_paths<R: Rng + ?Sized>(
    params: &SimulationParams,
    config: &GbmConfig,
    rng: &mut R,
) -> Result<SimulationResult, TryReserveError> {
    let dt = 1.0 / config.trading_days_per_year;
    let steps = step_count(params.time_horizon_days);
    let trials = trial_count(params.iterations);

    let quantiles = analytic_quantiles(params, dt)?;

    let drift = (params.mean_return - 0.5 * params.volatility.powi(2)) * dt;
    let diffusion = params.volatility * dt.sqrt();

    let mut paths = Vec::with_capacity(trials.min(config.sample_paths));
    let mut terminal_values = reserve(trials)?;

    for trial in 0..trials {
        let keep_path = trial < config.sample_paths;
        let mut path = if keep_path {
            reserve(steps.saturating_add(1))?
        } else {
            Vec::new()
        };
        let mut value = params.initial_value;
        if keep_path {
            path.push(value);
        }

        for _ in 0..steps {
            let z = standard_normal(rng);
            value *= (drift + diffusion * z).exp();
            if keep_path {
                path.push(value);
            }
        }

        terminal_values.push(value);
        if keep_path {
            paths.push(path);
        }
    }

    let stats = TerminalStats::from_values(terminal_values, params.initial_value);

    Ok(SimulationResult {
        paths,
        quantiles,
        percentile5: stats.p5,
        percentile50: stats.p50,
        percentile95: stats.p95,
        expected_value: stats.mean,
        probability_of_loss: stats.prob_loss,
        expected_return: (stats.mean - params.initial_value) / params.initial_value,
        iterations_run: trials,
    })
}

/// Closed-form log-normal quantiles of GBM at every step `0..=time_horizon_days`.
///
/// These do not depend on the Monte Carlo draws.
pub fn analytic_quantiles(
    params: &SimulationParams,
    dt: f64,
) -> Result<Quantiles, TryReserveError> {
    let n = envelope_len(params.time_horizon_days);
    let log_initial = params.initial_value.ln();
    let drift = params.mean_return - 0.5 * params.volatility.powi(2);
    // Sign of the volatility does not change the distribution
    let vol = params.volatility.abs();

    let mut quantiles = Quantiles {
        p5: reserve(n)?,
        p50: reserve(n)?,
        p95: reserve(n)?,
    };

    for i in 0..n {
        let t = i as f64 * dt;
        let mu = log_initial + drift * t;
        let sigma = vol * t.sqrt();
        quantiles.p5.push((mu - Z_95 * sigma).exp());
        quantiles.p50.push(mu.exp());
        quantiles.p95.push((mu + Z_95 * sigma).exp());
    }

    Ok(quantiles)
}

/// Summary statistics over the terminal values of all trials.
struct TerminalStats {
    p5: f64,
    p50: f64,
    p95: f64,
    mean: f64,
    prob_loss: f64,
}

impl TerminalStats {
    fn from_values(mut values: Vec<f64>, initial_value: f64) -> Self {
        if values.is_empty() {
            return Self {
                p5: initial_value,
                p50: initial_value,
                p95: initial_value,
                mean: initial_value,
                prob_loss: 0.0,
            };
        }

        values.sort_by(|a, b| a.total_cmp(b));
        let n = values.len();
        let at = |p: f64| values[((n as f64 * p).floor() as usize).min(n - 1)];

        let mean = values.iter().sum::<f64>() / n as f64;
        let losses = values.iter().filter(|&&v| v < initial_value).count();

        Self {
            p5: at(0.05),
            p50: at(0.50),
            p95: at(0.95),
            mean,
            prob_loss: losses as f64 / n as f64,
        }
    }
}
