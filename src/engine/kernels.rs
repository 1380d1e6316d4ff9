// src/engine/kernels.rs
//
// Adapters that expose the numeric routines as routable kernels.
// Payload parsing happens here, once, so the routines only ever see fully
// defaulted parameters.

use crate::error::{EngineError, Result};
use crate::models::{ComputeResult, RequestKind};
use crate::normalizer::normalize_account;
use crate::optimizer::{optimize_portfolio, OptimizationParams, SharpeConfig};
use crate::pricing::{simulate_price_paths, GbmConfig, SimulationParams};
use crate::traits::{Kernel, KernelOutput};
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Reads a payload as `T`. A missing payload reads as an empty object.
fn parse_payload<T: DeserializeOwned>(kind: RequestKind, payload: Value) -> Result<T> {
    let payload = match payload {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| EngineError::malformed_payload(kind.as_str(), e))
}

/// `SIMULATE_PRICE_PATHS`
pub struct SimulationKernel {
    config: GbmConfig,
}

impl SimulationKernel {
    pub fn new(config: GbmConfig) -> Self {
        Self { config }
    }
}

impl Kernel for SimulationKernel {
    fn kind(&self) -> RequestKind {
        RequestKind::SimulatePricePaths
    }

    fn compute(&self, payload: Value, rng: &mut dyn RngCore) -> Result<KernelOutput> {
        let kind = self.kind();
        let params: SimulationParams = parse_payload(kind, payload)?;
        KernelOutput::timed(|| {
            simulate_price_paths(&params, &self.config, rng)
                .map(ComputeResult::Simulation)
                .map_err(|e| EngineError::allocation_failed(kind.as_str(), e))
        })
    }
}

/// `OPTIMIZE_PORTFOLIO`
pub struct OptimizerKernel {
    config: SharpeConfig,
}

impl OptimizerKernel {
    pub fn new(config: SharpeConfig) -> Self {
        Self { config }
    }
}

impl Kernel for OptimizerKernel {
    fn kind(&self) -> RequestKind {
        RequestKind::OptimizePortfolio
    }

    fn compute(&self, payload: Value, rng: &mut dyn RngCore) -> Result<KernelOutput> {
        let params: OptimizationParams = parse_payload(self.kind(), payload)?;
        KernelOutput::timed(|| {
            Ok(ComputeResult::Optimization(optimize_portfolio(&params, &self.config, rng)))
        })
    }
}

/// `NORMALIZE_ACCOUNT_DATA`. Accepts any payload.
pub struct NormalizerKernel;

impl Kernel for NormalizerKernel {
    fn kind(&self) -> RequestKind {
        RequestKind::NormalizeAccountData
    }

    fn compute(&self, payload: Value, _rng: &mut dyn RngCore) -> Result<KernelOutput> {
        KernelOutput::timed(|| Ok(ComputeResult::Account(normalize_account(&payload))))
    }
}
