// src/traits.rs

use crate::error::Result;
use crate::models::{ComputeResult, RequestKind, ResponseEnvelope};
use async_trait::async_trait;
use rand::RngCore;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// A kernel's result together with the time spent computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelOutput {
    pub result: ComputeResult,
    /// Milliseconds spent in the computation, excluding payload parsing
    pub duration_ms: f64,
}

impl KernelOutput {
    /// Runs `f` and records how long it took.
    pub fn timed<F>(f: F) -> Result<Self>
    where
        F: FnOnce() -> Result<ComputeResult>,
    {
        let started = Instant::now();
        let result = f()?;
        Ok(Self {
            result,
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

/// A numeric computation the dispatcher can route requests to.
///
/// Kernels are stateless: everything they read comes from the payload and
/// every random draw comes from the generator handed in for that request.
pub trait Kernel: Send + Sync {
    /// The request kind this kernel answers.
    fn kind(&self) -> RequestKind;

    /// Parses the payload and runs the computation to completion.
    ///
    /// The reported duration covers the computation only.
    fn compute(&self, payload: Value, rng: &mut dyn RngCore) -> Result<KernelOutput>;
}

/// Kernels are shared between the dispatcher's routing table and callers.
pub type SharedKernel = Arc<dyn Kernel>;

/// A stream of responses emitted by the worker.
#[async_trait]
pub trait ResponseStream: Send + Unpin {
    /// Waits for the next response; `None` once the worker has shut down.
    async fn next(&mut self) -> Option<ResponseEnvelope>;
}
