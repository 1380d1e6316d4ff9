// src/engine/dispatcher.rs

use super::kernels::{NormalizerKernel, OptimizerKernel, SimulationKernel};
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::models::{RequestEnvelope, RequestKind, ResponseEnvelope};
use crate::traits::{KernelOutput, SharedKernel};
use log::{debug, info, warn};
use rand::RngCore;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Routes request envelopes to kernels and wraps the outcome in a response.
///
/// Every request gets exactly one response carrying its correlation id:
/// unknown kinds, malformed payloads and kernel panics all become ERROR
/// envelopes.
pub struct Dispatcher {
    /// Maps request kind -> kernel that computes it
    routing_table: HashMap<RequestKind, SharedKernel>,
}

impl Dispatcher {
    /// Creates a dispatcher with the three built-in kernels.
    pub fn new(config: &Config) -> Self {
        Self::with_kernels(vec![
            Arc::new(SimulationKernel::new(config.simulation.clone())),
            Arc::new(OptimizerKernel::new(config.optimizer.clone())),
            Arc::new(NormalizerKernel),
        ])
    }

    /// Creates a dispatcher from an explicit kernel list.
    /// A later kernel replaces an earlier one registered for the same kind.
    pub fn with_kernels(kernels: Vec<SharedKernel>) -> Self {
        let mut routing_table = HashMap::new();
        for kernel in kernels {
            routing_table.insert(kernel.kind(), kernel);
        }

        info!("Dispatcher initialized with {} kernels", routing_table.len());

        Self { routing_table }
    }

    /// Kinds this dispatcher can serve.
    pub fn supported_kinds(&self) -> Vec<RequestKind> {
        let mut kinds: Vec<RequestKind> = self.routing_table.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    /// Handles one request synchronously.
    pub fn dispatch(&self, request: RequestEnvelope, rng: &mut dyn RngCore) -> ResponseEnvelope {
        let RequestEnvelope {
            kind,
            payload,
            correlation_id,
        } = request;

        match self.execute(&kind, payload, rng) {
            Ok(KernelOutput { result, duration_ms }) => {
                debug!("{} [{}] completed in {:.3}ms", kind, correlation_id, duration_ms);
                ResponseEnvelope::success(correlation_id, result, duration_ms)
            }
            Err(e) => {
                warn!("{} [{}] failed: {}", kind, correlation_id, e);
                ResponseEnvelope::error(correlation_id, e.to_string())
            }
        }
    }

    /// Routes one computation; the kernel reports its own duration.
    fn execute(&self, kind: &str, payload: Value, rng: &mut dyn RngCore) -> Result<KernelOutput> {
        let kernel = kind
            .parse::<RequestKind>()
            .ok()
            .and_then(|k| self.routing_table.get(&k))
            .ok_or_else(|| EngineError::unknown_kind(kind))?;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| kernel.compute(payload, rng)));

        match outcome {
            Ok(output) => output,
            Err(panic) => Err(EngineError::kernel_panicked(kind, panic_message(panic.as_ref()))),
        }
    }
}

/// Extracts the message of a panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "kernel panicked".to_string()
    }
}
