// src/models.rs

use crate::normalizer::NormalizedAccount;
use crate::optimizer::OptimizationResult;
use crate::pricing::SimulationResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Request Kinds
// =============================================================================

/// The computations the engine knows how to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    SimulatePricePaths,
    OptimizePortfolio,
    NormalizeAccountData,
}

impl RequestKind {
    pub const ALL: [RequestKind; 3] = [
        RequestKind::SimulatePricePaths,
        RequestKind::OptimizePortfolio,
        RequestKind::NormalizeAccountData,
    ];

    /// Wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::SimulatePricePaths => "SIMULATE_PRICE_PATHS",
            RequestKind::OptimizePortfolio => "OPTIMIZE_PORTFOLIO",
            RequestKind::NormalizeAccountData => "NORMALIZE_ACCOUNT_DATA",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

// =============================================================================
// Envelopes
// =============================================================================

/// A computation request as sent by the caller.
///
/// `kind` stays a plain string on the wire so an unrecognised kind still
/// arrives at the dispatcher and is answered with an ERROR envelope.
///
/// # Examples
/// ```
/// use quant_worker::models::{RequestEnvelope, RequestKind};
/// use serde_json::json;
///
/// let req = RequestEnvelope::new(RequestKind::OptimizePortfolio, json!({"assets": []}), "req-1");
/// assert_eq!(req.kind, "OPTIMIZE_PORTFOLIO");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
    pub correlation_id: String,
}

impl RequestEnvelope {
    /// Creates a request for a known kind.
    pub fn new(kind: RequestKind, payload: Value, correlation_id: impl Into<String>) -> Self {
        Self::raw(kind.as_str(), payload, correlation_id)
    }

    /// Creates a request with an arbitrary kind string.
    pub fn raw(kind: impl Into<String>, payload: Value, correlation_id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload,
            correlation_id: correlation_id.into(),
        }
    }
}

/// Outcome tag of a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    Error,
}

/// Kind-specific output carried by a SUCCESS response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ComputeResult {
    Simulation(SimulationResult),
    Optimization(OptimizationResult),
    Account(NormalizedAccount),
}

impl ComputeResult {
    pub fn as_simulation(&self) -> Option<&SimulationResult> {
        match self {
            ComputeResult::Simulation(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_optimization(&self) -> Option<&OptimizationResult> {
        match self {
            ComputeResult::Optimization(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_account(&self) -> Option<&NormalizedAccount> {
        match self {
            ComputeResult::Account(r) => Some(r),
            _ => None,
        }
    }
}

/// The engine's answer to one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome")]
pub enum ResponseEnvelope {
    #[serde(rename = "SUCCESS", rename_all = "camelCase")]
    Success {
        correlation_id: String,
        result: ComputeResult,
        /// Wall-clock time spent computing, excluding payload parsing.
        duration_ms: f64,
    },
    #[serde(rename = "ERROR", rename_all = "camelCase")]
    Error {
        correlation_id: String,
        error_message: String,
    },
}

impl ResponseEnvelope {
    pub fn success(correlation_id: impl Into<String>, result: ComputeResult, duration_ms: f64) -> Self {
        ResponseEnvelope::Success {
            correlation_id: correlation_id.into(),
            result,
            duration_ms,
        }
    }

    pub fn error(correlation_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        ResponseEnvelope::Error {
            correlation_id: correlation_id.into(),
            error_message: error_message.into(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            ResponseEnvelope::Success { .. } => Outcome::Success,
            ResponseEnvelope::Error { .. } => Outcome::Error,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            ResponseEnvelope::Success { correlation_id, .. } => correlation_id,
            ResponseEnvelope::Error { correlation_id, .. } => correlation_id,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome() == Outcome::Success
    }

    pub fn result(&self) -> Option<&ComputeResult> {
        match self {
            ResponseEnvelope::Success { result, .. } => Some(result),
            ResponseEnvelope::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Error { error_message, .. } => Some(error_message),
            ResponseEnvelope::Success { .. } => None,
        }
    }

    pub fn duration_ms(&self) -> Option<f64> {
        match self {
            ResponseEnvelope::Success { duration_ms, .. } => Some(*duration_ms),
            ResponseEnvelope::Error { .. } => None,
        }
    }
}
