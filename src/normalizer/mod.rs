// src/normalizer/mod.rs
//
// Converts loosely shaped upstream account payloads into one canonical shape.
// Missing fields, wrong JSON types and non-numeric strings all read as zero;
// normalization never fails.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Field Schemas
// =============================================================================
//
// Each canonical field lists the upstream spellings accepted for it, in
// priority order.

const LIQUIDITY: &[&str] = &["liquidity", "cash"];
const BUYING_POWER: &[&str] = &["buyingPower", "buying_power"];
const DAILY_PL: &[&str] = &["dailyPL", "dailyPl", "daily_pl"];
const EQUITY: &[&str] = &["equity"];

const SYMBOL: &[&str] = &["symbol", "ticker"];
const QTY: &[&str] = &["qty", "quantity"];
const AVG_PRICE: &[&str] = &["avgPrice", "avg_price", "averagePrice"];
const CURRENT_PRICE: &[&str] = &["currentPrice", "current_price", "lastPrice"];
const PL: &[&str] = &["pl", "unrealizedPL", "unrealized_pl"];
const MARKET_VALUE: &[&str] = &["marketValue", "market_value"];

// =============================================================================
// Output
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPosition {
    pub symbol: String,
    pub qty: f64,
    pub avg_price: f64,
    pub current_price: f64,
    /// Unrealized P&L
    pub pl: f64,
    pub market_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAccount {
    pub liquidity: f64,
    pub buying_power: f64,
    #[serde(rename = "dailyPL")]
    pub daily_pl: f64,
    pub equity: f64,
    pub positions: Vec<NormalizedPosition>,
    pub last_updated: DateTime<Utc>,
}

// =============================================================================
// Coercion
// =============================================================================

/// Reads a JSON value as a number, falling back to 0.
///
/// Numbers pass through, strings are trimmed and parsed (an empty string is
/// 0), and everything else, including non-finite results, is 0.
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse::<f64>().unwrap_or(0.0)
            }
        }
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn lookup<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| obj.get(*name))
}

fn number(obj: &Map<String, Value>, names: &[&str]) -> f64 {
    lookup(obj, names).map(coerce_number).unwrap_or(0.0)
}

fn text(obj: &Map<String, Value>, names: &[&str]) -> String {
    match lookup(obj, names) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Normalizes an account payload, stamping it with the current time.
pub fn normalize_account(payload: &Value) -> NormalizedAccount {
    normalize_account_at(payload, Utc::now())
}

/// Normalizes an account payload, stamping it with `now`.
pub fn normalize_account_at(payload: &Value, now: DateTime<Utc>) -> NormalizedAccount {
    let empty = Map::new();
    let status = payload
        .get("status")
        .and_then(|s| s.get("data"))
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let raw_positions: &[Value] = payload
        .get("positions")
        .and_then(|p| p.get("data"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let positions: Vec<NormalizedPosition> = raw_positions
        .iter()
        .filter_map(|entry| match entry.as_object() {
            Some(obj) => Some(normalize_position(obj)),
            None => {
                debug!("Skipping non-object position entry: {}", entry);
                None
            }
        })
        .collect();

    NormalizedAccount {
        liquidity: number(status, LIQUIDITY),
        buying_power: number(status, BUYING_POWER),
        daily_pl: number(status, DAILY_PL),
        equity: number(status, EQUITY),
        positions,
        last_updated: now,
    }
}

fn normalize_position(obj: &Map<String, Value>) -> NormalizedPosition {
    NormalizedPosition {
        symbol: text(obj, SYMBOL),
        qty: number(obj, QTY),
        avg_price: number(obj, AVG_PRICE),
        current_price: number(obj, CURRENT_PRICE),
        pl: number(obj, PL),
        market_value: number(obj, MARKET_VALUE),
    }
}
