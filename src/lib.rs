// src/lib.rs

// 1. Data Structures (The "Nouns")
// explicit 'pub' makes the envelopes and errors available to main.rs and tests
pub mod models;
pub mod error;

// 2. Interfaces (The "Contract")
pub mod traits;

// 3. Numeric Kernels (The "Brains")
pub mod pricing;
pub mod optimizer;
pub mod normalizer;

// 4. Dispatcher and Worker (The "Orchestrator")
pub mod engine;

// 5. Settings
pub mod config;
