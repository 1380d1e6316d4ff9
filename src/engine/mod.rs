// src/engine/mod.rs
//
// Request handling: the dispatcher routes envelopes to kernels, and the
// worker runs the dispatcher in the background behind a pair of queues.

pub mod dispatcher;
pub mod kernels;
pub mod worker;

pub use dispatcher::Dispatcher;
pub use kernels::{NormalizerKernel, OptimizerKernel, SimulationKernel};
pub use worker::{RequestSender, Worker, WorkerResponses};
