// src/engine/worker.rs

use super::dispatcher::Dispatcher;
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::models::{RequestEnvelope, ResponseEnvelope};
use crate::traits::ResponseStream;
use async_trait::async_trait;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Entry point for running a dispatcher in the background.
pub struct Worker;

impl Worker {
    /// Spawns the worker on the current tokio runtime.
    ///
    /// Random draws are seeded from `[global] seed` when set, otherwise from
    /// OS entropy.
    pub fn spawn(dispatcher: Dispatcher, config: &Config) -> (RequestSender, WorkerResponses) {
        let rng = match config.global.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::spawn_with_rng(dispatcher, rng, config.global.channel_capacity)
    }

    /// Spawns the worker with an explicit random source.
    pub fn spawn_with_rng(
        dispatcher: Dispatcher,
        rng: StdRng,
        channel_capacity: usize,
    ) -> (RequestSender, WorkerResponses) {
        let capacity = channel_capacity.max(1);
        let (request_tx, request_rx) = mpsc::channel(capacity);
        let (response_tx, response_rx) = mpsc::channel(capacity);

        let actor = WorkerActor {
            dispatcher: Arc::new(dispatcher),
            rng,
            requests: request_rx,
            responses: response_tx,
        };
        tokio::spawn(actor.run());

        (
            RequestSender { tx: request_tx },
            WorkerResponses { rx: response_rx },
        )
    }
}

/// Caller-side handle for submitting requests. Cheap to clone.
#[derive(Clone)]
pub struct RequestSender {
    tx: mpsc::Sender<RequestEnvelope>,
}

impl RequestSender {
    /// Enqueues a request. Waits only while the queue is full.
    pub async fn submit(&self, request: RequestEnvelope) -> Result<()> {
        self.tx
            .send(request)
            .await
            .map_err(|_| EngineError::WorkerClosed)
    }
}

/// Caller-side stream of responses, in request order.
pub struct WorkerResponses {
    rx: mpsc::Receiver<ResponseEnvelope>,
}

#[async_trait]
impl ResponseStream for WorkerResponses {
    async fn next(&mut self) -> Option<ResponseEnvelope> {
        self.rx.recv().await
    }
}

// --- The Background Task ---
// Takes one request at a time, runs it on the blocking pool and waits for it
// before taking the next, so kernel calls never overlap.
struct WorkerActor {
    dispatcher: Arc<Dispatcher>,
    rng: StdRng,
    requests: mpsc::Receiver<RequestEnvelope>,
    responses: mpsc::Sender<ResponseEnvelope>,
}

impl WorkerActor {
    async fn run(mut self) {
        info!("Compute worker started.");

        while let Some(request) = self.requests.recv().await {
            let correlation_id = request.correlation_id.clone();
            let dispatcher = Arc::clone(&self.dispatcher);
            // Each request gets its own generator derived from the worker's
            let mut rng = StdRng::seed_from_u64(self.rng.gen());

            let handle = tokio::task::spawn_blocking(move || dispatcher.dispatch(request, &mut rng));
            let response = match handle.await {
                Ok(response) => response,
                Err(e) => {
                    error!("Compute task for [{}] failed: {}", correlation_id, e);
                    ResponseEnvelope::error(correlation_id, format!("Computation task failed: {}", e))
                }
            };

            if self.responses.send(response).await.is_err() {
                warn!("Response receiver dropped, stopping worker.");
                return;
            }
        }

        info!("Request channel closed, compute worker stopped.");
    }
}
