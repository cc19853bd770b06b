//! Identity-sharded dispatch from the transport session to the pipeline.
//!
//! One transport session carries publications for many devices. Workers
//! each own a lane; a device always hashes to the same lane, so its
//! publications are processed in arrival order while distinct devices run
//! in parallel. Dropping the dispatcher closes every lane, which lets the
//! workers drain their queues and exit - that is the shutdown path.

use crate::service::BridgeService;
use bytes::Bytes;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// One publication as surfaced by the ingress adapter.
#[derive(Debug)]
pub struct Publication {
    /// The transport identity the session vouched for.
    pub identity: String,
    /// Raw publication body, untransformed.
    pub raw: Bytes,
}

/// Hands publications to identity-sharded worker lanes.
pub struct Dispatcher {
    lanes: Vec<mpsc::Sender<Publication>>,
}

impl Dispatcher {
    /// Spawn `workers` lanes over the shared pipeline.
    ///
    /// Returns the dispatcher and the worker handles; the supervisor awaits
    /// the handles during drain.
    pub fn spawn(
        service: Arc<BridgeService>,
        workers: usize,
        queue_depth: usize,
    ) -> (Self, Vec<JoinHandle<()>>) {
        let mut lanes = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers.max(1) {
            let (tx, mut rx) = mpsc::channel::<Publication>(queue_depth.max(1));
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                while let Some(publication) = rx.recv().await {
                    service
                        .handle_publication(&publication.identity, &publication.raw)
                        .await;
                }
            }));
            lanes.push(tx);
        }
        (Self { lanes }, handles)
    }

    /// Queue a publication on its device's lane.
    ///
    /// Awaits lane capacity, which applies the transport session's own
    /// backpressure when a device floods.
    pub async fn dispatch(&self, identity: String, raw: Bytes) {
        let mut hasher = DefaultHasher::new();
        identity.hash(&mut hasher);
        let lane = &self.lanes[hasher.finish() as usize % self.lanes.len()];
        if lane
            .send(Publication { identity, raw })
            .await
            .is_err()
        {
            warn!("worker lane closed, publication dropped");
        }
    }
}
