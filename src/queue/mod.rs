//! In-process job queue: the upload handler enqueues, the worker pool
//! drains. A bounded mpsc channel is the whole mechanism.

pub mod jobs;
pub mod workers;

use crate::types::{AppError, AppResult};
use jobs::ProcessFileJob;
use tokio::sync::mpsc;

#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<ProcessFileJob>,
}

impl JobQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<ProcessFileJob>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    pub async fn enqueue(&self, job: ProcessFileJob) -> AppResult<()> {
        self.tx
            .send(job)
            .await
            .map_err(|_| AppError::Internal("job queue is closed".to_string()))
    }
}
