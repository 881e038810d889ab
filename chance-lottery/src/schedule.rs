use crate::{LotteryError, Result};
use std::future::Future;
use tokio::task::JoinHandle;

/// Handle to a spawned timer chain. Cancelling or dropping the handle aborts
/// the task, so none of its pending timers fire afterwards.
#[derive(Debug)]
pub struct TaskHandle<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> TaskHandle<T> {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(future)),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    pub async fn join(mut self) -> Result<T> {
        let handle = self.handle.take().ok_or(LotteryError::Cancelled)?;

        match handle.await {
            Ok(value) => Ok(value),
            Err(e) if e.is_cancelled() => Err(LotteryError::Cancelled),
            Err(e) => Err(LotteryError::Internal(format!("Scheduled task failed: {}", e))),
        }
    }
}

impl<T> Drop for TaskHandle<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
