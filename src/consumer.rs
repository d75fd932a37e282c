//! Serial delivery context for completion callbacks.
//!
//! Fetches run on tokio worker tasks, but their completions must never run
//! concurrently with each other. A [`ConsumerQueue`] funnels every
//! completion into one loop that runs them one at a time, in the order
//! they were dispatched. The loop can be spawned as its own task
//! ([`ConsumerQueue::spawn`]) or driven by the caller ([`ConsumerLoop::run`]).

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Sending half: hands completions to the consumer loop.
#[derive(Clone)]
pub struct ConsumerQueue {
    tx: mpsc::UnboundedSender<Job>,
}

/// Receiving half: runs queued completions serially.
pub struct ConsumerLoop {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl ConsumerQueue {
    /// Create a queue and the loop that drains it.
    pub fn new() -> (Self, ConsumerLoop) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, ConsumerLoop { rx })
    }

    /// Create a queue whose loop runs on its own tokio task.
    ///
    /// The task ends once every clone of the queue has been dropped and
    /// the remaining completions have run.
    pub fn spawn() -> (Self, JoinHandle<()>) {
        let (queue, consumer) = Self::new();
        (queue, tokio::spawn(consumer.run()))
    }

    /// Queue `job` to run on the consumer loop.
    ///
    /// If the loop is gone the job is dropped; there is nobody left to
    /// observe the result.
    pub fn dispatch(&self, job: impl FnOnce() + Send + 'static) {
        if self.tx.send(Box::new(job)).is_err() {
            tracing::warn!("consumer loop closed; completion dropped");
        }
    }
}

impl ConsumerLoop {
    /// Run completions until all queue handles are dropped.
    pub async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            job();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn runs_jobs_in_dispatch_order() {
        let (queue, handle) = ConsumerQueue::spawn();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for i in 0..10 {
            let seen = Arc::clone(&seen);
            queue.dispatch(move || seen.lock().unwrap().push(i));
        }
        drop(queue);
        handle.await.unwrap();
        assert_eq!(*seen.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn jobs_never_overlap() {
        let (queue, handle) = ConsumerQueue::spawn();
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));

        let mut producers = Vec::new();
        for _ in 0..8 {
            let queue = queue.clone();
            let active = Arc::clone(&active);
            let max_active = Arc::clone(&max_active);
            producers.push(tokio::spawn(async move {
                for _ in 0..25 {
                    let active = Arc::clone(&active);
                    let max_active = Arc::clone(&max_active);
                    queue.dispatch(move || {
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        max_active.fetch_max(now, Ordering::SeqCst);
                        std::thread::yield_now();
                        active.fetch_sub(1, Ordering::SeqCst);
                    });
                }
            }));
        }
        for p in producers {
            p.await.unwrap();
        }
        drop(queue);
        handle.await.unwrap();
        assert_eq!(max_active.load(Ordering::SeqCst), 1);
    }
}
