use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::error::{Error, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// fixed set of threads running submitted jobs
///
/// every worker pulls from one shared queue, so a slow job only occupies
/// the worker running it. a panicking job is contained to that job.
/// the pool must be shut down (explicitly or by drop) to release its threads.
pub struct WorkerPool {
    sender: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
    queued: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// start `threads` workers; zero means one per available cpu
    pub fn new(threads: usize) -> Result<Self> {
        let count = if threads == 0 {
            default_threads()
        } else {
            threads
        };
        tracing::debug!("starting worker pool with {} threads", count);

        let (tx, rx) = mpsc::channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));
        let queued = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::with_capacity(count);

        for id in 0..count {
            let rx = Arc::clone(&rx);
            let q = Arc::clone(&queued);
            let handle = std::thread::Builder::new()
                .name(format!("bagit-worker-{}", id))
                .spawn(move || run_worker(rx, q))
                .map_err(Error::WorkerSpawn)?;
            handles.push(handle);
        }

        Ok(Self {
            sender: Some(tx),
            handles,
            queued,
        })
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// jobs submitted but not yet picked up by a worker
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_none()
    }

    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(Error::PoolClosed)?;

        self.queued.fetch_add(1, Ordering::Relaxed);
        if sender.send(Box::new(job)).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::PoolClosed);
        }
        Ok(())
    }

    /// stop accepting jobs, let queued ones finish, and join every worker
    pub fn shutdown(&mut self) {
        if self.sender.is_none() && self.handles.is_empty() {
            return;
        }
        tracing::debug!("shutting down worker pool");
        self.sender = None;
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                tracing::error!("worker thread exited abnormally");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_worker(rx: Arc<Mutex<Receiver<Job>>>, queued: Arc<AtomicUsize>) {
    loop {
        // the lock is held only while waiting for the next job
        let next = rx
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .recv();
        let Ok(job) = next else {
            break;
        };
        queued.fetch_sub(1, Ordering::Relaxed);
        if catch_unwind(AssertUnwindSafe(job)).is_err() {
            tracing::error!("worker job panicked");
        }
    }
}

pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
