//! Fixed-size worker pool for batch mode.
//!
//! The shell thread pushes raw input lines onto a crossbeam channel and keeps
//! reading; each worker owns a clone of the [`RequestHandler`] and pulls lines
//! until the channel closes. Shutdown closes the channel and joins every
//! worker, so all accepted requests are handled and logged before it returns.

use std::{
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
    thread::{self, JoinHandle},
};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    handler::RequestHandler,
};

/// Pool size used when none is configured.
pub const DEFAULT_WORKERS: usize = 3;

pub struct WorkerPool {
    jobs: Option<Sender<String>>,
    workers: Vec<JoinHandle<usize>>,
}

impl WorkerPool {
    /// Starts `size` workers (at least one). Each request's console output is
    /// written to `out` in one piece once the request completes.
    pub fn spawn<W>(size: usize, handler: RequestHandler, out: Arc<Mutex<W>>) -> Result<Self>
    where
        W: Write + Send + 'static,
    {
        let (jobs, queue) = unbounded::<String>();
        let mut pool = Self {
            jobs: Some(jobs),
            workers: Vec::with_capacity(size.max(1)),
        };

        for id in 0..size.max(1) {
            let queue = queue.clone();
            let handler = handler.clone();
            let out = Arc::clone(&out);
            let worker = thread::Builder::new()
                .name(format!("translate-worker-{id}"))
                .spawn(move || run_worker(id, queue, handler, out))
                .map_err(Error::SpawnWorker)?;
            pool.workers.push(worker);
        }

        debug!(workers = pool.workers.len(), "worker pool started");
        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queues one request. The line is moved into the job.
    pub fn submit(&self, line: String) -> Result<()> {
        let jobs = self.jobs.as_ref().ok_or(Error::PoolClosed)?;
        jobs.send(line).map_err(|_| Error::PoolClosed)
    }

    /// Stops accepting work, waits for the queue to drain and returns how many
    /// requests the workers handled.
    pub fn shutdown(mut self) -> usize {
        self.close_and_join()
    }

    fn close_and_join(&mut self) -> usize {
        // Workers exit once the queue is empty and the last sender is gone.
        drop(self.jobs.take());

        let mut processed = 0;
        for worker in self.workers.drain(..) {
            match worker.join() {
                Ok(count) => processed += count,
                Err(_) => warn!("translation worker panicked"),
            }
        }
        debug!(processed, "worker pool drained");
        processed
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.close_and_join();
    }
}

fn run_worker<W: Write>(
    id: usize,
    queue: Receiver<String>,
    handler: RequestHandler,
    out: Arc<Mutex<W>>,
) -> usize {
    let mut processed = 0;
    while let Ok(line) = queue.recv() {
        let mut buffer = Vec::new();
        if let Err(error) = handler.handle(&line, &mut io::empty(), &mut buffer) {
            warn!(worker = id, %error, "failed to render translation");
        }

        let mut out = out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = out.write_all(&buffer).and_then(|()| out.flush()) {
            warn!(worker = id, %error, "failed to write translation to console");
        }
        processed += 1;
    }
    processed
}
