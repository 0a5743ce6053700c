// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A long-lived pool of worker threads consuming a shared task queue.
//!
//! The pool is created once at startup and reused for every frame:
//! enqueue a batch of tasks, then block on [`WorkerPool::wait_idle`]
//! until all of them have finished.  Workers sleep on the queue while
//! it is empty and the waiter sleeps on a condition variable, so an
//! idle pool costs nothing.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Sender};

type Task = Box<dyn FnOnce() + Send + 'static>;

// Count of enqueued-but-unfinished tasks, plus the signal the waiter
// sleeps on.
struct Pending {
    count: Mutex<usize>,
    drained: Condvar,
}

impl Pending {
    fn add_one(&self) {
        *self.count.lock().unwrap() += 1;
    }

    fn finish_one(&self) {
        let mut count = self.count.lock().unwrap();
        *count -= 1;
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    fn wait_for_zero(&self) {
        let mut count = self.count.lock().unwrap();
        while *count > 0 {
            count = self.drained.wait(count).unwrap();
        }
    }
}

/// A fixed set of worker threads sharing one task queue.  Each task
/// is taken by exactly one worker and runs exactly once; dropping the
/// pool disconnects the queue and joins the workers.
pub struct WorkerPool {
    sender: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
    pending: Arc<Pending>,
}

impl WorkerPool {
    /// Spawn `workers` threads, all blocked on an empty queue.
    pub fn new(workers: usize) -> WorkerPool {
        assert!(workers > 0, "a worker pool needs at least one worker");
        let (sender, receiver) = channel::unbounded::<Task>();
        let pending = Arc::new(Pending {
            count: Mutex::new(0),
            drained: Condvar::new(),
        });

        let workers = (0..workers)
            .map(|_| {
                let receiver = receiver.clone();
                let pending = Arc::clone(&pending);
                thread::spawn(move || {
                    // recv blocks while the queue is empty and fails
                    // once the pool has dropped its sender, which is
                    // the shutdown signal.
                    while let Ok(task) = receiver.recv() {
                        task();
                        pending.finish_one();
                    }
                })
            })
            .collect();

        WorkerPool {
            sender: Some(sender),
            workers,
            pending,
        }
    }

    /// Append a task to the queue; some idle worker will pick it up.
    pub fn enqueue<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Account for the task before it becomes visible to workers,
        // so wait_idle can never observe it in flight but uncounted.
        self.pending.add_one();
        self.sender
            .as_ref()
            .expect("pool is shutting down")
            .send(Box::new(task))
            .expect("worker queue disconnected");
    }

    /// Block until every task enqueued so far has finished.
    pub fn wait_idle(&self) {
        self.pending.wait_for_zero();
    }

    /// Number of worker threads in the pool.
    pub fn workers(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Disconnect the queue; workers finish what is already queued
        // and exit their receive loops.
        self.sender.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
