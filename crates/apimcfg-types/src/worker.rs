//! Worker pool for blocking work (password hashing). Two priority levels.

use flume::{Receiver, Sender};
use futures::channel::oneshot;
use std::{future::Future, sync::Arc, thread};

use crate::prelude::*;

type Job = Box<dyn FnOnce() + Send>;
type JobQueue = Arc<Receiver<Job>>;

#[derive(Clone, Copy, Debug)]
pub enum Priority {
	/// Request-path work, e.g. verifying a password during login
	High,
	/// Everything else, e.g. hashing passwords while provisioning users
	Low,
}

#[derive(Debug)]
pub struct WorkerPool {
	high: Sender<Job>,
	low: Sender<Job>,
}

impl WorkerPool {
	/// `n_high` threads serve only high priority jobs, `n_shared` threads serve both queues
	pub fn new(n_high: usize, n_shared: usize) -> Self {
		let (high, rx_high) = flume::unbounded();
		let (low, rx_low) = flume::unbounded();

		let rx_high: JobQueue = Arc::new(rx_high);
		let rx_low: JobQueue = Arc::new(rx_low);

		for _ in 0..n_high {
			let rx_high = Arc::clone(&rx_high);
			thread::spawn(move || worker_loop(&[rx_high]));
		}

		for _ in 0..n_shared {
			let rx_high = Arc::clone(&rx_high);
			let rx_low = Arc::clone(&rx_low);
			thread::spawn(move || worker_loop(&[rx_high, rx_low]));
		}

		Self { high, low }
	}

	/// Submits a closure, returns a future resolving to its result
	pub fn spawn<F, T>(&self, priority: Priority, f: F) -> impl Future<Output = ClResult<T>>
	where
		F: FnOnce() -> T + Send + 'static,
		T: Send + 'static,
	{
		let (res_tx, res_rx) = oneshot::channel();

		let job: Job = Box::new(move || {
			let _ignore = res_tx.send(f());
		});

		let queue = match priority {
			Priority::High => &self.high,
			Priority::Low => &self.low,
		};
		if queue.send(job).is_err() {
			error!("Failed to send job to {:?} priority worker queue", priority);
		}

		async move {
			res_rx.await.map_err(|_| {
				error!("Worker dropped result channel (task may have panicked)");
				Error::Internal("worker task failed".into())
			})
		}
	}

	/// Like `spawn`, but flattens `ClResult<ClResult<T>>` into `ClResult<T>`
	pub fn try_spawn<F, T>(&self, priority: Priority, f: F) -> impl Future<Output = ClResult<T>>
	where
		F: FnOnce() -> ClResult<T> + Send + 'static,
		T: Send + 'static,
	{
		let fut = self.spawn(priority, f);
		async move { fut.await? }
	}
}

fn worker_loop(queues: &[JobQueue]) {
	loop {
		// Drain higher priority queues first
		let mut job = None;
		for rx in queues {
			if let Ok(j) = rx.try_recv() {
				job = Some(j);
				break;
			}
		}

		let job = match job {
			Some(job) => job,
			None => {
				let mut selector = flume::Selector::new();
				for rx in queues {
					selector = selector.recv(rx, |res| res);
				}
				match selector.wait() {
					Ok(job) => job,
					// All senders are gone, the pool was dropped
					Err(flume::RecvError::Disconnected) => return,
				}
			}
		};

		if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)) {
			error!("Worker thread caught panic: {:?}", e);
		}
	}
}


// vim: ts=4
