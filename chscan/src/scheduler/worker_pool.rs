//! Fixed-size pool of capture workers.
//!
//! One worker stands for one physical tuner. Workers pull scan tasks from a
//! shared bounded queue, so at most `workers` captures are in flight and at
//! most `workers * batch_size` tasks are queued ahead of them.
//!
//! Results are collected in completion order, not submission order.

use std::future::Future;
use std::sync::Arc;

use chscan_types::ScanTask;
use log::{debug, error};
use tokio::sync::{mpsc, Mutex};

/// Default number of tasks queued ahead per worker.
pub const DEFAULT_BATCH_SIZE: usize = 4;

/// Worker pool configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPool {
    /// Number of workers (tuners).
    workers: usize,
    /// Tasks queued ahead per worker.
    batch_size: usize,
}

impl WorkerPool {
    /// Create a pool. Zero values are raised to one.
    pub fn new(workers: usize, batch_size: usize) -> Self {
        Self {
            workers: workers.max(1),
            batch_size: batch_size.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `capture` once per task and return every item produced.
    ///
    /// Returns after all tasks have finished. A capture that panics loses
    /// that task's result; its worker moves on to the next task.
    pub async fn run<F, Fut, T>(&self, tasks: Vec<ScanTask>, capture: F) -> Vec<T>
    where
        F: Fn(ScanTask) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Vec<T>> + Send + 'static,
        T: Send + 'static,
    {
        let total = tasks.len();
        let (task_tx, task_rx) = mpsc::channel::<ScanTask>(self.workers * self.batch_size);
        let task_rx = Arc::new(Mutex::new(task_rx));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<Vec<T>>();

        let mut handles = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers {
            let task_rx = Arc::clone(&task_rx);
            let result_tx = result_tx.clone();
            let capture = capture.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let next = task_rx.lock().await.recv().await;
                    let Some(task) = next else { break };

                    let label = format!("[{}] {}", task.band, task.recorder_channel);
                    debug!("worker {}: {}", worker_id, label);

                    let items = match tokio::spawn(capture(task)).await {
                        Ok(items) => items,
                        Err(e) => {
                            error!("worker {}: {}: capture failed: {}", worker_id, label, e);
                            continue;
                        }
                    };
                    if result_tx.send(items).is_err() {
                        break;
                    }
                }
                debug!("worker {}: done", worker_id);
            }));
        }
        drop(result_tx);

        for task in tasks {
            if task_tx.send(task).await.is_err() {
                error!("WorkerPool: all workers exited before the queue was drained");
                break;
            }
        }
        drop(task_tx);

        let mut results = Vec::new();
        let mut completed = 0usize;
        while let Some(items) = result_rx.recv().await {
            completed += 1;
            results.extend(items);
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("WorkerPool: worker failed: {}", e);
            }
        }

        debug!("WorkerPool: {}/{} task(s) completed", completed, total);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use chscan_types::{Band, ChannelType};

    fn tasks(n: u32) -> Vec<ScanTask> {
        let gr = ChannelType::new(Band::Terrestrial, (13..13 + n).collect());
        gr.channels
            .iter()
            .map(|&ch| ScanTask::new(&gr, ch, "recpt1", "epgdump", 1))
            .collect()
    }

    #[test]
    fn test_worker_pool_new() {
        assert_eq!(WorkerPool::new(4, DEFAULT_BATCH_SIZE).workers(), 4);
        assert_eq!(WorkerPool::new(0, 0), WorkerPool::new(1, 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let started = Arc::new(AtomicUsize::new(0));

        let pool = WorkerPool::new(2, DEFAULT_BATCH_SIZE);
        let capture = {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            let started = Arc::clone(&started);
            move |task: ScanTask| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                let started = Arc::clone(&started);
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    vec![task.recorder_channel]
                }
            }
        };

        let mut results = pool.run(tasks(5), capture).await;
        results.sort();

        assert_eq!(started.load(Ordering::SeqCst), 5);
        assert_eq!(results, vec!["13", "14", "15", "16", "17"]);
        assert_eq!(peak.load(Ordering::SeqCst), 2);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_results_are_dropped() {
        let pool = WorkerPool::new(3, 1);
        let results = pool
            .run(tasks(6), |task: ScanTask| async move {
                if task.recorder_channel.ends_with('4') {
                    vec![task.recorder_channel.clone(), task.recorder_channel]
                } else {
                    Vec::new()
                }
            })
            .await;
        assert_eq!(results, vec!["14".to_string(), "14".to_string()]);
    }

    #[tokio::test]
    async fn test_no_tasks() {
        let pool = WorkerPool::new(2, 4);
        let results: Vec<String> = pool
            .run(Vec::new(), |_task: ScanTask| async move { vec!["x".to_string()] })
            .await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_single_worker_survives_panicking_capture() {
        let pool = WorkerPool::new(1, 1);
        let mut results = pool
            .run(tasks(4), |task: ScanTask| async move {
                if task.recorder_channel == "13" {
                    panic!("tuner crashed");
                }
                vec![task.recorder_channel]
            })
            .await;
        results.sort();
        assert_eq!(results, vec!["14", "15", "16"]);
    }

    #[tokio::test]
    async fn test_panicking_capture_loses_only_its_task() {
        let pool = WorkerPool::new(2, 1);
        let mut results = pool
            .run(tasks(4), |task: ScanTask| async move {
                if task.recorder_channel == "14" {
                    panic!("tuner crashed");
                }
                vec![task.recorder_channel]
            })
            .await;
        results.sort();
        assert_eq!(results.len(), 3);
        assert!(!results.contains(&"14".to_string()));
    }
}
