use std::sync::Arc;

use log::{error, info, warn};
use shared::models::jobs::{job::Job, render_result::RenderResult};
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
};

/// Fixed set of render workers fed from one job queue.
pub struct WorkerPool {
    jobs: mpsc::Sender<Job>,
    workers: Vec<JoinHandle<usize>>,
}

impl WorkerPool {
    /// Each worker pushes one full result per job into `results`. The queue
    /// closes once every worker has exited.
    pub fn spawn(worker_count: usize, results: mpsc::Sender<RenderResult>) -> Self {
        let worker_count = if worker_count == 0 {
            warn!("A pool needs at least one worker, starting one");
            1
        } else {
            worker_count
        };

        let (jobs, job_rx) = mpsc::channel(worker_count);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let workers = (0..worker_count)
            .map(|id| tokio::spawn(render_worker(id, job_rx.clone(), results.clone())))
            .collect();

        Self { jobs, workers }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Waits for room in the queue. False once no worker is left to take it.
    pub async fn submit(&self, job: Job) -> bool {
        self.jobs.send(job).await.is_ok()
    }

    /// Closes the job queue, lets the workers drain it and returns how many
    /// jobs they rendered.
    pub async fn shutdown(self) -> usize {
        drop(self.jobs);

        let mut rendered = 0;
        for worker in self.workers {
            match worker.await {
                Ok(count) => rendered += count,
                Err(e) => error!("Render worker panicked: {}", e),
            }
        }
        rendered
    }
}

async fn render_worker(
    id: usize,
    jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
    results: mpsc::Sender<RenderResult>,
) -> usize {
    let mut rendered = 0;

    loop {
        let job = { jobs.lock().await.recv().await };
        let Some(job) = job else {
            break;
        };

        info!(
            "Worker {} processing rows [{}, {})...",
            id, job.start_y, job.end_y
        );
        // Rendering is CPU bound, keep it off the async workers.
        let result = match tokio::task::spawn_blocking(move || job.perform()).await {
            Ok(result) => result,
            Err(e) => {
                error!("Worker {} failed to render a job: {}", id, e);
                continue;
            }
        };

        if results.send(result).await.is_err() {
            warn!("Worker {}: result queue closed, stopping", id);
            break;
        }
        rendered += 1;
        info!("Worker {} completed job", id);
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{camera::default_camera, scene::Scene};

    fn band(start_y: u32, end_y: u32) -> Job {
        Job {
            start_x: 0,
            end_x: 6,
            start_y,
            end_y,
            width: 6,
            height: 6,
            camera: default_camera(),
            scene: Scene::new(),
        }
    }

    #[tokio::test]
    async fn every_job_yields_exactly_one_full_result() {
        let (result_tx, mut result_rx) = mpsc::channel(8);
        let pool = WorkerPool::spawn(3, result_tx);
        assert_eq!(pool.size(), 3);

        for (start, end) in [(0, 2), (2, 4), (4, 6)] {
            assert!(pool.submit(band(start, end)).await);
        }
        assert_eq!(pool.shutdown().await, 3);

        let mut origins = Vec::new();
        while let Some(result) = result_rx.recv().await {
            assert_eq!((result.width, result.height), (6, 2));
            assert_eq!(result.pixels.len(), 12);
            origins.push(result.start_y);
        }
        origins.sort_unstable();
        assert_eq!(origins, vec![0, 2, 4]);
    }

    #[tokio::test]
    async fn zero_workers_still_makes_progress() {
        let (result_tx, mut result_rx) = mpsc::channel(1);
        let pool = WorkerPool::spawn(0, result_tx);
        assert_eq!(pool.size(), 1);

        assert!(pool.submit(band(0, 6)).await);
        assert_eq!(pool.shutdown().await, 1);
        assert!(result_rx.recv().await.is_some());
        assert!(result_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn workers_stop_when_results_are_no_longer_read() {
        let (result_tx, result_rx) = mpsc::channel(1);
        drop(result_rx);
        let pool = WorkerPool::spawn(1, result_tx);

        pool.submit(band(0, 6)).await;
        assert_eq!(pool.shutdown().await, 0);
    }
}
