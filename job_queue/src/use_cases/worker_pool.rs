//! Bounded-concurrency worker loop driving jobs through a processor
//! callback, committing `completed`/`failed` back to the queue.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial WorkerPool with Semaphore-bounded concurrency.

pub struct WorkerPool<Q>
where
    Q: crate::ports::job_queue_port::JobQueuePort + 'static,
{
    queue: std::sync::Arc<Q>,
    concurrency: usize,
}

impl<Q> WorkerPool<Q>
where
    Q: crate::ports::job_queue_port::JobQueuePort + 'static,
{
    pub fn new(queue: std::sync::Arc<Q>, concurrency: usize) -> Self {
        Self { queue, concurrency }
    }

    /// Drains every job currently `waiting`, running at most `concurrency`
    /// processors concurrently, and returns the number of jobs it started.
    /// A job whose processor returns `Err` is handed to `mark_failed` so
    /// the queue's own retry/backoff policy decides what happens next.
    pub async fn process_available<F, Fut>(&self, processor: F) -> std::result::Result<usize, pipeline_core::PipelineError>
    where
        F: Fn(crate::domain::job::Job) -> Fut + std::marker::Send + std::marker::Sync + 'static,
        Fut: std::future::Future<Output = std::result::Result<(), pipeline_core::PipelineError>> + std::marker::Send + 'static,
    {
        let semaphore = std::sync::Arc::new(tokio::sync::Semaphore::new(self.concurrency));
        let processor = std::sync::Arc::new(processor);
        let mut handles: std::vec::Vec<tokio::task::JoinHandle<()>> = std::vec::Vec::new();

        loop {
            let job = self.queue.dequeue_next().await?;
            let std::option::Option::Some(job) = job else {
                break;
            };

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| pipeline_core::PipelineError::unknown(std::format!("semaphore closed: {:?}", e)))?;
            let queue = self.queue.clone();
            let processor = processor.clone();

            let handle = tokio::spawn(async move {
                let job_id = job.id.clone();
                let result = processor(job).await;
                match result {
                    std::result::Result::Ok(()) => {
                        let _ = queue.mark_completed(&job_id).await;
                    }
                    std::result::Result::Err(e) => {
                        let _ = queue.mark_failed(&job_id, e.to_string().as_str()).await;
                    }
                }
                std::mem::drop(permit);
            });
            handles.push(handle);
        }

        let started = handles.len();
        for handle in handles {
            let _ = handle.await;
        }
        std::result::Result::Ok(started)
    }

    /// Production entry point: alternates promoting ready delayed jobs,
    /// reclaiming stalled ones, and draining the waiting set, sleeping
    /// `poll_interval` between passes when nothing was available.
    pub async fn run_forever<F, Fut>(&self, processor: F, poll_interval: std::time::Duration, stale_after_secs: i64) -> !
    where
        F: Fn(crate::domain::job::Job) -> Fut + std::marker::Send + std::marker::Sync + std::marker::Copy + 'static,
        Fut: std::future::Future<Output = std::result::Result<(), pipeline_core::PipelineError>> + std::marker::Send + 'static,
    {
        loop {
            if let std::result::Result::Err(e) = self.queue.promote_ready_delayed().await {
                std::eprintln!("[worker_pool] promote_ready_delayed error: {}", e);
            }
            if let std::result::Result::Err(e) = self.queue.recover_stalled(stale_after_secs).await {
                std::eprintln!("[worker_pool] recover_stalled error: {}", e);
            }
            match self.process_available(processor).await {
                std::result::Result::Ok(0) => {
                    tokio::time::sleep(poll_interval).await;
                }
                std::result::Result::Ok(_) => {}
                std::result::Result::Err(e) => {
                    std::eprintln!("[worker_pool] process_available error: {}", e);
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }
    }
}
