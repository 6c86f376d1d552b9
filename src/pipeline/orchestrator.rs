// 全ジョブ実行

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::ZintError;
use crate::pipeline::job_runner::{JobConfig, JobResult, run_job};

/// Run multiple jobs, collecting results in input order.
/// One job failure does NOT prevent other jobs from running.
///
/// At most `parallel_workers` zint processes run at once (0 = all jobs).
pub async fn run_all_jobs(
    jobs: Vec<JobConfig>,
    parallel_workers: usize,
) -> Vec<crate::error::Result<JobResult>> {
    let workers = if parallel_workers == 0 {
        jobs.len().max(1)
    } else {
        parallel_workers
    };
    let permits = Arc::new(Semaphore::new(workers));

    let handles: Vec<_> = jobs
        .into_iter()
        .map(|job| {
            let permits = Arc::clone(&permits);
            tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| ZintError::launch(format!("worker pool closed: {e}")))?;
                run_job(&job, None).await
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(ZintError::launch(format!("job task failed: {e}"))),
        });
    }
    results
}
