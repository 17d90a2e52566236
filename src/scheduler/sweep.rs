use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, scheduler::Scheduler};

/// Starts the overdue-unit sweep
///
/// Runs at the start of every minute and arms any active unit whose due time has
/// passed but which has no timer, for example because arming failed silently or the
/// record was edited on disk.
///
/// # Arguments
/// - `scheduler`: Timer registry to arm overdue units in
pub async fn start_sweep(scheduler: Scheduler) -> Result<(), AppError> {
    let cron = JobScheduler::new().await?;

    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let scheduler = scheduler.clone();

        Box::pin(async move {
            if let Err(e) = scheduler.arm_overdue(Utc::now()).await {
                tracing::error!("Error sweeping overdue units: {}", e);
            }
        })
    })?;

    cron.add(job).await?;
    cron.start().await?;

    tracing::info!("Overdue unit sweep started");

    Ok(())
}
