use chrono::{Timelike, Weekday};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    config::WeeklySchedule, error::AppError, model::sync::Initiator, scheduler::SyncScheduler,
};

/// Cron expression (with seconds) firing once a week at the configured UTC time.
pub fn cron_expression(schedule: &WeeklySchedule) -> String {
    format!(
        "0 {} {} * * {}",
        schedule.time.minute(),
        schedule.time.hour(),
        weekday_name(schedule.day)
    )
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MON",
        Weekday::Tue => "TUE",
        Weekday::Wed => "WED",
        Weekday::Thu => "THU",
        Weekday::Fri => "FRI",
        Weekday::Sat => "SAT",
        Weekday::Sun => "SUN",
    }
}

/// Arms the weekly sync trigger.
///
/// A firing that lands while a run is still active is rejected by the scheduler and
/// skipped until the next week.
///
/// # Arguments
/// - `scheduler`: Run scheduler shared with the manual trigger command
/// - `schedule`: Weekday and UTC time of the trigger
pub async fn start_weekly_trigger(
    scheduler: Arc<SyncScheduler>,
    schedule: WeeklySchedule,
) -> Result<(), AppError> {
    let cron = JobScheduler::new().await?;
    let expression = cron_expression(&schedule);

    let job_scheduler = scheduler.clone();
    let job = Job::new_async(expression.as_str(), move |_uuid, _lock| {
        let scheduler = job_scheduler.clone();

        Box::pin(async move {
            match scheduler.trigger_now(Initiator::Weekly) {
                Ok(run) => tracing::info!("Weekly sync run #{} triggered", run.run_id),
                Err(e) => tracing::warn!("Weekly sync skipped: {}", e),
            }
        })
    })?;

    cron.add(job).await?;
    cron.start().await?;

    tracing::info!(
        "Weekly sync scheduled every {} at {} UTC ({})",
        schedule.day,
        schedule.time.format("%H:%M"),
        expression
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn builds_weekly_cron_expression() {
        let schedule = WeeklySchedule {
            day: Weekday::Sun,
            time: NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
        };

        assert_eq!(cron_expression(&schedule), "0 30 2 * * SUN");
    }

    #[tokio::test]
    async fn accepted_by_cron_parser() {
        let schedule = WeeklySchedule {
            day: Weekday::Wed,
            time: NaiveTime::from_hms_opt(18, 5, 0).unwrap(),
        };

        let job = Job::new_async(cron_expression(&schedule).as_str(), |_uuid, _lock| {
            Box::pin(async {})
        });

        assert!(job.is_ok());
    }
}
