use crate::service::exercise_service::ExerciseService;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CronError {
    #[error("invalid cron expression `{0}`: {1}")]
    InvalidExpression(String, String),
    #[error(transparent)]
    Scheduler(#[from] JobSchedulerError),
}

/// 秒 分 时 日 月 周
pub fn validate_cron_expression(expression: &str) -> Result<(), CronError> {
    cron::Schedule::from_str(expression)
        .map(|_| ())
        .map_err(|err| CronError::InvalidExpression(expression.to_string(), err.to_string()))
}

/// 定时任务，目前只有每日清零今日运动时长
#[derive(Clone)]
pub struct CronService {
    sched: JobScheduler,
    exercise_service: Arc<ExerciseService>,
}

impl CronService {
    pub fn new(sched: &JobScheduler, exercise_service: &Arc<ExerciseService>) -> Self {
        Self {
            sched: sched.clone(),
            exercise_service: Arc::clone(exercise_service),
        }
    }

    /// 表达式为空时不启动，按本地时区执行
    pub async fn start_exercise_reset_job(
        &self,
        expression: &str,
    ) -> Result<Option<Uuid>, CronError> {
        if expression.trim().is_empty() {
            tracing::info!("start_exercise_reset_job - disabled");
            return Ok(None);
        }
        validate_cron_expression(expression)?;

        let exercise_service = Arc::clone(&self.exercise_service);
        let job = Job::new_async_tz(expression, chrono::Local, move |_uuid, _l| {
            let exercise_service = Arc::clone(&exercise_service);
            Box::pin(async move {
                if let Err(err) = exercise_service.reset_today_exercise().await {
                    tracing::error!("exercise reset job failed, error:{}", err);
                }
            })
        })?;
        let uuid = self.sched.add(job).await?;
        self.sched.start().await?;
        tracing::info!(
            "start_exercise_reset_job - cron:{} | uuid:{}",
            expression,
            uuid
        );
        Ok(Some(uuid))
    }
}
