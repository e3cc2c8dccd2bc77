use futures_retry::{ErrorHandler, RetryPolicy};
use log::warn;
use std::{fmt::Display, time::Duration};

const DEFAULT_WAIT_TIME: Duration = Duration::from_secs(1);
const DEFAULT_MAX_NUM_ATTEMPTS: usize = 3;
const MAX_WAIT_TIME: Duration = Duration::from_secs(5 * 60);

/// Doubles the wait after every failed attempt, up to five minutes.
pub struct ExponentialRetryManager {
    description: String,
    init_wait_time: Duration,
    max_num_attempts: Option<usize>,
}

impl ExponentialRetryManager {
    pub fn new(
        description: &str,
        init_wait_time: Option<Duration>,
        max_num_attempts: Option<usize>,
    ) -> Self {
        Self {
            description: description.to_owned(),
            init_wait_time: init_wait_time.unwrap_or(DEFAULT_WAIT_TIME),
            max_num_attempts: Some(max_num_attempts.unwrap_or(DEFAULT_MAX_NUM_ATTEMPTS)),
        }
    }

    /// Never gives up.
    pub fn unlimited(description: &str, init_wait_time: Duration) -> Self {
        Self {
            description: description.to_owned(),
            init_wait_time,
            max_num_attempts: None,
        }
    }

    fn wait_time(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        self.init_wait_time
            .saturating_mul(2_u32.pow(exponent))
            .min(MAX_WAIT_TIME.max(self.init_wait_time))
    }
}

impl<E: Display> ErrorHandler<E> for ExponentialRetryManager {
    type OutError = E;

    fn handle(&mut self, attempt: usize, err: E) -> RetryPolicy<Self::OutError> {
        match self.max_num_attempts {
            Some(max_num_attempts) if attempt >= max_num_attempts => {
                RetryPolicy::ForwardError(err)
            }
            _ => {
                let wait_time = self.wait_time(attempt);
                warn!(
                    "{}: {}. Retrying in {}s (attempt {})",
                    self.description,
                    err,
                    wait_time.as_secs(),
                    attempt
                );
                RetryPolicy::WaitRetry(wait_time)
            }
        }
    }

    fn ok(&mut self, _attempt: usize) {}
}
