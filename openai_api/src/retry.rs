use std::time::Duration;

/// Fixed-delay bound on run status polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Longest time a request can spend waiting on a run.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 20);
        assert_eq!(policy.budget(), Duration::from_secs(20));
    }
}
