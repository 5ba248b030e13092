use std::time::Duration;
use tokio::time::Instant;

pub const SEND_READY_EXPRESSION: &str = "typeof window.app === 'object'";

/// How long the live probe keeps listening after navigation completes.
#[derive(Debug, Clone)]
pub struct SettlePolicy {
    /// Silence required before the page is considered settled.
    pub quiet_window: Duration,
    /// Hard upper bound on the settle phase, measured from the end of
    /// navigation (and readiness, when configured).
    pub max_settle: Duration,
    /// JavaScript expression that must evaluate to `true` before the quiet
    /// window starts counting.
    pub ready_expression: Option<String>,
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self {
            quiet_window: Duration::from_millis(1500),
            max_settle: Duration::from_secs(15),
            ready_expression: Some(SEND_READY_EXPRESSION.to_string()),
            ready_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(200),
        }
    }
}

impl SettlePolicy {
    pub fn without_readiness(mut self) -> Self {
        self.ready_expression = None;
        self
    }

    pub fn with_quiet_window(mut self, quiet_window: Duration) -> Self {
        self.quiet_window = quiet_window;
        self
    }

    pub fn with_max_settle(mut self, max_settle: Duration) -> Self {
        self.max_settle = max_settle;
        self
    }
}

/// Tracks network activity during the settle phase.
#[derive(Debug, Clone)]
pub struct Quiescence {
    quiet_window: Duration,
    hard_deadline: Instant,
    last_activity: Instant,
}

impl Quiescence {
    pub fn start(policy: &SettlePolicy, now: Instant) -> Self {
        Self {
            quiet_window: policy.quiet_window,
            hard_deadline: now + policy.max_settle,
            last_activity: now,
        }
    }

    pub fn record_activity(&mut self, now: Instant) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }

    /// When to stop listening, given the number of responses whose bodies
    /// are still outstanding. Outstanding bodies hold the page open until the
    /// hard deadline.
    pub fn deadline(&self, pending: usize) -> Instant {
        if pending > 0 {
            self.hard_deadline
        } else {
            (self.last_activity + self.quiet_window).min(self.hard_deadline)
        }
    }

    pub fn is_settled(&self, now: Instant, pending: usize) -> bool {
        now >= self.deadline(pending)
    }

    pub fn hit_hard_deadline(&self, now: Instant) -> bool {
        now >= self.hard_deadline
    }
}
