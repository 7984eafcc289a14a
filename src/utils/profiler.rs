use std::time::{Duration, Instant};

/// Scopes slower than this are reported at warn level.
const DEFAULT_BUDGET: Duration = Duration::from_millis(50);

/// Logs how long a scope took once it is dropped.
pub struct ScopeTimer {
    name: &'static str,
    start: Instant,
    budget: Duration,
}

impl ScopeTimer {
    pub fn new(name: &'static str) -> Self {
        Self::with_budget(name, DEFAULT_BUDGET)
    }

    pub fn with_budget(name: &'static str, budget: Duration) -> Self {
        Self {
            name,
            start: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn level_for(&self, elapsed: Duration) -> log::Level {
        if elapsed > self.budget {
            log::Level::Warn
        } else {
            log::Level::Debug
        }
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        log::log!(self.level_for(elapsed), "[TIMER] {} took {:?}", self.name, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_budget_is_a_warning() {
        let timer = ScopeTimer::with_budget("test", Duration::from_millis(5));
        assert_eq!(timer.level_for(Duration::from_millis(1)), log::Level::Debug);
        assert_eq!(timer.level_for(Duration::from_millis(6)), log::Level::Warn);
    }
}
