//! Wall-clock timing per pipeline stage.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Duration of one completed stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTiming {
    pub stage: String,
    pub millis: u64,
}

/// Records stage durations in completion order.
#[derive(Debug, Default)]
pub struct StageTimer {
    timings: Vec<StageTiming>,
}

impl StageTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, recording how long it took under `stage`.
    pub fn time<T>(&mut self, stage: &str, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        let millis = start.elapsed().as_millis() as u64;
        debug!(stage, millis, "stage finished");
        self.timings.push(StageTiming {
            stage: stage.to_string(),
            millis,
        });
        out
    }

    pub fn timings(&self) -> &[StageTiming] {
        &self.timings
    }

    pub fn into_timings(self) -> Vec<StageTiming> {
        self.timings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let mut timer = StageTimer::new();
        let a = timer.time("density", || 1);
        let b = timer.time("merge", || 2);
        assert_eq!(a + b, 3);
        let stages: Vec<&str> = timer.timings().iter().map(|t| t.stage.as_str()).collect();
        assert_eq!(stages, vec!["density", "merge"]);
    }
}
