use std::fmt;
use std::time::Duration;

/// Phases of a single engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Converting `f32` inputs to the session's element types.
    Align = 0,
    Inference = 1,
    /// Converting outputs back to `f32`.
    Extract = 2,
}

/// Timings of one run, indexed by [`Stage`].
pub type StageTimes = [Duration; 3];

/// Running totals of per-stage timings across engine runs.
#[derive(Debug, Default, Clone)]
pub struct RunTimes {
    runs: u32,
    totals: StageTimes,
}

impl RunTimes {
    pub fn record(&mut self, times: StageTimes) {
        for (total, t) in self.totals.iter_mut().zip(times) {
            *total += t;
        }
        self.runs += 1;
    }

    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn total(&self) -> Duration {
        self.totals.iter().sum()
    }

    /// Mean duration of a whole run, zero before the first one.
    pub fn avg(&self) -> Duration {
        self.total().checked_div(self.runs).unwrap_or_default()
    }

    pub fn avg_stage(&self, stage: Stage) -> Duration {
        self.totals[stage as usize].checked_div(self.runs).unwrap_or_default()
    }
}

impl fmt::Display for RunTimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} run(s), avg {:.3?} [align {:.3?} | inference {:.3?} | extract {:.3?}]",
            self.runs,
            self.avg(),
            self.avg_stage(Stage::Align),
            self.avg_stage(Stage::Inference),
            self.avg_stage(Stage::Extract),
        )
    }
}
