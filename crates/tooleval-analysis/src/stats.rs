//! Per-level statistics over assessed records.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::models::{Level, Record};
use crate::pricing::round_to;

/// Decimal places of the interquartile mean in text reports.
pub const IQM_DISPLAY_DECIMALS: usize = 3;

/// Interquartile mean of `values`, which must already be sorted ascending.
///
/// The lowest and highest quarter are dropped; when the count is not a
/// multiple of four the two boundary values enter with a fractional weight.
/// Fewer than four values yield 0.
pub fn interquartile_mean(values: &[f64]) -> f64 {
    let n = values.len();
    let q = n / 4;
    if q == 0 {
        return 0.0;
    }

    if n % 4 == 0 {
        return values[q..n - q].iter().sum::<f64>() / (2 * q) as f64;
    }

    let quarter = n as f64 / 4.0;
    let weight = (q + 1) as f64 - quarter;
    let upper = n - 1 - q;
    let interior: f64 = values[q + 1..upper].iter().sum();
    let total = weight * values[q] + interior + weight * values[upper];
    total / (2.0 * quarter)
}

/// Summary of one difficulty level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelStats {
    pub level: Level,
    /// Records at this level
    pub count: usize,
    /// Records marked correct
    pub correct: usize,
    /// `correct / count`
    pub accuracy: f64,
    /// Interquartile mean of the record costs
    pub iqm_cost: f64,
}

impl LevelStats {
    /// Compute statistics for the records at `level`.
    ///
    /// Fails with [`AnalysisError::EmptyCohort`] when no record has that level.
    pub fn compute(records: &[Record], level: Level) -> Result<Self> {
        let cohort: Vec<&Record> = records.iter().filter(|r| r.level() == Some(level)).collect();
        if cohort.is_empty() {
            return Err(AnalysisError::EmptyCohort(level));
        }

        let count = cohort.len();
        let correct = cohort.iter().filter(|r| r.is_correct()).count();

        let mut costs: Vec<f64> = cohort.iter().map(|r| r.cost()).collect();
        costs.sort_by(f64::total_cmp);

        let stats = Self {
            level,
            count,
            correct,
            accuracy: correct as f64 / count as f64,
            iqm_cost: interquartile_mean(&costs),
        };
        debug!(level = %level, count, correct, iqm_cost = stats.iqm_cost, "Level statistics");
        Ok(stats)
    }
}

impl fmt::Display for LevelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.level, self.count)?;
        writeln!(
            f,
            "Correctness: {}/{} = {}",
            self.correct, self.count, self.accuracy
        )?;
        write!(
            f,
            "Interquartile mean for costs: {}",
            round_to(self.iqm_cost, IQM_DISPLAY_DECIMALS)
        )
    }
}

/// Statistics for every level, Easy to Hard.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub levels: Vec<LevelStats>,
}

impl StatisticsReport {
    /// Compute statistics for all levels. Every level must have records.
    pub fn compute(records: &[Record]) -> Result<Self> {
        let levels = Level::ALL
            .iter()
            .map(|&level| LevelStats::compute(records, level))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { levels })
    }

    /// Statistics for one level.
    pub fn level(&self, level: Level) -> Option<&LevelStats> {
        self.levels.iter().find(|s| s.level == level)
    }
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stats in &self.levels {
            writeln!(f)?;
            writeln!(f, "{stats}")?;
        }
        Ok(())
    }
}
