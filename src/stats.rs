use std::fmt;
use std::io;

use crate::error::Result;

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every pellet was eaten.
    Cleared,
    /// Hit the hazard or a wall.
    Caught,
    /// Cut short by the step limit.
    Truncated,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Cleared => "cleared",
            Outcome::Caught => "caught",
            Outcome::Truncated => "truncated",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeStats {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: i64,
    pub pellets_eaten: usize,
    pub outcome: Outcome,
    /// Largest absolute temporal difference error seen during the episode,
    /// 0.0 when nothing was learned.
    pub max_td_error: f64,
}

/// Aggregate over a run of episodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub episodes: usize,
    pub mean_reward: f64,
    pub mean_steps: f64,
    pub cleared: usize,
    pub caught: usize,
    pub truncated: usize,
}

impl Summary {
    pub fn of(stats: &[EpisodeStats]) -> Self {
        let n = stats.len().max(1) as f64;
        let count = |outcome| stats.iter().filter(|s| s.outcome == outcome).count();
        Self {
            episodes: stats.len(),
            mean_reward: stats.iter().map(|s| s.total_reward as f64).sum::<f64>() / n,
            mean_steps: stats.iter().map(|s| s.steps as f64).sum::<f64>() / n,
            cleared: count(Outcome::Cleared),
            caught: count(Outcome::Caught),
            truncated: count(Outcome::Truncated),
        }
    }
}

/// Write one CSV record per episode, preceded by a header row.
pub fn write_csv<W: io::Write>(writer: W, stats: &[EpisodeStats]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&[
        "episode",
        "steps",
        "total_reward",
        "pellets_eaten",
        "outcome",
        "max_td_error",
    ])?;
    for s in stats {
        wtr.write_record(&[
            s.episode.to_string(),
            s.steps.to_string(),
            s.total_reward.to_string(),
            s.pellets_eaten.to_string(),
            s.outcome.to_string(),
            s.max_td_error.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
