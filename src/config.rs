use crate::error::{Error, Result};

/// Largest supported board side. Keeps cell coordinates inside `i32` and the
/// interior cell count inside `usize`.
pub const MAX_GRID_SIZE: usize = 4096;

/// Board dimensions and the number of pellets placed each episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Side length of the square grid, border included.
    pub size: usize,
    /// Pellets placed on interior cells at the start of every episode.
    pub density: usize,
}

impl GridConfig {
    pub fn new(size: usize, density: usize) -> Self {
        Self { size, density }
    }

    /// Number of cells strictly inside the border, `None` on overflow.
    pub fn interior_cells(&self) -> Option<usize> {
        let side = self.size.saturating_sub(2);
        side.checked_mul(side)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size < 4 {
            return Err(Error::GridTooSmall { size: self.size });
        }
        if self.size > MAX_GRID_SIZE {
            return Err(Error::GridTooLarge {
                size: self.size,
                max: MAX_GRID_SIZE,
            });
        }
        if self.density == 0 {
            return Err(Error::NoPellets);
        }
        let interior = self.interior_cells().ok_or(Error::GridTooLarge {
            size: self.size,
            max: MAX_GRID_SIZE,
        })?;
        // one interior cell is always taken by the agent
        let capacity = interior - 1;
        if self.density > capacity {
            return Err(Error::TooManyPellets {
                density: self.density,
                capacity,
            });
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(20, 10)
    }
}

/// Learning hyperparameters, fixed for the lifetime of an agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperparameters {
    /// Exploration rate
    pub epsilon: f64,
    /// Discount factor
    pub gamma: f64,
    /// Learning rate
    pub alpha: f64,
}

impl Hyperparameters {
    pub fn validate(&self) -> Result<()> {
        check_unit("epsilon", self.epsilon)?;
        check_unit("gamma", self.gamma)?;
        check_unit("alpha", self.alpha)
    }
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            epsilon: 0.05,
            gamma: 0.99,
            alpha: 0.01,
        }
    }
}

pub(crate) fn check_unit(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Hyperparameter { name, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingConfig {
    pub episodes: usize,
    /// Episodes are cut short after this many updates. `None` runs every
    /// episode until it terminates on its own.
    pub max_steps: Option<usize>,
    /// Emit a progress summary every `log_every` episodes, 0 disables it.
    pub log_every: usize,
}

impl TrainingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == Some(0) {
            return Err(Error::NoSteps);
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            max_steps: Some(1000),
            log_every: 100,
        }
    }
}
