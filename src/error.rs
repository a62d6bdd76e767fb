use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("grid size {size} is too small, need at least 4 to fit the agent and one pellet")]
    GridTooSmall { size: usize },

    #[error("grid size {size} is too large, at most {max} is supported")]
    GridTooLarge { size: usize, max: usize },

    #[error(
        "density {density} does not fit the grid, at most {capacity} pellets fit next to the agent"
    )]
    TooManyPellets { density: usize, capacity: usize },

    #[error("density must be at least 1")]
    NoPellets,

    #[error("max_steps must allow at least one step per episode")]
    NoSteps,

    #[error("{name} must be a finite value in [0, 1], got {value}")]
    Hyperparameter { name: &'static str, value: f64 },

    #[error("could not write statistics")]
    Io(#[from] std::io::Error),

    #[error("could not encode statistics")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
