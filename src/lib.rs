//! Pellet-collecting grid world with an epsilon-greedy agent learning a
//! linear action-value function.

pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod features;
pub mod render;
pub mod rl;
pub mod stats;
pub mod training;

pub use agent::Agent;
pub use config::{GridConfig, Hyperparameters, TrainingConfig};
pub use environment::{Environment, Movement, Pos};
pub use error::{Error, Result};
pub use features::Features;
pub use rl::{LinearQ, ValueEstimator, Weights};
pub use stats::{EpisodeStats, Outcome};
