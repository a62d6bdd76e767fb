use std::collections::HashSet;

use rand::{
    distributions::{Distribution, Standard},
    rngs::StdRng,
    seq::SliceRandom,
    Rng, SeedableRng,
};
use tracing::{debug, trace};

use crate::config::GridConfig;
use crate::error::Result;
use crate::features::{self, Features};

/// Reward for running into the hazard or a wall. Ends the episode.
pub const CAUGHT_REWARD: i32 = -100;
pub const PELLET_REWARD: i32 = 10;

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Movement {
    Right,
    Down,
    Left,
    Up,
}

// Order matters: hazard spawn points are indexed the same way.
const DIRECTIONS: [Movement; 4] = [Movement::Right, Movement::Down, Movement::Left, Movement::Up];

impl Movement {
    pub fn into_vector(self) -> (i32, i32) {
        match self {
            Movement::Right => ( 0, 1),
            Movement::Down  => ( 1, 0),
            Movement::Left  => ( 0,-1),
            Movement::Up    => (-1, 0),
        }
    }

    pub fn actions() -> &'static [Movement] {
        &DIRECTIONS
    }
}

impl Distribution<Movement> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Movement {
        DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn step(self, movement: Movement) -> Pos {
        let (dr, dc) = movement.into_vector();
        Pos::new(self.row + dr, self.col + dc)
    }

    pub fn manhattan(self, other: Pos) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

/// Square board with pellets to collect and a hazard sweeping across it.
///
/// The agent starts on an interior cell. Each [`update`](Self::update) moves
/// the agent by the chosen action and the hazard by its fixed direction, then
/// scores the step. Touching the border or the hazard costs
/// [`CAUGHT_REWARD`] and ends the episode; eating the last pellet ends it too.
pub struct Environment {
    size: usize,
    density: usize,
    agent: Pos,
    hazard: Pos,
    hazard_direction: Movement,
    pellets: HashSet<Pos>,
    last_reward: i32,
    rng: StdRng,
}

impl Environment {
    pub fn new(config: GridConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn seeded(config: GridConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GridConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let mut env = Self {
            size: config.size,
            density: config.density,
            agent: Pos::new(1, 1),
            hazard: Pos::new(1, 0),
            hazard_direction: Movement::Right,
            pellets: HashSet::with_capacity(config.density),
            last_reward: 0,
            rng,
        };
        env.initialize();
        Ok(env)
    }

    /// Start a new episode: fresh agent start, pellets and hazard.
    pub fn initialize(&mut self) {
        let last = self.last();
        let mut locations: Vec<Pos> = (1..last)
            .flat_map(|r| (1..last).map(move |c| Pos::new(r, c)))
            .collect();
        locations.shuffle(&mut self.rng);

        // GridConfig::validate guarantees density + 1 interior cells
        self.agent = locations[0];
        self.pellets = locations[1..=self.density].iter().copied().collect();

        self.new_ghost();
        self.last_reward = 0;
        debug!(agent = ?self.agent, hazard = ?self.hazard, "episode initialized");
    }

    // Spawn the hazard at one end of the agent's row or column, heading
    // across the board.
    fn new_ghost(&mut self) {
        let Pos { row, col } = self.agent;
        let last = self.last();
        let spawns = [
            (Pos::new(row, 0), DIRECTIONS[0]),
            (Pos::new(0, col), DIRECTIONS[1]),
            (Pos::new(row, last), DIRECTIONS[2]),
            (Pos::new(last, col), DIRECTIONS[3]),
        ];
        let (position, direction) = spawns[self.rng.gen_range(0..spawns.len())];
        self.hazard = position;
        self.hazard_direction = direction;
    }

    /// Actions available to the agent, empty once the episode is over.
    pub fn actions(&self) -> &'static [Movement] {
        if self.is_terminal() {
            &[]
        } else {
            Movement::actions()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.last_reward == CAUGHT_REWARD || self.pellets.is_empty()
    }

    /// Reward earned by the most recent update.
    pub fn reward(&self) -> i32 {
        self.last_reward
    }

    /// Advance the episode by one step.
    ///
    /// # Panics
    ///
    /// Panics if the episode is already over.
    pub fn update(&mut self, action: Movement) {
        assert!(
            !self.is_terminal(),
            "update called on a finished episode, call initialize first"
        );
        let agent_prev = self.agent;
        let hazard_prev = self.hazard;

        self.agent = self.agent.step(action);
        self.hazard = self.hazard.step(self.hazard_direction);

        // hazard is replaced as soon as it leaves
        if self.is_border(self.hazard) {
            self.new_ghost();
        }

        self.last_reward = if self.agent == self.hazard {
            CAUGHT_REWARD
        } else if (agent_prev, hazard_prev) == (self.hazard, self.agent) {
            // crossed paths
            CAUGHT_REWARD
        } else if self.is_border(self.agent) {
            CAUGHT_REWARD
        } else if self.pellets.remove(&self.agent) {
            PELLET_REWARD
        } else {
            0
        };
        trace!(
            ?action,
            agent = ?self.agent,
            hazard = ?self.hazard,
            reward = self.last_reward,
            "step"
        );
    }

    /// Feature snapshot of the current state.
    pub fn state(&self) -> Features {
        let size = self.size as f64;
        let mut s = Features::new();
        s.insert(
            features::PELLETS_LEFT,
            self.pellets.len() as f64 / self.density as f64,
        );
        s.insert(features::BIAS, 1.0);

        s.insert(
            features::HAZARD_ROW_OFFSET,
            f64::from(self.hazard.row - self.agent.row) / size,
        );
        s.insert(
            features::HAZARD_COL_OFFSET,
            f64::from(self.hazard.col - self.agent.col) / size,
        );

        let (pellet_dr, pellet_dc) = self
            .nearest_pellet()
            .map(|p| (p.row - self.agent.row, p.col - self.agent.col))
            .unwrap_or((0, 0));
        s.insert(features::PELLET_ROW_OFFSET, f64::from(pellet_dr) / size);
        s.insert(features::PELLET_COL_OFFSET, f64::from(pellet_dc) / size);

        for (name, movement) in [
            (features::WALL_UP, Movement::Up),
            (features::WALL_DOWN, Movement::Down),
            (features::WALL_LEFT, Movement::Left),
            (features::WALL_RIGHT, Movement::Right),
        ] {
            let wall = if self.is_border(self.agent.step(movement)) { 1.0 } else { 0.0 };
            s.insert(name, wall);
        }
        s
    }

    fn nearest_pellet(&self) -> Option<Pos> {
        self.pellets
            .iter()
            .copied()
            .min_by_key(|p| (p.manhattan(self.agent), *p))
    }

    pub fn is_border(&self, pos: Pos) -> bool {
        let last = self.last();
        pos.row <= 0 || pos.row >= last || pos.col <= 0 || pos.col >= last
    }

    fn last(&self) -> i32 {
        self.size as i32 - 1
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn density(&self) -> usize {
        self.density
    }

    pub fn agent_position(&self) -> Pos {
        self.agent
    }

    pub fn hazard_position(&self) -> Pos {
        self.hazard
    }

    pub fn hazard_direction(&self) -> Movement {
        self.hazard_direction
    }

    pub fn pellets(&self) -> &HashSet<Pos> {
        &self.pellets
    }
}
