use std::collections::BTreeMap;

/// Fraction of the episode's pellets still on the board.
pub const PELLETS_LEFT: &str = "pellets_left";
pub const BIAS: &str = "bias";
pub const HAZARD_ROW_OFFSET: &str = "hazard_row_offset";
pub const HAZARD_COL_OFFSET: &str = "hazard_col_offset";
pub const PELLET_ROW_OFFSET: &str = "pellet_row_offset";
pub const PELLET_COL_OFFSET: &str = "pellet_col_offset";
pub const WALL_UP: &str = "wall_up";
pub const WALL_DOWN: &str = "wall_down";
pub const WALL_LEFT: &str = "wall_left";
pub const WALL_RIGHT: &str = "wall_right";

/// Named real-valued signals describing a state.
///
/// Backed by an ordered map so iteration (and therefore any floating point
/// sum over the features) is the same on every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features(BTreeMap<&'static str, f64>);

impl Features {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, name: &'static str, value: f64) {
        self.0.insert(name, value);
    }

    /// Absent features read as 0.0.
    pub fn get(&self, name: &str) -> f64 {
        self.0.get(name).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.0.iter().map(|(name, value)| (*name, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(&'static str, f64)> for Features {
    fn from_iter<I: IntoIterator<Item = (&'static str, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
