use ndarray::Array2;

use crate::environment::{Environment, Pos};

pub const HAZARD: char = 'G';
pub const AGENT: char = 'O';
pub const PELLET: char = '.';
pub const WALL: char = 'X';
pub const EMPTY: char = ' ';

/// Glyph for every cell of the board, indexed `[[row, col]]`.
pub fn board(env: &Environment) -> Array2<char> {
    let size = env.size();
    Array2::from_shape_fn((size, size), |(r, c)| {
        let pos = Pos::new(r as i32, c as i32);
        if pos == env.hazard_position() {
            HAZARD
        } else if pos == env.agent_position() {
            AGENT
        } else if env.pellets().contains(&pos) {
            PELLET
        } else if env.is_border(pos) {
            WALL
        } else {
            EMPTY
        }
    })
}

/// Board as text, one line per row, cells separated by a space.
pub fn render(env: &Environment) -> String {
    let mut out = String::new();
    for row in board(env).outer_iter() {
        let line: Vec<String> = row.iter().map(char::to_string).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}
