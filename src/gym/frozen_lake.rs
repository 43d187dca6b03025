use strum::{Display, VariantArray};

use crate::{
    algo::QTable,
    env::{DiscreteActionSpace, DiscreteStateSpace, Environment},
    error::{Error, Result},
};

/// Reward for falling into a hole
pub const HOLE_REWARD: f32 = -9.0;
/// Reward for reaching the goal
pub const GOAL_REWARD: f32 = 9.0;

/// The default lake, fenced by a ring of holes so that no move can leave it
pub const MAP: [&str; 6] = [
    "HHHHHH", //
    "HSFFFH", //
    "HFHFHH", //
    "HFFFHH", //
    "HHFFGH", //
    "HHHHHH", //
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Square {
    Start,
    Frozen,
    Hole,
    Goal,
}

impl Square {
    /// Reward for stepping onto this square
    pub fn reward(self) -> f32 {
        match self {
            Square::Start | Square::Frozen => 0.0,
            Square::Hole => HOLE_REWARD,
            Square::Goal => GOAL_REWARD,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Square::Hole | Square::Goal)
    }
}

impl TryFrom<u8> for Square {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            b'S' => Ok(Square::Start),
            b'F' => Ok(Square::Frozen),
            b'H' => Ok(Square::Hole),
            b'G' => Ok(Square::Goal),
            other => Err(other),
        }
    }
}

#[derive(VariantArray, Display, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[strum(serialize_all = "lowercase")]
pub enum FLAction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl FLAction {
    /// `(row, col)` offset of the move
    pub fn offset(self) -> (isize, isize) {
        match self {
            FLAction::Up => (-1, 0),
            FLAction::Right => (0, 1),
            FLAction::Down => (1, 0),
            FLAction::Left => (0, -1),
        }
    }
}

impl From<FLAction> for usize {
    fn from(action: FLAction) -> Self {
        action as usize
    }
}

/// `(row, col)` position of the agent
pub type Pos = (usize, usize);

/// A deterministic FrozenLake in the spirit of Python [gymnasium](https://gymnasium.farama.org/)
///
/// The lake is a grid of `S`tart, `F`rozen, `H`ole and `G`oal squares. Every move
/// goes exactly where it points. Holes and the goal end the episode.
///
/// Squares are classified when they are stepped on, so a lake built from a
/// malformed map fails on the first transition into the bad square with
/// [`Error::InvalidCellKind`].
///
/// Intended for use with a [QTableAgent](crate::algo::QTableAgent)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenLake {
    map: Vec<u8>,
    rows: usize,
    cols: usize,
    start: Pos,
}

impl FrozenLake {
    /// The default 6x6 lake with the start at (1, 1) and the goal at (4, 4)
    pub fn new() -> Self {
        Self::from_rows(&MAP).expect("default map is well formed")
    }

    /// Build a lake from one string per grid row
    ///
    /// Rows must be non-empty ASCII of equal length, with exactly one `S`.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let invalid = |message: String| Error::InvalidGrid { message };

        let cols = rows
            .first()
            .map(|r| r.as_ref().len())
            .filter(|&n| n > 0)
            .ok_or_else(|| invalid("map has no squares".into()))?;

        let mut map = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if !row.is_ascii() {
                return Err(invalid(format!("row {i} is not ASCII")));
            }
            if row.len() != cols {
                return Err(invalid(format!(
                    "row {i} has {} squares, expected {cols}",
                    row.len()
                )));
            }
            map.extend_from_slice(row.as_bytes());
        }

        let mut starts = map.iter().enumerate().filter(|(_, &b)| b == b'S');
        let start = match (starts.next(), starts.next()) {
            (Some((i, _)), None) => (i / cols, i % cols),
            (None, _) => return Err(invalid("map has no start square".into())),
            (Some(_), Some(_)) => {
                return Err(invalid("map has more than one start square".into()))
            }
        };

        Ok(Self {
            map,
            rows: rows.len(),
            cols,
            start,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Look up the square at `pos`
    pub fn square(&self, (row, col): Pos) -> Result<Square> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::OutOfBounds {
                row: row as isize,
                col: col as isize,
            });
        }
        Square::try_from(self.map[row * self.cols + col]).map_err(|kind| {
            Error::InvalidCellKind {
                kind: kind as char,
                row,
                col,
            }
        })
    }

    /// The map with the agent's position marked by `*`
    pub fn render(&self, pos: &Pos) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for (r, row) in self.map.chunks(self.cols).enumerate() {
            for (c, &b) in row.iter().enumerate() {
                out.push(if (r, c) == *pos { '*' } else { b as char });
            }
            out.push('\n');
        }
        out
    }

    /// Lay out a table learned on this lake: one block per grid row, one line per
    /// action, one column per grid column
    ///
    /// **Panics** if the table was not sized for this lake
    pub fn render_q_table(&self, table: &QTable) -> String {
        assert_eq!(
            table.num_states(),
            self.num_states(),
            "Q-table does not match the lake size."
        );

        let mut out = String::from("col=  ");
        for c in 0..self.cols {
            out.push_str(&format!("{c:>8}"));
        }
        out.push('\n');

        for r in 0..self.rows {
            out.push_str(&format!("row: {r}\n"));
            for action in FLAction::VARIANTS {
                out.push_str(&format!("{:<6}", action.to_string()));
                for c in 0..self.cols {
                    let q = table.get(r * self.cols + c, usize::from(*action));
                    out.push_str(&format!("{q:>8.2}"));
                }
                out.push('\n');
            }
        }
        out
    }
}

impl Default for FrozenLake {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for FrozenLake {
    type State = Pos;
    type Action = FLAction;

    fn start(&self) -> Self::State {
        self.start
    }

    fn step(
        &self,
        &(row, col): &Self::State,
        action: Self::Action,
    ) -> Result<(Self::State, f32)> {
        let (dr, dc) = action.offset();
        let (r, c) = (row as isize + dr, col as isize + dc);
        if r < 0 || c < 0 {
            return Err(Error::OutOfBounds { row: r, col: c });
        }

        let next = (r as usize, c as usize);
        let reward = self.square(next)?.reward();
        Ok((next, reward))
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        self.square(*state).is_ok_and(Square::is_terminal)
    }
}

impl DiscreteActionSpace for FrozenLake {
    fn actions(&self) -> Vec<Self::Action> {
        FLAction::VARIANTS.to_vec()
    }
}

impl DiscreteStateSpace for FrozenLake {
    fn num_states(&self) -> usize {
        self.rows * self.cols
    }

    fn state_index(&self, &(row, col): &Self::State) -> usize {
        row * self.cols + col
    }
}
