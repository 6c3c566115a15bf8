//! The defender's board: a 10x10 bit grid committed at game start, plus the
//! ship-placement model used to build one.
//!
//! Only the bit grid enters the commitment; ships exist so that callers can
//! place the standard fleet interactively or at random and end up with a
//! grid that passes validation (binary cells, exactly 17 ship cells).

use serde::{Deserialize, Serialize};

#[cfg(feature = "rand")]
use rand::{
    distributions::{Distribution, Standard},
    seq::SliceRandom,
    Rng,
};

use crate::error::Error;
use crate::{BOARD_SIZE, SHIP_CELLS};

// ============================================================================
// Ship placement model
// ============================================================================

#[derive(Copy, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, Hash)]
pub enum ShipClass {
    Carrier,
    Battleship,
    Cruiser,
    Submarine,
    Destroyer,
}

impl ShipClass {
    /// Length of the ship in cells.
    pub fn span(&self) -> u8 {
        match self {
            ShipClass::Carrier => 5,
            ShipClass::Battleship => 4,
            ShipClass::Cruiser => 3,
            ShipClass::Submarine => 3,
            ShipClass::Destroyer => 2,
        }
    }

    pub const fn list() -> &'static [ShipClass] {
        &[
            Self::Carrier,
            Self::Battleship,
            Self::Cruiser,
            Self::Submarine,
            Self::Destroyer,
        ]
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, Hash)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Step in a direction by a certain distance.
    pub fn step(self, dir: Direction, dist: u8) -> Self {
        match dir {
            Direction::Vertical => Self {
                row: self.row + dist,
                col: self.col,
            },
            Direction::Horizontal => Self {
                row: self.row,
                col: self.col + dist,
            },
        }
    }

    pub fn in_bounds(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }
}

impl From<(u8, u8)> for Position {
    fn from(value: (u8, u8)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Copy, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Direction {
    Horizontal,
    Vertical,
}

#[cfg(feature = "rand")]
impl Distribution<Direction> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        if rng.gen::<bool>() {
            Direction::Horizontal
        } else {
            Direction::Vertical
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ship {
    pub class: ShipClass,
    pub pos: Position,
    pub dir: Direction,
}

impl Ship {
    pub fn new(class: ShipClass, pos: impl Into<Position>, dir: Direction) -> Self {
        Ship {
            class,
            pos: pos.into(),
            dir,
        }
    }

    /// Iterator over all cells occupied by the ship.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.class.span()).map(|offset| self.pos.step(self.dir, offset))
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.cells().any(|p| other.cells().any(|q| p == q))
    }

    pub fn in_bounds(&self) -> bool {
        self.pos.in_bounds() && self.pos.step(self.dir, self.class.span() - 1).in_bounds()
    }
}

/// A working set of placed ships, built up one ship at a time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Fleet {
    pub ships: Vec<Ship>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self) -> bool {
        for ship in &self.ships {
            if !ship.in_bounds() {
                return false;
            }
        }

        // Each ship class appears exactly once.
        let mut classes = ShipClass::list().to_vec();
        for ship in &self.ships {
            if let Some(pos) = classes.iter().position(|&c| c == ship.class) {
                classes.swap_remove(pos);
            } else {
                return false;
            }
        }
        if !classes.is_empty() {
            return false;
        }

        for (i, ship_i) in self.ships.iter().enumerate() {
            for ship_j in self.ships.iter().skip(i + 1) {
                if ship_i.intersects(ship_j) {
                    return false;
                }
            }
        }

        true
    }

    /// Add a ship if it fits: in bounds, class unused, no overlap.
    pub fn add_ship(&mut self, new_ship: Ship) -> bool {
        if !new_ship.in_bounds() {
            return false;
        }

        for ship in &self.ships {
            if ship.class == new_ship.class || ship.intersects(&new_ship) {
                return false;
            }
        }

        self.ships.push(new_ship);
        true
    }

    pub fn is_complete(&self) -> bool {
        self.ships.len() == ShipClass::list().len() && self.check()
    }

    /// Rasterize the fleet into the bit grid that gets committed.
    pub fn to_board(&self) -> Board {
        let mut board = Board::default();
        for ship in &self.ships {
            for p in ship.cells() {
                board.cells[p.row as usize][p.col as usize] = 1;
            }
        }
        board
    }
}

#[cfg(feature = "rand")]
impl Distribution<Fleet> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Fleet {
        let mut positions: Vec<Position> = (0..BOARD_SIZE as u8)
            .flat_map(|r| (0..BOARD_SIZE as u8).map(move |c| Position::new(r, c)))
            .collect();
        positions.shuffle(rng);

        let mut fleet = Fleet::new();

        'outer: for &ship_class in ShipClass::list() {
            for &pos in &positions {
                for dir in [Direction::Horizontal, Direction::Vertical] {
                    if fleet.add_ship(Ship::new(ship_class, pos, dir)) {
                        continue 'outer;
                    }
                }
            }
            unreachable!("a 10x10 grid always fits the standard fleet");
        }

        fleet
    }
}

#[cfg(feature = "rand")]
impl Distribution<Board> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Board {
        rng.gen::<Fleet>().to_board()
    }
}

// ============================================================================
// Committed bit grid
// ============================================================================

/// 10x10 grid of cells. 0 = water, 1 = ship.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Board {
    pub cells: [[u8; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Commit-time invariant: every cell binary, exactly 17 ship cells.
    pub fn validate(&self) -> Result<(), Error> {
        let mut total = 0usize;
        for row in &self.cells {
            for &v in row {
                if v != 0 && v != 1 {
                    return Err(Error::BoardInvalid("board has non-binary cell"));
                }
                total += v as usize;
            }
        }
        if total != SHIP_CELLS {
            return Err(Error::BoardInvalid(
                "board must contain exactly 17 ship cells",
            ));
        }
        Ok(())
    }

    /// Row-major flattening: linear index i maps to (i / 10, i % 10).
    pub fn flatten(&self) -> Vec<u8> {
        self.cells.iter().flat_map(|row| row.iter().copied()).collect()
    }

    pub fn bit(&self, row: u8, col: u8) -> u8 {
        self.cells[row as usize][col as usize]
    }
}

// ============================================================================
// Tests
// ============================================================================
