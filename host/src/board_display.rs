use battleship_zk_core::{Board, Position, BOARD_SIZE, SHIP_CELLS};
use std::collections::HashSet;

/// Tracks proven shot outcomes for one side of the table. Proofs only ever
/// reveal hit/miss, so there is no per-ship bookkeeping; the game ends when
/// all 17 ship cells are confirmed hit.
pub struct BoardDisplay {
    shots: HashSet<Position>,
    hits: HashSet<Position>,
}

impl BoardDisplay {
    pub fn new() -> Self {
        Self {
            shots: HashSet::new(),
            hits: HashSet::new(),
        }
    }

    pub fn record_shot(&mut self, row: u8, col: u8, hit: bool) {
        let pos = Position::new(row, col);
        self.shots.insert(pos);
        if hit {
            self.hits.insert(pos);
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.len()
    }

    pub fn all_ships_down(&self) -> bool {
        self.hits.len() >= SHIP_CELLS
    }

    /// Display your own board (ships visible, opponent shots overlaid).
    pub fn display_own_board(&self, board: &Board) {
        println!("\n╔═══════════════════════════════════════╗");
        println!("║        YOUR BOARD (Ships Visible)     ║");
        println!("╠═══════════════════════════════════════╣");

        print!("║   ");
        for col in 0..BOARD_SIZE {
            print!(" {col} ");
        }
        println!(" ║");
        println!("║  ┌────────────────────────────────┐ ║");

        for row in 0..BOARD_SIZE {
            print!("║ {row} │");
            for col in 0..BOARD_SIZE {
                let pos = Position::new(row as u8, col as u8);
                let ship = board.bit(row as u8, col as u8) == 1;
                let symbol = if self.hits.contains(&pos) {
                    "X"
                } else if self.shots.contains(&pos) {
                    "O"
                } else if ship {
                    "#"
                } else {
                    "~"
                };
                print!(" {symbol} ");
            }
            println!("│ ║");
        }

        println!("║  └────────────────────────────────┘ ║");
        println!("╚═══════════════════════════════════════╝");
        println!("\n  [#]=Ship  [X]=Hit  [O]=Miss  [~]=Water");
    }

    /// Display the tracking grid (opponent ships hidden, only proven
    /// hits/misses).
    pub fn display_opponent_board(&self) {
        println!("\n╔═══════════════════════════════════════╗");
        println!("║    OPPONENT BOARD (Ships Hidden)      ║");
        println!("╠═══════════════════════════════════════╣");

        print!("║   ");
        for col in 0..BOARD_SIZE {
            print!(" {col} ");
        }
        println!(" ║");
        println!("║  ┌────────────────────────────────┐ ║");

        for row in 0..BOARD_SIZE {
            print!("║ {row} │");
            for col in 0..BOARD_SIZE {
                let pos = Position::new(row as u8, col as u8);
                let symbol = if self.hits.contains(&pos) {
                    "X"
                } else if self.shots.contains(&pos) {
                    "O"
                } else {
                    "~"
                };
                print!(" {symbol} ");
            }
            println!("│ ║");
        }

        println!("║  └────────────────────────────────┘ ║");
        println!("╚═══════════════════════════════════════╝");
        println!("\n  [X]=Hit (proof verified)  [O]=Miss (proof verified)  [~]=Unknown");
    }
}
