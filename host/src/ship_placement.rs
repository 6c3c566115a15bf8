use anyhow::Result;
use battleship_zk_core::{Board, Direction, Fleet, Position, Ship, ShipClass, BOARD_SIZE};
use std::io::{self, Write};

/// Place the standard fleet and return the bit grid that gets committed.
pub fn interactive_placement() -> Result<Board> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║       SHIP PLACEMENT - Zero-Knowledge         ║");
    println!("║  Only a salted commitment to this board will  ║");
    println!("║  ever be shared with your opponent.           ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    println!("Choose placement method:");
    println!("  1. Manual placement (choose each ship position)");
    println!("  2. Random placement (quick setup)");
    print!("\nEnter choice (1/2): ");
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().read_line(&mut choice)?;

    match choice.trim() {
        "1" => manual_placement(),
        "2" => random_placement(),
        _ => {
            println!("Invalid choice, using random placement");
            random_placement()
        }
    }
}

fn random_placement() -> Result<Board> {
    println!("\nGenerating random ship placement...");
    let fleet: Fleet = rand::random();

    display_fleet(&fleet);
    println!("\nShips randomly placed!");
    println!("   Press Enter to continue...");

    let mut buffer = String::new();
    io::stdin().read_line(&mut buffer)?;

    Ok(fleet.to_board())
}

fn manual_placement() -> Result<Board> {
    let mut fleet = Fleet::new();

    let ships_to_place = [
        (ShipClass::Carrier, "Carrier", 5),
        (ShipClass::Battleship, "Battleship", 4),
        (ShipClass::Cruiser, "Cruiser", 3),
        (ShipClass::Submarine, "Submarine", 3),
        (ShipClass::Destroyer, "Destroyer", 2),
    ];

    for (ship_class, name, length) in ships_to_place {
        loop {
            display_fleet(&fleet);
            println!("\n┌─────────────────────────────────────┐");
            println!("│ Placing: {name} (length: {length})        ");
            println!("└─────────────────────────────────────┘");

            let pos = match prompt_position("Enter starting position (row,col): ")? {
                Some(p) => p,
                None => continue,
            };

            let dir = match prompt_direction()? {
                Some(d) => d,
                None => continue,
            };

            if fleet.add_ship(Ship::new(ship_class, pos, dir)) {
                println!("✓ {name} placed successfully!");
                break;
            } else {
                println!("  Invalid placement! Ship overlaps or goes out of bounds.");
                println!("  Press Enter to try again...");
                let mut buffer = String::new();
                io::stdin().read_line(&mut buffer)?;
            }
        }
    }

    display_fleet(&fleet);
    println!("\n  All ships placed! Board is ready for commitment.\n");

    Ok(fleet.to_board())
}

fn display_fleet(fleet: &Fleet) {
    println!("\n  ┌────────────────────────────────┐");
    print!("  │ ");
    for col in 0..BOARD_SIZE {
        print!(" {col} ");
    }
    println!(" │");
    println!("  ├────────────────────────────────┤");

    for row in 0..BOARD_SIZE {
        print!("{row} │ ");
        for col in 0..BOARD_SIZE {
            let pos = (row as u8, col as u8).into();
            let mut found = false;

            for ship in &fleet.ships {
                if ship.cells().any(|p| p == pos) {
                    let symbol = match ship.class {
                        ShipClass::Carrier => "A",
                        ShipClass::Battleship => "B",
                        ShipClass::Cruiser => "C",
                        ShipClass::Submarine => "S",
                        ShipClass::Destroyer => "D",
                    };
                    print!(" {symbol} ");
                    found = true;
                    break;
                }
            }

            if !found {
                print!(" ~ ");
            }
        }
        println!(" │");
    }

    println!("  └────────────────────────────────┘");
}

fn prompt_position(prompt: &str) -> Result<Option<Position>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() != 2 {
        println!("Invalid format. Use: row,col (e.g. 3,5)");
        return Ok(None);
    }

    let row: u8 = match parts[0].trim().parse() {
        Ok(v) if (v as usize) < BOARD_SIZE => v,
        _ => {
            println!("Row must be between 0 and {}", BOARD_SIZE - 1);
            return Ok(None);
        }
    };

    let col: u8 = match parts[1].trim().parse() {
        Ok(v) if (v as usize) < BOARD_SIZE => v,
        _ => {
            println!("Column must be between 0 and {}", BOARD_SIZE - 1);
            return Ok(None);
        }
    };

    Ok(Some((row, col).into()))
}

fn prompt_direction() -> Result<Option<Direction>> {
    print!("Enter direction (h=horizontal, v=vertical): ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    match input.trim().to_lowercase().as_str() {
        "h" | "horizontal" => Ok(Some(Direction::Horizontal)),
        "v" | "vertical" => Ok(Some(Direction::Vertical)),
        _ => {
            println!("Invalid direction. Use 'h' or 'v'");
            Ok(None)
        }
    }
}
