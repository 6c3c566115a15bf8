mod board_display;
mod game_coordinator;
mod network;
mod network_protocol;
mod ship_placement;

use anyhow::Result;
use battleship_zk_core::commit;
use game_coordinator::GameCoordinator;
use network::Connection;
use rand::rngs::OsRng;
use std::io::{self, Write};
use std::path::PathBuf;

fn main() -> Result<()> {
    // In order to view logs, run `RUST_LOG=info cargo run`.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   ZERO-KNOWLEDGE BATTLESHIP - Multiplayer     ║");
    println!("║   Every answer ships with a Groth16 proof     ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    println!("Choose mode:");
    println!("  1. Host a game (wait for opponent)");
    println!("  2. Join a game (connect to opponent)");
    print!("\nEnter choice (1/2): ");
    io::stdout().flush()?;

    let mut choice = String::new();
    io::stdin().read_line(&mut choice)?;

    let (connection, starts_first) = match choice.trim() {
        "1" => (Connection::host(network::GAME_PORT)?, true),
        "2" => {
            print!("Enter opponent's IP address: ");
            io::stdout().flush()?;
            let mut ip = String::new();
            io::stdin().read_line(&mut ip)?;

            (Connection::join(ip.trim(), network::GAME_PORT)?, false)
        }
        _ => anyhow::bail!("invalid choice"),
    };

    print!("\nEnter your name: ");
    io::stdout().flush()?;
    let mut player_name = String::new();
    io::stdin().read_line(&mut player_name)?;
    let player_name = player_name.trim().to_string();

    println!("\nSHIP PLACEMENT");
    let board = ship_placement::interactive_placement()?;

    // First run compiles the circuit and runs the trusted setup, which takes
    // a while; later runs reuse the persisted keys.
    let keys_dir = PathBuf::from("./keys");
    println!("\nCommitting board (salted Merkle root + proof keys)...");
    let committed = commit(&board, &keys_dir, &mut OsRng)?;
    println!("Your board commitment: {}", committed.root_hex);

    let mut coordinator = GameCoordinator::new(
        committed.secret,
        committed.root_hex,
        keys_dir,
        connection,
        player_name,
        starts_first,
    );

    coordinator.handshake()?;
    coordinator.play_game()?;

    println!("\nGame Over! Thanks for playing!\n");
    Ok(())
}
