use crate::board_display::BoardDisplay;
use crate::network::Connection;
use crate::network_protocol::GameMessage;
use anyhow::{bail, Context, Result};
use battleship_zk_core::{fe_from_hex, prover, shoot, verify_with_root, Fr, Secret};
use rand::rngs::OsRng;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Runs one match: exchanges commitments, then alternates turns, proving
/// every answer we give and verifying every answer we receive.
pub struct GameCoordinator {
    secret: Secret,
    root_hex: String,
    keys_dir: PathBuf,

    peer_root: Option<Fr>,
    peer_vk_path: PathBuf,
    peer_name: String,

    own_view: BoardDisplay,
    tracking: BoardDisplay,

    network: Connection,
    player_name: String,
    my_turn: bool,
}

impl GameCoordinator {
    pub fn new(
        secret: Secret,
        root_hex: String,
        keys_dir: PathBuf,
        network: Connection,
        player_name: String,
        starts_first: bool,
    ) -> Self {
        let peer_vk_path = keys_dir.join("opponent.vk");
        Self {
            secret,
            root_hex,
            keys_dir,
            peer_root: None,
            peer_vk_path,
            peer_name: String::new(),
            own_view: BoardDisplay::new(),
            tracking: BoardDisplay::new(),
            network,
            player_name,
            my_turn: starts_first,
        }
    }

    /// Exchange salted roots and verifying keys. After this, every incoming
    /// answer is checked against exactly the root and key pinned here.
    pub fn handshake(&mut self) -> Result<()> {
        println!("\n🤝 Exchanging commitments and verifying keys...");

        let vk_bytes = fs::read(self.keys_dir.join(prover::VK_FILE))
            .context("reading own verifying key")?;
        self.network.send(&GameMessage::BoardReady {
            root_hex: self.root_hex.clone(),
            verifying_key: vk_bytes,
            player_name: self.player_name.clone(),
        })?;

        match self.network.recv()? {
            GameMessage::BoardReady {
                root_hex,
                verifying_key,
                player_name,
            } => {
                let root = fe_from_hex(&root_hex).context("peer sent an invalid salted root")?;
                fs::write(&self.peer_vk_path, verifying_key)
                    .context("storing peer verifying key")?;
                self.peer_root = Some(root);
                self.peer_name = player_name.clone();
                println!("✓ Received commitment from {player_name}");
                println!("   Opponent root: {root_hex}");
            }
            _ => bail!("expected BoardReady message"),
        }

        println!("\n✓ Handshake complete! Game starting...\n");
        Ok(())
    }

    /// Main game loop.
    pub fn play_game(&mut self) -> Result<()> {
        loop {
            self.display_boards();

            if self.my_turn {
                // My turn: keep shooting until I miss.
                loop {
                    let hit = self.take_turn()?;

                    if self.tracking.all_ships_down() {
                        println!("\n🎉 YOU WIN! All 17 opponent ship cells destroyed!");
                        self.network.send(&GameMessage::GameOver {
                            winner: self.player_name.clone(),
                        })?;
                        return Ok(());
                    }

                    if !hit {
                        println!("\n⚠️  You missed! Turn passes to opponent.\n");
                        break;
                    }
                    println!("\n🔥 HIT! You get another shot!\n");
                }
            } else {
                // Opponent's turn: they keep shooting until they miss.
                loop {
                    let hit = self.respond_to_shot()?;

                    if self.own_view.all_ships_down() {
                        println!("\n💔 YOU LOSE! All your ships are destroyed!");
                        return Ok(());
                    }

                    if !hit {
                        println!("\n✅ Opponent missed! Your turn!\n");
                        break;
                    }
                    println!("\n⚠️  Opponent hit! They shoot again...\n");
                }
            }

            self.my_turn = !self.my_turn;
        }
    }

    fn take_turn(&mut self) -> Result<bool> {
        println!("\n╔═══════════════════════════════════════╗");
        println!("║           YOUR TURN                   ║");
        println!("╚═══════════════════════════════════════╝");

        let (row, col) = self.prompt_shot()?;

        println!("\n🎯 Firing at ({row}, {col})...");
        self.network.send(&GameMessage::TakeShot { row, col })?;

        println!("⏳ Waiting for proof from opponent...");
        match self.network.recv()? {
            GameMessage::ShotResult {
                row: r,
                col: c,
                payload,
            } => {
                if (r, c) != (row, col) {
                    bail!("opponent answered ({r}, {c}) instead of ({row}, {col})");
                }

                let trusted_root = self.peer_root.context("handshake not completed")?;
                let outcome = verify_with_root(&self.peer_vk_path, trusted_root, payload)
                    .context("invalid proof from opponent")?;
                if !outcome.valid {
                    bail!("invalid proof from opponent");
                }

                let hit = outcome.hit == 1;
                self.tracking.record_shot(row, col, hit);
                println!(
                    "✅ Proof verified: {}",
                    if hit { "💥 HIT!" } else { "💨 MISS" }
                );
                Ok(hit)
            }
            GameMessage::GameOver { winner } => {
                println!("\n💔 {winner} wins!");
                std::process::exit(0);
            }
            _ => bail!("unexpected message"),
        }
    }

    fn respond_to_shot(&mut self) -> Result<bool> {
        println!("\n╔═══════════════════════════════════════╗");
        println!("║        OPPONENT'S TURN                ║");
        println!("╚═══════════════════════════════════════╝");

        println!("⏳ Waiting for opponent's shot...");
        match self.network.recv()? {
            GameMessage::TakeShot { row, col } => {
                println!("🎯 Opponent shot at ({row}, {col})");
                println!("🔐 Proving the outcome...");

                let answer = shoot(&self.secret, &self.keys_dir, row, col, &mut OsRng)?;
                let hit = answer.bit == 1;

                self.network.send(&GameMessage::ShotResult {
                    row,
                    col,
                    payload: answer.payload,
                })?;

                self.own_view.record_shot(row, col, hit);
                println!(
                    "{}",
                    if hit {
                        "💥 They HIT your ship!"
                    } else {
                        "💨 They missed!"
                    }
                );
                Ok(hit)
            }
            GameMessage::GameOver { winner } => {
                println!("\n🎉 {winner} wins!");
                std::process::exit(0);
            }
            _ => bail!("unexpected message"),
        }
    }

    fn prompt_shot(&self) -> Result<(u8, u8)> {
        loop {
            print!("Enter coordinates to fire (row,col): ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            let parts: Vec<&str> = input.trim().split(',').collect();
            if parts.len() != 2 {
                println!("Invalid format. Use: row,col");
                continue;
            }

            let row: u8 = match parts[0].trim().parse() {
                Ok(v) if v < 10 => v,
                _ => {
                    println!("Row must be 0-9");
                    continue;
                }
            };

            let col: u8 = match parts[1].trim().parse() {
                Ok(v) if v < 10 => v,
                _ => {
                    println!("Column must be 0-9");
                    continue;
                }
            };

            return Ok((row, col));
        }
    }

    fn display_boards(&self) {
        println!("\n");
        println!("╔═══════════════════════════════════════════════╗");
        println!("║  {} vs {}                    ", self.player_name, self.peer_name);
        println!(
            "║  Hits taken: {}/17 | Hits scored: {}/17       ",
            self.own_view.hits(),
            self.tracking.hits()
        );
        println!("╚═══════════════════════════════════════════════╝");

        self.tracking.display_opponent_board();
        self.own_view.display_own_board(&self.secret.board);
    }
}
