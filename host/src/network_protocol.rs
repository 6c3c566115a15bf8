use battleship_zk_core::{codec, ShotProofPayload};
use serde::{Deserialize, Serialize};

/// Messages exchanged between the two instances, one JSON object per line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameMessage {
    /// Handshake: the sender has committed a board. Carries the salted root
    /// (the only commitment ever published) and the verifying key the
    /// receiver will check every answer against.
    BoardReady {
        root_hex: String,
        #[serde(with = "codec::base64_bytes")]
        verifying_key: Vec<u8>,
        player_name: String,
    },

    /// Ask the defender to answer a shot.
    TakeShot { row: u8, col: u8 },

    /// The defender's answer: the echoed coordinate plus the proof payload
    /// bound to its salted root.
    ShotResult {
        row: u8,
        col: u8,
        payload: ShotProofPayload,
    },

    /// Game over notification.
    GameOver { winner: String },

    /// Protocol error.
    Error { message: String },
}
