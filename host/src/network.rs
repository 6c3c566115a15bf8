use crate::network_protocol::GameMessage;
use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

/// Default port for direct play.
pub const GAME_PORT: u16 = 7878;

/// A blocking connection to the opponent carrying one JSON message per line.
pub struct Connection {
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl Connection {
    /// Host side: bind and wait for the opponent.
    pub fn host(port: u16) -> Result<Self> {
        println!("Starting server on port {port}...");
        let listener =
            TcpListener::bind(("0.0.0.0", port)).context("failed to bind to port")?;

        println!("   Waiting for opponent to connect...");
        println!("   Share your IP address and port {port} with your opponent.");

        let (stream, addr) = listener.accept()?;
        println!("✓ Opponent connected from {addr}");
        Self::over(stream)
    }

    /// Joining side: connect to the host.
    pub fn join(host: &str, port: u16) -> Result<Self> {
        println!("Connecting to {host}:{port}...");
        let stream =
            TcpStream::connect((host, port)).context("failed to connect to host")?;
        println!("✓ Connected to opponent!");
        Self::over(stream)
    }

    fn over(stream: TcpStream) -> Result<Self> {
        let reader = BufReader::new(stream.try_clone()?);
        Ok(Self { stream, reader })
    }

    pub fn send(&mut self, message: &GameMessage) -> Result<()> {
        let json = serde_json::to_string(message)?;
        writeln!(self.stream, "{json}")?;
        self.stream.flush()?;
        Ok(())
    }

    /// Receive the next message, blocking until one arrives.
    pub fn recv(&mut self) -> Result<GameMessage> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            anyhow::bail!("connection closed by opponent");
        }
        serde_json::from_str(&line).context("malformed message from opponent")
    }
}
