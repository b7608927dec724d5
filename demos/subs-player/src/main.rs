//! Play submarines against a peer over TCP.
//!
//! ```text
//! subs-player 0.0.0.0 --host        # wait for a peer
//! subs-player 192.168.1.20          # connect to a waiting peer
//! ```
//!
//! Set `RUST_LOG=debug` to see every packet.

mod game;

use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use subs::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::game::{Player, PlayerConfig, Role};

/// Command line options for the `subs-player` binary.
#[derive(Parser, Debug)]
#[command(name = "subs-player", about = "Play submarines!")]
struct Cli {
    /// Peer address to connect to, or the local interface to listen on
    /// with `--host`.
    ip: IpAddr,

    /// Wait for the peer to connect instead of connecting to it.
    #[arg(long, default_value_t = false)]
    host: bool,

    /// TCP port used by both peers.
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Attempts are drawn from `0..board-size` on both axes.
    #[arg(long, default_value_t = 10)]
    board_size: i64,

    /// Close the game after this many of our own attempts.
    #[arg(long)]
    max_turns: Option<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let addr = SocketAddr::new(cli.ip, cli.port);
    let stream_config = StreamConfig::default();

    let (stream, role) = if cli.host {
        tracing::info!(%addr, "waiting for a peer");
        (Stream::host(addr, &stream_config)?, Role::Host)
    } else {
        (Stream::connect(addr, &stream_config)?, Role::Client)
    };

    let config = PlayerConfig {
        version: stream_config.version.clone(),
        board_size: cli.board_size,
        max_turns: cli.max_turns,
    };
    let mut player = Player::new(stream, role, config, rand::rng());
    let outcome = player.run()?;

    tracing::info!(?outcome, attempts = player.attempts(), "game over");
    Ok(())
}
