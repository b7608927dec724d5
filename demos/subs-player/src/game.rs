//! The turn loop: who sends what, and when.
//!
//! ```text
//! client                      host
//!   READY  ─────────────────→
//!          ←───────────────── READY
//!          ←───────────────── ATTEMPT (x, y)
//!   ANSWER ─────────────────→              (defender answers)
//!   ATTEMPT ────────────────→              (turn passes on a miss)
//!          ←───────────────── ANSWER
//!   ...
//! ```
//!
//! An attacker keeps its turn after CORRECT or FULL-SUB. The game ends on
//! ANSWER/VICTORY or ERROR/CLOSED. Hit detection is not implemented: every
//! attempt is answered INCORRECT.

use rand::Rng;
use subs::prelude::*;
use subs::Result;

/// Which side of the connection this player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Listens for the peer and defends first.
    Host,
    /// Connects to the host and attacks first.
    Client,
}

/// Settings for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    /// Protocol version stamped on every packet we build.
    pub version: String,
    /// Attempts are drawn from `0..board_size` on both axes.
    pub board_size: i64,
    /// Close the session after this many of our own attempts.
    pub max_turns: Option<u32>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            board_size: 10,
            max_turns: None,
        }
    }
}

/// Consecutive ERROR/UNEXPECTED replies answered with a resend before we
/// give up and close the session.
pub const MAX_RESENDS: u32 = 3;

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The peer answered one of our attempts with VICTORY.
    Won,
    /// The peer closed the session.
    PeerClosed,
    /// We hit `max_turns` and closed the session.
    TurnLimit,
    /// The peer kept rejecting our last packet, so we closed the session.
    Abandoned,
}

/// Returns `true` if the attacker attacks again after this answer.
pub fn attacker_keeps_turn(status: Option<Status>) -> bool {
    matches!(status, Some(Status::Correct | Status::FullSub))
}

fn outcome_of(terminating: &Packet) -> Outcome {
    match terminating.packet_type() {
        PacketType::Answer => Outcome::Won,
        _ => Outcome::PeerClosed,
    }
}

fn is_resend_request(packet: &Packet) -> bool {
    packet.packet_type() == PacketType::Error && packet.status() == Some(Status::Unexpected)
}

enum Turn {
    Keep,
    Pass,
    Over(Outcome),
}

/// One peer's side of a game.
pub struct Player<T, R> {
    stream: Stream<T>,
    role: Role,
    config: PlayerConfig,
    rng: R,
    attempts: u32,
    /// The last READY/ATTEMPT/ANSWER we sent, replayed when the peer
    /// replies ERROR/UNEXPECTED.
    last_sent: Option<Packet>,
    resends: u32,
}

impl<T: Transport, R: Rng> Player<T, R> {
    pub fn new(stream: Stream<T>, role: Role, config: PlayerConfig, rng: R) -> Self {
        Self {
            stream,
            role,
            config,
            rng,
            attempts: 0,
            last_sent: None,
            resends: 0,
        }
    }

    /// Number of attempts we have sent so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Plays until the game ends.
    ///
    /// # Errors
    /// Returns the transport error that ended the session. The peer has
    /// already been sent ERROR/CLOSED if that was still possible.
    pub fn run(&mut self) -> Result<Outcome> {
        if let Some(outcome) = self.handshake()? {
            return Ok(outcome);
        }

        let mut defending = self.role == Role::Host;
        loop {
            if defending {
                if let Some(outcome) = self.defend()? {
                    return Ok(outcome);
                }
            }
            match self.attack()? {
                Turn::Keep => defending = false,
                Turn::Pass => defending = true,
                Turn::Over(outcome) => return Ok(outcome),
            }
        }
    }

    /// Exchanges READY packets. Nothing but a READY from the peer starts
    /// the game.
    fn handshake(&mut self) -> Result<Option<Outcome>> {
        let ready = Packet::ready(self.config.version.as_str());
        if self.role == Role::Client {
            self.send(ready.clone())?;
        }

        loop {
            let reply = self.receive(PacketType::Ready)?;
            match reply.packet_type() {
                PacketType::Ready => break,
                PacketType::Error => {
                    if let Some(outcome) = self.ends_game(&reply)? {
                        return Ok(Some(outcome));
                    }
                    tracing::warn!(%reply, "peer reported an error before READY");
                }
                _ => {
                    // A VICTORY answer can't come before the game starts.
                    tracing::warn!(%reply, "answer received during the handshake");
                    self.notify(Status::Unexpected)?;
                }
            }
        }

        if self.role == Role::Host {
            self.send(ready)?;
        }
        tracing::info!(role = ?self.role, "both peers ready");
        Ok(None)
    }

    /// Answers attempts until the turn passes to us.
    fn defend(&mut self) -> Result<Option<Outcome>> {
        loop {
            let packet = self.receive(PacketType::Attempt)?;
            if let Some(outcome) = self.ends_game(&packet)? {
                return Ok(Some(outcome));
            }

            let (x, y) = match (packet.packet_type(), packet.coordinates()) {
                (PacketType::Attempt, Some(point)) => point,
                _ => {
                    tracing::warn!(%packet, "peer reported an error while attacking");
                    continue;
                }
            };

            let status = Status::Incorrect;
            let answer = Packet::answer(self.config.version.as_str(), status, x, y);
            self.send(answer)?;
            tracing::info!(x, y, %status, "answered attempt");

            if !attacker_keeps_turn(Some(status)) {
                return Ok(None);
            }
        }
    }

    /// Sends one attempt and waits for its answer.
    fn attack(&mut self) -> Result<Turn> {
        if self
            .config
            .max_turns
            .is_some_and(|max| self.attempts >= max)
        {
            tracing::info!(attempts = self.attempts, "turn limit reached");
            self.notify(Status::Closed)?;
            return Ok(Turn::Over(Outcome::TurnLimit));
        }

        let (x, y) = self.pick_target();
        self.attempts += 1;
        let attempt = Packet::attempt(self.config.version.as_str(), x, y);
        self.send(attempt)?;

        let reply = self.receive(PacketType::Answer)?;
        if let Some(outcome) = self.ends_game(&reply)? {
            return Ok(Turn::Over(outcome));
        }

        if reply.packet_type() != PacketType::Answer {
            tracing::warn!(%reply, "attempt rejected, passing the turn");
            return Ok(Turn::Pass);
        }
        tracing::info!(x, y, status = ?reply.status(), "attempt answered");
        Ok(if attacker_keeps_turn(reply.status()) {
            Turn::Keep
        } else {
            Turn::Pass
        })
    }

    /// Receives a packet of the wanted type.
    ///
    /// Bad packets are answered with ERROR/UNEXPECTED and the read is
    /// retried. An ERROR/UNEXPECTED from the peer is answered by resending
    /// our last packet, up to [`MAX_RESENDS`] times in a row; after that it
    /// is returned to the caller.
    ///
    /// Transport errors end the session: we try to send ERROR/CLOSED, then
    /// return the original error.
    fn receive(&mut self, wanted: PacketType) -> Result<Packet> {
        loop {
            match self.stream.receive_expecting(wanted) {
                Ok(packet) if is_resend_request(&packet) => {
                    let Some(last) = &self.last_sent else {
                        tracing::debug!("peer complained before we sent anything");
                        continue;
                    };
                    if self.resends >= MAX_RESENDS {
                        return Ok(packet);
                    }
                    self.resends += 1;
                    tracing::debug!(%last, resends = self.resends, "peer asked for a resend");
                    self.stream.send(last)?;
                }
                Ok(packet) => return Ok(packet),
                Err(e) if e.is_packet_error() => {
                    tracing::warn!(error = %e, "bad packet from peer");
                    self.notify(Status::Unexpected)?;
                }
                Err(e) => {
                    tracing::error!(error = %e, "connection lost");
                    if let Err(notify) = self.notify(Status::Closed) {
                        tracing::debug!(error = %notify, "could not notify peer");
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Maps a packet that ends the game to its outcome.
    ///
    /// An ERROR/UNEXPECTED only gets here once the resend budget is spent,
    /// so we close the session instead of resending forever.
    fn ends_game(&mut self, packet: &Packet) -> Result<Option<Outcome>> {
        if packet.is_terminating() {
            return Ok(Some(outcome_of(packet)));
        }
        if is_resend_request(packet) {
            tracing::warn!(resends = self.resends, "peer keeps rejecting our packets");
            self.notify(Status::Closed)?;
            return Ok(Some(Outcome::Abandoned));
        }
        Ok(None)
    }

    /// Sends a game packet and remembers it for resends.
    fn send(&mut self, packet: Packet) -> Result<()> {
        self.stream.send(&packet)?;
        self.last_sent = Some(packet);
        self.resends = 0;
        Ok(())
    }

    /// Sends an ERROR packet. These are never resent.
    fn notify(&mut self, status: Status) -> Result<()> {
        self.stream
            .send(&Packet::error(self.config.version.as_str(), status))
    }

    fn pick_target(&mut self) -> (i64, i64) {
        let size = self.config.board_size.max(1);
        (
            self.rng.random_range(0..size),
            self.rng.random_range(0..size),
        )
    }
}
