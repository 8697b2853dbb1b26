//! Session driver.
//!
//! A session composes the four client systems and advances them once per
//! rendered frame, in a fixed order:
//! 1. queued input (host events first, then injected ones)
//! 2. queued peer messages
//! 3. local player step
//! 4. remote avatar interpolation
//!
//! Everything runs on one logical thread. Event handlers never await, so the
//! only suspension point is between frames in [`Session::run`].

use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, warn};
use world_shared::{
    codec::{decode_world, encode_world, CodecError},
    config::ClientConfig,
    event::EventBus,
    net::{encode_movement, UserData, UserId},
    world::WorldData,
};

use crate::{
    controls::{PointerControls, PointerHost, SurfaceId},
    input::{InputEvent, KeyBindings},
    interp::RemoteAvatars,
    player::LocalPlayer,
};

/// Messages delivered by the peer transport.
#[derive(Debug, Clone, PartialEq)]
pub enum PeerMessage {
    Joined(UserData),
    Left(UserId),
    Movement { from: UserId, payload: Bytes },
    /// Encoded world record shared by the session owner.
    World(Bytes),
}

/// Anything the host or transport hands to the session between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Input(InputEvent),
    Peer(PeerMessage),
}

/// Client-side world session.
pub struct Session<H: PointerHost> {
    pub world: WorldData,
    pub player: LocalPlayer,
    pub controls: PointerControls<H>,
    pub avatars: RemoteAvatars,
    inbox: EventBus,
    frame: u64,
}

impl<H: PointerHost> Session<H> {
    pub fn new(
        cfg: &ClientConfig,
        me: UserData,
        surface: SurfaceId,
        host: H,
        bindings: KeyBindings,
    ) -> Self {
        info!(user = %me.user_id, name = %me.name, "Starting session");
        Self {
            world: WorldData::default(),
            player: LocalPlayer::new(me, cfg),
            controls: PointerControls::new(surface, host, bindings),
            avatars: RemoteAvatars::new(cfg.interp),
            inbox: EventBus::default(),
            frame: 0,
        }
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Queues a message for the next frame.
    pub fn enqueue(&mut self, msg: Inbound) {
        match msg {
            Inbound::Input(e) => self.inbox.push(e),
            Inbound::Peer(m) => self.inbox.push(m),
        }
    }

    /// Runs one frame.
    pub fn frame(&mut self, delta: f32) {
        let mut input = self.controls.host_mut().drain_events();
        input.extend(self.inbox.drain::<InputEvent>());
        for event in &input {
            self.controls.dispatch(event, &mut self.player);
        }

        for msg in self.inbox.drain::<PeerMessage>() {
            self.apply_peer(msg);
        }

        self.player.step(delta);
        self.avatars.update_all(delta);
        self.frame += 1;
    }

    fn apply_peer(&mut self, msg: PeerMessage) {
        match msg {
            PeerMessage::Joined(data) => {
                self.avatars.join(data);
            }
            PeerMessage::Left(id) => {
                self.avatars.leave(&id);
            }
            PeerMessage::Movement { from, payload } => {
                self.avatars.on_movement(&from, &payload);
            }
            PeerMessage::World(bytes) => {
                if let Err(e) = self.import_world(&bytes) {
                    warn!(error = %e, "Ignoring world data from peer");
                }
            }
        }
    }

    /// Encodes the current world record for a peer.
    pub fn export_world(&self) -> Result<Bytes, CodecError> {
        encode_world(&self.world)
    }

    /// Replaces the world record. On failure the current world is kept.
    pub fn import_world(&mut self, bytes: &[u8]) -> Result<(), CodecError> {
        self.world = decode_world(bytes)?;
        if let Some(spawn) = self.world.spawn_point() {
            debug!(?spawn, "World spawn point assigned");
        }
        Ok(())
    }

    /// Movement payload for the local player's current position.
    pub fn local_movement(&self) -> Bytes {
        encode_movement(self.player.position())
    }

    /// Drives `frames` frames at a fixed interval, draining `rx` before each.
    pub async fn run(
        &mut self,
        rx: &mut mpsc::Receiver<Inbound>,
        frames: u32,
        frame_dt: Duration,
    ) -> anyhow::Result<()> {
        let mut interval = tokio::time::interval(frame_dt);
        let delta = frame_dt.as_secs_f32();
        let mut closed = false;

        for _ in 0..frames {
            interval.tick().await;

            while !closed {
                match rx.try_recv() {
                    Ok(msg) => self.enqueue(msg),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        debug!("Inbound channel closed");
                        closed = true;
                    }
                }
            }

            self.frame(delta);
        }

        debug!(frames = self.frame, avatars = self.avatars.len(), "Session run finished");
        Ok(())
    }
}
