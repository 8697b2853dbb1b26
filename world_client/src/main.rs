//! Standalone headless client binary.
//!
//! Usage:
//!   cargo run -p world_client -- [--config client.json] [--frames 180] [--name Player]
//!                                [--peers 2] [--seed 7]
//!
//! Runs a session against simulated peers that send movement payloads at
//! jittered intervals, scripts a little local input, and logs where everyone
//! ended up.

use std::env;
use std::time::Duration;

use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tokio::sync::mpsc;
use tracing::info;
use world_client::client::{Inbound, PeerMessage, Session};
use world_client::controls::{HeadlessHost, SurfaceId};
use world_client::input::{InputEvent, KeyBindings};
use world_shared::{
    codec::decode_world,
    config::ClientConfig,
    math::Vec3,
    net::{encode_movement, UserData, UserId},
};

struct Args {
    config: Option<String>,
    frames: u32,
    name: Option<String>,
    peers: u32,
    seed: u64,
}

fn parse_args() -> Args {
    let mut out = Args {
        config: None,
        frames: 180,
        name: None,
        peers: 2,
        seed: 7,
    };
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                out.config = Some(args[i + 1].clone());
                i += 2;
            }
            "--frames" if i + 1 < args.len() => {
                out.frames = args[i + 1].parse().unwrap_or(out.frames);
                i += 2;
            }
            "--name" if i + 1 < args.len() => {
                out.name = Some(args[i + 1].clone());
                i += 2;
            }
            "--peers" if i + 1 < args.len() => {
                out.peers = args[i + 1].parse().unwrap_or(out.peers);
                i += 2;
            }
            "--seed" if i + 1 < args.len() => {
                out.seed = args[i + 1].parse().unwrap_or(out.seed);
                i += 2;
            }
            _ => i += 1,
        }
    }
    out
}

fn load_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
            ClientConfig::from_json_str(&text).with_context(|| format!("parse {path}"))?
        }
        None => ClientConfig::default(),
    };
    if let Some(name) = &args.name {
        cfg.player_name = name.clone();
    }
    Ok(cfg)
}

/// Simulated peer: wanders between random targets, sending a payload every
/// 30-150ms until the session hangs up.
async fn simulate_peer(id: UserId, seed: u64, tx: mpsc::Sender<Inbound>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let joined = PeerMessage::Joined(UserData::new(id.clone(), &format!("Peer {id}")));
    if tx.send(Inbound::Peer(joined)).await.is_err() {
        return;
    }

    let mut pos = Vec3::ZERO;
    loop {
        let step = Vec3::new(rng.gen_range(-2.0..2.0), 0.0, rng.gen_range(-2.0..2.0));
        pos = pos.add(step);
        let msg = PeerMessage::Movement {
            from: id.clone(),
            payload: encode_movement(pos),
        };
        if tx.send(Inbound::Peer(msg)).await.is_err() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(rng.gen_range(30..150))).await;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args();
    let cfg = load_config(&args)?;
    info!(frames = args.frames, peers = args.peers, "Starting client");

    let mut bindings = KeyBindings::wasd();
    bindings.bind_action("Escape", || info!("Menu requested"));

    let me = UserData::new("local", &cfg.player_name);
    let mut session = Session::new(&cfg, me, SurfaceId(0), HeadlessHost::new(), bindings);
    session.controls.subscribe(|e| tracing::debug!(event = ?e, "Control notification"));

    let (tx, mut rx) = mpsc::channel::<Inbound>(256);
    for n in 0..args.peers {
        let id = UserId(format!("peer-{n}"));
        tokio::spawn(simulate_peer(id, args.seed.wrapping_add(u64::from(n)), tx.clone()));
    }

    // Scripted input: capture the pointer, look around, walk forward, stop.
    session.controls.lock();
    let script = [
        InputEvent::pointer_move(40.0, -10.0),
        InputEvent::key_down("KeyW"),
        InputEvent::key_down("Escape"),
    ];
    for e in script {
        tx.send(Inbound::Input(e)).await.context("queue input")?;
    }
    drop(tx);

    let frame_dt = Duration::from_secs_f64(1.0 / f64::from(cfg.frame_hz.max(1)));
    session.run(&mut rx, args.frames, frame_dt).await?;
    session.enqueue(Inbound::Input(InputEvent::key_up("KeyW")));
    session.frame(0.0);

    info!(
        position = ?session.player.position(),
        velocity = ?session.player.state.velocity,
        yaw = session.player.camera().yaw(),
        locked = session.controls.is_locked(),
        "Local player"
    );
    for avatar in session.avatars.iter() {
        info!(peer = %avatar.data.user_id, position = ?avatar.position(), "Remote avatar");
    }

    let exported = session.export_world().context("export world")?;
    let echoed = decode_world(&exported).context("decode exported world")?;
    info!(
        bytes = exported.len(),
        palette = echoed.palette_colors.len(),
        "World data ready for transfer"
    );

    Ok(())
}
