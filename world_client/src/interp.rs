//! Interpolation.
//!
//! Peers send discrete position snapshots at irregular intervals.
//! The client renders at its own rate and moves each remote avatar from its
//! previous target toward the newest one over a fixed window of
//! `1 / rate` time units, no matter how often snapshots arrive.
//!
//! A snapshot that arrives mid-flight restarts from the previous *target*
//! by default, not from where the avatar is drawn, so rapid updates can show
//! a visible change of direction. `RebasePolicy::RenderedPosition` restarts
//! from the drawn position instead.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use world_shared::{
    codec::CodecError,
    config::{InterpConfig, RebasePolicy},
    math::Vec3,
    net::{decode_movement, UserData, UserId},
};

/// Interpolation state for one remote participant.
#[derive(Debug, Clone)]
pub struct RemoteAvatar {
    pub data: UserData,
    previous: Vec3,
    target: Vec3,
    /// Progress toward `target` in $[0,1]$; 1 means nothing pending.
    alpha: f32,
    position: Vec3,
    rate: f32,
    rebase: RebasePolicy,
}

impl RemoteAvatar {
    pub fn new(data: UserData, cfg: &InterpConfig) -> Self {
        Self {
            data,
            previous: Vec3::ZERO,
            target: Vec3::ZERO,
            alpha: 1.0,
            position: Vec3::ZERO,
            rate: cfg.rate,
            rebase: cfg.rebase,
        }
    }

    pub fn previous(&self) -> Vec3 {
        self.previous
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Rendered position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn is_converged(&self) -> bool {
        self.alpha >= 1.0
    }

    /// Starts moving toward a new target.
    pub fn apply_snapshot(&mut self, target: Vec3) {
        self.previous = match self.rebase {
            RebasePolicy::LastTarget => self.target,
            RebasePolicy::RenderedPosition => self.position,
        };
        self.target = target;
        self.alpha = 0.0;
    }

    /// Decodes a movement payload and applies it. A malformed payload leaves
    /// the avatar untouched.
    pub fn on_movement(&mut self, payload: &[u8]) -> Result<(), CodecError> {
        let target = decode_movement(payload)?;
        self.apply_snapshot(target);
        Ok(())
    }

    /// Advances interpolation by `delta` time units.
    pub fn update(&mut self, delta: f32) {
        if self.is_converged() || delta <= 0.0 {
            return;
        }
        self.alpha = (self.alpha + delta * self.rate).min(1.0);
        self.position = self.previous.lerp(self.target, self.alpha);
    }
}

/// All remote avatars in the session, keyed by participant.
#[derive(Debug, Default)]
pub struct RemoteAvatars {
    cfg: InterpConfig,
    avatars: BTreeMap<UserId, RemoteAvatar>,
}

impl RemoteAvatars {
    pub fn new(cfg: InterpConfig) -> Self {
        Self {
            cfg,
            avatars: BTreeMap::new(),
        }
    }

    /// Adds a participant. Re-joining keeps the existing avatar.
    pub fn join(&mut self, data: UserData) -> &mut RemoteAvatar {
        let cfg = self.cfg;
        let id = data.user_id.clone();
        self.avatars.entry(id).or_insert_with(|| {
            info!(peer = %data.user_id, name = %data.name, "Peer joined");
            RemoteAvatar::new(data, &cfg)
        })
    }

    pub fn leave(&mut self, id: &UserId) -> Option<RemoteAvatar> {
        let removed = self.avatars.remove(id);
        if removed.is_some() {
            info!(peer = %id, "Peer left");
        }
        removed
    }

    /// Routes a movement payload to its avatar. Unknown peers and malformed
    /// payloads are logged and dropped.
    pub fn on_movement(&mut self, from: &UserId, payload: &[u8]) -> bool {
        let Some(avatar) = self.avatars.get_mut(from) else {
            debug!(peer = %from, "Movement from unknown peer dropped");
            return false;
        };
        match avatar.on_movement(payload) {
            Ok(()) => true,
            Err(e) => {
                warn!(peer = %from, error = %e, "Dropping movement payload");
                false
            }
        }
    }

    pub fn update_all(&mut self, delta: f32) {
        for avatar in self.avatars.values_mut() {
            avatar.update(delta);
        }
    }

    pub fn get(&self, id: &UserId) -> Option<&RemoteAvatar> {
        self.avatars.get(id)
    }

    pub fn len(&self) -> usize {
        self.avatars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avatars.is_empty()
    }

    /// Avatars in participant id order.
    pub fn iter(&self) -> impl Iterator<Item = &RemoteAvatar> {
        self.avatars.values()
    }
}

#[cfg(test)]
mod tests {
    use world_shared::net::encode_movement;

    use super::*;

    fn avatar() -> RemoteAvatar {
        RemoteAvatar::new(UserData::new("peer", "Peer"), &InterpConfig::default())
    }

    #[test]
    fn starts_converged_at_origin() {
        let mut a = avatar();
        assert!(a.is_converged());
        a.update(1.0);
        assert_eq!(a.position(), Vec3::ZERO);
    }

    #[test]
    fn snapshot_shifts_target_into_previous() {
        let mut a = avatar();
        a.apply_snapshot(Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(a.previous(), Vec3::ZERO);
        assert_eq!(a.alpha(), 0.0);

        a.update(0.05);
        assert_eq!(a.alpha(), 0.5);
        assert_eq!(a.position(), Vec3::new(5.0, 0.0, 0.0));

        a.update(0.05);
        assert!(a.is_converged());
        assert_eq!(a.position(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn alpha_never_exceeds_one() {
        let mut a = avatar();
        a.apply_snapshot(Vec3::new(1.0, 2.0, 3.0));
        a.update(5.0);
        assert_eq!(a.alpha(), 1.0);
        assert_eq!(a.position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut a = avatar();
        a.apply_snapshot(Vec3::new(1.0, 0.0, 0.0));
        a.update(0.05);
        let before = (a.alpha(), a.position());
        a.update(-0.05);
        assert_eq!((a.alpha(), a.position()), before);
    }

    #[test]
    fn rendered_position_rebase_starts_from_drawn_point() {
        let cfg = InterpConfig {
            rate: 10.0,
            rebase: RebasePolicy::RenderedPosition,
        };
        let mut a = RemoteAvatar::new(UserData::new("p", "P"), &cfg);
        a.apply_snapshot(Vec3::new(10.0, 0.0, 0.0));
        a.update(0.05);
        a.apply_snapshot(Vec3::new(10.0, 10.0, 0.0));
        assert_eq!(a.previous(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn malformed_payload_leaves_state() {
        let mut a = avatar();
        a.apply_snapshot(Vec3::new(2.0, 0.0, 0.0));
        let err = a.on_movement(&[0u8; 8]).unwrap_err();
        assert!(matches!(err, CodecError::MalformedPayload { actual: 8, .. }));
        assert_eq!(a.target(), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(a.alpha(), 0.0);
    }

    #[test]
    fn registry_routes_by_peer() {
        let mut peers = RemoteAvatars::new(InterpConfig::default());
        peers.join(UserData::new("a", "A"));
        peers.join(UserData::new("b", "B"));

        assert!(peers.on_movement(&"a".into(), &encode_movement(Vec3::new(1.0, 1.0, 1.0))));
        assert!(!peers.on_movement(&"zz".into(), &encode_movement(Vec3::ZERO)));
        assert!(!peers.on_movement(&"b".into(), &[1, 2, 3]));

        peers.update_all(1.0);
        assert_eq!(peers.get(&"a".into()).unwrap().position(), Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(peers.get(&"b".into()).unwrap().position(), Vec3::ZERO);

        assert!(peers.leave(&"a".into()).is_some());
        assert!(peers.leave(&"a".into()).is_none());
        assert_eq!(peers.len(), 1);
    }
}
