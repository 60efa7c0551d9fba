//! Grapple domain: what a rope can attach to and how the grappler finds it.

use bevy::prelude::*;

/// How a target reacts to being grappled. Decides Swinging vs Pulling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrappleType {
    /// Target is reeled toward the grappler
    Pull,
    /// Grappler swings around the hit point
    Fixed,
}

/// Outcome of an attach attempt. `attached_to == None` means nothing took
/// the rope; `point` is then just the ray tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentResult {
    pub point: Vec2,
    pub attached_to: Option<Entity>,
}

impl AttachmentResult {
    pub fn none(point: Vec2) -> Self {
        Self {
            point,
            attached_to: None,
        }
    }

    pub fn attached(point: Vec2, target: Entity) -> Self {
        Self {
            point,
            attached_to: Some(target),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached_to.is_some()
    }
}

/// The grappler as seen by a target during an attach or pull.
#[derive(Debug, Clone, Copy)]
pub struct GrapplerInfo {
    pub entity: Entity,
    pub position: Vec2,
    pub velocity: Vec2,
}

/// One ray intersection, with the point already resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrappleHit {
    pub entity: Entity,
    pub point: Vec2,
    pub distance: f32,
}

/// Capability of anything a rope can attach to.
pub trait Grappleable {
    fn grapple_type(&self) -> GrappleType;

    /// Try to take the rope. Targets that already hold a rope refuse with a
    /// null result.
    fn attach_grapple(&mut self, grappler: &GrapplerInfo, hit_point: Vec2) -> AttachmentResult;

    /// Called every fixed tick while attached. Returns where the rope ends now.
    fn continuous_grapple_pos(&mut self, grapple_pos: Vec2, grappler: &GrapplerInfo) -> Vec2;

    fn detach_grapple(&mut self, grappler: Entity);

    /// Forced detach without any grace handling.
    fn break_grapple(&mut self, grappler: Entity);

    fn is_attached_to(&self, grappler: Entity) -> bool;

    /// Velocity of the target itself.
    fn velocity(&self) -> Vec2;

    /// True while the rope cannot move the target.
    fn is_fixed(&self) -> bool;
}

/// Static terrain or hooks the grappler swings from.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct FixedAnchor;

/// [`Grappleable`] for a [`FixedAnchor`] entity. Anchors never refuse and
/// never move.
pub struct FixedAnchorView {
    pub entity: Entity,
}

impl Grappleable for FixedAnchorView {
    fn grapple_type(&self) -> GrappleType {
        GrappleType::Fixed
    }

    fn attach_grapple(&mut self, _grappler: &GrapplerInfo, hit_point: Vec2) -> AttachmentResult {
        AttachmentResult::attached(hit_point, self.entity)
    }

    fn continuous_grapple_pos(&mut self, grapple_pos: Vec2, _grappler: &GrapplerInfo) -> Vec2 {
        grapple_pos
    }

    fn detach_grapple(&mut self, _grappler: Entity) {}

    fn break_grapple(&mut self, _grappler: Entity) {}

    fn is_attached_to(&self, _grappler: Entity) -> bool {
        true
    }

    fn velocity(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn is_fixed(&self) -> bool {
        true
    }
}

/// Lookup the grappler states use to find and talk to targets.
///
/// `with_target` runs `f` against the target's capability and returns false
/// when `target` has none (plain terrain, despawned entity). The provided
/// methods fall back to "nothing there" in that case.
pub trait GrappleWorld {
    /// Every hit along the ray, nearest first.
    fn raycast_all(&self, origin: Vec2, direction: Dir2, max_distance: f32) -> Vec<GrappleHit>;

    fn with_target(&mut self, target: Entity, f: &mut dyn FnMut(&mut dyn Grappleable)) -> bool;

    fn grapple_type(&mut self, target: Entity) -> Option<GrappleType> {
        let mut kind = None;
        self.with_target(target, &mut |t| kind = Some(t.grapple_type()));
        kind
    }

    fn attach_grapple(
        &mut self,
        target: Entity,
        grappler: &GrapplerInfo,
        hit_point: Vec2,
    ) -> AttachmentResult {
        let mut result = AttachmentResult::none(hit_point);
        self.with_target(target, &mut |t| {
            result = t.attach_grapple(grappler, hit_point)
        });
        result
    }

    /// `None` once the target is gone.
    fn continuous_grapple_pos(
        &mut self,
        target: Entity,
        grapple_pos: Vec2,
        grappler: &GrapplerInfo,
    ) -> Option<Vec2> {
        let mut pos = None;
        self.with_target(target, &mut |t| {
            pos = Some(t.continuous_grapple_pos(grapple_pos, grappler))
        });
        pos
    }

    fn detach_grapple(&mut self, target: Entity, grappler: Entity) {
        self.with_target(target, &mut |t| t.detach_grapple(grappler));
    }

    fn break_grapple(&mut self, target: Entity, grappler: Entity) {
        self.with_target(target, &mut |t| t.break_grapple(grappler));
    }

    fn is_attached_to(&mut self, target: Entity, grappler: Entity) -> bool {
        let mut attached = false;
        self.with_target(target, &mut |t| attached = t.is_attached_to(grappler));
        attached
    }

    fn target_velocity(&mut self, target: Entity) -> Vec2 {
        let mut velocity = Vec2::ZERO;
        self.with_target(target, &mut |t| velocity = t.velocity());
        velocity
    }

    fn is_fixed(&mut self, target: Entity) -> bool {
        let mut fixed = true;
        self.with_target(target, &mut |t| fixed = t.is_fixed());
        fixed
    }
}
