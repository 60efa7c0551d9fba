//! Grapple domain: the grappler's states and the context their hooks run with.

use bevy::prelude::*;

use crate::ability::{AbilityState, AbilityStateKind, Transition};
use crate::grapple::physics::{
    extend_update, redirect_wall_hit, release_boost, start_grapple, swing_velocity,
};
use crate::grapple::{GrappleInput, GrappleTuning, GrappleType, GrappleWorld, GrapplerInfo};
use crate::movement::PhysicsBody;

/// Attach/detach notifications for presentation, drained by the owning system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrappleEvent {
    Attached {
        target: Entity,
        point: Vec2,
        grapple_type: GrappleType,
    },
    Detached {
        target: Entity,
        boosted: bool,
    },
}

/// Everything a grappler state may touch during one hook.
pub struct GrappleContext<'a> {
    pub entity: Entity,
    pub body: &'a mut dyn PhysicsBody,
    pub input: &'a GrappleInput,
    pub tuning: &'a GrappleTuning,
    pub world: &'a mut dyn GrappleWorld,
    pub events: &'a mut Vec<GrappleEvent>,
}

impl GrappleContext<'_> {
    pub fn info(&self) -> GrapplerInfo {
        GrapplerInfo {
            entity: self.entity,
            position: self.body.position(),
            velocity: self.body.velocity(),
        }
    }

    /// World point the rope is fired at. A held direction comes first, then
    /// the cursor, then up and forward.
    pub fn aim_point(&self) -> Vec2 {
        let position = self.body.position();
        if let Some(dir) = self.input.aim_direction.try_normalize() {
            return position + dir * self.tuning.max_extend_distance;
        }
        if let Some(point) = self.input.aim_point
            && (point - position).try_normalize().is_some()
        {
            return point;
        }
        let forward = Vec2::new(self.body.facing().sign(), 1.0).normalize();
        position + forward * self.tuning.max_extend_distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrappleKind {
    Idle,
    ExtendGrapple,
    Swinging,
    Pulling,
}

/// How an attached state lets go of its target on exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Release {
    #[default]
    Detach,
    /// Detach and apply the release boost
    Boost,
    /// Forced off; the target skips its grace handling
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendGrapple {
    pub aim: Vec2,
    pub elapsed: f32,
    /// Current rope tip
    pub tip: Vec2,
}

impl ExtendGrapple {
    pub fn new(aim: Vec2, origin: Vec2) -> Self {
        Self {
            aim,
            elapsed: 0.0,
            tip: origin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swinging {
    pub anchor: Entity,
    pub point: Vec2,
    pub release: Release,
}

impl Swinging {
    pub fn new(anchor: Entity, point: Vec2) -> Self {
        Self {
            anchor,
            point,
            release: Release::Detach,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulling {
    pub target: Entity,
    pub point: Vec2,
    pub release: Release,
}

impl Pulling {
    pub fn new(target: Entity, point: Vec2) -> Self {
        Self {
            target,
            point,
            release: Release::Detach,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GrappleState {
    #[default]
    Idle,
    ExtendGrapple(ExtendGrapple),
    Swinging(Swinging),
    Pulling(Pulling),
}

impl AbilityStateKind for GrappleState {
    type Kind = GrappleKind;

    fn kind(&self) -> GrappleKind {
        match self {
            GrappleState::Idle => GrappleKind::Idle,
            GrappleState::ExtendGrapple(_) => GrappleKind::ExtendGrapple,
            GrappleState::Swinging(_) => GrappleKind::Swinging,
            GrappleState::Pulling(_) => GrappleKind::Pulling,
        }
    }
}

impl<'a> AbilityState<GrappleContext<'a>> for GrappleState {
    fn on_enter(&mut self, ctx: &mut GrappleContext<'a>) -> Transition<Self> {
        match self {
            GrappleState::Swinging(s) => {
                if !start_grapple(ctx.body, ctx.tuning, s.point) {
                    debug!("Grapple start impulse rejected: moving toward anchor");
                }
                ctx.events.push(GrappleEvent::Attached {
                    target: s.anchor,
                    point: s.point,
                    grapple_type: GrappleType::Fixed,
                });
            }
            GrappleState::Pulling(p) => {
                ctx.events.push(GrappleEvent::Attached {
                    target: p.target,
                    point: p.point,
                    grapple_type: GrappleType::Pull,
                });
            }
            GrappleState::Idle | GrappleState::ExtendGrapple(_) => {}
        }
        Transition::Stay
    }

    fn on_exit(&mut self, ctx: &mut GrappleContext<'a>) {
        let (target, release) = match self {
            GrappleState::Swinging(s) => (s.anchor, s.release),
            GrappleState::Pulling(p) => (p.target, p.release),
            GrappleState::Idle | GrappleState::ExtendGrapple(_) => return,
        };

        match release {
            Release::Break => ctx.world.break_grapple(target, ctx.entity),
            Release::Detach | Release::Boost => ctx.world.detach_grapple(target, ctx.entity),
        }

        let boosted = release == Release::Boost;
        if boosted {
            let add = release_boost(ctx.body.velocity(), ctx.body.facing(), ctx.tuning);
            ctx.body.apply_velocity(add);
        }
        ctx.events.push(GrappleEvent::Detached { target, boosted });
    }

    fn on_update(&mut self, ctx: &mut GrappleContext<'a>) -> Transition<Self> {
        let position = ctx.body.position();
        match self {
            GrappleState::Swinging(s) if ctx.tuning.too_far(position, s.point) => {
                s.release = Release::Boost;
                Transition::To(GrappleState::Idle)
            }
            GrappleState::Pulling(p) => {
                if !ctx.world.is_attached_to(p.target, ctx.entity) {
                    debug!("Pull target {} let go", p.target);
                    Transition::To(GrappleState::Idle)
                } else if ctx.tuning.too_far(position, p.point) {
                    Transition::To(GrappleState::Idle)
                } else {
                    Transition::Stay
                }
            }
            _ => Transition::Stay,
        }
    }

    fn on_fixed_update(&mut self, ctx: &mut GrappleContext<'a>) -> Transition<Self> {
        match self {
            GrappleState::Idle => Transition::Stay,
            GrappleState::ExtendGrapple(e) => extend_tick(e, ctx),
            GrappleState::Swinging(s) => {
                let info = ctx.info();
                let Some(point) = ctx
                    .world
                    .continuous_grapple_pos(s.anchor, s.point, &info)
                else {
                    debug!("Grapple anchor {} vanished", s.anchor);
                    return Transition::To(GrappleState::Idle);
                };
                s.point = point;
                let anchor_speed = ctx.world.target_velocity(s.anchor).length();
                let fallen = ctx.body.calc_fall(info.velocity);
                let v = swing_velocity(
                    fallen,
                    info.position,
                    point,
                    ctx.input.move_axis,
                    anchor_speed,
                    ctx.tuning,
                    ctx.body.fixed_delta(),
                );
                ctx.body.set_velocity(v);
                Transition::Stay
            }
            GrappleState::Pulling(p) => {
                let info = ctx.info();
                let Some(point) = ctx
                    .world
                    .continuous_grapple_pos(p.target, p.point, &info)
                else {
                    debug!("Pull target {} vanished", p.target);
                    return Transition::To(GrappleState::Idle);
                };
                p.point = point;
                let mut v = ctx.body.calc_fall(info.velocity);
                // A stuck target holds the rope like an anchor
                if ctx.world.is_fixed(p.target) {
                    v = swing_velocity(
                        v,
                        info.position,
                        point,
                        ctx.input.move_axis,
                        0.0,
                        ctx.tuning,
                        ctx.body.fixed_delta(),
                    );
                }
                ctx.body.set_velocity(v);
                Transition::Stay
            }
        }
    }
}

fn extend_tick(e: &mut ExtendGrapple, ctx: &mut GrappleContext<'_>) -> Transition<GrappleState> {
    e.elapsed += ctx.body.fixed_delta();
    if e.elapsed > ctx.tuning.max_extend_duration {
        debug!("Grapple extension timed out after {:.2}s", e.elapsed);
        return Transition::To(GrappleState::Idle);
    }

    let info = ctx.info();
    let result = extend_update(ctx.world, &info, ctx.tuning, e.elapsed, e.aim);
    e.tip = result.point;

    if let Some(target) = result.attached_to {
        return match ctx.world.grapple_type(target) {
            Some(GrappleType::Pull) => {
                Transition::To(GrappleState::Pulling(Pulling::new(target, result.point)))
            }
            _ => Transition::To(GrappleState::Swinging(Swinging::new(target, result.point))),
        };
    }

    let travelled = ctx.tuning.extend_speed * e.elapsed;
    if travelled >= ctx.tuning.max_extend_distance || ctx.tuning.too_far(info.position, e.tip) {
        debug!("Grapple extension found nothing within range");
        return Transition::To(GrappleState::Idle);
    }
    Transition::Stay
}

impl GrappleState {
    pub fn grapple_started(&mut self, ctx: &mut GrappleContext<'_>) -> Transition<Self> {
        match self {
            GrappleState::Idle => Transition::To(GrappleState::ExtendGrapple(ExtendGrapple::new(
                ctx.aim_point(),
                ctx.body.position(),
            ))),
            _ => Transition::Stay,
        }
    }

    pub fn grapple_finished(&mut self, _ctx: &mut GrappleContext<'_>) -> Transition<Self> {
        match self {
            GrappleState::Idle => Transition::Stay,
            GrappleState::Swinging(s) => {
                s.release = Release::Boost;
                Transition::To(GrappleState::Idle)
            }
            GrappleState::ExtendGrapple(_) | GrappleState::Pulling(_) => {
                Transition::To(GrappleState::Idle)
            }
        }
    }

    pub fn collide_horizontal(&mut self, ctx: &mut GrappleContext<'_>) -> Transition<Self> {
        if !ctx.tuning.collide_wall_stop {
            return Transition::Stay;
        }
        match self {
            GrappleState::Swinging(s) => {
                s.release = Release::Boost;
                Transition::To(GrappleState::Idle)
            }
            GrappleState::Pulling(_) => Transition::To(GrappleState::Idle),
            _ => Transition::Stay,
        }
    }

    pub fn collide_vertical(&mut self, ctx: &mut GrappleContext<'_>) -> Transition<Self> {
        match self {
            GrappleState::Swinging(_) if ctx.tuning.collide_wall_stop => {
                Transition::To(GrappleState::Idle)
            }
            _ => Transition::Stay,
        }
    }

    /// Velocity after avian resolved a wall hit that did not end the swing.
    pub fn process_collide_horizontal(
        &self,
        old_v: Vec2,
        new_v: Vec2,
        tuning: &GrappleTuning,
    ) -> Vec2 {
        match self {
            GrappleState::Swinging(_) if !tuning.collide_wall_stop => {
                redirect_wall_hit(old_v, new_v, tuning)
            }
            _ => new_v,
        }
    }

    pub fn break_grapple(&mut self, _ctx: &mut GrappleContext<'_>) -> Transition<Self> {
        match self {
            GrappleState::Idle => Transition::Stay,
            GrappleState::Swinging(s) => {
                s.release = Release::Break;
                Transition::To(GrappleState::Idle)
            }
            GrappleState::Pulling(p) => {
                p.release = Release::Break;
                Transition::To(GrappleState::Idle)
            }
            GrappleState::ExtendGrapple(_) => Transition::To(GrappleState::Idle),
        }
    }

    /// Where the rope currently ends, if there is one.
    pub fn rope_end(&self) -> Option<Vec2> {
        match self {
            GrappleState::Idle => None,
            GrappleState::ExtendGrapple(e) => Some(e.tip),
            GrappleState::Swinging(s) => Some(s.point),
            GrappleState::Pulling(p) => Some(p.point),
        }
    }

    pub fn attached_target(&self) -> Option<Entity> {
        match self {
            GrappleState::Swinging(s) => Some(s.anchor),
            GrappleState::Pulling(p) => Some(p.target),
            GrappleState::Idle | GrappleState::ExtendGrapple(_) => None,
        }
    }
}
