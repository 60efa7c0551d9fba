//! Grapple domain: unit tests for rope physics, grappler states and pull targets.

use bevy::ecs::message::{MessageReader, Messages};
use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;

use avian2d::prelude::LinearVelocity;

use super::systems::{apply_bullet_time, publish_state_changes, release_removed_grappler};
use super::*;
use crate::movement::{Facing, MovementTuning, PhysicsBody};

const EPS: f32 = 1.0e-3;

fn assert_vec_eq(actual: Vec2, expected: Vec2) {
    assert!(
        actual.abs_diff_eq(expected, EPS),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

fn entities(n: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..n).map(|_| world.spawn_empty().id()).collect()
}

#[derive(Debug, Clone)]
struct TestBody {
    position: Vec2,
    velocity: Vec2,
    facing: Facing,
    gravity: f32,
    dt: f32,
}

impl TestBody {
    fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
            gravity: 0.0,
            dt: 0.4,
        }
    }
}

impl PhysicsBody for TestBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn facing(&self) -> Facing {
        self.facing
    }

    fn calc_fall(&self, velocity: Vec2) -> Vec2 {
        velocity - Vec2::new(0.0, self.gravity * self.dt)
    }

    fn fixed_delta(&self) -> f32 {
        self.dt
    }
}

#[derive(Default)]
struct TestWorld {
    hits: Vec<GrappleHit>,
    anchors: Vec<Entity>,
    pulls: Vec<(Entity, PullTarget, TestBody)>,
}

impl TestWorld {
    fn pull(&self, entity: Entity) -> (&PullTarget, &TestBody) {
        let (_, target, body) = self
            .pulls
            .iter()
            .find(|(e, ..)| *e == entity)
            .expect("pull target registered");
        (target, body)
    }
}

impl GrappleWorld for TestWorld {
    fn raycast_all(&self, _origin: Vec2, _direction: Dir2, max_distance: f32) -> Vec<GrappleHit> {
        self.hits
            .iter()
            .filter(|hit| hit.distance <= max_distance)
            .copied()
            .collect()
    }

    fn with_target(&mut self, target: Entity, f: &mut dyn FnMut(&mut dyn Grappleable)) -> bool {
        if let Some((_, pull, body)) = self.pulls.iter_mut().find(|(e, ..)| *e == target) {
            let mut view = PullTargetMut {
                entity: target,
                target: pull,
                body,
            };
            f(&mut view);
            return true;
        }
        if self.anchors.contains(&target) {
            f(&mut FixedAnchorView { entity: target });
            return true;
        }
        false
    }
}

struct Rig {
    me: Entity,
    body: TestBody,
    input: GrappleInput,
    tuning: GrappleTuning,
    world: TestWorld,
    events: Vec<GrappleEvent>,
    grappler: Grappler,
}

impl Rig {
    fn new(me: Entity) -> Self {
        Self {
            me,
            body: TestBody::at(Vec2::ZERO),
            input: GrappleInput {
                aim_direction: Vec2::X,
                ..default()
            },
            tuning: GrappleTuning {
                extend_speed: 20.0,
                max_extend_distance: 10.0,
                max_extend_duration: 1.0,
                ..default()
            },
            world: TestWorld::default(),
            events: Vec::new(),
            grappler: Grappler::default(),
        }
    }

    fn with_ctx<R>(&mut self, f: impl FnOnce(&mut Grappler, &mut GrappleContext<'_>) -> R) -> R {
        let mut ctx = GrappleContext {
            entity: self.me,
            body: &mut self.body,
            input: &self.input,
            tuning: &self.tuning,
            world: &mut self.world,
            events: &mut self.events,
        };
        f(&mut self.grappler, &mut ctx)
    }

    fn update(&mut self) {
        self.with_ctx(|g, ctx| g.update(ctx));
        self.input.clear_edges();
    }

    fn fixed(&mut self) {
        self.with_ctx(|g, ctx| g.fixed_update(ctx));
    }

    fn press(&mut self) {
        self.input.grapple_pressed = true;
        self.update();
        self.fixed();
    }

    fn enter(&mut self, state: GrappleState) {
        self.with_ctx(|g, ctx| g.machine_mut().set_state(state, ctx));
    }
}

// --- Rope physics ---

#[test]
fn test_extend_tip_follows_speed_and_cap() {
    let ids = entities(1);
    let mut world = TestWorld::default();
    let tuning = GrappleTuning {
        extend_speed: 20.0,
        max_extend_distance: 10.0,
        ..default()
    };
    let me = GrapplerInfo {
        entity: ids[0],
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
    };

    let result = extend_update(&mut world, &me, &tuning, 0.4, Vec2::new(100.0, 0.0));
    assert!(!result.is_attached());
    assert_vec_eq(result.point, Vec2::new(8.0, 0.0));

    let capped = extend_update(&mut world, &me, &tuning, 1.0, Vec2::new(100.0, 0.0));
    assert_vec_eq(capped.point, Vec2::new(10.0, 0.0));
}

#[test]
fn test_extend_skips_refusing_targets() {
    let ids = entities(4);
    let (me, busy, anchor, other) = (ids[0], ids[1], ids[2], ids[3]);
    let mut world = TestWorld::default();

    // A pull target already held by someone else refuses the rope
    let mut held = PullTarget::default();
    let mut held_body = TestBody::at(Vec2::new(3.0, 0.0));
    {
        let mut view = PullTargetMut {
            entity: busy,
            target: &mut held,
            body: &mut held_body,
        };
        let info = GrapplerInfo {
            entity: other,
            position: Vec2::new(50.0, 0.0),
            velocity: Vec2::ZERO,
        };
        assert!(view.attach_grapple(&info, Vec2::new(3.0, 0.0)).is_attached());
    }
    world.pulls.push((busy, held, held_body));
    world.anchors.push(anchor);
    world.hits = vec![
        GrappleHit {
            entity: busy,
            point: Vec2::new(3.0, 0.0),
            distance: 3.0,
        },
        GrappleHit {
            entity: anchor,
            point: Vec2::new(6.0, 0.0),
            distance: 6.0,
        },
    ];

    let info = GrapplerInfo {
        entity: me,
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
    };
    let result = extend_update(&mut world, &info, &GrappleTuning::default(), 1.0, Vec2::X * 100.0);
    assert_eq!(result.attached_to, Some(anchor));
    assert_vec_eq(result.point, Vec2::new(6.0, 0.0));
}

#[test]
fn test_start_grapple_rejected_when_not_moving_away() {
    let mut body = TestBody::at(Vec2::ZERO);
    body.velocity = Vec2::new(5.0, 0.0);

    assert!(!start_grapple(&mut body, &GrappleTuning::default(), Vec2::new(0.0, 10.0)));
    assert_vec_eq(body.velocity, Vec2::new(5.0, 0.0));
}

#[test]
fn test_start_grapple_keeps_orthogonal_speed() {
    let mut body = TestBody::at(Vec2::ZERO);
    body.velocity = Vec2::new(3.0, -4.0);

    // ortho 3, total 5, start_mult 0.5 -> 4 along the orthogonal direction
    assert!(start_grapple(&mut body, &GrappleTuning::default(), Vec2::new(0.0, 10.0)));
    assert_vec_eq(body.velocity, Vec2::new(4.0, 0.0));
}

#[test]
fn test_swing_slack_rope_keeps_velocity() {
    let v = Vec2::new(2.0, 7.0);
    let out = swing_velocity(
        v,
        Vec2::ZERO,
        Vec2::new(0.0, 10.0),
        0,
        0.0,
        &GrappleTuning::default(),
        0.1,
    );
    assert_eq!(out, v);
}

#[test]
fn test_swing_near_vertical_is_damped() {
    let out = swing_velocity(
        Vec2::new(2.0, -1.0),
        Vec2::ZERO,
        Vec2::new(0.0, 10.0),
        0,
        0.0,
        &GrappleTuning::default(),
        0.1,
    );
    // (1 * 0.25 + 2 * 1) along +x, then quartered under zero_angle
    assert_vec_eq(out, Vec2::new(0.5625, 0.0));
}

#[test]
fn test_swing_pump_pushes_perpendicular_to_rope() {
    let tuning = GrappleTuning::default();
    let out = swing_velocity(
        Vec2::new(2.0, -1.0),
        Vec2::ZERO,
        Vec2::new(0.0, 10.0),
        1,
        5.0, // moving anchor: no stall
        &tuning,
        0.1,
    );
    let expected = Vec2::new(2.25 + tuning.acceleration * 0.1, 0.0);
    assert_vec_eq(out, expected);
}

#[test]
fn test_release_boost_min_and_clamp() {
    let tuning = GrappleTuning {
        boost_speed: 0.2,
        min_boost: 80.0,
        max_boost: 100.0,
        ..default()
    };

    let slow = release_boost(Vec2::ZERO, Facing::Right, &tuning);
    // (80, 80) has length ~113, clamped to 100
    assert_vec_eq(slow, Vec2::new(1.0, 1.0).normalize() * 100.0);

    let loose = GrappleTuning {
        max_boost: 320.0,
        ..tuning
    };
    let left = release_boost(Vec2::new(0.0, -100.0), Facing::Left, &loose);
    assert_vec_eq(left, Vec2::new(-80.0, 80.0));
}

#[test]
fn test_redirect_wall_hit_sends_lost_speed_up() {
    let tuning = GrappleTuning {
        hit_wall_mult: 0.5,
        ..default()
    };
    let out = redirect_wall_hit(Vec2::new(100.0, 10.0), Vec2::new(0.0, 10.0), &tuning);
    assert_vec_eq(out, Vec2::new(0.0, 60.0));
}

#[test]
fn test_too_far_is_per_axis_and_optional() {
    let mut tuning = GrappleTuning::default();
    assert!(!tuning.too_far(Vec2::ZERO, Vec2::splat(10_000.0)));

    tuning.max_grapple_distance = Some(Vec2::new(100.0, 50.0));
    assert!(!tuning.too_far(Vec2::ZERO, Vec2::new(90.0, 40.0)));
    assert!(tuning.too_far(Vec2::ZERO, Vec2::new(90.0, -60.0)));
}

// --- Grappler states ---

#[test]
fn test_press_extends_then_swings_on_anchor() {
    let ids = entities(2);
    let mut rig = Rig::new(ids[0]);
    rig.world.anchors.push(ids[1]);
    rig.world.hits.push(GrappleHit {
        entity: ids[1],
        point: Vec2::new(5.0, 0.0),
        distance: 5.0,
    });

    rig.press();

    assert_eq!(rig.grappler.kind(), GrappleKind::Swinging);
    assert!(rig.grappler.is_grappling());
    assert_vec_eq(rig.grappler.cur_grapple_pos(Vec2::ZERO), Vec2::new(5.0, 0.0));
    assert_eq!(
        rig.events,
        vec![GrappleEvent::Attached {
            target: ids[1],
            point: Vec2::new(5.0, 0.0),
            grapple_type: GrappleType::Fixed,
        }]
    );
    let changes: Vec<_> = rig.grappler.machine_mut().drain_changes().collect();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].to, GrappleKind::ExtendGrapple);
    assert_eq!(changes[1].to, GrappleKind::Swinging);
}

#[test]
fn test_extension_gives_up_at_reach() {
    let ids = entities(1);
    let mut rig = Rig::new(ids[0]);
    rig.tuning.max_extend_distance = 8.0;

    rig.press();

    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
    assert!(rig.events.is_empty());
}

#[test]
fn test_extension_times_out() {
    let ids = entities(1);
    let mut rig = Rig::new(ids[0]);
    rig.tuning.extend_speed = 1.0;
    rig.tuning.max_extend_distance = 100.0;
    rig.tuning.max_extend_duration = 0.3;

    rig.press();

    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
}

#[test]
fn test_extension_ignores_anchor_past_reach() {
    let ids = entities(2);
    let mut rig = Rig::new(ids[0]);
    rig.tuning.max_extend_distance = 8.0;
    rig.world.anchors.push(ids[1]);
    rig.world.hits.push(GrappleHit {
        entity: ids[1],
        point: Vec2::new(9.0, 0.0),
        distance: 9.0,
    });

    rig.press();
    rig.fixed();

    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
    assert!(rig.events.is_empty());
}

#[test]
fn test_extension_ignores_anchor_reached_after_timeout() {
    let ids = entities(2);
    let mut rig = Rig::new(ids[0]);
    rig.tuning.extend_speed = 10.0;
    rig.tuning.max_extend_distance = 100.0;
    rig.tuning.max_extend_duration = 0.5;
    rig.world.anchors.push(ids[1]);
    rig.world.hits.push(GrappleHit {
        entity: ids[1],
        point: Vec2::new(6.0, 0.0),
        distance: 6.0,
    });

    // 4 units out after the first tick, still short of the anchor
    rig.press();
    assert!(rig.grappler.is_extending());

    // 8 units would reach it, but 0.8s is past the duration cap
    rig.fixed();
    rig.fixed();

    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
    assert!(rig.events.is_empty());
}

#[test]
fn test_aim_prefers_held_direction_over_cursor() {
    let ids = entities(1);
    let mut rig = Rig::new(ids[0]);
    rig.input.aim_point = Some(Vec2::new(0.0, -50.0));

    rig.press();

    assert_vec_eq(rig.grappler.cur_grapple_pos(Vec2::ZERO), Vec2::new(8.0, 0.0));
}

#[test]
fn test_aim_follows_cursor_without_held_direction() {
    let ids = entities(1);
    let mut rig = Rig::new(ids[0]);
    rig.input.aim_direction = Vec2::ZERO;
    rig.input.aim_point = Some(Vec2::new(0.0, -50.0));

    rig.press();

    assert_vec_eq(rig.grappler.cur_grapple_pos(Vec2::ZERO), Vec2::new(0.0, -8.0));
}

#[test]
fn test_aim_falls_back_to_up_forward() {
    let ids = entities(1);
    let mut rig = Rig::new(ids[0]);
    rig.input.aim_direction = Vec2::ZERO;
    // Cursor right on the grappler gives no direction
    rig.input.aim_point = Some(Vec2::ZERO);

    rig.press();

    let expected = Vec2::new(1.0, 1.0).normalize() * 8.0;
    assert_vec_eq(rig.grappler.cur_grapple_pos(Vec2::ZERO), expected);
}

#[test]
fn test_release_during_extension_cancels() {
    let ids = entities(1);
    let mut rig = Rig::new(ids[0]);
    rig.body.dt = 0.1;
    rig.body.velocity = Vec2::new(3.0, 1.0);

    rig.press();
    assert!(rig.grappler.is_extending());
    assert_vec_eq(rig.grappler.cur_grapple_pos(Vec2::ZERO), Vec2::new(2.0, 0.0));

    rig.input.grapple_released = true;
    rig.update();

    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
    assert_vec_eq(rig.body.velocity, Vec2::new(3.0, 1.0));
}

#[test]
fn test_release_while_swinging_boosts() {
    let ids = entities(2);
    let mut rig = Rig::new(ids[0]);
    rig.world.anchors.push(ids[1]);
    rig.enter(GrappleState::Swinging(Swinging::new(ids[1], Vec2::new(0.0, 10.0))));
    rig.events.clear();
    rig.body.velocity = Vec2::new(0.0, -100.0);

    rig.input.grapple_released = true;
    rig.update();

    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
    assert_vec_eq(rig.body.velocity, Vec2::new(80.0, -20.0));
    assert_eq!(
        rig.events,
        vec![GrappleEvent::Detached {
            target: ids[1],
            boosted: true,
        }]
    );
}

#[test]
fn test_wall_stop_boosts_but_landing_does_not() {
    let ids = entities(2);
    let mut rig = Rig::new(ids[0]);
    rig.world.anchors.push(ids[1]);

    rig.enter(GrappleState::Swinging(Swinging::new(ids[1], Vec2::new(0.0, 10.0))));
    rig.with_ctx(|g, ctx| g.collide_horizontal(ctx));
    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
    assert_vec_eq(rig.body.velocity, Vec2::new(80.0, 80.0));

    rig.body.velocity = Vec2::ZERO;
    rig.events.clear();
    rig.enter(GrappleState::Swinging(Swinging::new(ids[1], Vec2::new(0.0, 10.0))));
    rig.with_ctx(|g, ctx| g.collide_vertical(ctx));
    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
    assert_vec_eq(rig.body.velocity, Vec2::ZERO);
    assert!(rig.events.contains(&GrappleEvent::Detached {
        target: ids[1],
        boosted: false,
    }));
}

#[test]
fn test_wall_hit_redirects_when_wall_stop_disabled() {
    let ids = entities(2);
    let mut rig = Rig::new(ids[0]);
    rig.tuning.collide_wall_stop = false;
    rig.world.anchors.push(ids[1]);
    rig.enter(GrappleState::Swinging(Swinging::new(ids[1], Vec2::new(0.0, 10.0))));

    rig.with_ctx(|g, ctx| g.collide_horizontal(ctx));
    assert_eq!(rig.grappler.kind(), GrappleKind::Swinging);

    let out = rig.grappler.process_collide_horizontal(
        Vec2::new(100.0, 10.0),
        Vec2::new(0.0, 10.0),
        &rig.tuning,
    );
    assert_vec_eq(out, Vec2::new(0.0, 60.0));
}

#[test]
fn test_distance_cap_ends_swing() {
    let ids = entities(2);
    let mut rig = Rig::new(ids[0]);
    rig.tuning.max_grapple_distance = Some(Vec2::new(50.0, 50.0));
    rig.world.anchors.push(ids[1]);
    rig.enter(GrappleState::Swinging(Swinging::new(ids[1], Vec2::new(0.0, 10.0))));

    rig.update();
    assert_eq!(rig.grappler.kind(), GrappleKind::Swinging);

    rig.body.position = Vec2::new(0.0, -60.0);
    rig.update();
    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
}

fn pulling_rig() -> (Rig, Entity) {
    let ids = entities(2);
    let mut rig = Rig::new(ids[0]);
    rig.world
        .pulls
        .push((ids[1], PullTarget::default(), TestBody::at(Vec2::new(10.0, 0.0))));
    rig.world.hits.push(GrappleHit {
        entity: ids[1],
        point: Vec2::new(9.0, 0.0),
        distance: 9.0,
    });
    rig.tuning.max_extend_distance = 20.0;
    rig.tuning.extend_speed = 50.0;
    rig.press();
    (rig, ids[1])
}

#[test]
fn test_pull_target_is_reeled_in() {
    let (mut rig, target) = pulling_rig();

    assert_eq!(rig.grappler.kind(), GrappleKind::Pulling);
    {
        let (pull, body) = rig.world.pull(target);
        assert_eq!(pull.kind(), PullKind::Attached);
        assert_vec_eq(body.velocity, Vec2::new(-260.0, 0.0));
    }

    rig.fixed();

    // Lerp 20% from -260 toward the -220 floor speed
    let (_, body) = rig.world.pull(target);
    assert_vec_eq(body.velocity, Vec2::new(-252.0, 0.0));
    assert_vec_eq(rig.grappler.cur_grapple_pos(Vec2::ZERO), Vec2::new(10.0, 0.0));
}

#[test]
fn test_break_drops_target_without_grace() {
    let (mut rig, target) = pulling_rig();
    rig.events.clear();

    rig.with_ctx(|g, ctx| g.break_grapple(ctx));

    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
    let (pull, body) = rig.world.pull(target);
    assert_eq!(pull.state(), &PullState::Idle { grace: None });
    assert_vec_eq(body.velocity, Vec2::ZERO);
    assert_eq!(
        rig.events,
        vec![GrappleEvent::Detached {
            target,
            boosted: false,
        }]
    );
}

#[test]
fn test_pulling_ends_when_target_lets_go() {
    let (mut rig, target) = pulling_rig();
    let me = rig.me;

    rig.world.detach_grapple(target, me);
    rig.update();

    assert_eq!(rig.grappler.kind(), GrappleKind::Idle);
}

// --- Pull targets ---

#[test]
fn test_second_attach_is_refused() {
    let ids = entities(3);
    let mut target = PullTarget::default();
    let mut body = TestBody::at(Vec2::new(10.0, 0.0));
    let mut view = PullTargetMut {
        entity: ids[0],
        target: &mut target,
        body: &mut body,
    };
    let first = GrapplerInfo {
        entity: ids[1],
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
    };
    let second = GrapplerInfo {
        entity: ids[2],
        ..first
    };

    assert_eq!(
        view.attach_grapple(&first, Vec2::new(9.0, 0.0)).attached_to,
        Some(ids[0])
    );
    let refused = view.attach_grapple(&second, Vec2::new(9.0, 0.0));
    assert_eq!(refused.attached_to, None);
    assert!(view.is_attached_to(ids[1]));
    assert!(!view.is_attached_to(ids[2]));
}

#[test]
fn test_sticky_restores_faded_velocity() {
    let mut target = PullTarget::default();
    let mut body = TestBody::at(Vec2::ZERO);
    body.velocity = Vec2::new(3.0, -2.0);
    body.dt = 0.15;

    target.sticky_enter(&mut body);
    assert!(target.is_in_sticky());
    assert_vec_eq(body.velocity, Vec2::ZERO);

    target.fixed_update(&mut body);
    assert_vec_eq(body.velocity, Vec2::ZERO);

    // Halfway through the 0.3s grace window
    target.sticky_exit(&mut body);
    assert_eq!(target.kind(), PullKind::Idle);
    assert_vec_eq(body.velocity, Vec2::new(1.5, -1.0));
}

#[test]
fn test_sticky_exit_after_grace_keeps_nothing() {
    let mut target = PullTarget::default();
    let mut body = TestBody::at(Vec2::ZERO);
    body.velocity = Vec2::new(3.0, -2.0);
    body.dt = 0.5;

    target.sticky_enter(&mut body);
    target.fixed_update(&mut body);
    target.sticky_exit(&mut body);

    assert_vec_eq(body.velocity, Vec2::ZERO);
}

#[test]
fn test_sticky_target_holds_rope_as_fixed() {
    let ids = entities(2);
    let mut target = PullTarget::default();
    let mut body = TestBody::at(Vec2::new(10.0, 0.0));
    let me = GrapplerInfo {
        entity: ids[1],
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
    };
    {
        let mut view = PullTargetMut {
            entity: ids[0],
            target: &mut target,
            body: &mut body,
        };
        view.attach_grapple(&me, Vec2::new(9.0, 0.0));
    }

    target.sticky_enter(&mut body);
    let view = PullTargetMut {
        entity: ids[0],
        target: &mut target,
        body: &mut body,
    };
    assert!(view.is_fixed());
    assert!(view.is_attached_to(ids[1]));

    // Sticky exit hands the rope back to the attached state
    target.sticky_exit(&mut body);
    assert_eq!(target.kind(), PullKind::Attached);
}

#[test]
fn test_detach_grace_fades_horizontal_velocity() {
    let ids = entities(2);
    let mut target = PullTarget::default();
    let mut body = TestBody::at(Vec2::new(10.0, 0.0));
    body.dt = 0.15;
    let me = GrapplerInfo {
        entity: ids[1],
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
    };
    let mut view = PullTargetMut {
        entity: ids[0],
        target: &mut target,
        body: &mut body,
    };
    view.attach_grapple(&me, Vec2::new(9.0, 0.0));
    view.detach_grapple(ids[1]);

    target.fixed_update(&mut body);
    assert_eq!(target.kind(), PullKind::Idle);
    assert_vec_eq(body.velocity, Vec2::new(-130.0, 0.0));
}

// --- ECS publishing ---

#[test]
fn test_state_changes_published_as_messages() {
    let mut world = World::new();
    world.init_resource::<Messages<GrappleStateChanged>>();
    world.init_resource::<Messages<PullStateChanged>>();

    let ids = entities(1);
    let mut rig = Rig::new(ids[0]);
    rig.tuning.max_extend_distance = 8.0;
    rig.press();
    let entity = world.spawn(rig.grappler).id();

    world
        .run_system_once(publish_state_changes)
        .expect("publish system runs");
    let published = world
        .run_system_once(|mut reader: MessageReader<GrappleStateChanged>| {
            reader
                .read()
                .map(|m| (m.entity, m.from, m.to))
                .collect::<Vec<_>>()
        })
        .expect("reader system runs");

    assert_eq!(
        published,
        vec![
            (entity, GrappleKind::Idle, GrappleKind::ExtendGrapple),
            (entity, GrappleKind::ExtendGrapple, GrappleKind::Idle),
        ]
    );
}

/// World with a pull target reeled in by `grappler`, and the removal observer.
fn world_with_pulled_target() -> (World, Entity, Entity) {
    let mut world = World::new();
    world.init_resource::<Time>();
    world.init_resource::<MovementTuning>();
    world.add_observer(release_removed_grappler);

    let grappler = world.spawn_empty().id();
    let target = world.spawn_empty().id();

    let mut pull = PullTarget::default();
    let mut body = TestBody::at(Vec2::new(10.0, 0.0));
    {
        let mut view = PullTargetMut {
            entity: target,
            target: &mut pull,
            body: &mut body,
        };
        let info = GrapplerInfo {
            entity: grappler,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
        };
        assert!(view.attach_grapple(&info, Vec2::new(9.0, 0.0)).is_attached());
    }
    world.entity_mut(target).insert((
        pull,
        LinearVelocity(body.velocity),
        Transform::from_xyz(10.0, 0.0, 0.0),
    ));

    let mut rig = Rig::new(grappler);
    rig.enter(GrappleState::Pulling(Pulling::new(target, Vec2::new(10.0, 0.0))));
    world.entity_mut(grappler).insert(rig.grappler);

    (world, grappler, target)
}

fn assert_grappleable_by_newcomer(world: &mut World, target: Entity) {
    let newcomer = world.spawn_empty().id();
    let mut pull = world
        .get_mut::<PullTarget>(target)
        .expect("target still exists");
    assert_eq!(pull.kind(), PullKind::Idle);

    let mut body = TestBody::at(Vec2::new(10.0, 0.0));
    let mut view = PullTargetMut {
        entity: target,
        target: &mut *pull,
        body: &mut body,
    };
    let info = GrapplerInfo {
        entity: newcomer,
        position: Vec2::new(20.0, 0.0),
        velocity: Vec2::ZERO,
    };
    assert!(view.attach_grapple(&info, Vec2::new(11.0, 0.0)).is_attached());
}

#[test]
fn test_removing_grappler_releases_pull_target() {
    let (mut world, grappler, target) = world_with_pulled_target();
    assert_eq!(
        world.get::<PullTarget>(target).map(PullTarget::kind),
        Some(PullKind::Attached)
    );

    world.entity_mut(grappler).remove::<Grappler>();

    assert_grappleable_by_newcomer(&mut world, target);
}

#[test]
fn test_despawning_grappler_releases_pull_target() {
    let (mut world, grappler, target) = world_with_pulled_target();

    assert!(world.despawn(grappler));

    assert_grappleable_by_newcomer(&mut world, target);
}

#[test]
fn test_bullet_time_only_while_extending() {
    let mut world = World::new();
    world.insert_resource(Time::<Virtual>::default());
    world.insert_resource(GrappleTuning {
        bullet_time_scale: 0.25,
        ..default()
    });

    let ids = entities(1);
    let mut rig = Rig::new(ids[0]);
    rig.press();
    assert!(rig.grappler.is_extending());
    let grappler = world.spawn(rig.grappler).id();

    world
        .run_system_once(apply_bullet_time)
        .expect("bullet time system runs");
    assert_eq!(world.resource::<Time<Virtual>>().relative_speed(), 0.25);

    world.entity_mut(grappler).remove::<Grappler>();
    world
        .run_system_once(apply_bullet_time)
        .expect("bullet time system runs");
    assert_eq!(world.resource::<Time<Virtual>>().relative_speed(), 1.0);
}
