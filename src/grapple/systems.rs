//! Grapple domain: input, ability ticks, target ticks and message publishing.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::ability::AbilityError;
use crate::grapple::events::{
    GrappleAttached, GrappleDetached, GrappleStateChanged, PullStateChanged,
};
use crate::grapple::{
    EcsGrappleWorld, GrappleContext, GrappleEvent, GrappleInput, GrappleTuning, Grappleable,
    Grappler, PullTarget, PullTargetMut, StickyZone,
};
use crate::movement::{
    ActorBody, ActorCollision, CollisionAxis, MovementState, MovementTuning, keyboard_axis,
};

pub(crate) fn read_grapple_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut input: ResMut<GrappleInput>,
) {
    let keys = [KeyCode::KeyJ, KeyCode::ShiftLeft];
    let axis = keyboard_axis(&keyboard);

    // Edges accumulate until a fixed tick consumes them
    input.grapple_pressed |= keyboard.any_just_pressed(keys);
    input.grapple_released |= keyboard.any_just_released(keys);
    input.aim_direction = axis;
    input.aim_point = cursor_world_position(&windows, &cameras);
    input.move_axis = axis.x as i8;
}

fn cursor_world_position(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let window = windows.single().ok()?;
    let cursor = window.cursor_position()?;
    let (camera, transform) = cameras.single().ok()?;
    camera.viewport_to_world_2d(transform, cursor).ok()
}

pub(crate) fn clear_grapple_edges(mut input: ResMut<GrappleInput>) {
    input.clear_edges();
}

/// Drops grapplers spawned without the physics components the ability drives.
pub(crate) fn validate_grapplers(
    mut commands: Commands,
    query: Query<(Entity, Has<LinearVelocity>, Has<Transform>), Added<Grappler>>,
) {
    for (entity, has_velocity, has_transform) in &query {
        let missing = if !has_velocity {
            "LinearVelocity"
        } else if !has_transform {
            "Transform"
        } else {
            continue;
        };
        let err = AbilityError::MissingComponent {
            entity,
            component: missing,
        };
        error!("Disabling grapple: {}", err);
        commands.entity(entity).remove::<Grappler>();
    }
}

/// Runs every grappler for one fixed tick: wall and floor contacts first,
/// then the frame update with queued input edges, then the physics step.
pub(crate) fn tick_grapplers(
    time: Res<Time>,
    input: Res<GrappleInput>,
    tuning: Res<GrappleTuning>,
    movement: Res<MovementTuning>,
    mut collisions: MessageReader<ActorCollision>,
    mut world: EcsGrappleWorld,
    mut attached: MessageWriter<GrappleAttached>,
    mut detached: MessageWriter<GrappleDetached>,
    mut query: Query<(
        Entity,
        &mut Grappler,
        &mut LinearVelocity,
        &Transform,
        &mut MovementState,
    )>,
) {
    let contacts: Vec<ActorCollision> = collisions.read().copied().collect();
    let dt = time.delta_secs();
    let mut events = Vec::new();

    for (entity, mut grappler, mut velocity, transform, mut state) in &mut query {
        let mut body = ActorBody {
            position: transform.translation.truncate(),
            velocity: &mut velocity.0,
            facing: state.facing,
            tuning: &movement,
            dt,
        };
        // Time spent on the rope so far, read before this tick can release it
        let held_for = grappler.machine().sojourn();
        let mut ctx = GrappleContext {
            entity,
            body: &mut body,
            input: &input,
            tuning: &tuning,
            world: &mut world,
            events: &mut events,
        };

        for contact in contacts.iter().filter(|c| c.entity == entity) {
            match contact.axis {
                CollisionAxis::Horizontal => {
                    let resolved = grappler.process_collide_horizontal(
                        grappler.last_velocity(),
                        ctx.body.velocity(),
                        ctx.tuning,
                    );
                    ctx.body.set_velocity(resolved);
                    grappler.collide_horizontal(&mut ctx);
                }
                CollisionAxis::Vertical => grappler.collide_vertical(&mut ctx),
            }
        }

        grappler.update(&mut ctx);
        grappler.fixed_update(&mut ctx);

        state.ability_locked = grappler.is_grappling();

        for event in events.drain(..) {
            match event {
                GrappleEvent::Attached {
                    target,
                    point,
                    grapple_type,
                } => {
                    info!("Grapple attached: {} -> {} at {:?}", entity, target, point);
                    attached.write(GrappleAttached {
                        grappler: entity,
                        target,
                        point,
                        grapple_type,
                    });
                }
                GrappleEvent::Detached { target, boosted } => {
                    info!(
                        "Grapple released: {} from {} after {:.2}s (boost: {})",
                        entity, target, held_for, boosted
                    );
                    detached.write(GrappleDetached {
                        grappler: entity,
                        target,
                        boosted,
                    });
                }
            }
        }
    }
}

pub(crate) fn tick_pull_targets(
    time: Res<Time>,
    movement: Res<MovementTuning>,
    mut query: Query<
        (
            &mut PullTarget,
            &mut LinearVelocity,
            &Transform,
            Option<&mut MovementState>,
        ),
        Without<Grappler>,
    >,
) {
    let dt = time.delta_secs();
    for (mut target, mut velocity, transform, state) in &mut query {
        let mut body = ActorBody {
            position: transform.translation.truncate(),
            velocity: &mut velocity.0,
            facing: default(),
            tuning: &movement,
            dt,
        };
        target.fixed_update(&mut body);

        // Gravity stays off while a sticky surface holds the target
        if let Some(mut state) = state {
            state.ability_locked = target.is_in_sticky();
        }
    }
}

/// Pull targets stick while overlapping a [`StickyZone`].
pub(crate) fn track_sticky_zones(
    time: Res<Time>,
    movement: Res<MovementTuning>,
    mut collision_start: MessageReader<CollisionStart>,
    mut collision_end: MessageReader<CollisionEnd>,
    zones: Query<(), With<StickyZone>>,
    mut targets: Query<(&mut PullTarget, &mut LinearVelocity, &Transform), Without<Grappler>>,
) {
    let dt = time.delta_secs();
    let pair = |a: Entity, b: Entity| {
        if zones.contains(a) {
            Some(b)
        } else if zones.contains(b) {
            Some(a)
        } else {
            None
        }
    };

    for event in collision_start.read() {
        let Some(other) = pair(event.collider1, event.collider2) else {
            continue;
        };
        let Ok((mut target, mut velocity, transform)) = targets.get_mut(other) else {
            continue;
        };
        debug!("Pull target {} entered sticky zone", other);
        let mut body = ActorBody {
            position: transform.translation.truncate(),
            velocity: &mut velocity.0,
            facing: default(),
            tuning: &movement,
            dt,
        };
        target.sticky_enter(&mut body);
    }

    for event in collision_end.read() {
        let Some(other) = pair(event.collider1, event.collider2) else {
            continue;
        };
        let Ok((mut target, mut velocity, transform)) = targets.get_mut(other) else {
            continue;
        };
        debug!("Pull target {} left sticky zone", other);
        let mut body = ActorBody {
            position: transform.translation.truncate(),
            velocity: &mut velocity.0,
            facing: default(),
            tuning: &movement,
            dt,
        };
        target.sticky_exit(&mut body);
    }
}

pub(crate) fn publish_state_changes(
    mut grapplers: Query<(Entity, &mut Grappler)>,
    mut targets: Query<(Entity, &mut PullTarget)>,
    mut grapple_changes: MessageWriter<GrappleStateChanged>,
    mut pull_changes: MessageWriter<PullStateChanged>,
) {
    for (entity, mut grappler) in &mut grapplers {
        let mut changed = false;
        for change in grappler.machine_mut().drain_changes() {
            changed = true;
            grapple_changes.write(GrappleStateChanged {
                entity,
                from: change.from,
                to: change.to,
            });
        }
        if changed {
            debug!(
                "Grappler {} now {:?} ({} transitions total)",
                entity,
                grappler.kind(),
                grappler.machine().transition_count()
            );
        }
    }
    for (entity, mut target) in &mut targets {
        for change in target.machine_mut().drain_changes() {
            pull_changes.write(PullStateChanged {
                entity,
                from: change.from,
                to: change.to,
            });
        }
    }
}

/// A grappler removed or despawned mid-pull lets go of its target, so the
/// target stays grappleable by others.
pub(crate) fn release_removed_grappler(
    remove: On<Remove, Grappler>,
    time: Res<Time>,
    movement: Res<MovementTuning>,
    grapplers: Query<&Grappler>,
    mut targets: Query<(&mut PullTarget, &mut LinearVelocity, &Transform), Without<Grappler>>,
) {
    let Ok(grappler) = grapplers.get(remove.entity) else {
        return;
    };
    let Some(target) = grappler.state().attached_target() else {
        return;
    };
    let Ok((mut pull, mut velocity, transform)) = targets.get_mut(target) else {
        return;
    };
    debug!("Grappler {} went away, releasing {}", remove.entity, target);
    let mut body = ActorBody {
        position: transform.translation.truncate(),
        velocity: &mut velocity.0,
        facing: default(),
        tuning: &movement,
        dt: time.delta_secs(),
    };
    let mut view = PullTargetMut {
        entity: target,
        target: &mut pull,
        body: &mut body,
    };
    view.detach_grapple(remove.entity);
}

/// Slows the game down while any rope is flying out.
pub(crate) fn apply_bullet_time(
    tuning: Res<GrappleTuning>,
    grapplers: Query<&Grappler>,
    mut time: ResMut<Time<Virtual>>,
) {
    let scale = if grapplers.iter().any(Grappler::is_extending) {
        tuning.bullet_time_scale
    } else {
        1.0
    };
    if time.relative_speed() != scale {
        time.set_relative_speed(scale);
    }
}

#[cfg(feature = "dev-tools")]
pub(crate) fn draw_ropes(mut gizmos: Gizmos, query: Query<(&Grappler, &Transform)>) {
    for (grappler, transform) in &query {
        let color = if grappler.is_extending() {
            Color::srgb(0.8, 0.8, 0.3)
        } else if grappler.is_grappling() {
            Color::srgb(0.3, 0.9, 0.4)
        } else {
            continue;
        };
        let position = transform.translation.truncate();
        let end = grappler.cur_grapple_pos(position);
        gizmos.line_2d(position, end, color);
        gizmos.circle_2d(Isometry2d::from_translation(end), 4.0, color);
    }
}
