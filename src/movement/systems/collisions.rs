//! Movement domain: ground, ceiling and wall detection systems.

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::movement::{
    Actor, ActorCollision, CollisionAxis, GameLayer, MovementState, MovementTuning, WallContact,
};

fn half_extents(collider: &Collider) -> Vec2 {
    match collider.shape_scaled().as_cuboid() {
        Some(c) => c.half_extents.into(),
        None => Vec2::new(12.0, 24.0),
    }
}

pub(crate) fn detect_ground(
    spatial_query: SpatialQuery,
    tuning: Res<MovementTuning>,
    mut collisions: MessageWriter<ActorCollision>,
    mut query: Query<(Entity, &Transform, &Collider, &LinearVelocity, &mut MovementState), With<Actor>>,
) {
    // Filter to only hit Ground layer entities (not anchors, sensors, etc.)
    let ground_filter = SpatialQueryFilter::from_mask(GameLayer::Ground);

    for (entity, transform, collider, velocity, mut state) in &mut query {
        let was_on_ground = state.on_ground;
        let half = half_extents(collider);
        let origin = transform.translation.truncate();

        let floor = spatial_query.cast_ray(
            origin - Vec2::new(0.0, half.y),
            Dir2::NEG_Y,
            tuning.contact_probe,
            true,
            &ground_filter,
        );
        state.on_ground = floor.is_some();

        if state.on_ground && !was_on_ground {
            debug!("Landed: entity={}, velocity={:?}", entity, velocity.0);
            collisions.write(ActorCollision {
                entity,
                axis: CollisionAxis::Vertical,
                velocity: velocity.0,
            });
            continue;
        }

        // Only report ceilings while moving up into them
        if velocity.y > 0.0 {
            let ceiling = spatial_query.cast_ray(
                origin + Vec2::new(0.0, half.y),
                Dir2::Y,
                tuning.contact_probe,
                true,
                &ground_filter,
            );
            if ceiling.is_some() {
                debug!("Ceiling hit: entity={}", entity);
                collisions.write(ActorCollision {
                    entity,
                    axis: CollisionAxis::Vertical,
                    velocity: velocity.0,
                });
            }
        }
    }
}

pub(crate) fn detect_walls(
    spatial_query: SpatialQuery,
    tuning: Res<MovementTuning>,
    mut collisions: MessageWriter<ActorCollision>,
    mut query: Query<(Entity, &Transform, &Collider, &LinearVelocity, &mut MovementState), With<Actor>>,
) {
    // Filter to only hit Wall layer entities
    let wall_filter = SpatialQueryFilter::from_mask(GameLayer::Wall);

    for (entity, transform, collider, velocity, mut state) in &mut query {
        let was_on_wall = state.on_wall;
        let reach = half_extents(collider).x + tuning.contact_probe;
        let origin = transform.translation.truncate();

        let left_hit = spatial_query.cast_ray(origin, Dir2::NEG_X, reach, true, &wall_filter);
        let right_hit = spatial_query.cast_ray(origin, Dir2::X, reach, true, &wall_filter);

        state.on_wall = match (left_hit.is_some(), right_hit.is_some()) {
            (true, false) => WallContact::Left,
            (false, true) => WallContact::Right,
            _ => WallContact::None,
        };

        if state.on_wall != WallContact::None && was_on_wall == WallContact::None {
            debug!("Wall contact: entity={}, side={:?}", entity, state.on_wall);
            collisions.write(ActorCollision {
                entity,
                axis: CollisionAxis::Horizontal,
                velocity: velocity.0,
            });
        }
    }
}
