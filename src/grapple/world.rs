//! Grapple domain: the ECS side of target lookup and rope raycasts.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::grapple::{
    FixedAnchor, FixedAnchorView, GrappleHit, GrappleWorld, Grappleable, Grappler, PullTarget,
    PullTargetMut,
};
use crate::movement::{ActorBody, Facing, GameLayer, MovementTuning};

/// Upper bound on hits collected along one rope ray.
const MAX_ROPE_HITS: u32 = 16;

/// [`GrappleWorld`] backed by avian spatial queries and the target components.
#[derive(SystemParam)]
pub struct EcsGrappleWorld<'w, 's> {
    spatial: SpatialQuery<'w, 's>,
    anchors: Query<'w, 's, (), With<FixedAnchor>>,
    targets: Query<
        'w,
        's,
        (&'static mut PullTarget, &'static mut LinearVelocity, &'static Transform),
        Without<Grappler>,
    >,
    movement: Res<'w, MovementTuning>,
    time: Res<'w, Time>,
}

impl GrappleWorld for EcsGrappleWorld<'_, '_> {
    fn raycast_all(&self, origin: Vec2, direction: Dir2, max_distance: f32) -> Vec<GrappleHit> {
        // Rope passes through actors and sensors
        let filter = SpatialQueryFilter::from_mask([
            GameLayer::Ground,
            GameLayer::Wall,
            GameLayer::Interactable,
        ]);
        let mut hits: Vec<GrappleHit> = self
            .spatial
            .ray_hits(origin, direction, max_distance, MAX_ROPE_HITS, true, &filter)
            .into_iter()
            .map(|hit| GrappleHit {
                entity: hit.entity,
                point: origin + *direction * hit.distance,
                distance: hit.distance,
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn with_target(&mut self, target: Entity, f: &mut dyn FnMut(&mut dyn Grappleable)) -> bool {
        if let Ok((mut pull, mut velocity, transform)) = self.targets.get_mut(target) {
            let mut body = ActorBody {
                position: transform.translation.truncate(),
                velocity: &mut velocity.0,
                facing: Facing::default(),
                tuning: &self.movement,
                dt: self.time.delta_secs(),
            };
            let mut view = PullTargetMut {
                entity: target,
                target: &mut pull,
                body: &mut body,
            };
            f(&mut view);
            return true;
        }

        if self.anchors.contains(target) {
            f(&mut FixedAnchorView { entity: target });
            return true;
        }

        false
    }
}
