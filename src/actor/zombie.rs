//! Zombie decision state machine
//!
//! Re-evaluated from scratch every tick:
//! 1. Anyone within bite range gets bitten. The first such actor in world
//!    order wins, not the nearest, whatever its kind or status. Biting a
//!    corpse is a miss.
//! 2. Otherwise keep the current target unless there is none, it died, or it
//!    is a point we have reached. Retarget to the nearest visible actor, or
//!    wander toward a random point.
//! 3. Steer: turn toward the target, and only advance once roughly facing it.
//!    The heading difference is a plain absolute difference with no
//!    wraparound, so facing 1° with a bearing of 357° still turns first.
//!
//! A refused move needs no handling here; the next tick starts over.

use crate::actor::{ActorRequest, ActorView, PointSource, Target, Think, ThinkContext};
use crate::core::error::Result;
use crate::core::geometry::{angular_difference, bearing, unit_step};
use crate::core::types::{ActorMode, Point};

#[derive(Debug, Clone, Default)]
pub struct ZombieBrain {
    target: Option<Target>,
    mode: ActorMode,
}

impl ZombieBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    fn needs_target(&self, ctx: &ThinkContext<'_>) -> bool {
        match self.target {
            None => true,
            Some(Target::Actor(id)) => ctx.lookup(id).map_or(true, |view| !view.is_alive()),
            Some(Target::Point(point)) => ctx.me.position().near(&point, ctx.steering.catchment),
        }
    }

    fn find_target(ctx: &ThinkContext<'_>, points: &mut dyn PointSource) -> Target {
        let nearest = ctx
            .visible
            .iter()
            .min_by(|a, b| ctx.me.distance_to(a).total_cmp(&ctx.me.distance_to(b)));

        match nearest {
            Some(view) => Target::Actor(view.id),
            None => Target::Point(points.pick_point()),
        }
    }

    fn goal(&self, ctx: &ThinkContext<'_>) -> Option<Point> {
        match self.target? {
            Target::Actor(id) => ctx.lookup(id).map(ActorView::position),
            Target::Point(point) => Some(point),
        }
    }

    fn steer(ctx: &ThinkContext<'_>, goal: Point) -> ActorRequest {
        let heading = bearing(ctx.me.position(), goal);
        if angular_difference(heading, ctx.me.heading) < ctx.steering.turn_threshold_deg {
            ActorRequest::Move(unit_step(heading))
        } else {
            ActorRequest::Turn(heading)
        }
    }
}

impl Think for ZombieBrain {
    fn think(&mut self, ctx: &ThinkContext<'_>, points: &mut dyn PointSource) -> Result<ActorRequest> {
        let range = ctx.profile.attack_range;
        let dinner = ctx
            .visible
            .iter()
            .find(|view| ctx.me.distance_to(view) <= range);

        if let Some(dinner) = dinner {
            self.mode = ActorMode::Attacking;
            return Ok(ActorRequest::Attack(dinner.id));
        }

        if self.needs_target(ctx) {
            self.target = Some(Self::find_target(ctx, points));
        }

        self.mode = match self.target {
            Some(Target::Actor(_)) => ActorMode::Targeting,
            _ => ActorMode::Wandering,
        };

        match self.goal(ctx) {
            Some(goal) => Ok(Self::steer(ctx, goal)),
            None => Ok(ActorRequest::NoOp),
        }
    }

    fn mode(&self) -> ActorMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{KindProfile, SteeringConfig};
    use crate::core::types::{ActorId, ActorKind, ActorStatus, Step};

    /// Hands out a fixed point and counts how often it was asked
    struct FixedPoints {
        point: Point,
        calls: usize,
    }

    impl FixedPoints {
        fn new(point: Point) -> Self {
            Self { point, calls: 0 }
        }
    }

    impl PointSource for FixedPoints {
        fn pick_point(&mut self) -> Point {
            self.calls += 1;
            self.point
        }
    }

    fn view(kind: ActorKind, x: i32, y: i32) -> ActorView {
        ActorView {
            id: ActorId::new(),
            kind,
            x,
            y,
            heading: 0.0,
            health: 100,
            status: ActorStatus::Alive,
        }
    }

    fn think(
        brain: &mut ZombieBrain,
        me: ActorView,
        others: &[ActorView],
        points: &mut FixedPoints,
    ) -> ActorRequest {
        let profile = KindProfile::zombie();
        let steering = SteeringConfig::default();
        let mut roster = vec![me];
        roster.extend_from_slice(others);
        let ctx = ThinkContext {
            me,
            visible: others,
            roster: &roster,
            profile: &profile,
            steering: &steering,
            remote: None,
        };
        brain.think(&ctx, points).unwrap()
    }

    #[test]
    fn test_worked_bearing_example_moves_up() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 0, 0);
        let mut points = FixedPoints::new(Point::new(0, 100));

        let request = think(&mut brain, me, &[], &mut points);

        assert_eq!(request, ActorRequest::Move(Step::new(0, 1).unwrap()));
        assert_eq!(points.calls, 1);
        assert_eq!(brain.mode(), ActorMode::Wandering);
    }

    #[test]
    fn test_turns_before_advancing() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 0, 0);
        let mut points = FixedPoints::new(Point::new(100, 0));

        match think(&mut brain, me, &[], &mut points) {
            ActorRequest::Turn(heading) => assert!((heading - 90.0).abs() < 1e-9),
            other => panic!("expected a turn, got {:?}", other),
        }

        // Now facing the point: advance along +x
        let me = ActorView { heading: 90.0, ..me };
        assert_eq!(
            think(&mut brain, me, &[], &mut points),
            ActorRequest::Move(Step::new(1, 0).unwrap())
        );
        // The point was kept, not re-picked
        assert_eq!(points.calls, 1);
    }

    #[test]
    fn test_bites_first_in_range_not_nearest() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 50, 50);
        let farther = view(ActorKind::Human, 65, 50);
        let nearer = view(ActorKind::Human, 51, 50);
        let mut points = FixedPoints::new(Point::new(0, 0));

        let request = think(&mut brain, me, &[farther, nearer], &mut points);

        assert_eq!(request, ActorRequest::Attack(farther.id));
        assert_eq!(brain.mode(), ActorMode::Attacking);
        assert_eq!(points.calls, 0);
    }

    #[test]
    fn test_bites_corpse_first_in_order() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 50, 50);
        let corpse = ActorView {
            status: ActorStatus::Dead,
            health: 0,
            ..view(ActorKind::Human, 52, 50)
        };
        let live = view(ActorKind::Human, 50, 55);
        let mut points = FixedPoints::new(Point::new(50, 300));

        let request = think(&mut brain, me, &[corpse, live], &mut points);

        assert_eq!(request, ActorRequest::Attack(corpse.id));
        assert_eq!(points.calls, 0);
    }

    #[test]
    fn test_bites_other_zombie_in_range() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 50, 50);
        let other = view(ActorKind::Zombie, 55, 50);
        let mut points = FixedPoints::new(Point::new(50, 300));

        let request = think(&mut brain, me, &[other], &mut points);

        assert_eq!(request, ActorRequest::Attack(other.id));
        assert_eq!(brain.mode(), ActorMode::Attacking);
    }

    #[test]
    fn test_targets_lone_visible_zombie() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 0, 0);
        let other = view(ActorKind::Zombie, 0, 60);
        let mut points = FixedPoints::new(Point::new(300, 300));

        think(&mut brain, me, &[other], &mut points);

        assert_eq!(brain.target(), Some(Target::Actor(other.id)));
        assert_eq!(points.calls, 0);
    }

    #[test]
    fn test_heading_difference_does_not_wrap() {
        let mut brain = ZombieBrain::new();
        let me = ActorView {
            heading: 1.0,
            ..view(ActorKind::Zombie, 50, 50)
        };
        // Bearing is about 357 degrees, only 4 away across the seam
        let prey = view(ActorKind::Human, 48, 90);
        let mut points = FixedPoints::new(Point::new(0, 0));

        match think(&mut brain, me, &[prey], &mut points) {
            ActorRequest::Turn(heading) => assert!((heading - 357.14).abs() < 0.01, "got {}", heading),
            other => panic!("expected a turn, got {:?}", other),
        }
    }

    #[test]
    fn test_retargets_to_nearest_visible_actor() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 0, 0);
        let far = view(ActorKind::Human, 100, 0);
        let near = view(ActorKind::Human, 0, 60);
        let mut points = FixedPoints::new(Point::new(300, 300));

        think(&mut brain, me, &[far, near], &mut points);

        assert_eq!(brain.target(), Some(Target::Actor(near.id)));
        assert_eq!(brain.mode(), ActorMode::Targeting);
        assert_eq!(points.calls, 0);
    }

    #[test]
    fn test_keeps_live_target_even_if_something_closer_appears() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 0, 0);
        let first = view(ActorKind::Human, 0, 100);
        let mut points = FixedPoints::new(Point::new(300, 300));
        think(&mut brain, me, &[first], &mut points);

        let closer = view(ActorKind::Human, 0, 50);
        think(&mut brain, me, &[first, closer], &mut points);

        assert_eq!(brain.target(), Some(Target::Actor(first.id)));
    }

    #[test]
    fn test_dead_target_triggers_retarget() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 0, 0);
        let victim = view(ActorKind::Human, 0, 100);
        let mut points = FixedPoints::new(Point::new(300, 300));
        think(&mut brain, me, &[victim], &mut points);

        // The corpse is still in the world but has drifted out of sight
        let dead = ActorView {
            status: ActorStatus::Dead,
            health: 0,
            ..victim
        };
        let profile = KindProfile::zombie();
        let steering = SteeringConfig::default();
        let roster = [me, dead];
        let ctx = ThinkContext {
            me,
            visible: &[],
            roster: &roster,
            profile: &profile,
            steering: &steering,
            remote: None,
        };
        brain.think(&ctx, &mut points).unwrap();

        assert_eq!(brain.target(), Some(Target::Point(Point::new(300, 300))));
        assert_eq!(points.calls, 1);
    }

    #[test]
    fn test_dead_target_in_sight_is_retargeted_to_nearest() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 0, 0);
        let victim = view(ActorKind::Human, 0, 100);
        let mut points = FixedPoints::new(Point::new(300, 300));
        think(&mut brain, me, &[victim], &mut points);

        let dead = ActorView {
            status: ActorStatus::Dead,
            health: 0,
            ..victim
        };
        let walker = view(ActorKind::Zombie, 80, 0);
        think(&mut brain, me, &[dead, walker], &mut points);

        assert_eq!(brain.target(), Some(Target::Actor(walker.id)));
        assert_eq!(points.calls, 0);
    }

    #[test]
    fn test_reached_point_uses_square_catchment() {
        let mut brain = ZombieBrain::new();
        let mut points = FixedPoints::new(Point::new(100, 100));
        think(&mut brain, view(ActorKind::Zombie, 0, 0), &[], &mut points);
        assert_eq!(points.calls, 1);

        // 40 away on both axes: inside the square, so a new point is picked
        think(&mut brain, view(ActorKind::Zombie, 60, 60), &[], &mut points);
        assert_eq!(points.calls, 2);

        // 41 away on one axis: still travelling
        think(&mut brain, view(ActorKind::Zombie, 59, 100), &[], &mut points);
        assert_eq!(points.calls, 2);
    }

    #[test]
    fn test_target_out_of_sight_is_still_chased() {
        let mut brain = ZombieBrain::new();
        let me = view(ActorKind::Zombie, 0, 0);
        let prey = view(ActorKind::Human, 0, 100);
        let mut points = FixedPoints::new(Point::new(300, 300));
        think(&mut brain, me, &[prey], &mut points);

        // Prey is in the roster but no longer visible
        let profile = KindProfile::zombie();
        let steering = SteeringConfig::default();
        let roster = [me, prey];
        let ctx = ThinkContext {
            me,
            visible: &[],
            roster: &roster,
            profile: &profile,
            steering: &steering,
            remote: None,
        };
        let request = brain.think(&ctx, &mut points).unwrap();

        assert_eq!(request, ActorRequest::Move(Step::new(0, 1).unwrap()));
        assert_eq!(points.calls, 0);
    }
}
