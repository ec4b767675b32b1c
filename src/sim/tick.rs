//! Per-frame simulation step
//!
//! One call per animation frame. The phase order below is load-bearing:
//! input → jump → integrate → platforms → patrols → hazards → bounds →
//! pickups → portal.

use super::collision::{collect_overlapping, first_hazard_hit, portal_reached, resolve_platforms};
use super::level::Level;
use super::state::{AnimState, DeathCause, Facing, PlayerState, SimEvent};
use crate::tuning::PhysicsTuning;

/// Input snapshot for a single frame, taken once before the step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Restart the current level (edge, consumed by the session)
    pub restart: bool,
}

/// Steer or apply friction. Left wins when both directions are held.
pub fn resolve_horizontal(player: &mut PlayerState, input: &TickInput, tuning: &PhysicsTuning) {
    if input.left {
        player.velocity.x = -tuning.move_speed;
        player.facing = Facing::Left;
        player.anim = AnimState::Run;
    } else if input.right {
        player.velocity.x = tuning.move_speed;
        player.facing = Facing::Right;
        player.anim = AnimState::Run;
    } else {
        player.velocity.x *= tuning.friction;
        if player.velocity.x.abs() < tuning.friction_snap {
            player.velocity.x = 0.0;
            player.anim = AnimState::Idle;
        }
    }
}

/// Start a jump if held while grounded. Returns true if one started.
pub fn try_jump(player: &mut PlayerState, input: &TickInput, tuning: &PhysicsTuning) -> bool {
    if input.jump && player.grounded {
        player.velocity.y = tuning.jump_force;
        player.grounded = false;
        true
    } else {
        false
    }
}

/// Semi-implicit Euler: velocity first, then position
pub fn integrate(player: &mut PlayerState, tuning: &PhysicsTuning) {
    player.velocity.y += tuning.gravity;
    player.position += player.velocity;
}

fn kill(player: &mut PlayerState, cause: DeathCause, events: &mut Vec<SimEvent>) {
    player.dead = true;
    events.push(SimEvent::Died(cause));
}

/// Advance the player and level by one frame.
///
/// A dead player is frozen: nothing moves (patrols included) and no events
/// are produced until the level is reset. The freeze starts on the next
/// frame, so pickups and the portal still count on the frame of death.
pub fn step(
    player: &mut PlayerState,
    level: &mut Level,
    collected_count: &mut u32,
    input: &TickInput,
    tuning: &PhysicsTuning,
) -> Vec<SimEvent> {
    let mut events = Vec::new();
    if player.dead {
        return events;
    }

    resolve_horizontal(player, input, tuning);

    if try_jump(player, input, tuning) {
        events.push(SimEvent::Jumped);
    }

    if !player.grounded {
        player.anim = AnimState::Jump;
    }

    integrate(player, tuning);
    resolve_platforms(player, &level.platforms);

    for hazard in &mut level.hazards {
        hazard.patrol();
    }

    let body = player.rect();

    if let Some(id) = first_hazard_hit(&body, &level.hazards) {
        kill(player, DeathCause::Hazard { id }, &mut events);
    } else if player.position.y > tuning.playfield_height {
        kill(player, DeathCause::OutOfBounds, &mut events);
    }

    for id in collect_overlapping(&body, &mut level.collectibles) {
        *collected_count += 1;
        events.push(SimEvent::Collected { id });
    }

    if portal_reached(&body, &level.portal, *collected_count, level.required_collectibles) {
        events.push(SimEvent::PortalEntered);
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::{Entity, EntityKind, LevelTemplate};
    use crate::sim::rect::Rect;
    use glam::DVec2;
    use proptest::prelude::*;

    /// With |vx| <= 6, friction 0.8 and snap 0.1 the stop takes 19 frames
    const FRICTION_STOP_FRAMES: usize = 20;

    fn far_portal() -> Entity {
        Entity::new(Rect::new(-1000.0, -1000.0, 10.0, 10.0), EntityKind::Portal)
    }

    fn level_with(platforms: Vec<Rect>, hazards: Vec<Entity>, bananas: Vec<Rect>, portal: Entity, required: u32) -> Level {
        Level::instantiate(&LevelTemplate {
            id: 1,
            spawn: DVec2::new(100.0, 500.0),
            required_collectibles: required,
            platforms: platforms
                .into_iter()
                .map(|r| Entity::new(r, EntityKind::Platform))
                .collect(),
            hazards,
            collectibles: bananas
                .into_iter()
                .map(|r| Entity::new(r, EntityKind::Collectible { collected: false }))
                .collect(),
            portal,
        })
    }

    fn ground_level() -> Level {
        level_with(
            vec![Rect::new(0.0, 650.0, 1280.0, 70.0)],
            Vec::new(),
            Vec::new(),
            far_portal(),
            0,
        )
    }

    fn standing_player() -> PlayerState {
        let mut p = PlayerState::spawn_at(DVec2::new(100.0, 600.0));
        p.grounded = true;
        p
    }

    #[test]
    fn test_horizontal_input() {
        let t = PhysicsTuning::default();
        let mut p = standing_player();

        resolve_horizontal(&mut p, &TickInput { left: true, ..Default::default() }, &t);
        assert_eq!(p.velocity.x, -6.0);
        assert_eq!(p.facing, Facing::Left);
        assert_eq!(p.anim, AnimState::Run);

        resolve_horizontal(&mut p, &TickInput { right: true, ..Default::default() }, &t);
        assert_eq!(p.velocity.x, 6.0);
        assert_eq!(p.facing, Facing::Right);

        let both = TickInput { left: true, right: true, ..Default::default() };
        resolve_horizontal(&mut p, &both, &t);
        assert_eq!(p.velocity.x, -6.0);
    }

    #[test]
    fn test_friction_keeps_run_until_snap() {
        let t = PhysicsTuning::default();
        let mut p = standing_player();
        p.velocity.x = 6.0;
        p.anim = AnimState::Run;

        resolve_horizontal(&mut p, &TickInput::default(), &t);
        assert!((p.velocity.x - 4.8).abs() < 1e-5);
        assert_eq!(p.anim, AnimState::Run);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let t = PhysicsTuning::default();
        let jump = TickInput { jump: true, ..Default::default() };

        let mut airborne = PlayerState::spawn_at(DVec2::new(0.0, 0.0));
        airborne.velocity.y = 3.0;
        assert!(!try_jump(&mut airborne, &jump, &t));
        assert_eq!(airborne.velocity.y, 3.0);

        let mut grounded = standing_player();
        assert!(try_jump(&mut grounded, &jump, &t));
        assert_eq!(grounded.velocity.y, -15.0);
        assert!(!grounded.grounded);
    }

    #[test]
    fn test_jump_step_emits_cue_and_rises() {
        let t = PhysicsTuning::default();
        let mut level = ground_level();
        let mut p = standing_player();
        let mut count = 0;

        let events = step(&mut p, &mut level, &mut count, &TickInput { jump: true, ..Default::default() }, &t);
        assert_eq!(events, vec![SimEvent::Jumped]);
        assert!((p.velocity.y - (-14.4)).abs() < 1e-5);
        assert!((p.position.y - 585.6).abs() < 1e-3);
        assert_eq!(p.anim, AnimState::Jump);
        assert!(!p.grounded);

        // Holding jump in the air does nothing more
        let events = step(&mut p, &mut level, &mut count, &TickInput { jump: true, ..Default::default() }, &t);
        assert!(events.is_empty());
        assert!((p.velocity.y - (-13.8)).abs() < 1e-4);
    }

    #[test]
    fn test_airborne_anim_overrides_run() {
        let t = PhysicsTuning::default();
        let mut level = ground_level();
        let mut p = PlayerState::spawn_at(DVec2::new(100.0, 100.0));
        let mut count = 0;
        step(&mut p, &mut level, &mut count, &TickInput { right: true, ..Default::default() }, &t);
        assert_eq!(p.anim, AnimState::Jump);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn test_standing_on_ground_stays_grounded() {
        let t = PhysicsTuning::default();
        let mut level = ground_level();
        let mut p = standing_player();
        let mut count = 0;
        for _ in 0..30 {
            step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
            assert!(p.grounded);
            assert_eq!(p.position.y, 600.0);
            assert_eq!(p.anim, AnimState::Idle);
        }
    }

    #[test]
    fn test_spike_kills_and_freezes() {
        let t = PhysicsTuning::default();
        let spike = Entity::new(Rect::new(120.0, 620.0, 40.0, 30.0), EntityKind::Spike);
        let mut level = level_with(
            vec![Rect::new(0.0, 650.0, 1280.0, 70.0)],
            vec![spike],
            Vec::new(),
            far_portal(),
            0,
        );
        let spike_id = level.hazards[0].id;
        let mut p = standing_player();
        let mut count = 0;

        let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
        assert_eq!(events, vec![SimEvent::Died(DeathCause::Hazard { id: spike_id })]);
        assert!(p.dead);

        let frozen = p.clone();
        for _ in 0..10 {
            let events = step(&mut p, &mut level, &mut count, &TickInput { right: true, jump: true, ..Default::default() }, &t);
            assert!(events.is_empty());
            assert_eq!(p, frozen);
        }
    }

    #[test]
    fn test_death_frame_still_collects_and_enters_portal() {
        let t = PhysicsTuning::default();
        let spike = Entity::new(Rect::new(120.0, 620.0, 40.0, 30.0), EntityKind::Spike);
        let portal = Entity::new(Rect::new(80.0, 550.0, 80.0, 100.0), EntityKind::Portal);
        let mut level = level_with(
            vec![Rect::new(0.0, 650.0, 1280.0, 70.0)],
            vec![spike],
            vec![Rect::new(110.0, 610.0, 30.0, 30.0)],
            portal,
            0,
        );
        let spike_id = level.hazards[0].id;
        let banana_id = level.collectibles[0].id;
        let mut p = standing_player();
        let mut count = 0;

        let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
        assert_eq!(
            events,
            vec![
                SimEvent::Died(DeathCause::Hazard { id: spike_id }),
                SimEvent::Collected { id: banana_id },
                SimEvent::PortalEntered,
            ]
        );
        assert!(p.dead);
        assert_eq!(count, 1);

        // Frozen from the next frame on
        let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
        assert!(events.is_empty());
    }

    #[test]
    fn test_hazard_below_playfield_reports_one_death() {
        let t = PhysicsTuning::default();
        let pit = Entity::new(Rect::new(80.0, 700.0, 80.0, 100.0), EntityKind::Spike);
        let mut level = level_with(Vec::new(), vec![pit], Vec::new(), far_portal(), 0);
        let pit_id = level.hazards[0].id;
        let mut p = PlayerState::spawn_at(DVec2::new(100.0, 719.0));
        p.velocity.y = 5.0;
        let mut count = 0;

        let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
        assert_eq!(events, vec![SimEvent::Died(DeathCause::Hazard { id: pit_id })]);
    }

    #[test]
    fn test_dead_player_freezes_patrols() {
        let t = PhysicsTuning::default();
        let patrol = Entity::new(
            Rect::new(600.0, 300.0, 40.0, 40.0),
            EntityKind::MovingHazard { velocity_x: 3.0, start_x: 600.0, range: 200.0 },
        );
        let mut level = level_with(Vec::new(), vec![patrol], Vec::new(), far_portal(), 0);
        let mut p = PlayerState::spawn_at(DVec2::new(0.0, 0.0));
        p.dead = true;
        let mut count = 0;
        step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
        assert_eq!(level.hazards[0].rect.x, 600.0);
    }

    #[test]
    fn test_patrol_can_walk_into_player() {
        let t = PhysicsTuning::default();
        let patrol = Entity::new(
            Rect::new(58.0, 600.0, 40.0, 40.0),
            EntityKind::MovingHazard { velocity_x: 3.0, start_x: 58.0, range: 200.0 },
        );
        let mut level = level_with(
            vec![Rect::new(0.0, 650.0, 1280.0, 70.0)],
            vec![patrol],
            Vec::new(),
            far_portal(),
            0,
        );
        // Player spans x 100..140; hazard right edge reaches 101 after one frame
        let mut p = standing_player();
        let mut count = 0;
        let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
        assert!(matches!(events.as_slice(), [SimEvent::Died(DeathCause::Hazard { .. })]));
    }

    #[test]
    fn test_fall_out_of_world() {
        let t = PhysicsTuning::default();
        let mut level = level_with(Vec::new(), Vec::new(), Vec::new(), far_portal(), 0);
        let mut p = PlayerState::spawn_at(DVec2::new(100.0, 719.0));
        p.velocity.y = 5.0;
        let mut count = 0;
        let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
        assert_eq!(events, vec![SimEvent::Died(DeathCause::OutOfBounds)]);
        assert!(p.dead);
    }

    #[test]
    fn test_pickup_counts_once() {
        let t = PhysicsTuning::default();
        let mut level = level_with(
            vec![Rect::new(0.0, 650.0, 1280.0, 70.0)],
            Vec::new(),
            vec![Rect::new(110.0, 610.0, 30.0, 30.0)],
            far_portal(),
            1,
        );
        let banana_id = level.collectibles[0].id;
        let mut p = standing_player();
        let mut count = 0;

        let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
        assert_eq!(events, vec![SimEvent::Collected { id: banana_id }]);
        assert_eq!(count, 1);

        for _ in 0..5 {
            let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
            assert!(events.is_empty());
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn test_portal_only_after_quota() {
        let t = PhysicsTuning::default();
        let portal = Entity::new(Rect::new(80.0, 550.0, 80.0, 100.0), EntityKind::Portal);
        let mut level = level_with(
            vec![Rect::new(0.0, 650.0, 1280.0, 70.0)],
            Vec::new(),
            vec![Rect::new(900.0, 610.0, 30.0, 30.0)],
            portal,
            1,
        );
        let mut p = standing_player();
        let mut count = 0;

        for _ in 0..5 {
            let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
            assert!(events.is_empty());
        }

        count = 1;
        let events = step(&mut p, &mut level, &mut count, &TickInput::default(), &t);
        assert_eq!(events, vec![SimEvent::PortalEntered]);
    }

    #[test]
    fn test_patrol_reversal_points() {
        let mut hazard = Entity::new(
            Rect::new(600.0, 300.0, 40.0, 40.0),
            EntityKind::MovingHazard { velocity_x: 3.0, start_x: 600.0, range: 200.0 },
        );
        let velocity = |e: &Entity| match e.kind {
            EntityKind::MovingHazard { velocity_x, .. } => velocity_x,
            _ => unreachable!(),
        };

        let mut flips = 0;
        for _ in 0..1000 {
            let before = velocity(&hazard);
            hazard.patrol();
            let x = hazard.rect.x;
            if velocity(&hazard) != before {
                flips += 1;
                assert!(x > 800.0 || x < 600.0, "reversed inside the band at x={x}");
            } else {
                assert!((600.0..=800.0).contains(&x), "left the band without reversing at x={x}");
            }
        }
        assert!(flips >= 6);
    }

    proptest! {
        #[test]
        fn prop_landing_snaps_to_platform_top(
            plat_x in 0.0f64..800.0,
            plat_y in 100.0f64..600.0,
            plat_w in 50.0f64..400.0,
            plat_h in 10.0f64..100.0,
            offset in 0.0f64..1.0,
            vy0 in 0.0f64..10.0,
            frac in 0.05f64..0.95,
        ) {
            let t = PhysicsTuning::default();
            let mut level = level_with(
                vec![Rect::new(plat_x, plat_y, plat_w, plat_h)],
                Vec::new(),
                Vec::new(),
                far_portal(),
                0,
            );
            let vy_after = vy0 + t.gravity;
            let gap = frac * vy_after;
            let mut p = PlayerState::spawn_at(DVec2::new(
                plat_x + offset * (plat_w - 1.0),
                plat_y - gap - t.player_size.y,
            ));
            p.velocity.y = vy0;
            let mut count = 0;

            step(&mut p, &mut level, &mut count, &TickInput::default(), &t);

            prop_assert!(p.grounded);
            prop_assert_eq!(p.velocity.y, 0.0);
            prop_assert!((p.position.y + p.size.y - plat_y).abs() < 1e-3);
        }

        #[test]
        fn prop_friction_stops_within_bound(vx0 in -6.0f64..=6.0) {
            let t = PhysicsTuning::default();
            let mut p = standing_player();
            p.velocity.x = vx0;

            let mut last = vx0.abs();
            for _ in 0..FRICTION_STOP_FRAMES {
                resolve_horizontal(&mut p, &TickInput::default(), &t);
                prop_assert!(p.velocity.x.abs() <= last);
                last = p.velocity.x.abs();
            }
            prop_assert_eq!(p.velocity.x, 0.0);
            prop_assert_eq!(p.anim, AnimState::Idle);
        }

        #[test]
        fn prop_patrol_stays_near_band(
            start in -500.0f64..1500.0,
            range in 0.0f64..800.0,
            speed in 0.5f64..8.0,
            leftward in any::<bool>(),
            frames in 0usize..3000,
        ) {
            let vx = if leftward { -speed } else { speed };
            let mut hazard = Entity::new(
                Rect::new(start, 0.0, 40.0, 40.0),
                EntityKind::MovingHazard { velocity_x: vx, start_x: start, range },
            );
            for _ in 0..frames {
                hazard.patrol();
                let x = hazard.rect.x;
                prop_assert!(x >= start - speed - 1e-2);
                prop_assert!(x <= start + range + speed + 1e-2);
            }
        }
    }
}
