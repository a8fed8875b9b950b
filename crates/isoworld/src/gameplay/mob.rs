//! # Mob Behavior
//!
//! Mobs run a three-state machine (Idle, Chase, Attack) on a think-tick
//! cadence, then walk their path every tick.
//!
//! ## Think
//!
//! - Peaceful mobs stay Idle and wander when they have nothing to walk.
//! - Hostile mobs first pass an intelligence roll, then pick a state from
//!   the distance to the target: Chase inside vision, Attack inside striking
//!   range, Idle otherwise. Chase and Attack repath at most once per replan
//!   interval.
//!
//! ## Move
//!
//! Mobs walk straight at the head waypoint at state-scaled speed and pop it
//! once within the arrival epsilon. Facing follows the direction of travel.

use isoworld_procedural::{Mob, MobState, Path, TilePos};
use rand::Rng;

use super::facing::facing_from_delta;
use super::pathfinder::{Pathfinder, Walkability};
use crate::config::AiConfig;

/// Everything a mob consults while thinking.
pub struct ThinkContext<'a, W: Walkability + ?Sized> {
    /// Walkability snapshot for path queries.
    pub walk: &'a W,
    /// Search used for wander and chase paths.
    pub pathfinder: &'a Pathfinder,
    /// AI tuning.
    pub config: &'a AiConfig,
    /// Current simulated time.
    pub now_ms: u64,
    /// Absolute position of the tracked target, if any.
    pub target: Option<(f32, f32)>,
}

/// State a hostile mob picks for a target at `distance`.
#[must_use]
pub fn hostile_state(distance: f32, vision: f32, attack_range: f32) -> MobState {
    if distance > attack_range && distance <= vision {
        MobState::Chase
    } else if distance > 0.0 && distance <= attack_range {
        MobState::Attack
    } else {
        MobState::Idle
    }
}

fn transition(mob: &mut Mob, next: MobState) {
    if mob.state != next {
        tracing::trace!("{:?}: {:?} -> {:?}", mob.species, mob.state, next);
        mob.state = next;
    }
}

/// Installs `path`, dropping its head when it is the tile the mob stands on.
fn adopt_path(mob: &mut Mob, mut path: Path, here: TilePos) {
    if path.head() == Some(here) {
        path.pop_head();
    }
    mob.path = path;
}

/// Picks a random reachable tile within vision and walks toward it.
///
/// Gives up for this think-tick after the configured number of attempts.
fn wander<W>(mob: &mut Mob, here: TilePos, ctx: &ThinkContext<'_, W>)
where
    W: Walkability + ?Sized,
{
    #[allow(clippy::cast_possible_truncation)]
    let radius = (mob.vision.max(1.0)) as i32;
    for _ in 0..ctx.config.wander_attempts {
        let goal = TilePos::new(
            here.x + mob.rng.gen_range(-radius..=radius),
            here.y + mob.rng.gen_range(-radius..=radius),
        );
        if goal == here || !ctx.walk.is_walkable(goal) {
            continue;
        }
        let path = ctx.pathfinder.find_path(ctx.walk, here, goal);
        if !path.is_empty() {
            adopt_path(mob, path, here);
            return;
        }
    }
}

/// Runs one think-tick if the mob's think cooldown allows it.
///
/// # Returns
///
/// `true` if the mob thought this call.
pub fn think<W>(mob: &mut Mob, position: (f32, f32), ctx: &ThinkContext<'_, W>) -> bool
where
    W: Walkability + ?Sized,
{
    if !mob.think.try_fire(ctx.now_ms, ctx.config.think_interval_ms) {
        return false;
    }
    let here = TilePos::containing(position.0, position.1);

    if mob.peaceful {
        transition(mob, MobState::Idle);
        if mob.path.is_empty() {
            wander(mob, here, ctx);
        }
        return true;
    }

    // Missed perception: keep doing whatever it was doing.
    if mob.rng.gen::<f32>() >= mob.intelligence {
        return true;
    }

    let next = match ctx.target {
        Some((tx, ty)) => {
            let distance = (tx - position.0).hypot(ty - position.1);
            hostile_state(distance, mob.vision, ctx.config.attack_range)
        }
        None => MobState::Idle,
    };
    transition(mob, next);

    match (next, ctx.target) {
        (MobState::Chase | MobState::Attack, Some((tx, ty))) => {
            if mob.replan.try_fire(ctx.now_ms, ctx.config.replan_interval_ms) {
                let goal = TilePos::containing(tx, ty);
                let path = ctx.pathfinder.find_path(ctx.walk, here, goal);
                // Target out of reach for now: keep closing in on its last route.
                if !path.is_empty() {
                    adopt_path(mob, path, here);
                }
            }
        }
        _ => {
            if mob.path.is_empty() {
                wander(mob, here, ctx);
            }
        }
    }
    true
}

/// Speed factor of a state.
#[must_use]
pub fn speed_multiplier(state: MobState, config: &AiConfig) -> f32 {
    match state {
        MobState::Idle => 1.0,
        MobState::Chase => config.chase_speed_multiplier,
        MobState::Attack => config.attack_speed_multiplier,
    }
}

/// Walks toward the head waypoint for `dt_ms`.
///
/// # Returns
///
/// The new absolute position. Unchanged if the path is empty or the head
/// waypoint was already reached, in which case it is popped.
#[allow(clippy::cast_precision_loss)]
pub fn advance(mob: &mut Mob, position: (f32, f32), dt_ms: u32, config: &AiConfig) -> (f32, f32) {
    let Some(waypoint) = mob.path.head() else {
        return position;
    };
    let (x, y) = position;
    let (dx, dy) = (waypoint.x as f32 - x, waypoint.y as f32 - y);
    let distance = dx.hypot(dy);
    if distance < config.waypoint_epsilon {
        mob.path.pop_head();
        return position;
    }

    let speed = mob.speed * speed_multiplier(mob.state, config);
    let step = (speed * dt_ms as f32 / 1000.0).min(distance);
    let (ux, uy) = (dx / distance, dy / distance);
    if let Some(facing) = facing_from_delta(ux, uy) {
        mob.facing = facing;
    }

    let moved = (x + ux * step, y + uy * step);
    if (distance - step) < config.waypoint_epsilon {
        mob.path.pop_head();
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoworld_procedural::{Facing, MobSpecies};

    use crate::config::PathfinderConfig;

    fn open(_: TilePos) -> bool {
        true
    }

    static OPEN: fn(TilePos) -> bool = open;

    fn ctx<'a>(
        pathfinder: &'a Pathfinder,
        config: &'a AiConfig,
        now_ms: u64,
        target: Option<(f32, f32)>,
    ) -> ThinkContext<'a, fn(TilePos) -> bool> {
        ThinkContext {
            walk: &OPEN,
            pathfinder,
            config,
            now_ms,
            target,
        }
    }

    fn sharp_zombie() -> Mob {
        let mut mob = Mob::new(MobSpecies::Zombie, 7);
        mob.intelligence = 1.0;
        mob
    }

    #[test]
    fn test_hostile_state_ranges() {
        assert_eq!(hostile_state(10.0, 20.0, 2.0), MobState::Chase);
        assert_eq!(hostile_state(20.0, 20.0, 2.0), MobState::Chase);
        assert_eq!(hostile_state(1.5, 20.0, 2.0), MobState::Attack);
        assert_eq!(hostile_state(2.0, 20.0, 2.0), MobState::Attack);
        assert_eq!(hostile_state(0.0, 20.0, 2.0), MobState::Idle);
        assert_eq!(hostile_state(25.0, 20.0, 2.0), MobState::Idle);
    }

    #[test]
    fn test_chase_within_vision() {
        let pathfinder = Pathfinder::new(&PathfinderConfig::default());
        let config = AiConfig::default();
        let mut mob = sharp_zombie();

        assert!(think(&mut mob, (0.0, 0.0), &ctx(&pathfinder, &config, 0, Some((10.0, 0.0)))));
        assert_eq!(mob.state, MobState::Chase);
        assert_eq!(mob.path.goal(), Some(TilePos::new(10, 0)));
        assert_ne!(mob.path.head(), Some(TilePos::new(0, 0)));
    }

    #[test]
    fn test_attack_within_range() {
        let pathfinder = Pathfinder::default();
        let config = AiConfig::default();
        let mut mob = sharp_zombie();
        think(&mut mob, (0.0, 0.0), &ctx(&pathfinder, &config, 0, Some((1.0, 1.0))));
        assert_eq!(mob.state, MobState::Attack);
    }

    #[test]
    fn test_think_cadence() {
        let pathfinder = Pathfinder::default();
        let config = AiConfig::default();
        let mut mob = sharp_zombie();
        assert!(think(&mut mob, (0.0, 0.0), &ctx(&pathfinder, &config, 0, None)));
        assert!(!think(&mut mob, (0.0, 0.0), &ctx(&pathfinder, &config, 499, None)));
        assert!(think(&mut mob, (0.0, 0.0), &ctx(&pathfinder, &config, 500, None)));
    }

    #[test]
    fn test_replan_throttle() {
        let pathfinder = Pathfinder::default();
        let config = AiConfig::default();
        let mut mob = sharp_zombie();

        think(&mut mob, (0.0, 0.0), &ctx(&pathfinder, &config, 0, Some((10.0, 0.0))));
        let first = mob.path.goal();

        // Target moved, but the replan interval has not elapsed yet.
        think(&mut mob, (0.0, 0.0), &ctx(&pathfinder, &config, 500, Some((0.0, 10.0))));
        assert_eq!(mob.path.goal(), first);

        think(&mut mob, (0.0, 0.0), &ctx(&pathfinder, &config, 1000, Some((0.0, 10.0))));
        assert_eq!(mob.path.goal(), Some(TilePos::new(0, 10)));
    }

    #[test]
    fn test_peaceful_mob_wanders() {
        let pathfinder = Pathfinder::default();
        let config = AiConfig::default();
        let mut fish = Mob::new(MobSpecies::Fish, 3);

        think(&mut fish, (5.0, 5.0), &ctx(&pathfinder, &config, 0, Some((6.0, 5.0))));
        assert_eq!(fish.state, MobState::Idle);
        assert!(!fish.path.is_empty());
        let goal = fish.path.goal().unwrap();
        assert!((goal.x - 5).abs() <= 20 && (goal.y - 5).abs() <= 20);
    }

    #[test]
    fn test_wander_gives_up_when_boxed_in() {
        let pathfinder = Pathfinder::new(&PathfinderConfig { max_explored_nodes: 32 });
        let config = AiConfig::default();
        let mut fish = Mob::new(MobSpecies::Fish, 3);
        let only_here = |t: TilePos| t == TilePos::new(0, 0);
        let ctx = ThinkContext {
            walk: &only_here,
            pathfinder: &pathfinder,
            config: &config,
            now_ms: 0,
            target: None,
        };
        assert!(think(&mut fish, (0.0, 0.0), &ctx));
        assert!(fish.path.is_empty());
    }

    #[test]
    fn test_failed_replan_keeps_route() {
        let pathfinder = Pathfinder::default();
        let config = AiConfig::default();
        let mut mob = sharp_zombie();
        think(&mut mob, (0.0, 0.0), &ctx(&pathfinder, &config, 0, Some((10.0, 0.0))));
        let route: Vec<TilePos> = mob.path.iter().copied().collect();
        assert!(!route.is_empty());

        // Target stepped onto a tile that cannot be reached.
        let walled = |t: TilePos| t != TilePos::new(0, 10);
        let blocked = ThinkContext {
            walk: &walled,
            pathfinder: &pathfinder,
            config: &config,
            now_ms: 1000,
            target: Some((0.0, 10.0)),
        };
        assert!(think(&mut mob, (0.0, 0.0), &blocked));
        assert_eq!(mob.state, MobState::Chase);
        assert_eq!(mob.path.iter().copied().collect::<Vec<_>>(), route);
    }

    #[test]
    fn test_advance_moves_and_pops() {
        let config = AiConfig::default();
        let mut mob = Mob::new(MobSpecies::Zombie, 1);
        mob.path = vec![TilePos::new(2, 0)].into();

        let position = advance(&mut mob, (0.0, 0.0), 500, &config);
        assert!((position.0 - 1.5).abs() < 1e-5 && position.1.abs() < 1e-5);
        assert_eq!(mob.facing, Facing::Right);
        assert_eq!(mob.path.len(), 1);

        let position = advance(&mut mob, position, 500, &config);
        assert!((position.0 - 2.0).abs() < 1e-5, "step is capped at the waypoint");
        assert!(mob.path.is_empty());
    }

    #[test]
    fn test_advance_without_path_is_noop() {
        let config = AiConfig::default();
        let mut mob = Mob::new(MobSpecies::Spider, 1);
        assert_eq!(advance(&mut mob, (3.5, 4.5), 1000, &config), (3.5, 4.5));
    }

    #[test]
    fn test_chase_is_faster() {
        let config = AiConfig::default();
        let mut mob = Mob::new(MobSpecies::Zombie, 1);
        mob.state = MobState::Chase;
        mob.path = vec![TilePos::new(0, 100)].into();
        let (_, y) = advance(&mut mob, (0.0, 0.0), 1000, &config);
        assert!((y - 4.5).abs() < 1e-4);
    }
}
