//! Headless demo: an autopilot player tries to collect every item while the
//! monster hunts it.
//!
//! Usage: `backrooms [level.obj] [config.ron|config.json]`
//!
//! Debug lines are logged once per second when the config sets
//! `monster.debug`.

use std::error::Error;
use std::process::ExitCode;
use std::time::Instant;

use backrooms::game::CollectibleManager;
use backrooms::prelude::*;

/// Hard stop for the simulation, in seconds
const MAX_SECONDS: u32 = 180;

/// Demo level used when no OBJ can be loaded
fn demo_level() -> LevelMesh {
    let mut mesh = LevelMesh::new();
    mesh.add_floor(10.0, 0.0);
    mesh.add_wall(Vec2::new(-3.0, 3.0), Vec2::new(3.0, 3.0), 0.0, 3.0);
    mesh.add_wall(Vec2::new(3.0, -3.0), Vec2::new(3.0, -1.0), 0.0, 3.0);
    mesh.add_wall(Vec2::new(-9.0, -2.5), Vec2::new(-6.0, -2.5), 0.0, 3.0);
    mesh.add_box(Vec3::new(-3.0, 0.0, -4.0), Vec3::new(-2.0, 2.5, -3.0));
    mesh.add_box(Vec3::new(6.0, 0.0, 3.0), Vec3::new(7.0, 2.5, 4.0));
    mesh
}

fn load_level(config: &GameConfig) -> LevelMesh {
    let Some(path) = &config.level_path else {
        log::info!("No level given, using the demo level");
        return demo_level();
    };
    match load_obj(path) {
        Ok(mesh) => mesh,
        Err(e) => {
            log::warn!("Failed to load {}: {e}; using the demo level", path.display());
            demo_level()
        }
    }
}

/// Steer toward the nearest item
fn autopilot(player: &Player, items: &CollectibleManager) -> PlayerInput {
    let Some(item) = items.nearest_uncollected(player.position()) else {
        return PlayerInput::none();
    };
    let to_item = item.position - player.position();
    let bearing = to_item.y.atan2(to_item.x).to_degrees();
    let error = (bearing - player.theta() + 180.0).rem_euclid(360.0) - 180.0;
    let turn_step = player.config().rotation_speed;

    let mut input = PlayerInput::none();
    if error > turn_step {
        input = input.with(InputAction::TurnRight);
    } else if error < -turn_step {
        input = input.with(InputAction::TurnLeft);
    }
    if error.abs() < 45.0 {
        input = input.with(InputAction::MoveForward);
    }
    input
}

fn run() -> Result<GameState, Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let level_arg = args.next();
    let mut config = match args.next() {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(level) = level_arg {
        config = config.with_level(level);
    }

    let mesh = load_level(&config);
    let world = CollisionWorld::from_mesh(&mesh);
    let dt = config.tick_seconds();
    let tick_rate = config.tick_rate.max(1);
    let mut debug = DebugInfo::new();
    debug.enabled = config.monster.debug;
    let mut session = GameSession::new(world, config);

    for tick in 1..=(MAX_SECONDS * tick_rate) {
        let now = f64::from(tick) * f64::from(dt);
        let input = autopilot(session.player(), session.collectibles());

        let started = Instant::now();
        let state = session.tick(&input, dt, now);
        debug.record_tick(started.elapsed());

        for event in session.events_mut().drain() {
            log::debug!("Event: {event:?}");
        }

        if debug.enabled && tick % tick_rate == 0 {
            let items = session.collectibles();
            debug.set_monster(session.monster().debug_info());
            debug.clear_lines();
            debug.add_line(format!(
                "Items: {}/{}",
                items.collected_count(),
                items.items().len()
            ));
            for line in debug.get_all_lines() {
                log::info!("{line}");
            }
        }

        if state != GameState::Playing {
            session.events_mut().swap();
            for event in session.events_mut().drain() {
                log::debug!("Event: {event:?}");
            }
            log::info!("Finished after {now:.1}s: {state}");
            return Ok(state);
        }
    }

    log::info!("Time limit reached");
    Ok(session.state())
}

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(GameState::Won) => {
            println!("The player escaped.");
            ExitCode::SUCCESS
        }
        Ok(GameState::GameOver) => {
            println!("The monster caught the player.");
            ExitCode::SUCCESS
        }
        Ok(GameState::Playing) => {
            println!("Nobody won.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
