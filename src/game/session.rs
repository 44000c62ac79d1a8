//! One round of the game: the player collects items while the monster hunts

use std::fmt;

use glam::Vec3;

use crate::ai::{AiContext, Monster, MonsterState, MonsterTick};
use crate::core::{EventQueue, GameConfig, GameEvent};
use crate::physics::CollisionWorld;

use super::collectible::CollectibleManager;
use super::player::{Player, PlayerInput};

/// Top-level game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Playing,
    /// The monster caught the player
    GameOver,
    /// Every item was collected
    Won,
}

impl GameState {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::GameOver => "game_over",
            Self::Won => "won",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The game session
///
/// Owns the level, the actors and the event queue. Events pushed during a
/// tick become readable after the swap at the start of the following tick.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    world: CollisionWorld,
    player: Player,
    monster: Monster,
    collectibles: CollectibleManager,
    events: EventQueue,
    state: GameState,
    last_monster_tick: MonsterTick,
}

impl GameSession {
    /// Start a session on `world`
    #[must_use]
    pub fn new(world: CollisionWorld, config: GameConfig) -> Self {
        let player = Player::new(config.player.clone());
        let monster = Monster::new(config.monster_spawn, config.monster.clone());
        let collectibles = CollectibleManager::new(config.collectibles.clone());
        let last_monster_tick = idle_tick(&monster);

        log::info!(
            "Session started: {} faces, collect {} items",
            world.len(),
            collectibles.items().len()
        );

        Self {
            config,
            world,
            player,
            monster,
            collectibles,
            events: EventQueue::new(),
            state: GameState::Playing,
            last_monster_tick,
        }
    }

    /// Advance the session by one tick.
    ///
    /// While playing: player input, collectibles, then the monster. Once over,
    /// only a restart request does anything.
    pub fn tick(&mut self, input: &PlayerInput, delta_time: f32, now: f64) -> GameState {
        self.events.swap();

        if self.state != GameState::Playing {
            if input.restart {
                self.restart();
            }
            return self.state;
        }

        self.player.update(input, delta_time, &self.world);
        let player = self.player.position();

        for id in self.collectibles.update(now, delta_time, player) {
            let remaining = self.collectibles.remaining();
            log::info!("Collected item {id}, {remaining} remaining");
            self.events.push(GameEvent::ItemCollected { id, remaining });
        }
        if self.collectibles.all_collected() {
            self.events.push(GameEvent::GameWon);
            self.set_state(GameState::Won);
            return self.state;
        }

        let before = self.monster.state();
        let tick = self.monster.update(&AiContext {
            world: &self.world,
            player,
            delta_time,
            now,
        });
        self.last_monster_tick = tick;

        if tick.state != before {
            self.events.push(GameEvent::MonsterStateChanged {
                from: before,
                to: tick.state,
                position: tick.position,
            });
        }
        if tick.caught {
            self.events.push(GameEvent::PlayerCaught {
                position: tick.position,
            });
            self.set_state(GameState::GameOver);
        }

        self.state
    }

    /// Reset every actor and start a new round
    pub fn restart(&mut self) {
        self.player.reset();
        self.monster.reset(self.config.monster_spawn);
        self.collectibles.reset();
        self.last_monster_tick = idle_tick(&self.monster);
        self.events.push(GameEvent::GameRestarted);
        self.set_state(GameState::Playing);
    }

    fn set_state(&mut self, state: GameState) {
        if self.state == state {
            return;
        }
        log::info!("Game state: {} -> {}", self.state, state);
        self.state = state;
        self.events.push(GameEvent::StateChanged {
            state: state.name(),
        });
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// Monster position for rendering
    #[must_use]
    pub fn monster_position(&self) -> Vec3 {
        self.last_monster_tick.position
    }

    /// Monster facing angle for rendering
    #[must_use]
    pub fn monster_yaw(&self) -> f32 {
        self.last_monster_tick.yaw
    }

    #[must_use]
    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[must_use]
    pub fn monster(&self) -> &Monster {
        &self.monster
    }

    #[must_use]
    pub fn collectibles(&self) -> &CollectibleManager {
        &self.collectibles
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Events from the previous tick
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }
}

fn idle_tick(monster: &Monster) -> MonsterTick {
    MonsterTick {
        position: monster.world_position(),
        yaw: monster.yaw(),
        state: monster.state(),
        caught: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MonsterConfig;
    use crate::game::{CollectibleConfig, InputAction, PlayerConfig};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    /// Drives a session with a fixed tick clock
    struct Clock {
        now: f64,
    }

    impl Clock {
        fn tick(&mut self, session: &mut GameSession, input: &PlayerInput) -> GameState {
            self.now += f64::from(DT);
            session.tick(input, DT, self.now)
        }
    }

    fn drain(session: &mut GameSession) -> Vec<GameEvent> {
        session.events_mut().swap();
        session.events_mut().drain().collect()
    }

    #[test]
    fn test_caught_emits_events() {
        let config = GameConfig::default()
            .with_monster_spawn(Vec2::new(-8.5, -9.0))
            .with_player(PlayerConfig::default().with_spawn(Vec2::new(-9.0, -9.0)))
            .with_collectibles(CollectibleConfig::default().with_count(1).with_seed(5));
        let mut session = GameSession::new(CollisionWorld::empty(), config);
        let mut clock = Clock { now: 0.0 };

        let state = clock.tick(&mut session, &PlayerInput::none());
        assert_eq!(state, GameState::GameOver);

        let events = drain(&mut session);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerCaught { .. })));
        assert!(events.contains(&GameEvent::StateChanged { state: "game_over" }));

        // Movement is ignored once the game is over
        let forward = PlayerInput::from_actions(&[InputAction::MoveForward]);
        clock.tick(&mut session, &forward);
        assert_eq!(session.player().position(), Vec2::new(-9.0, -9.0));

        // Restart puts everything back
        let restart = PlayerInput::none().with(InputAction::Restart);
        assert_eq!(clock.tick(&mut session, &restart), GameState::Playing);
        assert_eq!(session.monster().position(), Vec2::new(-8.5, -9.0));
        assert_eq!(session.monster().state(), MonsterState::Patrol);
        assert_eq!(session.collectibles().collected_count(), 0);
        let events = drain(&mut session);
        assert!(events.contains(&GameEvent::GameRestarted));
    }

    #[test]
    fn test_collecting_everything_wins() {
        let config = GameConfig::default()
            .with_monster_spawn(Vec2::new(-8.0, 8.0))
            .with_collectibles(CollectibleConfig::default().with_count(1).with_seed(9));
        let mut session = GameSession::new(CollisionWorld::empty(), config);
        let mut clock = Clock { now: 0.0 };

        // Teleport the player onto the only item
        let item = session.collectibles().items()[0].position;
        session.player.try_move(item, &CollisionWorld::empty());

        let state = clock.tick(&mut session, &PlayerInput::none());

        assert_eq!(state, GameState::Won);
        let events = drain(&mut session);
        assert!(events.contains(&GameEvent::ItemCollected { id: 0, remaining: 0 }));
        assert!(events.contains(&GameEvent::GameWon));
    }

    #[test]
    fn test_monster_transitions_are_reported() {
        let config = GameConfig::default()
            .with_monster_spawn(Vec2::new(-5.0, -9.0))
            .with_player(PlayerConfig::default().with_spawn(Vec2::new(-9.0, -9.0)))
            .with_collectibles(CollectibleConfig::default().with_count(1).with_seed(2));
        let mut session = GameSession::new(CollisionWorld::empty(), config);
        let mut clock = Clock { now: 0.0 };

        clock.tick(&mut session, &PlayerInput::none());
        let events = drain(&mut session);

        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::MonsterStateChanged {
                from: MonsterState::Patrol,
                ..
            }
        )));
        assert_eq!(session.state(), GameState::Playing);
    }

    #[test]
    fn test_idle_monster_reports_nothing() {
        let config = GameConfig::default()
            .with_monster_spawn(Vec2::new(6.0, 6.0))
            .with_monster(MonsterConfig::default().with_patrol_points(vec![Vec2::new(6.0, 6.0)]))
            .with_player(PlayerConfig::default().with_spawn(Vec2::new(-9.0, -9.0)))
            .with_collectibles(CollectibleConfig::default().with_count(1).with_seed(2));
        let mut session = GameSession::new(CollisionWorld::empty(), config);
        let mut clock = Clock { now: 0.0 };

        clock.tick(&mut session, &PlayerInput::none());
        let events = drain(&mut session);

        // Out of sight range and already at its only patrol point
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::MonsterStateChanged { .. }))
        );
        assert_eq!(session.monster_position(), Vec3::new(6.0, 0.7, 6.0));
        assert_eq!(session.monster_yaw(), 0.0);
    }
}
