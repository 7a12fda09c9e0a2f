//! Fixed-step game loop wiring the world to its systems.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use anyhow::{Context, Result};
use sneaky_doctor_core::{Command, Event, GameConfig, GameStats, Key, MoveIntent};
use sneaky_doctor_level::LevelLoader;
use sneaky_doctor_rendering::Scene;
use sneaky_doctor_system_arbiter::{Arbiter, ArbiterView};
use sneaky_doctor_system_movement::Movement;
use sneaky_doctor_system_session::{Session, Transition};
use sneaky_doctor_world::{self as world, query, World};
use tracing::{debug, info};

/// One running game: the current level's world plus the systems acting on it.
#[derive(Debug)]
pub(crate) struct Simulation {
    loader: LevelLoader,
    config: GameConfig,
    world: World,
    movement: Movement,
    arbiter: Arbiter,
    session: Session,
    events: Vec<Event>,
    journal: DefaultHasher,
    ticks: u64,
}

impl Simulation {
    /// Loads the level named by `stats` and prepares the systems.
    pub(crate) fn start(loader: LevelLoader, config: GameConfig, stats: GameStats) -> Result<Self> {
        let world = build_world(&loader, &config, &stats)?;
        Ok(Self {
            movement: Movement::new(&config),
            arbiter: Arbiter,
            session: Session::new(&config, stats),
            loader,
            config,
            world,
            events: Vec::new(),
            journal: DefaultHasher::new(),
            ticks: 0,
        })
    }

    /// Advances the game by one tick with `keys` held.
    ///
    /// Each tick advances the clock, moves the player and the enemies,
    /// resolves contacts and finally lets the session react. A level
    /// transition discards the world and loads the next one.
    pub(crate) fn step(&mut self, keys: &[Key]) -> Result<Transition> {
        if self.session.is_completed() {
            return Ok(Transition::Completed);
        }

        self.events.clear();
        world::apply(&mut self.world, Command::Tick, &mut self.events);

        let mut commands = Vec::new();
        {
            let player = query::player(&self.world);
            let enemies = query::enemy_view(&self.world);
            self.movement.handle(
                &self.events,
                MoveIntent::from_pressed_keys(keys),
                &player,
                &enemies,
                query::wall_rects(&self.world),
                &mut commands,
            );
        }
        self.apply_commands(&mut commands);

        {
            let player = query::player(&self.world);
            let enemies = query::enemy_view(&self.world);
            let masks = query::mask_view(&self.world);
            self.arbiter.handle(
                &self.events,
                ArbiterView {
                    player: &player,
                    enemies: &enemies,
                    masks: &masks,
                    exit: query::exit(&self.world).rect(),
                    mask_count: query::mask_count(&self.world),
                },
                &mut commands,
            );
        }
        self.apply_commands(&mut commands);

        self.ticks += 1;
        self.events.hash(&mut self.journal);

        let transition = self.session.handle(&self.events);
        match transition {
            Transition::Restart { level } | Transition::Advance { level } => {
                debug!(level, tick = self.ticks, "rebuilding_world");
                self.world = build_world(&self.loader, &self.config, self.session.stats())?;
            }
            Transition::Completed => {
                info!(ticks = self.ticks, "session_completed");
            }
            Transition::Continue => {}
        }
        Ok(transition)
    }

    fn apply_commands(&mut self, commands: &mut Vec<Command>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    /// Drawable snapshot of the current level.
    pub(crate) fn scene(&self) -> Scene {
        Scene::from_world(&self.world, self.session.stats())
    }

    pub(crate) fn stats(&self) -> &GameStats {
        self.session.stats()
    }

    pub(crate) fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Hash over every event emitted so far, used to compare replays.
    pub(crate) fn fingerprint(&self) -> u64 {
        self.journal.finish()
    }
}

fn build_world(loader: &LevelLoader, config: &GameConfig, stats: &GameStats) -> Result<World> {
    let level = stats.current_level;
    let assets = loader
        .load(level)
        .with_context(|| format!("failed to load level {level}"))?;
    Ok(World::new(config, assets, stats))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn start(root: &std::path::Path, config: GameConfig) -> Simulation {
        let loader = LevelLoader::new(root, &config);
        Simulation::start(loader, config, GameStats::new_game()).expect("simulation starts")
    }

    fn run(simulation: &mut Simulation, keys: &[Key], ticks: u64) -> Vec<Transition> {
        (0..ticks)
            .map(|_| simulation.step(keys).expect("step succeeds"))
            .filter(|transition| *transition != Transition::Continue)
            .collect()
    }

    #[test]
    fn walking_into_the_exit_advances_with_the_mask() {
        let root = tempfile::tempdir().expect("temp dir");
        fixtures::corridor(root.path(), 1);
        fixtures::corridor(root.path(), 2);
        let mut simulation = start(root.path(), GameConfig::default());

        assert!(run(&mut simulation, &[Key::Right], 23).is_empty());
        assert_eq!(
            run(&mut simulation, &[Key::Right], 1),
            vec![Transition::Advance { level: 2 }]
        );
        assert_eq!(
            simulation.stats(),
            &GameStats {
                current_level: 2,
                mask_count: 1,
                deaths: 0,
            }
        );
        assert_eq!(simulation.scene().level, 2);
    }

    #[test]
    fn clearing_the_last_level_completes() {
        let root = tempfile::tempdir().expect("temp dir");
        fixtures::corridor(root.path(), 1);
        let config = GameConfig {
            level_count: 1,
            ..GameConfig::default()
        };
        let mut simulation = start(root.path(), config);

        assert_eq!(
            run(&mut simulation, &[Key::Right], 30),
            vec![Transition::Completed; 7]
        );
        assert_eq!(simulation.ticks(), 24);
        assert_eq!(simulation.stats().current_level, 1);
    }

    #[test]
    fn caught_player_restarts_the_level() {
        let root = tempfile::tempdir().expect("temp dir");
        fixtures::corridor(root.path(), 1);
        fixtures::guard(root.path(), 1);
        let mut simulation = start(root.path(), GameConfig::default());

        let transitions = run(&mut simulation, &[], 100);

        assert_eq!(transitions, vec![Transition::Restart { level: 1 }]);
        assert_eq!(
            simulation.stats(),
            &GameStats {
                current_level: 1,
                mask_count: 0,
                deaths: 1,
            }
        );
    }

    #[test]
    fn replays_are_deterministic() {
        let root = tempfile::tempdir().expect("temp dir");
        fixtures::corridor(root.path(), 1);
        fixtures::guard(root.path(), 1);
        fixtures::corridor(root.path(), 2);

        let replay = || {
            let mut simulation = start(root.path(), GameConfig::default());
            for tick in 0..150 {
                let keys: &[Key] = if tick % 3 == 0 {
                    &[Key::Right, Key::Down]
                } else {
                    &[Key::Up]
                };
                let _ = simulation.step(keys).expect("step succeeds");
            }
            (simulation.fingerprint(), simulation.stats().clone())
        };

        assert_eq!(replay(), replay());
    }

    #[test]
    fn missing_level_is_reported_with_context() {
        let root = tempfile::tempdir().expect("temp dir");
        let config = GameConfig::default();
        let loader = LevelLoader::new(root.path(), &config);

        let error = Simulation::start(loader, config, GameStats::new_game())
            .expect_err("nothing to load");

        assert_eq!(error.to_string(), "failed to load level 1");
    }
}
