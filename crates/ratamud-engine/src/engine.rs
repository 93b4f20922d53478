use std::sync::Arc;

use ratamud_core::{GameWorld, MapLoader, Person, PersonInfo, StringBox};
use serde::Serialize;

use crate::clock::GameClock;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::interpreter::{
    Context, Interpreter, RunState, STATUS_NORMAL, STATUS_RESTING, Signal, status_line,
};
use crate::output::{OutputCategory, OutputRouter, OutputSink};

/// Snapshot returned by [`GameEngine::state`]: the player's info with the
/// current map name alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineState {
    /// The player's public state.
    #[serde(flatten)]
    pub player: PersonInfo,
    /// Name of the loaded map, if any.
    pub current_map: Option<String>,
}

/// One player, their world, an interpreter and an output router.
///
/// Engines share nothing mutable with each other; two engines can be driven
/// from different threads. Dropping an engine drops its player, its world and
/// every callback registered on it.
#[derive(Debug)]
pub struct GameEngine {
    player: Person,
    world: GameWorld,
    interpreter: Interpreter,
    output: OutputRouter,
    clock: GameClock,
    regen_per_minute: i32,
}

impl GameEngine {
    /// Create an engine for a new player named `player_name`, using the
    /// loader the configuration describes.
    pub fn new(player_name: &str, config: &EngineConfig) -> EngineResult<Self> {
        Self::with_loader(player_name, config, config.map_loader())
    }

    /// Create an engine that resolves maps through `loader`.
    ///
    /// If the configured start map cannot be loaded the engine still starts,
    /// with no map and a LOG event saying why. A start position outside the
    /// start map is replaced by the map's spawn point.
    pub fn with_loader(
        player_name: &str,
        config: &EngineConfig,
        loader: Arc<dyn MapLoader>,
    ) -> EngineResult<Self> {
        let mut player = Person::new(player_name, config.default_description.as_str())?;
        player.hp = config.initial_hp;
        player.max_hp = config.max_hp;
        player.position = config.start_position;

        let mut world = GameWorld::new(&player, loader);
        let mut output = OutputRouter::new(config.output_buffer_limit);

        if let Some(start) = config.start_map.as_deref() {
            match world.load_map(start) {
                Ok(map) => {
                    if !map.contains(player.position) {
                        player.position = map.spawn_point();
                    }
                }
                Err(err) => {
                    output.emit(
                        OutputCategory::Log,
                        &format!("start map '{start}' unavailable: {err}"),
                    );
                }
            }
        }

        log::debug!("engine created for \"{}\"", player.name());
        Ok(Self {
            player,
            world,
            interpreter: Interpreter::new(),
            output,
            clock: GameClock::new(config.ms_per_game_minute),
            regen_per_minute: config.regen_per_minute,
        })
    }

    /// Feed one line of input to the interpreter.
    pub fn input(&mut self, text: &str) -> EngineResult<Signal> {
        let mut ctx = Context {
            player: &mut self.player,
            world: &mut self.world,
            output: &mut self.output,
        };
        self.interpreter.process(&mut ctx, text)
    }

    /// Advance time by `delta_ms` real milliseconds. Zero is a no-op tick.
    ///
    /// Resting players regain hit points for every in-game minute that
    /// completes and get up once fully healed. Each new in-game hour emits
    /// a STATUS event with the time. Once stopped, nothing advances and
    /// [`Signal::Stop`] is returned.
    pub fn update(&mut self, delta_ms: u64) -> Signal {
        if self.interpreter.is_stopped() {
            return Signal::Stop;
        }

        let hour_before = self.clock.hour_stamp();
        let minutes = self.clock.advance(delta_ms);

        if minutes > 0 && self.player.status == STATUS_RESTING {
            self.regenerate(minutes);
        }
        if self.clock.hour_stamp() != hour_before {
            let stamp = self.clock.to_string();
            self.output.emit(OutputCategory::Status, &stamp);
        }
        Signal::Continue
    }

    fn regenerate(&mut self, minutes: u64) {
        let hp = self.player.hp();
        let max = self.player.max_hp;
        if hp < max {
            let minutes = i64::try_from(minutes).unwrap_or(i64::MAX);
            let gain = i64::from(self.regen_per_minute).saturating_mul(minutes);
            let healed = i64::from(hp)
                .saturating_add(gain)
                .clamp(i64::from(hp), i64::from(max));
            // Clamped between two i32 values.
            self.player.set_hp(healed as i32);
            let line = status_line(&self.player);
            self.output.emit(OutputCategory::Status, &line);
        }
        if self.player.hp() >= max {
            self.player.status = STATUS_NORMAL.to_string();
            self.output
                .emit(OutputCategory::Main, "You feel rested and get up.");
        }
    }

    /// Take every buffered event in MAIN, LOG, STATUS, SIDE order.
    pub fn output(&mut self) -> StringBox {
        self.output.drain_all()
    }

    /// Take one category's buffered events, or `None` if it has none.
    pub fn drain(&mut self, category: OutputCategory) -> Option<StringBox> {
        self.output.drain(category)
    }

    /// The engine's output router.
    pub fn router(&self) -> &OutputRouter {
        &self.output
    }

    /// Push a category's events to `sink` instead of buffering them.
    pub fn register_sink(&mut self, category: OutputCategory, sink: Box<dyn OutputSink>) {
        self.output.register(category, sink);
    }

    /// Push a category's events to a closure instead of buffering them.
    pub fn register_fn<F>(&mut self, category: OutputCategory, callback: F)
    where
        F: FnMut(OutputCategory, &str) + Send + 'static,
    {
        self.output.register_fn(category, callback);
    }

    /// Go back to buffering a category. Returns whether a sink was removed.
    pub fn unregister(&mut self, category: OutputCategory) -> bool {
        self.output.unregister(category)
    }

    /// The engine's player.
    pub fn player(&self) -> &Person {
        &self.player
    }

    /// Mutable access to the engine's player.
    pub fn player_mut(&mut self) -> &mut Person {
        &mut self.player
    }

    /// The engine's world.
    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Mutable access to the engine's world.
    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    /// The in-game clock.
    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Whether the interpreter is still accepting input.
    pub fn run_state(&self) -> RunState {
        self.interpreter.state()
    }

    /// Snapshot of the player and the loaded map.
    pub fn state(&self) -> EngineState {
        EngineState {
            player: self.player.info(),
            current_map: self.world.current_map_name().map(str::to_string),
        }
    }

    /// [`GameEngine::state`] as compact JSON.
    pub fn state_json(&self) -> String {
        // Only strings, integers and null: serialization cannot fail.
        serde_json::to_string(&self.state()).unwrap_or_default()
    }
}

impl Drop for GameEngine {
    fn drop(&mut self) {
        self.output.unregister_all();
        log::debug!("engine for \"{}\" released", self.player.name());
    }
}
