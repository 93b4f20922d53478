//! Handle tables and the singleton engine.
//!
//! A [`Registry`] owns everything a host refers to by handle: loose players
//! and worlds from the direct API, and whole engines. It also owns the one
//! process-wide engine behind the "simple" API.
//!
//! The two families never coexist. While the simple engine is initialized
//! no handle can be created, and the simple engine cannot be initialized
//! while any handle is live.

use std::fmt;
use std::sync::Arc;

use ratamud_core::{
    CoreError, GameWorld, Handle, HandleTable, MapLoader, Person, Position, StringBox,
};

use crate::config::EngineConfig;
use crate::engine::GameEngine;
use crate::error::{EngineError, EngineResult};
use crate::interpreter::Signal;
use crate::output::{OutputCategory, OutputSink};

/// Name of the player the simple API creates.
pub const SIMPLE_PLAYER_NAME: &str = "Player";

const PLAYER_TAG: u8 = 1;
const WORLD_TAG: u8 = 2;
const ENGINE_TAG: u8 = 3;

/// The API family that currently holds live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    /// Players, worlds or engines addressed by handle.
    Handles,
    /// The process-wide engine behind `init`/`cleanup`.
    Simple,
}

impl fmt::Display for ApiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handles => write!(f, "handle"),
            Self::Simple => write!(f, "simple"),
        }
    }
}

/// Owner of every host-visible resource.
#[derive(Debug)]
pub struct Registry {
    config: EngineConfig,
    loader: Arc<dyn MapLoader>,
    players: HandleTable<Person>,
    worlds: HandleTable<GameWorld>,
    engines: HandleTable<GameEngine>,
    simple: Option<GameEngine>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Registry {
    /// Create an empty registry. Every world and engine it creates shares
    /// the loader `config` describes.
    pub fn new(config: EngineConfig) -> Self {
        let loader = config.map_loader();
        Self {
            config,
            loader,
            players: HandleTable::tagged(PLAYER_TAG),
            worlds: HandleTable::tagged(WORLD_TAG),
            engines: HandleTable::tagged(ENGINE_TAG),
            simple: None,
        }
    }

    /// The configuration engines are created with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of live handles across all tables.
    pub fn live_handles(&self) -> usize {
        self.players.len() + self.worlds.len() + self.engines.len()
    }

    /// The API family holding live state, if any.
    pub fn active_mode(&self) -> Option<ApiMode> {
        if self.simple.is_some() {
            Some(ApiMode::Simple)
        } else if self.live_handles() > 0 {
            Some(ApiMode::Handles)
        } else {
            None
        }
    }

    fn ensure_handles_allowed(&self) -> EngineResult<()> {
        match self.simple {
            Some(_) => Err(EngineError::ApiModeConflict {
                active: ApiMode::Simple,
            }),
            None => Ok(()),
        }
    }

    // --- Direct player API ---

    /// Create a player.
    pub fn create_player(&mut self, name: &str, description: &str) -> EngineResult<Handle> {
        self.ensure_handles_allowed()?;
        let player = Person::new(name, description)?;
        Ok(self.players.insert(player))
    }

    /// Release a player. Worlds created for it stay alive.
    pub fn free_player(&mut self, handle: Handle) -> EngineResult<()> {
        self.players.remove(handle)?;
        Ok(())
    }

    /// Borrow a player.
    pub fn player(&self, handle: Handle) -> EngineResult<&Person> {
        Ok(self.players.get(handle)?)
    }

    /// Mutably borrow a player.
    pub fn player_mut(&mut self, handle: Handle) -> EngineResult<&mut Person> {
        Ok(self.players.get_mut(handle)?)
    }

    /// A player's name.
    pub fn player_name(&self, handle: Handle) -> EngineResult<StringBox> {
        Ok(StringBox::owned(self.player(handle)?.name()))
    }

    /// A player's info snapshot as JSON.
    pub fn player_info(&self, handle: Handle) -> EngineResult<StringBox> {
        Ok(StringBox::Owned(self.player(handle)?.info_json()))
    }

    /// A player's hit points.
    pub fn player_hp(&self, handle: Handle) -> EngineResult<i32> {
        Ok(self.player(handle)?.hp())
    }

    /// Overwrite a player's hit points.
    pub fn set_player_hp(&mut self, handle: Handle, hp: i32) -> EngineResult<()> {
        self.player_mut(handle)?.set_hp(hp);
        Ok(())
    }

    /// A player's position.
    pub fn player_position(&self, handle: Handle) -> EngineResult<Position> {
        Ok(self.player(handle)?.position())
    }

    /// Overwrite a player's position. No bounds are applied.
    pub fn set_player_position(&mut self, handle: Handle, x: i32, y: i32) -> EngineResult<()> {
        self.player_mut(handle)?.set_position(x, y);
        Ok(())
    }

    // --- Direct world API ---

    /// Create a world for a live player.
    pub fn create_world(&mut self, player: Handle) -> EngineResult<Handle> {
        self.ensure_handles_allowed()?;
        let person = self.players.get(player).map_err(|_| {
            CoreError::InvalidArgument(format!("{player} is not a live player"))
        })?;
        let world = GameWorld::new(person, Arc::clone(&self.loader));
        Ok(self.worlds.insert(world))
    }

    /// Release a world. Its player is not affected.
    pub fn free_world(&mut self, handle: Handle) -> EngineResult<()> {
        self.worlds.remove(handle)?;
        Ok(())
    }

    /// Borrow a world.
    pub fn world(&self, handle: Handle) -> EngineResult<&GameWorld> {
        Ok(self.worlds.get(handle)?)
    }

    /// Switch a world to the named map, leaving it unchanged on failure.
    pub fn load_map(&mut self, handle: Handle, map: &str) -> EngineResult<()> {
        self.worlds.get_mut(handle)?.load_map(map)?;
        Ok(())
    }

    /// Name of a world's loaded map, or `None` before any successful load.
    pub fn current_map(&self, handle: Handle) -> EngineResult<Option<StringBox>> {
        Ok(self.world(handle)?.current_map_name().map(StringBox::owned))
    }

    // --- Engine API ---

    /// Create an engine with a fresh player.
    pub fn create_engine(&mut self, player_name: &str) -> EngineResult<Handle> {
        self.ensure_handles_allowed()?;
        let engine =
            GameEngine::with_loader(player_name, &self.config, Arc::clone(&self.loader))?;
        Ok(self.engines.insert(engine))
    }

    /// Release an engine, its player, its world and its callbacks.
    pub fn free_engine(&mut self, handle: Handle) -> EngineResult<()> {
        self.engines.remove(handle)?;
        Ok(())
    }

    /// Borrow an engine.
    pub fn engine(&self, handle: Handle) -> EngineResult<&GameEngine> {
        Ok(self.engines.get(handle)?)
    }

    /// Mutably borrow an engine.
    pub fn engine_mut(&mut self, handle: Handle) -> EngineResult<&mut GameEngine> {
        Ok(self.engines.get_mut(handle)?)
    }

    /// Feed input to an engine.
    pub fn engine_input(&mut self, handle: Handle, text: &str) -> EngineResult<Signal> {
        self.engine_mut(handle)?.input(text)
    }

    /// Advance an engine's clock.
    pub fn engine_update(&mut self, handle: Handle, delta_ms: u64) -> EngineResult<Signal> {
        Ok(self.engine_mut(handle)?.update(delta_ms))
    }

    /// Drain all of an engine's buffered output.
    pub fn engine_output(&mut self, handle: Handle) -> EngineResult<StringBox> {
        Ok(self.engine_mut(handle)?.output())
    }

    /// Drain one category of an engine's buffered output.
    pub fn engine_drain(
        &mut self,
        handle: Handle,
        category: OutputCategory,
    ) -> EngineResult<Option<StringBox>> {
        Ok(self.engine_mut(handle)?.drain(category))
    }

    /// An engine's state snapshot as JSON.
    pub fn engine_state(&self, handle: Handle) -> EngineResult<StringBox> {
        Ok(StringBox::Owned(self.engine(handle)?.state_json()))
    }

    /// Install or, with `None`, remove a sink on one of an engine's
    /// categories.
    pub fn engine_register(
        &mut self,
        handle: Handle,
        category: OutputCategory,
        sink: Option<Box<dyn OutputSink>>,
    ) -> EngineResult<()> {
        set_sink(self.engine_mut(handle)?, category, sink);
        Ok(())
    }

    // --- Simple API ---

    /// Create the process-wide engine.
    pub fn init(&mut self) -> EngineResult<()> {
        if self.simple.is_some() {
            return Err(EngineError::AlreadyInitialized);
        }
        if self.live_handles() > 0 {
            return Err(EngineError::ApiModeConflict {
                active: ApiMode::Handles,
            });
        }
        let engine =
            GameEngine::with_loader(SIMPLE_PLAYER_NAME, &self.config, Arc::clone(&self.loader))?;
        self.simple = Some(engine);
        log::debug!("simple API initialized");
        Ok(())
    }

    /// Drop the process-wide engine. Does nothing if it does not exist.
    pub fn cleanup(&mut self) {
        if self.simple.take().is_some() {
            log::debug!("simple API cleaned up");
        }
    }

    /// Whether the process-wide engine exists.
    pub fn is_initialized(&self) -> bool {
        self.simple.is_some()
    }

    /// Borrow the process-wide engine.
    pub fn simple(&self) -> EngineResult<&GameEngine> {
        self.simple.as_ref().ok_or(EngineError::NotInitialized)
    }

    /// Mutably borrow the process-wide engine.
    pub fn simple_mut(&mut self) -> EngineResult<&mut GameEngine> {
        self.simple.as_mut().ok_or(EngineError::NotInitialized)
    }

    /// Feed input to the process-wide engine.
    pub fn simple_input(&mut self, text: &str) -> EngineResult<Signal> {
        self.simple_mut()?.input(text)
    }

    /// Advance the process-wide engine's clock.
    pub fn simple_update(&mut self, delta_ms: u64) -> EngineResult<Signal> {
        Ok(self.simple_mut()?.update(delta_ms))
    }

    /// Drain all of the process-wide engine's buffered output.
    pub fn simple_output(&mut self) -> EngineResult<StringBox> {
        Ok(self.simple_mut()?.output())
    }

    /// The process-wide player's info snapshot as JSON.
    pub fn simple_player_info(&self) -> EngineResult<StringBox> {
        Ok(StringBox::Owned(self.simple()?.player().info_json()))
    }

    /// The process-wide player's position.
    pub fn simple_player_position(&self) -> EngineResult<Position> {
        Ok(self.simple()?.player().position())
    }

    /// Name of the process-wide engine's loaded map.
    pub fn simple_current_map(&self) -> EngineResult<Option<StringBox>> {
        Ok(self
            .simple()?
            .world()
            .current_map_name()
            .map(StringBox::owned))
    }

    /// Install or, with `None`, remove a sink on one of the process-wide
    /// engine's categories.
    pub fn simple_register(
        &mut self,
        category: OutputCategory,
        sink: Option<Box<dyn OutputSink>>,
    ) -> EngineResult<()> {
        set_sink(self.simple_mut()?, category, sink);
        Ok(())
    }
}

fn set_sink(engine: &mut GameEngine, category: OutputCategory, sink: Option<Box<dyn OutputSink>>) {
    match sink {
        Some(sink) => engine.register_sink(category, sink),
        None => {
            engine.unregister(category);
        }
    }
}
