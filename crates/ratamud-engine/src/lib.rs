//! The RataMUD engine runtime.
//!
//! A [`GameEngine`] binds one player, one world, one [`Interpreter`] and one
//! [`OutputRouter`]. Hosts feed it lines of text; the interpreter mutates the
//! player and world and emits categorized output, which the router either
//! pushes to a registered callback or buffers for the host to drain.
//!
//! The [`Registry`] owns every engine-held resource behind opaque handles and
//! hosts the process-wide "simple" engine. It is what the C ABI crate wraps.
//!
//! Everything here is single-threaded: no operation spawns work or blocks,
//! and callbacks run synchronously inside the call that emitted them.

/// In-game clock advanced by `update`.
pub mod clock;
/// Engine configuration.
pub mod config;
/// The top-level engine handle.
pub mod engine;
/// Error types for the engine.
pub mod error;
/// The command interpreter state machine.
pub mod interpreter;
/// Output categories, sinks and the router.
pub mod output;
/// Command parsing and fuzzy suggestions.
pub mod parser;
/// Handle tables and the singleton engine.
pub mod registry;

pub use clock::GameClock;
pub use config::EngineConfig;
pub use engine::{EngineState, GameEngine};
pub use error::{EngineError, EngineResult};
pub use interpreter::{Interpreter, RunState, Signal};
pub use output::{BufferSink, CallbackSink, OutputCategory, OutputRouter, OutputSink};
pub use parser::{Command, Direction, parse_command};
pub use registry::{ApiMode, Registry};
