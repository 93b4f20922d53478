//! Core types for RataMUD: players, worlds, maps, and the handle tables that
//! let a host hold them as opaque identifiers.
//!
//! Nothing in this crate performs I/O except [`map::DirMapLoader`], and nothing
//! is synchronized internally. A [`Person`] and a [`GameWorld`] are plain
//! owned values; the engine crate decides who owns them.

/// Error types used throughout the crate.
pub mod error;
/// Generational handle tables for engine-owned resources.
pub mod handle;
/// Map data and the loaders that resolve map names.
pub mod map;
/// The player character.
pub mod person;
/// Owned-or-static text values that cross the host boundary.
pub mod string_box;
/// The game world bound to a player.
pub mod world;

/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export handle types.
pub use handle::{Handle, HandleTable};
/// Re-export map types.
pub use map::{DirMapLoader, MapCatalog, MapData, MapLoader};
/// Re-export player types.
pub use person::{Person, PersonInfo, Position};
/// Re-export the boundary string type.
pub use string_box::StringBox;
/// Re-export world types.
pub use world::GameWorld;
