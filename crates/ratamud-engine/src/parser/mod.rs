//! Command parsing and fuzzy suggestions.

mod command;
mod resolver;

pub use command::{Command, Direction, parse_command};
pub use resolver::{closest_name, suggest_verb};
