use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Hit points a freshly created player starts with.
pub const DEFAULT_HP: i32 = 100;
/// Where a freshly created player stands before any map is loaded.
pub const DEFAULT_POSITION: Position = Position { x: 50, y: 50 };

/// Integer grid coordinates. The model places no bounds on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// Create a position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position shifted by a delta, saturating at the integer limits.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Structured snapshot of a player, in the key order hosts rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonInfo {
    /// The player's name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Grid position.
    pub position: Position,
    /// Current hit points.
    pub hp: i32,
    /// Hit point ceiling applied by healing.
    pub max_hp: i32,
    /// Short status text such as "normal" or "resting".
    pub status: String,
}

/// A player character.
///
/// The name is fixed at creation; everything else is freely mutable.
/// Setters overwrite unconditionally. Clamping and death rules belong to the
/// interpreter, not to this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    name: String,
    /// Free-form description.
    pub description: String,
    /// Grid position.
    pub position: Position,
    /// Current hit points. Zero and negative values are valid game state.
    pub hp: i32,
    /// Hit point ceiling applied by healing.
    pub max_hp: i32,
    /// Short status text.
    pub status: String,
    items: BTreeMap<String, u32>,
}

impl Person {
    /// Create a player. Fails if the name is empty or only whitespace.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidArgument(
                "player name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            name,
            description: description.into(),
            position: DEFAULT_POSITION,
            hp: DEFAULT_HP,
            max_hp: DEFAULT_HP,
            status: "normal".to_string(),
            items: BTreeMap::new(),
        })
    }

    /// The player's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Overwrite the position.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = Position::new(x, y);
    }

    /// Current hit points.
    pub fn hp(&self) -> i32 {
        self.hp
    }

    /// Overwrite the hit points.
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp;
    }

    /// Whether the player has any hit points left.
    pub fn is_conscious(&self) -> bool {
        self.hp > 0
    }

    /// Add `quantity` of an item to the inventory.
    pub fn add_items(&mut self, item: impl Into<String>, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let count = self.items.entry(item.into()).or_insert(0);
        *count = count.saturating_add(quantity);
    }

    /// Remove `quantity` of an item. Returns false, leaving the inventory
    /// untouched, if the player holds fewer than that.
    pub fn remove_items(&mut self, item: &str, quantity: u32) -> bool {
        let Some(count) = self.items.get_mut(item) else {
            return false;
        };
        if *count < quantity {
            return false;
        }
        *count -= quantity;
        if *count == 0 {
            self.items.remove(item);
        }
        true
    }

    /// How many of an item the player holds.
    pub fn item_count(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Inventory contents in name order.
    pub fn items(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(name, count)| (name.as_str(), *count))
    }

    /// Snapshot of the player's public state.
    pub fn info(&self) -> PersonInfo {
        PersonInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
            status: self.status.clone(),
        }
    }

    /// The [`PersonInfo`] snapshot as compact JSON.
    pub fn info_json(&self) -> String {
        // Only strings and integers: serialization cannot fail.
        serde_json::to_string(&self.info()).unwrap_or_default()
    }
}
