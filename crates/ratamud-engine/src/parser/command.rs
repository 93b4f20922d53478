//! Parsing a line of player input into a [`Command`].

/// A one-step movement direction on the map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards y - 1.
    North,
    /// Towards y + 1.
    South,
    /// Towards x + 1.
    East,
    /// Towards x - 1.
    West,
}

impl Direction {
    /// Parse a direction word or abbreviation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "n" | "north" | "u" | "up" => Some(Self::North),
            "s" | "south" | "d" | "down" => Some(Self::South),
            "e" | "east" | "right" => Some(Self::East),
            "w" | "west" | "left" => Some(Self::West),
            _ => None,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }

    /// Grid delta for one step.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Step one square.
    Move {
        /// Where to step.
        direction: Direction,
    },
    /// Jump to exact coordinates on the current map.
    Goto {
        /// Target column.
        x: i32,
        /// Target row.
        y: i32,
    },
    /// Describe the surroundings or a target.
    Look {
        /// What to look at, if anything in particular.
        target: Option<String>,
    },
    /// Show the player's status.
    Status,
    /// Show details of the current map.
    Map,
    /// List the maps that can be travelled to.
    Maps,
    /// Load another map.
    Travel {
        /// Name of the map.
        map: String,
    },
    /// Pick an item up.
    Take {
        /// The item name.
        item: String,
    },
    /// Put an item down.
    Drop {
        /// The item name.
        item: String,
    },
    /// List carried items.
    Inventory,
    /// Eat a carried item to recover hit points.
    Eat {
        /// The item name.
        item: String,
    },
    /// Start resting.
    Rest,
    /// Stop resting.
    Wake,
    /// Discard buffered main output.
    Clear,
    /// Show help.
    Help {
        /// Optional help topic.
        topic: Option<String>,
    },
    /// Leave the game.
    Quit,
    /// Blank input.
    Empty,
    /// A known verb used without what it needs.
    Incomplete {
        /// What to tell the player.
        usage: &'static str,
    },
    /// Input that matches no verb.
    Unknown {
        /// The input as typed, trimmed.
        input: String,
    },
}

impl Command {
    /// Whether the command moves the player or handles items, which a
    /// player at zero hit points cannot do.
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            Self::Move { .. }
                | Self::Goto { .. }
                | Self::Travel { .. }
                | Self::Take { .. }
                | Self::Drop { .. }
        )
    }
}

const MOVE_VERBS: &[&str] = &["go", "walk", "move", "head"];
const GOTO_VERBS: &[&str] = &["goto", "teleport"];
const LOOK_VERBS: &[&str] = &["look", "l", "examine", "x"];
const STATUS_VERBS: &[&str] = &["status", "stat", "stats", "score"];
const MAP_VERBS: &[&str] = &["map", "m"];
const MAPS_VERBS: &[&str] = &["maps", "world"];
const TRAVEL_VERBS: &[&str] = &["travel", "fly", "journey"];
const TAKE_VERBS: &[&str] = &["take", "get", "pick", "grab"];
const DROP_VERBS: &[&str] = &["drop", "discard"];
const INVENTORY_VERBS: &[&str] = &["inventory", "inv", "i", "items"];
const EAT_VERBS: &[&str] = &["eat", "consume"];
const REST_VERBS: &[&str] = &["rest", "sleep"];
const WAKE_VERBS: &[&str] = &["wake", "wakeup"];
const CLEAR_VERBS: &[&str] = &["clear", "cls"];
const HELP_VERBS: &[&str] = &["help", "h", "?"];
const QUIT_VERBS: &[&str] = &["quit", "exit", "q"];

/// Every verb the parser recognizes, directions excluded.
pub(crate) const ALL_VERBS: &[&[&str]] = &[
    MOVE_VERBS,
    GOTO_VERBS,
    LOOK_VERBS,
    STATUS_VERBS,
    MAP_VERBS,
    MAPS_VERBS,
    TRAVEL_VERBS,
    TAKE_VERBS,
    DROP_VERBS,
    INVENTORY_VERBS,
    EAT_VERBS,
    REST_VERBS,
    WAKE_VERBS,
    CLEAR_VERBS,
    HELP_VERBS,
    QUIT_VERBS,
];

/// Parse a line of player input. Verbs are case-insensitive; arguments keep
/// their case.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let words: Vec<&str> = input.split_whitespace().collect();
    let Some(first) = words.first() else {
        return Command::Empty;
    };
    let verb = first.to_lowercase();
    let verb = verb.as_str();
    let rest = &words[1..];

    if let Some(direction) = Direction::parse(verb) {
        return Command::Move { direction };
    }

    if MOVE_VERBS.contains(&verb) {
        return parse_move(rest);
    }
    if GOTO_VERBS.contains(&verb) {
        return parse_goto(rest);
    }
    if LOOK_VERBS.contains(&verb) {
        return parse_look(rest);
    }
    if STATUS_VERBS.contains(&verb) {
        return Command::Status;
    }
    if MAP_VERBS.contains(&verb) {
        return Command::Map;
    }
    if MAPS_VERBS.contains(&verb) {
        return Command::Maps;
    }
    if TRAVEL_VERBS.contains(&verb) {
        return parse_travel(rest);
    }
    if TAKE_VERBS.contains(&verb) {
        return parse_take(rest);
    }
    if DROP_VERBS.contains(&verb) {
        return with_item(rest, "drop what?", |item| Command::Drop { item });
    }
    if INVENTORY_VERBS.contains(&verb) {
        return Command::Inventory;
    }
    if EAT_VERBS.contains(&verb) {
        return with_item(rest, "eat what?", |item| Command::Eat { item });
    }
    if REST_VERBS.contains(&verb) {
        return Command::Rest;
    }
    if WAKE_VERBS.contains(&verb) {
        return Command::Wake;
    }
    if CLEAR_VERBS.contains(&verb) {
        return Command::Clear;
    }
    if HELP_VERBS.contains(&verb) {
        return Command::Help {
            topic: joined(rest),
        };
    }
    if QUIT_VERBS.contains(&verb) {
        return Command::Quit;
    }

    Command::Unknown {
        input: input.to_string(),
    }
}

fn joined(words: &[&str]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn with_item(rest: &[&str], usage: &'static str, build: fn(String) -> Command) -> Command {
    match joined(rest) {
        Some(item) => build(item),
        None => Command::Incomplete { usage },
    }
}

fn parse_move(rest: &[&str]) -> Command {
    match rest.first().and_then(|w| Direction::parse(w)) {
        Some(direction) => Command::Move { direction },
        None => Command::Incomplete {
            usage: "go where? Try north, south, east or west.",
        },
    }
}

fn parse_goto(rest: &[&str]) -> Command {
    let usage = Command::Incomplete {
        usage: "usage: goto <x> <y>",
    };
    let [x, y] = rest else {
        return usage;
    };
    match (x.parse(), y.parse()) {
        (Ok(x), Ok(y)) => Command::Goto { x, y },
        _ => usage,
    }
}

fn parse_look(rest: &[&str]) -> Command {
    // "look at the chest" and "look the chest" mean the same thing
    let target = match rest {
        [at, tail @ ..] if at.eq_ignore_ascii_case("at") => tail,
        _ => rest,
    };
    Command::Look {
        target: joined(target),
    }
}

fn parse_travel(rest: &[&str]) -> Command {
    let target = match rest {
        [to, tail @ ..] if to.eq_ignore_ascii_case("to") => tail,
        _ => rest,
    };
    match joined(target) {
        Some(map) => Command::Travel { map },
        None => Command::Incomplete {
            usage: "travel where? Type 'maps' to see where you can go.",
        },
    }
}

fn parse_take(rest: &[&str]) -> Command {
    // "pick up the key"
    let item = match rest {
        [up, tail @ ..] if up.eq_ignore_ascii_case("up") => tail,
        _ => rest,
    };
    with_item(item, "take what?", |item| Command::Take { item })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_directions() {
        assert_eq!(
            parse_command("north"),
            Command::Move {
                direction: Direction::North
            }
        );
        assert_eq!(
            parse_command("W"),
            Command::Move {
                direction: Direction::West
            }
        );
        assert_eq!(
            parse_command("go east"),
            Command::Move {
                direction: Direction::East
            }
        );
        assert!(matches!(parse_command("go"), Command::Incomplete { .. }));
    }

    #[test]
    fn goto_coordinates() {
        assert_eq!(parse_command("goto 3 -4"), Command::Goto { x: 3, y: -4 });
        assert!(matches!(
            parse_command("goto 3"),
            Command::Incomplete { .. }
        ));
        assert!(matches!(
            parse_command("goto a b"),
            Command::Incomplete { .. }
        ));
    }

    #[test]
    fn look_variants() {
        assert_eq!(parse_command("look"), Command::Look { target: None });
        assert_eq!(parse_command("LOOK at"), Command::Look { target: None });
        assert_eq!(
            parse_command("examine at the Old Well"),
            Command::Look {
                target: Some("the Old Well".to_string())
            }
        );
    }

    #[test]
    fn travel_and_maps() {
        assert_eq!(
            parse_command("travel to forest"),
            Command::Travel {
                map: "forest".to_string()
            }
        );
        assert_eq!(parse_command("maps"), Command::Maps);
        assert_eq!(parse_command("map"), Command::Map);
        assert!(matches!(
            parse_command("travel"),
            Command::Incomplete { .. }
        ));
    }

    #[test]
    fn item_verbs() {
        assert_eq!(
            parse_command("pick up apple"),
            Command::Take {
                item: "apple".to_string()
            }
        );
        assert_eq!(
            parse_command("drop rusty key"),
            Command::Drop {
                item: "rusty key".to_string()
            }
        );
        assert_eq!(
            parse_command("eat apple"),
            Command::Eat {
                item: "apple".to_string()
            }
        );
        assert_eq!(
            parse_command("take"),
            Command::Incomplete { usage: "take what?" }
        );
        assert_eq!(parse_command("i"), Command::Inventory);
    }

    #[test]
    fn quit_is_case_insensitive() {
        assert_eq!(parse_command("quit"), Command::Quit);
        assert_eq!(parse_command("  EXIT  "), Command::Quit);
        assert_eq!(parse_command("q"), Command::Quit);
    }

    #[test]
    fn blank_and_unknown() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command(" \t "), Command::Empty);
        assert_eq!(
            parse_command("  dance wildly "),
            Command::Unknown {
                input: "dance wildly".to_string()
            }
        );
    }

    #[test]
    fn action_classification() {
        assert!(parse_command("n").is_action());
        assert!(parse_command("take apple").is_action());
        assert!(!parse_command("rest").is_action());
        assert!(!parse_command("eat apple").is_action());
        assert!(!parse_command("look").is_action());
        assert!(!parse_command("quit").is_action());
    }
}
