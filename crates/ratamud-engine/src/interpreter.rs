//! The command interpreter state machine.
//!
//! An [`Interpreter`] turns one line of input into mutations of the player
//! and world it is handed plus output events on the router. It is either
//! [`RunState::Running`] or [`RunState::Stopped`]; only a quit verb moves it
//! from the first to the second.

use ratamud_core::{GameWorld, Person, Position};

use crate::error::{EngineError, EngineResult};
use crate::output::{OutputCategory, OutputRouter};
use crate::parser::{Command, Direction, closest_name, parse_command, suggest_verb};

/// Hit points restored by eating one item.
pub const EAT_HEAL: i32 = 10;

/// Status text of a player who is resting.
pub const STATUS_RESTING: &str = "resting";
/// Status text of a player who is not resting.
pub const STATUS_NORMAL: &str = "normal";

/// What the host should do after a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Keep feeding input.
    Continue,
    /// The player left; stop driving this engine.
    Stop,
}

/// Lifecycle of an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Accepting input.
    #[default]
    Running,
    /// A quit verb was processed.
    Stopped,
}

/// Everything a command may touch during one call.
#[derive(Debug)]
pub struct Context<'a> {
    /// The player issuing the command.
    pub player: &'a mut Person,
    /// The player's world.
    pub world: &'a mut GameWorld,
    /// Where narration and diagnostics go.
    pub output: &'a mut OutputRouter,
}

impl Context<'_> {
    fn main(&mut self, text: impl AsRef<str>) {
        self.output.emit(OutputCategory::Main, text.as_ref());
    }

    fn log(&mut self, text: impl AsRef<str>) {
        self.output.emit(OutputCategory::Log, text.as_ref());
    }

    fn side(&mut self, text: impl AsRef<str>) {
        self.output.emit(OutputCategory::Side, text.as_ref());
    }

    fn status(&mut self, text: impl AsRef<str>) {
        self.output.emit(OutputCategory::Status, text.as_ref());
    }
}

/// Interprets player input for one engine.
///
/// Calling [`Interpreter::process`] after it returned [`Signal::Stop`] is a
/// precondition violation. Such calls are still interpreted like any other,
/// but hosts must not rely on what they do.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    state: RunState,
}

impl Interpreter {
    /// Create a running interpreter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Whether a quit verb has been processed.
    pub fn is_stopped(&self) -> bool {
        self.state == RunState::Stopped
    }

    /// Interpret one line of input.
    ///
    /// Unrecognized input is narrated and answered with
    /// [`Signal::Continue`]. The only error is [`EngineError::Processing`],
    /// raised when the world does not belong to the player; the caller should
    /// stop driving the engine after it.
    pub fn process(&mut self, ctx: &mut Context<'_>, input: &str) -> EngineResult<Signal> {
        if !ctx.world.is_bound_to(ctx.player) {
            return Err(EngineError::Processing(format!(
                "world belongs to \"{}\", not \"{}\"",
                ctx.world.player_name(),
                ctx.player.name()
            )));
        }

        let command = parse_command(input);
        if command.is_action() && !ctx.player.is_conscious() {
            ctx.main("You are too weak to do that. Try to eat or rest.");
            return Ok(Signal::Continue);
        }

        match command {
            Command::Empty => {}
            Command::Quit => {
                ctx.main(format!("Farewell, {}.", ctx.player.name()));
                self.state = RunState::Stopped;
                log::debug!("interpreter for \"{}\" stopped", ctx.player.name());
                return Ok(Signal::Stop);
            }
            Command::Move { direction } => do_move(ctx, direction),
            Command::Goto { x, y } => do_goto(ctx, Position::new(x, y)),
            Command::Look { target } => do_look(ctx, target.as_deref()),
            Command::Status => do_status(ctx),
            Command::Map => do_map(ctx),
            Command::Maps => do_maps(ctx),
            Command::Travel { map } => do_travel(ctx, &map),
            Command::Take { item } => do_take(ctx, &item),
            Command::Drop { item } => do_drop(ctx, &item),
            Command::Inventory => do_inventory(ctx),
            Command::Eat { item } => do_eat(ctx, &item),
            Command::Rest => do_rest(ctx),
            Command::Wake => do_wake(ctx),
            Command::Clear => {
                ctx.output.clear(OutputCategory::Main);
                ctx.log("main output cleared");
            }
            Command::Help { topic } => ctx.main(help_text(topic.as_deref())),
            Command::Incomplete { usage } => ctx.main(capitalize(usage)),
            Command::Unknown { input } => do_unknown(ctx, &input),
        }
        Ok(Signal::Continue)
    }
}

/// Bring a resting player back on their feet before they move.
fn wake_for_action(ctx: &mut Context<'_>) {
    if ctx.player.status == STATUS_RESTING {
        ctx.player.status = STATUS_NORMAL.to_string();
        ctx.main("You get up.");
    }
}

fn in_bounds(world: &GameWorld, pos: Position) -> bool {
    world.current_map().is_none_or(|map| map.contains(pos))
}

fn do_move(ctx: &mut Context<'_>, direction: Direction) {
    let (dx, dy) = direction.delta();
    let target = ctx.player.position().offset(dx, dy);
    if !in_bounds(ctx.world, target) {
        ctx.main(format!("You can't go further {}.", direction.name()));
        return;
    }
    wake_for_action(ctx);
    ctx.player.set_position(target.x, target.y);
    ctx.main(format!(
        "You walk {} to ({}, {}).",
        direction.name(),
        target.x,
        target.y
    ));
    ctx.log(format!("move {} -> {target}", direction.name()));
}

fn do_goto(ctx: &mut Context<'_>, target: Position) {
    if !in_bounds(ctx.world, target) {
        ctx.main(format!(
            "({}, {}) lies outside this map.",
            target.x, target.y
        ));
        return;
    }
    wake_for_action(ctx);
    ctx.player.set_position(target.x, target.y);
    ctx.main(format!("You arrive at ({}, {}).", target.x, target.y));
    ctx.log(format!("goto {target}"));
}

fn do_look(ctx: &mut Context<'_>, target: Option<&str>) {
    let Some(target) = target else {
        let pos = ctx.player.position();
        let mut lines = Vec::new();
        match ctx.world.current_map() {
            Some(map) => {
                lines.push(format!("**{}**", map.name));
                if !map.description.is_empty() {
                    lines.push(map.description.clone());
                }
                lines.push(format!("You stand at ({}, {}).", pos.x, pos.y));
                if !map.items.is_empty() {
                    lines.push(format!("On the ground: {}.", map.items.join(", ")));
                }
            }
            None => {
                lines.push("You are nowhere in particular.".to_string());
                lines.push(format!("You stand at ({}, {}).", pos.x, pos.y));
            }
        }
        ctx.main(lines.join("\n"));
        return;
    };

    if target.eq_ignore_ascii_case("me")
        || target.eq_ignore_ascii_case("self")
        || target.eq_ignore_ascii_case(ctx.player.name())
    {
        let text = if ctx.player.description.is_empty() {
            format!("You are {}.", ctx.player.name())
        } else {
            format!("You are {}, {}.", ctx.player.name(), ctx.player.description)
        };
        ctx.main(text);
    } else if let Some(item) = carried_name(ctx.player, target) {
        let count = ctx.player.item_count(&item);
        ctx.main(format!("You carry {count} {item}."));
    } else if ctx.world.has_item(target) {
        ctx.main(format!("A {target} lies on the ground here."));
    } else {
        ctx.main(format!("You don't see any '{target}' here."));
    }
}

pub(crate) fn status_line(player: &Person) -> String {
    let pos = player.position();
    format!(
        "{} HP {}/{} @ ({}, {})",
        player.name(),
        player.hp(),
        player.max_hp,
        pos.x,
        pos.y
    )
}

fn do_status(ctx: &mut Context<'_>) {
    let map = ctx.world.current_map_name().unwrap_or("none").to_string();
    let lines = [
        format!("Name: {}", ctx.player.name()),
        format!("HP: {}/{}", ctx.player.hp(), ctx.player.max_hp),
        format!("Status: {}", ctx.player.status),
        format!("Map: {map}"),
    ];
    ctx.main(lines.join("\n"));
    let line = status_line(ctx.player);
    ctx.status(line);
}

fn do_map(ctx: &mut Context<'_>) {
    let text = match ctx.world.current_map() {
        Some(map) => {
            let spawn = map.spawn_point();
            format!(
                "Map: {}\nSize: {}x{}\nSpawn: ({}, {})\nItems: {}",
                map.name,
                map.width,
                map.height,
                spawn.x,
                spawn.y,
                if map.items.is_empty() {
                    "none".to_string()
                } else {
                    map.items.join(", ")
                }
            )
        }
        None => "No map loaded.".to_string(),
    };
    ctx.side(text);
}

fn do_maps(ctx: &mut Context<'_>) {
    let names = ctx.world.map_names();
    let current = ctx.world.current_map_name().map(str::to_string);
    let text = if names.is_empty() {
        "No maps known.".to_string()
    } else {
        let lines: Vec<String> = names
            .iter()
            .map(|name| {
                if current.as_deref() == Some(name.as_str()) {
                    format!("* {name} (here)")
                } else {
                    format!("* {name}")
                }
            })
            .collect();
        format!("Known maps:\n{}", lines.join("\n"))
    };
    ctx.side(text);
}

fn do_travel(ctx: &mut Context<'_>, name: &str) {
    match ctx.world.load_map(name) {
        Ok(map) => {
            let spawn = map.spawn_point();
            let text = if map.description.is_empty() {
                format!("You travel to {}.", map.name)
            } else {
                format!("You travel to {}. {}", map.name, map.description)
            };
            let log = format!("map loaded: {}", map.name);
            wake_for_action(ctx);
            ctx.player.set_position(spawn.x, spawn.y);
            ctx.main(text);
            ctx.log(log);
        }
        Err(err) => {
            let names = ctx.world.map_names();
            let mut text = format!("There is no place called '{name}'.");
            if let Some(hint) = closest_name(name, names.iter().map(String::as_str)) {
                text.push_str(&format!(" Did you mean '{hint}'?"));
            }
            ctx.main(text);
            ctx.log(format!("travel failed: {err}"));
        }
    }
}

/// The inventory key matching `item` case-insensitively.
fn carried_name(player: &Person, item: &str) -> Option<String> {
    player
        .items()
        .find(|(name, _)| name.eq_ignore_ascii_case(item))
        .map(|(name, _)| name.to_string())
}

fn do_take(ctx: &mut Context<'_>, item: &str) {
    match ctx.world.take_item(item) {
        Some(name) => {
            ctx.main(format!("You pick up the {name}."));
            ctx.log(format!("take {name}"));
            ctx.player.add_items(name, 1);
        }
        None => ctx.main(format!("There is no {item} here.")),
    }
}

fn do_drop(ctx: &mut Context<'_>, item: &str) {
    let Some(name) = carried_name(ctx.player, item) else {
        ctx.main(format!("You don't have any {item}."));
        return;
    };
    if !ctx.world.drop_item(name.as_str()) {
        ctx.main("There is nowhere to put it down.");
        return;
    }
    ctx.player.remove_items(&name, 1);
    ctx.main(format!("You drop the {name}."));
    ctx.log(format!("drop {name}"));
}

fn do_inventory(ctx: &mut Context<'_>) {
    let lines: Vec<String> = ctx
        .player
        .items()
        .map(|(name, count)| {
            if count > 1 {
                format!("* {name} x{count}")
            } else {
                format!("* {name}")
            }
        })
        .collect();
    let text = if lines.is_empty() {
        "You are carrying nothing.".to_string()
    } else {
        format!("You are carrying:\n{}", lines.join("\n"))
    };
    ctx.side(text);
}

fn do_eat(ctx: &mut Context<'_>, item: &str) {
    let Some(name) = carried_name(ctx.player, item) else {
        ctx.main(format!("You don't have any {item}."));
        return;
    };
    ctx.player.remove_items(&name, 1);
    let before = ctx.player.hp();
    // Healing never lowers hp, even above the cap.
    let after = before.max(before.saturating_add(EAT_HEAL).min(ctx.player.max_hp));
    ctx.player.set_hp(after);
    ctx.main(format!(
        "You eat the {name} and recover {} HP.",
        after - before
    ));
    ctx.log(format!("eat {name}: hp {before} -> {after}"));
}

fn do_rest(ctx: &mut Context<'_>) {
    if ctx.player.status == STATUS_RESTING {
        ctx.main("You are already resting.");
        return;
    }
    ctx.player.status = STATUS_RESTING.to_string();
    ctx.main("You sit down and rest.");
    ctx.log("resting");
}

fn do_wake(ctx: &mut Context<'_>) {
    if ctx.player.status != STATUS_RESTING {
        ctx.main("You are already awake.");
        return;
    }
    ctx.player.status = STATUS_NORMAL.to_string();
    ctx.main("You get up.");
    ctx.log("awake");
}

fn do_unknown(ctx: &mut Context<'_>, input: &str) {
    let mut text = format!("I don't understand '{input}'.");
    let first = input.split_whitespace().next().unwrap_or(input);
    if let Some(verb) = suggest_verb(first) {
        text.push_str(&format!(" Did you mean '{verb}'?"));
    }
    ctx.main(text);
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn help_text(topic: Option<&str>) -> String {
    let Some(topic) = topic else {
        return "**Commands**\n\
            north, south, east, west (or n, s, e, w) - take one step\n\
            goto <x> <y> - jump to a spot on this map\n\
            look [target] - describe your surroundings or something specific\n\
            status - show your condition\n\
            map, maps - show this map or every map you can reach\n\
            travel <map> - go to another map\n\
            take, drop, eat <item> - handle items\n\
            inventory (or i) - list what you're carrying\n\
            rest, wake - recover hit points over time\n\
            clear - clear the main window\n\
            quit - leave the game\n\n\
            Type 'help <topic>' for more details."
            .to_string();
    };
    match topic.to_lowercase().as_str() {
        "movement" | "move" | "go" => "**Movement**\n\
            Use directions: north, south, east, west, up, down\n\
            Or abbreviations: n, s, e, w, u, d\n\
            goto <x> <y> - jump straight to a spot\n\
            You cannot walk past the edge of the map."
            .to_string(),
        "maps" | "map" | "travel" => "**Maps**\n\
            map - details of the map you are on\n\
            maps - every map you can travel to\n\
            travel <map> - travel there and arrive at its spawn point"
            .to_string(),
        "items" | "inventory" => "**Items**\n\
            take <item> - pick up an item\n\
            drop <item> - put an item down\n\
            eat <item> - eat an item to recover hit points\n\
            inventory (or i) - list what you're carrying"
            .to_string(),
        "rest" | "health" | "hp" => "**Health**\n\
            rest - sit down; you recover hit points as time passes\n\
            wake - get up again (moving also wakes you)\n\
            At zero hit points you can only eat, rest and look around."
            .to_string(),
        _ => format!("No help available for '{topic}'."),
    }
}
