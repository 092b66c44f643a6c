use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::script::{Condition, Effect, StateKey, Value};

//////////////////////////////
/// GAME STRUCTS AND ENUMS ///
//////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    Up,
    Down,
    In,
    Out,
}

impl Direction {
    /// Accepts full names and the usual abbreviations.
    pub fn parse(word: &str) -> Option<Direction> {
        let dir = match word.trim().to_lowercase().as_str() {
            "north" | "n" | "nor" => Direction::North,
            "south" | "s" | "sou" => Direction::South,
            "east" | "e" | "eas" => Direction::East,
            "west" | "w" | "wes" => Direction::West,
            "northeast" | "ne" | "north_east" => Direction::NorthEast,
            "northwest" | "nw" | "north_west" => Direction::NorthWest,
            "southeast" | "se" | "south_east" => Direction::SouthEast,
            "southwest" | "sw" | "south_west" => Direction::SouthWest,
            "up" | "u" | "upward" => Direction::Up,
            "down" | "d" | "downward" | "descend" => Direction::Down,
            "in" | "inside" | "enter" => Direction::In,
            "out" | "outside" | "exit" | "leave" => Direction::Out,
            _ => return None,
        };
        Some(dir)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::NorthEast => "northeast",
            Direction::NorthWest => "northwest",
            Direction::SouthEast => "southeast",
            Direction::SouthWest => "southwest",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    Daylight,
    #[default]
    Lit,
    Dark,
    PitchBlack,
}

impl Lighting {
    pub fn parse(raw: &str) -> Option<Lighting> {
        match raw.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "daylight" => Some(Lighting::Daylight),
            "lit" => Some(Lighting::Lit),
            "dark" => Some(Lighting::Dark),
            "pitch_black" => Some(Lighting::PitchBlack),
            _ => None,
        }
    }

    pub fn needs_light(self) -> bool {
        matches!(self, Lighting::Dark | Lighting::PitchBlack)
    }
}

/// One entry of a scene's exit table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitRule {
    Open {
        target: String,
    },
    Conditional {
        target: String,
        condition: Condition,
        message: String,
    },
    Blocked {
        message: String,
    },
}

impl ExitRule {
    pub fn target(&self) -> Option<&str> {
        match self {
            ExitRule::Open { target } | ExitRule::Conditional { target, .. } => Some(target),
            ExitRule::Blocked { .. } => None,
        }
    }
}

/// Weight threshold applied to some of a scene's exits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarryLimit {
    pub max_weight: u32,
    pub directions: Vec<Direction>,
    pub message: Option<String>,
}

impl CarryLimit {
    pub fn gates(&self, direction: Direction) -> bool {
        self.directions.contains(&direction)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub description: String,
    pub first_visit_description: Option<String>,
    pub lighting: Lighting,
    pub exits: BTreeMap<Direction, ExitRule>,
    pub atmosphere: Vec<String>,
    pub first_visit_points: u32,
    pub carry_limit: Option<CarryLimit>,
    /// Entities lying directly in the scene, in arrival order.
    pub contents: Vec<String>,
    pub visited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Scene(String),
    Inventory,
    Container(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Tiny,
    Small,
    Medium,
    Large,
    Huge,
}

impl SizeClass {
    pub fn parse(raw: &str) -> Option<SizeClass> {
        match raw.trim().to_uppercase().as_str() {
            "TINY" => Some(SizeClass::Tiny),
            "SMALL" => Some(SizeClass::Small),
            "MEDIUM" => Some(SizeClass::Medium),
            "LARGE" => Some(SizeClass::Large),
            "HUGE" => Some(SizeClass::Huge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerProps {
    pub openable: bool,
    pub lockable: bool,
    pub required_key: Option<String>,
    /// Total weight the container holds, if bounded.
    pub capacity: Option<u32>,
    /// World flag mirrored from this container's open state.
    pub open_flag: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasureProps {
    pub deposit_value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    Tool,
    Weapon,
    Container(ContainerProps),
    Treasure(TreasureProps),
}

impl Archetype {
    pub fn container(&self) -> Option<&ContainerProps> {
        match self {
            Archetype::Container(props) => Some(props),
            _ => None,
        }
    }

    pub fn treasure(&self) -> Option<&TreasureProps> {
        match self {
            Archetype::Treasure(props) => Some(props),
            _ => None,
        }
    }
}

/// Mutable per-entity state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState {
    pub is_open: bool,
    pub is_locked: bool,
    pub extra: BTreeMap<String, Value>,
}

impl EntityState {
    pub fn defaults_for(archetype: &Archetype) -> Self {
        match archetype {
            Archetype::Container(props) => EntityState {
                is_open: !props.openable,
                is_locked: props.lockable,
                extra: BTreeMap::new(),
            },
            _ => EntityState::default(),
        }
    }

    pub fn get(&self, key: &StateKey) -> Value {
        match key {
            StateKey::Open => Value::Bool(self.is_open),
            StateKey::Locked => Value::Bool(self.is_locked),
            StateKey::Extra(k) => self.extra.get(k).cloned().unwrap_or(Value::Bool(false)),
        }
    }

    pub fn set(&mut self, key: &StateKey, value: Value) {
        match key {
            StateKey::Open => self.is_open = value.truthy(),
            StateKey::Locked => self.is_locked = value.truthy(),
            StateKey::Extra(k) => {
                self.extra.insert(k.clone(), value);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub command: String,
    pub message: String,
    pub condition: Option<Condition>,
    pub effect: Option<Effect>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub examine_text: String,
    pub archetype: Archetype,
    pub portable: bool,
    pub visible: bool,
    pub weight: u32,
    pub size: SizeClass,
    pub tags: Vec<String>,
    /// Validated at load time; never written during play.
    pub extensions: BTreeMap<String, Value>,
    pub interactions: Vec<Interaction>,
    pub location: Location,
    pub state: EntityState,
}

impl Entity {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// True for containers whose contents can be reached right now.
    pub fn is_open_container(&self) -> bool {
        match self.archetype.container() {
            Some(props) => !props.openable || self.state.is_open,
            None => false,
        }
    }
}
