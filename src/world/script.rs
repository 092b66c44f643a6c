//! The condition/effect mini-language used by exits and custom interactions.
//!
//! Strings are parsed exactly once, at load time, into a closed set of
//! operations. Evaluation lives in `engine::conditions` and never sees text.
//!
//! - `flag`, `flags.flag`      => truthy test of a world flag
//! - `!flag`                   => negated test
//! - `state.open`, `!state.lit` => test of the owning entity's state
//! - `path = value`            => assignment (effects only)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ScriptError;

/// A scalar stored in entity state or in an entity's extension map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl Value {
    pub fn truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Parse the right-hand side of an assignment.
    pub fn parse(raw: &str) -> Option<Value> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        match raw {
            "true" => return Some(Value::Bool(true)),
            "false" => return Some(Value::Bool(false)),
            _ => {}
        }

        if let Ok(n) = raw.parse::<i64>() {
            return Some(Value::Int(n));
        }

        for quote in ['"', '\''] {
            if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
                return Some(Value::Text(raw[1..raw.len() - 1].to_string()));
            }
        }

        Some(Value::Text(raw.to_string()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Which slot of an entity's state a path refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKey {
    Open,
    Locked,
    Extra(String),
}

impl StateKey {
    fn from_name(name: &str) -> StateKey {
        match name {
            "open" | "isOpen" | "is_open" => StateKey::Open,
            "locked" | "isLocked" | "is_locked" => StateKey::Locked,
            other => StateKey::Extra(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Path {
    /// State of the entity that owns the interaction.
    State(StateKey),
    /// A name in the world flag namespace.
    Flag(String),
}

impl Path {
    pub fn parse(raw: &str) -> Result<Path, ScriptError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScriptError::Empty);
        }

        if let Some(key) = raw.strip_prefix("state.") {
            if !is_identifier(key) {
                return Err(ScriptError::BadPath(raw.to_string()));
            }
            return Ok(Path::State(StateKey::from_name(key)));
        }

        let flag = raw
            .strip_prefix("flags.")
            .or_else(|| raw.strip_prefix("flag."))
            .unwrap_or(raw);

        if !is_identifier(flag) {
            return Err(ScriptError::BadPath(raw.to_string()));
        }

        Ok(Path::Flag(flag.to_string()))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::State(StateKey::Open) => write!(f, "state.isOpen"),
            Path::State(StateKey::Locked) => write!(f, "state.isLocked"),
            Path::State(StateKey::Extra(k)) => write!(f, "state.{k}"),
            Path::Flag(name) => write!(f, "flags.{name}"),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ':')
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    Truthy(Path),
    Negate(Path),
}

impl Condition {
    pub fn parse(raw: &str) -> Result<Condition, ScriptError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScriptError::Empty);
        }

        match raw.strip_prefix('!') {
            Some(rest) => Ok(Condition::Negate(Path::parse(rest)?)),
            None => Ok(Condition::Truthy(Path::parse(raw)?)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Condition::Truthy(p) | Condition::Negate(p) => p,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Truthy(p) => write!(f, "{p}"),
            Condition::Negate(p) => write!(f, "!{p}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Assign(Path, Value),
}

impl Effect {
    pub fn parse(raw: &str) -> Result<Effect, ScriptError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScriptError::Empty);
        }

        let (lhs, rhs) = raw
            .split_once('=')
            .ok_or_else(|| ScriptError::NotAnAssignment(raw.to_string()))?;

        let path = Path::parse(lhs)?;
        let value = Value::parse(rhs).ok_or_else(|| ScriptError::MissingValue(raw.to_string()))?;

        Ok(Effect::Assign(path, value))
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Assign(p, v) => write!(f, "{p} = {v}"),
        }
    }
}
