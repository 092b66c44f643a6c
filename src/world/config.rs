use serde::{Deserialize, Serialize};

pub const DEFAULT_LIGHT_TAG: &str = "light_source";
pub const DEFAULT_CARRY_MESSAGE: &str = "You are carrying too much weight to go that way.";

/// Engine settings read from the optional `[engine]` table of a world file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Entity id of the container that awards deposit scoring.
    #[serde(default)]
    pub scoring_receptacle: Option<String>,

    #[serde(default)]
    pub max_score: Option<u32>,

    /// Entities with this tag light up dark scenes while their `lit` state is truthy.
    #[serde(default = "default_light_tag")]
    pub light_tag: String,

    /// Fallback message for carry limits that don't set their own.
    #[serde(default = "default_carry_message")]
    pub carry_message: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            scoring_receptacle: None,
            max_score: None,
            light_tag: default_light_tag(),
            carry_message: default_carry_message(),
        }
    }
}

fn default_light_tag() -> String {
    DEFAULT_LIGHT_TAG.to_string()
}

fn default_carry_message() -> String {
    DEFAULT_CARRY_MESSAGE.to_string()
}
