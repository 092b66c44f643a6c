mod config;
mod loader;
mod model;
mod script;
mod state;
mod validator;

pub use config::EngineConfig;
pub use loader::{
    LoadReport, MAX_EXTENSION_PROPERTIES, SkippedRecord, load_world_from_file, load_world_from_str,
};

// Minimal, intentional surface area: re-export only what the game/engine uses.
pub use model::{
    Archetype, CarryLimit, ContainerProps, Direction, Entity, EntityState, ExitRule, Interaction,
    Lighting, Location, Scene, SizeClass, TreasureProps,
};
pub use script::{Condition, Effect, Path, StateKey, Value};
pub use state::WorldState;
pub use validator::{ValidationError, validate_world};
