pub mod engine;
pub mod world;

mod error;

use std::path::Path;

pub use engine::{CommandResult, execute};
pub use error::{CommandError, LoadError, RecordError, ScriptError};
pub use world::{LoadReport, WorldState, load_world_from_file, load_world_from_str};

/// One running game: a world plus the turn loop around it.
pub struct Game {
    world: WorldState,
}

impl Game {
    pub fn new(world: WorldState) -> Self {
        Game { world }
    }

    /// Load a world file and start a game on it. Skipped records are logged
    /// by the loader and handed back for the caller to report.
    pub fn from_file(path: impl AsRef<Path>) -> Result<(Self, LoadReport), LoadError> {
        let (world, report) = load_world_from_file(path.as_ref())?;
        Ok((Game::new(world), report))
    }

    /// The opening text: the world's intro followed by the first look.
    /// Counts as a visit to the start scene, not as a move.
    pub fn initialize(&mut self) -> CommandResult {
        let intro = self.world.intro().trim().to_string();
        let mut look = execute(&mut self.world, "look");
        if !intro.is_empty() {
            look.message = format!("{}\n\n{}", intro, look.message);
        }
        look
    }

    /// Process a single player input.
    pub fn step(&mut self, input: &str) -> CommandResult {
        execute(&mut self.world, input)
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    /// For collaborators that flip world flags between turns.
    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut self.world
    }

    pub fn into_world(self) -> WorldState {
        self.world
    }
}
