mod conditions;
mod containers;
mod dispatch;
mod helpers;
mod interactions;
mod items;
mod movement;
mod output;
mod render;
mod resolver;
mod scoring;
mod vocabulary;

pub use conditions::{condition_holds, lookup};
pub use dispatch::execute;
pub use helpers::list_names;
pub use output::CommandResult;
pub use render::light_present;
pub use resolver::{matches, reachable, resolve};
pub use scoring::deposit_flag;
pub use vocabulary::{Command, Modifier, Parsed, Preposition, Verb, normalize, parse};
