use crate::engine::vocabulary::Command;
use crate::error::CommandError;
use crate::world::{Entity, WorldState};

/// "a", "a and b", "a, b and c"
pub fn list_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

pub fn is_self_reference(fragment: &str) -> bool {
    matches!(fragment.trim(), "me" | "self" | "myself")
}

/// The command's object, or the "What do you want to X?" prompt.
pub(crate) fn object_of(cmd: &Command) -> Result<&str, CommandError> {
    cmd.object
        .as_deref()
        .ok_or_else(|| CommandError::NotFound(format!("What do you want to {}?", cmd.verb.as_str())))
}

pub(crate) fn not_here(fragment: &str) -> CommandError {
    CommandError::NotFound(format!("You can't see any {fragment} here."))
}

/// Visible contents of a container, by name, declared order.
pub(crate) fn visible_contents<'a>(world: &'a WorldState, container_id: &str) -> Vec<&'a str> {
    world
        .contents_of(container_id)
        .into_iter()
        .filter(|e| e.visible)
        .map(|e| e.name.as_str())
        .collect()
}

/// Owned copies of the bits a handler needs after it starts mutating.
pub(crate) fn id_and_name(entity: &Entity) -> (String, String) {
    (entity.id.clone(), entity.name.clone())
}
