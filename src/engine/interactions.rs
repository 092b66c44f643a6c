use crate::engine::conditions::{apply_effect, condition_holds};
use crate::engine::containers::publish_open_flag;
use crate::engine::output::Outcome;
use crate::engine::resolver::{reachable, resolve};
use crate::error::CommandError;
use crate::world::{Effect, Entity, Path, StateKey, WorldState};

/// Longest interaction command that the input starts with, among entities in
/// scope. Returns the command and the leftover words.
fn split_command<'w>(world: &WorldState, words: &'w [String]) -> Option<(String, &'w [String])> {
    let known: Vec<String> = reachable(world)
        .iter()
        .flat_map(|e| e.interactions.iter())
        .map(|i| i.command.trim().to_lowercase())
        .collect();

    (1..=words.len()).rev().find_map(|k| {
        let phrase = words[..k].join(" ");
        known.contains(&phrase).then(|| (phrase, &words[k..]))
    })
}

/// Runs a custom interaction for input that isn't a built-in verb.
/// `None` means nothing in scope knows this command.
pub(crate) fn try_custom(
    world: &mut WorldState,
    words: &[String],
) -> Option<Result<Outcome, CommandError>> {
    let (command, rest) = split_command(world, words)?;
    Some(run(world, &command, rest))
}

fn run(world: &mut WorldState, command: &str, rest: &[String]) -> Result<Outcome, CommandError> {
    let fragment = rest.join(" ");
    if fragment.trim().is_empty() {
        return Err(CommandError::NotFound(format!("What do you want to {command}?")));
    }

    let view: &WorldState = world;
    let knows = |e: &Entity| {
        e.interactions
            .iter()
            .any(|i| i.command.trim().eq_ignore_ascii_case(command))
    };
    let owner = match resolve(view, &fragment, knows) {
        Some(entity) => entity,
        None => {
            // Something by that name is here, it just doesn't do that.
            return Err(match resolve(view, &fragment, |_| true) {
                Some(other) => CommandError::Unsupported(format!(
                    "You can't {} the {}.",
                    command, other.name
                )),
                None => CommandError::NotFound(format!("You can't see any {fragment} here.")),
            });
        }
    };

    let owner_id = owner.id.clone();
    let chosen = owner
        .interactions
        .iter()
        .filter(|i| i.command.trim().eq_ignore_ascii_case(command))
        .find(|i| {
            i.condition
                .as_ref()
                .is_none_or(|c| condition_holds(view, Some(&owner_id), c))
        })
        .map(|i| (i.message.clone(), i.effect.clone()));

    let Some((message, effect)) = chosen else {
        return Err(CommandError::PreconditionFailed("Nothing happens.".to_string()));
    };

    if let Some(effect) = &effect {
        apply_effect(world, &owner_id, effect);
        let Effect::Assign(path, _) = effect;
        if matches!(path, Path::State(StateKey::Open)) {
            publish_open_flag(world, &owner_id);
        }
    }
    log::debug!("interaction '{}' on {}", command, owner_id);

    Ok(Outcome::said(message))
}
