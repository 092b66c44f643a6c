use crate::engine::helpers::{id_and_name, list_names, not_here, object_of, visible_contents};
use crate::engine::output::Outcome;
use crate::engine::resolver::resolve;
use crate::engine::vocabulary::{Command, Preposition};
use crate::error::CommandError;
use crate::world::{ContainerProps, WorldState};

/// Copy a container's open state into its mirrored world flag, if any.
pub(crate) fn publish_open_flag(world: &mut WorldState, id: &str) {
    let Some((flag, is_open)) = world.entity(id).and_then(|e| {
        e.archetype
            .container()
            .and_then(|p| p.open_flag.clone())
            .map(|flag| (flag, e.state.is_open))
    }) else {
        return;
    };
    world.set_flag(flag, is_open);
}

struct Target {
    id: String,
    name: String,
    props: ContainerProps,
    is_open: bool,
    is_locked: bool,
}

/// Resolve the object of open/close and make sure it can be opened at all.
fn openable_target(world: &WorldState, cmd: &Command) -> Result<Target, CommandError> {
    let fragment = object_of(cmd)?;
    let entity = resolve(world, fragment, |_| true).ok_or_else(|| not_here(fragment))?;

    match entity.archetype.container() {
        Some(props) if props.openable => Ok(Target {
            id: entity.id.clone(),
            name: entity.name.clone(),
            props: props.clone(),
            is_open: entity.state.is_open,
            is_locked: entity.state.is_locked,
        }),
        _ => Err(CommandError::Unsupported(format!(
            "You can't {} the {}.",
            cmd.verb.as_str(),
            entity.name
        ))),
    }
}

/// Checks a "with <key>" modifier against the target's required key: the key
/// must be held and must be the right one.
fn check_key(world: &WorldState, target: &Target, key_fragment: &str) -> Result<String, CommandError> {
    let carried = resolve(world, key_fragment, |e| world.is_held(&e.id));
    let (key_id, key_name) = match carried {
        Some(key) => id_and_name(key),
        None => {
            let name = resolve(world, key_fragment, |_| true)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| key_fragment.to_string());
            return Err(CommandError::PreconditionFailed(format!(
                "You don't have the {name}."
            )));
        }
    };

    if target.props.required_key.as_deref() != Some(key_id.as_str()) {
        return Err(CommandError::PreconditionFailed(format!(
            "The {} doesn't fit the {}.",
            key_name, target.name
        )));
    }
    Ok(key_name)
}

pub(crate) fn open(world: &mut WorldState, cmd: &Command) -> Result<Outcome, CommandError> {
    let target = openable_target(world, cmd)?;

    if target.is_open {
        return Err(CommandError::AlreadyInState(format!(
            "The {} is already open.",
            target.name
        )));
    }

    let mut out = Outcome::new();
    if target.is_locked {
        let Some(key_fragment) = cmd.modifier_with(Preposition::With) else {
            return Err(CommandError::PreconditionFailed(format!(
                "The {} is locked.",
                target.name
            )));
        };
        let key_name = check_key(world, &target, key_fragment)?;
        out.say(format!(
            "You unlock the {} with the {} and open it.",
            target.name, key_name
        ));
    } else {
        out.say(format!("You open the {}.", target.name));
    }

    if let Some(entity) = world.entity_mut(&target.id) {
        entity.state.is_locked = false;
        entity.state.is_open = true;
    }
    publish_open_flag(world, &target.id);

    let inside = visible_contents(world, &target.id);
    if !inside.is_empty() {
        out.say(format!("Inside you see {}.", list_names(&inside)));
    }
    Ok(out)
}

pub(crate) fn close(world: &mut WorldState, cmd: &Command) -> Result<Outcome, CommandError> {
    let target = openable_target(world, cmd)?;

    let message = match cmd.modifier_with(Preposition::With) {
        Some(key_fragment) => {
            if !target.props.lockable {
                return Err(CommandError::Unsupported(format!(
                    "The {} can't be locked.",
                    target.name
                )));
            }
            if target.is_locked {
                return Err(CommandError::AlreadyInState(format!(
                    "The {} is already locked.",
                    target.name
                )));
            }
            check_key(world, &target, key_fragment)?;
            if target.is_open {
                format!("You close and lock the {}.", target.name)
            } else {
                format!("You lock the {}.", target.name)
            }
        }
        None => {
            if !target.is_open {
                return Err(CommandError::AlreadyInState(format!(
                    "The {} is already closed.",
                    target.name
                )));
            }
            format!("You close the {}.", target.name)
        }
    };

    let lock = cmd.modifier_with(Preposition::With).is_some();
    if let Some(entity) = world.entity_mut(&target.id) {
        entity.state.is_open = false;
        if lock {
            entity.state.is_locked = true;
        }
    }
    publish_open_flag(world, &target.id);

    Ok(Outcome::said(message))
}

/// "lock X with K". Without a key there is nothing to lock it with.
pub(crate) fn lock(world: &mut WorldState, cmd: &Command) -> Result<Outcome, CommandError> {
    openable_target(world, cmd)?;
    if cmd.modifier_with(Preposition::With).is_none() {
        return Err(CommandError::PreconditionFailed(
            "What do you want to lock it with?".to_string(),
        ));
    }
    close(world, cmd)
}
