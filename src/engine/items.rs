use crate::engine::helpers::{
    id_and_name, is_self_reference, list_names, not_here, object_of, visible_contents,
};
use crate::engine::output::Outcome;
use crate::engine::resolver::{reachable, resolve};
use crate::engine::scoring;
use crate::engine::vocabulary::{Command, Preposition};
use crate::error::CommandError;
use crate::world::{Archetype, Entity, Location, StateKey, WorldState};

//////////////
/// TAKING ///
//////////////

pub(crate) fn take(world: &mut WorldState, cmd: &Command) -> Result<Outcome, CommandError> {
    let fragment = object_of(cmd)?;
    let source = match cmd.modifier_with(Preposition::From) {
        Some(container) => Some(open_container(world, container)?),
        None => None,
    };

    if fragment == "all" {
        return take_all(world, source.as_ref().map(|(id, _)| id.as_str()));
    }

    let in_source = |e: &Entity| match &source {
        Some((cid, _)) => matches!(&e.location, Location::Container(p) if p == cid),
        None => true,
    };

    // Prefer something not yet carried, so "take key" with one key in hand
    // and another on the floor picks up the second.
    let (id, name) = match resolve(world, fragment, |e| !world.is_carried(&e.id) && in_source(e)) {
        Some(entity) => id_and_name(entity),
        None => {
            if let Some(held) = resolve(world, fragment, |e| world.is_carried(&e.id)) {
                return Err(CommandError::AlreadyInState(format!(
                    "You already have the {}.",
                    held.name
                )));
            }
            return Err(match &source {
                Some((_, cname)) => {
                    CommandError::NotFound(format!("There's no {fragment} in the {cname}."))
                }
                None => not_here(fragment),
            });
        }
    };

    pick_up(world, &id, &name)?;
    Ok(Outcome::said(format!("You take the {name}.")))
}

fn pick_up(world: &mut WorldState, id: &str, name: &str) -> Result<(), CommandError> {
    let portable = world.entity(id).is_some_and(|e| e.portable);
    if !portable {
        return Err(CommandError::Unsupported(format!("You can't take the {name}.")));
    }
    world.relocate(id, Location::Inventory);
    Ok(())
}

fn take_all(world: &mut WorldState, source: Option<&str>) -> Result<Outcome, CommandError> {
    let scene_id = world.current_scene_id().to_string();
    let candidates: Vec<(String, String)> = reachable(world)
        .into_iter()
        .filter(|e| e.portable)
        .filter(|e| match source {
            Some(cid) => matches!(&e.location, Location::Container(p) if p == cid),
            None => matches!(&e.location, Location::Scene(s) if *s == scene_id),
        })
        .map(id_and_name)
        .collect();

    if candidates.is_empty() {
        return Err(CommandError::NotFound(
            "There is nothing here you can take.".to_string(),
        ));
    }

    let mut out = Outcome::new();
    for (id, name) in candidates {
        world.relocate(&id, Location::Inventory);
        out.say(format!("{name}: Taken."));
    }
    Ok(out)
}

/// Resolve a container fragment that must name an open container in scope.
fn open_container(world: &WorldState, fragment: &str) -> Result<(String, String), CommandError> {
    let entity = resolve(world, fragment, |_| true).ok_or_else(|| not_here(fragment))?;
    if entity.archetype.container().is_none() {
        return Err(CommandError::Unsupported(format!(
            "The {} can't hold anything.",
            entity.name
        )));
    }
    if !entity.is_open_container() {
        return Err(CommandError::PreconditionFailed(format!(
            "The {} is closed.",
            entity.name
        )));
    }
    Ok(id_and_name(entity))
}

////////////////
/// DROPPING ///
////////////////

/// A top-level inventory entity, or "You don't have ...".
fn carried(world: &WorldState, fragment: &str) -> Result<(String, String), CommandError> {
    if let Some(entity) = resolve(world, fragment, |e| world.is_carried(&e.id)) {
        return Ok(id_and_name(entity));
    }
    let name = resolve(world, fragment, |_| true)
        .map(|e| format!("the {}", e.name))
        .unwrap_or_else(|| "that".to_string());
    Err(CommandError::PreconditionFailed(format!("You don't have {name}.")))
}

pub(crate) fn drop(world: &mut WorldState, cmd: &Command) -> Result<Outcome, CommandError> {
    let fragment = object_of(cmd)?;

    if fragment == "all" && cmd.modifier.is_none() {
        return drop_all(world);
    }

    let (id, name) = carried(world, fragment)?;

    match &cmd.modifier {
        Some(m) if m.prep.is_placement() => place_in(world, &id, &name, &m.object),
        Some(_) => Err(CommandError::Unsupported(format!(
            "You can't drop the {name} like that."
        ))),
        None => {
            let scene_id = world.current_scene_id().to_string();
            world.relocate(&id, Location::Scene(scene_id));
            Ok(Outcome::said(format!("You drop the {name}.")))
        }
    }
}

fn drop_all(world: &mut WorldState) -> Result<Outcome, CommandError> {
    let held: Vec<(String, String)> = world
        .inventory()
        .iter()
        .filter_map(|id| world.entity(id))
        .map(id_and_name)
        .collect();

    if held.is_empty() {
        return Err(CommandError::NotFound(
            "You aren't carrying anything.".to_string(),
        ));
    }

    let scene_id = world.current_scene_id().to_string();
    let mut out = Outcome::new();
    for (id, name) in held {
        world.relocate(&id, Location::Scene(scene_id.clone()));
        out.say(format!("{name}: Dropped."));
    }
    Ok(out)
}

///////////////
/// PUTTING ///
///////////////

pub(crate) fn put(world: &mut WorldState, cmd: &Command) -> Result<Outcome, CommandError> {
    let fragment = object_of(cmd)?;
    let (id, name) = carried(world, fragment)?;

    match &cmd.modifier {
        Some(m) if m.prep.is_placement() => place_in(world, &id, &name, &m.object),
        _ => Err(CommandError::NotFound(format!(
            "Where do you want to put the {name}?"
        ))),
    }
}

/// Shared by "put X in Y" and "drop X in Y". Every check happens before the
/// entity moves.
fn place_in(
    world: &mut WorldState,
    item_id: &str,
    item_name: &str,
    container_fragment: &str,
) -> Result<Outcome, CommandError> {
    let container = resolve(world, container_fragment, |_| true)
        .ok_or_else(|| not_here(container_fragment))?;
    let (cid, cname) = id_and_name(container);

    let Some(props) = container.archetype.container() else {
        return Err(CommandError::Unsupported(format!(
            "You can't put anything in the {cname}."
        )));
    };
    if cid == item_id {
        return Err(CommandError::Unsupported(format!(
            "You can't put the {item_name} inside itself."
        )));
    }
    if world.is_inside(&cid, item_id) {
        return Err(CommandError::PreconditionFailed(format!(
            "The {cname} is inside the {item_name}."
        )));
    }
    if !container.is_open_container() {
        return Err(CommandError::PreconditionFailed(format!("The {cname} is closed.")));
    }
    if let Some(capacity) = props.capacity {
        let held: u32 = world
            .contents_of(&cid)
            .iter()
            .map(|e| world.total_weight(&e.id))
            .sum();
        if held.saturating_add(world.total_weight(item_id)) > capacity {
            return Err(CommandError::PreconditionFailed(format!(
                "There's no room in the {cname}."
            )));
        }
    }

    world.relocate(item_id, Location::Container(cid.clone()));
    let delta = scoring::on_deposit(world, item_id, &cid);

    let mut out = Outcome::said(format!("You put the {item_name} in the {cname}."));
    out.scored(delta);
    Ok(out)
}

/////////////////
/// EXAMINING ///
/////////////////

pub(crate) fn examine(world: &mut WorldState, cmd: &Command) -> Result<Outcome, CommandError> {
    let fragment = object_of(cmd)?;
    if is_self_reference(fragment) {
        let mut out = Outcome::said("You look as adventurous as ever.");
        describe_inventory(world, &mut out);
        return Ok(out);
    }

    let entity = resolve(world, fragment, |_| true).ok_or_else(|| not_here(fragment))?;
    let mut out = Outcome::new();

    let text = [entity.examine_text.trim(), entity.description.trim()]
        .into_iter()
        .find(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("You see nothing special about the {}.", entity.name));
    out.say(text);

    if let Archetype::Container(props) = &entity.archetype {
        if props.openable {
            let state = match (entity.state.is_open, entity.state.is_locked) {
                (true, _) => "open",
                (false, true) => "closed and locked",
                (false, false) => "closed",
            };
            out.say(format!("The {} is {}.", entity.name, state));
        }
        if entity.is_open_container() {
            let inside = visible_contents(world, &entity.id);
            if inside.is_empty() {
                out.say(format!("The {} is empty.", entity.name));
            } else {
                out.say(format!("The {} contains {}.", entity.name, list_names(&inside)));
            }
        }
    }

    if entity.has_tag(&world.config().light_tag) {
        let lit = entity.state.get(&StateKey::Extra("lit".to_string())).truthy();
        out.say(if lit { "It is on." } else { "It is off." });
    }

    Ok(out)
}

/////////////////
/// INVENTORY ///
/////////////////

pub(crate) fn inventory(world: &mut WorldState) -> Result<Outcome, CommandError> {
    let mut out = Outcome::new();
    describe_inventory(world, &mut out);
    Ok(out)
}

fn describe_inventory(world: &WorldState, out: &mut Outcome) {
    if world.inventory().is_empty() {
        out.say("You are empty-handed.");
        return;
    }

    out.say("You are carrying:");
    for entity in world.inventory().iter().filter_map(|id| world.entity(id)) {
        out.say(format!("  {}", entity.name));
        if entity.is_open_container() {
            let inside = visible_contents(world, &entity.id);
            if !inside.is_empty() {
                out.say(format!("    (containing {})", list_names(&inside)));
            }
        }
    }
    out.say(format!("Total weight: {}.", world.carried_weight()));
}
