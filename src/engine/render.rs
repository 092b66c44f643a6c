use crate::engine::conditions::condition_holds;
use crate::engine::output::Outcome;
use crate::engine::resolver::reachable;
use crate::engine::scoring;
use crate::error::CommandError;
use crate::world::{ExitRule, StateKey, WorldState};

const DARKNESS: &str = "It is pitch black. You are likely to be eaten by a grue.";

/// "look": render the current scene and count it as a visit.
pub(crate) fn look(world: &mut WorldState) -> Result<Outcome, CommandError> {
    let mut out = Outcome::new();
    render_scene(world, &mut out);
    let delta = scoring::visit_current(world);
    out.scored(delta);
    Ok(out)
}

/// True when some lit light source is within reach.
pub fn light_present(world: &WorldState) -> bool {
    let tag = world.config().light_tag.as_str();
    let lit = StateKey::Extra("lit".to_string());
    reachable(world)
        .iter()
        .any(|e| e.has_tag(tag) && e.state.get(&lit).truthy())
}

/// Title, description, entities lying here, an atmosphere line and the exits.
/// Reads the visited flag but does not set it.
pub(crate) fn render_scene(world: &WorldState, out: &mut Outcome) {
    let Some(scene) = world.current_scene() else {
        out.say("You are nowhere at all.");
        return;
    };

    out.say(scene.title.clone());

    if scene.lighting.needs_light() && !light_present(world) {
        out.say(DARKNESS);
        return;
    }

    let description = match &scene.first_visit_description {
        Some(first) if !scene.visited => first,
        _ => &scene.description,
    };
    out.say(description.trim());

    for entity in scene.contents.iter().filter_map(|id| world.entity(id)) {
        if !entity.visible {
            continue;
        }
        let line = entity.description.trim();
        if line.is_empty() {
            out.say(format!("There is a {} here.", entity.name));
        } else {
            out.say(line);
        }
    }

    if !scene.atmosphere.is_empty() {
        let pick = stable_hash_u64(u64::from(world.moves()), &scene.id) % scene.atmosphere.len() as u64;
        if let Some(line) = scene.atmosphere.get(pick as usize) {
            out.say(line.trim());
        }
    }

    let open_exits: Vec<&str> = scene
        .exits
        .iter()
        .filter(|(_, rule)| match rule {
            ExitRule::Open { .. } => true,
            ExitRule::Conditional { condition, .. } => condition_holds(world, None, condition),
            ExitRule::Blocked { .. } => false,
        })
        .map(|(dir, _)| dir.as_str())
        .collect();

    if open_exits.is_empty() {
        out.say("Exits: (none)");
    } else {
        out.say(format!("Exits: {}", open_exits.join(", ")));
    }
}

/// Deterministic per turn and scene; not cryptographic.
fn stable_hash_u64(turn_index: u64, s: &str) -> u64 {
    let mut h = 1469598103934665603u64 ^ turn_index;
    for b in s.as_bytes() {
        h ^= *b as u64;
        h = h.wrapping_mul(1099511628211u64);
    }
    h
}
