use crate::engine::output::Outcome;
use crate::error::CommandError;
use crate::world::WorldState;

/// Flag that records a treasure has already paid out.
pub fn deposit_flag(entity_id: &str) -> String {
    format!("deposited:{entity_id}")
}

/// Marks the current scene visited and pays its first-visit bonus once.
/// Returns the score delta.
pub(crate) fn visit_current(world: &mut WorldState) -> i32 {
    let scene_id = world.current_scene_id().to_string();
    let Some(scene) = world.scene_mut(&scene_id) else {
        return 0;
    };
    if scene.visited {
        return 0;
    }
    scene.visited = true;

    let points = scene.first_visit_points;
    if points == 0 {
        return 0;
    }
    log::info!("first visit to '{}': +{}", scene_id, points);
    world.add_score(points)
}

/// Pays a treasure's deposit value when it lands in the open scoring
/// receptacle for the first time. Returns the score delta.
pub(crate) fn on_deposit(world: &mut WorldState, item_id: &str, container_id: &str) -> i32 {
    if world.config().scoring_receptacle.as_deref() != Some(container_id) {
        return 0;
    }
    if !world.entity(container_id).is_some_and(|c| c.is_open_container()) {
        return 0;
    }
    let Some(value) = world
        .entity(item_id)
        .and_then(|e| e.archetype.treasure())
        .map(|t| t.deposit_value)
    else {
        return 0;
    };

    let flag = deposit_flag(item_id);
    if world.flag(&flag) {
        return 0;
    }
    world.set_flag(flag, true);
    log::info!("'{}' deposited in '{}': +{}", item_id, container_id, value);
    world.add_score(value)
}

pub(crate) fn report(world: &WorldState) -> Result<Outcome, CommandError> {
    let moves = world.moves();
    let unit = if moves == 1 { "move" } else { "moves" };
    let line = match world.config().max_score {
        Some(max) => format!(
            "Your score is {} (out of {}) in {} {}.",
            world.score(),
            max,
            moves,
            unit
        ),
        None => format!("Your score is {} in {} {}.", world.score(), moves, unit),
    };
    Ok(Outcome::said(line))
}
