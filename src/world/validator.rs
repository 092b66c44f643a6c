use super::model::{ExitRule, Location};
use super::state::WorldState;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

/// Cross-reference checks that need the assembled world. Anything returned
/// here is a manifest-level problem.
pub fn validate_world(world: &WorldState) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    // Scenes must not be empty
    if world.scenes.is_empty() {
        errors.push(ValidationError::new("world has no scenes"));
    }

    // start scene must exist
    if world.scene(world.current_scene_id()).is_none() {
        errors.push(ValidationError::new(format!(
            "start_scene '{}' not found among scenes",
            world.current_scene_id()
        )));
    }

    // Validate exits
    for (scene_id, scene) in &world.scenes {
        for (direction, rule) in &scene.exits {
            if let Some(target) = rule.target() {
                if world.scene(target).is_none() {
                    errors.push(ValidationError::new(format!(
                        "scene '{}' exit '{}' targets missing scene '{}'",
                        scene_id, direction, target
                    )));
                }
            }
            if let ExitRule::Conditional { condition, .. } = rule {
                if !matches!(condition.path(), super::script::Path::Flag(_)) {
                    errors.push(ValidationError::new(format!(
                        "scene '{}' exit '{}' condition '{}' must test a world flag",
                        scene_id, direction, condition
                    )));
                }
            }
        }

        if let Some(limit) = &scene.carry_limit {
            for direction in &limit.directions {
                if !scene.exits.contains_key(direction) {
                    log::warn!(
                        "scene '{}' carry_limit gates '{}', which has no exit",
                        scene_id,
                        direction
                    );
                }
            }
        }
    }

    // Scoring receptacle
    if let Some(receptacle) = &world.config().scoring_receptacle {
        match world.entity(receptacle) {
            Some(e) if e.archetype.container().is_some() => {}
            Some(_) => errors.push(ValidationError::new(format!(
                "scoring_receptacle '{}' is not a container",
                receptacle
            ))),
            None => errors.push(ValidationError::new(format!(
                "scoring_receptacle '{}' is not a loaded entity",
                receptacle
            ))),
        }
    }

    for entity in world.entities() {
        if let Location::Container(parent) = &entity.location {
            if parent == &entity.id {
                errors.push(ValidationError::new(format!(
                    "entity '{}' cannot start inside itself",
                    entity.id
                )));
            }
        }

        if let Some(props) = entity.archetype.container() {
            if props.open_flag.is_some() && !props.openable {
                log::warn!(
                    "container '{}' mirrors an open flag but can never be closed",
                    entity.id
                );
            }
            if props.lockable && props.required_key.is_none() {
                log::warn!("container '{}' is lockable but has no key", entity.id);
            }
        }
    }

    for problem in world.location_violations() {
        errors.push(ValidationError::new(problem));
    }

    errors
}
