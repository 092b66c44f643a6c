use crate::engine::conditions::condition_holds;
use crate::engine::output::Outcome;
use crate::engine::render::render_scene;
use crate::engine::scoring;
use crate::error::CommandError;
use crate::world::{Direction, ExitRule, WorldState};

/// Try to leave the current scene. Checks, in order: an exit exists, the
/// carried weight is within the scene's limit for that direction, the exit
/// is not blocked, and its condition holds.
pub(crate) fn go(world: &mut WorldState, direction: Option<Direction>) -> Result<Outcome, CommandError> {
    let Some(direction) = direction else {
        return Err(CommandError::NotFound("Where do you want to go?".to_string()));
    };

    let scene = world
        .current_scene()
        .ok_or_else(|| CommandError::Unsupported("You can't go anywhere from here.".to_string()))?;

    let rule = scene
        .exits
        .get(&direction)
        .ok_or_else(|| CommandError::NotFound("You can't go that way.".to_string()))?;

    if let Some(limit) = scene.carry_limit.as_ref().filter(|l| l.gates(direction)) {
        let carried = world.carried_weight();
        if carried > limit.max_weight {
            log::debug!(
                "{} blocked by weight: {} > {}",
                direction,
                carried,
                limit.max_weight
            );
            let message = limit
                .message
                .clone()
                .unwrap_or_else(|| world.config().carry_message.clone());
            return Err(CommandError::PreconditionFailed(message));
        }
    }

    let target = match rule {
        ExitRule::Open { target } => target.clone(),
        ExitRule::Blocked { message } => {
            return Err(CommandError::PreconditionFailed(message.clone()));
        }
        ExitRule::Conditional {
            target,
            condition,
            message,
        } => {
            if !condition_holds(world, None, condition) {
                return Err(CommandError::PreconditionFailed(message.clone()));
            }
            target.clone()
        }
    };

    if world.scene(&target).is_none() {
        return Err(CommandError::Unsupported(format!(
            "You try to go {}, but something feels wrong.",
            direction
        )));
    }

    log::debug!("move {}: {} -> {}", direction, world.current_scene_id(), target);
    world.enter_scene(&target);

    let mut out = Outcome::new();
    render_scene(world, &mut out);
    let delta = scoring::visit_current(world);
    out.scored(delta);
    Ok(out)
}
