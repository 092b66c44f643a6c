use crate::engine::output::{CommandResult, Outcome};
use crate::engine::vocabulary::{Command, Parsed, Verb, normalize, parse};
use crate::engine::{containers, interactions, items, movement, render, scoring};
use crate::error::CommandError;
use crate::world::WorldState;

/// Process one line of player input against the world.
///
/// Never fails: every problem comes back as `success: false` with the
/// player-facing message. The move counter is advanced here and only here.
pub fn execute(world: &mut WorldState, input: &str) -> CommandResult {
    match parse(input) {
        Parsed::Empty => CommandResult::fail("I beg your pardon?", false),
        Parsed::Unknown(words) => match interactions::try_custom(world, &words) {
            Some(result) => finish(world, result, true),
            None => {
                log::debug!("unknown command: {:?}", input);
                CommandResult::fail("I don't understand that.", false)
            }
        },
        Parsed::Command(cmd) => {
            // "climb tree", "move rug": a move verb with no direction may
            // belong to something in scope.
            if cmd.verb == Verb::Move && cmd.direction.is_none() && cmd.object.is_some() {
                if let Some(result) = interactions::try_custom(world, &normalize(input)) {
                    return finish(world, result, true);
                }
            }
            log::debug!("dispatch {:?}", cmd);
            let result = run(world, &cmd);
            finish(world, result, cmd.verb.counts_as_move())
        }
    }
}

fn run(world: &mut WorldState, cmd: &Command) -> Result<Outcome, CommandError> {
    match cmd.verb {
        Verb::Open => containers::open(world, cmd),
        Verb::Close => containers::close(world, cmd),
        Verb::Lock => containers::lock(world, cmd),
        Verb::Take => items::take(world, cmd),
        Verb::Drop => items::drop(world, cmd),
        Verb::Put => items::put(world, cmd),
        Verb::Examine => items::examine(world, cmd),
        Verb::Inventory => items::inventory(world),
        Verb::Look => render::look(world),
        Verb::Move => movement::go(world, cmd.direction),
        Verb::Score => scoring::report(world),
    }
}

fn finish(
    world: &mut WorldState,
    result: Result<Outcome, CommandError>,
    counts_as_move: bool,
) -> CommandResult {
    if counts_as_move {
        world.count_move();
    }
    match result {
        Ok(outcome) => CommandResult::ok(outcome.message(), counts_as_move).with_score(outcome.score),
        Err(err) => {
            log::debug!("command failed: {:?}", err);
            CommandResult::fail(err.to_string(), counts_as_move)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::load_world_from_str;

    const WORLD: &str = r#"
        [world]
        id = "dispatch"
        name = "Dispatch"
        start_scene = "porch"

        [[scene]]
        id = "porch"
        title = "Porch"
        description = "A creaky porch."
        [scene.exits]
        north = "hall"

        [[scene]]
        id = "hall"
        title = "Hall"
        description = "A dusty hall."
        [scene.exits]
        south = "porch"

        [[item]]
        id = "leaflet"
        name = "leaflet"
        type = "TOOL"
        initial_location = "porch"
        [[item.interactions]]
        command = "read"
        message = "WELCOME TO THE PORCH!"
        effect = "flags.read_leaflet = true"

        [[item]]
        id = "bell"
        name = "brass bell"
        type = "TOOL"
        initial_location = "porch"
        [[item.interactions]]
        command = "ring"
        message = "Ding!"
        condition = "!state.cracked"
        effect = "state.cracked = true"

        [[item]]
        id = "rug"
        name = "oriental rug"
        type = "TOOL"
        portable = false
        initial_location = "porch"
        [[item.interactions]]
        command = "move"
        message = "Moving the rug reveals a trap door."
        condition = "!rug_moved"
        effect = "flags.rug_moved = true"
    "#;

    fn world() -> WorldState {
        load_world_from_str(WORLD).expect("fixture loads").0
    }

    #[test]
    fn empty_and_unknown_input_are_free() {
        let mut w = world();
        let r = execute(&mut w, "");
        assert!(!r.success);
        assert_eq!(r.message, "I beg your pardon?");

        let r = execute(&mut w, "xyzzy");
        assert!(!r.success);
        assert_eq!(r.message, "I don't understand that.");
        assert!(!r.counts_as_move);
        assert_eq!(w.moves(), 0);
    }

    #[test]
    fn informational_verbs_never_count() {
        let mut w = world();
        for input in ["look", "inventory", "examine leaflet", "score", "x nothing"] {
            let r = execute(&mut w, input);
            assert!(!r.counts_as_move, "{input}");
        }
        assert_eq!(w.moves(), 0);
    }

    #[test]
    fn failed_actions_still_count() {
        let mut w = world();
        let r = execute(&mut w, "take unicorn");
        assert!(!r.success);
        assert!(r.counts_as_move);
        let r = execute(&mut w, "west");
        assert_eq!(r.message, "You can't go that way.");
        let r = execute(&mut w, "go");
        assert_eq!(r.message, "Where do you want to go?");
        assert_eq!(w.moves(), 3);
    }

    #[test]
    fn custom_interactions_apply_effects_once() {
        let mut w = world();
        let r = execute(&mut w, "read the leaflet");
        assert!(r.success);
        assert_eq!(r.message, "WELCOME TO THE PORCH!");
        assert!(w.flag("read_leaflet"));

        assert!(execute(&mut w, "ring bell").success);
        let r = execute(&mut w, "ring bell");
        assert!(!r.success);
        assert_eq!(r.message, "Nothing happens.");
        assert_eq!(w.moves(), 3);

        let r = execute(&mut w, "ring leaflet");
        assert!(!r.success);
        assert_eq!(r.message, "You can't ring the leaflet.");
    }

    #[test]
    fn move_verbs_fall_through_to_interactions() {
        let mut w = world();
        let r = execute(&mut w, "move the rug");
        assert!(r.success, "{}", r.message);
        assert_eq!(r.message, "Moving the rug reveals a trap door.");
        assert!(r.counts_as_move);
        assert!(w.flag("rug_moved"));
        assert_eq!(w.current_scene_id(), "porch");

        let r = execute(&mut w, "move rug");
        assert!(!r.success);
        assert_eq!(r.message, "Nothing happens.");

        let r = execute(&mut w, "move north");
        assert!(r.success, "{}", r.message);
        assert_eq!(w.current_scene_id(), "hall");
        assert_eq!(w.moves(), 3);

        let r = execute(&mut w, "climb tree");
        assert!(!r.success);
        assert_eq!(r.message, "Where do you want to go?");
    }

    #[test]
    fn score_reports_moves() {
        let mut w = world();
        execute(&mut w, "north");
        let r = execute(&mut w, "score");
        assert_eq!(r.message, "Your score is 0 in 1 move.");
        assert_eq!(r.score_change, None);
    }
}
