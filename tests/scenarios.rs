//! End-to-end play through the house fixture.

mod common;

use adventure_core::world::Location;
use common::{house, run_ok};

#[test]
fn initialize_shows_intro_and_start_scene() {
    let mut g = house();
    let r = g.initialize();
    assert!(r.success);
    assert!(r.message.starts_with("Welcome to a very small adventure."));
    assert!(r.message.contains("West of House"));
    assert!(r.message.contains("open field west of a white house, with a boarded front door."));
    assert!(r.message.contains("Exits: east"));
    assert!(!r.counts_as_move);
    assert_eq!(g.world().moves(), 0);
}

#[test]
fn opening_a_box_twice() {
    let mut g = house();
    run_ok(&mut g, &["east"]);

    let r = g.step("open wooden box");
    assert!(r.success, "{}", r.message);
    assert!(r.message.contains("open"));
    assert!(g.world().entity("wooden_box").unwrap().state.is_open);

    let r = g.step("open the wooden box");
    assert!(!r.success);
    assert!(r.message.contains("already open"));
    assert!(r.counts_as_move);

    run_ok(&mut g, &["close wooden box"]);
    let r = g.step("close wooden box");
    assert!(!r.success);
    assert!(r.message.contains("already closed"));
    assert!(!g.world().entity("wooden_box").unwrap().state.is_open);
}

#[test]
fn locked_chest_needs_the_right_key() {
    let mut g = house();
    run_ok(&mut g, &["east"]);

    let r = g.step("open chest");
    assert!(!r.success);
    assert!(r.message.contains("locked"));

    let r = g.step("open chest with key");
    assert!(!r.success);
    assert!(r.message.contains("don't have"), "{}", r.message);

    run_ok(&mut g, &["take lamp"]);
    let r = g.step("open chest with lamp");
    assert!(!r.success);
    assert_eq!(r.message, "The brass lantern doesn't fit the iron chest.");

    run_ok(&mut g, &["west", "take key", "east"]);
    let r = g.step("unlock the chest with the brass key");
    assert!(r.success, "{}", r.message);
    assert!(r.message.contains("jewel-encrusted egg"));

    let chest = g.world().entity("chest").unwrap();
    assert!(!chest.state.is_locked);
    assert!(chest.state.is_open);
}

#[test]
fn chest_can_be_locked_again() {
    let mut g = house();
    run_ok(&mut g, &["take key", "east", "open chest with key"]);

    let moves = g.world().moves();
    let r = g.step("lock chest");
    assert!(!r.success);
    assert_eq!(r.message, "What do you want to lock it with?");
    assert!(r.counts_as_move);
    assert_eq!(g.world().moves(), moves + 1);
    let chest = g.world().entity("chest").unwrap();
    assert!(!chest.state.is_locked);
    assert!(chest.state.is_open);

    let r = g.step("lock chest with key");
    assert!(r.success, "{}", r.message);
    assert_eq!(r.message, "You close and lock the iron chest.");

    let chest = g.world().entity("chest").unwrap();
    assert!(chest.state.is_locked);
    assert!(!chest.state.is_open);

    let r = g.step("lock chest with key");
    assert!(!r.success);
    assert!(r.message.contains("already locked"));
}

#[test]
fn heavy_load_blocks_the_stairs() {
    let mut g = house();
    run_ok(&mut g, &["east", "take sword", "take lamp"]);
    assert_eq!(g.world().carried_weight(), 24);

    let moves = g.world().moves();
    let r = g.step("up");
    assert!(!r.success);
    assert!(r.message.contains("carrying too much"));
    assert!(r.counts_as_move);
    assert_eq!(g.world().current_scene_id(), "living_room");
    assert_eq!(g.world().moves(), moves + 1);

    run_ok(&mut g, &["drop sword"]);
    assert_eq!(g.world().carried_weight(), 8);

    let r = g.step("up");
    assert!(r.success, "{}", r.message);
    assert_eq!(g.world().current_scene_id(), "attic");
    assert!(r.message.starts_with("Attic"));
}

#[test]
fn trap_door_gates_the_cellar() {
    let mut g = house();
    run_ok(&mut g, &["east"]);

    let moves = g.world().moves();
    let r = g.step("down");
    assert!(!r.success);
    assert_eq!(r.message, "The trap door is closed.");
    assert_eq!(g.world().current_scene_id(), "living_room");
    assert_eq!(g.world().moves(), moves + 1);

    run_ok(&mut g, &["open trap door"]);
    assert!(g.world().flag("trap_door_open"));

    let r = g.step("go down");
    assert!(r.success, "{}", r.message);
    assert_eq!(g.world().current_scene_id(), "cellar");
    assert_eq!(g.world().moves(), moves + 3);
    assert!(r.message.contains("pitch black"));

    // Closing it again shuts the way back down.
    run_ok(&mut g, &["up", "close trap door"]);
    assert!(!g.world().flag("trap_door_open"));
    assert!(!g.step("down").success);
}

#[test]
fn flags_set_from_outside_open_exits() {
    let mut g = house();
    run_ok(&mut g, &["east"]);
    g.world_mut().set_flag("trap_door_open", true);

    let r = g.step("d");
    assert!(r.success);
    assert_eq!(g.world().current_scene_id(), "cellar");
}

#[test]
fn negated_exit_condition_closes_once_the_flag_is_set() {
    let mut g = house();
    run_ok(&mut g, &["east", "up"]);

    let moves = g.world().moves();
    let r = g.step("west");
    assert!(r.success, "{}", r.message);
    assert_eq!(g.world().current_scene_id(), "kitchen");
    assert_eq!(g.world().moves(), moves + 1);

    run_ok(&mut g, &["east"]);
    g.world_mut().set_flag("window_boarded", true);

    let moves = g.world().moves();
    let r = g.step("west");
    assert!(!r.success);
    assert_eq!(r.message, "Boards cover the attic window.");
    assert!(r.counts_as_move);
    assert_eq!(g.world().current_scene_id(), "attic");
    assert_eq!(g.world().moves(), moves + 1);
}

#[test]
fn blocked_exits_never_open() {
    let mut g = house();
    let r = g.step("north");
    assert!(!r.success);
    assert_eq!(r.message, "The forest is too thick to pass.");
    assert!(r.counts_as_move);
    assert_eq!(g.world().current_scene_id(), "west_of_house");

    let r = g.step("south");
    assert_eq!(r.message, "You can't go that way.");
    assert_eq!(g.world().moves(), 2);
}

#[test]
fn lantern_lights_the_cellar() {
    let mut g = house();
    run_ok(&mut g, &["east", "take lamp", "turn on lamp", "open trap door"]);
    assert!(g.world().entity("lamp").unwrap().state.extra.contains_key("lit"));

    let r = g.step("down");
    assert!(r.success);
    assert!(r.message.contains("You stumble down a ramp"));
    assert!(!r.message.contains("pitch black"));

    let r = g.step("turn on lamp");
    assert!(!r.success);
    assert_eq!(r.message, "Nothing happens.");

    run_ok(&mut g, &["up", "down"]);
    let r = g.step("look");
    assert!(r.message.contains("You are in a dark and damp cellar."));
    assert!(!r.message.contains("stumble"));
}

#[test]
fn containers_take_and_give_back() {
    let mut g = house();

    let r = g.step("take leaflet");
    assert!(!r.success);

    let r = g.step("open mailbox");
    assert!(r.success);
    assert!(r.message.contains("Inside you see leaflet."));

    run_ok(&mut g, &["take leaflet from mailbox"]);
    assert!(g.world().is_carried("leaflet"));

    let r = g.step("read leaflet");
    assert!(r.success);
    assert_eq!(r.message, "WELCOME TO THE WHITE HOUSE!");

    run_ok(&mut g, &["put leaflet in mailbox"]);
    assert_eq!(
        g.world().entity("leaflet").unwrap().location,
        Location::Container("mailbox".to_string())
    );

    run_ok(&mut g, &["close mailbox"]);
    let r = g.step("examine mailbox");
    assert!(r.success);
    assert!(r.message.contains("The small mailbox is closed."));
}

#[test]
fn sack_rules() {
    let mut g = house();
    run_ok(&mut g, &["take sack", "take key"]);

    let r = g.step("put sack in sack");
    assert!(!r.success);
    assert!(r.message.contains("inside itself"));

    run_ok(&mut g, &["put key in sack"]);
    assert_eq!(g.world().carried_weight(), 3);
    assert_eq!(g.world().inventory(), ["sack".to_string()]);

    run_ok(&mut g, &["east", "take lamp"]);
    let r = g.step("put lamp in bag");
    assert!(!r.success);
    assert!(r.message.contains("no room"));
    assert!(g.world().is_carried("lamp"));

    // Keys inside an open sack are still in reach.
    run_ok(&mut g, &["open chest with key"]);

    let r = g.step("put wooden box in sack");
    assert!(!r.success);
    assert!(r.message.contains("don't have"));
}

#[test]
fn take_all_and_drop_all() {
    let mut g = house();
    let r = g.step("take all");
    assert!(r.success);
    assert!(r.message.contains("brass key: Taken."));
    assert!(r.message.contains("brown sack: Taken."));
    assert_eq!(g.world().inventory().len(), 2);

    let r = g.step("take all");
    assert!(!r.success);

    run_ok(&mut g, &["east", "drop all"]);
    assert!(g.world().inventory().is_empty());
    assert_eq!(
        g.world().entity("sack").unwrap().location,
        Location::Scene("living_room".to_string())
    );
}

#[test]
fn examining_things_and_yourself() {
    let mut g = house();
    run_ok(&mut g, &["take sack", "take key", "put key in sack"]);

    let r = g.step("examine me");
    assert!(r.success);
    assert!(r.message.contains("You are carrying:"));
    assert!(r.message.contains("brown sack"));
    assert!(r.message.contains("(containing brass key)"));
    assert!(r.message.contains("Total weight: 3."));

    let r = g.step("x sack");
    assert!(r.message.contains("The brown sack contains brass key."));

    let r = g.step("i");
    assert!(r.success);
    assert!(!r.counts_as_move);

    let r = g.step("examine unicorn");
    assert!(!r.success);
    assert_eq!(r.message, "You can't see any unicorn here.");
    assert!(!r.counts_as_move);
}

#[test]
fn take_refuses_fixtures_and_duplicates() {
    let mut g = house();
    let r = g.step("take mailbox");
    assert!(!r.success);
    assert_eq!(r.message, "You can't take the small mailbox.");

    run_ok(&mut g, &["take key"]);
    let r = g.step("take key");
    assert!(!r.success);
    assert_eq!(r.message, "You already have the brass key.");

    let r = g.step("take");
    assert_eq!(r.message, "What do you want to take?");
    assert!(r.counts_as_move);
}
