//! Property tests over random command scripts.

mod common;

use adventure_core::engine::reachable;
use adventure_core::world::Location;
use proptest::prelude::*;

const COMMANDS: &[&str] = &[
    "north",
    "south",
    "east",
    "west",
    "up",
    "down",
    "take all",
    "drop all",
    "take key",
    "take lamp",
    "take sword",
    "take sack",
    "take egg",
    "drop lamp",
    "drop sword",
    "drop sack",
    "drop key in sack",
    "open mailbox",
    "close mailbox",
    "take leaflet from mailbox",
    "put leaflet in sack",
    "put key in sack",
    "put sack in sack",
    "take key from sack",
    "open chest with key",
    "lock chest with key",
    "open trap door",
    "close trap door",
    "open case",
    "put egg in case",
    "take egg from case",
    "put lamp in sack",
    "turn on lamp",
    "read leaflet",
    "look",
    "inventory",
    "examine me",
    "score",
    "xyzzy",
    "",
];

fn script() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(COMMANDS), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_entity_keeps_exactly_one_location(inputs in script()) {
        let mut g = common::house();
        for input in inputs {
            let moves = g.world().moves();
            let score = g.world().score();
            let r = g.step(input);

            let problems = g.world().location_violations();
            prop_assert!(problems.is_empty(), "after {:?}: {:?}", input, problems);
            prop_assert_eq!(g.world().moves(), moves + u32::from(r.counts_as_move));
            prop_assert!(r.score_delta() >= 0);
            prop_assert_eq!(g.world().score(), score + r.score_delta());
        }
    }

    #[test]
    fn take_and_drop_move_exact_weight(inputs in script()) {
        let mut g = common::house();
        for input in inputs {
            g.step(input);
        }

        let here = g.world().current_scene_id().to_string();
        let loose: Vec<String> = reachable(g.world())
            .into_iter()
            .filter(|e| e.portable && e.location == Location::Scene(here.clone()))
            .map(|e| e.id.clone())
            .collect();

        for id in loose {
            let before = g.world().carried_weight();
            let weight = g.world().total_weight(&id);

            let r = g.step(&format!("take {id}"));
            prop_assert!(r.success, "take {}: {}", id, r.message);
            prop_assert_eq!(g.world().carried_weight(), before + weight);

            let r = g.step(&format!("drop {id}"));
            prop_assert!(r.success, "drop {}: {}", id, r.message);
            prop_assert_eq!(g.world().carried_weight(), before);
        }
    }
}
