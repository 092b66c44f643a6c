mod common;

use adventure_core::engine::deposit_flag;
use common::{house, run_ok};

#[test]
fn treasure_pays_out_once() {
    let mut g = house();
    run_ok(&mut g, &["take key", "east", "open chest with key", "take egg"]);

    let r = g.step("put egg in case");
    assert!(!r.success);
    assert_eq!(r.message, "The trophy case is closed.");
    assert_eq!(r.score_change, None);

    run_ok(&mut g, &["open case"]);
    let r = g.step("put egg in case");
    assert!(r.success, "{}", r.message);
    assert_eq!(r.score_change, Some(10));
    assert_eq!(g.world().score(), 10);
    assert!(g.world().flag(&deposit_flag("egg")));

    run_ok(&mut g, &["take egg"]);
    let r = g.step("put egg in case");
    assert!(r.success);
    assert_eq!(r.score_change, None);
    assert_eq!(r.score_delta(), 0);

    run_ok(&mut g, &["take egg"]);
    let r = g.step("drop egg in case");
    assert!(r.success);
    assert_eq!(r.score_change, None);

    let r = g.step("put key in case");
    assert!(r.success);
    assert_eq!(r.score_change, None);
    assert_eq!(g.world().score(), 10);
}

#[test]
fn taking_and_dropping_never_score() {
    let mut g = house();
    for input in ["take key", "drop key", "take sack", "east", "drop sack"] {
        let r = g.step(input);
        assert!(r.success);
        assert_eq!(r.score_change, None, "{input}");
    }
    assert_eq!(g.world().score(), 0);
}

#[test]
fn first_visit_pays_once() {
    let mut g = house();
    let r = g.initialize();
    assert_eq!(r.score_change, None);

    run_ok(&mut g, &["east", "open trap door"]);
    let r = g.step("down");
    assert_eq!(r.score_change, Some(25));
    assert!(g.world().scene("cellar").unwrap().visited);

    let r = g.step("look");
    assert_eq!(r.score_change, None);

    run_ok(&mut g, &["up"]);
    let r = g.step("down");
    assert_eq!(r.score_change, None);
    assert_eq!(g.world().score(), 25);
}

#[test]
fn score_verb_reports_progress() {
    let mut g = house();
    run_ok(&mut g, &["east", "open trap door", "down"]);

    let r = g.step("score");
    assert!(r.success);
    assert!(!r.counts_as_move);
    assert_eq!(
        r.message,
        format!("Your score is 25 (out of 35) in {} moves.", g.world().moves())
    );
}

#[test]
fn result_serializes_camel_case() {
    let mut g = house();
    run_ok(&mut g, &["east", "open trap door"]);
    let r = g.step("down");

    let table = toml::Value::try_from(&r).expect("serializes");
    assert_eq!(table.get("countsAsMove").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(table.get("scoreChange").and_then(|v| v.as_integer()), Some(25));

    let r = g.step("look");
    let table = toml::Value::try_from(&r).expect("serializes");
    assert!(table.get("scoreChange").is_none());
}
