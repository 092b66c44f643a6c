use std::collections::HashSet;

use crate::world::{Entity, Location, WorldState};

/// How strongly a fragment matched; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Id,
    Name,
    Partial,
}

/// Everything the player can refer to right now, in declared order:
/// visible entities lying in the current scene, the inventory, and the
/// contents of any open container among those, at any depth.
pub fn reachable(world: &WorldState) -> Vec<&Entity> {
    let scene_id = world.current_scene_id();
    let mut ids: HashSet<&str> = world
        .entities()
        .filter(|e| match &e.location {
            Location::Scene(s) => s == scene_id && e.visible,
            Location::Inventory => true,
            Location::Container(_) => false,
        })
        .map(|e| e.id.as_str())
        .collect();

    loop {
        let before = ids.len();
        for entity in world.entities() {
            if let Location::Container(parent) = &entity.location {
                if !entity.visible || ids.contains(entity.id.as_str()) {
                    continue;
                }
                let parent_open = ids.contains(parent.as_str())
                    && world.entity(parent).is_some_and(Entity::is_open_container);
                if parent_open {
                    ids.insert(entity.id.as_str());
                }
            }
        }
        if ids.len() == before {
            break;
        }
    }

    world
        .entities()
        .filter(|e| ids.contains(e.id.as_str()))
        .collect()
}

fn clean(fragment: &str) -> String {
    fragment
        .split_whitespace()
        .filter(|w| !matches!(*w, "the" | "a" | "an"))
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every word of the fragment is a prefix of some word in the phrase, or the
/// whole fragment occurs in it.
fn partial_match(phrase: &str, fragment: &str) -> bool {
    if phrase.contains(fragment) {
        return true;
    }
    let words: Vec<&str> = phrase.split_whitespace().collect();
    fragment
        .split_whitespace()
        .all(|fw| words.iter().any(|w| w.starts_with(fw)))
}

fn tier(entity: &Entity, fragment: &str) -> Option<Tier> {
    let id = entity.id.to_lowercase();
    if id == fragment || id == fragment.replace(' ', "_") {
        return Some(Tier::Id);
    }

    let names: Vec<String> = std::iter::once(&entity.name)
        .chain(entity.aliases.iter())
        .map(|n| clean(n))
        .filter(|n| !n.is_empty())
        .collect();

    if names.iter().any(|n| n == fragment) {
        Some(Tier::Name)
    } else if names.iter().any(|n| partial_match(n, fragment)) {
        Some(Tier::Partial)
    } else {
        None
    }
}

/// All entities in scope that match at the best tier found, declared order.
pub fn matches<'a, F>(world: &'a WorldState, fragment: &str, filter: F) -> Vec<&'a Entity>
where
    F: Fn(&Entity) -> bool,
{
    let fragment = clean(fragment);
    if fragment.is_empty() {
        return Vec::new();
    }

    let scored: Vec<(&Entity, Tier)> = reachable(world)
        .into_iter()
        .filter(|e| filter(e))
        .filter_map(|e| tier(e, &fragment).map(|t| (e, t)))
        .collect();

    let Some(best) = scored.iter().map(|(_, t)| *t).min() else {
        return Vec::new();
    };

    scored
        .into_iter()
        .filter(|(_, t)| *t == best)
        .map(|(e, _)| e)
        .collect()
}

/// Resolve a fragment to one entity. Ties go to the entity declared first.
pub fn resolve<'a, F>(world: &'a WorldState, fragment: &str, filter: F) -> Option<&'a Entity>
where
    F: Fn(&Entity) -> bool,
{
    matches(world, fragment, filter).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::load_world_from_str;

    const WORLD: &str = r#"
        [world]
        id = "resolver"
        name = "Resolver"
        start_scene = "hall"

        [[scene]]
        id = "hall"
        title = "Hall"
        description = "A hall."

        [[scene]]
        id = "attic"
        title = "Attic"
        description = "An attic."

        [[item]]
        id = "brass_key"
        name = "brass key"
        aliases = ["key"]
        type = "TOOL"
        initial_location = "hall"

        [[item]]
        id = "iron_key"
        name = "iron key"
        aliases = ["key"]
        type = "TOOL"
        initial_location = "inventory"

        [[item]]
        id = "chest"
        name = "oak chest"
        type = "CONTAINER"
        initial_location = "hall"
        [item.properties]
        openable = true

        [[item]]
        id = "coin"
        name = "gold coin"
        type = "TREASURE"
        initial_location = "chest"

        [[item]]
        id = "ghost"
        name = "ghostly key"
        type = "TOOL"
        visible = false
        initial_location = "hall"

        [[item]]
        id = "map"
        name = "map"
        type = "TOOL"
        initial_location = "attic"
    "#;

    fn world() -> WorldState {
        load_world_from_str(WORLD).expect("fixture loads").0
    }

    #[test]
    fn scope_excludes_closed_containers_and_other_scenes() {
        let mut w = world();
        let ids: Vec<&str> = reachable(&w).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["brass_key", "iron_key", "chest"]);

        w.entity_mut("chest").expect("chest").state.is_open = true;
        let ids: Vec<&str> = reachable(&w).iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["brass_key", "iron_key", "chest", "coin"]);
    }

    #[test]
    fn multi_word_fragments_pick_the_right_key() {
        let w = world();
        assert_eq!(resolve(&w, "iron key", |_| true).map(|e| e.id.as_str()), Some("iron_key"));
        assert_eq!(resolve(&w, "brass key", |_| true).map(|e| e.id.as_str()), Some("brass_key"));
    }

    #[test]
    fn ties_break_by_declared_order() {
        let w = world();
        let found = matches(&w, "key", |_| true);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, "brass_key");
    }

    #[test]
    fn exact_id_beats_partial_name() {
        let w = world();
        assert_eq!(resolve(&w, "chest", |_| true).map(|e| e.id.as_str()), Some("chest"));
        assert_eq!(resolve(&w, "the oak", |_| true).map(|e| e.id.as_str()), Some("chest"));
        assert_eq!(resolve(&w, "BRASS_KEY", |_| true).map(|e| e.id.as_str()), Some("brass_key"));
    }

    #[test]
    fn nothing_found_out_of_scope() {
        let w = world();
        assert!(resolve(&w, "map", |_| true).is_none());
        assert!(resolve(&w, "ghostly", |_| true).is_none());
        assert!(resolve(&w, "coin", |_| true).is_none());
        assert!(resolve(&w, "", |_| true).is_none());
    }
}
