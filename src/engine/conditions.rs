use crate::world::{Condition, Effect, Path, Value, WorldState};

/// Look up a path. `owner` is the entity whose `state.*` paths refer to;
/// without one, state paths read as false.
pub fn lookup(world: &WorldState, owner: Option<&str>, path: &Path) -> Value {
    match path {
        Path::Flag(name) => Value::Bool(world.flag(name)),
        Path::State(key) => owner
            .and_then(|id| world.entity(id))
            .map(|e| e.state.get(key))
            .unwrap_or(Value::Bool(false)),
    }
}

pub fn condition_holds(world: &WorldState, owner: Option<&str>, condition: &Condition) -> bool {
    match condition {
        Condition::Truthy(path) => lookup(world, owner, path).truthy(),
        Condition::Negate(path) => !lookup(world, owner, path).truthy(),
    }
}

pub(crate) fn apply_effect(world: &mut WorldState, owner: &str, effect: &Effect) {
    let Effect::Assign(path, value) = effect;
    match path {
        Path::Flag(name) => world.set_flag(name.clone(), value.truthy()),
        Path::State(key) => {
            if let Some(entity) = world.entity_mut(owner) {
                entity.state.set(key, value.clone());
            }
            log::debug!("{}: {} = {}", owner, path, value);
        }
    }
}
