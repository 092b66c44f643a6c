use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::model::{Entity, Location, Scene};

/// The whole mutable world: entity and scene tables, inventory, flags,
/// score and move counter.
///
/// Callers read through the accessors. Mutation happens inside the engine,
/// with the exception of [`WorldState::set_flag`], which exists for
/// collaborating subsystems (combat, scripted events) at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) intro: String,
    pub(crate) config: EngineConfig,
    pub(crate) current_scene: String,
    pub(crate) inventory: Vec<String>,
    pub(crate) score: i32,
    pub(crate) moves: u32,
    pub(crate) flags: BTreeMap<String, bool>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) entity_index: HashMap<String, usize>,
    pub(crate) scenes: HashMap<String, Scene>,
}

pub(crate) struct WorldHeader {
    pub id: String,
    pub name: String,
    pub intro: String,
    pub start_scene: String,
}

impl WorldState {
    /// Build the runtime world. Scene content lists and the inventory are
    /// derived from entity locations in declared order.
    pub(crate) fn assemble(
        header: WorldHeader,
        config: EngineConfig,
        mut scenes: HashMap<String, Scene>,
        entities: Vec<Entity>,
    ) -> Self {
        let mut entity_index = HashMap::with_capacity(entities.len());
        let mut inventory = Vec::new();

        for scene in scenes.values_mut() {
            scene.contents.clear();
        }

        for (idx, entity) in entities.iter().enumerate() {
            entity_index.insert(entity.id.clone(), idx);
            match &entity.location {
                Location::Scene(scene_id) => {
                    if let Some(scene) = scenes.get_mut(scene_id) {
                        scene.contents.push(entity.id.clone());
                    }
                }
                Location::Inventory => inventory.push(entity.id.clone()),
                Location::Container(_) => {}
            }
        }

        WorldState {
            id: header.id,
            name: header.name,
            intro: header.intro,
            config,
            current_scene: header.start_scene,
            inventory,
            score: 0,
            moves: 0,
            flags: BTreeMap::new(),
            entities,
            entity_index,
            scenes,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intro(&self) -> &str {
        &self.intro
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_scene_id(&self) -> &str {
        &self.current_scene
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.scenes.get(&self.current_scene)
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.scenes.get(id)
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entity_index.get(id).map(|&idx| &self.entities[idx])
    }

    /// All entities in declared order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Carried entity ids in pick-up order.
    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    /// Undefined flags are false.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        let name = name.into();
        log::debug!("flag {} = {}", name, value);
        self.flags.insert(name, value);
    }

    /// Entities directly inside a container, in declared order.
    pub fn contents_of(&self, container_id: &str) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|e| matches!(&e.location, Location::Container(parent) if parent == container_id))
            .collect()
    }

    /// Weight of an entity plus everything nested inside it.
    pub fn total_weight(&self, id: &str) -> u32 {
        let own = self.entity(id).map(|e| e.weight).unwrap_or(0);
        self.contents_of(id)
            .iter()
            .fold(own, |acc, child| acc.saturating_add(self.total_weight(&child.id)))
    }

    pub fn carried_weight(&self) -> u32 {
        self.inventory
            .iter()
            .fold(0u32, |acc, id| acc.saturating_add(self.total_weight(id)))
    }

    pub fn is_carried(&self, id: &str) -> bool {
        matches!(self.entity(id).map(|e| &e.location), Some(Location::Inventory))
    }

    /// Carried directly, or inside something that is.
    pub fn is_held(&self, id: &str) -> bool {
        self.is_carried(id) || self.inventory.iter().any(|held| self.is_inside(id, held))
    }

    /// True if `id` sits somewhere inside `ancestor`, at any depth.
    pub fn is_inside(&self, id: &str, ancestor: &str) -> bool {
        let mut current = id;
        // Bounded by entity count so a corrupt snapshot cannot spin forever.
        for _ in 0..self.entities.len() {
            match self.entity(current).map(|e| &e.location) {
                Some(Location::Container(parent)) => {
                    if parent == ancestor {
                        return true;
                    }
                    current = parent.as_str();
                }
                _ => return false,
            }
        }
        false
    }

    /// Every breach of "one entity, exactly one location". Empty when consistent.
    pub fn location_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for entity in &self.entities {
            let in_inventory = self.inventory.iter().filter(|id| *id == &entity.id).count();
            let in_scenes = self
                .scenes
                .values()
                .map(|s| s.contents.iter().filter(|id| *id == &entity.id).count())
                .sum::<usize>();

            let (want_inventory, want_scenes) = match &entity.location {
                Location::Inventory => (1, 0),
                Location::Scene(scene_id) => {
                    let listed = self
                        .scenes
                        .get(scene_id)
                        .map(|s| s.contents.contains(&entity.id))
                        .unwrap_or(false);
                    if !listed {
                        problems.push(format!(
                            "'{}' claims scene '{}' but is not listed there",
                            entity.id, scene_id
                        ));
                    }
                    (0, 1)
                }
                Location::Container(parent) => {
                    match self.entity(parent) {
                        Some(p) if p.archetype.container().is_some() => {}
                        _ => problems.push(format!(
                            "'{}' claims container '{}' which is not a container",
                            entity.id, parent
                        )),
                    }
                    (0, 0)
                }
            };

            if in_inventory != want_inventory || in_scenes != want_scenes {
                problems.push(format!(
                    "'{}' is listed {} time(s) in the inventory and {} time(s) in scenes",
                    entity.id, in_inventory, in_scenes
                ));
            }
        }

        problems
    }

    //////////////////////////
    /// ENGINE-SIDE WRITES ///
    //////////////////////////

    pub(crate) fn entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        match self.entity_index.get(id) {
            Some(&idx) => Some(&mut self.entities[idx]),
            None => None,
        }
    }

    pub(crate) fn scene_mut(&mut self, id: &str) -> Option<&mut Scene> {
        self.scenes.get_mut(id)
    }

    /// The single place an entity changes location. Keeps the inventory list
    /// and scene content lists in step with `Entity::location`.
    pub(crate) fn relocate(&mut self, id: &str, to: Location) {
        let from = match self.entity(id) {
            Some(e) => e.location.clone(),
            None => return,
        };

        match &from {
            Location::Inventory => self.inventory.retain(|i| i != id),
            Location::Scene(scene_id) => {
                if let Some(scene) = self.scenes.get_mut(scene_id) {
                    scene.contents.retain(|i| i != id);
                }
            }
            Location::Container(_) => {}
        }

        match &to {
            Location::Inventory => self.inventory.push(id.to_string()),
            Location::Scene(scene_id) => {
                if let Some(scene) = self.scenes.get_mut(scene_id) {
                    scene.contents.push(id.to_string());
                }
            }
            Location::Container(_) => {}
        }

        log::debug!("relocate {}: {:?} -> {:?}", id, from, to);

        if let Some(entity) = self.entity_mut(id) {
            entity.location = to;
        }
    }

    pub(crate) fn enter_scene(&mut self, id: &str) {
        self.current_scene = id.to_string();
    }

    pub(crate) fn add_score(&mut self, points: u32) -> i32 {
        let delta = i32::try_from(points).unwrap_or(i32::MAX);
        self.score = self.score.saturating_add(delta);
        delta
    }

    pub(crate) fn count_move(&mut self) {
        self.moves = self.moves.saturating_add(1);
    }
}
