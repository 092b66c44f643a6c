use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use super::config::EngineConfig;
use super::model::{
    Archetype, CarryLimit, ContainerProps, Direction, Entity, EntityState, ExitRule, Interaction,
    Lighting, Location, Scene, SizeClass, TreasureProps,
};
use super::script::{Condition, Effect, StateKey, Value};
use super::state::{WorldHeader, WorldState};
use super::validator::validate_world;
use crate::error::{LoadError, RecordError};

/// Upper bound on free-form properties per entity.
pub const MAX_EXTENSION_PROPERTIES: usize = 16;

const DEFAULT_EXIT_MESSAGE: &str = "You can't go that way.";

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize)]
struct WorldFile {
    world: WorldHeaderConfig,
    #[serde(default)]
    engine: EngineConfig,
    #[serde(default)]
    scene: Vec<SceneConfig>, // [[scene]] blocks
    // [[item]] blocks stay raw so one bad record can't sink the file
    #[serde(default)]
    item: Vec<toml::Value>,
}

#[derive(Deserialize)]
struct WorldHeaderConfig {
    id: String,
    name: String,
    start_scene: String,
    #[serde(default)]
    intro: String,
}

#[derive(Deserialize)]
struct SceneConfig {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    first_visit_description: Option<String>,
    #[serde(default)]
    lighting: Option<String>,
    #[serde(default)]
    exits: BTreeMap<String, ExitConfig>, // [scene.exits]
    #[serde(default)]
    atmosphere: Vec<String>,
    #[serde(default)]
    first_visit_points: u32,
    #[serde(default)]
    carry_limit: Option<CarryLimitConfig>, // [scene.carry_limit]
    /// Places entities that carry no initial_location of their own.
    #[serde(default)]
    items: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExitConfig {
    Target(String),
    Detailed(ExitTable),
}

#[derive(Deserialize)]
struct ExitTable {
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    blocked: bool,
}

#[derive(Deserialize)]
struct CarryLimitConfig {
    max_weight: u32,
    directions: Vec<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ItemRecord {
    id: String,
    name: String,

    #[serde(default)]
    aliases: Vec<String>,

    #[serde(default)]
    description: String,

    #[serde(default, alias = "examineText")]
    examine_text: String,

    #[serde(rename = "type")]
    kind: String,

    #[serde(default = "default_true")]
    portable: bool,

    #[serde(default = "default_true")]
    visible: bool,

    #[serde(default)]
    weight: u32,

    #[serde(default)]
    size: Option<String>,

    #[serde(default)]
    tags: Vec<String>,

    #[serde(default)]
    properties: toml::Table,

    #[serde(default)]
    interactions: Vec<InteractionRecord>,

    #[serde(default, alias = "initialLocation")]
    initial_location: Option<String>,

    #[serde(default, alias = "initialState")]
    initial_state: toml::Table,
}

#[derive(Deserialize)]
struct InteractionRecord {
    command: String,
    message: String,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    effect: Option<String>,
}

// Helper for serde default
fn default_true() -> bool {
    true
}

/////////////////////
/// LOAD REPORTING ///
/////////////////////

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position of the record among the file's `[[item]]` blocks.
    pub index: usize,
    pub id: Option<String>,
    pub error: RecordError,
}

/// What happened to each entity record during a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, index: usize, id: Option<String>, error: RecordError) {
        log::warn!(
            "skipping item record #{} ({}): {}",
            index,
            id.as_deref().unwrap_or("<no id>"),
            error
        );
        self.skipped.push(SkippedRecord { index, id, error });
    }
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Public API: load a world from a .toml file on disk.
pub fn load_world_from_file(path: &Path) -> Result<(WorldState, LoadReport), LoadError> {
    let contents = fs::read_to_string(path)?;
    log::info!("loading world file {}", path.display());
    load_world_from_str(&contents)
}

/// Public API: load a world from TOML text.
///
/// Manifest problems (header, engine table, scenes, cross references) fail the
/// whole load. A bad `[[item]]` record is skipped and recorded in the report.
pub fn load_world_from_str(contents: &str) -> Result<(WorldState, LoadReport), LoadError> {
    let world_file: WorldFile = toml::from_str(contents)?;

    // Basic validation
    if world_file.world.id.trim().is_empty() {
        return Err(LoadError::manifest("world.id may not be empty"));
    }
    if world_file.world.start_scene.trim().is_empty() {
        return Err(LoadError::manifest("world.start_scene may not be empty"));
    }

    // Build scenes map
    let mut scenes_map: HashMap<String, Scene> = HashMap::new();
    let mut scene_placements: HashMap<String, String> = HashMap::new();

    for scene_cfg in world_file.scene {
        if scene_cfg.id.trim().is_empty() {
            return Err(LoadError::manifest("scene id may not be empty"));
        }
        if scenes_map.contains_key(&scene_cfg.id) {
            return Err(LoadError::manifest(format!(
                "Duplicate scene id: {}",
                scene_cfg.id
            )));
        }

        for item_id in &scene_cfg.items {
            scene_placements
                .entry(item_id.clone())
                .or_insert_with(|| scene_cfg.id.clone());
        }

        let scene = build_scene(scene_cfg)?;
        scenes_map.insert(scene.id.clone(), scene);
    }

    // Ensure start_scene exists
    if !scenes_map.contains_key(&world_file.world.start_scene) {
        return Err(LoadError::manifest(format!(
            "start_scene '{}' not found among scenes",
            world_file.world.start_scene
        )));
    }

    let mut report = LoadReport::default();
    let entities = build_entities(world_file.item, &scenes_map, &scene_placements, &mut report);

    let header = WorldHeader {
        id: world_file.world.id,
        name: world_file.world.name,
        intro: normalize_multiline_desc(&world_file.world.intro),
        start_scene: world_file.world.start_scene,
    };

    let mut engine = world_file.engine;
    disable_skipped_receptacle(&mut engine, &entities, &report);

    let world = WorldState::assemble(header, engine, scenes_map, entities);

    let errors = validate_world(&world);
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(LoadError::Manifest(joined));
    }

    report.loaded = world.entities().map(|e| e.id.clone()).collect();
    log::info!(
        "world '{}' loaded: {} scenes, {} entities, {} skipped",
        world.id(),
        world.scenes.len(),
        report.loaded.len(),
        report.skipped.len()
    );

    Ok((world, report))
}

/// A receptacle whose own record was skipped turns deposit scoring off
/// instead of failing the load. Ids that never appeared stay fatal.
fn disable_skipped_receptacle(engine: &mut EngineConfig, entities: &[Entity], report: &LoadReport) {
    let Some(receptacle) = engine.scoring_receptacle.as_deref() else {
        return;
    };
    if entities.iter().any(|e| e.id == receptacle) {
        return;
    }
    let skipped = report
        .skipped
        .iter()
        .any(|s| s.id.as_deref() == Some(receptacle));
    if skipped {
        log::warn!(
            "scoring_receptacle '{}' was skipped; deposit scoring is off",
            receptacle
        );
        engine.scoring_receptacle = None;
    }
}

fn build_scene(cfg: SceneConfig) -> Result<Scene, LoadError> {
    let lighting = match cfg.lighting.as_deref() {
        None => Lighting::default(),
        Some(raw) => Lighting::parse(raw).ok_or_else(|| {
            LoadError::manifest(format!("scene '{}' has unknown lighting '{}'", cfg.id, raw))
        })?,
    };

    let mut exits = BTreeMap::new();
    for (dir_raw, exit_cfg) in cfg.exits {
        let direction = Direction::parse(&dir_raw).ok_or_else(|| {
            LoadError::manifest(format!(
                "scene '{}' has an exit with unknown direction '{}'",
                cfg.id, dir_raw
            ))
        })?;

        let rule = build_exit(&cfg.id, direction, exit_cfg)?;
        if exits.insert(direction, rule).is_some() {
            return Err(LoadError::manifest(format!(
                "scene '{}' declares direction '{}' twice",
                cfg.id, direction
            )));
        }
    }

    let carry_limit = match cfg.carry_limit {
        None => None,
        Some(limit) => {
            let mut directions = Vec::new();
            for raw in &limit.directions {
                let dir = Direction::parse(raw).ok_or_else(|| {
                    LoadError::manifest(format!(
                        "scene '{}' carry_limit names unknown direction '{}'",
                        cfg.id, raw
                    ))
                })?;
                directions.push(dir);
            }
            Some(CarryLimit {
                max_weight: limit.max_weight,
                directions,
                message: limit.message.map(|m| normalize_multiline_desc(&m)),
            })
        }
    };

    Ok(Scene {
        id: cfg.id,
        title: cfg.title,
        description: normalize_multiline_desc(&cfg.description),
        first_visit_description: cfg
            .first_visit_description
            .map(|d| normalize_multiline_desc(&d)),
        lighting,
        exits,
        atmosphere: cfg
            .atmosphere
            .iter()
            .map(|a| normalize_multiline_desc(a))
            .filter(|a| !a.is_empty())
            .collect(),
        first_visit_points: cfg.first_visit_points,
        carry_limit,
        contents: Vec::new(),
        visited: false,
    })
}

fn build_exit(scene_id: &str, direction: Direction, cfg: ExitConfig) -> Result<ExitRule, LoadError> {
    let table = match cfg {
        ExitConfig::Target(target) => return Ok(ExitRule::Open { target }),
        ExitConfig::Detailed(table) => table,
    };

    let message = table
        .message
        .map(|m| normalize_multiline_desc(&m))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_EXIT_MESSAGE.to_string());

    if table.blocked {
        if table.target.is_some() || table.condition.is_some() {
            return Err(LoadError::manifest(format!(
                "scene '{}' exit '{}' is blocked but also names a target or condition",
                scene_id, direction
            )));
        }
        return Ok(ExitRule::Blocked { message });
    }

    let target = table.target.filter(|t| !t.trim().is_empty()).ok_or_else(|| {
        LoadError::manifest(format!(
            "scene '{}' exit '{}' has no target",
            scene_id, direction
        ))
    })?;

    match table.condition {
        None => Ok(ExitRule::Open { target }),
        Some(raw) => {
            let condition = Condition::parse(&raw).map_err(|e| {
                LoadError::manifest(format!(
                    "scene '{}' exit '{}' condition '{}': {}",
                    scene_id, direction, raw, e
                ))
            })?;
            Ok(ExitRule::Conditional {
                target,
                condition,
                message,
            })
        }
    }
}

fn normalize_multiline_desc(raw: &str) -> String {
    let mut result = String::new();
    let mut pending_blank_lines = 0usize;
    let mut first_text_seen = false;

    for line in raw.lines() {
        // Indentation in TOML doesn't affect what the player sees.
        let trimmed = line.trim();

        if trimmed.is_empty() {
            pending_blank_lines += 1;
            continue;
        }

        if !first_text_seen {
            result.push_str(trimmed);
            first_text_seen = true;
        } else {
            match pending_blank_lines {
                // Wrapped line: single newline in TOML => space in output
                0 => result.push(' '),
                1 => result.push('\n'),
                _ => result.push_str("\n\n"),
            }
            result.push_str(trimmed);
        }

        pending_blank_lines = 0;
    }

    result
}

////////////////////////////
/// ITEM PARSE HELPERS   ///
////////////////////////////

/// An entity that passed record-level validation but whose location and key
/// references are not resolved yet.
struct Pending {
    index: usize,
    entity: Entity,
    location: Option<String>,
}

fn build_entities(
    raw_items: Vec<toml::Value>,
    scenes: &HashMap<String, Scene>,
    scene_placements: &HashMap<String, String>,
    report: &mut LoadReport,
) -> Vec<Entity> {
    let mut pending: Vec<Pending> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, raw) in raw_items.into_iter().enumerate() {
        let raw_id = raw
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        let record: ItemRecord = match raw.try_into() {
            Ok(r) => r,
            Err(e) => {
                report.skip(index, raw_id, RecordError::Shape(e.to_string()));
                continue;
            }
        };

        let id = record.id.trim().to_string();
        if id.is_empty() {
            report.skip(index, None, RecordError::MissingId);
            continue;
        }
        if seen.contains(&id) {
            report.skip(index, Some(id.clone()), RecordError::DuplicateId(id));
            continue;
        }

        match parse_item(record, scene_placements) {
            Ok((entity, location)) => {
                seen.insert(entity.id.clone());
                pending.push(Pending {
                    index,
                    entity,
                    location,
                });
            }
            Err(err) => report.skip(index, Some(id), err),
        }
    }

    resolve_references(pending, scenes, report)
}

fn parse_item(
    ic: ItemRecord,
    scene_placements: &HashMap<String, String>,
) -> Result<(Entity, Option<String>), RecordError> {
    let id = ic.id.trim().to_string();

    let name = ic.name.trim().to_string();
    if name.is_empty() {
        return Err(RecordError::EmptyName);
    }

    let (archetype, extensions, locked_override) = parse_archetype(&ic.kind, &ic.properties)?;

    let size = match ic.size.as_deref() {
        Some(raw) => SizeClass::parse(raw).ok_or_else(|| RecordError::UnknownSize(raw.to_string()))?,
        None => size_from_weight(ic.weight),
    };

    let mut state = EntityState::defaults_for(&archetype);
    if let Some(locked) = locked_override {
        state.is_locked = locked;
    }
    for (key, raw) in &ic.initial_state {
        let value = scalar(raw).ok_or_else(|| RecordError::InvalidProperty {
            key: format!("initial_state.{key}"),
            reason: "expected a boolean, integer, or string".to_string(),
        })?;
        state.set(&state_key(key), value);
    }

    let interactions = ic
        .interactions
        .into_iter()
        .map(parse_interaction)
        .collect::<Result<Vec<_>, _>>()?;

    let aliases = ic
        .aliases
        .iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    let location = ic
        .initial_location
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty() && l != "unknown")
        .or_else(|| scene_placements.get(&id).cloned());

    let entity = Entity {
        id,
        name,
        aliases,
        description: normalize_multiline_desc(&ic.description),
        examine_text: normalize_multiline_desc(&ic.examine_text),
        archetype,
        portable: ic.portable,
        visible: ic.visible,
        weight: ic.weight,
        size,
        tags: ic.tags.iter().map(|t| t.trim().to_lowercase()).collect(),
        extensions,
        interactions,
        // placeholder until references are resolved
        location: Location::Inventory,
        state,
    };

    Ok((entity, location))
}

fn parse_interaction(rec: InteractionRecord) -> Result<Interaction, RecordError> {
    let command = rec
        .command
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ");

    let invalid = |source| RecordError::InvalidInteraction {
        command: command.clone(),
        source,
    };

    let condition = match rec.condition.as_deref() {
        Some(raw) => Some(Condition::parse(raw).map_err(invalid)?),
        None => None,
    };
    let effect = match rec.effect.as_deref() {
        Some(raw) => Some(Effect::parse(raw).map_err(invalid)?),
        None => None,
    };

    Ok(Interaction {
        command,
        message: normalize_multiline_desc(&rec.message),
        condition,
        effect,
    })
}

type ParsedArchetype = (Archetype, BTreeMap<String, Value>, Option<bool>);

/// Split the open-ended property table into the typed archetype props and a
/// bounded extension map. Also returns an explicit `locked` starting value.
fn parse_archetype(kind: &str, properties: &toml::Table) -> Result<ParsedArchetype, RecordError> {
    let kind_up = kind.trim().to_uppercase();
    let mut container = ContainerProps::default();
    let mut treasure = TreasureProps::default();
    let mut locked = None;
    let mut extensions = BTreeMap::new();

    let is_container = kind_up == "CONTAINER";
    let is_treasure = kind_up == "TREASURE";

    for (key, raw) in properties {
        let invalid = |reason: &str| RecordError::InvalidProperty {
            key: key.clone(),
            reason: reason.to_string(),
        };

        match key.as_str() {
            "openable" | "lockable" | "locked" | "required_key" | "requiredKey" | "capacity"
            | "open_flag" | "openFlag" | "container"
                if !is_container =>
            {
                return Err(invalid("only valid on containers"));
            }
            "deposit_value" | "depositValue" | "value" if !is_treasure => {
                return Err(invalid("only valid on treasures"));
            }
            // The archetype tag already says this.
            "container" => {}
            "openable" => container.openable = raw.as_bool().ok_or_else(|| invalid("expected a boolean"))?,
            "lockable" => container.lockable = raw.as_bool().ok_or_else(|| invalid("expected a boolean"))?,
            "locked" => locked = Some(raw.as_bool().ok_or_else(|| invalid("expected a boolean"))?),
            "required_key" | "requiredKey" => {
                let key_id = raw.as_str().ok_or_else(|| invalid("expected an entity id"))?;
                container.required_key = Some(key_id.trim().to_string());
            }
            "capacity" => container.capacity = Some(non_negative(raw).ok_or_else(|| invalid("expected a non-negative integer"))?),
            "open_flag" | "openFlag" => {
                let flag = raw.as_str().ok_or_else(|| invalid("expected a flag name"))?;
                container.open_flag = Some(flag.trim().to_string());
            }
            "deposit_value" | "depositValue" | "value" => {
                treasure.deposit_value = non_negative(raw).ok_or_else(|| invalid("expected a non-negative integer"))?;
            }
            _ => {
                let value = scalar(raw).ok_or_else(|| invalid("expected a boolean, integer, or string"))?;
                extensions.insert(key.clone(), value);
            }
        }
    }

    if extensions.len() > MAX_EXTENSION_PROPERTIES {
        return Err(RecordError::InvalidProperty {
            key: "properties".to_string(),
            reason: format!(
                "{} free-form properties exceed the limit of {}",
                extensions.len(),
                MAX_EXTENSION_PROPERTIES
            ),
        });
    }

    if locked == Some(true) && !container.lockable {
        return Err(RecordError::InvalidProperty {
            key: "locked".to_string(),
            reason: "container is not lockable".to_string(),
        });
    }

    let archetype = match kind_up.as_str() {
        "TOOL" => Archetype::Tool,
        "WEAPON" => Archetype::Weapon,
        "CONTAINER" => Archetype::Container(container),
        "TREASURE" => Archetype::Treasure(treasure),
        _ => return Err(RecordError::UnknownType(kind.to_string())),
    };

    Ok((archetype, extensions, locked))
}

fn size_from_weight(weight: u32) -> SizeClass {
    match weight {
        0..=5 => SizeClass::Tiny,
        6..=10 => SizeClass::Small,
        11..=20 => SizeClass::Medium,
        21..=40 => SizeClass::Large,
        _ => SizeClass::Huge,
    }
}

fn state_key(name: &str) -> StateKey {
    match name {
        "open" | "isOpen" | "is_open" => StateKey::Open,
        "locked" | "isLocked" | "is_locked" => StateKey::Locked,
        other => StateKey::Extra(other.to_string()),
    }
}

fn scalar(raw: &toml::Value) -> Option<Value> {
    match raw {
        toml::Value::Boolean(b) => Some(Value::Bool(*b)),
        toml::Value::Integer(n) => Some(Value::Int(*n)),
        toml::Value::String(s) => Some(Value::Text(s.clone())),
        _ => None,
    }
}

fn non_negative(raw: &toml::Value) -> Option<u32> {
    raw.as_integer().and_then(|n| u32::try_from(n).ok())
}

/// Turn location strings into `Location`s and drop entities whose
/// container or key vanished, repeating until nothing else falls out.
fn resolve_references(
    pending: Vec<Pending>,
    scenes: &HashMap<String, Scene>,
    report: &mut LoadReport,
) -> Vec<Entity> {
    let containers: HashSet<String> = pending
        .iter()
        .filter(|p| p.entity.archetype.container().is_some())
        .map(|p| p.entity.id.clone())
        .collect();

    let mut resolved: Vec<Pending> = Vec::with_capacity(pending.len());
    for mut p in pending {
        let location = match p.location.as_deref() {
            None => Err(RecordError::NoLocation),
            Some(l) if l.eq_ignore_ascii_case("inventory") => Ok(Location::Inventory),
            Some(l) if scenes.contains_key(l) => Ok(Location::Scene(l.to_string())),
            Some(l) if containers.contains(l) && l != p.entity.id => {
                Ok(Location::Container(l.to_string()))
            }
            Some(l) => Err(RecordError::UnknownLocation(l.to_string())),
        };

        match location {
            Ok(loc) => {
                p.entity.location = loc;
                resolved.push(p);
            }
            Err(err) => report.skip(p.index, Some(p.entity.id.clone()), err),
        }
    }

    loop {
        let alive: HashSet<String> = resolved.iter().map(|p| p.entity.id.clone()).collect();
        let parents: HashMap<String, String> = resolved
            .iter()
            .filter_map(|p| match &p.entity.location {
                Location::Container(parent) => Some((p.entity.id.clone(), parent.clone())),
                _ => None,
            })
            .collect();

        let mut failures: Vec<(usize, RecordError)> = Vec::new();

        for (pos, p) in resolved.iter().enumerate() {
            if let Location::Container(parent) = &p.entity.location {
                if !alive.contains(parent) {
                    failures.push((pos, RecordError::UnknownLocation(parent.clone())));
                    continue;
                }
                if in_cycle(&p.entity.id, &parents) {
                    failures.push((pos, RecordError::UnknownLocation(parent.clone())));
                    continue;
                }
            }

            if let Some(props) = p.entity.archetype.container() {
                if let Some(key) = &props.required_key {
                    if !alive.contains(key) {
                        failures.push((pos, RecordError::UnknownKey(key.clone())));
                    }
                }
            }
        }

        if failures.is_empty() {
            break;
        }

        for (pos, err) in failures.into_iter().rev() {
            let p = resolved.remove(pos);
            report.skip(p.index, Some(p.entity.id), err);
        }
    }

    report.skipped.sort_by_key(|s| s.index);

    resolved.into_iter().map(|p| p.entity).collect()
}

fn in_cycle(start: &str, parents: &HashMap<String, String>) -> bool {
    let mut current = start;
    for _ in 0..=parents.len() {
        match parents.get(current) {
            Some(parent) if parent == start => return true,
            Some(parent) => current = parent.as_str(),
            None => return false,
        }
    }
    true
}
