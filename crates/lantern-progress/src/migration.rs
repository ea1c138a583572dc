//! Save-format version migrations.
//!
//! Each registered step rewrites a JSON record from version `N` to `N + 1`.
//! The registry chains steps to bring an old record up to the current
//! [`FORMAT_VERSION`](crate::save::FORMAT_VERSION).

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Errors that can occur during migration.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("no migration path from version {from} to version {to}")]
    NoMigrationPath { from: u32, to: u32 },
    #[error("migration from version {from} to version {to} failed: {reason}")]
    MigrationFailed { from: u32, to: u32, reason: String },
}

/// A function that transforms a record from one version to the next.
pub type MigrationFn = fn(Value) -> Result<Value, MigrationError>;

/// Registry of migration functions keyed by source version.
pub struct MigrationRegistry {
    migrations: BTreeMap<u32, MigrationFn>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self {
            migrations: BTreeMap::new(),
        }
    }

    /// Every migration the current build knows about.
    pub fn standard() -> Self {
        let mut reg = Self::new();
        reg.register(1, v1_to_v2);
        reg
    }

    /// Register a migration function from `from_version` to `from_version + 1`.
    pub fn register(&mut self, from_version: u32, migrate: MigrationFn) {
        self.migrations.insert(from_version, migrate);
    }

    pub fn can_migrate(&self, from: u32, to: u32) -> bool {
        if from >= to {
            return from == to;
        }
        (from..to).all(|v| self.migrations.contains_key(&v))
    }

    /// Migrate `record` from version `from` to version `to`.
    pub fn migrate(&self, record: Value, from: u32, to: u32) -> Result<Value, MigrationError> {
        if from == to {
            return Ok(record);
        }
        if from > to {
            return Err(MigrationError::NoMigrationPath { from, to });
        }
        let mut current = record;
        for version in from..to {
            let step = self
                .migrations
                .get(&version)
                .ok_or(MigrationError::NoMigrationPath { from, to })?;
            current = step(current)?;
        }
        Ok(current)
    }

    pub fn step_count(&self) -> usize {
        self.migrations.len()
    }
}

impl Default for MigrationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Version 1 field names and their version 2 replacements.
const V1_RENAMES: [(&str, &str); 5] = [
    ("idx", "current_index"),
    ("gears", "gear_count"),
    ("unlockedCompanions", "unlocked_companions"),
    ("usedSkills", "used_skills"),
    ("usedItems", "used_items"),
];

/// Version 1 stored the state flat, with camelCase names and `idx`/`gears`
/// for the chapter index and gear count, and `visited` as an id -> bool map.
/// Version 2 wraps it in an envelope.
fn v1_to_v2(record: Value) -> Result<Value, MigrationError> {
    let Value::Object(mut flat) = record else {
        return Err(MigrationError::MigrationFailed {
            from: 1,
            to: 2,
            reason: "record is not an object".into(),
        });
    };
    flat.remove("version");
    for (old, new) in V1_RENAMES {
        if let Some(v) = flat.remove(old) {
            flat.insert(new.to_owned(), v);
        }
    }
    if let Some(Value::Object(visited)) = flat.remove("visited") {
        let ids: Vec<Value> = visited
            .into_iter()
            .filter(|(_, seen)| seen.as_bool() == Some(true))
            .map(|(id, _)| Value::String(id))
            .collect();
        flat.insert("visited".to_owned(), Value::Array(ids));
    }
    let mut envelope = Map::new();
    envelope.insert("version".to_owned(), Value::from(2));
    envelope.insert("state".to_owned(), Value::Object(flat));
    Ok(Value::Object(envelope))
}
