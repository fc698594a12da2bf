use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// The four database tables whose names get colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Actor,
    Enemy,
    Item,
    Skill,
}

impl EntityKind {
    /// Built-in category order
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Actor,
        EntityKind::Enemy,
        EntityKind::Item,
        EntityKind::Skill,
    ];

    /// Database file the host keeps this table in
    pub fn file_name(self) -> &'static str {
        match self {
            EntityKind::Actor => "Actors.json",
            EntityKind::Enemy => "Enemies.json",
            EntityKind::Item => "Items.json",
            EntityKind::Skill => "Skills.json",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Actor => "actor",
            EntityKind::Enemy => "enemy",
            EntityKind::Item => "item",
            EntityKind::Skill => "skill",
        };
        f.write_str(name)
    }
}

/// Provides the current names for each table.
///
/// Called on every colorize pass, so implementations may change their
/// answers between calls (e.g. after the host reloads its database).
pub trait NameSource {
    fn names(&self, kind: EntityKind) -> Vec<String>;
}

impl<F> NameSource for F
where
    F: Fn(EntityKind) -> Vec<String>,
{
    fn names(&self, kind: EntityKind) -> Vec<String> {
        self(kind)
    }
}

/// A database record. Only the name matters here; other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedEntity {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

/// A 1-indexed database table. Slot 0 is reserved by the host and is
/// usually `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataTable {
    pub entries: Vec<Option<NamedEntity>>,
}

impl DataTable {
    /// Build a table from records for ids 1..
    pub fn from_records(records: impl IntoIterator<Item = NamedEntity>) -> Self {
        let mut entries = vec![None];
        entries.extend(records.into_iter().map(Some));
        Self { entries }
    }

    /// Non-empty names of records 1.., in table order
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .skip(1)
            .flatten()
            .filter_map(|entity| entity.name.as_deref())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// The host database tables, optionally backed by a data directory.
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub actors: DataTable,
    pub enemies: DataTable,
    pub items: DataTable,
    pub skills: DataTable,
    data_dir: Option<PathBuf>,
}

impl GameData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the four tables from a host `data/` directory.
    /// Missing files leave that table empty.
    pub fn load_dir(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();
        let mut data = GameData {
            data_dir: Some(dir.to_path_buf()),
            ..GameData::default()
        };
        for kind in EntityKind::ALL {
            *data.table_mut(kind) = load_table(&dir.join(kind.file_name()))?;
        }
        Ok(data)
    }

    /// Re-read the tables from the directory this was loaded from.
    /// Returns false when there is no backing directory.
    pub fn reload(&mut self) -> anyhow::Result<bool> {
        let Some(dir) = self.data_dir.clone() else {
            return Ok(false);
        };
        *self = GameData::load_dir(dir)?;
        Ok(true)
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn table(&self, kind: EntityKind) -> &DataTable {
        match kind {
            EntityKind::Actor => &self.actors,
            EntityKind::Enemy => &self.enemies,
            EntityKind::Item => &self.items,
            EntityKind::Skill => &self.skills,
        }
    }

    pub fn table_mut(&mut self, kind: EntityKind) -> &mut DataTable {
        match kind {
            EntityKind::Actor => &mut self.actors,
            EntityKind::Enemy => &mut self.enemies,
            EntityKind::Item => &mut self.items,
            EntityKind::Skill => &mut self.skills,
        }
    }
}

impl NameSource for GameData {
    fn names(&self, kind: EntityKind) -> Vec<String> {
        self.table(kind).names()
    }
}

fn load_table(path: &Path) -> anyhow::Result<DataTable> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "data table not found, treating as empty");
        return Ok(DataTable::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    let table: DataTable = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse '{}'", path.display()))?;
    Ok(table)
}
