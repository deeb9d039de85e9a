use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::NaiveDate;
use kinetic_domain::{self as domain, Property};
use log::debug;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum::AsRefStr;
use uuid::Uuid;

/// Stores the catalog, the schedule and the settings as JSON documents in a directory.
#[derive(Debug, Clone)]
pub struct JsonFile {
    dir: PathBuf,
}

impl JsonFile {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path(&self, store: Store) -> PathBuf {
        self.dir.join(store.as_ref())
    }

    /// Document of the store, or `None` if it has not been written yet.
    fn read<V: DeserializeOwned>(&self, store: Store) -> Result<Option<V>, JsonFileError> {
        if !self.dir.is_dir() {
            return Err(JsonFileError::DirectoryNotFound(self.dir.clone()));
        }
        let path = self.path(store);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("{} does not exist", path.display());
                return Ok(None);
            }
            Err(err) => {
                return Err(anyhow::Error::new(err)
                    .context(format!("failed to read {}", path.display()))
                    .into());
            }
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn write<V: Serialize>(&self, store: Store, value: &V) -> Result<(), JsonFileError> {
        if !self.dir.is_dir() {
            return Err(JsonFileError::DirectoryNotFound(self.dir.clone()));
        }
        let path = self.path(store);
        let text = serde_json::to_string_pretty(value)?;
        fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("wrote {}", path.display());
        Ok(())
    }

    fn read_schedule_entries(&self) -> Result<Vec<domain::ScheduleEntry>, JsonFileError> {
        self.read::<Vec<ScheduleEntry>>(Store::Schedule)?
            .unwrap_or_default()
            .into_iter()
            .map(|e| domain::ScheduleEntry::try_from(e).map_err(JsonFileError::from))
            .collect()
    }

    fn write_schedule_entries(
        &self,
        entries: &[domain::ScheduleEntry],
    ) -> Result<(), JsonFileError> {
        self.write(
            Store::Schedule,
            &entries.iter().map(ScheduleEntry::from).collect::<Vec<_>>(),
        )
    }
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Store {
    #[strum(serialize = "catalog.json")]
    Catalog,
    #[strum(serialize = "schedule.json")]
    Schedule,
    #[strum(serialize = "settings.json")]
    Settings,
}

#[derive(thiserror::Error, Debug)]
pub enum JsonFileError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<JsonFileError> for domain::StorageError {
    fn from(value: JsonFileError) -> Self {
        match value {
            JsonFileError::DirectoryNotFound(_) => domain::StorageError::NoConnection,
            _ => domain::StorageError::Other(value.into()),
        }
    }
}

impl From<JsonFileError> for domain::ReadError {
    fn from(value: JsonFileError) -> Self {
        domain::ReadError::Storage(value.into())
    }
}

impl From<JsonFileError> for domain::CreateError {
    fn from(value: JsonFileError) -> Self {
        domain::CreateError::Storage(value.into())
    }
}

impl From<JsonFileError> for domain::UpdateError {
    fn from(value: JsonFileError) -> Self {
        domain::UpdateError::Storage(value.into())
    }
}

impl domain::CatalogRepository for JsonFile {
    async fn read_catalog(
        &self,
    ) -> Result<Vec<domain::ExerciseRecord>, domain::CatalogLoadError> {
        match self.read::<Vec<Exercise>>(Store::Catalog) {
            Ok(Some(exercises)) => Ok(exercises.into_iter().map(Into::into).collect()),
            Ok(None) => Err(domain::CatalogLoadError::Missing(
                self.path(Store::Catalog).display().to_string(),
            )),
            Err(JsonFileError::Json(err)) => {
                Err(domain::CatalogLoadError::Malformed(err.to_string()))
            }
            Err(err) => Err(domain::ReadError::from(err).into()),
        }
    }
}

impl domain::ScheduleRepository for JsonFile {
    async fn read_schedule(&self) -> Result<Vec<domain::ScheduleEntry>, domain::ReadError> {
        Ok(self.read_schedule_entries()?)
    }

    async fn append_schedule_entry(
        &self,
        entry: domain::ScheduleEntry,
    ) -> Result<domain::ScheduleEntry, domain::CreateError> {
        let mut schedule = domain::Schedule::new(self.read_schedule_entries()?);
        let entry = schedule.record(entry)?.clone();
        self.write_schedule_entries(schedule.entries())?;
        Ok(entry)
    }

    async fn complete_schedule_entry(
        &self,
        id: domain::ScheduleEntryID,
    ) -> Result<domain::ScheduleEntry, domain::UpdateError> {
        let mut schedule = domain::Schedule::new(self.read_schedule_entries()?);
        let entry = schedule.complete(id)?.clone();
        self.write_schedule_entries(schedule.entries())?;
        Ok(entry)
    }
}

impl domain::SettingsRepository for JsonFile {
    async fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        match self.read::<Settings>(Store::Settings)? {
            Some(settings) => Ok(domain::Settings::try_from(settings)
                .map_err(|err| domain::ReadError::Other(err.into()))?),
            None => Ok(domain::Settings::default()),
        }
    }

    async fn write_settings(
        &self,
        settings: domain::Settings,
    ) -> Result<domain::Settings, domain::UpdateError> {
        self.write(Store::Settings, &Settings::from(&settings))?;
        Ok(settings)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Exercise {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub body_parts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Vec<String>>,
    pub roles: Option<Vec<String>>,
}

impl From<domain::Exercise> for Exercise {
    fn from(value: domain::Exercise) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: Some(value.id.to_string()),
            name: Some(value.name.to_string()),
            body_parts: Some(ids(&value.body_parts)),
            equipment: if value.is_bodyweight() {
                None
            } else {
                Some(ids(&value.equipment))
            },
            roles: Some(ids(&value.roles)),
        }
    }
}

impl From<Exercise> for domain::ExerciseRecord {
    fn from(value: Exercise) -> Self {
        Self {
            id: value.id,
            name: value.name,
            body_parts: value.body_parts,
            equipment: value.equipment,
            roles: value.roles,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub focus: String,
    pub session_type: String,
    pub exercises: Vec<String>,
    pub completed: bool,
}

impl From<domain::ScheduleEntry> for ScheduleEntry {
    fn from(value: domain::ScheduleEntry) -> Self {
        Self::from(&value)
    }
}

impl From<&domain::ScheduleEntry> for ScheduleEntry {
    fn from(value: &domain::ScheduleEntry) -> Self {
        Self {
            id: *value.id,
            date: value.date,
            focus: value.focus.id().to_string(),
            session_type: value.session_type.id().to_string(),
            exercises: value.exercises.iter().map(ToString::to_string).collect(),
            completed: value.completed,
        }
    }
}

impl TryFrom<ScheduleEntry> for domain::ScheduleEntry {
    type Error = ScheduleEntryError;

    fn try_from(value: ScheduleEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            date: value.date,
            focus: domain::BodyPart::from_id(&value.focus)
                .ok_or(ScheduleEntryError::UnknownFocus(value.focus))?,
            session_type: domain::SessionType::try_from(value.session_type.as_str())?,
            exercises: value
                .exercises
                .iter()
                .map(|id| domain::ExerciseID::new(id))
                .collect::<Result<Vec<_>, _>>()?,
            completed: value.completed,
        })
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ScheduleEntryError {
    #[error("unknown focus: {0}")]
    UnknownFocus(String),
    #[error(transparent)]
    UnsupportedSessionType(#[from] domain::UnsupportedSessionTypeError),
    #[error(transparent)]
    InvalidExercise(#[from] domain::ExerciseIDError),
}

impl From<ScheduleEntryError> for JsonFileError {
    fn from(value: ScheduleEntryError) -> Self {
        JsonFileError::Other(anyhow::Error::new(value).context("invalid schedule entry"))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub default_session_type: String,
    pub rotation: Vec<String>,
    pub rotation_window_days: u32,
    pub variety: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&domain::Settings::default())
    }
}

impl From<&domain::Settings> for Settings {
    fn from(value: &domain::Settings) -> Self {
        Self {
            default_session_type: value.default_session_type.id().to_string(),
            rotation: ids(&value.rotation),
            rotation_window_days: value.rotation_window_days,
            variety: value.variety,
        }
    }
}

impl TryFrom<Settings> for domain::Settings {
    type Error = SettingsError;

    fn try_from(value: Settings) -> Result<Self, Self::Error> {
        let settings = Self {
            default_session_type: domain::SessionType::try_from(
                value.default_session_type.as_str(),
            )?,
            rotation: value
                .rotation
                .into_iter()
                .map(|focus| {
                    domain::BodyPart::from_id(&focus).ok_or(SettingsError::UnknownFocus(focus))
                })
                .collect::<Result<Vec<_>, _>>()?,
            rotation_window_days: value.rotation_window_days,
            variety: value.variety,
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("unknown focus: {0}")]
    UnknownFocus(String),
    #[error(transparent)]
    UnsupportedSessionType(#[from] domain::UnsupportedSessionTypeError),
    #[error(transparent)]
    Invalid(#[from] domain::SettingsError),
}

fn ids<'a, P: Property + 'a>(properties: impl IntoIterator<Item = &'a P>) -> Vec<String> {
    properties.into_iter().map(|p| p.id().to_string()).collect()
}

/// Writes the catalog document. Used to seed a directory with the built-in catalog.
pub fn write_catalog(dir: &Path, catalog: &domain::Catalog) -> Result<(), JsonFileError> {
    JsonFile::new(dir).write(
        Store::Catalog,
        &catalog
            .exercises()
            .iter()
            .map(Exercise::from)
            .collect::<Vec<_>>(),
    )
}
