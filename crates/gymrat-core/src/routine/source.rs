//! Routine data-fetch seam.
//!
//! The app loads routines from a REST API; the HTTP client itself lives
//! outside this crate. Anything that can produce validated [`Routine`]s
//! implements [`RoutineSource`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{Routine, RoutinePayload};
use crate::error::SourceError;

/// Source of routines for the workout flow.
pub trait RoutineSource {
    /// List every routine the source knows about.
    fn list_routines(&self) -> Result<Vec<Routine>, SourceError>;

    /// Fetch one routine by id.
    fn fetch_routine(&self, id: &str) -> Result<Routine, SourceError> {
        self.list_routines()?
            .into_iter()
            .find(|r| r.id.to_string() == id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}

/// Reads the API's JSON response shape from a file.
///
/// Accepts either a single routine object or an array of routines, the two
/// shapes `GET /routines/{id}` and `GET /routines` return.
#[derive(Debug, Clone)]
pub struct JsonRoutineSource {
    path: PathBuf,
}

impl JsonRoutineSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parse(content: &str) -> Result<Vec<RoutinePayload>, SourceError> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        if value.is_array() {
            Ok(serde_json::from_value(value)?)
        } else {
            Ok(vec![serde_json::from_value(value)?])
        }
    }
}

impl RoutineSource for JsonRoutineSource {
    fn list_routines(&self) -> Result<Vec<Routine>, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })?;
        let routines = Self::parse(&content)?
            .into_iter()
            .map(Routine::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(path = %self.path.display(), count = routines.len(), "loaded routines");
        Ok(routines)
    }
}

/// In-memory source, keyed by routine id.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoutineSource {
    routines: BTreeMap<Uuid, Routine>,
}

impl MemoryRoutineSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, routine: Routine) {
        self.routines.insert(routine.id, routine);
    }
}

impl RoutineSource for MemoryRoutineSource {
    fn list_routines(&self) -> Result<Vec<Routine>, SourceError> {
        Ok(self.routines.values().cloned().collect())
    }

    fn fetch_routine(&self, id: &str) -> Result<Routine, SourceError> {
        Uuid::parse_str(id)
            .ok()
            .and_then(|uuid| self.routines.get(&uuid).cloned())
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}
