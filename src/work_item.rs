//! Work-item input for a run.
//!
//! A work item is a flat key/value document handed over by whatever
//! schedules the scraper. It is read as YAML, so plain JSON work items work
//! too:
//!
//! ```yaml
//! search_phrase: wildfire smoke
//! topic: California
//! number_of_months: 2
//! retries: 5
//! ```
//!
//! When no work item can be read the run still goes ahead with the default
//! [`SearchCriteria`].

use crate::error::WorkItemError;
use crate::models::SearchCriteria;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Key/value provider for work-item variables.
pub trait WorkItemSource {
    /// The scalar value stored under `key`, rendered as a string.
    fn get(&self, key: &str) -> Result<Option<String>, WorkItemError>;
}

/// Work item read from a file, or the reason none is available.
#[derive(Debug)]
pub enum WorkItems {
    Loaded(BTreeMap<String, Value>),
    Unavailable(WorkItemError),
}

impl WorkItems {
    /// Read the work item at `path`. Failures are kept and reported through
    /// [`WorkItemSource::get`] instead of aborting the run.
    pub fn from_path(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::Unavailable(WorkItemError::Unavailable(
                "no work item path given".to_string(),
            ));
        };
        match Self::read(path) {
            Ok(values) => {
                info!(path = %path.display(), keys = values.len(), "Loaded work item");
                Self::Loaded(values)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot load work item");
                Self::Unavailable(e)
            }
        }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, Value>, WorkItemError> {
        let raw = std::fs::read_to_string(path).map_err(|source| WorkItemError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| WorkItemError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl WorkItemSource for WorkItems {
    fn get(&self, key: &str) -> Result<Option<String>, WorkItemError> {
        let values = match self {
            Self::Loaded(values) => values,
            Self::Unavailable(e) => return Err(WorkItemError::Unavailable(e.to_string())),
        };
        match values.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(WorkItemError::NotScalar {
                key: key.to_string(),
            }),
        }
    }
}

impl SearchCriteria {
    /// Read the criteria from `source`, falling back to the defaults as a
    /// whole when the provider fails.
    pub fn resolve<W: WorkItemSource>(source: &W) -> Self {
        match Self::from_work_item(source) {
            Ok(criteria) => criteria,
            Err(e) => {
                warn!(error = %e, "Work item unusable; using default search criteria");
                Self::default()
            }
        }
    }

    /// Strict variant of [`SearchCriteria::resolve`]. Missing keys take their
    /// default value.
    pub fn from_work_item<W: WorkItemSource>(source: &W) -> Result<Self, WorkItemError> {
        let defaults = Self::default();
        let search_phrase = source
            .get("search_phrase")?
            .unwrap_or(defaults.search_phrase);
        let topic = source.get("topic")?.unwrap_or(defaults.topic);
        let number_of_months = match source.get("number_of_months")? {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| WorkItemError::Invalid {
                    key: "number_of_months".to_string(),
                    value: raw.clone(),
                })?,
            None => defaults.number_of_months,
        };

        Ok(Self {
            search_phrase,
            topic,
            number_of_months,
        })
    }
}
