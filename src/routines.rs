use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

/// Split type → ordered routine names. Loaded once at startup and handed to
/// the client that populates the routine dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutineOptions {
    splits: BTreeMap<String, Vec<String>>,
}

impl RoutineOptions {
    pub fn new(splits: BTreeMap<String, Vec<String>>) -> Self {
        Self { splits }
    }

    pub fn routines(&self, split_type: &str) -> &[String] {
        self.splits
            .get(split_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn split_types(&self) -> impl Iterator<Item = &str> {
        self.splits.keys().map(String::as_str)
    }
}

impl Default for RoutineOptions {
    fn default() -> Self {
        let table: [(&str, &[&str]); 6] = [
            ("full_body", &["Full Body A", "Full Body B", "Full Body C"]),
            ("upper_lower", &["Upper A", "Lower A", "Upper B", "Lower B"]),
            ("push", &["Push Day A", "Push Day B"]),
            ("pull", &["Pull Day A", "Pull Day B"]),
            ("legs", &["Leg Day A", "Leg Day B"]),
            ("ab", &["A1", "B1", "A2", "B2"]),
        ];
        let splits = table
            .into_iter()
            .map(|(split, routines)| {
                (
                    split.to_string(),
                    routines.iter().map(|name| name.to_string()).collect(),
                )
            })
            .collect();
        Self { splits }
    }
}

pub fn resolve_routines_path() -> PathBuf {
    if let Ok(path) = env::var("WORKOUT_ROUTINES_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("config/routines.json")
}

/// Reads the routine table; a missing or unreadable file yields the
/// built-in table.
pub async fn load_routine_options(path: &Path) -> RoutineOptions {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(options) => {
                info!("loaded routine options from {}", path.display());
                options
            }
            Err(err) => {
                error!("failed to parse routine options file: {err}");
                RoutineOptions::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => RoutineOptions::default(),
        Err(err) => {
            error!("failed to read routine options file: {err}");
            RoutineOptions::default()
        }
    }
}
