use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::Preset;

/// Best completion time in whole seconds per preset difficulty, backed by
/// a flat JSON file.
///
/// Record keeping is best-effort: a missing, malformed, or unreadable file
/// degrades to an empty record set and write failures are logged and
/// swallowed. Nothing here may ever block gameplay.
#[derive(Clone, Debug, PartialEq)]
pub struct BestTimes {
    path: PathBuf,
    records: BTreeMap<String, u32>,
}

impl BestTimes {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, u32>>(&raw) {
                Ok(mut records) => {
                    // drop keys that do not name a preset
                    records.retain(|key, _| Preset::from_key(key).is_some());
                    records
                }
                Err(err) => {
                    log::warn!(
                        "ignoring malformed best-times file {}: {}",
                        path.display(),
                        err
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                log::warn!(
                    "ignoring unreadable best-times file {}: {}",
                    path.display(),
                    err
                );
                BTreeMap::new()
            }
        };
        Self { path, records }
    }

    pub fn get(&self, preset: Preset) -> Option<u32> {
        self.records.get(preset.key()).copied()
    }

    /// Stores `secs` when it beats the existing record, rewriting the
    /// whole file. Returns whether a new record was set.
    pub fn record(&mut self, preset: Preset, secs: u32) -> bool {
        let improved = self.get(preset).is_none_or(|best| secs < best);
        if improved {
            self.records.insert(preset.key().to_owned(), secs);
            self.save();
        }
        improved
    }

    fn save(&self) {
        let raw = match serde_json::to_string_pretty(&self.records) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("failed to encode best times: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, raw) {
            log::warn!(
                "failed to write best-times file {}: {}",
                self.path.display(),
                err
            );
        }
    }
}
