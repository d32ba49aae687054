use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf}
};

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{debug, info};

use crate::{
    database::db_structs::{Contest, ContestCandidate},
    model::{
        constants::{FIRST_METADATA_YEAR, METADATA_CYCLE_YEARS},
        error::MetadataError
    }
};

/// The period during which a primary candidate counts as being in the race.
/// A missing bound is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EligibilityWindow {
    pub entry: Option<NaiveDate>,
    pub dropout: Option<NaiveDate>
}

impl EligibilityWindow {
    pub fn new(entry: Option<NaiveDate>, dropout: Option<NaiveDate>) -> EligibilityWindow {
        EligibilityWindow { entry, dropout }
    }

    /// Candidates are out of the race before their entry date and from their dropout date onward
    pub fn contains(&self, date: NaiveDate) -> bool {
        let entered = self.entry.map_or(true, |entry| date >= entry);
        let dropped_out = self.dropout.is_some_and(|dropout| date >= dropout);

        entered && !dropped_out
    }
}

// Files either record only a dropout date, or an [entry, dropout] pair
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WindowRecord {
    Dropout(NaiveDate),
    Range(Option<NaiveDate>, Option<NaiveDate>)
}

impl From<WindowRecord> for EligibilityWindow {
    fn from(record: WindowRecord) -> Self {
        match record {
            WindowRecord::Dropout(dropout) => EligibilityWindow::new(None, Some(dropout)),
            WindowRecord::Range(entry, dropout) => EligibilityWindow::new(entry, dropout)
        }
    }
}

/// Metadata for a single presidential primary cycle
#[derive(Debug, Clone, Default)]
pub struct PrimaryCycleMetadata {
    /// party -> territory -> primary date, in calendar order
    pub schedule: IndexMap<String, IndexMap<String, NaiveDate>>,
    /// party -> candidate name -> eligibility window
    pub windows: HashMap<String, HashMap<String, EligibilityWindow>>
}

impl PrimaryCycleMetadata {
    pub fn window(&self, party: &str, candidate_name: &str) -> Option<&EligibilityWindow> {
        self.windows.get(party)?.get(candidate_name)
    }
}

/// Read-only lookup of presidential primary metadata, keyed by election year
#[derive(Debug, Clone, Default)]
pub struct EligibilityMetadata {
    cycles: HashMap<i32, PrimaryCycleMetadata>
}

impl EligibilityMetadata {
    pub fn new() -> EligibilityMetadata {
        EligibilityMetadata { cycles: HashMap::new() }
    }

    pub fn insert_cycle(&mut self, year: i32, cycle: PrimaryCycleMetadata) {
        self.cycles.insert(year, cycle);
    }

    pub fn cycle(&self, year: i32) -> Option<&PrimaryCycleMetadata> {
        self.cycles.get(&year)
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Returns whether the candidate is in the race on `date`. Anything not
    /// covered by the metadata is considered in the race.
    pub fn is_in_race(&self, year: i32, date: NaiveDate, party: &str, candidate_name: &str) -> bool {
        match self.cycle(year).and_then(|c| c.window(party, candidate_name)) {
            Some(window) => window.contains(date),
            None => true
        }
    }

    /// Applies the date filter to a contest's candidate. Only presidential
    /// primaries and caucuses are filtered.
    pub fn is_candidate_eligible(&self, contest: &Contest, candidate: &ContestCandidate) -> bool {
        if !contest.class().is_presidential_primary() {
            return true;
        }

        self.is_in_race(contest.year(), contest.date, &candidate.party, &candidate.name)
    }

    /// Position of a territory in the party's primary calendar
    pub fn schedule_position(&self, year: i32, party: &str, territory: &str) -> Option<usize> {
        self.cycle(year)?.schedule.get(party)?.get_index_of(territory)
    }

    /// Finds the scheduled territory a contest name starts with, returning its
    /// calendar position. The longest matching territory wins.
    pub fn contest_schedule_position(&self, year: i32, party: &str, contest_name: &str) -> Option<usize> {
        let schedule = self.cycle(year)?.schedule.get(party)?;

        schedule
            .keys()
            .enumerate()
            .filter(|(_, territory)| contest_name.starts_with(territory.as_str()))
            .max_by_key(|(_, territory)| territory.len())
            .map(|(i, _)| i)
    }

    /// Loads `{year}_primary_dropout_dates.json` and `{year}_primary_schedule.json`
    /// for every cycle year up to `current_year`. Missing files are skipped.
    pub fn load_from_dir(dir: &Path, current_year: i32) -> Result<EligibilityMetadata, MetadataError> {
        let mut metadata = EligibilityMetadata::new();

        for year in (FIRST_METADATA_YEAR..=current_year).step_by(METADATA_CYCLE_YEARS) {
            let dropout_path = dir.join(format!("{}_primary_dropout_dates.json", year));
            let schedule_path = dir.join(format!("{}_primary_schedule.json", year));

            let windows: Option<HashMap<String, HashMap<String, WindowRecord>>> = read_optional(&dropout_path)?;
            let schedule: Option<IndexMap<String, IndexMap<String, NaiveDate>>> = read_optional(&schedule_path)?;

            if windows.is_none() && schedule.is_none() {
                debug!("No primary metadata found for {}", year);
                continue;
            }

            let windows = windows
                .unwrap_or_default()
                .into_iter()
                .map(|(party, candidates)| {
                    let candidates = candidates
                        .into_iter()
                        .map(|(name, record)| (name, EligibilityWindow::from(record)))
                        .collect();
                    (party, candidates)
                })
                .collect();

            metadata.insert_cycle(
                year,
                PrimaryCycleMetadata {
                    schedule: schedule.unwrap_or_default(),
                    windows
                }
            );
        }

        info!("Loaded primary metadata for {} cycles", metadata.cycles.len());
        Ok(metadata)
    }
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, MetadataError> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| MetadataError::Io {
        path: PathBuf::from(path),
        source
    })?;

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| MetadataError::Parse {
            path: PathBuf::from(path),
            source
        })
}
