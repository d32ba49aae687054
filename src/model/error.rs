use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::structures::belief::Belief;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read metadata file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("Failed to parse metadata file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error
    }
}

/// Contract violations of the skill model input
#[derive(Debug, Error, PartialEq)]
pub enum RatingError {
    #[error("Expected {teams} ranks for {teams} teams, found {ranks}")]
    ArityMismatch { teams: usize, ranks: usize },

    #[error("Expected at least 2 teams, found {0}")]
    TooFewTeams(usize),

    #[error("Team {0} has no members")]
    EmptyTeam(usize),

    #[error("Team {team} has an invalid belief {belief:?}")]
    InvalidBelief { team: usize, belief: Belief },

    #[error("Skill model returned {returned} teams for {expected} inputs")]
    MalformedOutput { expected: usize, returned: usize }
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(
        "Rating update failed for contest {contest_id} ({contest_name}, {date}): {source}\n\
        tickets: {tickets:?}\nbeliefs: {beliefs:?}\nranks: {ranks:?}"
    )]
    RatingUpdate {
        contest_id: i32,
        contest_name: String,
        date: NaiveDate,
        tickets: Vec<Vec<i32>>,
        beliefs: Vec<Vec<Belief>>,
        ranks: Vec<usize>,
        #[source]
        source: RatingError
    }
}
