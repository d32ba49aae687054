use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum_macros::{EnumIter, EnumString};

/// The contest type as recorded by the upstream data source. Anything that does
/// not match a known label is preserved as [`ContestType::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, EnumIter, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContestType {
    #[strum(serialize = "General Election")]
    GeneralElection,
    #[strum(serialize = "Run-Off")]
    RunOff,
    #[strum(serialize = "Caucus")]
    Caucus,
    #[strum(serialize = "Primary Election")]
    PrimaryElection,
    #[strum(serialize = "Primary Election Run-Off")]
    PrimaryElectionRunOff,
    #[strum(serialize = "Special Election")]
    SpecialElection,
    #[strum(serialize = "Special Election Primary")]
    SpecialElectionPrimary,
    #[strum(serialize = "Running Mate")]
    RunningMate,
    #[strum(default)]
    Unknown(String)
}

impl ContestType {
    pub fn parse(label: &str) -> ContestType {
        ContestType::from_str(label).unwrap_or_else(|_| ContestType::Unknown(label.to_string()))
    }

    /// Mirrors the `#[strum(serialize)]` labels. A strum `AsRefStr`/`Display`
    /// derive would render `Unknown` instead of its payload. `test_label_round_trip`
    /// keeps the two lists in sync.
    pub fn as_str(&self) -> &str {
        match self {
            ContestType::GeneralElection => "General Election",
            ContestType::RunOff => "Run-Off",
            ContestType::Caucus => "Caucus",
            ContestType::PrimaryElection => "Primary Election",
            ContestType::PrimaryElectionRunOff => "Primary Election Run-Off",
            ContestType::SpecialElection => "Special Election",
            ContestType::SpecialElectionPrimary => "Special Election Primary",
            ContestType::RunningMate => "Running Mate",
            ContestType::Unknown(label) => label.as_str()
        }
    }
}

impl fmt::Display for ContestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ContestType {
    fn from(label: String) -> Self {
        ContestType::parse(&label)
    }
}

impl From<ContestType> for String {
    fn from(contest_type: ContestType) -> Self {
        contest_type.as_str().to_string()
    }
}
