use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::database::db_structs::ContestCandidate;

lazy_static! {
    pub static ref DEFAULT_PLACEHOLDER_RULES: PlaceholderRules = PlaceholderRules::default();
}

/// A predicate over a candidate's display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    Prefix(&'static str),
    Suffix(&'static str),
    Contains(&'static str),
    PrefixAndSuffix(&'static str, &'static str)
}

impl NamePattern {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NamePattern::Prefix(prefix) => name.starts_with(prefix),
            NamePattern::Suffix(suffix) => name.ends_with(suffix),
            NamePattern::Contains(needle) => name.contains(needle),
            NamePattern::PrefixAndSuffix(prefix, suffix) => name.starts_with(prefix) && name.ends_with(suffix)
        }
    }
}

/// Labels that appear in the candidate list of a contest but are not actual
/// candidates (write-ins, "None of the above", roll-ups of minor candidates...).
#[derive(Debug, Clone)]
pub struct PlaceholderRules {
    pub exact_names: HashSet<&'static str>,
    pub name_patterns: Vec<NamePattern>,
    pub parties: HashSet<&'static str>
}

impl Default for PlaceholderRules {
    fn default() -> Self {
        PlaceholderRules {
            exact_names: ["Uncommitted", "Others", "Write-In", "Abstaining", "Reject"]
                .into_iter()
                .collect(),
            name_patterns: vec![
                NamePattern::Prefix("No "),
                NamePattern::Suffix("Primary Winner"),
                NamePattern::PrefixAndSuffix("Runoff", "Winner"),
                NamePattern::Contains("Scattering"),
            ],
            parties: ["Write-In"].into_iter().collect()
        }
    }
}

impl PlaceholderRules {
    pub fn is_placeholder_name(&self, name: &str) -> bool {
        self.exact_names.contains(name) || self.name_patterns.iter().any(|p| p.matches(name))
    }

    pub fn is_placeholder(&self, candidate: &ContestCandidate) -> bool {
        self.parties.contains(candidate.party.as_str()) || self.is_placeholder_name(&candidate.name)
    }
}
