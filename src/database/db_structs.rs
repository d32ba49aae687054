use crate::{
    model::structures::{belief::Belief, contest_class::ContestClass, contest_type::ContestType},
    utils::name_utils::searchable_name
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub id: i32,
    pub name: String,
    pub contest_type: ContestType,
    pub date: NaiveDate,
    pub candidates: Vec<ContestCandidate>,
    /// True when the contest is dated after the most recent data refresh
    pub upcoming: bool
}

impl Contest {
    pub fn class(&self) -> ContestClass {
        ContestClass::classify(&self.contest_type, &self.name)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestCandidate {
    /// Row id of this entry in the contest
    pub id: i32,
    pub politician_id: i32,
    pub name: String,
    pub party: String,
    /// `None` when the vote count is unknown
    pub votes: Option<i64>,
    pub won: bool,
    pub incumbent: bool,
    /// Running mates rated on the same ticket as this candidate
    #[serde(default)]
    pub running_mates: Vec<RunningMate>,
    /// Only ever populated for upcoming contests
    #[serde(default)]
    pub projected_rating: Option<ProjectedRating>
}

impl ContestCandidate {
    pub fn vote_count(&self) -> i64 {
        self.votes.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunningMate {
    pub politician_id: i32,
    pub name: String
}

/// Display annotation written onto candidates of upcoming contests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ProjectedRating {
    pub mu: f64,
    pub sigma: f64,
    pub low_confidence: bool
}

impl From<Belief> for ProjectedRating {
    fn from(belief: Belief) -> Self {
        ProjectedRating {
            mu: belief.mu,
            sigma: belief.sigma,
            low_confidence: belief.is_low_confidence()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingHistoryEntry {
    /// `None` only for the seed entry
    pub contest_id: Option<i32>,
    pub rating: Belief
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Politician {
    pub id: i32,
    pub name: String,
    pub searchable_name: String,
    pub party: String,
    /// Year of the most recent non-upcoming contest this politician ran in
    pub last_ran_in: Option<i32>,
    /// Append-only, ordered by replay order
    pub rating_history: Vec<RatingHistoryEntry>,
    /// Updated once at the very end of processing
    pub ranking: u32,
    /// Updated once at the very end of processing
    pub previous_ranking: Option<u32>,
    /// Updated once at the very end of processing
    pub retired: bool,
    /// Updated once at the very end of processing
    pub low_confidence: bool
}

impl Politician {
    pub fn new(id: i32, name: &str, party: &str) -> Politician {
        Politician {
            id,
            name: name.to_string(),
            searchable_name: searchable_name(name),
            party: party.to_string(),
            last_ran_in: None,
            rating_history: vec![RatingHistoryEntry {
                contest_id: None,
                rating: Belief::prior()
            }],
            ranking: 0,
            previous_ranking: None,
            retired: false,
            low_confidence: false
        }
    }

    /// The most recent belief
    pub fn rating(&self) -> Belief {
        self.rating_history.last().map(|e| e.rating).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Contest, ContestCandidate, Politician};
    use crate::model::structures::{belief::Belief, contest_class::ContestClass, contest_type::ContestType};
    use chrono::NaiveDate;

    #[test]
    fn test_new_politician_is_seeded_with_prior() {
        let politician = Politician::new(7, "Hillary Rodham Clinton", "Democratic");

        assert_eq!(politician.rating_history.len(), 1);
        assert_eq!(politician.rating_history[0].contest_id, None);
        assert_eq!(politician.rating(), Belief::prior());
        assert_eq!(politician.last_ran_in, None);
    }

    #[test]
    fn test_contest_deserializes_from_json() {
        let json = r#"{
            "id": 3,
            "name": "US President - D Primary",
            "contest_type": "Primary Election",
            "date": "2016-02-01",
            "upcoming": false,
            "candidates": [
                {"id": 1, "politician_id": 10, "name": "Hillary Clinton", "party": "Democratic",
                 "votes": 701, "won": true, "incumbent": false},
                {"id": 2, "politician_id": 11, "name": "Bernie Sanders", "party": "Democratic",
                 "votes": null, "won": false, "incumbent": false}
            ]
        }"#;

        let contest: Contest = serde_json::from_str(json).unwrap();

        assert_eq!(contest.contest_type, ContestType::PrimaryElection);
        assert_eq!(contest.date, NaiveDate::from_ymd_opt(2016, 2, 1).unwrap());
        assert_eq!(contest.year(), 2016);
        assert_eq!(contest.class(), ContestClass::Primary { presidential: true });
        assert_eq!(contest.candidates[1].votes, None);
        assert_eq!(contest.candidates[1].vote_count(), 0);
        assert!(contest.candidates[0].running_mates.is_empty());
    }

    #[test]
    fn test_vote_count_defaults_to_zero() {
        let candidate = ContestCandidate {
            id: 1,
            politician_id: 1,
            name: "A".to_string(),
            party: "Independent".to_string(),
            votes: None,
            won: false,
            incumbent: false,
            running_mates: vec![],
            projected_rating: None
        };

        assert_eq!(candidate.vote_count(), 0);
    }
}
