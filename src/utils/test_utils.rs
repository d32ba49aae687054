use crate::{
    database::db_structs::{Contest, ContestCandidate, Politician, RatingHistoryEntry},
    model::{
        error::RatingError,
        rating_updater::{validate_input, SkillModel},
        structures::{belief::Belief, contest_type::ContestType}
    },
    utils::name_utils::searchable_name
};
use chrono::{Days, NaiveDate};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::cell::RefCell;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn generate_candidate(politician_id: i32, name: &str, votes: Option<i64>, won: bool) -> ContestCandidate {
    ContestCandidate {
        id: politician_id,
        politician_id,
        name: name.to_string(),
        party: "Independent".to_string(),
        votes,
        won,
        incumbent: false,
        running_mates: vec![],
        projected_rating: None
    }
}

pub fn generate_contest(
    id: i32,
    name: &str,
    contest_type: ContestType,
    date: NaiveDate,
    candidates: Vec<ContestCandidate>
) -> Contest {
    Contest {
        id,
        name: name.to_string(),
        contest_type,
        date,
        candidates,
        upcoming: false
    }
}

/// A politician with one rated contest, whose current belief is (`mu`, `sigma`)
pub fn generate_politician(id: i32, mu: f64, sigma: f64, last_ran_in: i32) -> Politician {
    let name = format!("Politician {}", id);

    Politician {
        id,
        searchable_name: searchable_name(&name),
        name,
        party: "Independent".to_string(),
        last_ran_in: Some(last_ran_in),
        rating_history: vec![
            RatingHistoryEntry {
                contest_id: None,
                rating: Belief::prior()
            },
            RatingHistoryEntry {
                contest_id: Some(id),
                rating: Belief::new(mu, sigma)
            },
        ],
        ranking: 0,
        previous_ranking: None,
        retired: false,
        low_confidence: false
    }
}

/// Generates `n` head-to-head or multi-candidate contests one week apart,
/// drawing candidates from `n_politicians` politicians. Seeded, so the same
/// arguments always produce the same contests.
pub fn generate_random_contests(n: i32, n_politicians: i32, start: NaiveDate) -> Vec<Contest> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut pool: Vec<i32> = (1..=n_politicians).collect();
    let mut contests = Vec::with_capacity(n as usize);
    let max_field_size = (n_politicians as usize).clamp(2, 5);

    for i in 0..n {
        let field_size = rng.random_range(2..=max_field_size);
        pool.shuffle(&mut rng);

        let mut candidates: Vec<ContestCandidate> = pool
            .iter()
            .take(field_size)
            .map(|id| generate_candidate(*id, &format!("Politician {}", id), Some(rng.random_range(0..100_000)), false))
            .collect();

        if let Some(leader) = candidates.iter_mut().max_by_key(|c| c.vote_count()) {
            leader.won = true;
        }

        let contest_type = if i % 2 == 0 {
            ContestType::PrimaryElection
        } else {
            ContestType::GeneralElection
        };

        contests.push(generate_contest(
            i + 1,
            &format!("District {} Seat", i % 50),
            contest_type,
            start + Days::new(7 * i as u64),
            candidates
        ));
    }

    contests
}

/// Deterministic skill model that records every call. Each team gains 100 mu
/// per place it finished above last, and every sigma shrinks to 40%.
#[derive(Debug, Default)]
pub struct RecordingModel {
    calls: RefCell<Vec<Vec<usize>>>
}

impl RecordingModel {
    pub fn new() -> RecordingModel {
        RecordingModel::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_ranks(&self) -> Option<Vec<usize>> {
        self.calls.borrow().last().cloned()
    }
}

impl SkillModel for RecordingModel {
    fn rate(&self, teams: &[Vec<Belief>], ranks: &[usize]) -> Result<Vec<Vec<Belief>>, RatingError> {
        validate_input(teams, ranks)?;
        self.calls.borrow_mut().push(ranks.to_vec());

        let worst = ranks.iter().copied().max().unwrap_or(0);
        Ok(teams
            .iter()
            .zip(ranks)
            .map(|(team, rank)| {
                team.iter()
                    .map(|b| Belief::new(b.mu + 100.0 * (worst - rank) as f64, b.sigma * 0.4))
                    .collect()
            })
            .collect())
    }
}

/// Skill model that always fails
#[derive(Debug, Default)]
pub struct RejectingModel;

impl SkillModel for RejectingModel {
    fn rate(&self, teams: &[Vec<Belief>], _ranks: &[usize]) -> Result<Vec<Vec<Belief>>, RatingError> {
        Err(RatingError::MalformedOutput {
            expected: teams.len(),
            returned: 0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_contests_are_reproducible() {
        let a = generate_random_contests(20, 10, date(2000, 1, 4));
        let b = generate_random_contests(20, 10, date(2000, 1, 4));

        assert_eq!(a.len(), 20);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.date, y.date);
            let ids_x: Vec<i32> = x.candidates.iter().map(|c| c.politician_id).collect();
            let ids_y: Vec<i32> = y.candidates.iter().map(|c| c.politician_id).collect();
            assert_eq!(ids_x, ids_y);
        }
    }

    #[test]
    fn test_random_contests_have_one_winner_and_distinct_candidates() {
        for contest in generate_random_contests(50, 8, date(2000, 1, 4)) {
            assert!(contest.candidates.len() >= 2);
            assert_eq!(contest.candidates.iter().filter(|c| c.won).count(), 1);

            let mut ids: Vec<i32> = contest.candidates.iter().map(|c| c.politician_id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), contest.candidates.len());
        }
    }

    #[test]
    fn test_recording_model_rewards_better_ranks() {
        let model = RecordingModel::new();
        let teams = vec![vec![Belief::prior()], vec![Belief::prior()], vec![Belief::prior()]];

        let results = model.rate(&teams, &[2, 0, 1]).unwrap();

        assert_eq!(model.calls(), 1);
        assert_eq!(model.last_ranks(), Some(vec![2, 0, 1]));
        assert!(results[1][0].mu > results[2][0].mu);
        assert!(results[2][0].mu > results[0][0].mu);
    }
}
