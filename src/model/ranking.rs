use std::collections::HashMap;

use itertools::Itertools;

use crate::{
    database::db_structs::Politician,
    model::constants::{MAX_SIGMA, YEARS_UNTIL_EXCLUDED}
};

/// Why a politician is left out of the public ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Rating uncertainty is above the maximum
    LowConfidence,
    /// Has not run for too long
    Retired
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingPolicy {
    pub current_year: i32,
    pub years_until_excluded: i32,
    pub max_sigma: f64
}

impl RankingPolicy {
    pub fn new(current_year: i32) -> RankingPolicy {
        RankingPolicy {
            current_year,
            years_until_excluded: YEARS_UNTIL_EXCLUDED,
            max_sigma: MAX_SIGMA
        }
    }

    /// Low confidence is checked first and takes precedence
    pub fn exclusion(&self, politician: &Politician) -> Option<Exclusion> {
        if politician.rating().sigma > self.max_sigma {
            return Some(Exclusion::LowConfidence);
        }

        let active = politician
            .last_ran_in
            .is_some_and(|year| year >= self.current_year - self.years_until_excluded);
        if !active {
            return Some(Exclusion::Retired);
        }

        None
    }
}

fn by_rating_descending(a: &Politician, b: &Politician) -> std::cmp::Ordering {
    b.rating().mu.total_cmp(&a.rating().mu)
}

/// Ranks only the politicians the policy does not exclude, returning
/// politician id -> 1-based rank
pub fn rank_eligible<'a>(
    politicians: impl Iterator<Item = &'a Politician>,
    policy: &RankingPolicy
) -> HashMap<i32, u32> {
    politicians
        .filter(|p| policy.exclusion(p).is_none())
        .sorted_by(|a, b| by_rating_descending(a, b))
        .enumerate()
        .map(|(i, p)| (p.id, i as u32 + 1))
        .collect()
}

/// Computes the final public ranking. Eligible politicians receive ranks
/// 1..=N by descending mu, excluded politicians follow in the same order and
/// are flagged.
///
/// # Notes
/// Sorts `politicians` by descending mu
pub fn finalize_rankings(
    politicians: &mut [Politician],
    policy: &RankingPolicy,
    previous_rankings: &HashMap<i32, u32>
) {
    politicians.sort_by(by_rating_descending);

    let exclusions: Vec<Option<Exclusion>> = politicians.iter().map(|p| policy.exclusion(p)).collect();
    let n_eligible = exclusions.iter().filter(|e| e.is_none()).count() as u32;

    let mut ranking = 1;
    let mut excluded_ranking = n_eligible + 1;

    for (politician, exclusion) in politicians.iter_mut().zip(exclusions) {
        politician.low_confidence = exclusion == Some(Exclusion::LowConfidence);
        politician.retired = exclusion == Some(Exclusion::Retired);
        politician.previous_ranking = previous_rankings.get(&politician.id).copied();

        match exclusion {
            None => {
                politician.ranking = ranking;
                ranking += 1;
            }
            Some(_) => {
                politician.ranking = excluded_ranking;
                excluded_ranking += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{finalize_rankings, rank_eligible, Exclusion, RankingPolicy};
    use crate::{model::constants::MAX_SIGMA, utils::test_utils::generate_politician};
    use std::collections::HashMap;

    #[test]
    fn test_low_confidence_is_excluded() {
        let mut politicians = vec![
            generate_politician(3, 1600.0, MAX_SIGMA + 1.0, 2024),
            generate_politician(1, 2000.0, 100.0, 2024),
            generate_politician(2, 1800.0, 100.0, 2024),
        ];

        finalize_rankings(&mut politicians, &RankingPolicy::new(2025), &HashMap::new());

        assert_eq!(politicians.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(politicians[0].ranking, 1);
        assert_eq!(politicians[1].ranking, 2);
        assert_eq!(politicians[2].ranking, 3);
        assert!(politicians[2].low_confidence);
        assert!(!politicians[2].retired);
        assert!(!politicians[0].low_confidence);
    }

    #[test]
    fn test_excluded_follow_eligible() {
        let mut politicians = vec![
            // Highest rated but retired
            generate_politician(1, 2500.0, 100.0, 1990),
            generate_politician(2, 2000.0, 100.0, 2020),
            // Low confidence and retired: low confidence wins
            generate_politician(3, 1900.0, 400.0, 1980),
            generate_politician(4, 1500.0, 100.0, 2017),
        ];

        finalize_rankings(&mut politicians, &RankingPolicy::new(2025), &HashMap::new());

        let rank_of = |id: i32| politicians.iter().find(|p| p.id == id).unwrap();

        assert_eq!(rank_of(2).ranking, 1);
        assert_eq!(rank_of(4).ranking, 2);
        assert_eq!(rank_of(1).ranking, 3);
        assert_eq!(rank_of(3).ranking, 4);

        assert!(rank_of(1).retired);
        assert!(!rank_of(1).low_confidence);
        assert!(rank_of(3).low_confidence);
        assert!(!rank_of(3).retired);
    }

    #[test]
    fn test_inactivity_boundary() {
        let policy = RankingPolicy::new(2025);

        assert_eq!(policy.exclusion(&generate_politician(1, 1500.0, 100.0, 2017)), None);
        assert_eq!(
            policy.exclusion(&generate_politician(1, 1500.0, 100.0, 2016)),
            Some(Exclusion::Retired)
        );

        let mut never_ran = generate_politician(1, 1500.0, 100.0, 2020);
        never_ran.last_ran_in = None;
        assert_eq!(policy.exclusion(&never_ran), Some(Exclusion::Retired));
    }

    #[test]
    fn test_previous_ranking_is_attached() {
        let mut politicians = vec![
            generate_politician(1, 2000.0, 100.0, 2024),
            generate_politician(2, 1800.0, 100.0, 2024),
        ];
        let previous = HashMap::from([(2, 1)]);

        finalize_rankings(&mut politicians, &RankingPolicy::new(2025), &previous);

        assert_eq!(politicians[0].previous_ranking, None);
        assert_eq!(politicians[1].previous_ranking, Some(1));
    }

    #[test]
    fn test_rank_eligible_skips_excluded() {
        let politicians = vec![
            generate_politician(1, 1700.0, 100.0, 2024),
            generate_politician(2, 2100.0, 400.0, 2024),
            generate_politician(3, 1900.0, 100.0, 2024),
            generate_politician(4, 2000.0, 100.0, 2000),
        ];

        let ranks = rank_eligible(politicians.iter(), &RankingPolicy::new(2025));

        assert_eq!(ranks, HashMap::from([(3, 1), (1, 2)]));
    }
}
