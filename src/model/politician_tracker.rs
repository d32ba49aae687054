use indexmap::IndexMap;

use crate::{
    database::db_structs::{Politician, RatingHistoryEntry},
    model::structures::belief::Belief
};

/// Owns every politician seen during a replay. Politicians are created lazily
/// on their first eligible appearance and are never removed.
///
/// Insertion order is the order of first appearance.
#[derive(Debug, Default)]
pub struct PoliticianTracker {
    politicians: IndexMap<i32, Politician>
}

impl PoliticianTracker {
    pub fn new() -> PoliticianTracker {
        PoliticianTracker {
            politicians: IndexMap::new()
        }
    }

    /// Returns the politician, creating it with the prior rating if this is
    /// its first appearance.
    pub fn get_or_create(&mut self, politician_id: i32, name: &str, party: &str) -> &mut Politician {
        self.politicians
            .entry(politician_id)
            .or_insert_with(|| Politician::new(politician_id, name, party))
    }

    pub fn get(&self, politician_id: i32) -> Option<&Politician> {
        self.politicians.get(&politician_id)
    }

    pub fn get_mut(&mut self, politician_id: i32) -> Option<&mut Politician> {
        self.politicians.get_mut(&politician_id)
    }

    pub fn current_belief(&self, politician_id: i32) -> Option<Belief> {
        self.get(politician_id).map(|p| p.rating())
    }

    /// Updates the politician's party and last contest year
    pub fn record_participation(&mut self, politician_id: i32, party: &str, year: i32) {
        if let Some(politician) = self.get_mut(politician_id) {
            politician.party = party.to_string();
            politician.last_ran_in = Some(year);
        }
    }

    /// Appends a rating history entry. History is never reordered or truncated.
    pub fn push_history(&mut self, politician_id: i32, contest_id: i32, rating: Belief) {
        if let Some(politician) = self.get_mut(politician_id) {
            politician.rating_history.push(RatingHistoryEntry {
                contest_id: Some(contest_id),
                rating
            });
        }
    }

    /// Appends an entry that repeats the politician's most recent belief
    pub fn carry_forward(&mut self, politician_id: i32, contest_id: i32) {
        if let Some(rating) = self.current_belief(politician_id) {
            self.push_history(politician_id, contest_id, rating);
        }
    }

    pub fn len(&self) -> usize {
        self.politicians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.politicians.is_empty()
    }

    pub fn politicians(&self) -> impl Iterator<Item = &Politician> {
        self.politicians.values()
    }

    pub fn into_politicians(self) -> Vec<Politician> {
        self.politicians.into_values().collect()
    }
}
