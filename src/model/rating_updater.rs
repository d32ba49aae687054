use openskill::{
    model::{model::Model, plackett_luce::PlackettLuce},
    rating::{default_gamma, Rating}
};

use crate::model::{
    constants,
    error::RatingError,
    structures::{belief::Belief, ticket::ContestTickets}
};

/// A Bayesian multi-team skill update. Given teams of current beliefs and a
/// parallel list of placement ranks (lower is better, ties and gaps allowed),
/// returns the posterior beliefs in the same shape.
pub trait SkillModel {
    fn rate(&self, teams: &[Vec<Belief>], ranks: &[usize]) -> Result<Vec<Vec<Belief>>, RatingError>;
}

/// Checks the skill model input contract
pub fn validate_input(teams: &[Vec<Belief>], ranks: &[usize]) -> Result<(), RatingError> {
    if teams.len() != ranks.len() {
        return Err(RatingError::ArityMismatch {
            teams: teams.len(),
            ranks: ranks.len()
        });
    }

    if teams.len() < 2 {
        return Err(RatingError::TooFewTeams(teams.len()));
    }

    for (i, team) in teams.iter().enumerate() {
        if team.is_empty() {
            return Err(RatingError::EmptyTeam(i));
        }

        if let Some(belief) = team.iter().find(|b| !b.is_valid()) {
            return Err(RatingError::InvalidBelief {
                team: i,
                belief: *belief
            });
        }
    }

    Ok(())
}

pub fn create_model() -> PlackettLuce {
    PlackettLuce::new(constants::BETA, constants::KAPPA, default_gamma)
}

/// Production skill model backed by openskill's Plackett-Luce implementation
pub struct PlackettLuceModel {
    model: PlackettLuce
}

impl PlackettLuceModel {
    pub fn new() -> PlackettLuceModel {
        PlackettLuceModel { model: create_model() }
    }
}

impl Default for PlackettLuceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillModel for PlackettLuceModel {
    fn rate(&self, teams: &[Vec<Belief>], ranks: &[usize]) -> Result<Vec<Vec<Belief>>, RatingError> {
        validate_input(teams, ranks)?;

        let model_teams: Vec<Vec<Rating>> = teams
            .iter()
            .map(|team| team.iter().map(|b| Rating::from(*b)).collect())
            .collect();

        let results = self.model.rate(model_teams, ranks.to_vec());

        if results.len() != teams.len() || results.iter().zip(teams).any(|(r, t)| r.len() != t.len()) {
            return Err(RatingError::MalformedOutput {
                expected: teams.len(),
                returned: results.len()
            });
        }

        Ok(results
            .into_iter()
            .map(|team| team.into_iter().map(Belief::from).collect())
            .collect())
    }
}

/// Outcome of rating a single contest
#[derive(Debug, Clone, PartialEq)]
pub enum RatingOutcome {
    /// Posterior beliefs, parallel to the contest's tickets
    Updated(Vec<Vec<Belief>>),
    /// The contest must not move ratings. Participants keep their beliefs.
    CarriedForward
}

/// Applies the rating policy: the skill model only runs for contests that
/// have taken place and have at least two tickets.
pub struct RatingUpdater<M: SkillModel> {
    model: M
}

impl<M: SkillModel> RatingUpdater<M> {
    pub fn new(model: M) -> RatingUpdater<M> {
        RatingUpdater { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn update(&self, tickets: &ContestTickets) -> Result<RatingOutcome, RatingError> {
        if !tickets.should_rate {
            return Ok(RatingOutcome::CarriedForward);
        }

        self.model
            .rate(&tickets.beliefs, &tickets.ranks)
            .map(RatingOutcome::Updated)
    }
}
