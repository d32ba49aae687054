use std::collections::HashMap;

use chrono::{Months, NaiveDate};
use tracing::{debug, error, info};

use crate::{
    database::db_structs::{Contest, Politician},
    model::{
        constants::SNAPSHOT_LOOKBACK_MONTHS,
        eligibility::EligibilityMetadata,
        error::ReplayError,
        exclusion::PlaceholderRules,
        politician_tracker::PoliticianTracker,
        ranking::{finalize_rankings, rank_eligible, RankingPolicy},
        rating_updater::{RatingOutcome, RatingUpdater, SkillModel},
        structures::ticket::ContestTickets,
        ticket_builder::TicketBuilder
    },
    utils::progress_utils::progress_bar
};

/// Replays every contest in chronological order, maintaining each
/// politician's rating history.
pub struct ReplayModel<M: SkillModel> {
    pub politician_tracker: PoliticianTracker,
    updater: RatingUpdater<M>,
    metadata: EligibilityMetadata,
    rules: PlaceholderRules,
    policy: RankingPolicy,
    latest_data_date: NaiveDate,
    /// Populated at most once per run
    previous_rankings: Option<HashMap<i32, u32>>
}

impl<M: SkillModel> ReplayModel<M> {
    pub fn new(
        model: M,
        metadata: EligibilityMetadata,
        latest_data_date: NaiveDate,
        current_year: i32
    ) -> ReplayModel<M> {
        ReplayModel {
            politician_tracker: PoliticianTracker::new(),
            updater: RatingUpdater::new(model),
            metadata,
            rules: PlaceholderRules::default(),
            policy: RankingPolicy::new(current_year),
            latest_data_date,
            previous_rankings: None
        }
    }

    pub fn with_rules(mut self, rules: PlaceholderRules) -> ReplayModel<M> {
        self.rules = rules;
        self
    }

    pub fn model(&self) -> &M {
        self.updater.model()
    }

    pub fn previous_rankings(&self) -> Option<&HashMap<i32, u32>> {
        self.previous_rankings.as_ref()
    }

    /// Processes all contests. Contests are put in replay order first; upcoming
    /// contests receive a projected rating annotation on their candidates.
    pub fn process(&mut self, contests: &mut [Contest]) -> Result<(), ReplayError> {
        order_contests(contests, &self.metadata);

        let bar = progress_bar(contests.len() as u64, "Replaying contests".to_string());
        let mut year_being_processed = None;

        for contest in contests.iter_mut() {
            if year_being_processed != Some(contest.year()) {
                year_being_processed = Some(contest.year());
                info!("Processing contests from {}", contest.year());
                bar.set_message(format!("Processing contests from {}", contest.year()));
            }

            self.take_snapshot_if_due(contest.date);
            self.process_contest(contest)?;

            bar.inc(1);
        }

        bar.finish();
        info!("Rated {} politicians", self.politician_tracker.len());
        Ok(())
    }

    /// # Contest processing
    ///
    /// 1. Build tickets and placement ranks, creating politicians as needed.
    /// 2. Upcoming contests receive a display annotation from the current beliefs.
    /// 3. Run the rating update, or carry beliefs forward when the contest cannot
    ///    move ratings (fewer than two tickets, or upcoming), appending one
    ///    history entry per participant.
    pub fn process_contest(&mut self, contest: &mut Contest) -> Result<(), ReplayError> {
        let builder = TicketBuilder::new(&self.metadata, &self.rules);
        let tickets = builder.build(contest, &mut self.politician_tracker);

        if contest.upcoming {
            Self::annotate_upcoming(contest, &tickets);
        }

        match self.updater.update(&tickets) {
            Ok(RatingOutcome::Updated(results)) => {
                for (ticket, ratings) in tickets.tickets.iter().zip(results) {
                    for (politician_id, rating) in ticket.politician_ids.iter().zip(ratings) {
                        self.politician_tracker.push_history(*politician_id, contest.id, rating);
                    }
                }
            }
            Ok(RatingOutcome::CarriedForward) => {
                debug!(
                    "Carrying ratings forward for contest {} ({} tickets)",
                    contest.id,
                    tickets.len()
                );
                for politician_id in tickets.participants() {
                    self.politician_tracker.carry_forward(politician_id, contest.id);
                }
            }
            Err(source) => {
                let err = ReplayError::RatingUpdate {
                    contest_id: contest.id,
                    contest_name: contest.name.clone(),
                    date: contest.date,
                    tickets: tickets.tickets.iter().map(|t| t.politician_ids.clone()).collect(),
                    beliefs: tickets.beliefs.clone(),
                    ranks: tickets.ranks.clone(),
                    source
                };
                error!("{}", err);
                error!("Contest: {:?}", contest);
                return Err(err);
            }
        }

        Ok(())
    }

    /// Consumes the model, returning every politician with final rankings
    pub fn finish(self) -> Vec<Politician> {
        let previous_rankings = self.previous_rankings.unwrap_or_default();
        let mut politicians = self.politician_tracker.into_politicians();

        finalize_rankings(&mut politicians, &self.policy, &previous_rankings);
        politicians
    }

    fn annotate_upcoming(contest: &mut Contest, tickets: &ContestTickets) {
        for (idx, beliefs) in tickets.candidate_indices.iter().zip(&tickets.beliefs) {
            if let (Some(candidate), Some(belief)) = (contest.candidates.get_mut(*idx), beliefs.first()) {
                candidate.projected_rating = Some((*belief).into());
            }
        }
    }

    /// Ranks politicians as they stand before the first contest inside the
    /// lookback window
    fn take_snapshot_if_due(&mut self, contest_date: NaiveDate) {
        if self.previous_rankings.is_some() || !self.is_within_lookback(contest_date) {
            return;
        }

        let rankings = rank_eligible(self.politician_tracker.politicians(), &self.policy);
        info!(
            "Captured previous rankings for {} politicians as of {}",
            rankings.len(),
            contest_date
        );
        self.previous_rankings = Some(rankings);
    }

    fn is_within_lookback(&self, contest_date: NaiveDate) -> bool {
        match self
            .latest_data_date
            .checked_sub_months(Months::new(SNAPSHOT_LOOKBACK_MONTHS))
        {
            Some(cutoff) => contest_date > cutoff,
            None => true
        }
    }
}

/// Puts contests in replay order: ascending date, then stage within the day
/// (nominations before elections), then primary calendar position.
/// The sort is stable.
pub fn order_contests(contests: &mut [Contest], metadata: &EligibilityMetadata) {
    contests.sort_by_key(|c| (c.date, c.class().replay_stage(), schedule_key(c, metadata)));
}

fn schedule_key(contest: &Contest, metadata: &EligibilityMetadata) -> usize {
    if !contest.class().is_presidential_primary() {
        return usize::MAX;
    }

    contest
        .candidates
        .first()
        .and_then(|c| metadata.contest_schedule_position(contest.year(), &c.party, &contest.name))
        .unwrap_or(usize::MAX)
}
