use std::collections::HashSet;

use itertools::Itertools;
use tracing::{trace, warn};

use crate::{
    database::db_structs::{Contest, ContestCandidate},
    model::{
        constants::NEGLIGIBLE_VOTE_SHARE,
        eligibility::EligibilityMetadata,
        exclusion::PlaceholderRules,
        politician_tracker::PoliticianTracker,
        structures::{
            belief::Belief,
            ticket::{ContestTickets, Ticket}
        }
    }
};

/// Per-contest facts that drive placement ranks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContestSummary {
    pub is_presidential_primary: bool,
    pub is_ultimate_election: bool,
    /// Only win/loss is known, every vote count is 0 or 1
    pub is_one_shot: bool,
    /// False when the leading entry has no vote count
    pub votes_recorded: bool,
    pub num_winners: usize,
    pub total_votes: i64,
    pub field_size: usize
}

impl ContestSummary {
    pub fn new(contest: &Contest) -> ContestSummary {
        let class = contest.class();
        let num_winners = contest.candidates.iter().filter(|c| c.won).count();

        ContestSummary {
            is_presidential_primary: class.is_presidential_primary(),
            is_ultimate_election: class.is_ultimate_election(),
            is_one_shot: contest.candidates.iter().all(|c| matches!(c.vote_count(), 0 | 1)),
            votes_recorded: contest.candidates.first().is_some_and(|c| c.votes.is_some()),
            num_winners,
            total_votes: contest.candidates.iter().map(|c| c.vote_count()).sum(),
            field_size: contest.candidates.len()
        }
    }

    pub fn has_winner(&self) -> bool {
        self.num_winners > 0
    }

    /// Sub-1% candidates in a crowded, vote-counted field are tied for last place
    pub fn is_negligible(&self, votes: i64) -> bool {
        !self.is_one_shot
            && self.total_votes > 0
            && self.field_size > 2
            && (votes as f64 / self.total_votes as f64) < NEGLIGIBLE_VOTE_SHARE
    }

    fn initial_rank(&self) -> usize {
        if self.has_winner() && self.is_ultimate_election {
            1
        } else {
            0
        }
    }
}

/// Turns a contest's candidate list into rated tickets and placement ranks
pub struct TicketBuilder<'a> {
    metadata: &'a EligibilityMetadata,
    rules: &'a PlaceholderRules
}

impl<'a> TicketBuilder<'a> {
    pub fn new(metadata: &'a EligibilityMetadata, rules: &'a PlaceholderRules) -> TicketBuilder<'a> {
        TicketBuilder { metadata, rules }
    }

    /// Filters the candidates of `contest`, creating politicians on their first
    /// appearance, and assigns each surviving ticket a placement rank (0 is best).
    ///
    /// Candidates are visited in descending vote order. A candidate that won an
    /// ultimate election is ranked 0. Everyone else takes the running rank,
    /// which advances after each candidate that is neither such a winner nor
    /// negligible. If the contest has no recorded votes, ranks reduce to
    /// win (0) / lose (1).
    pub fn build(&self, contest: &Contest, tracker: &mut PoliticianTracker) -> ContestTickets {
        let summary = ContestSummary::new(contest);
        let mut next_rank = summary.initial_rank();
        let mut result = ContestTickets::default();
        let mut seen: HashSet<i32> = HashSet::new();

        let ordered = contest
            .candidates
            .iter()
            .enumerate()
            .sorted_by(|(_, a), (_, b)| b.vote_count().cmp(&a.vote_count()));

        for (idx, candidate) in ordered {
            if !self.metadata.is_candidate_eligible(contest, candidate) {
                trace!(
                    "Skipping {} in contest {}: not in the race on {}",
                    candidate.name,
                    contest.id,
                    contest.date
                );
                continue;
            }

            if self.rules.is_placeholder(candidate) {
                trace!("Skipping placeholder {} in contest {}", candidate.name, contest.id);
                continue;
            }

            let ticket = Self::ticket_for(candidate);
            if ticket.politician_ids.iter().any(|id| seen.contains(id)) {
                warn!(
                    "Politician listed more than once in contest {}, ignoring entry {}",
                    contest.id, candidate.id
                );
                continue;
            }

            let beliefs = self.register_members(contest, candidate, tracker);
            let won_outright = candidate.won && summary.is_ultimate_election;

            let rank = if !summary.votes_recorded {
                if candidate.won {
                    0
                } else {
                    1
                }
            } else if won_outright {
                0
            } else {
                next_rank
            };

            if summary.votes_recorded && !won_outright && !summary.is_negligible(candidate.vote_count()) {
                next_rank += 1;
            }

            seen.extend(ticket.politician_ids.iter().copied());
            result.tickets.push(ticket);
            result.beliefs.push(beliefs);
            result.ranks.push(rank);
            result.candidate_indices.push(idx);
        }

        result.should_rate = result.len() >= 2 && !contest.upcoming;
        result
    }

    fn ticket_for(candidate: &ContestCandidate) -> Ticket {
        let ids = std::iter::once(candidate.politician_id)
            .chain(candidate.running_mates.iter().map(|m| m.politician_id))
            .collect();

        Ticket::new(ids)
    }

    /// Gets or creates every ticket member, returning their current beliefs.
    /// Participation is only recorded for contests that have taken place.
    fn register_members(
        &self,
        contest: &Contest,
        candidate: &ContestCandidate,
        tracker: &mut PoliticianTracker
    ) -> Vec<Belief> {
        let members = std::iter::once((candidate.politician_id, candidate.name.as_str())).chain(
            candidate
                .running_mates
                .iter()
                .map(|m| (m.politician_id, m.name.as_str()))
        );

        let mut beliefs = Vec::new();
        for (politician_id, name) in members {
            let belief = tracker.get_or_create(politician_id, name, &candidate.party).rating();

            if !contest.upcoming {
                tracker.record_participation(politician_id, &candidate.party, contest.year());
            }

            beliefs.push(belief);
        }

        beliefs
    }
}
