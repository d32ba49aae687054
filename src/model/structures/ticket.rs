use crate::model::structures::belief::Belief;

/// Politicians rated together as a single team for one contest.
/// Most tickets hold a single politician.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub politician_ids: Vec<i32>
}

impl Ticket {
    pub fn new(politician_ids: Vec<i32>) -> Ticket {
        Ticket { politician_ids }
    }

    pub fn len(&self) -> usize {
        self.politician_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.politician_ids.is_empty()
    }
}

/// Output of ticket building for a single contest. `tickets`, `beliefs` and
/// `ranks` are parallel.
#[derive(Debug, Clone, Default)]
pub struct ContestTickets {
    pub tickets: Vec<Ticket>,
    pub beliefs: Vec<Vec<Belief>>,
    pub ranks: Vec<usize>,
    /// Index of each ticket's lead entry in the contest's candidate list
    pub candidate_indices: Vec<usize>,
    /// Whether the skill model should be run for this contest
    pub should_rate: bool
}

impl ContestTickets {
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Every politician that survived filtering, in ticket order
    pub fn participants(&self) -> impl Iterator<Item = i32> + '_ {
        self.tickets.iter().flat_map(|t| t.politician_ids.iter().copied())
    }
}
