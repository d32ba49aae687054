use crate::model::{constants::PRESIDENTIAL_OFFICE_MARKER, structures::contest_type::ContestType};

/// How the replay treats a contest. Derived once per contest from its type and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContestClass {
    /// Primary election or caucus
    Primary { presidential: bool },
    PrimaryRunoff,
    SpecialPrimary,
    General,
    Runoff,
    Special,
    RunningMate,
    /// The type label could not be mapped. Treated as an ultimate election.
    Unknown
}

impl ContestClass {
    pub fn classify(contest_type: &ContestType, name: &str) -> ContestClass {
        match contest_type {
            ContestType::Caucus | ContestType::PrimaryElection => ContestClass::Primary {
                presidential: name.contains(PRESIDENTIAL_OFFICE_MARKER)
            },
            ContestType::PrimaryElectionRunOff => ContestClass::PrimaryRunoff,
            ContestType::SpecialElectionPrimary => ContestClass::SpecialPrimary,
            ContestType::GeneralElection => ContestClass::General,
            ContestType::RunOff => ContestClass::Runoff,
            ContestType::SpecialElection => ContestClass::Special,
            ContestType::RunningMate => ContestClass::RunningMate,
            ContestType::Unknown(_) => ContestClass::Unknown
        }
    }

    pub fn is_presidential_primary(&self) -> bool {
        matches!(self, ContestClass::Primary { presidential: true })
    }

    /// Whether a win in this contest settles the office
    pub fn is_ultimate_election(&self) -> bool {
        matches!(
            self,
            ContestClass::General
                | ContestClass::Runoff
                | ContestClass::Special
                | ContestClass::RunningMate
                | ContestClass::Unknown
        )
    }

    /// Ordering of contests that share a date. Nominations are decided before
    /// the elections they feed into.
    pub fn replay_stage(&self) -> u8 {
        match self {
            ContestClass::Primary { .. } | ContestClass::SpecialPrimary => 0,
            ContestClass::PrimaryRunoff => 1,
            ContestClass::General | ContestClass::Special | ContestClass::RunningMate | ContestClass::Unknown => 2,
            ContestClass::Runoff => 3
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ContestClass;
    use crate::model::structures::contest_type::ContestType;

    #[test]
    fn test_presidential_primary() {
        let class = ContestClass::classify(&ContestType::PrimaryElection, "US President - D Primary");
        assert_eq!(class, ContestClass::Primary { presidential: true });
        assert!(class.is_presidential_primary());
        assert!(!class.is_ultimate_election());

        let caucus = ContestClass::classify(&ContestType::Caucus, "IA US President - R Caucus");
        assert!(caucus.is_presidential_primary());
    }

    #[test]
    fn test_presidential_marker_requires_primary_type() {
        let class = ContestClass::classify(&ContestType::GeneralElection, "US President");
        assert_eq!(class, ContestClass::General);
        assert!(!class.is_presidential_primary());

        let special_primary = ContestClass::classify(&ContestType::SpecialElectionPrimary, "US President");
        assert!(!special_primary.is_presidential_primary());
    }

    #[test]
    fn test_ultimate_elections() {
        let ultimate = [
            ContestType::GeneralElection,
            ContestType::RunOff,
            ContestType::SpecialElection,
            ContestType::RunningMate
        ];
        for contest_type in ultimate {
            assert!(ContestClass::classify(&contest_type, "NY Governor").is_ultimate_election());
        }

        let nominating = [
            ContestType::Caucus,
            ContestType::PrimaryElection,
            ContestType::PrimaryElectionRunOff,
            ContestType::SpecialElectionPrimary
        ];
        for contest_type in nominating {
            assert!(!ContestClass::classify(&contest_type, "NY Governor").is_ultimate_election());
        }
    }

    #[test]
    fn test_unknown_fails_open() {
        let class = ContestClass::classify(&ContestType::Unknown("Convention".to_string()), "NY Governor");
        assert_eq!(class, ContestClass::Unknown);
        assert!(class.is_ultimate_election());
    }

    #[test]
    fn test_replay_stage_order() {
        let primary = ContestClass::Primary { presidential: false };
        assert!(primary.replay_stage() < ContestClass::PrimaryRunoff.replay_stage());
        assert!(ContestClass::PrimaryRunoff.replay_stage() < ContestClass::General.replay_stage());
        assert!(ContestClass::General.replay_stage() < ContestClass::Runoff.replay_stage());
    }
}
