use openskill::rating::Rating;
use serde::{Deserialize, Serialize};

use crate::model::constants::{DEFAULT_SIGMA, MAX_SIGMA, STARTING_RATING};

/// Gaussian estimate of a politician's skill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub mu: f64,
    pub sigma: f64
}

impl Belief {
    pub fn new(mu: f64, sigma: f64) -> Belief {
        Belief { mu, sigma }
    }

    /// The belief every politician starts with
    pub fn prior() -> Belief {
        Belief {
            mu: STARTING_RATING,
            sigma: DEFAULT_SIGMA
        }
    }

    pub fn is_low_confidence(&self) -> bool {
        self.sigma > MAX_SIGMA
    }

    pub fn is_valid(&self) -> bool {
        self.mu.is_finite() && self.sigma.is_finite() && self.sigma > 0.0
    }
}

impl Default for Belief {
    fn default() -> Self {
        Self::prior()
    }
}

impl From<Belief> for Rating {
    fn from(belief: Belief) -> Self {
        Rating {
            mu: belief.mu,
            sigma: belief.sigma
        }
    }
}

impl From<Rating> for Belief {
    fn from(rating: Rating) -> Self {
        Belief {
            mu: rating.mu,
            sigma: rating.sigma
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Belief;
    use crate::model::constants::{MAX_SIGMA, STARTING_RATING};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_prior() {
        let prior = Belief::prior();

        assert_abs_diff_eq!(prior.mu, 1500.0);
        assert_abs_diff_eq!(prior.sigma, 500.0);
        assert!(prior.is_low_confidence());
    }

    #[test]
    fn test_low_confidence_boundary() {
        assert!(!Belief::new(STARTING_RATING, MAX_SIGMA).is_low_confidence());
        assert!(Belief::new(STARTING_RATING, MAX_SIGMA + 0.001).is_low_confidence());
    }

    #[test]
    fn test_is_valid() {
        assert!(Belief::prior().is_valid());
        assert!(!Belief::new(f64::NAN, 100.0).is_valid());
        assert!(!Belief::new(1500.0, 0.0).is_valid());
        assert!(!Belief::new(1500.0, f64::INFINITY).is_valid());
    }
}
