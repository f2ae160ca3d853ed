use serde::{Deserialize, Serialize};

/// Confidence tier for an accepted match.
///
/// Derived from the composite score for one-to-one matches; grouped
/// matches are fixed at [`Confidence::Medium`] because they are accepted
/// on amount evidence alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Self::High
        } else if score >= 0.70 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(Confidence::from_score(1.0), Confidence::High);
        assert_eq!(Confidence::from_score(0.85), Confidence::High);
        assert_eq!(Confidence::from_score(0.84), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.70), Confidence::Medium);
        assert_eq!(Confidence::from_score(0.69), Confidence::Low);
        assert_eq!(Confidence::from_score(0.0), Confidence::Low);
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);
    }
}
