//! Per-tick classification categories and the debounced verdict

use serde::{Deserialize, Serialize};

/// Classification assigned to one sample by the policy thresholds.
///
/// A motion reading inside the neutral band maps to *no* category: the
/// tick touches no counter and resets none. Face mode has no such band,
/// every count maps to exactly one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// No face in frame
    NoSubject,
    /// More than one face in frame (shoulder-surfing risk)
    MultipleSubjects,
    /// Exactly one face in frame
    SingleSubject,
    /// Motion below the low threshold
    LowMotion,
    /// Motion above the high threshold
    HighMotion,
}

impl Category {
    /// The verdict this category produces once its run crosses the threshold
    pub fn verdict(&self) -> Verdict {
        match self {
            Category::SingleSubject | Category::LowMotion => Verdict::Safe,
            Category::NoSubject | Category::MultipleSubjects | Category::HighMotion => {
                Verdict::Unsafe
            }
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::NoSubject => "NO_SUBJECT",
            Category::MultipleSubjects => "MULTIPLE_SUBJECTS",
            Category::SingleSubject => "SINGLE_SUBJECT",
            Category::LowMotion => "LOW_MOTION",
            Category::HighMotion => "HIGH_MOTION",
        };
        write!(f, "{}", name)
    }
}

/// Debounced tracker output for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// A safe-leaning category persisted for its full window
    Safe,
    /// An unsafe-leaning category persisted for its full window
    Unsafe,
    /// No counter has crossed its threshold yet; carries no gating action
    Indeterminate,
}

impl Verdict {
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Verdict::Indeterminate)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Verdict::Safe => "SAFE",
            Verdict::Unsafe => "UNSAFE",
            Verdict::Indeterminate => "INDETERMINATE",
        };
        write!(f, "{}", name)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_verdict_mapping() {
        assert_eq!(Category::SingleSubject.verdict(), Verdict::Safe);
        assert_eq!(Category::LowMotion.verdict(), Verdict::Safe);
        assert_eq!(Category::NoSubject.verdict(), Verdict::Unsafe);
        assert_eq!(Category::MultipleSubjects.verdict(), Verdict::Unsafe);
        assert_eq!(Category::HighMotion.verdict(), Verdict::Unsafe);
    }

    #[test]
    fn test_indeterminate_not_actionable() {
        assert!(!Verdict::Indeterminate.is_actionable());
        assert!(Verdict::Safe.is_actionable());
        assert!(Verdict::Unsafe.is_actionable());
    }
}
