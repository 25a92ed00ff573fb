//! Identity matcher: nearest-neighbor annotation over the gallery
//!
//! Informational only. A match (or its absence) never feeds back into the
//! gate; it exists to label who the single safe subject appears to be.

use serde::{Deserialize, Serialize};

use crate::types::{Embedding, Gallery};
use crate::MATCH_RADIUS;

/// Best match for a probe embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub label: String,
    pub distance: f64,
}

impl MatchResult {
    /// Display mapping only; plays no part in any gating decision
    pub fn confidence_pct(&self) -> f64 {
        (100.0 - self.distance * 100.0).clamp(0.0, 100.0)
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Recognized: {} (confidence: {:.1}%)",
            self.label,
            self.confidence_pct()
        )
    }
}

/// Euclidean nearest-neighbor search with an acceptance radius
#[derive(Debug, Clone)]
pub struct IdentityMatcher {
    radius: f64,
}

impl IdentityMatcher {
    pub fn new() -> Self {
        Self {
            radius: MATCH_RADIUS,
        }
    }

    pub fn with_radius(radius: f64) -> Self {
        Self { radius }
    }

    /// Find the enrolled identity whose nearest embedding is closest to the
    /// probe. None if the gallery is empty or nothing falls inside the
    /// acceptance radius. Ties keep the first-inserted label: iteration is
    /// in gallery insertion order and only a strictly smaller distance
    /// replaces the candidate.
    pub fn best_match(&self, probe: &Embedding, gallery: &Gallery) -> Option<MatchResult> {
        let mut best: Option<MatchResult> = None;
        for (label, embedding) in gallery.flattened() {
            let distance = probe.distance(embedding);
            match &best {
                Some(b) if distance >= b.distance => {}
                _ => {
                    best = Some(MatchResult {
                        label: label.to_string(),
                        distance,
                    });
                }
            }
        }
        best.filter(|b| b.distance < self.radius)
    }
}

impl Default for IdentityMatcher {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EMBEDDING_DIM;

    fn emb(fill: f32) -> Embedding {
        Embedding::new(vec![fill; EMBEDDING_DIM]).unwrap()
    }

    #[test]
    fn test_empty_gallery_never_matches() {
        let matcher = IdentityMatcher::new();
        assert!(matcher.best_match(&emb(0.3), &Gallery::new()).is_none());
    }

    #[test]
    fn test_nearest_identity_wins() {
        let mut g = Gallery::new();
        g.enroll("far", emb(0.04)).unwrap();
        g.enroll("near", emb(0.01)).unwrap();
        let matcher = IdentityMatcher::new();
        let m = matcher.best_match(&emb(0.0), &g).unwrap();
        assert_eq!(m.label, "near");
    }

    #[test]
    fn test_outside_radius_is_no_match() {
        let mut g = Gallery::new();
        // ||0.1 * ones(128)|| ≈ 1.13, well outside the 0.6 radius
        g.enroll("alice", emb(0.1)).unwrap();
        let matcher = IdentityMatcher::new();
        assert!(matcher.best_match(&emb(0.0), &g).is_none());
    }

    #[test]
    fn test_tie_keeps_first_inserted_label() {
        let mut g = Gallery::new();
        g.enroll("first", emb(0.01)).unwrap();
        g.enroll("second", emb(0.01)).unwrap();
        let matcher = IdentityMatcher::new();
        let m = matcher.best_match(&emb(0.0), &g).unwrap();
        assert_eq!(m.label, "first");
    }

    #[test]
    fn test_searches_all_embeddings_of_an_identity() {
        let mut g = Gallery::new();
        g.enroll("alice", emb(0.04)).unwrap();
        g.enroll("alice", emb(0.001)).unwrap(); // second enrollment, closer
        g.enroll("bob", emb(0.02)).unwrap();
        let matcher = IdentityMatcher::new();
        let m = matcher.best_match(&emb(0.0), &g).unwrap();
        assert_eq!(m.label, "alice");
    }

    #[test]
    fn test_confidence_mapping_clamps() {
        let exact = MatchResult {
            label: "a".into(),
            distance: 0.0,
        };
        assert_eq!(exact.confidence_pct(), 100.0);
        let far = MatchResult {
            label: "a".into(),
            distance: 2.0,
        };
        assert_eq!(far.confidence_pct(), 0.0);
        let mid = MatchResult {
            label: "a".into(),
            distance: 0.4,
        };
        assert!((mid.confidence_pct() - 60.0).abs() < 1e-9);
    }
}
