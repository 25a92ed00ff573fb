//! Enrolled identities and the gallery that owns them

use serde::{Deserialize, Serialize};

use crate::types::{Embedding, GalleryError};

/// One enrolled person: a label plus one or more reference embeddings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrolledIdentity {
    pub label: String,
    pub embeddings: Vec<Embedding>,
}

/// The full set of enrolled identities, unique by label, insertion-ordered.
///
/// Enrolling an existing label appends another embedding under that label
/// rather than replacing it. Matching iterates in insertion order, which is
/// what makes distance ties deterministic (first enrolled wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gallery {
    identities: Vec<EnrolledIdentity>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enroll an embedding under a label. Empty labels are rejected;
    /// a known label gains an additional reference embedding.
    pub fn enroll(&mut self, label: &str, embedding: Embedding) -> Result<(), GalleryError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(GalleryError::EmptyLabel);
        }
        if let Some(identity) = self.identities.iter_mut().find(|i| i.label == label) {
            identity.embeddings.push(embedding);
        } else {
            self.identities.push(EnrolledIdentity {
                label: label.to_string(),
                embeddings: vec![embedding],
            });
        }
        Ok(())
    }

    /// Remove an identity by label; returns it if present
    pub fn remove_label(&mut self, label: &str) -> Option<EnrolledIdentity> {
        let pos = self.identities.iter().position(|i| i.label == label)?;
        Some(self.identities.remove(pos))
    }

    /// Remove an identity by insertion index
    pub fn remove_index(&mut self, index: usize) -> Option<EnrolledIdentity> {
        if index < self.identities.len() {
            Some(self.identities.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.identities.clear();
    }

    pub fn identities(&self) -> &[EnrolledIdentity] {
        &self.identities
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    /// All embeddings flattened across identities, each with its label,
    /// in insertion order
    pub fn flattened(&self) -> impl Iterator<Item = (&str, &Embedding)> {
        self.identities
            .iter()
            .flat_map(|i| i.embeddings.iter().map(move |e| (i.label.as_str(), e)))
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
    fn test_enroll_rejects_empty_label() {
        let mut g = Gallery::new();
        assert!(g.enroll("  ", emb(0.1)).is_err());
        assert!(g.is_empty());
    }

    #[test]
    fn test_duplicate_label_appends_embedding() {
        let mut g = Gallery::new();
        g.enroll("alice", emb(0.1)).unwrap();
        g.enroll("alice", emb(0.2)).unwrap();
        assert_eq!(g.len(), 1);
        assert_eq!(g.identities()[0].embeddings.len(), 2);
    }

    #[test]
    fn test_remove_by_label_and_index() {
        let mut g = Gallery::new();
        g.enroll("alice", emb(0.1)).unwrap();
        g.enroll("bob", emb(0.2)).unwrap();
        assert_eq!(g.remove_label("alice").unwrap().label, "alice");
        assert!(g.remove_label("alice").is_none());
        assert_eq!(g.remove_index(0).unwrap().label, "bob");
        assert!(g.remove_index(0).is_none());
    }

    #[test]
    fn test_flattened_preserves_insertion_order() {
        let mut g = Gallery::new();
        g.enroll("alice", emb(0.1)).unwrap();
        g.enroll("bob", emb(0.2)).unwrap();
        g.enroll("alice", emb(0.3)).unwrap();
        let labels: Vec<&str> = g.flattened().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["alice", "alice", "bob"]);
    }
}
