//! Per-tick input samples from the external signal source

use serde::{Deserialize, Serialize};

use crate::types::GalleryError;
use crate::EMBEDDING_DIM;

/// Which detection pipeline feeds the session. Chosen once at startup
/// (face model available or not) and fixed for the session lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionMode {
    /// Face-count samples from a face model
    Face,
    /// Frame-difference motion intensity fallback
    Motion,
}

impl DetectionMode {
    /// Tick period for this mode in milliseconds
    pub fn tick_ms(&self) -> u64 {
        match self {
            DetectionMode::Face => crate::FACE_TICK_MS,
            DetectionMode::Motion => crate::MOTION_TICK_MS,
        }
    }
}

impl std::fmt::Display for DetectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DetectionMode::Face => "FACE",
            DetectionMode::Motion => "MOTION",
        };
        write!(f, "{}", name)
    }
}

/// A 128-dimensional face descriptor from the external recognition model.
///
/// Stored as a Vec because the gallery persists as JSON arrays; the
/// dimension is validated at every construction site instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct Embedding {
    values: Vec<f32>,
}

impl Embedding {
    /// Build an embedding, rejecting anything that is not 128-dim
    pub fn new(values: Vec<f32>) -> Result<Self, GalleryError> {
        if values.len() != EMBEDDING_DIM {
            return Err(GalleryError::BadDimension {
                expected: EMBEDDING_DIM,
                found: values.len(),
            });
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Euclidean distance to another embedding
    pub fn distance(&self, other: &Embedding) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| {
                let d = (*a - *b) as f64;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl TryFrom<Vec<f32>> for Embedding {
    type Error = GalleryError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Embedding::new(values)
    }
}

impl From<Embedding> for Vec<f32> {
    fn from(e: Embedding) -> Self {
        e.values
    }
}

/// One sample per tick; exactly one variant per the active detection mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sample {
    /// Face mode: number of detected faces, plus the primary subject's
    /// descriptor when the model produced one
    Face {
        count: usize,
        embedding: Option<Embedding>,
    },
    /// Motion mode: mean per-pixel frame difference, >= 0
    Motion { intensity: f64 },
}

impl Sample {
    /// The mode this sample belongs to
    pub fn mode(&self) -> DetectionMode {
        match self {
            Sample::Face { .. } => DetectionMode::Face,
            Sample::Motion { .. } => DetectionMode::Motion,
        }
    }

    /// Shorthand for a face sample with no descriptor
    pub fn faces(count: usize) -> Self {
        Sample::Face {
            count,
            embedding: None,
        }
    }

    /// Shorthand for a motion sample
    pub fn motion(intensity: f64) -> Self {
        Sample::Motion { intensity }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_rejects_wrong_dimension() {
        assert!(Embedding::new(vec![0.0; 64]).is_err());
        assert!(Embedding::new(vec![0.0; EMBEDDING_DIM]).is_ok());
    }

    #[test]
    fn test_embedding_distance_zero_for_identical() {
        let a = Embedding::new(vec![0.5; EMBEDDING_DIM]).unwrap();
        let b = Embedding::new(vec![0.5; EMBEDDING_DIM]).unwrap();
        assert!(a.distance(&b) < 1e-9);
    }

    #[test]
    fn test_embedding_distance_is_euclidean() {
        let mut v = vec![0.0; EMBEDDING_DIM];
        v[0] = 3.0;
        v[1] = 4.0;
        let a = Embedding::new(v).unwrap();
        let b = Embedding::new(vec![0.0; EMBEDDING_DIM]).unwrap();
        assert!((a.distance(&b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_sample_mode() {
        assert_eq!(Sample::faces(1).mode(), DetectionMode::Face);
        assert_eq!(Sample::motion(3.0).mode(), DetectionMode::Motion);
    }
}
