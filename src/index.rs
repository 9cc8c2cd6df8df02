//! Flat brute-force similarity index.
//!
//! Stores fixed-dimension `f32` vectors contiguously and answers k-nearest
//! queries by squared Euclidean distance. Linear scan only; adequate for a
//! corpus of document-sized batches, a scaling limit beyond that.

use std::cmp::Ordering;

use crate::core::errors::RagError;

/// Serialized header: dimension + vector count, both little-endian u32.
const HEADER_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append vectors in order. Every vector is validated against the index
    /// dimension before any of them is stored, so a bad batch commits nothing.
    pub fn append(&mut self, vectors: &[Vec<f32>]) -> Result<(), RagError> {
        for vector in vectors {
            if vector.len() != self.dimension {
                return Err(RagError::Embedding(format!(
                    "expected {}-dimensional vector, got {}",
                    self.dimension,
                    vector.len()
                )));
            }
        }
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }
        Ok(())
    }

    /// K-nearest positions by ascending squared L2 distance. Ties keep
    /// insertion order (stable sort). An empty index yields an empty result.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if self.is_empty() || k == 0 || query.len() != self.dimension {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .map(|candidate| squared_l2(query, candidate))
            .enumerate()
            .collect();

        scored.sort_by(|left, right| left.1.partial_cmp(&right.1).unwrap_or(Ordering::Equal));
        scored.truncate(k.min(self.len()));
        scored
    }

    /// Encode as `[dimension: u32][count: u32][f32 payload]`, little-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.data.len() * 4);
        out.extend_from_slice(&(self.dimension as u32).to_le_bytes());
        out.extend_from_slice(&(self.len() as u32).to_le_bytes());
        for value in &self.data {
            out.extend_from_slice(&value.to_le_bytes());
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RagError> {
        if bytes.len() < HEADER_LEN {
            return Err(RagError::IndexCorruption(format!(
                "index blob too short: {} bytes",
                bytes.len()
            )));
        }

        let dimension = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        let payload = &bytes[HEADER_LEN..];

        if dimension == 0 && count > 0 {
            return Err(RagError::IndexCorruption(
                "zero-dimension index with non-zero count".to_string(),
            ));
        }

        // Header values are untrusted; a corrupt blob must decode to an
        // error, not an arithmetic panic.
        let expected_len = dimension
            .checked_mul(count)
            .and_then(|vals| vals.checked_mul(4))
            .ok_or_else(|| {
                RagError::IndexCorruption(format!(
                    "implausible index header: dimension {dimension}, count {count}"
                ))
            })?;
        if payload.len() != expected_len {
            return Err(RagError::IndexCorruption(format!(
                "index payload is {} bytes, expected {}",
                payload.len(),
                expected_len
            )));
        }

        let data = payload
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(Self { dimension, data })
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}
