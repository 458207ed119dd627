use super::distance::{feature_sums, sum};
use super::error::{AbundanceError, Result};
use super::neighbor::Ranked;
use serde::Deserialize;
use std::time::Instant;

/// What to do when a sum used as a denominator is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Fail construction with `AbundanceError::Degenerate`.
    #[default]
    Reject,
    /// Treat 0/0 as 0.
    Zero,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Rank every position against every other at construction.
    pub precompute: bool,
    pub degenerate: DegeneratePolicy,
}

/// An immutable set of abundance vectors together with the state derived from
/// them: per-feature weights, per-vector relative abundances and, optionally,
/// the full neighbor ranking of every position.
#[derive(Clone, Debug)]
pub struct Collection {
    vectors: Vec<Vec<f64>>,
    feature_weights: Vec<f64>,
    relative_vectors: Vec<Vec<f64>>,
    pub(crate) neighbors: Option<Vec<Vec<Ranked>>>,
}

impl Collection {
    pub fn new(vectors: Vec<Vec<f64>>) -> Result<Self> {
        Self::build(vectors, Options::default())
    }

    pub fn build(vectors: Vec<Vec<f64>>, options: Options) -> Result<Self> {
        let start = Instant::now();
        if vectors.is_empty() {
            return Err(AbundanceError::Shape("vectors cannot be empty".to_string()));
        }
        let features = assert_vector_shape(&vectors)?;

        debug!("summing {} vectors", vectors.len());
        let vector_sums = vectors.iter().map(|v| sum(v)).collect::<Vec<_>>();
        if let Some(i) = vector_sums.iter().position(|s| !s.is_finite()) {
            return Err(AbundanceError::Degenerate(format!(
                "sum of vector {} overflows",
                i
            )));
        }

        debug!("summing {} features", features);
        let feature_sums = feature_sums(&vectors, features);
        let total = sum(&feature_sums);
        // total bounds every feature sum
        if !total.is_finite() {
            return Err(AbundanceError::Degenerate(
                "sum of the collection overflows".to_string(),
            ));
        }
        let feature_weights = if total > 0.0 {
            feature_sums.iter().map(|s| s / total).collect()
        } else {
            match options.degenerate {
                DegeneratePolicy::Reject => {
                    return Err(AbundanceError::Degenerate(
                        "every feature of every vector is zero".to_string(),
                    ))
                }
                DegeneratePolicy::Zero => {
                    warn!("all-zero collection, every feature weight is 0");
                    vec![0f64; features]
                }
            }
        };

        let relative_vectors = relative_vectors(&vectors, &vector_sums, options.degenerate)?;

        let mut collection = Self {
            vectors,
            feature_weights,
            relative_vectors,
            neighbors: None,
        };
        info!(
            "collection of {} vectors x {} features built, spends {}s",
            collection.len(),
            features,
            start.elapsed().as_secs_f64()
        );

        if options.precompute {
            let start = Instant::now();
            debug!("calculating neighbors for {} vectors", collection.len());
            collection.neighbors = Some(collection.rank_all()?);
            info!(
                "precomputed {} neighbor rankings, spends {}s",
                collection.len(),
                start.elapsed().as_secs_f64()
            );
        }

        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Always false: construction rejects an empty input.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn features(&self) -> usize {
        self.feature_weights.len()
    }

    pub fn vectors(&self) -> &[Vec<f64>] {
        &self.vectors
    }

    pub fn vector(&self, position: usize) -> Result<&[f64]> {
        self.vectors
            .get(position)
            .map(Vec::as_slice)
            .ok_or_else(|| out_of_range(position, self.len()))
    }

    pub fn feature_weights(&self) -> &[f64] {
        &self.feature_weights
    }

    pub fn relative_vectors(&self) -> &[Vec<f64>] {
        &self.relative_vectors
    }

    pub fn relative_vector(&self, position: usize) -> Result<&[f64]> {
        self.relative_vectors
            .get(position)
            .map(Vec::as_slice)
            .ok_or_else(|| out_of_range(position, self.len()))
    }

    pub fn is_precomputed(&self) -> bool {
        self.neighbors.is_some()
    }
}

pub(crate) fn out_of_range(position: usize, len: usize) -> AbundanceError {
    AbundanceError::NotFound(format!(
        "no vector at position {}, collection holds {}",
        position, len
    ))
}

/// Returns the shared feature count.
fn assert_vector_shape(vectors: &[Vec<f64>]) -> Result<usize> {
    debug!("asserting vector shapes");
    let features = vectors[0].len();
    if features == 0 {
        return Err(AbundanceError::Shape(
            "vectors must have at least one feature".to_string(),
        ));
    }
    for (i, vector) in vectors.iter().enumerate() {
        if vector.len() != features {
            return Err(AbundanceError::Shape(format!(
                "all vectors must have the same shape: vector {} has {} features, expected {}",
                i,
                vector.len(),
                features
            )));
        }
        if let Some((feature, &value)) = vector
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(AbundanceError::InvalidFeature {
                vector: i,
                feature,
                value,
            });
        }
    }
    Ok(features)
}

fn relative_vectors(
    vectors: &[Vec<f64>],
    vector_sums: &[f64],
    policy: DegeneratePolicy,
) -> Result<Vec<Vec<f64>>> {
    debug!("calculating relative abundances for vectors");
    let mut relative = Vec::with_capacity(vectors.len());
    for (i, (vector, &vector_sum)) in vectors.iter().zip(vector_sums.iter()).enumerate() {
        if vector_sum > 0.0 {
            relative.push(vector.iter().map(|v| v / vector_sum).collect());
            continue;
        }
        match policy {
            DegeneratePolicy::Reject => {
                return Err(AbundanceError::Degenerate(format!(
                    "vector {} sums to zero",
                    i
                )))
            }
            DegeneratePolicy::Zero => {
                debug!("vector {} sums to zero, relative abundances are 0", i);
                relative.push(vec![0f64; vector.len()]);
            }
        }
    }
    Ok(relative)
}
