use super::collection::{out_of_range, Collection};
use super::error::{AbundanceError, Result};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Number of neighbors returned when a query does not name a limit.
pub const DEFAULT_LIMIT: usize = 10;

/// What a query ranks the collection against.
#[derive(Clone, Debug, PartialEq)]
pub enum Subject {
    Position(usize),
    /// Resolved to the lowest position holding an element-wise equal vector.
    Value(Vec<f64>),
}

impl From<usize> for Subject {
    fn from(position: usize) -> Self {
        Subject::Position(position)
    }
}

impl From<Vec<f64>> for Subject {
    fn from(vector: Vec<f64>) -> Self {
        Subject::Value(vector)
    }
}

impl From<&[f64]> for Subject {
    fn from(vector: &[f64]) -> Self {
        Subject::Value(vector.to_vec())
    }
}

impl TryFrom<&Value> for Subject {
    type Error = AbundanceError;

    fn try_from(value: &Value) -> Result<Self> {
        let invalid = || AbundanceError::InvalidSubject(value.to_string());
        match value {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| {
                    // whole floats such as `1.0` name a position too
                    n.as_f64()
                        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
                        .map(|f| f as u64)
                })
                .and_then(|p| usize::try_from(p).ok())
                .map(Subject::Position)
                .ok_or_else(invalid),
            Value::Array(items) => items
                .iter()
                .map(Value::as_f64)
                .collect::<Option<Vec<_>>>()
                .map(Subject::Value)
                .ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

/// One candidate in a ranking, stored by position.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Ranked {
    pub distance: f64,
    pub position: usize,
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.distance.partial_cmp(&other.distance)
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance
    }
}

impl Eq for Ranked {}

/// A query result: a vector of the collection and its distance to the subject.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Neighbor<'a> {
    pub distance: f64,
    pub position: usize,
    pub vector: &'a [f64],
}

impl Collection {
    /// The `limit` nearest vectors to `subject`, closest first. The subject
    /// itself is part of the ranking.
    pub fn query(
        &self,
        subject: impl Into<Subject>,
        limit: Option<usize>,
    ) -> Result<Vec<Neighbor<'_>>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        let position = self.resolve(&subject.into())?;

        let neighbors = match &self.neighbors {
            Some(all) => all[position].iter().take(limit).copied().collect::<Vec<_>>(),
            None => {
                let mut ranking = self.rank(position)?;
                ranking.truncate(limit);
                ranking
            }
        };

        Ok(neighbors
            .into_iter()
            .map(|r| Neighbor {
                distance: r.distance,
                position: r.position,
                vector: &self.vectors()[r.position],
            })
            .collect())
    }

    /// Position a subject refers to.
    pub fn resolve(&self, subject: &Subject) -> Result<usize> {
        match subject {
            Subject::Position(position) if *position < self.len() => Ok(*position),
            Subject::Position(position) => Err(out_of_range(*position, self.len())),
            Subject::Value(vector) => self
                .vectors()
                .iter()
                .position(|v| v == vector)
                .ok_or_else(|| {
                    debug!("subject not found in vectors: {:?}", vector);
                    AbundanceError::NotFound("subject not found in vectors".to_string())
                }),
        }
    }

    /// Every position ordered by distance to `position`, ties in collection order.
    pub(crate) fn rank(&self, position: usize) -> Result<Vec<Ranked>> {
        debug!("calculating distances for vector: {}", position);
        let mut ranking = (0..self.len())
            .map(|other| {
                self.distance(position, other).map(|distance| Ranked {
                    distance,
                    position: other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        ranking.sort();
        Ok(ranking)
    }

    pub(crate) fn rank_all(&self) -> Result<Vec<Vec<Ranked>>> {
        (0..self.len()).map(|position| self.rank(position)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abundance::Options;
    use serde_json::json;

    fn sample() -> Vec<Vec<f64>> {
        vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 2.0]]
    }

    #[test]
    fn test_query_by_position() {
        let collection = Collection::new(sample()).unwrap();
        let neighbors = collection.query(0usize, Some(2)).unwrap();
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].distance, 0.0);
        assert_eq!(neighbors[0].vector, &[1.0, 0.0]);
        assert!((neighbors[1].distance - 0.5).abs() < 1e-12);
        assert_eq!(neighbors[1].position, 2);
        assert_eq!(neighbors[1].vector, &[2.0, 2.0]);
    }

    #[test]
    fn test_query_by_value() {
        let collection = Collection::new(sample()).unwrap();
        let neighbors = collection.query(vec![0.0, 1.0], None).unwrap();
        assert_eq!(neighbors.len(), 3);
        assert_eq!(neighbors[0].position, 1);
        assert_eq!(neighbors[2].position, 0);
    }

    #[test]
    fn test_query_value_not_found() {
        let collection = Collection::new(sample()).unwrap();
        let err = collection.query(vec![5.0, 1.0], None).unwrap_err();
        assert!(matches!(err, AbundanceError::NotFound(_)));

        let err = collection.query(vec![1.0], None).unwrap_err();
        assert!(matches!(err, AbundanceError::NotFound(_)));

        let err = collection.query(3usize, None).unwrap_err();
        assert!(matches!(err, AbundanceError::NotFound(_)));
    }

    #[test]
    fn test_duplicates_resolve_to_lowest_position() {
        let collection =
            Collection::new(vec![vec![4.0, 1.0], vec![1.0, 4.0], vec![1.0, 4.0]]).unwrap();
        assert_eq!(collection.resolve(&Subject::from(vec![1.0, 4.0])).unwrap(), 1);

        let neighbors = collection.query(vec![1.0, 4.0], Some(2)).unwrap();
        assert_eq!(neighbors[0].position, 1);
        assert_eq!(neighbors[1].position, 2);
        assert_eq!(neighbors[1].distance, 0.0);
    }

    #[test]
    fn test_limit() {
        let collection = Collection::new(sample()).unwrap();
        assert_eq!(collection.query(1usize, Some(0)).unwrap().len(), 0);
        assert_eq!(collection.query(1usize, Some(100)).unwrap().len(), 3);

        let many = (1..=25).map(|i| vec![i as f64, 1.0]).collect::<Vec<_>>();
        let collection = Collection::new(many).unwrap();
        assert_eq!(collection.query(0usize, None).unwrap().len(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_precomputed_matches_on_demand() {
        let vectors = vec![
            vec![5.0, 1.0, 0.0],
            vec![1.0, 1.0, 1.0],
            vec![0.0, 2.0, 9.0],
            vec![3.0, 3.0, 0.5],
        ];
        let lazy = Collection::new(vectors.clone()).unwrap();
        let eager = Collection::build(
            vectors,
            Options {
                precompute: true,
                ..Options::default()
            },
        )
        .unwrap();
        assert!(eager.is_precomputed());
        for position in 0..lazy.len() {
            assert_eq!(
                lazy.query(position, Some(3)).unwrap(),
                eager.query(position, Some(3)).unwrap()
            );
        }
    }

    #[test]
    fn test_subject_from_json() {
        assert_eq!(Subject::try_from(&json!(2)).unwrap(), Subject::Position(2));
        assert_eq!(Subject::try_from(&json!(1.0)).unwrap(), Subject::Position(1));
        assert_eq!(Subject::try_from(&json!(0.0)).unwrap(), Subject::Position(0));
        assert_eq!(
            Subject::try_from(&json!([1, 0.5])).unwrap(),
            Subject::Value(vec![1.0, 0.5])
        );
        let invalid = [
            json!("0"),
            json!({"i": 0}),
            json!(-1),
            json!(1.5),
            json!([1, "a"]),
            json!(null),
        ];
        for invalid in invalid.iter() {
            let err = Subject::try_from(invalid).unwrap_err();
            assert!(matches!(err, AbundanceError::InvalidSubject(_)));
        }
    }

    #[test]
    fn test_ranked_order() {
        let mut ranked = vec![
            Ranked { distance: 0.7, position: 0 },
            Ranked { distance: 0.1, position: 1 },
            Ranked { distance: 0.7, position: 2 },
            Ranked { distance: 0.0, position: 3 },
        ];
        ranked.sort();
        let positions = ranked.iter().map(|r| r.position).collect::<Vec<_>>();
        assert_eq!(positions, vec![3, 1, 0, 2]);
    }
}
