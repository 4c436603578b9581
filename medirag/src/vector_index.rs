//! Flat (exhaustive) similarity index persisted by the ingestion step.
//!
//! The directory holds `index.json` with the raw vectors and `docstore.json`
//! with the passage each vector was computed from, aligned by position.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

pub const INDEX_FILE: &str = "index.json";
pub const DOCSTORE_FILE: &str = "docstore.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub text: String,
    pub source: Option<String>,
    /// Squared L2 distance to the query; lower is closer.
    pub score: Option<f32>,
}

#[derive(Serialize, Deserialize)]
pub struct IndexFile {
    pub dimension: usize,
    pub vectors: Vec<Vec<f32>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredPassage {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
    passages: Vec<StoredPassage>,
}

impl VectorIndex {
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::IndexUnavailable(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        let index: IndexFile = read_json(&dir.join(INDEX_FILE))?;
        let passages: Vec<StoredPassage> = read_json(&dir.join(DOCSTORE_FILE))?;
        let loaded = Self::from_parts(index.dimension, index.vectors, passages)?;
        info!(
            dir = %dir.display(),
            passages = loaded.len(),
            dimension = loaded.dimension,
            "loaded vector index"
        );
        Ok(loaded)
    }

    pub fn from_parts(
        dimension: usize,
        vectors: Vec<Vec<f32>>,
        passages: Vec<StoredPassage>,
    ) -> Result<Self> {
        if vectors.is_empty() {
            return Err(Error::IndexUnavailable("index contains no vectors".to_string()));
        }
        if dimension == 0 {
            return Err(Error::IndexUnavailable("index dimension is zero".to_string()));
        }
        if vectors.len() != passages.len() {
            return Err(Error::IndexUnavailable(format!(
                "index has {} vectors but docstore has {} passages",
                vectors.len(),
                passages.len()
            )));
        }
        if let Some(pos) = vectors.iter().position(|v| v.len() != dimension) {
            return Err(Error::IndexUnavailable(format!(
                "vector {} has {} dimensions, expected {}",
                pos,
                vectors[pos].len(),
                dimension
            )));
        }
        Ok(Self {
            dimension,
            vectors,
            passages,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Returns up to `k` passages nearest to `query`, closest first. Ties keep index order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedPassage>> {
        if query.len() != self.dimension {
            return Err(Error::IndexUnavailable(format!(
                "query embedding has {} dimensions, index expects {}",
                query.len(),
                self.dimension
            )));
        }
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, squared_l2(query, v)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, distance)| {
                let passage = &self.passages[i];
                RetrievedPassage {
                    text: passage.text.clone(),
                    source: passage.source.clone(),
                    score: Some(distance),
                }
            })
            .collect())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::IndexUnavailable(format!("cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::IndexUnavailable(format!("corrupt {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn passage(text: &str) -> StoredPassage {
        StoredPassage {
            text: text.to_string(),
            source: None,
        }
    }

    fn sample_index() -> VectorIndex {
        VectorIndex::from_parts(
            2,
            vec![
                vec![10.0, 10.0],
                vec![1.0, 0.0],
                vec![0.0, 0.0],
                vec![3.0, 4.0],
                vec![1.0, 0.0],
            ],
            vec![
                passage("far"),
                passage("near-a"),
                passage("origin"),
                passage("mid"),
                passage("near-b"),
            ],
        )
        .expect("sample index should build")
    }

    #[test]
    fn search_orders_by_non_decreasing_distance() {
        let hits = sample_index().search(&[0.9, 0.0], 3).unwrap();
        let texts: Vec<_> = hits.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["near-a", "near-b", "origin"]);

        let scores: Vec<f32> = hits.iter().map(|h| h.score.unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn search_returns_at_most_k() {
        let index = sample_index();
        assert_eq!(index.search(&[0.0, 0.0], 3).unwrap().len(), 3);
        assert_eq!(index.search(&[0.0, 0.0], 10).unwrap().len(), 5);
    }

    #[test]
    fn rejects_wrong_query_dimension() {
        let err = sample_index().search(&[0.0, 0.0, 0.0], 3).unwrap_err();
        assert!(matches!(err, Error::IndexUnavailable(_)));
    }

    #[test]
    fn rejects_empty_and_mismatched_parts() {
        assert!(matches!(
            VectorIndex::from_parts(2, vec![], vec![]),
            Err(Error::IndexUnavailable(_))
        ));
        assert!(matches!(
            VectorIndex::from_parts(2, vec![vec![1.0, 0.0]], vec![]),
            Err(Error::IndexUnavailable(_))
        ));
        assert!(matches!(
            VectorIndex::from_parts(2, vec![vec![1.0]], vec![passage("x")]),
            Err(Error::IndexUnavailable(_))
        ));
    }

    #[test]
    fn load_reports_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = VectorIndex::load(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(missing, Error::IndexUnavailable(_)));

        fs::write(dir.path().join(INDEX_FILE), "{not json").unwrap();
        fs::write(dir.path().join(DOCSTORE_FILE), "[]").unwrap();
        let corrupt = VectorIndex::load(dir.path()).unwrap_err();
        assert!(corrupt.to_string().contains("corrupt"));
    }

    #[test]
    fn load_reads_both_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(INDEX_FILE),
            json!({"dimension": 2, "vectors": [[0.0, 1.0], [1.0, 0.0]]}).to_string(),
        )
        .unwrap();
        fs::write(
            dir.path().join(DOCSTORE_FILE),
            json!([
                {"text": "Rest and fluids help with a cold.", "source": "gale.pdf"},
                {"text": "Ibuprofen reduces fever."}
            ])
            .to_string(),
        )
        .unwrap();

        let index = VectorIndex::load(dir.path()).expect("index should load");
        assert_eq!(index.len(), 2);
        let hits = index.search(&[0.0, 0.9], 1).unwrap();
        assert_eq!(hits[0].source.as_deref(), Some("gale.pdf"));
    }
}
