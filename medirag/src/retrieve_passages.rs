use std::path::PathBuf;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::config::Config;
use crate::embed_query::{Embedder, OllamaEmbedder};
use crate::error::Result;
use crate::vector_index::{RetrievedPassage, VectorIndex};

pub struct Retriever {
    embedder: Box<dyn Embedder>,
    index_dir: PathBuf,
    top_k: usize,
    index: OnceCell<VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Box<dyn Embedder>, index_dir: impl Into<PathBuf>, top_k: usize) -> Self {
        Self {
            embedder,
            index_dir: index_dir.into(),
            top_k,
            index: OnceCell::new(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            Box::new(OllamaEmbedder::from_config(cfg)),
            cfg.index_dir.clone(),
            cfg.top_k,
        )
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Loads the index on first use; a failed load is retried on the next call.
    pub fn index(&self) -> Result<&VectorIndex> {
        self.index
            .get_or_try_init(|| VectorIndex::load(&self.index_dir))
    }

    pub fn retrieve(&self, query: &str) -> Result<Vec<RetrievedPassage>> {
        let index = self.index()?;
        let vector = self.embedder.embed(query)?;
        let hits = index.search(&vector, self.top_k)?;
        debug!(hits = hits.len(), top_k = self.top_k, "retrieved passages");
        Ok(hits)
    }
}
