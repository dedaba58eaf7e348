//! Brute-force exact nearest-neighbor index over embedded chunks.
//!
//! Every chunk is stored next to its vector in one entry list, so the
//! chunk/vector correspondence cannot drift. Queries scan the whole
//! list computing squared Euclidean distance; exact and fast enough for
//! the corpus sizes a personal document collection reaches.

use crate::embeddings::EmbeddingProvider;
use crate::types::{Chunk, SearchResult};
use paperbrain_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Current on-disk bundle format version.
const BUNDLE_VERSION: u32 = 1;

/// One indexed chunk together with its embedding vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    chunk: Chunk,
    vector: Vec<f32>,
}

/// Serialized index bundle. Self-describing: the header names the
/// embedding model and dimension the entries were produced with, and
/// the checksum covers the serialized entry list.
#[derive(Debug, Serialize, Deserialize)]
struct SavedIndex {
    version: u32,
    model: String,
    dimension: usize,
    checksum: String,
    entries: Vec<IndexEntry>,
}

/// Summary of a bundle on disk, readable without an embedding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleStats {
    pub model: String,
    pub dimension: usize,
    pub chunk_count: usize,
    pub document_count: usize,
}

/// In-memory vector index bound to one embedding provider.
///
/// The provider's model and dimension are fixed at construction; every
/// vector that enters the index is checked against that dimension.
pub struct EmbeddingIndex {
    provider: Arc<dyn EmbeddingProvider>,
    dimension: usize,
    entries: Vec<IndexEntry>,
}

impl EmbeddingIndex {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let dimension = provider.dimensions();
        Self {
            provider,
            dimension,
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Number of distinct source documents across all entries.
    pub fn document_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.chunk.source_document.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Embed and add a batch of chunks.
    ///
    /// All-or-nothing: vectors are staged and only appended once the
    /// whole batch embedded successfully, so a mid-batch failure leaves
    /// the index exactly as it was.
    pub async fn insert(&mut self, chunks: Vec<Chunk>) -> AppResult<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = self.provider.embed_batch(&texts).await?;

        if vectors.len() != chunks.len() {
            return Err(AppError::EmbeddingUnavailable(format!(
                "provider returned {} vectors for {} chunks",
                vectors.len(),
                chunks.len()
            )));
        }

        let mut staged = Vec::with_capacity(chunks.len());
        for (chunk, vector) in chunks.into_iter().zip(vectors) {
            if vector.len() != self.dimension {
                return Err(AppError::EmbeddingUnavailable(format!(
                    "vector dimension {} does not match index dimension {}",
                    vector.len(),
                    self.dimension
                )));
            }
            staged.push(IndexEntry { chunk, vector });
        }

        tracing::debug!("Indexed {} chunks ({} total)", staged.len(), self.entries.len() + staged.len());
        self.entries.extend(staged);
        Ok(())
    }

    /// Find the `k` chunks nearest to `query_text`.
    ///
    /// Results are ordered by ascending squared Euclidean distance and
    /// truncated to `min(k, len)`. An empty index or `k == 0` returns
    /// an empty list without calling the embedding provider.
    pub async fn query(&self, query_text: &str, k: usize) -> AppResult<Vec<SearchResult>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.provider.embed(query_text).await?;
        if query_vector.len() != self.dimension {
            return Err(AppError::EmbeddingUnavailable(format!(
                "query vector dimension {} does not match index dimension {}",
                query_vector.len(),
                self.dimension
            )));
        }

        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| SearchResult {
                chunk: entry.chunk.clone(),
                distance: squared_l2(&query_vector, &entry.vector),
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k.min(results.len()));

        Ok(results)
    }

    /// Drop all entries. The provider binding is unaffected.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Write the index to `path` as a self-describing JSON bundle.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let entries_json = serde_json::to_string(&self.entries)?;
        let bundle = SavedIndex {
            version: BUNDLE_VERSION,
            model: self.provider.model_name().to_string(),
            dimension: self.dimension,
            checksum: hex_sha256(entries_json.as_bytes()),
            entries: self.entries.clone(),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(&bundle)?;
        std::fs::write(path, json)?;

        tracing::info!(
            "Saved index to {} ({} chunks, {} documents)",
            path.display(),
            self.len(),
            self.document_count()
        );
        Ok(())
    }

    /// Replace the index contents with a bundle loaded from `path`.
    ///
    /// All-or-nothing: any validation failure (parse error, version or
    /// dimension mismatch, bad checksum, malformed entries) is
    /// `CorruptState` and leaves the current contents untouched.
    pub fn load(&mut self, path: &Path) -> AppResult<()> {
        let raw = std::fs::read_to_string(path)?;
        let bundle: SavedIndex = serde_json::from_str(&raw)
            .map_err(|e| AppError::CorruptState(format!("failed to parse index bundle: {}", e)))?;

        if bundle.version != BUNDLE_VERSION {
            return Err(AppError::CorruptState(format!(
                "unsupported bundle version {} (expected {})",
                bundle.version, BUNDLE_VERSION
            )));
        }

        if bundle.dimension != self.dimension {
            return Err(AppError::CorruptState(format!(
                "bundle dimension {} does not match provider dimension {}",
                bundle.dimension, self.dimension
            )));
        }

        let entries_json = serde_json::to_string(&bundle.entries)?;
        if hex_sha256(entries_json.as_bytes()) != bundle.checksum {
            return Err(AppError::CorruptState(
                "bundle checksum mismatch".to_string(),
            ));
        }

        for entry in &bundle.entries {
            if entry.vector.len() != bundle.dimension {
                return Err(AppError::CorruptState(format!(
                    "entry for '{}' has dimension {} (bundle says {})",
                    entry.chunk.source_document,
                    entry.vector.len(),
                    bundle.dimension
                )));
            }
            if entry.chunk.chunk_ordinal == 0 {
                return Err(AppError::CorruptState(format!(
                    "entry for '{}' has ordinal 0 (ordinals start at 1)",
                    entry.chunk.source_document
                )));
            }
        }

        self.entries = bundle.entries;
        tracing::info!(
            "Loaded index from {} ({} chunks, model '{}')",
            path.display(),
            self.len(),
            bundle.model
        );
        Ok(())
    }
}

impl std::fmt::Debug for EmbeddingIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingIndex")
            .field("model", &self.provider.model_name())
            .field("dimension", &self.dimension)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Read a bundle's header and counts without binding a provider.
pub fn inspect_bundle(path: &Path) -> AppResult<BundleStats> {
    let raw = std::fs::read_to_string(path)?;
    let bundle: SavedIndex = serde_json::from_str(&raw)
        .map_err(|e| AppError::CorruptState(format!("failed to parse index bundle: {}", e)))?;

    if bundle.version != BUNDLE_VERSION {
        return Err(AppError::CorruptState(format!(
            "unsupported bundle version {} (expected {})",
            bundle.version, BUNDLE_VERSION
        )));
    }

    let document_count = bundle
        .entries
        .iter()
        .map(|e| e.chunk.source_document.as_str())
        .collect::<HashSet<_>>()
        .len();

    Ok(BundleStats {
        model: bundle.model,
        dimension: bundle.dimension,
        chunk_count: bundle.entries.len(),
        document_count,
    })
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

fn hex_sha256(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
