//! Offline deterministic embedding provider.

use crate::embeddings::EmbeddingProvider;
use paperbrain_core::AppResult;
use std::collections::{HashMap, HashSet};

/// Words too common to carry signal.
const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them",
];

/// Deterministic embedder built from character trigrams and word
/// frequencies.
///
/// Not semantically accurate like a real model, but fully offline,
/// content-dependent, and stable across runs: identical text always
/// maps to an identical unit vector, which is exactly what retrieval
/// tests need.
#[derive(Debug)]
pub struct TrigramEmbedder {
    dimensions: usize,
}

impl TrigramEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
        let lower = text.to_lowercase();

        let mut word_freq: HashMap<&str, u32> = HashMap::new();
        for word in lower
            .split_whitespace()
            .filter(|w| w.len() > 2 && !stop_words.contains(w))
        {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            // Trigrams spread each word over several dimensions
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let dim = (hash_chars(window, 37) as usize) % self.dimensions;
                vector[dim] += (*freq as f32).sqrt();
            }

            // Whole word gets one dimension of its own
            let whole: Vec<char> = word.chars().collect();
            let dim = (hash_chars(&whole, 31) as usize) % self.dimensions;
            vector[dim] += *freq as f32;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

fn hash_chars(chars: &[char], multiplier: u64) -> u64 {
    let mut acc = 0u64;
    for c in chars {
        let mut buf = [0u8; 4];
        for b in c.encode_utf8(&mut buf).bytes() {
            acc = acc.wrapping_mul(multiplier).wrapping_add(b as u64);
        }
    }
    acc
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramEmbedder {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_one(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dimensions_and_names() {
        let provider = TrigramEmbedder::new(384);
        assert_eq!(provider.dimensions(), 384);
        assert_eq!(provider.provider_name(), "trigram");
        assert_eq!(provider.model_name(), "trigram-v1");
    }

    #[tokio::test]
    async fn test_vectors_are_unit_length() {
        let provider = TrigramEmbedder::new(128);
        let vectors = provider
            .embed_batch(&["vector databases store embeddings".to_string()])
            .await
            .unwrap();

        let norm: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let provider = TrigramEmbedder::new(128);
        let a = provider.embed("same text every time").await.unwrap();
        let b = provider.embed("same text every time").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let provider = TrigramEmbedder::new(128);
        let a = provider.embed("solar panel installation guide").await.unwrap();
        let b = provider.embed("chicken coop maintenance").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_stop_words_only_text_is_zero_vector() {
        let provider = TrigramEmbedder::new(64);
        let vector = provider.embed("the and of it").await.unwrap();
        assert!(vector.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_batch_order_matches_input() {
        let provider = TrigramEmbedder::new(64);
        let texts = vec!["first text".to_string(), "second text".to_string()];
        let batch = provider.embed_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], provider.embed("first text").await.unwrap());
        assert_eq!(batch[1], provider.embed("second text").await.unwrap());
    }
}
