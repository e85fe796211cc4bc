//! Similarity ranking.
//!
//! Brute-force cosine scan over the whole store, linear per query. Fine for
//! small corpora; anything beyond low thousands of records wants a real
//! index.

use crate::types::{EmbeddingRecord, SimilarityResult};

/// Cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] for non-zero vectors. A zero vector has no
/// direction, so the result is pinned to 0.0 rather than NaN; callers must
/// not rely on ranking among zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vector dimensions must match");

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom == 0.0 { 0.0 } else { dot / denom }
}

/// Rank every stored record against `query` and return the `k` best.
///
/// Results are ordered by descending cosine similarity; the sort is stable,
/// so ties keep their store order. If `k` exceeds the number of records, all
/// records are returned ranked.
pub fn top_k(query: &[f32], records: &[EmbeddingRecord], k: usize) -> Vec<SimilarityResult> {
    let mut scored: Vec<SimilarityResult> = records
        .iter()
        .map(|record| SimilarityResult {
            file: record.file.clone(),
            chunk_index: record.chunk_index,
            similarity: cosine_similarity(query, &record.embedding),
            text: record.text.clone().unwrap_or_default(),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file: &str, chunk_index: usize, embedding: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            file: file.to_string(),
            chunk_index,
            embedding,
            text: Some(format!("{file}#{chunk_index}")),
        }
    }

    #[test]
    fn cosine_identical_direction_is_one() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite_direction_is_minus_one() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_is_symmetric_and_bounded() {
        let a = [0.3, -0.7, 0.2, 0.9];
        let b = [-0.1, 0.4, 0.8, -0.2];
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        assert_eq!(ab, ba);
        assert!((-1.0..=1.0).contains(&ab));
    }

    #[test]
    fn cosine_zero_vector_is_zero_not_nan() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn top_k_returns_k_results_sorted_descending() {
        let records = vec![
            record("a.md", 0, vec![1.0, 0.0]),
            record("a.md", 1, vec![0.0, 1.0]),
            record("b.md", 0, vec![0.7, 0.7]),
            record("b.md", 1, vec![-1.0, 0.0]),
            record("c.md", 0, vec![0.9, 0.1]),
        ];
        let query = [1.0, 0.0];

        let results = top_k(&query, &records, 3);
        assert_eq!(results.len(), 3);
        assert!(results[0].similarity >= results[1].similarity);
        assert!(results[1].similarity >= results[2].similarity);
        assert_eq!(results[0].file, "a.md");
        assert_eq!(results[0].chunk_index, 0);
    }

    #[test]
    fn top_k_ties_keep_store_order() {
        let records = vec![
            record("first.md", 0, vec![2.0, 0.0]),
            record("second.md", 0, vec![5.0, 0.0]),
        ];
        // Both records point in the same direction as the query: exact tie.
        let results = top_k(&[1.0, 0.0], &records, 2);
        assert_eq!(results[0].file, "first.md");
        assert_eq!(results[1].file, "second.md");
    }

    #[test]
    fn top_k_with_k_beyond_len_returns_all() {
        let records = vec![record("a.md", 0, vec![1.0, 0.0])];
        let results = top_k(&[0.5, 0.5], &records, 10);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn top_k_is_idempotent() {
        let records = vec![
            record("a.md", 0, vec![0.2, 0.8]),
            record("b.md", 0, vec![0.9, 0.1]),
            record("c.md", 0, vec![0.5, 0.5]),
        ];
        let query = [0.6, 0.4];
        let first = top_k(&query, &records, 2);
        let second = top_k(&query, &records, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn top_k_records_without_text_yield_empty_text() {
        let records = vec![EmbeddingRecord {
            file: "a.md".to_string(),
            chunk_index: 0,
            embedding: vec![1.0, 0.0],
            text: None,
        }];
        let results = top_k(&[1.0, 0.0], &records, 1);
        assert_eq!(results[0].text, "");
    }
}
