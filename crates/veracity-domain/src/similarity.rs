//! Similarity primitives over embedding vectors

use crate::{Document, DocumentId};

/// Cosine similarity between two vectors, computed in f64.
///
/// Returns `None` when the vectors are empty or differ in length, and
/// `Some(0.0)` when either vector has zero norm.
///
/// # Examples
///
/// ```
/// use veracity_domain::cosine_similarity;
///
/// let sim = cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap();
/// assert!((sim - 1.0).abs() < 1e-12);
/// assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_none());
/// ```
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Some(0.0);
    }

    Some((dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0))
}

/// Cosine distance `1 - similarity`, in [0, 2].
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Option<f64> {
    cosine_similarity(a, b).map(|s| (1.0 - s).clamp(0.0, 2.0))
}

/// Find documents whose embedding is at least `threshold`-similar to `query`.
///
/// Documents without a comparable embedding are ignored. Results are sorted
/// by descending similarity (ties keep input order) and truncated to `limit`.
pub fn find_similar(
    query: &[f32],
    documents: &[Document],
    threshold: f64,
    limit: usize,
) -> Vec<(DocumentId, f64)> {
    let mut hits: Vec<(DocumentId, f64)> = documents
        .iter()
        .filter_map(|doc| {
            cosine_similarity(query, &doc.embedding)
                .filter(|sim| *sim >= threshold)
                .map(|sim| (doc.id.clone(), sim))
        })
        .collect();

    hits.sort_by(|a, b| b.1.total_cmp(&a.1));
    hits.truncate(limit);
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let v = vec![1.0f32, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v).unwrap();
        assert!((sim - 1.0).abs() < 1e-10);
        assert!(cosine_distance(&v, &v).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!(sim.abs() < 1e-10);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_opposite_vectors() {
        let d = cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((d - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_norm() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), Some(0.0));
    }

    #[test]
    fn test_mismatched_or_empty() {
        assert!(cosine_similarity(&[], &[]).is_none());
        assert!(cosine_similarity(&[1.0, 2.0], &[1.0]).is_none());
    }

    #[test]
    fn test_find_similar_sorts_and_limits() {
        let docs = vec![
            Document::new("far", "a").with_embedding(vec![0.0, 1.0]),
            Document::new("near", "b").with_embedding(vec![1.0, 0.1]),
            Document::new("exact", "c").with_embedding(vec![1.0, 0.0]),
            Document::new("none", "d"),
        ];

        let hits = find_similar(&[1.0, 0.0], &docs, 0.5, 10);
        let ids: Vec<&str> = hits.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["exact", "near"]);

        let hits = find_similar(&[1.0, 0.0], &docs, 0.5, 1);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0.as_str(), "exact");
    }
}
