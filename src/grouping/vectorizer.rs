// src/grouping/vectorizer.rs

use std::collections::HashMap;

/// Sparse term-weight vector, entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted entry lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (term_a, weight_a) = self.entries[i];
            let (term_b, weight_b) = other.entries[j];
            if term_a == term_b {
                sum += weight_a * weight_b;
                i += 1;
                j += 1;
            } else if term_a < term_b {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }
}

/// Prepares a string for n-gram extraction: lowercase, with whitespace and
/// the separators `, - . /` removed.
pub fn clean_for_ngrams(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '-' | '.' | '/'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Overlapping character n-grams. Strings shorter than `n` have none.
pub fn char_ngrams(text: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if n == 0 || chars.len() < n {
        return Vec::new();
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}

/// TF-IDF vectors over character n-grams, one per document, L2-normalized.
///
/// Term frequency is the raw n-gram count; inverse document frequency is
/// smoothed as `ln((1 + N) / (1 + df)) + 1`. Term ids are assigned in order of
/// first appearance, so the output is a pure function of the input order.
pub fn tfidf_vectors(documents: &[String], ngram_size: usize) -> Vec<SparseVector> {
    let mut vocabulary: HashMap<String, usize> = HashMap::new();
    let mut document_frequency: Vec<usize> = Vec::new();

    let term_counts: Vec<HashMap<usize, usize>> = documents
        .iter()
        .map(|doc| {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            for gram in char_ngrams(&clean_for_ngrams(doc), ngram_size) {
                let next_id = vocabulary.len();
                let term_id = *vocabulary.entry(gram).or_insert(next_id);
                if term_id == document_frequency.len() {
                    document_frequency.push(0);
                }
                let count = counts.entry(term_id).or_insert(0);
                if *count == 0 {
                    document_frequency[term_id] += 1;
                }
                *count += 1;
            }
            counts
        })
        .collect();

    let n_docs = documents.len() as f64;
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
        .collect();

    term_counts
        .into_iter()
        .map(|counts| {
            let mut entries: Vec<(usize, f64)> = counts
                .into_iter()
                .map(|(term_id, tf)| (term_id, tf as f64 * idf[term_id]))
                .collect();
            entries.sort_by_key(|(term_id, _)| *term_id);

            let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for entry in entries.iter_mut() {
                    entry.1 /= norm;
                }
            }
            SparseVector { entries }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_for_ngrams() {
        assert_eq!(clean_for_ngrams("New York, N.Y."), "newyorkny");
        assert_eq!(clean_for_ngrams("a-b/c d"), "abcd");
    }

    #[test]
    fn test_char_ngrams() {
        assert_eq!(char_ngrams("acme", 3), vec!["acm", "cme"]);
        assert_eq!(char_ngrams("ab", 3), Vec::<String>::new());
        assert_eq!(char_ngrams("abc", 3), vec!["abc"]);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let vectors = tfidf_vectors(&docs(&["acme", "acme widgets", "globex"]), 3);
        for v in &vectors {
            assert!((v.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identical_documents_have_cosine_one() {
        let vectors = tfidf_vectors(&docs(&["sn00123", "sn00123", "xj9"]), 3);
        assert!((vectors[0].dot(&vectors[1]) - 1.0).abs() < 1e-9);
        assert_eq!(vectors[0].dot(&vectors[2]), 0.0);
    }

    #[test]
    fn test_short_documents_have_empty_vectors() {
        let vectors = tfidf_vectors(&docs(&["", "ab", "abc"]), 3);
        assert!(vectors[0].is_empty());
        assert!(vectors[1].is_empty());
        assert!(!vectors[2].is_empty());
        assert_eq!(vectors[1].dot(&vectors[2]), 0.0);
    }

    #[test]
    fn test_shared_ngrams_give_partial_similarity() {
        let vectors = tfidf_vectors(&docs(&["acme", "acme corp", "zzzz"]), 3);
        let sim = vectors[0].dot(&vectors[1]);
        assert!(sim > 0.2 && sim < 1.0, "similarity was {}", sim);
        assert_eq!(vectors[0].dot(&vectors[2]), 0.0);
    }

    #[test]
    fn test_smoothed_idf_weights_rare_terms_higher() {
        // "abc" appears in both documents, "xyz" only in the second
        let vectors = tfidf_vectors(&docs(&["abc", "abcxyz"]), 3);
        let second = vectors[1].entries();
        let weight_of = |term_id: usize| {
            second
                .iter()
                .find(|(t, _)| *t == term_id)
                .map(|(_, w)| *w)
                .unwrap()
        };
        // Term 0 is "abc" (seen first); the last term is "xyz"
        let last = second.iter().map(|(t, _)| *t).max().unwrap();
        assert!(weight_of(last) > weight_of(0));
    }
}
