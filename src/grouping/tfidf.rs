// src/grouping/tfidf.rs

use anyhow::Result;
use log::debug;
use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;
use std::time::Instant;

use super::vectorizer::tfidf_vectors;
use super::SimilarityGrouper;
use crate::config::NGRAM_SIZE;
use crate::error::ResolutionError;
use crate::models::GroupAssignment;

/// Groups strings by cosine similarity of character n-gram TF-IDF vectors.
///
/// Every pair at or above the threshold is linked, and groups are the
/// connected components of the resulting graph, so linking is transitive.
/// Identical strings are always linked, including strings too short to
/// produce any n-gram. Each group is represented by its centroid: the member
/// with the largest summed similarity to the rest of the group, ties going
/// to the earliest member.
///
/// Pairwise comparison is quadratic in the input size.
#[derive(Debug, Clone)]
pub struct TfidfGrouper {
    ngram_size: usize,
}

impl Default for TfidfGrouper {
    fn default() -> Self {
        Self::new(NGRAM_SIZE)
    }
}

impl TfidfGrouper {
    pub fn new(ngram_size: usize) -> Self {
        Self {
            ngram_size: ngram_size.max(1),
        }
    }

    pub fn ngram_size(&self) -> usize {
        self.ngram_size
    }

    /// Symmetric matrix of pairwise similarities in [0, 1] with a unit diagonal.
    pub fn similarity_matrix(&self, strings: &[String]) -> Vec<Vec<f64>> {
        let vectors = tfidf_vectors(strings, self.ngram_size);
        let n = strings.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for i in 0..n {
            matrix[i][i] = 1.0;
            for j in (i + 1)..n {
                let similarity = if strings[i] == strings[j] {
                    1.0
                } else {
                    vectors[i].dot(&vectors[j]).clamp(0.0, 1.0)
                };
                matrix[i][j] = similarity;
                matrix[j][i] = similarity;
            }
        }
        matrix
    }

    /// Builds the undirected graph with one node per input position and an
    /// edge, weighted by similarity, for every pair at or above `threshold`.
    fn build_similarity_graph(&self, strings: &[String], threshold: f64) -> UnGraph<usize, f64> {
        let matrix = self.similarity_matrix(strings);
        let mut graph: UnGraph<usize, f64> = Graph::new_undirected();

        let nodes: Vec<NodeIndex> = (0..strings.len()).map(|i| graph.add_node(i)).collect();

        for i in 0..strings.len() {
            for j in (i + 1)..strings.len() {
                if matrix[i][j] >= threshold {
                    graph.add_edge(nodes[i], nodes[j], matrix[i][j]);
                }
            }
        }
        graph
    }
}

/// Member of a component with the greatest summed edge weight. Iterates members
/// in ascending input order so the earliest one wins ties.
fn centroid(graph: &UnGraph<usize, f64>, members: &[NodeIndex]) -> usize {
    let mut best_position = graph[members[0]];
    let mut best_score = f64::NEG_INFINITY;

    for &node in members {
        let score: f64 = graph.edges(node).map(|edge| *edge.weight()).sum();
        if score > best_score {
            best_score = score;
            best_position = graph[node];
        }
    }
    best_position
}

impl SimilarityGrouper for TfidfGrouper {
    fn group(&self, strings: &[String], threshold: f64) -> Result<Vec<GroupAssignment>> {
        if strings.is_empty() {
            return Err(ResolutionError::EmptyGroupingInput.into());
        }

        let start_time = Instant::now();
        let graph = self.build_similarity_graph(strings, threshold);
        debug!(
            "Similarity graph built in {:.2?} with {} nodes and {} edges",
            start_time.elapsed(),
            graph.node_count(),
            graph.edge_count()
        );

        let components = kosaraju_scc(&graph);
        debug!("Found {} connected components", components.len());

        let mut assignments: Vec<Option<GroupAssignment>> = vec![None; strings.len()];
        for mut component in components {
            component.sort_by_key(|node| graph[*node]);
            let representative = centroid(&graph, &component);

            for node in component {
                assignments[graph[node]] = Some(GroupAssignment {
                    group_index: representative,
                    representative: strings[representative].clone(),
                });
            }
        }

        // kosaraju_scc covers every node, so each slot is filled
        Ok(assignments.into_iter().flatten().collect())
    }

    fn name(&self) -> &str {
        "tfidf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn group_indices(assignments: &[GroupAssignment]) -> Vec<usize> {
        assignments.iter().map(|a| a.group_index).collect()
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = TfidfGrouper::default().group(&[], 0.2).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolutionError>(),
            Some(ResolutionError::EmptyGroupingInput)
        ));
    }

    #[test]
    fn test_single_string_is_its_own_group() {
        let assignments = TfidfGrouper::default().group(&strings(&["acme"]), 0.2).unwrap();
        assert_eq!(
            assignments,
            vec![GroupAssignment {
                group_index: 0,
                representative: "acme".to_string()
            }]
        );
    }

    #[test]
    fn test_identical_strings_share_a_group_at_any_threshold() {
        let input = strings(&["sn00123", "sn00123", "xj", "xj"]);
        let assignments = TfidfGrouper::default().group(&input, 1.0).unwrap();
        assert_eq!(group_indices(&assignments), vec![0, 0, 2, 2]);
        assert_eq!(assignments[3].representative, "xj");
    }

    #[test]
    fn test_dissimilar_strings_stay_apart() {
        let input = strings(&["acme", "globex", "initech"]);
        let assignments = TfidfGrouper::default().group(&input, 0.2).unwrap();
        assert_eq!(group_indices(&assignments), vec![0, 1, 2]);
    }

    #[test]
    fn test_linking_is_transitive() {
        // a~b and b~c at a low threshold even though a and c share nothing
        let input = strings(&["abcdef", "defghi", "ghijkl"]);
        let grouper = TfidfGrouper::default();
        let matrix = grouper.similarity_matrix(&input);
        assert_eq!(matrix[0][2], 0.0);
        assert!(matrix[0][1] > 0.1 && matrix[1][2] > 0.1);

        let assignments = grouper.group(&input, 0.1).unwrap();
        let ids = group_indices(&assignments);
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[1], ids[2]);
        // The middle string is linked to both others
        assert_eq!(assignments[0].representative, "defghi");
    }

    #[test]
    fn test_similarity_matrix_is_symmetric_with_unit_diagonal() {
        let input = strings(&["acme", "acme widgets", "globex", "acme"]);
        let matrix = TfidfGrouper::default().similarity_matrix(&input);
        for i in 0..input.len() {
            assert_eq!(matrix[i][i], 1.0);
            for j in 0..input.len() {
                assert_eq!(matrix[i][j], matrix[j][i]);
                assert!((0.0..=1.0).contains(&matrix[i][j]));
            }
        }
        assert_eq!(matrix[0][3], 1.0);
    }

    #[test]
    fn test_raising_the_threshold_only_splits_groups() {
        let input = strings(&[
            "acme", "acme widgets", "acme widget co", "globex", "globex intl", "initech",
        ]);
        let grouper = TfidfGrouper::default();
        let thresholds = [0.0, 0.1, 0.2, 0.4, 0.6, 0.8, 0.99, 1.0];

        for pair in thresholds.windows(2) {
            let coarse = group_indices(&grouper.group(&input, pair[0]).unwrap());
            let fine = group_indices(&grouper.group(&input, pair[1]).unwrap());
            for i in 0..input.len() {
                for j in 0..input.len() {
                    if fine[i] == fine[j] {
                        assert_eq!(
                            coarse[i], coarse[j],
                            "{} and {} together at {} but apart at {}",
                            input[i], input[j], pair[1], pair[0]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_threshold_links_everything() {
        let input = strings(&["acme", "globex", "xj"]);
        let assignments = TfidfGrouper::default().group(&input, 0.0).unwrap();
        let ids = group_indices(&assignments);
        assert!(ids.iter().all(|&id| id == ids[0]));
    }

    #[test]
    fn test_representative_is_a_member_of_its_group() {
        let input = strings(&["new york", "new york city", "paris", "paris france"]);
        let assignments = TfidfGrouper::default().group(&input, 0.2).unwrap();
        for assignment in &assignments {
            assert_eq!(input[assignment.group_index], assignment.representative);
            assert_eq!(
                assignments[assignment.group_index].group_index,
                assignment.group_index
            );
        }
    }
}
