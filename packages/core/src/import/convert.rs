//! Tree Converter - rows to candidate tree
//!
//! Groups parsed CSV rows into a two-level candidate tree: categories
//! keyed by exact name, each holding name-deduplicated topics. Ordering
//! is first-appearance order, materialized as sequential display orders
//! starting at 0. The subject column is ignored at this stage; the import
//! always targets the subject the caller named.

use crate::import::csv::CsvRow;
use std::collections::HashMap;

/// A topic in a candidate or merged tree.
///
/// `id` is `Some` only for topics that already exist in storage; topics
/// originating from CSV carry `None` until the synchronizer assigns one.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTopic {
    pub id: Option<String>,
    pub name: String,
    pub display_order: i64,
}

/// A category in a candidate or merged tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateCategory {
    pub id: Option<String>,
    pub name: String,
    pub display_order: i64,
    pub topics: Vec<CandidateTopic>,
}

/// Two-level tree shared by the converter and the merger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateTree {
    pub categories: Vec<CandidateCategory>,
}

/// Group rows into a candidate tree.
///
/// Categories appear in row order; within a category, topics appear in
/// row order with exact-name duplicates dropped (first occurrence wins).
/// Display orders are dense and 0-based on both levels.
pub fn rows_to_candidate_tree(rows: &[CsvRow]) -> CandidateTree {
    let mut categories: Vec<CandidateCategory> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let pos = match index.get(&row.category) {
            Some(&pos) => pos,
            None => {
                let pos = categories.len();
                index.insert(row.category.clone(), pos);
                categories.push(CandidateCategory {
                    id: None,
                    name: row.category.clone(),
                    display_order: pos as i64,
                    topics: Vec::new(),
                });
                pos
            }
        };

        let category = &mut categories[pos];
        if category.topics.iter().any(|t| t.name == row.topic) {
            continue;
        }
        let order = category.topics.len() as i64;
        category.topics.push(CandidateTopic {
            id: None,
            name: row.topic.clone(),
            display_order: order,
        });
    }

    CandidateTree { categories }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, topic: &str) -> CsvRow {
        CsvRow {
            subject: "A".to_string(),
            category: category.to_string(),
            topic: topic.to_string(),
        }
    }

    #[test]
    fn groups_rows_by_category_in_first_appearance_order() {
        let rows = vec![row("B", "C"), row("E", "F"), row("B", "D")];
        let tree = rows_to_candidate_tree(&rows);

        assert_eq!(tree.categories.len(), 2);
        assert_eq!(tree.categories[0].name, "B");
        assert_eq!(tree.categories[0].display_order, 0);
        assert_eq!(tree.categories[1].name, "E");
        assert_eq!(tree.categories[1].display_order, 1);

        let names: Vec<&str> = tree.categories[0]
            .topics
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["C", "D"]);
        assert_eq!(tree.categories[0].topics[0].display_order, 0);
        assert_eq!(tree.categories[0].topics[1].display_order, 1);
    }

    #[test]
    fn drops_duplicate_topics_within_a_category() {
        let rows = vec![row("B", "C"), row("B", "C"), row("B", "D")];
        let tree = rows_to_candidate_tree(&rows);

        assert_eq!(tree.categories.len(), 1);
        assert_eq!(tree.categories[0].topics.len(), 2);
        assert_eq!(tree.categories[0].topics[1].name, "D");
        assert_eq!(tree.categories[0].topics[1].display_order, 1);
    }

    #[test]
    fn same_topic_name_allowed_in_different_categories() {
        let rows = vec![row("B", "C"), row("E", "C")];
        let tree = rows_to_candidate_tree(&rows);

        assert_eq!(tree.categories.len(), 2);
        assert_eq!(tree.categories[0].topics.len(), 1);
        assert_eq!(tree.categories[1].topics.len(), 1);
    }

    #[test]
    fn category_matching_is_exact() {
        let rows = vec![row("Algebra", "X"), row("algebra", "Y"), row("Algebra ", "Z")];
        let tree = rows_to_candidate_tree(&rows);

        assert_eq!(tree.categories.len(), 3);
    }

    #[test]
    fn empty_input_yields_empty_tree() {
        assert_eq!(rows_to_candidate_tree(&[]), CandidateTree::default());
    }
}
