//! Tree Merger - additive, name-keyed merge
//!
//! Merges an imported candidate tree into the existing tree for a
//! subject. The merge is strictly additive: existing categories and
//! topics keep their ids, names, and display orders untouched; only
//! genuinely new entries are appended. Matching is by exact name on both
//! levels. Merging the same candidate twice adds nothing the second time.

use crate::import::convert::{CandidateCategory, CandidateTopic, CandidateTree};
use std::collections::HashMap;

/// Merge `imported` into `existing`, returning the combined tree.
///
/// - A candidate category whose name matches an existing one contributes
///   only its unseen topics, appended after the existing maximum topic
///   order (max + 1, counting upward).
/// - A candidate category with no name match is appended whole after the
///   existing maximum category order.
/// - Nothing existing is renamed, reordered, or removed.
pub fn merge_candidate(existing: &CandidateTree, imported: &CandidateTree) -> CandidateTree {
    let mut merged: Vec<CandidateCategory> = existing.categories.clone();
    let mut index: HashMap<String, usize> = merged
        .iter()
        .enumerate()
        .map(|(pos, c)| (c.name.clone(), pos))
        .collect();
    let mut next_category_order = next_order(merged.iter().map(|c| c.display_order));

    for candidate in &imported.categories {
        match index.get(&candidate.name) {
            Some(&pos) => {
                let target = &mut merged[pos];
                let mut next_topic_order =
                    next_order(target.topics.iter().map(|t| t.display_order));

                for topic in &candidate.topics {
                    if target.topics.iter().any(|t| t.name == topic.name) {
                        continue;
                    }
                    target.topics.push(CandidateTopic {
                        id: None,
                        name: topic.name.clone(),
                        display_order: next_topic_order,
                    });
                    next_topic_order += 1;
                }
            }
            None => {
                let mut added = candidate.clone();
                added.id = None;
                added.display_order = next_category_order;
                next_category_order += 1;
                for topic in &mut added.topics {
                    topic.id = None;
                }
                index.insert(added.name.clone(), merged.len());
                merged.push(added);
            }
        }
    }

    // Stable sorts, so equal orders keep their relative position.
    merged.sort_by_key(|c| c.display_order);
    for category in &mut merged {
        category.topics.sort_by_key(|t| t.display_order);
    }

    CandidateTree { categories: merged }
}

fn next_order(orders: impl Iterator<Item = i64>) -> i64 {
    orders.max().map_or(0, |max| max + 1)
}
