//! Import Service - CSV import orchestration
//!
//! Drives the whole CSV import path: parse the text, group rows into a
//! candidate tree, merge it additively into the subject's existing tree,
//! expand the merged two-level shape back to the three-level update
//! request, and hand that to the synchronizer.
//!
//! The merge works on the two upper levels (category name -> topic
//! names); a category's topic set is the union across its subcategories.
//! On expansion, topics new to an existing category land in its first
//! subcategory, and a brand-new category gets a single subcategory named
//! after itself to hold its topics. Re-importing the same file is a
//! no-op on the stored tree.

use crate::import::{
    merge_candidate, parse_topic_csv, rows_to_candidate_tree, CandidateCategory, CandidateTopic,
    CandidateTree, CsvLineError,
};
use crate::models::{
    CategoryInput, CategoryTree, SubcategoryInput, SubjectTree, TopicInput, TopicView,
    TreeUpdateRequest,
};
use crate::services::error::TreeServiceError;
use crate::services::tree_service::TreeService;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Counts of entities the import added, by level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedCounts {
    pub categories: usize,
    pub subcategories: usize,
    pub topics: usize,
}

/// Outcome of one import attempt.
///
/// `success` reports whether the import reached the synchronizer: parse
/// errors on some lines do not fail an import that still produced rows,
/// they just ride along in `errors`. Only an input with no usable rows
/// at all comes back with `success: false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub success: bool,
    pub imported: ImportedCounts,
    pub errors: Vec<CsvLineError>,
}

/// Service orchestrating CSV imports on top of [`TreeService`].
pub struct ImportService {
    tree: Arc<TreeService>,
}

impl ImportService {
    pub fn new(tree: Arc<TreeService>) -> Self {
        Self { tree }
    }

    /// Import CSV text into a subject's tree.
    ///
    /// Returns `Err` only for subject/ownership failures and storage
    /// errors; malformed CSV lines are reported inside the summary.
    pub async fn import_csv(
        &self,
        subject_id: &str,
        user_id: &str,
        csv_text: &str,
    ) -> Result<ImportSummary, TreeServiceError> {
        let parsed = parse_topic_csv(csv_text);

        if parsed.rows.is_empty() {
            let mut errors = parsed.errors;
            errors.push(CsvLineError {
                line: 0,
                message: "no data to import".to_string(),
            });
            return Ok(ImportSummary {
                success: false,
                imported: ImportedCounts::default(),
                errors,
            });
        }

        let candidate = rows_to_candidate_tree(&parsed.rows);

        let existing = self.tree.get_subject_tree(subject_id, user_id).await?;
        let baseline = project_tree(&existing);
        let merged = merge_candidate(&baseline, &candidate);
        let (request, imported) = expand_tree(&existing, &merged);

        tracing::info!(
            subject_id = %subject_id,
            rows = parsed.rows.len(),
            rejected_lines = parsed.errors.len(),
            categories = imported.categories,
            topics = imported.topics,
            "Importing CSV into subject tree"
        );

        self.tree
            .update_subject_tree(subject_id, user_id, &request)
            .await?;

        Ok(ImportSummary {
            success: true,
            imported,
            errors: parsed.errors,
        })
    }
}

/// Project the stored three-level tree into the merger's two-level shape.
///
/// Each category contributes the name-deduplicated union of its
/// subcategories' topics, in traversal order.
fn project_tree(tree: &SubjectTree) -> CandidateTree {
    let categories = tree
        .categories
        .iter()
        .map(|category| {
            let mut topics: Vec<CandidateTopic> = Vec::new();
            for subcategory in &category.subcategories {
                for topic in &subcategory.topics {
                    if topics.iter().any(|t| t.name == topic.name) {
                        continue;
                    }
                    topics.push(CandidateTopic {
                        id: Some(topic.id.clone()),
                        name: topic.name.clone(),
                        display_order: topic.display_order,
                    });
                }
            }
            CandidateCategory {
                id: Some(category.id.clone()),
                name: category.name.clone(),
                display_order: category.display_order,
                topics,
            }
        })
        .collect();

    CandidateTree { categories }
}

/// Expand the merged two-level tree back into a full update request.
///
/// Existing structure is reproduced exactly (same ids, names, orders,
/// topic metadata) so the synchronizer sees it as unchanged. Additions
/// are threaded in: new topics into the first subcategory of their
/// category (created as a same-named subcategory if the category had
/// none), new categories with one same-named subcategory holding all
/// their topics.
fn expand_tree(existing: &SubjectTree, merged: &CandidateTree) -> (TreeUpdateRequest, ImportedCounts) {
    let existing_by_id: HashMap<&str, &CategoryTree> = existing
        .categories
        .iter()
        .map(|c| (c.id.as_str(), c))
        .collect();

    let mut counts = ImportedCounts::default();
    let mut categories: Vec<CategoryInput> = Vec::new();

    for category in &merged.categories {
        match category.id.as_deref().and_then(|id| existing_by_id.get(id)) {
            Some(current) => {
                let mut input = category_to_input(current);

                let new_topics: Vec<&CandidateTopic> =
                    category.topics.iter().filter(|t| t.id.is_none()).collect();
                if !new_topics.is_empty() {
                    if input.subcategories.is_empty() {
                        counts.subcategories += 1;
                        input.subcategories.push(SubcategoryInput {
                            id: None,
                            name: category.name.clone(),
                            display_order: 0,
                            topics: Vec::new(),
                        });
                    }
                    let target = &mut input.subcategories[0];
                    for topic in new_topics {
                        counts.topics += 1;
                        target.topics.push(new_topic_input(topic));
                    }
                }

                categories.push(input);
            }
            None => {
                counts.categories += 1;
                counts.subcategories += 1;
                counts.topics += category.topics.len();
                categories.push(CategoryInput {
                    id: None,
                    name: category.name.clone(),
                    display_order: category.display_order,
                    subcategories: vec![SubcategoryInput {
                        id: None,
                        name: category.name.clone(),
                        display_order: 0,
                        topics: category.topics.iter().map(new_topic_input).collect(),
                    }],
                });
            }
        }
    }

    (TreeUpdateRequest { categories }, counts)
}

fn category_to_input(category: &CategoryTree) -> CategoryInput {
    CategoryInput {
        id: Some(category.id.clone()),
        name: category.name.clone(),
        display_order: category.display_order,
        subcategories: category
            .subcategories
            .iter()
            .map(|subcategory| SubcategoryInput {
                id: Some(subcategory.id.clone()),
                name: subcategory.name.clone(),
                display_order: subcategory.display_order,
                topics: subcategory.topics.iter().map(topic_to_input).collect(),
            })
            .collect(),
    }
}

fn topic_to_input(topic: &TopicView) -> TopicInput {
    TopicInput {
        id: Some(topic.id.clone()),
        name: topic.name.clone(),
        description: topic.description.clone(),
        difficulty: topic.difficulty.clone(),
        topic_type: topic.topic_type.clone(),
        ai_system_prompt: topic.ai_system_prompt.clone(),
        display_order: topic.display_order,
    }
}

fn new_topic_input(topic: &CandidateTopic) -> TopicInput {
    TopicInput {
        id: None,
        name: topic.name.clone(),
        description: None,
        difficulty: None,
        topic_type: None,
        ai_system_prompt: None,
        display_order: topic.display_order,
    }
}

#[cfg(test)]
#[path = "import_service_test.rs"]
mod import_service_test;
