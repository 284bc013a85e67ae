//! Tree Service - read and synchronize subject trees
//!
//! `TreeService` owns the two tree operations:
//!
//! - `get_subject_tree` assembles the persisted flat rows into the
//!   three-level view, behind an ownership gate on the subject.
//! - `update_subject_tree` replaces a subject's tree with the submitted
//!   one: validate every referenced id first, then soft-delete omitted
//!   nodes and upsert submitted ones in a single mutation batch.
//!
//! Validation is all-or-nothing: a single invalid id aborts the update
//! before any mutation reaches the store. Depth and parent linkage are
//! always recomputed from the submitted tree's shape, so moving a node
//! between levels or parents is just placing its id elsewhere.

use crate::db::{TaxonomyStore, TreeMutation};
use crate::models::{
    Category, CategoryTree, SubcategoryTree, Subject, SubjectTree, Topic, TopicView,
    TreeUpdateRequest,
};
use crate::services::error::TreeServiceError;
use crate::services::ports::{Clock, IdGenerator, SystemClock, UuidGenerator};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Service for reading and synchronizing subject trees.
pub struct TreeService {
    store: Arc<dyn TaxonomyStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl TreeService {
    pub fn new(
        store: Arc<dyn TaxonomyStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, ids, clock }
    }

    /// Create a service with production id and time sources.
    pub fn with_defaults(store: Arc<dyn TaxonomyStore>) -> Self {
        Self::new(store, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    /// Resolve the subject and enforce the ownership gate.
    ///
    /// Missing, soft-deleted, and foreign subjects all collapse into
    /// `SubjectNotFound` so existence is never leaked across users.
    async fn require_subject(
        &self,
        subject_id: &str,
        user_id: &str,
    ) -> Result<Subject, TreeServiceError> {
        match self.store.get_subject(subject_id).await? {
            Some(subject) if subject.owner_id == user_id && subject.deleted_at.is_none() => {
                Ok(subject)
            }
            _ => Err(TreeServiceError::subject_not_found(subject_id)),
        }
    }

    /// Assemble the full tree for a subject.
    ///
    /// Soft-deleted rows are invisible. Every level comes back ascending
    /// by display order; empty levels are empty vectors.
    pub async fn get_subject_tree(
        &self,
        subject_id: &str,
        user_id: &str,
    ) -> Result<SubjectTree, TreeServiceError> {
        self.require_subject(subject_id, user_id).await?;

        let categories = self.store.list_categories(subject_id, user_id).await?;
        let topics = self.store.list_topics(subject_id, user_id).await?;

        // Both lists arrive order-sorted; grouping preserves that order.
        let mut topics_by_category: HashMap<String, Vec<TopicView>> = HashMap::new();
        for topic in topics {
            topics_by_category
                .entry(topic.category_id.clone())
                .or_default()
                .push(TopicView {
                    id: topic.id,
                    name: topic.name,
                    description: topic.description,
                    difficulty: topic.difficulty,
                    topic_type: topic.topic_type,
                    ai_system_prompt: topic.ai_system_prompt,
                    display_order: topic.display_order,
                });
        }

        let mut subcategories_by_parent: HashMap<String, Vec<SubcategoryTree>> = HashMap::new();
        for category in categories.iter().filter(|c| c.depth == 2) {
            let Some(parent_id) = &category.parent_id else {
                continue;
            };
            subcategories_by_parent
                .entry(parent_id.clone())
                .or_default()
                .push(SubcategoryTree {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    display_order: category.display_order,
                    topics: topics_by_category
                        .remove(&category.id)
                        .unwrap_or_default(),
                });
        }

        let roots = categories
            .iter()
            .filter(|c| c.depth == 1)
            .map(|category| CategoryTree {
                id: category.id.clone(),
                name: category.name.clone(),
                display_order: category.display_order,
                subcategories: subcategories_by_parent
                    .remove(&category.id)
                    .unwrap_or_default(),
            })
            .collect();

        Ok(SubjectTree {
            subject_id: subject_id.to_string(),
            categories: roots,
        })
    }

    /// Replace a subject's tree with the submitted one.
    ///
    /// Phases, in order:
    ///
    /// 1. Ownership gate on the subject.
    /// 2. Validate every referenced category and topic id: it must exist
    ///    (soft-deleted rows count) and belong to this user and subject.
    ///    Any failure aborts here with nothing written.
    /// 3. Soft-delete every live node whose id the request omits.
    /// 4. Upsert every submitted node with depth, parent, and order taken
    ///    from its position in the request. Upserting a soft-deleted id
    ///    revives it.
    ///
    /// All mutations go to the store as one batch.
    pub async fn update_subject_tree(
        &self,
        subject_id: &str,
        user_id: &str,
        request: &TreeUpdateRequest,
    ) -> Result<(), TreeServiceError> {
        self.require_subject(subject_id, user_id).await?;

        let mut category_ids: HashSet<String> = HashSet::new();
        let mut topic_ids: HashSet<String> = HashSet::new();
        for category in &request.categories {
            if let Some(id) = &category.id {
                category_ids.insert(id.clone());
            }
            for subcategory in &category.subcategories {
                if let Some(id) = &subcategory.id {
                    category_ids.insert(id.clone());
                }
                for topic in &subcategory.topics {
                    if let Some(id) = &topic.id {
                        topic_ids.insert(id.clone());
                    }
                }
            }
        }

        self.validate_category_ids(subject_id, user_id, &category_ids)
            .await?;
        self.validate_topic_ids(subject_id, user_id, &topic_ids)
            .await?;

        // Snapshot the live tree before mutating so omissions are
        // computed against a consistent baseline.
        let live_categories = self.store.list_categories(subject_id, user_id).await?;
        let live_topics = self.store.list_topics(subject_id, user_id).await?;

        let now = self.clock.now();
        let mut mutations: Vec<TreeMutation> = Vec::new();

        for category in &live_categories {
            if !category_ids.contains(&category.id) {
                mutations.push(TreeMutation::SoftDeleteCategory {
                    id: category.id.clone(),
                    deleted_at: now,
                });
            }
        }
        for topic in &live_topics {
            if !topic_ids.contains(&topic.id) {
                mutations.push(TreeMutation::SoftDeleteTopic {
                    id: topic.id.clone(),
                    deleted_at: now,
                });
            }
        }

        let created_at: HashMap<&str, chrono::DateTime<chrono::Utc>> = live_categories
            .iter()
            .map(|c| (c.id.as_str(), c.created_at))
            .chain(live_topics.iter().map(|t| (t.id.as_str(), t.created_at)))
            .collect();

        for category in &request.categories {
            let category_id = self.resolve_id(&category.id);
            mutations.push(TreeMutation::UpsertCategory(Category {
                id: category_id.clone(),
                owner_id: user_id.to_string(),
                subject_id: subject_id.to_string(),
                name: category.name.clone(),
                depth: 1,
                parent_id: None,
                display_order: category.display_order,
                created_at: *created_at.get(category_id.as_str()).unwrap_or(&now),
                modified_at: now,
                deleted_at: None,
            }));

            for subcategory in &category.subcategories {
                let subcategory_id = self.resolve_id(&subcategory.id);
                mutations.push(TreeMutation::UpsertCategory(Category {
                    id: subcategory_id.clone(),
                    owner_id: user_id.to_string(),
                    subject_id: subject_id.to_string(),
                    name: subcategory.name.clone(),
                    depth: 2,
                    parent_id: Some(category_id.clone()),
                    display_order: subcategory.display_order,
                    created_at: *created_at.get(subcategory_id.as_str()).unwrap_or(&now),
                    modified_at: now,
                    deleted_at: None,
                }));

                for topic in &subcategory.topics {
                    let topic_id = self.resolve_id(&topic.id);
                    mutations.push(TreeMutation::UpsertTopic(Topic {
                        id: topic_id.clone(),
                        owner_id: user_id.to_string(),
                        category_id: subcategory_id.clone(),
                        name: topic.name.clone(),
                        description: topic.description.clone(),
                        difficulty: topic.difficulty.clone(),
                        topic_type: topic.topic_type.clone(),
                        ai_system_prompt: topic.ai_system_prompt.clone(),
                        display_order: topic.display_order,
                        created_at: *created_at.get(topic_id.as_str()).unwrap_or(&now),
                        modified_at: now,
                        deleted_at: None,
                    }));
                }
            }
        }

        tracing::info!(
            subject_id = %subject_id,
            mutations = mutations.len(),
            "Synchronizing subject tree"
        );

        self.store.apply_mutations(mutations).await?;

        Ok(())
    }

    fn resolve_id(&self, id: &Option<String>) -> String {
        id.clone().unwrap_or_else(|| self.ids.generate())
    }

    async fn validate_category_ids(
        &self,
        subject_id: &str,
        user_id: &str,
        ids: &HashSet<String>,
    ) -> Result<(), TreeServiceError> {
        if ids.is_empty() {
            return Ok(());
        }

        let requested: Vec<String> = ids.iter().cloned().collect();
        let rows = self.store.get_categories_by_ids(&requested).await?;
        let by_id: HashMap<&str, &Category> = rows.iter().map(|c| (c.id.as_str(), c)).collect();

        for id in &requested {
            match by_id.get(id.as_str()) {
                Some(row) if row.owner_id == user_id && row.subject_id == subject_id => {}
                _ => return Err(TreeServiceError::invalid_category_id(id)),
            }
        }

        Ok(())
    }

    async fn validate_topic_ids(
        &self,
        subject_id: &str,
        user_id: &str,
        ids: &HashSet<String>,
    ) -> Result<(), TreeServiceError> {
        if ids.is_empty() {
            return Ok(());
        }

        let requested: Vec<String> = ids.iter().cloned().collect();
        let scopes = self.store.get_topic_scopes(&requested).await?;
        let by_id: HashMap<&str, _> = scopes.iter().map(|s| (s.id.as_str(), s)).collect();

        for id in &requested {
            match by_id.get(id.as_str()) {
                Some(scope) if scope.owner_id == user_id && scope.subject_id == subject_id => {}
                _ => return Err(TreeServiceError::invalid_topic_id(id)),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "tree_service_test.rs"]
mod tree_service_test;
