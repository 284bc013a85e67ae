//! TursoStore - TaxonomyStore Implementation for Turso/libsql
//!
//! Implements the [`TaxonomyStore`] trait on top of [`DatabaseService`].
//! This backend has multi-statement transaction support, so
//! `apply_mutations` runs the whole batch inside a single transaction with
//! rollback on error. Row-to-model conversion is centralized here.

use crate::db::taxonomy_store::{TaxonomyStore, TopicScope, TreeMutation};
use crate::db::{DatabaseError, DatabaseService};
use crate::models::{Category, Subject, Topic};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use libsql::Row;
use std::sync::Arc;

/// libsql-backed store for the taxonomy tables
pub struct TursoStore {
    /// Underlying database service (connection + schema management)
    db: Arc<DatabaseService>,
}

impl TursoStore {
    /// Create a new TursoStore over an initialized DatabaseService
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Parse timestamp from database - handles both SQLite and RFC3339 formats
    ///
    /// SQLite CURRENT_TIMESTAMP returns: "YYYY-MM-DD HH:MM:SS"
    /// Application-written values use RFC3339: "YYYY-MM-DDTHH:MM:SSZ"
    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(naive.and_utc());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        Err(DatabaseError::row_decode(format!(
            "Unable to parse timestamp '{}' as SQLite or RFC3339 format",
            s
        )))
    }

    fn parse_optional_timestamp(
        s: Option<String>,
    ) -> Result<Option<DateTime<Utc>>, DatabaseError> {
        s.map(|s| Self::parse_timestamp(&s)).transpose()
    }

    fn decode<T>(result: Result<T, libsql::Error>, column: &str) -> Result<T, DatabaseError> {
        result.map_err(|e| DatabaseError::row_decode(format!("Failed to get {}: {}", column, e)))
    }

    /// Convert a libsql row to a Subject
    ///
    /// Expected columns (in order): id, owner_id, name, created_at,
    /// modified_at, deleted_at
    fn row_to_subject(row: &Row) -> Result<Subject, DatabaseError> {
        let created_at: String = Self::decode(row.get(3), "created_at")?;
        let modified_at: String = Self::decode(row.get(4), "modified_at")?;
        let deleted_at: Option<String> = Self::decode(row.get(5), "deleted_at")?;

        Ok(Subject {
            id: Self::decode(row.get(0), "id")?,
            owner_id: Self::decode(row.get(1), "owner_id")?,
            name: Self::decode(row.get(2), "name")?,
            created_at: Self::parse_timestamp(&created_at)?,
            modified_at: Self::parse_timestamp(&modified_at)?,
            deleted_at: Self::parse_optional_timestamp(deleted_at)?,
        })
    }

    /// Convert a libsql row to a Category
    ///
    /// Expected columns (in order): id, owner_id, subject_id, name, depth,
    /// parent_id, display_order, created_at, modified_at, deleted_at
    fn row_to_category(row: &Row) -> Result<Category, DatabaseError> {
        let created_at: String = Self::decode(row.get(7), "created_at")?;
        let modified_at: String = Self::decode(row.get(8), "modified_at")?;
        let deleted_at: Option<String> = Self::decode(row.get(9), "deleted_at")?;

        Ok(Category {
            id: Self::decode(row.get(0), "id")?,
            owner_id: Self::decode(row.get(1), "owner_id")?,
            subject_id: Self::decode(row.get(2), "subject_id")?,
            name: Self::decode(row.get(3), "name")?,
            depth: Self::decode(row.get(4), "depth")?,
            parent_id: Self::decode(row.get(5), "parent_id")?,
            display_order: Self::decode(row.get(6), "display_order")?,
            created_at: Self::parse_timestamp(&created_at)?,
            modified_at: Self::parse_timestamp(&modified_at)?,
            deleted_at: Self::parse_optional_timestamp(deleted_at)?,
        })
    }

    /// Convert a libsql row to a Topic
    ///
    /// Expected columns (in order): id, owner_id, category_id, name,
    /// description, difficulty, topic_type, ai_system_prompt,
    /// display_order, created_at, modified_at, deleted_at
    fn row_to_topic(row: &Row) -> Result<Topic, DatabaseError> {
        let created_at: String = Self::decode(row.get(9), "created_at")?;
        let modified_at: String = Self::decode(row.get(10), "modified_at")?;
        let deleted_at: Option<String> = Self::decode(row.get(11), "deleted_at")?;

        Ok(Topic {
            id: Self::decode(row.get(0), "id")?,
            owner_id: Self::decode(row.get(1), "owner_id")?,
            category_id: Self::decode(row.get(2), "category_id")?,
            name: Self::decode(row.get(3), "name")?,
            description: Self::decode(row.get(4), "description")?,
            difficulty: Self::decode(row.get(5), "difficulty")?,
            topic_type: Self::decode(row.get(6), "topic_type")?,
            ai_system_prompt: Self::decode(row.get(7), "ai_system_prompt")?,
            display_order: Self::decode(row.get(8), "display_order")?,
            created_at: Self::parse_timestamp(&created_at)?,
            modified_at: Self::parse_timestamp(&modified_at)?,
            deleted_at: Self::parse_optional_timestamp(deleted_at)?,
        })
    }

    fn optional_text(value: Option<&str>) -> libsql::Value {
        match value {
            Some(s) => libsql::Value::Text(s.to_string()),
            None => libsql::Value::Null,
        }
    }

    fn timestamp_text(ts: &DateTime<Utc>) -> libsql::Value {
        libsql::Value::Text(ts.to_rfc3339())
    }

    /// Build the `?, ?, ...` placeholder list for an IN clause
    fn in_placeholders(len: usize) -> String {
        vec!["?"; len].join(", ")
    }

    /// Execute one mutation on an open connection.
    ///
    /// Upserts preserve `created_at` and ownership columns on the update
    /// path, rewrite name/placement/order from the request, and clear
    /// `deleted_at` (revival).
    async fn execute_mutation(
        conn: &libsql::Connection,
        mutation: &TreeMutation,
    ) -> Result<(), libsql::Error> {
        match mutation {
            TreeMutation::UpsertCategory(category) => {
                conn.execute(
                    "INSERT INTO categories
                         (id, owner_id, subject_id, name, depth, parent_id,
                          display_order, created_at, modified_at, deleted_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)
                     ON CONFLICT(id) DO UPDATE SET
                         name = excluded.name,
                         depth = excluded.depth,
                         parent_id = excluded.parent_id,
                         display_order = excluded.display_order,
                         modified_at = excluded.modified_at,
                         deleted_at = NULL",
                    libsql::params_from_iter(vec![
                        libsql::Value::Text(category.id.clone()),
                        libsql::Value::Text(category.owner_id.clone()),
                        libsql::Value::Text(category.subject_id.clone()),
                        libsql::Value::Text(category.name.clone()),
                        libsql::Value::Integer(category.depth),
                        Self::optional_text(category.parent_id.as_deref()),
                        libsql::Value::Integer(category.display_order),
                        Self::timestamp_text(&category.created_at),
                        Self::timestamp_text(&category.modified_at),
                    ]),
                )
                .await?;
            }
            TreeMutation::UpsertTopic(topic) => {
                conn.execute(
                    "INSERT INTO topics
                         (id, owner_id, category_id, name, description, difficulty,
                          topic_type, ai_system_prompt, display_order,
                          created_at, modified_at, deleted_at)
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)
                     ON CONFLICT(id) DO UPDATE SET
                         category_id = excluded.category_id,
                         name = excluded.name,
                         description = excluded.description,
                         difficulty = excluded.difficulty,
                         topic_type = excluded.topic_type,
                         ai_system_prompt = excluded.ai_system_prompt,
                         display_order = excluded.display_order,
                         modified_at = excluded.modified_at,
                         deleted_at = NULL",
                    libsql::params_from_iter(vec![
                        libsql::Value::Text(topic.id.clone()),
                        libsql::Value::Text(topic.owner_id.clone()),
                        libsql::Value::Text(topic.category_id.clone()),
                        libsql::Value::Text(topic.name.clone()),
                        Self::optional_text(topic.description.as_deref()),
                        Self::optional_text(topic.difficulty.as_deref()),
                        Self::optional_text(topic.topic_type.as_deref()),
                        Self::optional_text(topic.ai_system_prompt.as_deref()),
                        libsql::Value::Integer(topic.display_order),
                        Self::timestamp_text(&topic.created_at),
                        Self::timestamp_text(&topic.modified_at),
                    ]),
                )
                .await?;
            }
            TreeMutation::SoftDeleteCategory { id, deleted_at } => {
                conn.execute(
                    "UPDATE categories SET deleted_at = ?, modified_at = ? WHERE id = ?",
                    libsql::params_from_iter(vec![
                        Self::timestamp_text(deleted_at),
                        Self::timestamp_text(deleted_at),
                        libsql::Value::Text(id.clone()),
                    ]),
                )
                .await?;
            }
            TreeMutation::SoftDeleteTopic { id, deleted_at } => {
                conn.execute(
                    "UPDATE topics SET deleted_at = ?, modified_at = ? WHERE id = ?",
                    libsql::params_from_iter(vec![
                        Self::timestamp_text(deleted_at),
                        Self::timestamp_text(deleted_at),
                        libsql::Value::Text(id.clone()),
                    ]),
                )
                .await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TaxonomyStore for TursoStore {
    async fn create_subject(&self, subject: Subject) -> Result<Subject, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO subjects (id, owner_id, name, created_at, modified_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            libsql::params_from_iter(vec![
                libsql::Value::Text(subject.id.clone()),
                libsql::Value::Text(subject.owner_id.clone()),
                libsql::Value::Text(subject.name.clone()),
                Self::timestamp_text(&subject.created_at),
                Self::timestamp_text(&subject.modified_at),
                match &subject.deleted_at {
                    Some(ts) => Self::timestamp_text(ts),
                    None => libsql::Value::Null,
                },
            ]),
        )
        .await
        .map_err(|e| DatabaseError::sql_execution(format!("Failed to insert subject: {}", e)))?;

        Ok(subject)
    }

    async fn get_subject(&self, id: &str) -> Result<Option<Subject>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, owner_id, name, created_at, modified_at, deleted_at
                 FROM subjects WHERE id = ?",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare get_subject query: {}", e))
            })?;

        let mut rows = stmt.query([id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute get_subject query: {}", e))
        })?;

        match rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            Some(row) => Ok(Some(Self::row_to_subject(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_categories(
        &self,
        subject_id: &str,
        owner_id: &str,
    ) -> Result<Vec<Category>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT id, owner_id, subject_id, name, depth, parent_id,
                        display_order, created_at, modified_at, deleted_at
                 FROM categories
                 WHERE subject_id = ? AND owner_id = ? AND deleted_at IS NULL
                 ORDER BY display_order ASC",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!(
                    "Failed to prepare list_categories query: {}",
                    e
                ))
            })?;

        let mut rows = stmt.query([subject_id, owner_id]).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute list_categories query: {}", e))
        })?;

        let mut categories = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            categories.push(Self::row_to_category(&row)?);
        }

        Ok(categories)
    }

    async fn list_topics(
        &self,
        subject_id: &str,
        owner_id: &str,
    ) -> Result<Vec<Topic>, DatabaseError> {
        let conn = self.db.connect_with_timeout().await?;

        let mut stmt = conn
            .prepare(
                "SELECT t.id, t.owner_id, t.category_id, t.name, t.description,
                        t.difficulty, t.topic_type, t.ai_system_prompt,
                        t.display_order, t.created_at, t.modified_at, t.deleted_at
                 FROM topics t
                 JOIN categories c ON c.id = t.category_id
                 WHERE c.subject_id = ? AND c.owner_id = ? AND c.deleted_at IS NULL
                   AND t.owner_id = ? AND t.deleted_at IS NULL
                 ORDER BY t.display_order ASC",
            )
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to prepare list_topics query: {}", e))
            })?;

        let mut rows = stmt
            .query([subject_id, owner_id, owner_id])
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!("Failed to execute list_topics query: {}", e))
            })?;

        let mut topics = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            topics.push(Self::row_to_topic(&row)?);
        }

        Ok(topics)
    }

    async fn get_categories_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<Category>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.db.connect_with_timeout().await?;

        let sql = format!(
            "SELECT id, owner_id, subject_id, name, depth, parent_id,
                    display_order, created_at, modified_at, deleted_at
             FROM categories WHERE id IN ({})",
            Self::in_placeholders(ids.len())
        );

        let mut stmt = conn.prepare(&sql).await.map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to prepare get_categories_by_ids query: {}",
                e
            ))
        })?;

        let mut rows = stmt
            .query(libsql::params_from_iter(ids.iter().cloned()))
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!(
                    "Failed to execute get_categories_by_ids query: {}",
                    e
                ))
            })?;

        let mut categories = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            categories.push(Self::row_to_category(&row)?);
        }

        Ok(categories)
    }

    async fn get_topic_scopes(&self, ids: &[String]) -> Result<Vec<TopicScope>, DatabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.db.connect_with_timeout().await?;

        // Scope resolution joins through the category so the synchronizer
        // can check subject membership transitively. Soft-deleted rows are
        // included on both sides; revival depends on seeing them.
        let sql = format!(
            "SELECT t.id, t.owner_id, c.subject_id
             FROM topics t
             JOIN categories c ON c.id = t.category_id
             WHERE t.id IN ({})",
            Self::in_placeholders(ids.len())
        );

        let mut stmt = conn.prepare(&sql).await.map_err(|e| {
            DatabaseError::sql_execution(format!(
                "Failed to prepare get_topic_scopes query: {}",
                e
            ))
        })?;

        let mut rows = stmt
            .query(libsql::params_from_iter(ids.iter().cloned()))
            .await
            .map_err(|e| {
                DatabaseError::sql_execution(format!(
                    "Failed to execute get_topic_scopes query: {}",
                    e
                ))
            })?;

        let mut scopes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::sql_execution(e.to_string()))?
        {
            scopes.push(TopicScope {
                id: Self::decode(row.get(0), "id")?,
                owner_id: Self::decode(row.get(1), "owner_id")?,
                subject_id: Self::decode(row.get(2), "subject_id")?,
            });
        }

        Ok(scopes)
    }

    async fn apply_mutations(&self, mutations: Vec<TreeMutation>) -> Result<(), DatabaseError> {
        if mutations.is_empty() {
            return Ok(());
        }

        let conn = self.db.connect_with_timeout().await?;

        // Local libsql supports multi-statement transactions, so this
        // backend gets the atomic flavor of the port contract.
        conn.execute("BEGIN TRANSACTION", ()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to begin transaction: {}", e))
        })?;

        for mutation in &mutations {
            if let Err(e) = Self::execute_mutation(&conn, mutation).await {
                // Rollback on error
                let _rollback = conn.execute("ROLLBACK", ()).await;
                return Err(DatabaseError::sql_execution(format!(
                    "Failed to apply tree mutation: {}",
                    e
                )));
            }
        }

        conn.execute("COMMIT", ()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (TursoStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(DatabaseService::new(db_path).await.unwrap());
        (TursoStore::new(db), temp_dir)
    }

    fn category(id: &str, name: &str, order: i64) -> Category {
        Category::new_root(
            id.to_string(),
            "user-1".to_string(),
            "subject-1".to_string(),
            name.to_string(),
            order,
        )
    }

    async fn seed_subject(store: &TursoStore) -> Subject {
        let mut subject = Subject::new("user-1".to_string(), "Accounting".to_string());
        subject.id = "subject-1".to_string();
        store.create_subject(subject.clone()).await.unwrap();
        subject
    }

    #[tokio::test]
    async fn test_create_and_get_subject() {
        let (store, _temp_dir) = create_test_store().await;

        let subject = seed_subject(&store).await;

        let fetched = store.get_subject(&subject.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, subject.id);
        assert_eq!(fetched.owner_id, "user-1");
        assert_eq!(fetched.name, "Accounting");
        assert!(fetched.deleted_at.is_none());

        assert!(store.get_subject("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_category_inserts_then_updates() {
        let (store, _temp_dir) = create_test_store().await;
        seed_subject(&store).await;

        store
            .apply_mutations(vec![TreeMutation::UpsertCategory(category(
                "cat-1", "Old name", 0,
            ))])
            .await
            .unwrap();

        let mut renamed = category("cat-1", "New name", 3);
        renamed.modified_at = Utc::now();
        store
            .apply_mutations(vec![TreeMutation::UpsertCategory(renamed)])
            .await
            .unwrap();

        let listed = store.list_categories("subject-1", "user-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "New name");
        assert_eq!(listed[0].display_order, 3);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_and_upsert_revives() {
        let (store, _temp_dir) = create_test_store().await;
        seed_subject(&store).await;

        store
            .apply_mutations(vec![TreeMutation::UpsertCategory(category(
                "cat-1", "Ledger", 0,
            ))])
            .await
            .unwrap();

        store
            .apply_mutations(vec![TreeMutation::SoftDeleteCategory {
                id: "cat-1".to_string(),
                deleted_at: Utc::now(),
            }])
            .await
            .unwrap();

        assert!(store
            .list_categories("subject-1", "user-1")
            .await
            .unwrap()
            .is_empty());

        // Soft-deleted rows stay visible to id lookups for revival
        let by_id = store
            .get_categories_by_ids(&["cat-1".to_string()])
            .await
            .unwrap();
        assert_eq!(by_id.len(), 1);
        assert!(by_id[0].deleted_at.is_some());

        store
            .apply_mutations(vec![TreeMutation::UpsertCategory(category(
                "cat-1", "Ledger", 0,
            ))])
            .await
            .unwrap();

        let listed = store.list_categories("subject-1", "user-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].deleted_at.is_none());
    }

    #[tokio::test]
    async fn test_topic_scopes_join_through_category() {
        let (store, _temp_dir) = create_test_store().await;
        seed_subject(&store).await;

        let parent = category("cat-1", "Ledger", 0);
        let child = Category::new_child(
            "cat-2".to_string(),
            "user-1".to_string(),
            "subject-1".to_string(),
            "Journal entries".to_string(),
            "cat-1".to_string(),
            0,
        );
        let topic = Topic::new(
            "topic-1".to_string(),
            "user-1".to_string(),
            "cat-2".to_string(),
            "Debits and credits".to_string(),
            0,
        );

        store
            .apply_mutations(vec![
                TreeMutation::UpsertCategory(parent),
                TreeMutation::UpsertCategory(child),
                TreeMutation::UpsertTopic(topic),
            ])
            .await
            .unwrap();

        let scopes = store
            .get_topic_scopes(&["topic-1".to_string()])
            .await
            .unwrap();
        assert_eq!(scopes.len(), 1);
        assert_eq!(scopes[0].owner_id, "user-1");
        assert_eq!(scopes[0].subject_id, "subject-1");

        let topics = store.list_topics("subject-1", "user-1").await.unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].name, "Debits and credits");
    }

    #[tokio::test]
    async fn test_list_categories_orders_by_display_order() {
        let (store, _temp_dir) = create_test_store().await;
        seed_subject(&store).await;

        store
            .apply_mutations(vec![
                TreeMutation::UpsertCategory(category("cat-b", "Second", 1)),
                TreeMutation::UpsertCategory(category("cat-a", "First", 0)),
                TreeMutation::UpsertCategory(category("cat-c", "Third", 2)),
            ])
            .await
            .unwrap();

        let listed = store.list_categories("subject-1", "user-1").await.unwrap();
        let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }
}
