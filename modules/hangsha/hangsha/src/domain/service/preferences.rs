use std::collections::{HashMap, HashSet};

use hangsha_sdk::{
    Category, ExcludedKeyword, FieldPatch, InterestCategoriesPatch, InterestCategory,
    InterestCategoryAssignment,
};
use sea_orm::{ConnectionTrait, SqlErr, TransactionTrait};
use tracing::{debug, info, instrument};

use super::{required_text, Service};
use crate::domain::error::DomainError;
use crate::domain::fields::{PreferenceFields, INTEREST_CATEGORIES_SCHEMA};
use crate::domain::sync::CollectionSynchronizer;
use crate::infra::storage::category_repo::CategoryRepo;
use crate::infra::storage::entity::user_interest_category;
use crate::infra::storage::preference_repo::{ExcludedKeywordRepo, InterestCategoryRepo};

impl Service {
    pub async fn list_interest_categories(
        &self,
        user_id: i64,
    ) -> Result<Vec<InterestCategory>, DomainError> {
        interest_categories_of(&self.db, user_id).await
    }

    /// Replace the caller's interest categories with `patch.items`.
    ///
    /// The target must have unique category ids, unique priorities forming
    /// `1..=N`, and reference existing categories. `Null` and `[]` clear.
    #[instrument(skip(self, patch))]
    pub async fn replace_interest_categories(
        &self,
        user_id: i64,
        patch: InterestCategoriesPatch,
    ) -> Result<Vec<InterestCategory>, DomainError> {
        let field = PreferenceFields::ITEMS;
        let target = match patch.items {
            FieldPatch::Absent => {
                return Err(DomainError::empty_patch(
                    &INTEREST_CATEGORIES_SCHEMA.field_names(),
                ));
            }
            FieldPatch::Null => Vec::new(),
            FieldPatch::Value(items) => items,
        };
        CollectionSynchronizer::validate_interest_categories(field, &target)?;

        let txn = self.db.begin().await?;
        ensure_categories_exist(&txn, field, &target).await?;

        let current = InterestCategoryRepo::list_for_user(&txn, user_id).await?;
        let plan = CollectionSynchronizer::plan(
            current,
            |c: &user_interest_category::Model| (c.category_id, c.priority),
            target,
            |t: &InterestCategoryAssignment| (t.category_id, t.priority),
        );
        if plan.is_noop() {
            debug!(user_id, "interest categories unchanged");
        } else {
            let removed: Vec<i64> = plan.to_delete.iter().map(|c| c.id).collect();
            InterestCategoryRepo::delete_by_ids(&txn, &removed).await?;
            InterestCategoryRepo::insert_many(&txn, user_id, &plan.to_insert).await?;
        }
        let result = interest_categories_of(&txn, user_id).await?;
        txn.commit().await?;

        info!(user_id, count = result.len(), "interest categories replaced");
        Ok(result)
    }

    #[instrument(skip(self))]
    pub async fn delete_interest_category(
        &self,
        user_id: i64,
        category_id: i64,
    ) -> Result<(), DomainError> {
        let deleted =
            InterestCategoryRepo::delete_for_category(&self.db, user_id, category_id).await?;
        if deleted == 0 {
            return Err(DomainError::not_found("Interest category", category_id));
        }
        info!(user_id, category_id, "interest category removed");
        Ok(())
    }

    pub async fn list_excluded_keywords(
        &self,
        user_id: i64,
    ) -> Result<Vec<ExcludedKeyword>, DomainError> {
        let rows = ExcludedKeywordRepo::list_for_user(&self.db, user_id).await?;
        Ok(rows.into_iter().map(ExcludedKeyword::from).collect())
    }

    /// Idempotent add. A keyword the user already excludes, including one
    /// inserted concurrently, is returned as-is.
    #[instrument(skip(self, keyword))]
    pub async fn add_excluded_keyword(
        &self,
        user_id: i64,
        keyword: &str,
    ) -> Result<ExcludedKeyword, DomainError> {
        let keyword = required_text(
            PreferenceFields::KEYWORD,
            keyword,
            self.config.max_keyword_length,
        )?;

        if ExcludedKeywordRepo::count(&self.db, user_id, &keyword).await? > 0 {
            debug!(user_id, "keyword already excluded");
            return self.existing_keyword(user_id, &keyword).await;
        }
        self.insert_excluded_keyword(user_id, &keyword).await
    }

    /// Insert step of the add; a unique-key collision resolves to the stored row.
    async fn insert_excluded_keyword(
        &self,
        user_id: i64,
        keyword: &str,
    ) -> Result<ExcludedKeyword, DomainError> {
        match ExcludedKeywordRepo::insert(&self.db, user_id, keyword).await {
            Ok(model) => {
                info!(user_id, keyword_id = model.id, "excluded keyword added");
                Ok(model.into())
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!(user_id, "keyword inserted concurrently");
                self.existing_keyword(user_id, keyword).await
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_excluded_keyword(
        &self,
        user_id: i64,
        keyword_id: i64,
    ) -> Result<(), DomainError> {
        let deleted = ExcludedKeywordRepo::delete(&self.db, user_id, keyword_id).await?;
        if deleted == 0 {
            return Err(DomainError::not_found("Excluded keyword", keyword_id));
        }
        info!(user_id, keyword_id, "excluded keyword removed");
        Ok(())
    }

    async fn existing_keyword(
        &self,
        user_id: i64,
        keyword: &str,
    ) -> Result<ExcludedKeyword, DomainError> {
        ExcludedKeywordRepo::find(&self.db, user_id, keyword)
            .await?
            .map(ExcludedKeyword::from)
            .ok_or_else(|| DomainError::not_found("Excluded keyword", keyword))
    }
}

async fn ensure_categories_exist<C: ConnectionTrait>(
    conn: &C,
    field: &str,
    items: &[InterestCategoryAssignment],
) -> Result<(), DomainError> {
    let ids: Vec<i64> = items.iter().map(|i| i.category_id).collect();
    let found: HashSet<i64> = CategoryRepo::find_by_ids(conn, &ids)
        .await?
        .into_iter()
        .map(|c| c.id)
        .collect();
    if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
        return Err(DomainError::reference_not_found(field, "Category", missing));
    }
    Ok(())
}

async fn interest_categories_of<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<InterestCategory>, DomainError> {
    let rows = InterestCategoryRepo::list_for_user(conn, user_id).await?;
    let ids: Vec<i64> = rows.iter().map(|r| r.category_id).collect();
    let mut categories: HashMap<i64, Category> = CategoryRepo::find_by_ids(conn, &ids)
        .await?
        .into_iter()
        .map(|c| (c.id, Category::from(c)))
        .collect();
    Ok(rows
        .into_iter()
        .filter_map(|r| {
            categories.remove(&r.category_id).map(|category| InterestCategory {
                category,
                priority: r.priority,
            })
        })
        .collect())
}
