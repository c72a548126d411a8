//! Repository for `user_interest_categories` and `user_excluded_keywords`.

use anyhow::Context;
use hangsha_sdk::InterestCategoryAssignment;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::entity::{user_excluded_keyword, user_interest_category};

pub struct InterestCategoryRepo;

impl InterestCategoryRepo {
    #[instrument(skip(conn), fields(db.operation = "user_interest_categories.list"))]
    pub async fn list_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
    ) -> anyhow::Result<Vec<user_interest_category::Model>> {
        user_interest_category::Entity::find()
            .filter(user_interest_category::Column::UserId.eq(user_id))
            .order_by_asc(user_interest_category::Column::Priority)
            .all(conn)
            .await
            .context("failed to list interest categories")
    }

    #[instrument(skip(conn, ids), fields(db.operation = "user_interest_categories.delete", count = ids.len()))]
    pub async fn delete_by_ids<C: ConnectionTrait>(conn: &C, ids: &[i64]) -> anyhow::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let res = user_interest_category::Entity::delete_many()
            .filter(user_interest_category::Column::Id.is_in(ids.iter().copied()))
            .exec(conn)
            .await
            .context("failed to delete interest categories")?;
        Ok(res.rows_affected)
    }

    #[instrument(skip(conn), fields(db.operation = "user_interest_categories.delete_one"))]
    pub async fn delete_for_category<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        category_id: i64,
    ) -> anyhow::Result<u64> {
        let res = user_interest_category::Entity::delete_many()
            .filter(user_interest_category::Column::UserId.eq(user_id))
            .filter(user_interest_category::Column::CategoryId.eq(category_id))
            .exec(conn)
            .await
            .context("failed to delete interest category")?;
        Ok(res.rows_affected)
    }

    #[instrument(skip(conn, items), fields(db.operation = "user_interest_categories.insert", count = items.len()))]
    pub async fn insert_many<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        items: &[InterestCategoryAssignment],
    ) -> anyhow::Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let now = OffsetDateTime::now_utc();
        let rows = items.iter().map(|item| user_interest_category::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            category_id: ActiveValue::Set(item.category_id),
            priority: ActiveValue::Set(item.priority),
            created_at: ActiveValue::Set(now),
        });
        user_interest_category::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .context("failed to insert interest categories")?;
        Ok(())
    }
}

pub struct ExcludedKeywordRepo;

impl ExcludedKeywordRepo {
    #[instrument(skip(conn), fields(db.operation = "user_excluded_keywords.list"))]
    pub async fn list_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
    ) -> anyhow::Result<Vec<user_excluded_keyword::Model>> {
        user_excluded_keyword::Entity::find()
            .filter(user_excluded_keyword::Column::UserId.eq(user_id))
            .order_by_desc(user_excluded_keyword::Column::CreatedAt)
            .order_by_desc(user_excluded_keyword::Column::Id)
            .all(conn)
            .await
            .context("failed to list excluded keywords")
    }

    #[instrument(skip(conn), fields(db.operation = "user_excluded_keywords.find"))]
    pub async fn find<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        keyword: &str,
    ) -> anyhow::Result<Option<user_excluded_keyword::Model>> {
        user_excluded_keyword::Entity::find()
            .filter(user_excluded_keyword::Column::UserId.eq(user_id))
            .filter(user_excluded_keyword::Column::Keyword.eq(keyword))
            .one(conn)
            .await
            .context("failed to load excluded keyword")
    }

    #[instrument(skip(conn), fields(db.operation = "user_excluded_keywords.count"))]
    pub async fn count<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        keyword: &str,
    ) -> anyhow::Result<u64> {
        user_excluded_keyword::Entity::find()
            .filter(user_excluded_keyword::Column::UserId.eq(user_id))
            .filter(user_excluded_keyword::Column::Keyword.eq(keyword))
            .count(conn)
            .await
            .context("failed to count excluded keywords")
    }

    /// Raw insert. The `DbErr` is returned untouched so callers can inspect
    /// unique-constraint violations.
    #[instrument(skip(conn), fields(db.operation = "user_excluded_keywords.insert"))]
    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        keyword: &str,
    ) -> Result<user_excluded_keyword::Model, DbErr> {
        user_excluded_keyword::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            keyword: ActiveValue::Set(keyword.to_owned()),
            created_at: ActiveValue::Set(OffsetDateTime::now_utc()),
        }
        .insert(conn)
        .await
    }

    #[instrument(skip(conn), fields(db.operation = "user_excluded_keywords.delete"))]
    pub async fn delete<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        id: i64,
    ) -> anyhow::Result<u64> {
        let res = user_excluded_keyword::Entity::delete_many()
            .filter(user_excluded_keyword::Column::Id.eq(id))
            .filter(user_excluded_keyword::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .context("failed to delete excluded keyword")?;
        Ok(res.rows_affected)
    }
}
