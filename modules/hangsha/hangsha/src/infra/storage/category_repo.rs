//! Repository for `category_groups` and `categories`.

use anyhow::Context;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;

use super::entity::{category, category_group};

pub struct CategoryRepo;

impl CategoryRepo {
    #[instrument(skip(conn), fields(db.operation = "category_groups.list"))]
    pub async fn list_groups<C: ConnectionTrait>(
        conn: &C,
    ) -> anyhow::Result<Vec<category_group::Model>> {
        category_group::Entity::find()
            .order_by_asc(category_group::Column::SortOrder)
            .order_by_asc(category_group::Column::Id)
            .all(conn)
            .await
            .context("failed to list category groups")
    }

    #[instrument(skip(conn), fields(db.operation = "categories.list"))]
    pub async fn list<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<category::Model>> {
        category::Entity::find()
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Id)
            .all(conn)
            .await
            .context("failed to list categories")
    }

    #[instrument(skip(conn, ids), fields(db.operation = "categories.find_by_ids", count = ids.len()))]
    pub async fn find_by_ids<C: ConnectionTrait>(
        conn: &C,
        ids: &[i64],
    ) -> anyhow::Result<Vec<category::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        category::Entity::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await
            .context("failed to load categories")
    }

    #[instrument(skip(conn), fields(db.operation = "category_groups.find_by_name"))]
    pub async fn find_group_by_name<C: ConnectionTrait>(
        conn: &C,
        name: &str,
    ) -> anyhow::Result<Option<category_group::Model>> {
        category_group::Entity::find()
            .filter(category_group::Column::Name.eq(name))
            .one(conn)
            .await
            .context("failed to load category group")
    }

    /// Categories of one group keyed by name.
    #[instrument(skip(conn), fields(db.operation = "categories.list_in_group"))]
    pub async fn list_in_group<C: ConnectionTrait>(
        conn: &C,
        group_id: i64,
    ) -> anyhow::Result<Vec<category::Model>> {
        category::Entity::find()
            .filter(category::Column::GroupId.eq(group_id))
            .all(conn)
            .await
            .context("failed to list group categories")
    }
}
