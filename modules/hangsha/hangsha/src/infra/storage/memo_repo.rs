//! Repository for `memos`, `tags` and the `memo_tags` link table.

use std::collections::HashMap;

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::entity::{memo, memo_tag, tag};

pub struct MemoRepo;

impl MemoRepo {
    #[instrument(skip(conn), fields(db.operation = "memos.find"))]
    pub async fn find<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<Option<memo::Model>> {
        memo::Entity::find_by_id(id)
            .one(conn)
            .await
            .context("failed to load memo")
    }

    #[instrument(skip(conn), fields(db.operation = "memos.list_for_user"))]
    pub async fn list_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
    ) -> anyhow::Result<Vec<memo::Model>> {
        memo::Entity::find()
            .filter(memo::Column::UserId.eq(user_id))
            .order_by_desc(memo::Column::CreatedAt)
            .order_by_desc(memo::Column::Id)
            .all(conn)
            .await
            .context("failed to list memos")
    }

    #[instrument(skip(conn), fields(db.operation = "memos.list_by_tag"))]
    pub async fn list_by_tag<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        tag_id: i64,
    ) -> anyhow::Result<Vec<memo::Model>> {
        let memo_ids: Vec<i64> = memo_tag::Entity::find()
            .filter(memo_tag::Column::TagId.eq(tag_id))
            .all(conn)
            .await?
            .into_iter()
            .map(|link| link.memo_id)
            .collect();
        if memo_ids.is_empty() {
            return Ok(Vec::new());
        }
        memo::Entity::find()
            .filter(memo::Column::UserId.eq(user_id))
            .filter(memo::Column::Id.is_in(memo_ids))
            .order_by_desc(memo::Column::CreatedAt)
            .order_by_desc(memo::Column::Id)
            .all(conn)
            .await
            .context("failed to list memos by tag")
    }

    #[instrument(skip(conn, content), fields(db.operation = "memos.insert"))]
    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        content: String,
    ) -> anyhow::Result<memo::Model> {
        let now = OffsetDateTime::now_utc();
        memo::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            content: ActiveValue::Set(content),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(conn)
        .await
        .context("failed to insert memo")
    }

    #[instrument(skip(conn, model), fields(db.operation = "memos.update"))]
    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        model: memo::ActiveModel,
    ) -> anyhow::Result<memo::Model> {
        model.update(conn).await.context("failed to update memo")
    }

    #[instrument(skip(conn), fields(db.operation = "memos.delete"))]
    pub async fn delete<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<u64> {
        let res = memo::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .context("failed to delete memo")?;
        Ok(res.rows_affected)
    }

    /// Tags attached to one memo, ordered by name.
    #[instrument(skip(conn), fields(db.operation = "memo_tags.tags_for_memo"))]
    pub async fn tags_for_memo<C: ConnectionTrait>(
        conn: &C,
        memo_id: i64,
    ) -> anyhow::Result<Vec<tag::Model>> {
        Ok(Self::tags_for_memos(conn, &[memo_id])
            .await?
            .remove(&memo_id)
            .unwrap_or_default())
    }

    #[instrument(skip(conn, memo_ids), fields(db.operation = "memo_tags.tags_for_memos"))]
    pub async fn tags_for_memos<C: ConnectionTrait>(
        conn: &C,
        memo_ids: &[i64],
    ) -> anyhow::Result<HashMap<i64, Vec<tag::Model>>> {
        if memo_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let links = memo_tag::Entity::find()
            .filter(memo_tag::Column::MemoId.is_in(memo_ids.iter().copied()))
            .all(conn)
            .await
            .context("failed to load memo tag links")?;
        let tag_ids: Vec<i64> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<i64, tag::Model> = TagRepo::find_by_ids(conn, &tag_ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();

        let mut by_memo: HashMap<i64, Vec<tag::Model>> = HashMap::new();
        for link in links {
            if let Some(t) = tags.get(&link.tag_id) {
                by_memo.entry(link.memo_id).or_default().push(t.clone());
            }
        }
        for list in by_memo.values_mut() {
            list.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(by_memo)
    }

    #[instrument(skip(conn, tag_ids), fields(db.operation = "memo_tags.link", count = tag_ids.len()))]
    pub async fn link_tags<C: ConnectionTrait>(
        conn: &C,
        memo_id: i64,
        tag_ids: &[i64],
    ) -> anyhow::Result<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let rows = tag_ids.iter().map(|&tag_id| memo_tag::ActiveModel {
            memo_id: ActiveValue::Set(memo_id),
            tag_id: ActiveValue::Set(tag_id),
        });
        memo_tag::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await
            .context("failed to link tags")?;
        Ok(())
    }

    #[instrument(skip(conn, tag_ids), fields(db.operation = "memo_tags.unlink", count = tag_ids.len()))]
    pub async fn unlink_tags<C: ConnectionTrait>(
        conn: &C,
        memo_id: i64,
        tag_ids: &[i64],
    ) -> anyhow::Result<u64> {
        if tag_ids.is_empty() {
            return Ok(0);
        }
        let res = memo_tag::Entity::delete_many()
            .filter(memo_tag::Column::MemoId.eq(memo_id))
            .filter(memo_tag::Column::TagId.is_in(tag_ids.iter().copied()))
            .exec(conn)
            .await
            .context("failed to unlink tags")?;
        Ok(res.rows_affected)
    }
}

pub struct TagRepo;

impl TagRepo {
    #[instrument(skip(conn), fields(db.operation = "tags.find"))]
    pub async fn find<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<Option<tag::Model>> {
        tag::Entity::find_by_id(id)
            .one(conn)
            .await
            .context("failed to load tag")
    }

    #[instrument(skip(conn, ids), fields(db.operation = "tags.find_by_ids"))]
    pub async fn find_by_ids<C: ConnectionTrait>(
        conn: &C,
        ids: &[i64],
    ) -> anyhow::Result<Vec<tag::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids.iter().copied()))
            .all(conn)
            .await
            .context("failed to load tags")
    }

    #[instrument(skip(conn), fields(db.operation = "tags.list_for_user"))]
    pub async fn list_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
    ) -> anyhow::Result<Vec<tag::Model>> {
        tag::Entity::find()
            .filter(tag::Column::UserId.eq(user_id))
            .order_by_asc(tag::Column::Name)
            .all(conn)
            .await
            .context("failed to list tags")
    }

    #[instrument(skip(conn, names), fields(db.operation = "tags.find_by_names"))]
    pub async fn find_by_names<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        names: &[String],
    ) -> anyhow::Result<Vec<tag::Model>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        tag::Entity::find()
            .filter(tag::Column::UserId.eq(user_id))
            .filter(tag::Column::Name.is_in(names.iter().cloned()))
            .all(conn)
            .await
            .context("failed to load tags by name")
    }

    #[instrument(skip(conn), fields(db.operation = "tags.insert"))]
    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        name: &str,
    ) -> anyhow::Result<tag::Model> {
        tag::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name.to_owned()),
            created_at: ActiveValue::Set(OffsetDateTime::now_utc()),
        }
        .insert(conn)
        .await
        .context("failed to insert tag")
    }

    #[instrument(skip(conn), fields(db.operation = "tags.delete"))]
    pub async fn delete<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        id: i64,
    ) -> anyhow::Result<u64> {
        let res = tag::Entity::delete_many()
            .filter(tag::Column::Id.eq(id))
            .filter(tag::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .context("failed to delete tag")?;
        Ok(res.rows_affected)
    }
}
