//! Repository for `events`.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::instrument;

use super::entity::event;

pub struct EventRepo;

impl EventRepo {
    #[instrument(skip(conn), fields(db.operation = "events.find"))]
    pub async fn find<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<Option<event::Model>> {
        event::Entity::find_by_id(id)
            .one(conn)
            .await
            .context("failed to load event")
    }

    #[instrument(skip(conn), fields(db.operation = "events.find_by_apply_link"))]
    pub async fn find_by_apply_link<C: ConnectionTrait>(
        conn: &C,
        apply_link: &str,
    ) -> anyhow::Result<Option<event::Model>> {
        event::Entity::find()
            .filter(event::Column::ApplyLink.eq(apply_link))
            .one(conn)
            .await
            .context("failed to load event by apply link")
    }

    #[instrument(skip(conn), fields(db.operation = "events.list"))]
    pub async fn list<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<event::Model>> {
        event::Entity::find()
            .order_by_asc(event::Column::EventStart)
            .order_by_asc(event::Column::Id)
            .all(conn)
            .await
            .context("failed to list events")
    }

    /// Insert when `id` is unset, otherwise update the row carrying that id.
    /// A loaded id arrives as `Unchanged`, which still means update.
    #[instrument(skip(conn, model), fields(db.operation = "events.save"))]
    pub async fn save<C: ConnectionTrait>(
        conn: &C,
        model: event::ActiveModel,
    ) -> anyhow::Result<event::Model> {
        if model.id.is_not_set() {
            model.insert(conn).await.context("failed to insert event")
        } else {
            model.update(conn).await.context("failed to update event")
        }
    }
}
