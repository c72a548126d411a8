//! Repository for `users`.

use anyhow::Context;
use sea_orm::{
    sea_query::OnConflict, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::entity::user;

pub struct UserRepo;

impl UserRepo {
    #[instrument(skip(conn), fields(db.operation = "users.find"))]
    pub async fn find<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<Option<user::Model>> {
        user::Entity::find_by_id(id)
            .one(conn)
            .await
            .context("failed to load user")
    }

    #[instrument(skip(conn), fields(db.operation = "users.exists"))]
    pub async fn exists<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<bool> {
        Ok(Self::find(conn, id).await?.is_some())
    }

    /// Insert a user by e-mail or return the existing one unchanged.
    #[instrument(skip(conn, username), fields(db.operation = "users.upsert_by_email"))]
    pub async fn upsert_by_email<C: ConnectionTrait>(
        conn: &C,
        email: &str,
        username: Option<String>,
    ) -> anyhow::Result<user::Model> {
        let now = OffsetDateTime::now_utc();
        let model = user::ActiveModel {
            id: ActiveValue::NotSet,
            email: ActiveValue::Set(email.to_owned()),
            username: ActiveValue::Set(username),
            profile_image_url: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };
        user::Entity::insert(model)
            .on_conflict(
                OnConflict::column(user::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .context("failed to insert user")?;

        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user should exist after upsert"))
    }

    #[instrument(skip(conn, model), fields(db.operation = "users.update"))]
    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        model: user::ActiveModel,
    ) -> anyhow::Result<user::Model> {
        model.update(conn).await.context("failed to update user")
    }
}
