//! Repository for `timetables`, `enrolls` and `enroll_time_slots`.

use std::collections::HashMap;

use anyhow::Context;
use hangsha_sdk::TimeSlot;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::entity::{enroll, enroll_time_slot, timetable};
use super::mapper::{new_slot_active_model, slot_from_model};

pub struct TimetableRepo;

impl TimetableRepo {
    #[instrument(skip(conn), fields(db.operation = "timetables.find"))]
    pub async fn find<C: ConnectionTrait>(
        conn: &C,
        id: i64,
    ) -> anyhow::Result<Option<timetable::Model>> {
        timetable::Entity::find_by_id(id)
            .one(conn)
            .await
            .context("failed to load timetable")
    }

    #[instrument(skip(conn), fields(db.operation = "timetables.list_for_user"))]
    pub async fn list_for_user<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
    ) -> anyhow::Result<Vec<timetable::Model>> {
        timetable::Entity::find()
            .filter(timetable::Column::UserId.eq(user_id))
            .order_by_asc(timetable::Column::Id)
            .all(conn)
            .await
            .context("failed to list timetables")
    }

    #[instrument(skip(conn, name), fields(db.operation = "timetables.insert"))]
    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        user_id: i64,
        name: String,
    ) -> anyhow::Result<timetable::Model> {
        timetable::ActiveModel {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(user_id),
            name: ActiveValue::Set(name),
            created_at: ActiveValue::Set(OffsetDateTime::now_utc()),
        }
        .insert(conn)
        .await
        .context("failed to insert timetable")
    }

    #[instrument(skip(conn), fields(db.operation = "timetables.delete"))]
    pub async fn delete<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<u64> {
        let res = timetable::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .context("failed to delete timetable")?;
        Ok(res.rows_affected)
    }
}

pub struct EnrollRepo;

impl EnrollRepo {
    #[instrument(skip(conn), fields(db.operation = "enrolls.find"))]
    pub async fn find<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<Option<enroll::Model>> {
        enroll::Entity::find_by_id(id)
            .one(conn)
            .await
            .context("failed to load enroll")
    }

    #[instrument(skip(conn), fields(db.operation = "enrolls.list_for_timetable"))]
    pub async fn list_for_timetable<C: ConnectionTrait>(
        conn: &C,
        timetable_id: i64,
    ) -> anyhow::Result<Vec<enroll::Model>> {
        enroll::Entity::find()
            .filter(enroll::Column::TimetableId.eq(timetable_id))
            .order_by_asc(enroll::Column::Id)
            .all(conn)
            .await
            .context("failed to list enrolls")
    }

    #[instrument(skip(conn, model), fields(db.operation = "enrolls.insert"))]
    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        model: enroll::ActiveModel,
    ) -> anyhow::Result<enroll::Model> {
        model.insert(conn).await.context("failed to insert enroll")
    }

    #[instrument(skip(conn, model), fields(db.operation = "enrolls.update"))]
    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        model: enroll::ActiveModel,
    ) -> anyhow::Result<enroll::Model> {
        model.update(conn).await.context("failed to update enroll")
    }

    #[instrument(skip(conn), fields(db.operation = "enrolls.delete"))]
    pub async fn delete<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<u64> {
        let res = enroll::Entity::delete_by_id(id)
            .exec(conn)
            .await
            .context("failed to delete enroll")?;
        Ok(res.rows_affected)
    }

    #[instrument(skip(conn), fields(db.operation = "enroll_time_slots.for_enroll"))]
    pub async fn slots_for_enroll<C: ConnectionTrait>(
        conn: &C,
        enroll_id: i64,
    ) -> anyhow::Result<Vec<enroll_time_slot::Model>> {
        enroll_time_slot::Entity::find()
            .filter(enroll_time_slot::Column::EnrollId.eq(enroll_id))
            .order_by_asc(enroll_time_slot::Column::Id)
            .all(conn)
            .await
            .context("failed to load time slots")
    }

    #[instrument(skip(conn, enroll_ids), fields(db.operation = "enroll_time_slots.for_enrolls"))]
    pub async fn slots_for_enrolls<C: ConnectionTrait>(
        conn: &C,
        enroll_ids: &[i64],
    ) -> anyhow::Result<HashMap<i64, Vec<enroll_time_slot::Model>>> {
        if enroll_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = enroll_time_slot::Entity::find()
            .filter(enroll_time_slot::Column::EnrollId.is_in(enroll_ids.iter().copied()))
            .order_by_asc(enroll_time_slot::Column::Id)
            .all(conn)
            .await
            .context("failed to load time slots")?;
        let mut by_enroll: HashMap<i64, Vec<_>> = HashMap::new();
        for row in rows {
            by_enroll.entry(row.enroll_id).or_default().push(row);
        }
        Ok(by_enroll)
    }

    /// Slots of every enroll in `timetable_id` except `exclude`, paired with their enroll id.
    #[instrument(skip(conn), fields(db.operation = "enroll_time_slots.in_timetable"))]
    pub async fn slots_in_timetable<C: ConnectionTrait>(
        conn: &C,
        timetable_id: i64,
        exclude: Option<i64>,
    ) -> anyhow::Result<Vec<(i64, TimeSlot)>> {
        let mut query = enroll::Entity::find()
            .select_only()
            .column(enroll::Column::Id)
            .filter(enroll::Column::TimetableId.eq(timetable_id));
        if let Some(id) = exclude {
            query = query.filter(enroll::Column::Id.ne(id));
        }
        let enroll_ids: Vec<i64> = query
            .into_tuple()
            .all(conn)
            .await
            .context("failed to list timetable enrolls")?;

        let mut slots = Vec::new();
        for (enroll_id, rows) in Self::slots_for_enrolls(conn, &enroll_ids).await? {
            for row in &rows {
                slots.push((enroll_id, slot_from_model(row)?));
            }
        }
        slots.sort_by_key(|(id, slot)| (*id, *slot));
        Ok(slots)
    }

    #[instrument(skip(conn, ids), fields(db.operation = "enroll_time_slots.delete", count = ids.len()))]
    pub async fn delete_slots<C: ConnectionTrait>(conn: &C, ids: &[i64]) -> anyhow::Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let res = enroll_time_slot::Entity::delete_many()
            .filter(enroll_time_slot::Column::Id.is_in(ids.iter().copied()))
            .exec(conn)
            .await
            .context("failed to delete time slots")?;
        Ok(res.rows_affected)
    }

    #[instrument(skip(conn, slots), fields(db.operation = "enroll_time_slots.insert", count = slots.len()))]
    pub async fn insert_slots<C: ConnectionTrait>(
        conn: &C,
        enroll_id: i64,
        slots: &[TimeSlot],
    ) -> anyhow::Result<()> {
        if slots.is_empty() {
            return Ok(());
        }
        enroll_time_slot::Entity::insert_many(
            slots.iter().map(|s| new_slot_active_model(enroll_id, s)),
        )
        .exec_without_returning(conn)
        .await
        .context("failed to insert time slots")?;
        Ok(())
    }
}
