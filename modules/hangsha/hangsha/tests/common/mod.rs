#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hangsha::infra::storage::entity::{category, category_group, enroll, enroll_time_slot};
use hangsha::{Migrator, Service, ServiceConfig};
use hangsha_sdk::{DayOfWeek, NewCustomEnroll, TimeSlotDraft};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectOptions, Database, DatabaseConnection,
    EntityTrait, QueryFilter,
};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;

pub const STATUS_GROUP: &str = "모집현황";
pub const TYPE_GROUP: &str = "프로그램 유형";

pub struct TestCtx {
    pub db: DatabaseConnection,
    pub svc: Arc<Service>,
}

/// Fresh in-memory database with migrations applied.
pub async fn setup() -> TestCtx {
    setup_with(ServiceConfig::default()).await
}

pub async fn setup_with(config: ServiceConfig) -> TestCtx {
    // One connection: every pooled connection would otherwise open its own in-memory database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("migrate");
    let svc = Arc::new(Service::new(db.clone(), config));
    TestCtx { db, svc }
}

pub async fn register(ctx: &TestCtx, email: &str) -> i64 {
    ctx.svc
        .register_user(email, None)
        .await
        .expect("register user")
        .id
}

async fn group_id(db: &DatabaseConnection, name: &str) -> i64 {
    category_group::Entity::find()
        .filter(category_group::Column::Name.eq(name))
        .one(db)
        .await
        .expect("query group")
        .expect("seeded group")
        .id
}

/// Insert a category into one of the seeded groups and return its id.
pub async fn add_category(ctx: &TestCtx, group: &str, name: &str, sort_order: i32) -> i64 {
    let group_id = group_id(&ctx.db, group).await;
    category::ActiveModel {
        id: ActiveValue::NotSet,
        group_id: ActiveValue::Set(group_id),
        name: ActiveValue::Set(name.to_owned()),
        sort_order: ActiveValue::Set(sort_order),
    }
    .insert(&ctx.db)
    .await
    .expect("insert category")
    .id
}

pub fn draft(day: DayOfWeek, start: &str, end: &str) -> TimeSlotDraft {
    TimeSlotDraft {
        day_of_week: day,
        start_at: start.to_owned(),
        end_at: end.to_owned(),
    }
}

pub fn custom_enroll(title: &str, slots: Vec<TimeSlotDraft>) -> NewCustomEnroll {
    NewCustomEnroll {
        course_title: title.to_owned(),
        course_number: None,
        lecture_number: None,
        credit: None,
        instructor: None,
        time_slots: slots,
    }
}

/// Insert a CRAWLED enroll directly; the service only creates custom ones.
pub async fn add_crawled_enroll(
    ctx: &TestCtx,
    timetable_id: i64,
    title: &str,
    day: DayOfWeek,
    start_minute: i32,
    end_minute: i32,
) -> i64 {
    let now = OffsetDateTime::now_utc();
    let row = enroll::ActiveModel {
        id: ActiveValue::NotSet,
        timetable_id: ActiveValue::Set(timetable_id),
        source: ActiveValue::Set("CRAWLED".to_owned()),
        course_title: ActiveValue::Set(title.to_owned()),
        course_number: ActiveValue::Set(Some("L0440.000600".to_owned())),
        lecture_number: ActiveValue::Set(Some("001".to_owned())),
        credit: ActiveValue::Set(Some(3)),
        instructor: ActiveValue::Set(None),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
    }
    .insert(&ctx.db)
    .await
    .expect("insert crawled enroll");
    enroll_time_slot::ActiveModel {
        id: ActiveValue::NotSet,
        enroll_id: ActiveValue::Set(row.id),
        day_of_week: ActiveValue::Set(day.as_str().to_owned()),
        start_minute: ActiveValue::Set(start_minute),
        end_minute: ActiveValue::Set(end_minute),
    }
    .insert(&ctx.db)
    .await
    .expect("insert crawled slot");
    row.id
}

pub fn router(ctx: &TestCtx) -> Router {
    hangsha::router(ctx.svc.clone())
}

/// Send one request through the router and decode the JSON body (Null when empty).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header("x-user-id", id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}
