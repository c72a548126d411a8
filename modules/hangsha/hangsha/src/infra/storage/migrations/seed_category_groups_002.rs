//! Seeds the category groups the event importer resolves against.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const GROUPS: [(&str, i32); 2] = [("모집현황", 1), ("프로그램 유형", 2)];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(CategoryGroups::Table)
            .columns([CategoryGroups::Name, CategoryGroups::SortOrder]);
        for (name, sort_order) in GROUPS {
            insert
                .values([name.into(), sort_order.into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        insert.on_conflict(
            OnConflict::column(CategoryGroups::Name)
                .do_nothing()
                .to_owned(),
        );
        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(CategoryGroups::Table)
                    .and_where(Expr::col(CategoryGroups::Name).is_in(GROUPS.map(|(name, _)| name)))
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum CategoryGroups {
    Table,
    Name,
    SortOrder,
}
