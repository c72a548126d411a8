//! Initial schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn created_at<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

async fn drop_table<T: Iden + 'static>(manager: &SchemaManager<'_>, table: T) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(table).if_exists().to_owned())
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Username).string())
                    .col(ColumnDef::new(Users::ProfileImageUrl).text())
                    .col(created_at(Users::CreatedAt))
                    .col(created_at(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CategoryGroups::Table)
                    .if_not_exists()
                    .col(id_col(CategoryGroups::Id))
                    .col(
                        ColumnDef::new(CategoryGroups::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CategoryGroups::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(id_col(Categories::Id))
                    .col(ColumnDef::new(Categories::GroupId).big_integer().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(
                        ColumnDef::new(Categories::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Categories::Table, Categories::GroupId)
                            .to(CategoryGroups::Table, CategoryGroups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_categories_group_name")
                    .table(Categories::Table)
                    .col(Categories::GroupId)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Memos and their tags
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(id_col(Tags::Id))
                    .col(ColumnDef::new(Tags::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Tags::Name).string().not_null())
                    .col(created_at(Tags::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tags::Table, Tags::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_tags_user_name")
                    .table(Tags::Table)
                    .col(Tags::UserId)
                    .col(Tags::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Memos::Table)
                    .if_not_exists()
                    .col(id_col(Memos::Id))
                    .col(ColumnDef::new(Memos::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Memos::Content).text().not_null())
                    .col(created_at(Memos::CreatedAt))
                    .col(created_at(Memos::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Memos::Table, Memos::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MemoTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MemoTags::MemoId).big_integer().not_null())
                    .col(ColumnDef::new(MemoTags::TagId).big_integer().not_null())
                    .primary_key(Index::create().col(MemoTags::MemoId).col(MemoTags::TagId))
                    .foreign_key(
                        ForeignKey::create()
                            .from(MemoTags::Table, MemoTags::MemoId)
                            .to(Memos::Table, Memos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MemoTags::Table, MemoTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Timetables
        manager
            .create_table(
                Table::create()
                    .table(Timetables::Table)
                    .if_not_exists()
                    .col(id_col(Timetables::Id))
                    .col(ColumnDef::new(Timetables::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Timetables::Name).string().not_null())
                    .col(created_at(Timetables::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Timetables::Table, Timetables::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrolls::Table)
                    .if_not_exists()
                    .col(id_col(Enrolls::Id))
                    .col(ColumnDef::new(Enrolls::TimetableId).big_integer().not_null())
                    .col(ColumnDef::new(Enrolls::Source).string_len(16).not_null())
                    .col(ColumnDef::new(Enrolls::CourseTitle).string().not_null())
                    .col(ColumnDef::new(Enrolls::CourseNumber).string())
                    .col(ColumnDef::new(Enrolls::LectureNumber).string())
                    .col(ColumnDef::new(Enrolls::Credit).integer())
                    .col(ColumnDef::new(Enrolls::Instructor).string())
                    .col(created_at(Enrolls::CreatedAt))
                    .col(created_at(Enrolls::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrolls::Table, Enrolls::TimetableId)
                            .to(Timetables::Table, Timetables::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EnrollTimeSlots::Table)
                    .if_not_exists()
                    .col(id_col(EnrollTimeSlots::Id))
                    .col(
                        ColumnDef::new(EnrollTimeSlots::EnrollId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollTimeSlots::DayOfWeek)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollTimeSlots::StartMinute)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EnrollTimeSlots::EndMinute)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EnrollTimeSlots::Table, EnrollTimeSlots::EnrollId)
                            .to(Enrolls::Table, Enrolls::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enroll_time_slots_enroll")
                    .table(EnrollTimeSlots::Table)
                    .col(EnrollTimeSlots::EnrollId)
                    .to_owned(),
            )
            .await?;

        // Preferences
        manager
            .create_table(
                Table::create()
                    .table(UserInterestCategories::Table)
                    .if_not_exists()
                    .col(id_col(UserInterestCategories::Id))
                    .col(
                        ColumnDef::new(UserInterestCategories::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserInterestCategories::CategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserInterestCategories::Priority)
                            .integer()
                            .not_null(),
                    )
                    .col(created_at(UserInterestCategories::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                UserInterestCategories::Table,
                                UserInterestCategories::UserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                UserInterestCategories::Table,
                                UserInterestCategories::CategoryId,
                            )
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_user_interest_categories_category")
                    .table(UserInterestCategories::Table)
                    .col(UserInterestCategories::UserId)
                    .col(UserInterestCategories::CategoryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_user_interest_categories_priority")
                    .table(UserInterestCategories::Table)
                    .col(UserInterestCategories::UserId)
                    .col(UserInterestCategories::Priority)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserExcludedKeywords::Table)
                    .if_not_exists()
                    .col(id_col(UserExcludedKeywords::Id))
                    .col(
                        ColumnDef::new(UserExcludedKeywords::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserExcludedKeywords::Keyword)
                            .string()
                            .not_null(),
                    )
                    .col(created_at(UserExcludedKeywords::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(UserExcludedKeywords::Table, UserExcludedKeywords::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_user_excluded_keywords_keyword")
                    .table(UserExcludedKeywords::Table)
                    .col(UserExcludedKeywords::UserId)
                    .col(UserExcludedKeywords::Keyword)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Events
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(id_col(Events::Id))
                    .col(ColumnDef::new(Events::Title).text().not_null())
                    .col(ColumnDef::new(Events::ImageUrl).text())
                    .col(ColumnDef::new(Events::OperationMode).string())
                    .col(ColumnDef::new(Events::StatusId).big_integer())
                    .col(ColumnDef::new(Events::EventTypeId).big_integer())
                    .col(ColumnDef::new(Events::Organization).string())
                    .col(ColumnDef::new(Events::Location).text())
                    .col(ColumnDef::new(Events::ApplyStart).date_time())
                    .col(ColumnDef::new(Events::ApplyEnd).date_time())
                    .col(ColumnDef::new(Events::EventStart).date_time())
                    .col(ColumnDef::new(Events::EventEnd).date_time())
                    .col(
                        ColumnDef::new(Events::Capacity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Events::ApplyCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Events::ApplyLink)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(created_at(Events::CreatedAt))
                    .col(created_at(Events::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .from(Events::Table, Events::StatusId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Events::Table, Events::EventTypeId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table(manager, Events::Table).await?;
        drop_table(manager, UserExcludedKeywords::Table).await?;
        drop_table(manager, UserInterestCategories::Table).await?;
        drop_table(manager, EnrollTimeSlots::Table).await?;
        drop_table(manager, Enrolls::Table).await?;
        drop_table(manager, Timetables::Table).await?;
        drop_table(manager, MemoTags::Table).await?;
        drop_table(manager, Memos::Table).await?;
        drop_table(manager, Tags::Table).await?;
        drop_table(manager, Categories::Table).await?;
        drop_table(manager, CategoryGroups::Table).await?;
        drop_table(manager, Users::Table).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    ProfileImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CategoryGroups {
    Table,
    Id,
    Name,
    SortOrder,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    GroupId,
    Name,
    SortOrder,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    UserId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Memos {
    Table,
    Id,
    UserId,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum MemoTags {
    Table,
    MemoId,
    TagId,
}

#[derive(DeriveIden)]
enum Timetables {
    Table,
    Id,
    UserId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Enrolls {
    Table,
    Id,
    TimetableId,
    Source,
    CourseTitle,
    CourseNumber,
    LectureNumber,
    Credit,
    Instructor,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EnrollTimeSlots {
    Table,
    Id,
    EnrollId,
    DayOfWeek,
    StartMinute,
    EndMinute,
}

#[derive(DeriveIden)]
enum UserInterestCategories {
    Table,
    Id,
    UserId,
    CategoryId,
    Priority,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UserExcludedKeywords {
    Table,
    Id,
    UserId,
    Keyword,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Title,
    ImageUrl,
    OperationMode,
    StatusId,
    EventTypeId,
    Organization,
    Location,
    ApplyStart,
    ApplyEnd,
    EventStart,
    EventEnd,
    Capacity,
    ApplyCount,
    ApplyLink,
    CreatedAt,
    UpdatedAt,
}
