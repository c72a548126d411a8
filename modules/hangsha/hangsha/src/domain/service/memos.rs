use std::collections::HashMap;

use hangsha_sdk::{FieldPatch, Memo, MemoPatch, NewMemo, Tag};
use sea_orm::{ActiveValue, ConnectionTrait, TransactionTrait};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};

use super::{check_length, Service};
use crate::domain::error::DomainError;
use crate::domain::fields::{MemoFields, MEMO_SCHEMA};
use crate::domain::sync::CollectionSynchronizer;
use crate::infra::storage::entity::{memo, tag};
use crate::infra::storage::mapper::memo_with_tags;
use crate::infra::storage::memo_repo::{MemoRepo, TagRepo};

impl Service {
    #[instrument(skip(self, new))]
    pub async fn create_memo(&self, user_id: i64, new: NewMemo) -> Result<Memo, DomainError> {
        check_length(MemoFields::CONTENT, &new.content, self.config.max_memo_length)?;
        let names = CollectionSynchronizer::normalize_tag_names(
            MemoFields::TAG_NAMES,
            new.tag_names,
            self.config.max_tag_name_length,
        )?;

        let txn = self.db.begin().await?;
        let memo = MemoRepo::insert(&txn, user_id, new.content).await?;
        let tags = resolve_tags(&txn, user_id, &names).await?;
        let tag_ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
        MemoRepo::link_tags(&txn, memo.id, &tag_ids).await?;
        let tags = MemoRepo::tags_for_memo(&txn, memo.id).await?;
        txn.commit().await?;

        info!(memo_id = memo.id, tags = tags.len(), "memo created");
        Ok(memo_with_tags(memo, tags))
    }

    pub async fn list_memos(&self, user_id: i64) -> Result<Vec<Memo>, DomainError> {
        let memos = MemoRepo::list_for_user(&self.db, user_id).await?;
        attach_tags(&self.db, memos).await
    }

    pub async fn list_memos_by_tag(
        &self,
        user_id: i64,
        tag_id: i64,
    ) -> Result<Vec<Memo>, DomainError> {
        load_owned_tag(&self.db, user_id, tag_id).await?;
        let memos = MemoRepo::list_by_tag(&self.db, user_id, tag_id).await?;
        attach_tags(&self.db, memos).await
    }

    /// Apply a memo patch.
    ///
    /// `content: Null` stores an empty body. `tag_names` replaces the memo's
    /// tag set, creating unknown tags for the user; `Null` detaches all tags.
    #[instrument(skip(self, patch))]
    pub async fn patch_memo(
        &self,
        user_id: i64,
        memo_id: i64,
        patch: MemoPatch,
    ) -> Result<Memo, DomainError> {
        if patch.content.is_absent() && patch.tag_names.is_absent() {
            return Err(DomainError::empty_patch(&MEMO_SCHEMA.field_names()));
        }
        if let FieldPatch::Value(content) = &patch.content {
            check_length(MemoFields::CONTENT, content, self.config.max_memo_length)?;
        }
        let target_tags = match patch.tag_names {
            FieldPatch::Absent => None,
            FieldPatch::Null => Some(Vec::new()),
            FieldPatch::Value(names) => Some(CollectionSynchronizer::normalize_tag_names(
                MemoFields::TAG_NAMES,
                names,
                self.config.max_tag_name_length,
            )?),
        };

        let txn = self.db.begin().await?;
        let current = load_owned_memo(&txn, user_id, memo_id).await?;

        let mut content = current.content.clone();
        let mut active: memo::ActiveModel = current.into();
        if patch.content.apply_or_default(&mut content) {
            active.content = ActiveValue::Set(content);
        }

        if let Some(target) = target_tags {
            let linked = MemoRepo::tags_for_memo(&txn, memo_id).await?;
            let plan = CollectionSynchronizer::plan(linked, |t| t.name.clone(), target, Clone::clone);
            if plan.is_noop() {
                debug!(memo_id, "tag set unchanged");
            } else {
                let removed: Vec<i64> = plan.to_delete.iter().map(|t| t.id).collect();
                MemoRepo::unlink_tags(&txn, memo_id, &removed).await?;
                let added = resolve_tags(&txn, user_id, &plan.to_insert).await?;
                let added: Vec<i64> = added.iter().map(|t| t.id).collect();
                MemoRepo::link_tags(&txn, memo_id, &added).await?;
            }
        }

        active.updated_at = ActiveValue::Set(OffsetDateTime::now_utc());
        let updated = MemoRepo::update(&txn, active).await?;
        let tags = MemoRepo::tags_for_memo(&txn, memo_id).await?;
        txn.commit().await?;

        info!(memo_id, "memo patched");
        Ok(memo_with_tags(updated, tags))
    }

    #[instrument(skip(self))]
    pub async fn delete_memo(&self, user_id: i64, memo_id: i64) -> Result<(), DomainError> {
        load_owned_memo(&self.db, user_id, memo_id).await?;
        MemoRepo::delete(&self.db, memo_id).await?;
        info!(memo_id, "memo deleted");
        Ok(())
    }

    pub async fn list_tags(&self, user_id: i64) -> Result<Vec<Tag>, DomainError> {
        let tags = TagRepo::list_for_user(&self.db, user_id).await?;
        Ok(tags.into_iter().map(Tag::from).collect())
    }

    /// Delete a tag; its links to memos cascade.
    #[instrument(skip(self))]
    pub async fn delete_tag(&self, user_id: i64, tag_id: i64) -> Result<(), DomainError> {
        load_owned_tag(&self.db, user_id, tag_id).await?;
        TagRepo::delete(&self.db, user_id, tag_id).await?;
        info!(tag_id, "tag deleted");
        Ok(())
    }
}

async fn load_owned_memo<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    memo_id: i64,
) -> Result<memo::Model, DomainError> {
    match MemoRepo::find(conn, memo_id).await? {
        None => Err(DomainError::not_found("Memo", memo_id)),
        Some(m) if m.user_id != user_id => Err(DomainError::not_owned("Memo", memo_id)),
        Some(m) => Ok(m),
    }
}

async fn load_owned_tag<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    tag_id: i64,
) -> Result<tag::Model, DomainError> {
    match TagRepo::find(conn, tag_id).await? {
        None => Err(DomainError::not_found("Tag", tag_id)),
        Some(t) if t.user_id != user_id => Err(DomainError::not_owned("Tag", tag_id)),
        Some(t) => Ok(t),
    }
}

/// Look up the user's tags by name, creating the missing ones.
async fn resolve_tags<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    names: &[String],
) -> Result<Vec<tag::Model>, DomainError> {
    let mut by_name: HashMap<String, tag::Model> = TagRepo::find_by_names(conn, user_id, names)
        .await?
        .into_iter()
        .map(|t| (t.name.clone(), t))
        .collect();

    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let t = if let Some(t) = by_name.remove(name) {
            t
        } else {
            debug!(user_id, tag = %name, "creating tag");
            TagRepo::insert(conn, user_id, name).await?
        };
        resolved.push(t);
    }
    Ok(resolved)
}

async fn attach_tags<C: ConnectionTrait>(
    conn: &C,
    memos: Vec<memo::Model>,
) -> Result<Vec<Memo>, DomainError> {
    let ids: Vec<i64> = memos.iter().map(|m| m.id).collect();
    let mut tags = MemoRepo::tags_for_memos(conn, &ids).await?;
    Ok(memos
        .into_iter()
        .map(|m| {
            let memo_tags = tags.remove(&m.id).unwrap_or_default();
            memo_with_tags(m, memo_tags)
        })
        .collect())
}
