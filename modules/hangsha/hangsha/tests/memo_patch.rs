mod common;

use common::{register, setup};
use hangsha::DomainError;
use hangsha_sdk::{FieldPatch, MemoPatch, NewMemo};

fn names(memo: &hangsha_sdk::Memo) -> Vec<String> {
    let mut names: Vec<String> = memo.tags.iter().map(|t| t.name.clone()).collect();
    names.sort();
    names
}

fn new_memo(content: &str, tags: &[&str]) -> NewMemo {
    NewMemo {
        content: content.to_owned(),
        tag_names: tags.iter().map(|t| (*t).to_owned()).collect(),
    }
}

#[tokio::test]
async fn null_content_clears_body_and_keeps_tags() {
    let ctx = setup().await;
    let user = register(&ctx, "a@snu.ac.kr").await;
    let memo = ctx
        .svc
        .create_memo(user, new_memo("lecture notes", &["math", "exam"]))
        .await
        .unwrap();

    let patched = ctx
        .svc
        .patch_memo(
            user,
            memo.id,
            MemoPatch {
                content: FieldPatch::Null,
                tag_names: FieldPatch::Absent,
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.content, "");
    assert_eq!(names(&patched), vec!["exam", "math"]);
}

#[tokio::test]
async fn null_tags_detach_everything_and_keep_content() {
    let ctx = setup().await;
    let user = register(&ctx, "a@snu.ac.kr").await;
    let memo = ctx
        .svc
        .create_memo(user, new_memo("keep me", &["math"]))
        .await
        .unwrap();

    let patched = ctx
        .svc
        .patch_memo(
            user,
            memo.id,
            MemoPatch {
                content: FieldPatch::Absent,
                tag_names: FieldPatch::Null,
            },
        )
        .await
        .unwrap();

    assert_eq!(patched.content, "keep me");
    assert!(patched.tags.is_empty());
    // the tag itself survives, only the link is gone
    assert_eq!(ctx.svc.list_tags(user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn tag_replace_creates_missing_tags_and_dedups() {
    let ctx = setup().await;
    let user = register(&ctx, "a@snu.ac.kr").await;
    let memo = ctx
        .svc
        .create_memo(user, new_memo("m", &["a", "b"]))
        .await
        .unwrap();

    let patched = ctx
        .svc
        .patch_memo(
            user,
            memo.id,
            MemoPatch {
                content: FieldPatch::Absent,
                tag_names: FieldPatch::Value(vec![
                    " b ".to_owned(),
                    "c".to_owned(),
                    "c".to_owned(),
                ]),
            },
        )
        .await
        .unwrap();

    assert_eq!(names(&patched), vec!["b", "c"]);
    let all: Vec<String> = ctx
        .svc
        .list_tags(user)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn empty_patch_is_rejected() {
    let ctx = setup().await;
    let user = register(&ctx, "a@snu.ac.kr").await;
    let memo = ctx.svc.create_memo(user, new_memo("m", &[])).await.unwrap();

    let err = ctx
        .svc
        .patch_memo(user, memo.id, MemoPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EmptyPatch { .. }));
}

#[tokio::test]
async fn blank_tag_rejects_whole_patch_without_writes() {
    let ctx = setup().await;
    let user = register(&ctx, "a@snu.ac.kr").await;
    let memo = ctx
        .svc
        .create_memo(user, new_memo("original", &["a"]))
        .await
        .unwrap();

    let err = ctx
        .svc
        .patch_memo(
            user,
            memo.id,
            MemoPatch {
                content: FieldPatch::Value("changed".to_owned()),
                tag_names: FieldPatch::Value(vec!["ok".to_owned(), "  ".to_owned()]),
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let memos = ctx.svc.list_memos(user).await.unwrap();
    assert_eq!(memos[0].content, "original");
    assert_eq!(names(&memos[0]), vec!["a"]);
}

#[tokio::test]
async fn other_users_memo_is_not_owned() {
    let ctx = setup().await;
    let owner = register(&ctx, "owner@snu.ac.kr").await;
    let other = register(&ctx, "other@snu.ac.kr").await;
    let memo = ctx.svc.create_memo(owner, new_memo("m", &[])).await.unwrap();

    let err = ctx
        .svc
        .patch_memo(
            other,
            memo.id,
            MemoPatch {
                content: FieldPatch::Value("hijack".to_owned()),
                tag_names: FieldPatch::Absent,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotOwned { .. }));

    let err = ctx
        .svc
        .patch_memo(
            owner,
            memo.id + 100,
            MemoPatch {
                content: FieldPatch::Value("x".to_owned()),
                tag_names: FieldPatch::Absent,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn deleting_a_tag_removes_it_from_memos() {
    let ctx = setup().await;
    let user = register(&ctx, "a@snu.ac.kr").await;
    let memo = ctx
        .svc
        .create_memo(user, new_memo("m", &["a", "b"]))
        .await
        .unwrap();
    let tag_a = memo.tags.iter().find(|t| t.name == "a").unwrap().id;

    assert_eq!(ctx.svc.list_memos_by_tag(user, tag_a).await.unwrap().len(), 1);
    ctx.svc.delete_tag(user, tag_a).await.unwrap();

    let memos = ctx.svc.list_memos(user).await.unwrap();
    assert_eq!(names(&memos[0]), vec!["b"]);
}
