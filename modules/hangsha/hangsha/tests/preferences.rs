mod common;

use common::{add_category, register, setup, TYPE_GROUP};
use hangsha::DomainError;
use hangsha_sdk::{FieldPatch, InterestCategoriesPatch, InterestCategoryAssignment};

fn items(pairs: &[(i64, i32)]) -> InterestCategoriesPatch {
    InterestCategoriesPatch {
        items: FieldPatch::Value(
            pairs
                .iter()
                .map(|&(category_id, priority)| InterestCategoryAssignment {
                    category_id,
                    priority,
                })
                .collect(),
        ),
    }
}

fn pairs(list: &[hangsha_sdk::InterestCategory]) -> Vec<(i64, i32)> {
    list.iter().map(|ic| (ic.category.id, ic.priority)).collect()
}

#[tokio::test]
async fn replace_all_validates_then_replaces_exactly() {
    let ctx = setup().await;
    let user = register(&ctx, "me@snu.ac.kr").await;
    let a = add_category(&ctx, TYPE_GROUP, "특강", 1).await;
    let b = add_category(&ctx, TYPE_GROUP, "공모전", 2).await;
    let c = add_category(&ctx, TYPE_GROUP, "봉사", 3).await;

    ctx.svc
        .replace_interest_categories(user, items(&[(a, 1), (b, 2)]))
        .await
        .unwrap();

    let err = ctx
        .svc
        .replace_interest_categories(user, items(&[(a, 1), (c, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::CollectionInvariantViolated { .. }));

    let err = ctx
        .svc
        .replace_interest_categories(user, items(&[(a, 1), (c, 3)]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::CollectionInvariantViolated { .. }));

    let err = ctx
        .svc
        .replace_interest_categories(user, items(&[(a, 1), (a, 2)]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::CollectionInvariantViolated { .. }));

    // failed requests changed nothing
    let current = ctx.svc.list_interest_categories(user).await.unwrap();
    assert_eq!(pairs(&current), vec![(a, 1), (b, 2)]);

    let replaced = ctx
        .svc
        .replace_interest_categories(user, items(&[(c, 1), (a, 2)]))
        .await
        .unwrap();
    assert_eq!(pairs(&replaced), vec![(c, 1), (a, 2)]);
}

#[tokio::test]
async fn unknown_category_is_a_reference_error() {
    let ctx = setup().await;
    let user = register(&ctx, "me@snu.ac.kr").await;
    let a = add_category(&ctx, TYPE_GROUP, "특강", 1).await;

    let err = ctx
        .svc
        .replace_interest_categories(user, items(&[(a, 1), (a + 999, 2)]))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ReferenceNotFound { .. }));
}

#[tokio::test]
async fn null_and_empty_both_clear() {
    let ctx = setup().await;
    let user = register(&ctx, "me@snu.ac.kr").await;
    let a = add_category(&ctx, TYPE_GROUP, "특강", 1).await;

    ctx.svc
        .replace_interest_categories(user, items(&[(a, 1)]))
        .await
        .unwrap();
    let cleared = ctx
        .svc
        .replace_interest_categories(
            user,
            InterestCategoriesPatch {
                items: FieldPatch::Null,
            },
        )
        .await
        .unwrap();
    assert!(cleared.is_empty());

    ctx.svc
        .replace_interest_categories(user, items(&[(a, 1)]))
        .await
        .unwrap();
    let cleared = ctx
        .svc
        .replace_interest_categories(user, items(&[]))
        .await
        .unwrap();
    assert!(cleared.is_empty());

    let err = ctx
        .svc
        .replace_interest_categories(user, InterestCategoriesPatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EmptyPatch { .. }));
}

#[tokio::test]
async fn deleting_an_unassigned_category_is_not_found() {
    let ctx = setup().await;
    let user = register(&ctx, "me@snu.ac.kr").await;
    let a = add_category(&ctx, TYPE_GROUP, "특강", 1).await;

    let err = ctx.svc.delete_interest_category(user, a).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    ctx.svc
        .replace_interest_categories(user, items(&[(a, 1)]))
        .await
        .unwrap();
    ctx.svc.delete_interest_category(user, a).await.unwrap();
    assert!(ctx.svc.list_interest_categories(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn excluded_keyword_add_is_idempotent() {
    let ctx = setup().await;
    let user = register(&ctx, "me@snu.ac.kr").await;

    let first = ctx.svc.add_excluded_keyword(user, " 채용 ").await.unwrap();
    let again = ctx.svc.add_excluded_keyword(user, "채용").await.unwrap();
    assert_eq!(first.id, again.id);
    assert_eq!(first.keyword, "채용");
    assert_eq!(ctx.svc.list_excluded_keywords(user).await.unwrap().len(), 1);

    let err = ctx.svc.add_excluded_keyword(user, "   ").await.unwrap_err();
    assert!(matches!(err, DomainError::FieldInvalid { .. }));
}

#[tokio::test]
async fn excluded_keywords_are_private_to_their_owner() {
    let ctx = setup().await;
    let owner = register(&ctx, "owner@snu.ac.kr").await;
    let other = register(&ctx, "other@snu.ac.kr").await;
    let kw = ctx.svc.add_excluded_keyword(owner, "광고").await.unwrap();

    let err = ctx
        .svc
        .delete_excluded_keyword(other, kw.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    ctx.svc.delete_excluded_keyword(owner, kw.id).await.unwrap();
    assert!(ctx.svc.list_excluded_keywords(owner).await.unwrap().is_empty());
}
