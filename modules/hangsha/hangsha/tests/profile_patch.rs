mod common;

use common::{register, setup};
use hangsha::DomainError;
use hangsha_sdk::{FieldPatch, UserProfilePatch};

#[tokio::test]
async fn username_value_is_trimmed_and_image_is_untouched() {
    let ctx = setup().await;
    let user = register(&ctx, "me@snu.ac.kr").await;
    ctx.svc
        .patch_profile(
            user,
            UserProfilePatch {
                username: FieldPatch::Absent,
                profile_image_url: FieldPatch::Value("https://img.example.com/me.png".to_owned()),
            },
        )
        .await
        .unwrap();

    let profile = ctx
        .svc
        .patch_profile(
            user,
            UserProfilePatch {
                username: FieldPatch::Value("  hangsha  ".to_owned()),
                profile_image_url: FieldPatch::Absent,
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.username.as_deref(), Some("hangsha"));
    assert_eq!(
        profile.profile_image_url.as_deref(),
        Some("https://img.example.com/me.png")
    );
}

#[tokio::test]
async fn null_clears_only_the_named_field() {
    let ctx = setup().await;
    let user = ctx
        .svc
        .register_user("me@snu.ac.kr", Some("first".to_owned()))
        .await
        .unwrap()
        .id;
    ctx.svc
        .patch_profile(
            user,
            UserProfilePatch {
                username: FieldPatch::Absent,
                profile_image_url: FieldPatch::Value("http://example.com/a.jpg".to_owned()),
            },
        )
        .await
        .unwrap();

    let profile = ctx
        .svc
        .patch_profile(
            user,
            UserProfilePatch {
                username: FieldPatch::Absent,
                profile_image_url: FieldPatch::Null,
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.username.as_deref(), Some("first"));
    assert_eq!(profile.profile_image_url, None);
}

#[tokio::test]
async fn invalid_values_reject_the_whole_patch() {
    let ctx = setup().await;
    let user = ctx
        .svc
        .register_user("me@snu.ac.kr", Some("keep".to_owned()))
        .await
        .unwrap()
        .id;

    let err = ctx
        .svc
        .patch_profile(
            user,
            UserProfilePatch {
                username: FieldPatch::Value("renamed".to_owned()),
                profile_image_url: FieldPatch::Value("ftp://example.com/a.png".to_owned()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::FieldInvalid { ref field, .. } if field == "profileImageUrl"));

    let err = ctx
        .svc
        .patch_profile(
            user,
            UserProfilePatch {
                username: FieldPatch::Value("   ".to_owned()),
                profile_image_url: FieldPatch::Absent,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::FieldInvalid { ref field, .. } if field == "username"));

    let profile = ctx.svc.get_profile(user).await.unwrap();
    assert_eq!(profile.username.as_deref(), Some("keep"));
}

#[tokio::test]
async fn empty_profile_patch_is_rejected() {
    let ctx = setup().await;
    let user = register(&ctx, "me@snu.ac.kr").await;
    let err = ctx
        .svc
        .patch_profile(user, UserProfilePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::EmptyPatch { .. }));
}

#[tokio::test]
async fn registering_twice_returns_the_same_user() {
    let ctx = setup().await;
    let first = register(&ctx, "me@snu.ac.kr").await;
    let second = register(&ctx, "me@snu.ac.kr").await;
    assert_eq!(first, second);
}
