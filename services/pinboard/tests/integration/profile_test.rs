use pinboard_domain::sex::Sex;
use pinboard_server::domain::repository::FollowRepository;
use pinboard_server::domain::types::ProfileChanges;
use pinboard_server::error::PinboardError;
use pinboard_server::usecase::profile::{
    ListProfilesUseCase, ProfilePageUseCase, UpdateProfileUseCase,
};

use crate::helpers::{MockFollowRepo, MockProfileRepo, MockUserRepo, test_profile, test_user};

fn profiles() -> MockProfileRepo {
    MockProfileRepo::new(vec![
        test_profile(10, &test_user(1, "alice")),
        test_profile(20, &test_user(2, "bob")),
    ])
}

#[tokio::test]
async fn should_assemble_profile_page_with_counts() {
    let follows = MockFollowRepo::default();
    follows.create(2, 1).await.unwrap();
    let usecase = ProfilePageUseCase {
        users: MockUserRepo::new(vec![test_user(1, "alice"), test_user(2, "bob")]),
        profiles: profiles(),
        follows,
    };

    let seen_by_bob = usecase.execute("alice", Some(2)).await.unwrap();
    assert_eq!(seen_by_bob.profile.id, 10);
    assert_eq!(seen_by_bob.counts.followers, 1);
    assert_eq!(seen_by_bob.counts.following, 0);
    assert!(seen_by_bob.followed_by_viewer);

    let anonymous = usecase.execute("alice", None).await.unwrap();
    assert!(!anonymous.followed_by_viewer);

    assert!(matches!(
        usecase.execute("carol", None).await,
        Err(PinboardError::UserNotFound)
    ));
}

#[tokio::test]
async fn should_update_only_own_profile() {
    let usecase = UpdateProfileUseCase {
        profiles: profiles(),
    };
    let changes = ProfileChanges {
        first_name: Some("Alice".to_owned()),
        sex: Some(Sex::Female),
        ..Default::default()
    };

    let forbidden = usecase.execute(2, 10, changes.clone()).await;
    assert!(matches!(forbidden, Err(PinboardError::Forbidden(_))));

    let updated = usecase.execute(1, 10, changes).await.unwrap();
    assert_eq!(updated.first_name, "Alice");
    assert_eq!(updated.sex, Sex::Female);
    assert_eq!(updated.last_name, "");
}

#[tokio::test]
async fn should_reject_overlong_status() {
    let usecase = UpdateProfileUseCase {
        profiles: profiles(),
    };
    let result = usecase
        .execute(
            1,
            10,
            ProfileChanges {
                profile_status: Some("x".repeat(151)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(PinboardError::Validation(_))));
}

#[tokio::test]
async fn should_page_profiles() {
    let usecase = ListProfilesUseCase {
        profiles: profiles(),
    };
    let (page, count) = usecase.execute(1, 1).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(page[0].id, 20);
}
