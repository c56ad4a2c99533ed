use pinboard_server::error::PinboardError;
use pinboard_server::usecase::comment::{
    AddCommentUseCase, ListCommentsUseCase, OwnCommentUseCase, RemoveCommentUseCase,
};

use crate::helpers::{MockCommentRepo, MockPinRepo, test_pin};

fn pins() -> MockPinRepo {
    MockPinRepo::new(vec![test_pin(1, 1, "Lake")])
}

#[tokio::test]
async fn should_add_trimmed_comment_to_existing_pin() {
    let comments = MockCommentRepo::default();
    let usecase = AddCommentUseCase {
        pins: pins(),
        comments: comments.clone(),
    };

    let comment = usecase.execute(2, 1, "  nice view  ").await.unwrap();
    assert_eq!(comment.text, "nice view");

    let listed = ListCommentsUseCase {
        pins: pins(),
        comments,
    }
    .for_pin(1)
    .await
    .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn should_reject_comment_on_missing_pin_or_blank_text() {
    let usecase = AddCommentUseCase {
        pins: pins(),
        comments: MockCommentRepo::default(),
    };
    assert!(matches!(
        usecase.execute(2, 9, "hi").await,
        Err(PinboardError::PinNotFound(9))
    ));
    assert!(matches!(
        usecase.execute(2, 1, "   ").await,
        Err(PinboardError::Validation(_))
    ));
}

#[tokio::test]
async fn should_hide_foreign_comments_from_owner_endpoints() {
    let comments = MockCommentRepo::default();
    AddCommentUseCase {
        pins: pins(),
        comments: comments.clone(),
    }
    .execute(2, 1, "mine")
    .await
    .unwrap();
    let usecase = OwnCommentUseCase { comments };

    assert!(usecase.get(2, 1).await.is_ok());
    assert!(matches!(
        usecase.get(3, 1).await,
        Err(PinboardError::CommentNotFound(1))
    ));
    assert!(matches!(
        usecase.edit(3, 1, "hijack").await,
        Err(PinboardError::CommentNotFound(1))
    ));
    assert!(matches!(
        usecase.delete(3, 1).await,
        Err(PinboardError::CommentNotFound(1))
    ));
}

#[tokio::test]
async fn should_edit_and_delete_own_comment() {
    let comments = MockCommentRepo::default();
    let stored = comments.comments_handle();
    AddCommentUseCase {
        pins: pins(),
        comments: comments.clone(),
    }
    .execute(2, 1, "first")
    .await
    .unwrap();
    let usecase = OwnCommentUseCase { comments };

    let edited = usecase.edit(2, 1, "second").await.unwrap();
    assert_eq!(edited.text, "second");

    usecase.delete(2, 1).await.unwrap();
    assert!(stored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_web_removal_of_foreign_comment() {
    let comments = MockCommentRepo::default();
    AddCommentUseCase {
        pins: pins(),
        comments: comments.clone(),
    }
    .execute(2, 1, "mine")
    .await
    .unwrap();
    let usecase = RemoveCommentUseCase { comments };

    assert!(matches!(
        usecase.execute(3, 1).await,
        Err(PinboardError::Forbidden(_))
    ));
    let removed = usecase.execute(2, 1).await.unwrap();
    assert_eq!(removed.pin_id, 1);
}
