use pinboard_server::domain::types::{NewPin, PinChanges};
use pinboard_server::error::PinboardError;
use pinboard_server::usecase::pin::{
    CreatePinInput, CreatePinUseCase, DeletePinUseCase, GetPinUseCase, ListPinsUseCase,
    PinsByUsernameUseCase, RelatedPinsUseCase, UpdatePinUseCase,
};

use crate::helpers::{MockBoardRepo, MockPinRepo, MockUserRepo, test_board, test_pin, test_user};

fn new_pin(user_id: i32, title: &str) -> NewPin {
    NewPin {
        user_id,
        title: title.to_owned(),
        description: "somewhere nice".to_owned(),
        file: "pins/lake.jpg".to_owned(),
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_pin_and_save_into_own_board() {
    let boards = MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![]);
    let rows = boards.board_pins_handle();
    let usecase = CreatePinUseCase {
        pins: MockPinRepo::default(),
        boards,
    };

    let pin = usecase
        .execute(CreatePinInput {
            pin: new_pin(1, "Lake"),
            board_id: Some(1),
        })
        .await
        .unwrap();

    assert_eq!(pin.title, "Lake");
    assert_eq!(*rows.lock().unwrap(), vec![(1, pin.id)]);
}

#[tokio::test]
async fn should_not_create_pin_for_foreign_board() {
    let pins = MockPinRepo::default();
    let stored = pins.pins_handle();
    let usecase = CreatePinUseCase {
        pins,
        boards: MockBoardRepo::new(vec![test_board(1, 2, "Travel", false)], vec![]),
    };

    let result = usecase
        .execute(CreatePinInput {
            pin: new_pin(1, "Lake"),
            board_id: Some(1),
        })
        .await;

    assert!(matches!(result, Err(PinboardError::Forbidden(_))));
    assert!(stored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_require_pin_title() {
    let usecase = CreatePinUseCase {
        pins: MockPinRepo::default(),
        boards: MockBoardRepo::default(),
    };
    let result = usecase
        .execute(CreatePinInput {
            pin: new_pin(1, ""),
            board_id: None,
        })
        .await;
    assert!(matches!(result, Err(PinboardError::Validation(_))));
}

// ── Read ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_hide_foreign_pin_from_owned_lookup() {
    let usecase = GetPinUseCase {
        pins: MockPinRepo::new(vec![test_pin(1, 1, "Lake")]),
    };
    assert!(usecase.owned(1, 1).await.is_ok());
    let result = usecase.owned(2, 1).await;
    assert!(matches!(result, Err(PinboardError::PinNotFound(1))));
}

#[tokio::test]
async fn should_list_pins_of_board_and_user() {
    let boards = MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![(1, 2)]);
    let pins = MockPinRepo::linked(
        vec![test_pin(1, 1, "Lake"), test_pin(2, 2, "Hill")],
        &boards,
    );

    let on_board = ListPinsUseCase { pins: pins.clone() }.by_board(1).await.unwrap();
    assert_eq!(on_board.len(), 1);
    assert_eq!(on_board[0].title, "Hill");

    let by_name = PinsByUsernameUseCase {
        users: MockUserRepo::new(vec![test_user(1, "alice")]),
        pins,
    };
    let alice = by_name.execute("alice").await.unwrap();
    assert_eq!(alice.len(), 1);
    assert!(matches!(
        by_name.execute("nobody").await,
        Err(PinboardError::UserNotFound)
    ));
}

// ── Update / delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_editing_foreign_pin() {
    let usecase = UpdatePinUseCase {
        pins: MockPinRepo::new(vec![test_pin(1, 1, "Lake")]),
    };
    let result = usecase
        .execute(
            2,
            1,
            PinChanges {
                title: Some("Mine".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(PinboardError::Forbidden(_))));
}

#[tokio::test]
async fn should_update_own_pin() {
    let usecase = UpdatePinUseCase {
        pins: MockPinRepo::new(vec![test_pin(1, 1, "Lake")]),
    };
    let pin = usecase
        .execute(
            1,
            1,
            PinChanges {
                description: Some("at dawn".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(pin.title, "Lake");
    assert_eq!(pin.description, "at dawn");
}

#[tokio::test]
async fn should_delete_only_own_pin() {
    let pins = MockPinRepo::new(vec![test_pin(1, 1, "Lake")]);
    let stored = pins.pins_handle();
    let usecase = DeletePinUseCase { pins };

    let other = usecase.execute(2, 1).await;
    assert!(matches!(other, Err(PinboardError::Forbidden(_))));
    assert_eq!(stored.lock().unwrap().len(), 1);

    usecase.execute(1, 1).await.unwrap();
    assert!(stored.lock().unwrap().is_empty());
}

// ── Related pins ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_collect_pins_sharing_a_board() {
    let boards = MockBoardRepo::new(
        vec![
            test_board(1, 1, "Travel", false),
            test_board(2, 1, "Food", false),
            test_board(3, 2, "Other", false),
        ],
        vec![(1, 1), (1, 2), (2, 1), (2, 3), (2, 2), (3, 4)],
    );
    let pins = MockPinRepo::new((1..=4).map(|id| test_pin(id, 1, "p")).collect());
    let usecase = RelatedPinsUseCase { boards, pins };

    let related: Vec<i32> = usecase.execute(1).await.unwrap().iter().map(|p| p.id).collect();

    assert_eq!(related, [2, 3]);
}

#[tokio::test]
async fn should_have_no_related_pins_outside_boards() {
    let usecase = RelatedPinsUseCase {
        boards: MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![(1, 2)]),
        pins: MockPinRepo::new(vec![test_pin(1, 1, "Lake"), test_pin(2, 1, "Hill")]),
    };
    assert!(usecase.execute(1).await.unwrap().is_empty());
}
