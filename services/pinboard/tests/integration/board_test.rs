use pinboard_server::domain::types::{BoardChanges, NewBoard};
use pinboard_server::error::PinboardError;
use pinboard_server::usecase::board::{
    AddPinOutcome, AddPinToBoardUseCase, BoardLookup, CreateBoardUseCase, DeleteBoardUseCase,
    GetBoardUseCase, ListBoardsUseCase, RemovePinFromBoardUseCase, RemovePinOutcome,
    UpdateBoardUseCase,
};

use crate::helpers::{MockBoardRepo, MockPinRepo, test_board, test_pin};

fn new_board(user_id: i32, title: &str) -> NewBoard {
    NewBoard {
        user_id,
        title: title.to_owned(),
        description: String::new(),
        is_private: false,
    }
}

// ── Create / read ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_board_and_reject_duplicate_title() {
    let usecase = CreateBoardUseCase {
        boards: MockBoardRepo::default(),
    };

    let board = usecase.execute(new_board(1, "Travel")).await.unwrap();
    assert_eq!(board.title, "Travel");

    let again = usecase.execute(new_board(2, "Travel")).await;
    assert!(matches!(again, Err(PinboardError::BoardTitleTaken)));
}

#[tokio::test]
async fn should_reject_blank_title() {
    let usecase = CreateBoardUseCase {
        boards: MockBoardRepo::default(),
    };
    let result = usecase.execute(new_board(1, "   ")).await;
    assert!(matches!(result, Err(PinboardError::Validation(_))));
}

#[tokio::test]
async fn should_hide_private_board_from_other_users() {
    let boards = MockBoardRepo::new(vec![test_board(1, 1, "Secret", true)], vec![]);
    let usecase = GetBoardUseCase { boards };

    assert!(usecase.execute(BoardLookup::Id(1), Some(1)).await.is_ok());
    let other = usecase.execute(BoardLookup::Title("Secret"), Some(2)).await;
    assert!(matches!(other, Err(PinboardError::BoardNotFound)));
    let anonymous = usecase.execute(BoardLookup::Id(1), None).await;
    assert!(matches!(anonymous, Err(PinboardError::BoardNotFound)));
}

#[tokio::test]
async fn should_list_visible_boards_newest_first() {
    let boards = MockBoardRepo::new(
        vec![
            test_board(1, 1, "Public", false),
            test_board(2, 1, "Mine", true),
            test_board(3, 2, "Newest", false),
        ],
        vec![],
    );
    let usecase = ListBoardsUseCase { boards };

    let (anonymous, count) = usecase.execute(None, 0, 10).await.unwrap();
    let titles: Vec<&str> = anonymous.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, ["Newest", "Public"]);
    assert_eq!(count, 2);

    let (owner, count) = usecase.execute(Some(1), 0, 10).await.unwrap();
    assert_eq!(owner.len(), 3);
    assert_eq!(count, 3);

    let own = usecase.by_owner(1, Some(2)).await.unwrap();
    assert_eq!(own.len(), 1);
}

// ── Update / delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_forbid_mutation_by_non_owner() {
    let boards = MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![]);

    let update = UpdateBoardUseCase {
        boards: boards.clone(),
    }
    .execute(
        3,
        1,
        BoardChanges {
            title: Some("Mine now".to_owned()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(update, Err(PinboardError::Forbidden(_))));

    let delete = DeleteBoardUseCase { boards }.execute(3, 1).await;
    assert!(matches!(delete, Err(PinboardError::Forbidden(_))));
}

#[tokio::test]
async fn should_reject_rename_onto_existing_title() {
    let boards = MockBoardRepo::new(
        vec![
            test_board(1, 1, "Travel", false),
            test_board(2, 2, "Food", false),
        ],
        vec![],
    );
    let usecase = UpdateBoardUseCase { boards };

    let result = usecase
        .execute(
            1,
            1,
            BoardChanges {
                title: Some("Food".to_owned()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(PinboardError::BoardTitleTaken)));

    let same = usecase
        .execute(
            1,
            1,
            BoardChanges {
                title: Some("Travel".to_owned()),
                is_private: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(same.is_private);
}

#[tokio::test]
async fn should_return_deleted_board() {
    let boards = MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![(1, 5)]);
    let rows = boards.board_pins_handle();

    let removed = DeleteBoardUseCase { boards }.execute(1, 1).await.unwrap();

    assert_eq!(removed.title, "Travel");
    assert!(rows.lock().unwrap().is_empty());
}

// ── Pin membership ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_add_pin_once() {
    let boards = MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![]);
    let rows = boards.board_pins_handle();
    let usecase = AddPinToBoardUseCase {
        boards,
        pins: MockPinRepo::new(vec![test_pin(5, 2, "Lake")]),
    };

    let (first, pin, board) = usecase.execute(1, 5, "Travel").await.unwrap();
    let (second, _, _) = usecase.execute(1, 5, "Travel").await.unwrap();

    assert_eq!(first, AddPinOutcome::Added);
    assert_eq!(second, AddPinOutcome::AlreadyInBoard);
    assert_eq!(pin.id, 5);
    assert_eq!(board.title, "Travel");
    assert_eq!(rows.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_report_pin_not_in_board() {
    let usecase = RemovePinFromBoardUseCase {
        boards: MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![]),
        pins: MockPinRepo::new(vec![test_pin(5, 2, "Lake")]),
    };
    let (outcome, _, _) = usecase.execute(1, 5, "Travel").await.unwrap();
    assert_eq!(outcome, RemovePinOutcome::NotInBoard);
}

#[tokio::test]
async fn should_remove_pin_from_board() {
    let boards = MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![(1, 5)]);
    let rows = boards.board_pins_handle();
    let usecase = RemovePinFromBoardUseCase {
        boards,
        pins: MockPinRepo::new(vec![test_pin(5, 2, "Lake")]),
    };

    let (outcome, _, _) = usecase.execute(1, 5, "Travel").await.unwrap();

    assert_eq!(outcome, RemovePinOutcome::Removed);
    assert!(rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_forbid_saving_into_foreign_board() {
    let usecase = AddPinToBoardUseCase {
        boards: MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![]),
        pins: MockPinRepo::new(vec![test_pin(5, 2, "Lake")]),
    };
    let result = usecase.execute(2, 5, "Travel").await;
    assert!(matches!(result, Err(PinboardError::Forbidden(_))));
}

#[tokio::test]
async fn should_report_missing_pin_or_board() {
    let usecase = AddPinToBoardUseCase {
        boards: MockBoardRepo::new(vec![test_board(1, 1, "Travel", false)], vec![]),
        pins: MockPinRepo::new(vec![test_pin(5, 2, "Lake")]),
    };
    let missing_pin = usecase.execute(1, 99, "Travel").await;
    assert!(matches!(missing_pin, Err(PinboardError::PinNotFound(99))));
    let missing_board = usecase.execute(1, 5, "Nowhere").await;
    assert!(matches!(missing_board, Err(PinboardError::BoardNotFound)));
}
