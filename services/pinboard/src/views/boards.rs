use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::auth::{CurrentUser, FlashLevel, MaybeUser, flash};
use crate::domain::types::{BoardChanges, NewBoard};
use crate::error::PinboardError;
use crate::state::AppState;
use crate::usecase::board::{BoardLookup, CreateBoardUseCase, GetBoardUseCase, UpdateBoardUseCase};
use crate::usecase::pin::ListPinsUseCase;
use crate::views::templates::{BoardCard, BoardDetailTemplate, BoardFormTemplate, PinCard};
use crate::views::{WebResult, board_edit_path, board_path, nav, profile_path, render};

const CREATE_ACTION: &str = "/boards/create";

/// Board form fields. `is_private` is only present when the box is ticked.
#[derive(Deserialize)]
pub struct BoardForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub is_private: Option<String>,
}

// ── GET|POST /boards/create ──────────────────────────────────────────────────

pub async fn create_board_page(CurrentUser(user): CurrentUser, session: Session) -> WebResult {
    render(&BoardFormTemplate {
        nav: nav(&session, Some(&user)).await,
        heading: "Create board",
        action: CREATE_ACTION.to_owned(),
        title: String::new(),
        description: String::new(),
        is_private: false,
        errors: vec![],
    })
}

pub async fn create_board(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BoardForm>,
) -> WebResult {
    let usecase = CreateBoardUseCase {
        boards: state.board_repo(),
    };
    let is_private = form.is_private.is_some();
    let result = usecase
        .execute(NewBoard {
            user_id: user.id,
            title: form.title.trim().to_owned(),
            description: form.description.clone(),
            is_private,
        })
        .await;
    match result {
        Ok(board) => {
            flash(
                &session,
                FlashLevel::Success,
                format!("Board \"{}\" created.", board.title),
            )
            .await;
            Ok(Redirect::to(&profile_path(&user.username)).into_response())
        }
        Err(e @ (PinboardError::Validation(_) | PinboardError::BoardTitleTaken)) => {
            render(&BoardFormTemplate {
                nav: nav(&session, Some(&user)).await,
                heading: "Create board",
                action: CREATE_ACTION.to_owned(),
                title: form.title,
                description: form.description,
                is_private,
                errors: vec![e.to_string()],
            })
        }
        Err(e) => Err(e.into()),
    }
}

// ── GET|POST /boards/edit/{title} ────────────────────────────────────────────

pub async fn edit_board_page(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(title): Path<String>,
) -> WebResult {
    let board = GetBoardUseCase {
        boards: state.board_repo(),
    }
    .execute(BoardLookup::Title(&title), Some(user.id))
    .await?;
    if board.user_id != user.id {
        return Err(PinboardError::Forbidden("You are not allowed to change this board.").into());
    }
    render(&BoardFormTemplate {
        nav: nav(&session, Some(&user)).await,
        heading: "Edit board",
        action: board_edit_path(&board.title),
        title: board.title,
        description: board.description,
        is_private: board.is_private,
        errors: vec![],
    })
}

pub async fn edit_board(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(title): Path<String>,
    Form(form): Form<BoardForm>,
) -> WebResult {
    let board = GetBoardUseCase {
        boards: state.board_repo(),
    }
    .execute(BoardLookup::Title(&title), Some(user.id))
    .await?;
    let is_private = form.is_private.is_some();
    let changes = BoardChanges {
        title: Some(form.title.trim().to_owned()),
        description: Some(form.description.clone()),
        is_private: Some(is_private),
        cover: None,
    };
    let usecase = UpdateBoardUseCase {
        boards: state.board_repo(),
    };
    match usecase.execute(user.id, board.id, changes).await {
        Ok(updated) => {
            flash(&session, FlashLevel::Success, "Board updated.").await;
            Ok(Redirect::to(&board_path(&updated.title)).into_response())
        }
        Err(e @ (PinboardError::Validation(_) | PinboardError::BoardTitleTaken)) => {
            render(&BoardFormTemplate {
                nav: nav(&session, Some(&user)).await,
                heading: "Edit board",
                action: board_edit_path(&board.title),
                title: form.title,
                description: form.description,
                is_private,
                errors: vec![e.to_string()],
            })
        }
        Err(e) => Err(e.into()),
    }
}

// ── GET /boards/{title} ──────────────────────────────────────────────────────

pub async fn board_detail(
    viewer: MaybeUser,
    State(state): State<AppState>,
    session: Session,
    Path(title): Path<String>,
) -> WebResult {
    let viewer_id = viewer.id();
    let board = GetBoardUseCase {
        boards: state.board_repo(),
    }
    .execute(BoardLookup::Title(&title), viewer_id)
    .await?;
    let pins = ListPinsUseCase {
        pins: state.pin_repo(),
    }
    .by_board(board.id)
    .await?;
    render(&BoardDetailTemplate {
        nav: nav(&session, viewer.0.as_ref()).await,
        is_owner: viewer_id == Some(board.user_id),
        board: BoardCard::from(&board),
        pins: pins.iter().map(PinCard::from).collect(),
    })
}
