use axum::{
    Form,
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::auth::{CurrentUser, FlashLevel, MaybeUser, flash};
use crate::domain::types::{DEFAULT_PIN_FILE, NewPin, PinChanges, User};
use crate::error::PinboardError;
use crate::infra::media::MediaKind;
use crate::state::AppState;
use crate::usecase::board::{AddPinOutcome, AddPinToBoardUseCase, ListBoardsUseCase};
use crate::usecase::comment::{AddCommentUseCase, ListCommentsUseCase, RemoveCommentUseCase};
use crate::usecase::pin::{
    CreatePinInput, CreatePinUseCase, DeletePinUseCase, GetPinUseCase, PinsByUsernameUseCase,
    RelatedPinsUseCase, UpdatePinUseCase,
};
use crate::views::templates::{
    Choice, CommentView, PinCard, PinDetailTemplate, PinFormTemplate, PinListTemplate,
};
use crate::views::{MultipartForm, WebResult, nav, render};

const CREATE_ACTION: &str = "/pins/create/";

fn pin_path(id: i32) -> String {
    format!("/pins/{id}")
}

fn created_path(username: &str) -> String {
    format!("/pins/{}/created/", urlencoding::encode(username))
}

/// `board` select value: empty means "don't save into a board".
fn parse_board_choice(raw: Option<&str>) -> Result<Option<i32>, PinboardError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| PinboardError::Validation(format!("\"{value}\" is not a valid choice."))),
    }
}

async fn board_choices(
    state: &AppState,
    user: &User,
    selected: Option<&str>,
    value_of: impl Fn(i32, &str) -> String,
) -> Result<Vec<Choice>, PinboardError> {
    let boards = ListBoardsUseCase {
        boards: state.board_repo(),
    }
    .by_owner(user.id, Some(user.id))
    .await?;
    Ok(boards
        .iter()
        .map(|b| {
            let value = value_of(b.id, &b.title);
            Choice {
                selected: selected == Some(value.as_str()),
                value,
                label: b.title.clone(),
            }
        })
        .collect())
}

// ── GET|POST /pins/create/ ───────────────────────────────────────────────────

pub async fn create_pin_page(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
) -> WebResult {
    let boards = board_choices(&state, &user, None, |id, _| id.to_string()).await?;
    render(&PinFormTemplate {
        nav: nav(&session, Some(&user)).await,
        heading: "Create pin",
        action: CREATE_ACTION.to_owned(),
        title: String::new(),
        description: String::new(),
        boards,
        errors: vec![],
    })
}

pub async fn create_pin(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> WebResult {
    let form = MultipartForm::read(multipart).await?;
    let board_field = form.optional("board");

    let outcome = match parse_board_choice(board_field.as_deref()) {
        Ok(board_id) => {
            let file = match form.files.get("file") {
                Some(upload) => {
                    state
                        .media
                        .save(MediaKind::Pin, &upload.file_name, &upload.bytes)
                        .await?
                }
                None => DEFAULT_PIN_FILE.to_owned(),
            };
            CreatePinUseCase {
                pins: state.pin_repo(),
                boards: state.board_repo(),
            }
            .execute(CreatePinInput {
                pin: NewPin {
                    user_id: user.id,
                    title: form.text("title").trim().to_owned(),
                    description: form.text("description"),
                    file,
                },
                board_id,
            })
            .await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(pin) => {
            flash(&session, FlashLevel::Success, "Pin created.").await;
            Ok(Redirect::to(&pin_path(pin.id)).into_response())
        }
        Err(PinboardError::Validation(message)) => {
            let boards = board_choices(&state, &user, board_field.as_deref(), |id, _| {
                id.to_string()
            })
            .await?;
            render(&PinFormTemplate {
                nav: nav(&session, Some(&user)).await,
                heading: "Create pin",
                action: CREATE_ACTION.to_owned(),
                title: form.text("title"),
                description: form.text("description"),
                boards,
                errors: vec![message],
            })
        }
        Err(e) => Err(e.into()),
    }
}

// ── GET /pins/{username}/created/ ────────────────────────────────────────────

pub async fn created_pins(
    MaybeUser(viewer): MaybeUser,
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> WebResult {
    let pins = PinsByUsernameUseCase {
        users: state.user_repo(),
        pins: state.pin_repo(),
    }
    .execute(&username)
    .await?;
    render(&PinListTemplate {
        nav: nav(&session, viewer.as_ref()).await,
        heading: format!("Pins created by {username}"),
        pins: pins.iter().map(PinCard::from).collect(),
    })
}

// ── GET|POST /pins/edit/{id} ─────────────────────────────────────────────────

fn edit_action(id: i32) -> String {
    format!("/pins/edit/{id}")
}

pub async fn edit_pin_page(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> WebResult {
    let pin = GetPinUseCase {
        pins: state.pin_repo(),
    }
    .execute(id)
    .await?;
    if pin.user_id != user.id {
        return Err(PinboardError::Forbidden("You are not allowed to change this pin.").into());
    }
    render(&PinFormTemplate {
        nav: nav(&session, Some(&user)).await,
        heading: "Edit pin",
        action: edit_action(pin.id),
        title: pin.title,
        description: pin.description,
        boards: vec![],
        errors: vec![],
    })
}

pub async fn edit_pin(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> WebResult {
    let form = MultipartForm::read(multipart).await?;
    let pin = GetPinUseCase {
        pins: state.pin_repo(),
    }
    .execute(id)
    .await?;
    if pin.user_id != user.id {
        return Err(PinboardError::Forbidden("You are not allowed to change this pin.").into());
    }

    let file = match form.files.get("file") {
        Some(upload) => Some(
            state
                .media
                .save(MediaKind::Pin, &upload.file_name, &upload.bytes)
                .await?,
        ),
        None => None,
    };
    let changes = PinChanges {
        title: Some(form.text("title").trim().to_owned()),
        description: Some(form.text("description")),
        file,
    };
    let usecase = UpdatePinUseCase {
        pins: state.pin_repo(),
    };
    match usecase.execute(user.id, id, changes).await {
        Ok(pin) => {
            flash(&session, FlashLevel::Success, "Pin updated.").await;
            Ok(Redirect::to(&pin_path(pin.id)).into_response())
        }
        Err(PinboardError::Validation(message)) => render(&PinFormTemplate {
            nav: nav(&session, Some(&user)).await,
            heading: "Edit pin",
            action: edit_action(id),
            title: form.text("title"),
            description: form.text("description"),
            boards: vec![],
            errors: vec![message],
        }),
        Err(e) => Err(e.into()),
    }
}

// ── POST /pins/delete/{id} ───────────────────────────────────────────────────

pub async fn delete_pin(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> WebResult {
    let pin = DeletePinUseCase {
        pins: state.pin_repo(),
    }
    .execute(user.id, id)
    .await?;
    flash(
        &session,
        FlashLevel::Success,
        format!("Pin \"{}\" deleted.", pin.title),
    )
    .await;
    Ok(Redirect::to(&created_path(&user.username)).into_response())
}

// ── GET /pins/{id} ───────────────────────────────────────────────────────────

pub async fn pin_detail(
    MaybeUser(viewer): MaybeUser,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> WebResult {
    let viewer_id = viewer.as_ref().map(|u| u.id);
    let pin = GetPinUseCase {
        pins: state.pin_repo(),
    }
    .execute(id)
    .await?;
    let comments = ListCommentsUseCase {
        pins: state.pin_repo(),
        comments: state.comment_repo(),
    }
    .for_pin(pin.id)
    .await?;
    let related = RelatedPinsUseCase {
        boards: state.board_repo(),
        pins: state.pin_repo(),
    }
    .execute(pin.id)
    .await?;
    let boards = match &viewer {
        Some(user) => board_choices(&state, user, None, |_, title| title.to_owned()).await?,
        None => vec![],
    };

    render(&PinDetailTemplate {
        nav: nav(&session, viewer.as_ref()).await,
        pin: PinCard::from(&pin),
        description: pin.description.clone(),
        date_created: pin.date_created.format("%Y-%m-%d %H:%M").to_string(),
        is_owner: viewer_id == Some(pin.user_id),
        logged_in: viewer.is_some(),
        boards,
        comments: comments
            .iter()
            .map(|c| CommentView::new(c, viewer_id))
            .collect(),
        related: related.iter().map(PinCard::from).collect(),
    })
}

// ── POST /pins/save/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SaveForm {
    pub board: String,
}

pub async fn save_pin(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<SaveForm>,
) -> WebResult {
    let (outcome, _, board) = AddPinToBoardUseCase {
        boards: state.board_repo(),
        pins: state.pin_repo(),
    }
    .execute(user.id, id, &form.board)
    .await?;
    let message = match outcome {
        AddPinOutcome::Added => format!("Saved to \"{}\".", board.title),
        AddPinOutcome::AlreadyInBoard => "Already in board.".to_owned(),
    };
    flash(&session, FlashLevel::Info, message).await;
    Ok(Redirect::to(&pin_path(id)).into_response())
}

// ── POST /pins/comment/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CommentForm {
    pub text: String,
}

pub async fn add_comment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Form(form): Form<CommentForm>,
) -> WebResult {
    let result = AddCommentUseCase {
        pins: state.pin_repo(),
        comments: state.comment_repo(),
    }
    .execute(user.id, id, &form.text)
    .await;
    match result {
        Ok(_) => {}
        Err(PinboardError::Validation(message)) => {
            flash(&session, FlashLevel::Error, message).await;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to(&pin_path(id)).into_response())
}

// ── POST /pins/comment_remove/{id} ───────────────────────────────────────────

pub async fn remove_comment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> WebResult {
    let comment = RemoveCommentUseCase {
        comments: state.comment_repo(),
    }
    .execute(user.id, id)
    .await?;
    flash(&session, FlashLevel::Success, "Comment removed.").await;
    Ok(Redirect::to(&pin_path(comment.pin_id)).into_response())
}
