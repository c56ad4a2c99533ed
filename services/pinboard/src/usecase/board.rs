use crate::domain::repository::{BoardRepository, PinRepository};
use crate::domain::types::{
    BOARD_DESCRIPTION_MAX_LEN, BOARD_TITLE_MAX_LEN, Board, BoardChanges, NewBoard, Pin,
};
use crate::error::PinboardError;
use crate::usecase::{check_max_len, check_not_blank};

const SAVE_FORBIDDEN: &str = "You are not allowed to save into this board.";
const CHANGE_FORBIDDEN: &str = "You are not allowed to change this board.";

fn check_board_fields(title: Option<&str>, description: Option<&str>) -> Result<(), PinboardError> {
    if let Some(title) = title {
        check_not_blank("title", title)?;
        check_max_len("title", title, BOARD_TITLE_MAX_LEN)?;
    }
    if let Some(description) = description {
        check_max_len("description", description, BOARD_DESCRIPTION_MAX_LEN)?;
    }
    Ok(())
}

async fn owned_board<B: BoardRepository>(
    boards: &B,
    actor_id: i32,
    board_id: i32,
) -> Result<Board, PinboardError> {
    let board = boards
        .find_by_id(board_id)
        .await?
        .ok_or(PinboardError::BoardNotFound)?;
    if board.user_id != actor_id {
        return Err(PinboardError::Forbidden(CHANGE_FORBIDDEN));
    }
    Ok(board)
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateBoardUseCase<B: BoardRepository> {
    pub boards: B,
}

impl<B: BoardRepository> CreateBoardUseCase<B> {
    pub async fn execute(&self, input: NewBoard) -> Result<Board, PinboardError> {
        check_board_fields(Some(&input.title), Some(&input.description))?;
        if self.boards.find_by_title(&input.title).await?.is_some() {
            return Err(PinboardError::BoardTitleTaken);
        }
        let board = self.boards.create(&input).await?;
        tracing::info!(user_id = board.user_id, board_id = board.id, "board created");
        Ok(board)
    }
}

// ── Read ─────────────────────────────────────────────────────────────────────

pub enum BoardLookup<'a> {
    Id(i32),
    Title(&'a str),
}

/// Private boards read as missing for anyone but the owner.
pub struct GetBoardUseCase<B: BoardRepository> {
    pub boards: B,
}

impl<B: BoardRepository> GetBoardUseCase<B> {
    pub async fn execute(
        &self,
        lookup: BoardLookup<'_>,
        viewer: Option<i32>,
    ) -> Result<Board, PinboardError> {
        let board = match lookup {
            BoardLookup::Id(id) => self.boards.find_by_id(id).await?,
            BoardLookup::Title(title) => self.boards.find_by_title(title).await?,
        };
        board
            .filter(|b| b.visible_to(viewer))
            .ok_or(PinboardError::BoardNotFound)
    }
}

pub struct ListBoardsUseCase<B: BoardRepository> {
    pub boards: B,
}

impl<B: BoardRepository> ListBoardsUseCase<B> {
    pub async fn execute(
        &self,
        viewer: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Board>, u64), PinboardError> {
        self.boards.list_visible(viewer, page, per_page).await
    }

    /// Boards of one owner; private ones only when the viewer is the owner.
    pub async fn by_owner(
        &self,
        owner_id: i32,
        viewer: Option<i32>,
    ) -> Result<Vec<Board>, PinboardError> {
        self.boards
            .list_by_owner(owner_id, viewer == Some(owner_id))
            .await
    }
}

// ── Update / delete ──────────────────────────────────────────────────────────

pub struct UpdateBoardUseCase<B: BoardRepository> {
    pub boards: B,
}

impl<B: BoardRepository> UpdateBoardUseCase<B> {
    pub async fn execute(
        &self,
        actor_id: i32,
        board_id: i32,
        changes: BoardChanges,
    ) -> Result<Board, PinboardError> {
        let board = owned_board(&self.boards, actor_id, board_id).await?;
        check_board_fields(changes.title.as_deref(), changes.description.as_deref())?;
        if let Some(title) = changes.title.as_deref() {
            if title != board.title && self.boards.find_by_title(title).await?.is_some() {
                return Err(PinboardError::BoardTitleTaken);
            }
        }
        let updated = self.boards.update(board.id, &changes).await?;
        tracing::info!(user_id = actor_id, board_id, "board updated");
        Ok(updated)
    }
}

pub struct DeleteBoardUseCase<B: BoardRepository> {
    pub boards: B,
}

impl<B: BoardRepository> DeleteBoardUseCase<B> {
    /// Returns the removed board.
    pub async fn execute(&self, actor_id: i32, board_id: i32) -> Result<Board, PinboardError> {
        let board = owned_board(&self.boards, actor_id, board_id).await?;
        self.boards.delete(board.id).await?;
        tracing::info!(user_id = actor_id, board_id, "board deleted");
        Ok(board)
    }
}

// ── Pin membership ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddPinOutcome {
    Added,
    AlreadyInBoard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovePinOutcome {
    Removed,
    NotInBoard,
}

async fn pin_and_board<B, P>(
    boards: &B,
    pins: &P,
    actor_id: i32,
    pin_id: i32,
    board_title: &str,
    forbidden: &'static str,
) -> Result<(Pin, Board), PinboardError>
where
    B: BoardRepository,
    P: PinRepository,
{
    let pin = pins
        .find_by_id(pin_id)
        .await?
        .ok_or(PinboardError::PinNotFound(pin_id))?;
    let board = boards
        .find_by_title(board_title)
        .await?
        .ok_or(PinboardError::BoardNotFound)?;
    if board.user_id != actor_id {
        return Err(PinboardError::Forbidden(forbidden));
    }
    Ok((pin, board))
}

pub struct AddPinToBoardUseCase<B, P>
where
    B: BoardRepository,
    P: PinRepository,
{
    pub boards: B,
    pub pins: P,
}

impl<B, P> AddPinToBoardUseCase<B, P>
where
    B: BoardRepository,
    P: PinRepository,
{
    pub async fn execute(
        &self,
        actor_id: i32,
        pin_id: i32,
        board_title: &str,
    ) -> Result<(AddPinOutcome, Pin, Board), PinboardError> {
        let (pin, board) = pin_and_board(
            &self.boards,
            &self.pins,
            actor_id,
            pin_id,
            board_title,
            SAVE_FORBIDDEN,
        )
        .await?;
        if self.boards.contains_pin(board.id, pin.id).await? {
            return Ok((AddPinOutcome::AlreadyInBoard, pin, board));
        }
        self.boards.add_pin(board.id, pin.id).await?;
        tracing::info!(user_id = actor_id, board_id = board.id, pin_id, "pin saved to board");
        Ok((AddPinOutcome::Added, pin, board))
    }
}

pub struct RemovePinFromBoardUseCase<B, P>
where
    B: BoardRepository,
    P: PinRepository,
{
    pub boards: B,
    pub pins: P,
}

impl<B, P> RemovePinFromBoardUseCase<B, P>
where
    B: BoardRepository,
    P: PinRepository,
{
    pub async fn execute(
        &self,
        actor_id: i32,
        pin_id: i32,
        board_title: &str,
    ) -> Result<(RemovePinOutcome, Pin, Board), PinboardError> {
        let (pin, board) = pin_and_board(
            &self.boards,
            &self.pins,
            actor_id,
            pin_id,
            board_title,
            CHANGE_FORBIDDEN,
        )
        .await?;
        if !self.boards.contains_pin(board.id, pin.id).await? {
            return Ok((RemovePinOutcome::NotInBoard, pin, board));
        }
        self.boards.remove_pin(board.id, pin.id).await?;
        tracing::info!(user_id = actor_id, board_id = board.id, pin_id, "pin removed from board");
        Ok((RemovePinOutcome::Removed, pin, board))
    }
}
