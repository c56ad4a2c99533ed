use std::collections::BTreeSet;

use crate::domain::repository::{BoardRepository, PinRepository, UserRepository};
use crate::domain::types::{NewPin, PIN_TITLE_MAX_LEN, Pin, PinChanges};
use crate::error::PinboardError;
use crate::usecase::{check_max_len, check_not_blank};

fn check_title(title: &str) -> Result<(), PinboardError> {
    check_not_blank("title", title)?;
    check_max_len("title", title, PIN_TITLE_MAX_LEN)
}

async fn owned_pin<P: PinRepository>(
    pins: &P,
    actor_id: i32,
    pin_id: i32,
) -> Result<Pin, PinboardError> {
    let pin = pins
        .find_by_id(pin_id)
        .await?
        .ok_or(PinboardError::PinNotFound(pin_id))?;
    if pin.user_id != actor_id {
        return Err(PinboardError::Forbidden("You are not allowed to change this pin."));
    }
    Ok(pin)
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreatePinInput {
    pub pin: NewPin,
    /// Optionally save the new pin straight into one of the owner's boards.
    pub board_id: Option<i32>,
}

pub struct CreatePinUseCase<P, B>
where
    P: PinRepository,
    B: BoardRepository,
{
    pub pins: P,
    pub boards: B,
}

impl<P, B> CreatePinUseCase<P, B>
where
    P: PinRepository,
    B: BoardRepository,
{
    pub async fn execute(&self, input: CreatePinInput) -> Result<Pin, PinboardError> {
        check_title(&input.pin.title)?;

        let board = match input.board_id {
            Some(id) => {
                let board = self
                    .boards
                    .find_by_id(id)
                    .await?
                    .ok_or(PinboardError::BoardNotFound)?;
                if board.user_id != input.pin.user_id {
                    return Err(PinboardError::Forbidden(
                        "You are not allowed to save into this board.",
                    ));
                }
                Some(board)
            }
            None => None,
        };

        let pin = self.pins.create(&input.pin).await?;
        if let Some(board) = board {
            self.boards.add_pin(board.id, pin.id).await?;
        }
        tracing::info!(user_id = pin.user_id, pin_id = pin.id, "pin created");
        Ok(pin)
    }
}

// ── Read ─────────────────────────────────────────────────────────────────────

pub struct GetPinUseCase<P: PinRepository> {
    pub pins: P,
}

impl<P: PinRepository> GetPinUseCase<P> {
    pub async fn execute(&self, id: i32) -> Result<Pin, PinboardError> {
        self.pins
            .find_by_id(id)
            .await?
            .ok_or(PinboardError::PinNotFound(id))
    }

    /// Like [`execute`](Self::execute) but pins of other users read as missing.
    pub async fn owned(&self, owner_id: i32, id: i32) -> Result<Pin, PinboardError> {
        let pin = self.execute(id).await?;
        if pin.user_id != owner_id {
            return Err(PinboardError::PinNotFound(id));
        }
        Ok(pin)
    }
}

pub struct ListPinsUseCase<P: PinRepository> {
    pub pins: P,
}

impl<P: PinRepository> ListPinsUseCase<P> {
    /// Newest first.
    pub async fn execute(&self, page: u64, per_page: u64) -> Result<(Vec<Pin>, u64), PinboardError> {
        self.pins.list(page, per_page).await
    }

    pub async fn by_owner(&self, owner_id: i32) -> Result<Vec<Pin>, PinboardError> {
        self.pins.list_by_owner(owner_id).await
    }

    pub async fn by_board(&self, board_id: i32) -> Result<Vec<Pin>, PinboardError> {
        self.pins.list_by_board(board_id).await
    }
}

pub struct PinsByUsernameUseCase<U, P>
where
    U: UserRepository,
    P: PinRepository,
{
    pub users: U,
    pub pins: P,
}

impl<U, P> PinsByUsernameUseCase<U, P>
where
    U: UserRepository,
    P: PinRepository,
{
    pub async fn execute(&self, username: &str) -> Result<Vec<Pin>, PinboardError> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(PinboardError::UserNotFound)?;
        self.pins.list_by_owner(user.id).await
    }
}

// ── Update / delete ──────────────────────────────────────────────────────────

pub struct UpdatePinUseCase<P: PinRepository> {
    pub pins: P,
}

impl<P: PinRepository> UpdatePinUseCase<P> {
    pub async fn execute(
        &self,
        actor_id: i32,
        pin_id: i32,
        changes: PinChanges,
    ) -> Result<Pin, PinboardError> {
        owned_pin(&self.pins, actor_id, pin_id).await?;
        if let Some(title) = &changes.title {
            check_title(title)?;
        }
        let pin = self.pins.update(pin_id, &changes).await?;
        tracing::info!(user_id = actor_id, pin_id, "pin updated");
        Ok(pin)
    }
}

pub struct DeletePinUseCase<P: PinRepository> {
    pub pins: P,
}

impl<P: PinRepository> DeletePinUseCase<P> {
    pub async fn execute(&self, actor_id: i32, pin_id: i32) -> Result<Pin, PinboardError> {
        let pin = owned_pin(&self.pins, actor_id, pin_id).await?;
        self.pins.delete(pin_id).await?;
        tracing::info!(user_id = actor_id, pin_id, "pin deleted");
        Ok(pin)
    }
}

// ── Related pins ─────────────────────────────────────────────────────────────

/// Pins sharing at least one board with the given pin, excluding the pin itself.
///
/// Scans every board membership, so cost grows with boards × pins per board.
pub struct RelatedPinsUseCase<B, P>
where
    B: BoardRepository,
    P: PinRepository,
{
    pub boards: B,
    pub pins: P,
}

impl<B, P> RelatedPinsUseCase<B, P>
where
    B: BoardRepository,
    P: PinRepository,
{
    pub async fn execute(&self, pin_id: i32) -> Result<Vec<Pin>, PinboardError> {
        let memberships = self.boards.memberships().await?;
        let mut related: BTreeSet<i32> = memberships
            .iter()
            .filter(|m| m.pin_ids.contains(&pin_id))
            .flat_map(|m| m.pin_ids.iter().copied())
            .collect();
        related.remove(&pin_id);

        if related.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i32> = related.into_iter().collect();
        self.pins.find_many(&ids).await
    }
}
