use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;

use pinboard_domain::sex::Sex;

use crate::auth::{
    CurrentUser, FlashLevel, LOGIN_PATH, MaybeUser, flash, login_session, logout_session,
};
use crate::domain::types::ProfileChanges;
use crate::error::PinboardError;
use crate::infra::media::{MediaKind, media_url};
use crate::state::AppState;
use crate::usecase::account::{
    ActivateAccountUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
};
use crate::usecase::board::ListBoardsUseCase;
use crate::usecase::follow::{FollowOutcome, FollowUseCase, UnfollowOutcome, UnfollowUseCase};
use crate::usecase::password_reset::{
    ChangePasswordInput, ChangePasswordUseCase, CheckResetGrantUseCase, RequestResetCodeUseCase,
    VerifyResetCodeUseCase,
};
use crate::usecase::pin::ListPinsUseCase;
use crate::usecase::profile::{GetProfileUseCase, ProfilePageUseCase, UpdateProfileUseCase};
use crate::views::templates::{
    BoardCard, ChangePasswordTemplate, Choice, CodeSentTemplate, EditProfileTemplate,
    ForgotPasswordTemplate, HomeTemplate, LoginTemplate, Nav, PinCard, PlaceholderTemplate,
    ProfileTemplate, RegisterTemplate,
};
use crate::views::{MultipartForm, WebResult, nav, profile_path, render, safe_next};

pub const PLACEHOLDER_PATH: &str = "/accounts/placeholder/";
pub const FORGOT_PATH: &str = "/accounts/forgot_pass";

const HOME_PIN_LIMIT: u64 = 50;

// ── GET / ────────────────────────────────────────────────────────────────────

pub async fn home(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
) -> WebResult {
    let usecase = ListPinsUseCase {
        pins: state.pin_repo(),
    };
    let (pins, _) = usecase.execute(0, HOME_PIN_LIMIT).await?;
    render(&HomeTemplate {
        nav: nav(&session, Some(&user)).await,
        pins: pins.iter().map(PinCard::from).collect(),
    })
}

// ── GET|POST /accounts/register/ ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

pub async fn register_page(MaybeUser(user): MaybeUser, session: Session) -> WebResult {
    render(&RegisterTemplate {
        nav: nav(&session, user.as_ref()).await,
        username: String::new(),
        email: String::new(),
        errors: vec![],
    })
}

pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> WebResult {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        mailer: state.mailer.clone(),
        tokens: state.activation.clone(),
        domain: state.config.default_domain.clone(),
    };
    let input = RegisterInput {
        username: form.username.trim().to_owned(),
        email: form.email.trim().to_owned(),
        password1: form.password1,
        password2: form.password2,
    };
    match usecase.execute(input.clone()).await {
        Ok(_) => {
            flash(
                &session,
                FlashLevel::Success,
                "Please confirm your email address to complete the registration.",
            )
            .await;
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        Err(
            e @ (PinboardError::Validation(_)
            | PinboardError::UsernameTaken
            | PinboardError::EmailTaken),
        ) => render(&RegisterTemplate {
            nav: nav(&session, None).await,
            username: input.username,
            email: input.email,
            errors: vec![e.to_string()],
        }),
        Err(e) => Err(e.into()),
    }
}

// ── GET|POST /accounts/login/ ────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub next: String,
}

pub async fn login_page(
    MaybeUser(user): MaybeUser,
    session: Session,
    Query(query): Query<NextQuery>,
) -> WebResult {
    render(&LoginTemplate {
        nav: nav(&session, user.as_ref()).await,
        username: String::new(),
        next: safe_next(query.next.as_deref()).unwrap_or_default().to_owned(),
        errors: vec![],
    })
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> WebResult {
    let usecase = LoginUseCase {
        users: state.user_repo(),
    };
    let input = LoginInput {
        username: form.username.clone(),
        password: form.password,
    };
    match usecase.execute(input).await {
        Ok(user) => {
            login_session(&session, &user).await?;
            let target = safe_next(Some(&form.next)).unwrap_or(PLACEHOLDER_PATH);
            Ok(Redirect::to(target).into_response())
        }
        // Inactive accounts get the same answer as wrong credentials.
        Err(PinboardError::InvalidCredentials | PinboardError::InactiveUser) => {
            render(&LoginTemplate {
                nav: nav(&session, None).await,
                username: form.username,
                next: form.next,
                errors: vec![PinboardError::InvalidCredentials.to_string()],
            })
        }
        Err(e) => Err(e.into()),
    }
}

// ── GET /accounts/logout/ ────────────────────────────────────────────────────

pub async fn logout(session: Session) -> WebResult {
    logout_session(&session).await?;
    Ok(Redirect::to(LOGIN_PATH).into_response())
}

// ── GET /accounts/placeholder/ ───────────────────────────────────────────────

pub async fn placeholder(MaybeUser(user): MaybeUser, session: Session) -> WebResult {
    render(&PlaceholderTemplate {
        nav: nav(&session, user.as_ref()).await,
    })
}

// ── GET /accounts/activate/{uidb64}/{token}/ ─────────────────────────────────

pub async fn activate(
    State(state): State<AppState>,
    session: Session,
    Path((uidb64, token)): Path<(String, String)>,
) -> WebResult {
    let usecase = ActivateAccountUseCase {
        users: state.user_repo(),
        tokens: state.activation.clone(),
    };
    match usecase.execute(&uidb64, &token).await {
        Ok(_) => {
            flash(
                &session,
                FlashLevel::Success,
                "Thank you for your email confirmation. Now you can log in.",
            )
            .await;
            Ok(Redirect::to(LOGIN_PATH).into_response())
        }
        Err(PinboardError::InvalidActivationLink) => {
            flash(&session, FlashLevel::Error, "Activation link is invalid!").await;
            Ok(Redirect::to(PLACEHOLDER_PATH).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// ── GET /accounts/profile/{username} ─────────────────────────────────────────

pub async fn profile(
    viewer: MaybeUser,
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> WebResult {
    let viewer_id = viewer.id();
    let page = ProfilePageUseCase {
        users: state.user_repo(),
        profiles: state.profile_repo(),
        follows: state.follow_repo(),
    }
    .execute(&username, viewer_id)
    .await?;
    let boards = ListBoardsUseCase {
        boards: state.board_repo(),
    }
    .by_owner(page.user.id, viewer_id)
    .await?;
    let pins = ListPinsUseCase {
        pins: state.pin_repo(),
    }
    .by_owner(page.user.id)
    .await?;

    let is_owner = viewer_id == Some(page.user.id);
    render(&ProfileTemplate {
        nav: nav(&session, viewer.0.as_ref()).await,
        photo_url: media_url(&page.profile.photo),
        sex_label: page.profile.sex.label(),
        followers: page.counts.followers,
        following: page.counts.following,
        is_owner,
        followed_by_viewer: page.followed_by_viewer,
        can_follow: viewer_id.is_some() && !is_owner,
        follow_url: format!("/accounts/follow/{}", urlencoding::encode(&page.user.username)),
        unfollow_url: format!("/accounts/unfollow/{}", urlencoding::encode(&page.user.username)),
        boards: boards.iter().map(BoardCard::from).collect(),
        pins: pins.iter().map(PinCard::from).collect(),
        profile: page.profile,
    })
}

// ── GET|POST /accounts/edit_profile ──────────────────────────────────────────

fn sex_choices(selected: Sex) -> Vec<Choice> {
    Sex::ALL
        .into_iter()
        .map(|sex| Choice {
            value: sex.code().to_owned(),
            label: sex.label().to_owned(),
            selected: sex == selected,
        })
        .collect()
}

pub async fn edit_profile_page(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
) -> WebResult {
    let profile = GetProfileUseCase {
        profiles: state.profile_repo(),
    }
    .for_user(user.id)
    .await?;
    render(&EditProfileTemplate {
        nav: nav(&session, Some(&user)).await,
        first_name: profile.first_name,
        last_name: profile.last_name,
        description: profile.description,
        profile_status: profile.profile_status,
        sex_choices: sex_choices(profile.sex),
        errors: vec![],
    })
}

fn profile_changes(form: &MultipartForm) -> Result<ProfileChanges, PinboardError> {
    let sex = form
        .optional("sex")
        .map(|code| {
            code.parse::<Sex>().map_err(|_| {
                PinboardError::Validation(
                    "Select a valid choice. That choice is not one of the available choices."
                        .to_owned(),
                )
            })
        })
        .transpose()?;
    Ok(ProfileChanges {
        first_name: form.optional("first_name"),
        last_name: form.optional("last_name"),
        description: form.optional("description"),
        profile_status: form.optional("profile_status"),
        sex,
        photo: None,
    })
}

pub async fn edit_profile(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> WebResult {
    let form = MultipartForm::read(multipart).await?;
    let profile = GetProfileUseCase {
        profiles: state.profile_repo(),
    }
    .for_user(user.id)
    .await?;

    let outcome = match profile_changes(&form) {
        Ok(mut changes) => {
            if let Some(upload) = form.files.get("photo") {
                let stored = state
                    .media
                    .save(MediaKind::ProfilePhoto, &upload.file_name, &upload.bytes)
                    .await?;
                changes.photo = Some(stored);
            }
            UpdateProfileUseCase {
                profiles: state.profile_repo(),
            }
            .execute(user.id, profile.id, changes)
            .await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(_) => {
            flash(
                &session,
                FlashLevel::Success,
                "Your profile was successfully updated!",
            )
            .await;
            Ok(Redirect::to(&profile_path(&user.username)).into_response())
        }
        Err(PinboardError::Validation(message)) => render(&EditProfileTemplate {
            nav: nav(&session, Some(&user)).await,
            first_name: form.text("first_name"),
            last_name: form.text("last_name"),
            description: form.text("description"),
            profile_status: form.text("profile_status"),
            sex_choices: sex_choices(form.text("sex").parse().unwrap_or(profile.sex)),
            errors: vec![message],
        }),
        Err(e) => Err(e.into()),
    }
}

// ── POST /accounts/follow/{username} ─────────────────────────────────────────

pub async fn follow_user(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> WebResult {
    let usecase = FollowUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let (followed, outcome) = usecase.execute(user.id, &username).await?;
    let text = match outcome {
        FollowOutcome::Followed => format!("Now you are following {}.", followed.username),
        FollowOutcome::AlreadyFollowing => format!("You already follow {}.", followed.username),
    };
    flash(&session, FlashLevel::Info, text).await;
    Ok(Redirect::to(&profile_path(&followed.username)).into_response())
}

// ── POST /accounts/unfollow/{username} ───────────────────────────────────────

pub async fn unfollow_user(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    session: Session,
    Path(username): Path<String>,
) -> WebResult {
    let usecase = UnfollowUseCase {
        users: state.user_repo(),
        follows: state.follow_repo(),
    };
    let (followed, outcome) = usecase.execute(user.id, &username).await?;
    let text = match outcome {
        UnfollowOutcome::Unfollowed => format!("Now you are not following {}.", followed.username),
        UnfollowOutcome::NotFollowing => format!("You do not follow {}.", followed.username),
    };
    flash(&session, FlashLevel::Info, text).await;
    Ok(Redirect::to(&profile_path(&followed.username)).into_response())
}

// ── GET /accounts/forgot_pass ────────────────────────────────────────────────

pub async fn forgot_password(MaybeUser(user): MaybeUser, session: Session) -> WebResult {
    render(&ForgotPasswordTemplate {
        nav: nav(&session, user.as_ref()).await,
    })
}

// ── POST /accounts/sent_otp ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendCodeForm {
    pub email: String,
}

pub async fn send_reset_code(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SendCodeForm>,
) -> WebResult {
    let usecase = RequestResetCodeUseCase {
        users: state.user_repo(),
        resets: state.reset_repo(),
        mailer: state.mailer.clone(),
    };
    let email = form.email.trim();
    match usecase.execute(email).await {
        Ok(_) => render(&CodeSentTemplate {
            nav: nav(&session, None).await,
            email: email.to_owned(),
        }),
        // Unknown addresses get the neutral page.
        Err(PinboardError::UserNotFound) => render(&PlaceholderTemplate { nav: Nav::default() }),
        Err(e) => Err(e.into()),
    }
}

// ── POST /accounts/check_otp ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckCodeForm {
    pub email: String,
    pub otp: String,
}

pub async fn check_reset_code(
    State(state): State<AppState>,
    Form(form): Form<CheckCodeForm>,
) -> WebResult {
    let usecase = VerifyResetCodeUseCase {
        users: state.user_repo(),
        resets: state.reset_repo(),
    };
    match usecase.execute(form.email.trim(), form.otp.trim()).await {
        Ok(grant) => Ok(Redirect::to(&grant.change_password_path()).into_response()),
        Err(PinboardError::InvalidResetCode) => Ok(Redirect::to(FORGOT_PATH).into_response()),
        Err(e) => Err(e.into()),
    }
}

// ── GET|POST /accounts/change_pass/{uidb64}/{token} ──────────────────────────

fn change_password_action(uidb64: &str, code: &str) -> String {
    format!("/accounts/change_pass/{uidb64}/{code}")
}

pub async fn change_password_page(
    State(state): State<AppState>,
    session: Session,
    Path((uidb64, code)): Path<(String, String)>,
) -> WebResult {
    let usecase = CheckResetGrantUseCase {
        users: state.user_repo(),
        resets: state.reset_repo(),
    };
    match usecase.execute(&uidb64, &code).await {
        Ok(_) => render(&ChangePasswordTemplate {
            nav: nav(&session, None).await,
            action: change_password_action(&uidb64, &code),
            errors: vec![],
        }),
        Err(PinboardError::InvalidResetCode) => Ok(Redirect::to(FORGOT_PATH).into_response()),
        Err(e) => Err(e.into()),
    }
}

#[derive(Deserialize)]
pub struct ChangePasswordForm {
    pub new_password1: String,
    pub new_password2: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    Path((uidb64, code)): Path<(String, String)>,
    Form(form): Form<ChangePasswordForm>,
) -> WebResult {
    let usecase = ChangePasswordUseCase {
        users: state.user_repo(),
        resets: state.reset_repo(),
    };
    let input = ChangePasswordInput {
        uidb64: uidb64.clone(),
        code: code.clone(),
        new_password1: form.new_password1,
        new_password2: form.new_password2,
    };
    match usecase.execute(input).await {
        Ok(user) => {
            login_session(&session, &user).await?;
            flash(&session, FlashLevel::Success, "Your password was changed.").await;
            Ok(Redirect::to("/").into_response())
        }
        Err(PinboardError::Validation(message)) => render(&ChangePasswordTemplate {
            nav: nav(&session, None).await,
            action: change_password_action(&uidb64, &code),
            errors: vec![message],
        }),
        Err(PinboardError::InvalidResetCode) => Ok(Redirect::to(FORGOT_PATH).into_response()),
        Err(e) => Err(e.into()),
    }
}
