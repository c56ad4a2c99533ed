use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::PinboardConfig;
use crate::infra::db::{
    DbApiTokenRepository, DbBoardRepository, DbCommentRepository, DbFollowRepository,
    DbPinRepository, DbProfileRepository, DbResetRequestRepository, DbUserRepository,
};
use crate::infra::mailer::AppMailer;
use crate::infra::media::MediaStore;
use crate::security::activation::ActivationTokens;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: AppMailer,
    pub activation: ActivationTokens,
    pub media: MediaStore,
    pub config: Arc<PinboardConfig>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: PinboardConfig) -> Self {
        Self {
            db,
            mailer: AppMailer::from_config(
                config.mail_api_url.clone(),
                config.email_host_user.clone(),
            ),
            activation: ActivationTokens::new(&config.secret_key, config.activation_token_ttl_secs),
            media: MediaStore::new(config.media_root.clone()),
            config: Arc::new(config),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn profile_repo(&self) -> DbProfileRepository {
        DbProfileRepository {
            db: self.db.clone(),
        }
    }

    pub fn follow_repo(&self) -> DbFollowRepository {
        DbFollowRepository {
            db: self.db.clone(),
        }
    }

    pub fn reset_repo(&self) -> DbResetRequestRepository {
        DbResetRequestRepository {
            db: self.db.clone(),
        }
    }

    pub fn board_repo(&self) -> DbBoardRepository {
        DbBoardRepository {
            db: self.db.clone(),
        }
    }

    pub fn pin_repo(&self) -> DbPinRepository {
        DbPinRepository {
            db: self.db.clone(),
        }
    }

    pub fn comment_repo(&self) -> DbCommentRepository {
        DbCommentRepository {
            db: self.db.clone(),
        }
    }

    pub fn api_token_repo(&self) -> DbApiTokenRepository {
        DbApiTokenRepository {
            db: self.db.clone(),
        }
    }
}
