use chrono::{Duration, Utc};

use pinboard_server::error::PinboardError;
use pinboard_server::security::password::verify_password;
use pinboard_server::security::uid::encode_uid;
use pinboard_server::usecase::password_reset::{
    ChangePasswordInput, ChangePasswordUseCase, CheckResetGrantUseCase, RESET_CODE_SUBJECT,
    RequestResetCodeUseCase, VerifyResetCodeUseCase,
};

use crate::helpers::{
    FailingMailer, MockResetRepo, MockUserRepo, RecordingMailer, reset_request, test_user,
};

fn change_input(code: &str, password: &str) -> ChangePasswordInput {
    ChangePasswordInput {
        uidb64: encode_uid(1),
        code: code.to_owned(),
        new_password1: password.to_owned(),
        new_password2: password.to_owned(),
    }
}

// ── Request code ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_and_mail_four_digit_code() {
    let resets = MockResetRepo::default();
    let stored = resets.requests_handle();
    let mailer = RecordingMailer::default();
    let sent = mailer.sent_handle();
    let usecase = RequestResetCodeUseCase {
        users: MockUserRepo::new(vec![test_user(1, "alice")]),
        resets,
        mailer,
    };

    let request = usecase.execute("alice@example.com").await.unwrap();

    let code = request.code.clone().unwrap();
    assert_eq!(code.len(), 4);
    assert_eq!(stored.lock().unwrap().len(), 1);
    let sent = sent.lock().unwrap();
    assert_eq!(sent[0].subject, RESET_CODE_SUBJECT);
    assert!(sent[0].body.contains(&code));
}

#[tokio::test]
async fn should_store_request_without_code_when_mail_fails() {
    let resets = MockResetRepo::default();
    let stored = resets.requests_handle();
    let usecase = RequestResetCodeUseCase {
        users: MockUserRepo::new(vec![test_user(1, "alice")]),
        resets,
        mailer: FailingMailer,
    };

    let request = usecase.execute("alice@example.com").await.unwrap();

    assert_eq!(request.code, None);
    assert_eq!(stored.lock().unwrap()[0].code, None);
}

#[tokio::test]
async fn should_report_unknown_email() {
    let usecase = RequestResetCodeUseCase {
        users: MockUserRepo::empty(),
        resets: MockResetRepo::default(),
        mailer: RecordingMailer::default(),
    };
    let result = usecase.execute("ghost@example.com").await;
    assert!(matches!(result, Err(PinboardError::UserNotFound)));
}

// ── Verify code ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_grant_fresh_latest_code() {
    let usecase = VerifyResetCodeUseCase {
        users: MockUserRepo::new(vec![test_user(1, "alice")]),
        resets: MockResetRepo::new(vec![reset_request(1, 1, Some("4821"), Utc::now())]),
    };

    let grant = usecase.execute("alice@example.com", "4821").await.unwrap();

    assert_eq!(grant.uidb64, "MQ");
    assert_eq!(grant.change_password_path(), "/accounts/change_pass/MQ/4821");
}

#[tokio::test]
async fn should_reject_code_older_than_ten_minutes() {
    let issued = Utc::now() - Duration::minutes(11);
    let usecase = VerifyResetCodeUseCase {
        users: MockUserRepo::new(vec![test_user(1, "alice")]),
        resets: MockResetRepo::new(vec![reset_request(1, 1, Some("4821"), issued)]),
    };

    let result = usecase.execute("alice@example.com", "4821").await;
    assert!(matches!(result, Err(PinboardError::InvalidResetCode)));
}

#[tokio::test]
async fn should_only_accept_latest_code() {
    let now = Utc::now();
    let usecase = VerifyResetCodeUseCase {
        users: MockUserRepo::new(vec![test_user(1, "alice")]),
        resets: MockResetRepo::new(vec![
            reset_request(1, 1, Some("1111"), now - Duration::minutes(2)),
            reset_request(2, 1, Some("2222"), now - Duration::minutes(1)),
        ]),
    };

    let old = usecase.execute("alice@example.com", "1111").await;
    assert!(matches!(old, Err(PinboardError::InvalidResetCode)));
    assert!(usecase.execute("alice@example.com", "2222").await.is_ok());
}

#[tokio::test]
async fn should_reject_code_for_unknown_email() {
    let usecase = VerifyResetCodeUseCase {
        users: MockUserRepo::empty(),
        resets: MockResetRepo::default(),
    };
    let result = usecase.execute("ghost@example.com", "1234").await;
    assert!(matches!(result, Err(PinboardError::InvalidResetCode)));
}

// ── Change password ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_change_password_and_mark_request_used() {
    let users = MockUserRepo::new(vec![test_user(1, "alice")]);
    let user_handle = users.users_handle();
    let resets = MockResetRepo::new(vec![reset_request(1, 1, Some("4821"), Utc::now())]);
    let reset_handle = resets.requests_handle();
    let usecase = ChangePasswordUseCase { users, resets };

    let user = usecase
        .execute(change_input("4821", "brand-new-pass"))
        .await
        .unwrap();

    assert!(user.last_login.is_some());
    assert!(verify_password(
        "brand-new-pass",
        &user_handle.lock().unwrap()[0].password_hash
    ));
    assert!(reset_handle.lock().unwrap()[0].is_used);
}

#[tokio::test]
async fn should_keep_password_when_confirmation_differs() {
    let users = MockUserRepo::new(vec![test_user(1, "alice")]);
    let usecase = ChangePasswordUseCase {
        users,
        resets: MockResetRepo::new(vec![reset_request(1, 1, Some("4821"), Utc::now())]),
    };
    let mut input = change_input("4821", "brand-new-pass");
    input.new_password2 = "something-else".to_owned();

    let result = usecase.execute(input).await;
    assert!(matches!(result, Err(PinboardError::Validation(_))));
}

#[tokio::test]
async fn should_reject_grant_with_wrong_code() {
    let usecase = CheckResetGrantUseCase {
        users: MockUserRepo::new(vec![test_user(1, "alice")]),
        resets: MockResetRepo::new(vec![reset_request(1, 1, Some("4821"), Utc::now())]),
    };
    assert!(usecase.execute("MQ", "4821").await.is_ok());
    let result = usecase.execute("MQ", "0000").await;
    assert!(matches!(result, Err(PinboardError::InvalidResetCode)));
    let result = usecase.execute("garbage", "4821").await;
    assert!(matches!(result, Err(PinboardError::InvalidResetCode)));
}
