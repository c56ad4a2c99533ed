use pinboard_server::error::PinboardError;
use pinboard_server::security::activation::ActivationTokens;
use pinboard_server::usecase::account::{
    ACTIVATION_SUBJECT, ActivateAccountUseCase, LoginInput, LoginUseCase, RegisterInput,
    RegisterUseCase,
};

use crate::helpers::{
    FailingMailer, MockUserRepo, RecordingMailer, TEST_PASSWORD, TEST_SECRET, inactive_user,
    test_user,
};

const DOMAIN: &str = "http://pins.test";

fn register_input(username: &str, email: &str) -> RegisterInput {
    RegisterInput {
        username: username.to_owned(),
        email: email.to_owned(),
        password1: "s3cretpass".to_owned(),
        password2: "s3cretpass".to_owned(),
    }
}

fn register_usecase(
    users: MockUserRepo,
    mailer: RecordingMailer,
) -> RegisterUseCase<MockUserRepo, RecordingMailer> {
    RegisterUseCase {
        users,
        mailer,
        tokens: ActivationTokens::new(TEST_SECRET, 3600),
        domain: DOMAIN.to_owned(),
    }
}

/// Pull `/accounts/activate/{uid}/{token}/` parts out of the mail body.
fn activation_parts(body: &str) -> (String, String) {
    let start = body.find("/accounts/activate/").unwrap() + "/accounts/activate/".len();
    let rest = &body[start..];
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let mut parts = rest[..end].trim_end_matches('/').splitn(2, '/');
    (
        parts.next().unwrap().to_owned(),
        parts.next().unwrap().to_owned(),
    )
}

// ── Register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_inactive_user_with_exactly_one_profile() {
    let users = MockUserRepo::empty();
    let profiles = users.profiles_handle();
    let usecase = register_usecase(users, RecordingMailer::default());

    let user = usecase
        .execute(register_input("alice", "alice@example.com"))
        .await
        .unwrap();

    assert!(!user.is_active);
    let profiles = profiles.lock().unwrap();
    assert_eq!(profiles.iter().filter(|p| p.user_id == user.id).count(), 1);
}

#[tokio::test]
async fn should_mail_activation_link() {
    let mailer = RecordingMailer::default();
    let sent = mailer.sent_handle();
    let usecase = register_usecase(MockUserRepo::empty(), mailer);

    usecase
        .execute(register_input("alice", "alice@example.com"))
        .await
        .unwrap();

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert_eq!(sent[0].subject, ACTIVATION_SUBJECT);
    assert!(sent[0].body.contains("http://pins.test/accounts/activate/MQ/"));
}

#[tokio::test]
async fn should_reject_taken_username_and_email() {
    let users = MockUserRepo::new(vec![test_user(1, "alice")]);
    let usecase = register_usecase(users, RecordingMailer::default());

    let result = usecase
        .execute(register_input("alice", "other@example.com"))
        .await;
    assert!(matches!(result, Err(PinboardError::UsernameTaken)));

    let result = usecase
        .execute(register_input("bob", "alice@example.com"))
        .await;
    assert!(matches!(result, Err(PinboardError::EmailTaken)));
}

#[tokio::test]
async fn should_register_even_when_mail_fails() {
    let users = MockUserRepo::empty();
    let handle = users.users_handle();
    let usecase = RegisterUseCase {
        users,
        mailer: FailingMailer,
        tokens: ActivationTokens::new(TEST_SECRET, 3600),
        domain: DOMAIN.to_owned(),
    };

    usecase
        .execute(register_input("alice", "alice@example.com"))
        .await
        .unwrap();
    assert_eq!(handle.lock().unwrap().len(), 1);
}

// ── Activate ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_activate_once_with_mailed_link() {
    let users = MockUserRepo::empty();
    let mailer = RecordingMailer::default();
    let sent = mailer.sent_handle();
    register_usecase(users.clone(), mailer)
        .execute(register_input("alice", "alice@example.com"))
        .await
        .unwrap();
    let (uid, token) = activation_parts(&sent.lock().unwrap()[0].body);

    let activate = ActivateAccountUseCase {
        users: users.clone(),
        tokens: ActivationTokens::new(TEST_SECRET, 3600),
    };
    let user = activate.execute(&uid, &token).await.unwrap();
    assert!(user.is_active);

    let again = activate.execute(&uid, &token).await;
    assert!(matches!(again, Err(PinboardError::InvalidActivationLink)));
}

#[tokio::test]
async fn should_reject_garbage_activation_link() {
    let activate = ActivateAccountUseCase {
        users: MockUserRepo::new(vec![inactive_user(1, "alice")]),
        tokens: ActivationTokens::new(TEST_SECRET, 3600),
    };
    let result = activate.execute("not-base64!", "token").await;
    assert!(matches!(result, Err(PinboardError::InvalidActivationLink)));
    let result = activate.execute("MQ", "token").await;
    assert!(matches!(result, Err(PinboardError::InvalidActivationLink)));
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_log_in_and_stamp_last_login() {
    let users = MockUserRepo::new(vec![test_user(1, "alice")]);
    let handle = users.users_handle();
    let usecase = LoginUseCase { users };

    let user = usecase
        .execute(LoginInput {
            username: "alice".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await
        .unwrap();

    assert!(user.last_login.is_some());
    assert!(handle.lock().unwrap()[0].last_login.is_some());
}

#[tokio::test]
async fn should_reject_wrong_password_and_inactive_user() {
    let users = MockUserRepo::new(vec![test_user(1, "alice"), inactive_user(2, "bob")]);
    let usecase = LoginUseCase { users };

    let wrong = usecase
        .execute(LoginInput {
            username: "alice".to_owned(),
            password: "nope".to_owned(),
        })
        .await;
    assert!(matches!(wrong, Err(PinboardError::InvalidCredentials)));

    let inactive = usecase
        .execute(LoginInput {
            username: "bob".to_owned(),
            password: TEST_PASSWORD.to_owned(),
        })
        .await;
    assert!(matches!(inactive, Err(PinboardError::InactiveUser)));
}
