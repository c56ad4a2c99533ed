use anyhow::Context as _;
use serde::Serialize;

use crate::domain::repository::Mailer;
use crate::domain::types::Mail;
use crate::error::PinboardError;

#[derive(Serialize)]
struct OutgoingMail<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Posts each mail as JSON to an HTTP relay.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            from,
        }
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, mail: &Mail) -> Result<(), PinboardError> {
        self.client
            .post(&self.endpoint)
            .json(&OutgoingMail {
                from: &self.from,
                to: &mail.to,
                subject: &mail.subject,
                body: &mail.body,
            })
            .send()
            .await
            .context("mail relay request")?
            .error_for_status()
            .context("mail relay rejected message")?;
        Ok(())
    }
}

/// Writes mail to the log instead of sending it. Used when no relay is configured.
#[derive(Clone)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, mail: &Mail) -> Result<(), PinboardError> {
        tracing::info!(to = %mail.to, subject = %mail.subject, body = %mail.body, "mail (not sent)");
        Ok(())
    }
}

#[derive(Clone)]
pub enum AppMailer {
    Http(HttpMailer),
    Log(LogMailer),
}

impl AppMailer {
    pub fn from_config(endpoint: Option<String>, from: String) -> Self {
        match endpoint {
            Some(url) => Self::Http(HttpMailer::new(url, from)),
            None => Self::Log(LogMailer),
        }
    }
}

impl Mailer for AppMailer {
    async fn send(&self, mail: &Mail) -> Result<(), PinboardError> {
        match self {
            Self::Http(m) => m.send(mail).await,
            Self::Log(m) => m.send(mail).await,
        }
    }
}
