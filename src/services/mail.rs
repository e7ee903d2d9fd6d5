use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// A plain-text transactional email.
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("message rejected: {0}")]
    Rejected(String),

    #[error("mail service unavailable: {0}")]
    Unavailable(String),
}

/// Hands a message to an email-sending service and returns its message id.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<String, MailError>;
}

/// Writes messages to the log instead of delivering them.
///
/// The default when no provider is wired in.
#[derive(Debug, Default, Clone)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, email: Email) -> Result<String, MailError> {
        if email.to.is_empty() {
            return Err(MailError::Rejected("no recipients".to_owned()));
        }

        let message_id = Uuid::new_v4().to_string();
        tracing::info!(
            message_id = %message_id,
            from = %email.from,
            to = ?email.to,
            reply_to = ?email.reply_to,
            subject = %email.subject,
            "email not delivered, logged only\n{}",
            email.body
        );

        Ok(message_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn email(to: Vec<String>) -> Email {
        Email {
            from: "no-reply@example.com".to_owned(),
            to,
            reply_to: vec![],
            subject: "hello".to_owned(),
            body: "body".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_tracing_mailer_returns_message_id() {
        let id = TracingMailer
            .send(email(vec!["contact@example.com".to_owned()]))
            .await
            .unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_tracing_mailer_requires_recipient() {
        assert!(matches!(
            TracingMailer.send(email(vec![])).await,
            Err(MailError::Rejected(_))
        ));
    }
}
