//! Contracts for the external services the site calls out to.

mod mail;
mod uploads;

pub use mail::{Email, MailError, Mailer, TracingMailer};
pub use uploads::{object_key, StaticUploadSigner, UploadError, UploadSigner};
