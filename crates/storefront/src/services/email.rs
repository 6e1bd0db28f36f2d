//! Email service for sending verification codes.
//!
//! Uses SMTP via lettre for delivery. Messages are built as multipart
//! plain-text + HTML.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::MultiPart,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use furnspace_core::Email;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay cannot be configured.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_owned(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a signup verification code.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the message cannot be built or delivered.
    pub async fn send_verification_code(&self, to: &Email, code: &str) -> Result<(), EmailError> {
        let (text, html) = verification_code_bodies(code);

        let message = Message::builder()
            .from(self
                .from_address
                .parse()
                .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?)
            .to(to
                .as_str()
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.as_str().to_owned()))?)
            .subject("OTP Verification")
            .multipart(MultiPart::alternative_plain_html(text, html))?;

        self.mailer.send(message).await?;
        tracing::info!(to = %to, "verification code sent");
        Ok(())
    }
}

/// Build the plain-text and HTML bodies for a verification code email.
fn verification_code_bodies(code: &str) -> (String, String) {
    let text = format!(
        "OTP verification for your Furnspace account.\n\n\
         Your verification code is: {code}\n\n\
         The code expires in 10 minutes. If you did not create an account, \
         you can ignore this email.\n"
    );
    let html = format!(
        "<p>OTP verification for your Furnspace account. Please verify your \
         code and enjoy your shop.</p>\
         <p>Your verification code is: <strong>{code}</strong></p>\
         <p>The code expires in 10 minutes. If you did not create an account, \
         you can ignore this email.</p>"
    );
    (text, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bodies_contain_code() {
        let (text, html) = verification_code_bodies("482913");
        assert!(text.contains("482913"));
        assert!(html.contains("<strong>482913</strong>"));
    }
}
