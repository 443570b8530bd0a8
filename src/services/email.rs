//! Email sink backed by SMTP (lettre)

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
    services::notifications::EmailSink,
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("ReadOps Library");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            // Use STARTTLS for secure connection
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(
                username.clone(),
                password.clone(),
            ))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl EmailSink for EmailService {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        self.send_email(to, subject, body)
    }
}
