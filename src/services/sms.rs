//! SMS sink backed by an HTTP gateway.
//!
//! The provider is selected by configuration: "textlocal" or "fast2sms"
//! go over the wire, anything else logs the message and reports success
//! (mock mode, the default).

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::SmsConfig,
    error::{AppError, AppResult},
    services::notifications::SmsSink,
};

#[derive(Clone)]
pub struct SmsService {
    config: SmsConfig,
    client: Client,
}

/// Strip formatting from a phone number and prefix the Indian country code
/// to bare 10-digit numbers.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 && !digits.starts_with("91") {
        format!("91{}", digits)
    } else {
        digits
    }
}

impl SmsService {
    pub fn new(config: SmsConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Internal("SMS API key not configured".to_string()))
    }

    async fn send_textlocal(&self, phone: &str, message: &str) -> AppResult<()> {
        let response = self
            .client
            .post("https://api.textlocal.in/send/")
            .form(&[
                ("apikey", self.api_key()?),
                ("numbers", phone),
                ("message", message),
                ("sender", &self.config.sender),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("TextLocal request failed: {}", e)))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("TextLocal response unreadable: {}", e)))?;

        if body["status"] == "success" {
            Ok(())
        } else {
            Err(AppError::Internal(format!(
                "TextLocal rejected the message: {}",
                body
            )))
        }
    }

    async fn send_fast2sms(&self, phone: &str, message: &str) -> AppResult<()> {
        let response = self
            .client
            .post("https://www.fast2sms.com/dev/bulk")
            .header("authorization", self.api_key()?)
            .form(&[
                ("route", "q"),
                ("numbers", phone),
                ("message", message),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Fast2SMS request failed: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Internal(format!(
                "Fast2SMS rejected the message: HTTP {}",
                response.status()
            )))
        }
    }
}

#[async_trait]
impl SmsSink for SmsService {
    async fn send(&self, to: &str, body: &str) -> AppResult<()> {
        if !self.config.enabled {
            tracing::debug!("SMS disabled, dropping message to {}", to);
            return Ok(());
        }

        let phone = normalize_phone(to);

        match self.config.provider.as_str() {
            "textlocal" => self.send_textlocal(&phone, body).await,
            "fast2sms" => self.send_fast2sms(&phone, body).await,
            _ => {
                tracing::info!(to = %phone, sender = %self.config.sender, "SMS (mock mode): {}", body);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_formatting() {
        assert_eq!(normalize_phone("98765-43210"), "919876543210");
        assert_eq!(normalize_phone("+91 98765 43210"), "919876543210");
        assert_eq!(normalize_phone("9876543210"), "919876543210");
    }

    #[test]
    fn normalize_keeps_prefixed_numbers() {
        assert_eq!(normalize_phone("919876543210"), "919876543210");
        // 10 digits already starting with 91 are left alone
        assert_eq!(normalize_phone("9198765432"), "9198765432");
    }
}
