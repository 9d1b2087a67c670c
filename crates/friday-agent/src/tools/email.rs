use super::{required_str, Tool, ToolError};
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::{json, Value};
use std::fmt;

const SMTP_HOST: &str = "smtp.gmail.com";

/// Gmail account used to send email on the user's behalf.
#[derive(Clone)]
pub struct MailCredentials {
    pub user: String,
    pub app_password: String,
}

impl fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailCredentials")
            .field("user", &self.user)
            .field("app_password", &"[REDACTED]")
            .finish()
    }
}

impl MailCredentials {
    /// Reads `GMAIL_USER` and `GMAIL_APP_PASSWORD`; `None` unless both are set.
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        Some(Self {
            user: read("GMAIL_USER")?.trim().to_string(),
            app_password: read("GMAIL_APP_PASSWORD")?,
        })
    }
}

/// Sends an email through Gmail SMTP.
#[derive(Debug, Clone)]
pub struct SendEmail {
    credentials: Option<MailCredentials>,
}

impl SendEmail {
    pub fn new(credentials: Option<MailCredentials>) -> Self {
        Self { credentials }
    }

    fn build_message(
        &self,
        credentials: &MailCredentials,
        args: &Value,
    ) -> Result<Message, ToolError> {
        let parse = |field: &str, value: &str| {
            value.parse::<Mailbox>().map_err(|e| {
                ToolError::InvalidArguments(format!("invalid {} address '{}': {}", field, value, e))
            })
        };

        let mut builder = Message::builder()
            .from(parse("sender", credentials.user.as_str())?)
            .to(parse("to_email", required_str(args, "to_email")?)?)
            .subject(required_str(args, "subject")?);

        if let Some(cc) = args
            .get("cc_email")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|cc| !cc.is_empty())
        {
            builder = builder.cc(parse("cc_email", cc)?);
        }

        builder
            .body(required_str(args, "message")?.to_string())
            .map_err(|e| ToolError::InvalidArguments(e.to_string()))
    }
}

#[async_trait]
impl Tool for SendEmail {
    fn name(&self) -> &'static str {
        "send_email"
    }

    fn description(&self) -> &'static str {
        "Send an email through Gmail to the given recipient."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "to_email": {"type": "string", "description": "Recipient email address"},
                "subject": {"type": "string", "description": "Email subject line"},
                "message": {"type": "string", "description": "Email body"},
                "cc_email": {"type": "string", "description": "Optional CC address"}
            },
            "required": ["to_email", "subject", "message"]
        })
    }

    async fn call(&self, args: Value) -> Result<String, ToolError> {
        let Some(credentials) = &self.credentials else {
            return Err(ToolError::Unavailable(
                "email sending is not configured: set GMAIL_USER and GMAIL_APP_PASSWORD"
                    .to_string(),
            ));
        };

        let message = self.build_message(credentials, &args)?;
        let recipient = required_str(&args, "to_email")?.to_string();

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(SMTP_HOST)
            .map_err(|e| ToolError::Mail(e.to_string()))?
            .credentials(SmtpCredentials::new(
                credentials.user.clone(),
                credentials.app_password.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| ToolError::Mail(e.to_string()))?;

        Ok(format!("Email sent successfully to {}.", recipient))
    }
}
