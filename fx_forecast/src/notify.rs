//! Reminder mail with the best exchange days

use crate::config::MailConfig;
use crate::error::NotificationError;
use crate::selection::Candidate;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use std::fmt::Write;
use tracing::info;

/// Something that can deliver a reminder to a person
pub trait Notifier {
    fn send_reminder(&self, recipient: &str, candidates: &[Candidate]) -> Result<(), NotificationError>;

    fn name(&self) -> &str;
}

/// Plain-text reminder body
pub struct ReminderTemplate;

impl ReminderTemplate {
    pub const SUBJECT: &'static str = "Your Currency Exchange Reminder";

    pub fn render(candidates: &[Candidate]) -> String {
        let mut body = String::from(
            "Hello,\n\nHere are the top 3 predicted days to exchange your currency:\n\n",
        );
        for candidate in candidates {
            let _ = writeln!(
                body,
                "- {} (Predicted Rate: {:.4})",
                candidate.date().format("%A, %Y-%m-%d"),
                candidate.predicted_rate()
            );
        }
        body.push_str("\nDisclaimer: This is an automated statistical forecast, not financial advice.");
        body
    }
}

/// Sends reminders through an authenticated SMTP relay (implicit TLS)
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &MailConfig) -> Result<Self, NotificationError> {
        let from: Mailbox = config
            .sender_email
            .parse()
            .map_err(|e| NotificationError::Config(format!("Invalid sender address: {}", e)))?;

        let transport = SmtpTransport::relay(&config.smtp_host)
            .map_err(|e| NotificationError::Smtp(format!("SMTP transport error: {}", e)))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.sender_email.clone(),
                config.sender_password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

impl Notifier for SmtpNotifier {
    fn send_reminder(&self, recipient: &str, candidates: &[Candidate]) -> Result<(), NotificationError> {
        if candidates.is_empty() {
            return Err(NotificationError::Empty);
        }

        let to: Mailbox = recipient
            .parse()
            .map_err(|e| NotificationError::Config(format!("Invalid recipient address: {}", e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(ReminderTemplate::SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(ReminderTemplate::render(candidates))
            .map_err(|e| NotificationError::Smtp(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(&email)
            .map_err(|e| NotificationError::Smtp(format!("Failed to send email: {}", e)))?;

        info!(recipient, days = candidates.len(), "reminder sent");
        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}
