use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::auth::otp::OTP_VALIDITY_MINUTES;
use crate::config::Config;

/// Transactional email sender. Sends happen off the request path: a failed
/// delivery is logged, never surfaced to the HTTP caller.
#[derive(Clone)]
pub struct Mailer {
    smtp_server: String,
    smtp_user: String,
    smtp_pass: String,
    from_email: String,
}

impl Mailer {
    pub fn from_config(config: &Config) -> Self {
        Mailer {
            smtp_server: config.smtp_server.clone(),
            smtp_user: config.smtp_user.clone(),
            smtp_pass: config.smtp_pass.clone(),
            from_email: config.from_email.clone(),
        }
    }

    pub fn send_welcome(&self, to: &str, username: &str) {
        let body = format!(
            "Welcome to the job board, {username}!\n\n\
             Your account has been created. Sign in to browse and apply for jobs."
        );
        self.send(to, "Welcome to the job board", body);
    }

    pub fn send_reset_otp(&self, to: &str, otp: &str) {
        let body = format!(
            "Your password reset code is {otp}.\n\n\
             It expires in {OTP_VALIDITY_MINUTES} minutes and can be used once."
        );
        self.send(to, "Password reset code", body);
    }

    fn send(&self, to: &str, subject: &str, body: String) {
        let mailer = self.clone();
        let to = to.to_string();
        let subject = subject.to_string();
        tracing::debug!("sending email to {to}");

        // lettre's SmtpTransport is blocking; run it on the blocking pool and
        // detach so the handler does not wait on SMTP round trips.
        tokio::spawn(async move {
            let result = tokio::task::spawn_blocking(move || mailer.deliver(&to, &subject, body)).await;
            match result {
                Ok(Ok(())) => tracing::debug!("email delivered"),
                Ok(Err(e)) => tracing::error!("could not send email: {e}"),
                Err(e) => tracing::error!("mail task failed to execute: {e}"),
            }
        });
    }

    fn deliver(&self, to: &str, subject: &str, body: String) -> Result<(), String> {
        let email = Message::builder()
            .from(
                format!("Job Board <{}>", self.from_email)
                    .parse()
                    .map_err(|e| format!("bad from address: {e}"))?,
            )
            .to(to.parse().map_err(|e| format!("bad to address: {e}"))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| e.to_string())?;

        let creds = Credentials::new(self.smtp_user.clone(), self.smtp_pass.clone());
        let transport = SmtpTransport::relay(&self.smtp_server)
            .map_err(|e| e.to_string())?
            .credentials(creds)
            .build();

        transport.send(&email).map_err(|e| e.to_string())?;
        Ok(())
    }
}
