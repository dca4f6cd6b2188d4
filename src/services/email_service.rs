use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::SmtpConfig,
    error::{AppError, Result},
};

/// Outbound transactional mail over SMTP. Sends are synchronous with the
/// request; a transport failure surfaces to the caller as a 500.
#[derive(Clone)]
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailService {
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| AppError::ConfigError(format!("Invalid SMTP relay: {}", e)))?
            .port(config.port);

        let transport = if config.username.is_empty() {
            builder.build()
        } else {
            builder
                .credentials(Credentials::new(
                    config.username.clone(),
                    config.password.clone(),
                ))
                .build()
        };

        let from = config
            .from
            .parse()
            .map_err(|_| AppError::ConfigError("Invalid EMAIL_FROM address".to_string()))?;

        Ok(Self { transport, from })
    }

    pub async fn send_verification_email(
        &self,
        to: &str,
        token: &str,
        base_url: &str,
    ) -> Result<()> {
        let link = format!("{}/auth/verify-email?token={}", base_url, token);

        let body = format!(
            "Hello,\n\n\
             Thank you for registering with Wardrobe!\n\n\
             Please click the link below to verify your email address:\n\n\
             {}\n\n\
             If you did not create an account, please ignore this email.\n\n\
             Best regards,\n\
             The Wardrobe Team\n",
            link
        );

        self.send(to, "Verify Your Email - Wardrobe", body).await
    }

    pub async fn send_account_created_email(&self, to: &str, password: &str) -> Result<()> {
        let body = format!(
            "Hello,\n\n\
             An account has been created for you at Wardrobe!\n\n\
             Account details:\n\
             - Email: {}\n\
             - Password: {}\n\n\
             Please keep this information secure. You can now log in to your account.\n\n\
             Best regards,\n\
             The Wardrobe Team\n",
            to, password
        );

        self.send(to, "Your Account Has Been Created - Wardrobe", body)
            .await
    }

    pub async fn send_email_update_confirmation(
        &self,
        to: &str,
        token: &str,
        base_url: &str,
    ) -> Result<()> {
        let link = format!("{}/auth/confirm-email-update?token={}", base_url, token);

        let body = format!(
            "Hello,\n\n\
             You have requested to change the email address on your Wardrobe account.\n\n\
             Please click the link below to confirm this change:\n\n\
             {}\n\n\
             If you did not request this change, please ignore this email.\n\n\
             Best regards,\n\
             The Wardrobe Team\n",
            link
        );

        self.send(to, "Confirm Your Email Update - Wardrobe", body)
            .await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<()> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|_| AppError::BadRequest("Invalid email address".to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::InternalError(format!("Failed to build email: {}", e)))?;

        self.transport.send(message).await.map_err(|e| {
            tracing::error!("Failed to send email to {}: {:?}", to, e);
            AppError::InternalError("Failed to send email".to_string())
        })?;

        tracing::info!("Email sent to {}: {}", to, subject);

        Ok(())
    }
}
