use crate::config::MailConfig;
use crate::form::ContactSubmission;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use lettre::message::MultiPart;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// One outbound email, fully rendered. Constructed per submission, sent once,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub sender: String,
    pub recipient: String,
    pub reply_to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Escape the five HTML-special characters so user-supplied text cannot
/// inject markup into HTML email bodies. Plain-text bodies are never escaped.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render a display-name mailbox like `"Jo" <jo@x.com>`.
///
/// Control characters and quotes are stripped from the name so a submitted
/// contact name cannot break the mailbox syntax or smuggle extra headers.
fn mailbox(name: &str, address: &str) -> String {
    let clean: String = name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    format!("\"{}\" <{}>", clean.trim(), address)
}

/// Build the staff notification: all submitted fields, reply-to pointing at
/// the submitter so staff can answer directly.
pub fn build_staff_notification(
    config: &MailConfig,
    site_name: &str,
    submission: &ContactSubmission,
) -> EmailMessage {
    let subject = format!("New Inquiry — {}", submission.company_name);

    let text_body = format!(
        "New Contact Form Submission\n\
         \n\
         Company Name: {}\n\
         Contact Person: {}\n\
         Email: {}\n\
         \n\
         Project Details:\n\
         {}\n\
         \n\
         ---\n\
         This inquiry was submitted via the website contact form.",
        submission.company_name,
        submission.contact_person,
        submission.email,
        submission.project_details,
    );

    let html_body = format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <body>\n\
         <h2>New Contact Form Submission</h2>\n\
         <p><strong>Company Name:</strong> {}</p>\n\
         <p><strong>Contact Person:</strong> {}</p>\n\
         <p><strong>Email:</strong> <a href=\"mailto:{}\">{}</a></p>\n\
         <p><strong>Project Details:</strong></p>\n\
         <p style=\"white-space: pre-wrap;\">{}</p>\n\
         <hr>\n\
         <p>This inquiry was submitted via the website contact form.</p>\n\
         </body>\n\
         </html>",
        escape_html(&submission.company_name),
        escape_html(&submission.contact_person),
        escape_html(&submission.email),
        escape_html(&submission.email),
        escape_html(&submission.project_details),
    );

    EmailMessage {
        sender: mailbox(site_name, &config.username),
        recipient: config.to_email.clone(),
        reply_to: mailbox(&submission.contact_person, &submission.email),
        subject,
        text_body,
        html_body,
    }
}

/// Build the customer auto-reply: a fixed acknowledgment where the contact
/// person's name is the only user-supplied content.
pub fn build_auto_reply(
    config: &MailConfig,
    site_name: &str,
    submission: &ContactSubmission,
) -> EmailMessage {
    let subject = format!("We received your inquiry — {}", site_name);
    let year = Utc::now().format("%Y");

    let text_body = format!(
        "Hello {},\n\
         \n\
         Thank you for contacting {}. We received your inquiry and will get \
         back to you within 24–48 hours (business days).\n\
         \n\
         Best regards,\n\
         The {} team",
        submission.contact_person, site_name, site_name,
    );

    let html_body = format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <body>\n\
         <h2>{}</h2>\n\
         <p>Hello {},</p>\n\
         <p>Thank you for contacting {}. We received your inquiry and will get \
         back to you within 24&ndash;48 hours (business days).</p>\n\
         <p>Best regards,<br>The {} team</p>\n\
         <hr>\n\
         <p>&copy; {} {}. All rights reserved.</p>\n\
         </body>\n\
         </html>",
        escape_html(site_name),
        escape_html(&submission.contact_person),
        escape_html(site_name),
        escape_html(site_name),
        year,
        escape_html(site_name),
    );

    EmailMessage {
        sender: mailbox(site_name, &config.username),
        recipient: submission.email.clone(),
        reply_to: mailbox(site_name, &config.username),
        subject,
        text_body,
        html_body,
    }
}

/// Outbound mail seam. Production uses SMTP over TLS; tests substitute a
/// recording transport.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Check that the transport can reach and authenticate with the server.
    async fn verify(&self) -> Result<()>;

    /// Deliver one message.
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Creates a transport from request-time mail configuration.
pub trait TransportFactory: Send + Sync {
    fn create(&self, config: &MailConfig) -> Result<Box<dyn MailTransport>>;
}

/// SMTP transport over an implicit-TLS connection with credential auth.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .context("Failed to configure SMTP relay")?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn verify(&self) -> Result<()> {
        let reachable = self
            .transport
            .test_connection()
            .await
            .context("SMTP connection check failed")?;
        if !reachable {
            anyhow::bail!("SMTP server rejected the connection check");
        }
        Ok(())
    }

    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let email = Message::builder()
            .from(message.sender.parse().context("Invalid sender mailbox")?)
            .to(message
                .recipient
                .parse()
                .context("Invalid recipient mailbox")?)
            .reply_to(message.reply_to.parse().context("Invalid reply-to mailbox")?)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .context("Failed to build MIME message")?;

        self.transport
            .send(email)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }
}

/// Production factory: one fresh SMTP transport per request, configured from
/// the environment at request time.
pub struct SmtpFactory;

impl TransportFactory for SmtpFactory {
    fn create(&self, config: &MailConfig) -> Result<Box<dyn MailTransport>> {
        Ok(Box::new(SmtpMailer::new(config)?))
    }
}

/// Deliver the staff notification, then the auto-reply.
///
/// The sends are strictly sequential: the auto-reply does not start until the
/// notification resolves. There is no transaction across the two — if the
/// second send fails the first is not rolled back; the caller reports a
/// generic failure either way.
pub async fn relay_submission(
    transport: &dyn MailTransport,
    notification: &EmailMessage,
    auto_reply: &EmailMessage,
) -> Result<()> {
    transport.verify().await?;
    transport.send(notification).await?;
    transport.send(auto_reply).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> MailConfig {
        MailConfig {
            host: "mail.example.com".to_string(),
            port: 465,
            username: "noreply@example.com".to_string(),
            password: "secret".to_string(),
            to_email: "sales@example.com".to_string(),
        }
    }

    fn test_submission() -> ContactSubmission {
        ContactSubmission {
            company_name: "Acme & Co".to_string(),
            contact_person: "Jo".to_string(),
            email: "jo@x.com".to_string(),
            project_details: "Need 500 t-shirts please".to_string(),
        }
    }

    // ==================== Escaping Tests ====================

    #[test]
    fn test_escape_html_all_specials() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry's"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#039;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_html_plain_text_unchanged() {
        assert_eq!(escape_html("Need 500 t-shirts"), "Need 500 t-shirts");
    }

    #[test]
    fn test_escape_html_ampersand_escaped_exactly_once() {
        assert_eq!(escape_html("A & B"), "A &amp; B");
        // An already-escaped entity is user data here and gets escaped again.
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_mailbox_strips_quotes_and_control_chars() {
        let boxed = mailbox("Jo \"The Bot\"\r\nBcc: x", "jo@x.com");
        assert_eq!(boxed, "\"Jo The BotBcc: x\" <jo@x.com>");
    }

    // ==================== Staff Notification Tests ====================

    #[test]
    fn test_staff_notification_addressing() {
        let msg = build_staff_notification(&test_config(), "Garment Studio", &test_submission());
        assert_eq!(msg.recipient, "sales@example.com");
        assert_eq!(msg.sender, "\"Garment Studio\" <noreply@example.com>");
        assert_eq!(msg.reply_to, "\"Jo\" <jo@x.com>");
    }

    #[test]
    fn test_staff_notification_subject_includes_company() {
        let msg = build_staff_notification(&test_config(), "Garment Studio", &test_submission());
        assert_eq!(msg.subject, "New Inquiry — Acme & Co");
    }

    #[test]
    fn test_staff_notification_html_is_escaped_text_is_not() {
        let msg = build_staff_notification(&test_config(), "Garment Studio", &test_submission());
        assert!(msg.html_body.contains("Acme &amp; Co"));
        assert!(!msg.html_body.contains("Acme & Co"));
        assert!(msg.text_body.contains("Acme & Co"));
    }

    #[test]
    fn test_staff_notification_contains_all_fields() {
        let msg = build_staff_notification(&test_config(), "Garment Studio", &test_submission());
        for body in [&msg.text_body, &msg.html_body] {
            assert!(body.contains("Jo"));
            assert!(body.contains("jo@x.com"));
            assert!(body.contains("Need 500 t-shirts please"));
        }
    }

    #[test]
    fn test_staff_notification_neutralizes_markup() {
        let mut submission = test_submission();
        submission.project_details = "<script>alert(1)</script> details".to_string();
        let msg = build_staff_notification(&test_config(), "Garment Studio", &submission);
        assert!(!msg.html_body.contains("<script>"));
        assert!(msg.html_body.contains("&lt;script&gt;"));
    }

    // ==================== Auto-Reply Tests ====================

    #[test]
    fn test_auto_reply_addressing() {
        let msg = build_auto_reply(&test_config(), "Garment Studio", &test_submission());
        assert_eq!(msg.recipient, "jo@x.com");
        assert_eq!(msg.reply_to, "\"Garment Studio\" <noreply@example.com>");
    }

    #[test]
    fn test_auto_reply_greets_contact_person() {
        let msg = build_auto_reply(&test_config(), "Garment Studio", &test_submission());
        assert!(msg.text_body.contains("Hello Jo,"));
        assert!(msg.html_body.contains("Hello Jo,"));
    }

    #[test]
    fn test_auto_reply_escapes_contact_person_in_html() {
        let mut submission = test_submission();
        submission.contact_person = "Jo <Boss>".to_string();
        let msg = build_auto_reply(&test_config(), "Garment Studio", &submission);
        assert!(msg.html_body.contains("Jo &lt;Boss&gt;"));
        assert!(msg.text_body.contains("Jo <Boss>"));
    }

    #[test]
    fn test_auto_reply_excludes_project_details() {
        let msg = build_auto_reply(&test_config(), "Garment Studio", &test_submission());
        assert!(!msg.text_body.contains("Need 500 t-shirts"));
        assert!(!msg.html_body.contains("Need 500 t-shirts"));
    }

    #[test]
    fn test_auto_reply_footer_has_current_year() {
        let msg = build_auto_reply(&test_config(), "Garment Studio", &test_submission());
        let year = Utc::now().format("%Y").to_string();
        assert!(msg.html_body.contains(&year));
    }
}
