//! Confirmation email templates, one per attendance answer.

use crate::models::AttendanceStatus;

/// Rendered subject and bodies of a confirmation email.
pub struct RsvpEmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl RsvpEmailContent {
    /// Renders the variant matching the guest's answer.
    ///
    /// `first_name` is shown as given, so callers capitalize it first.
    pub fn for_status(
        status: AttendanceStatus,
        first_name: &str,
        couple_name: &str,
        image_url: Option<&str>,
    ) -> Self {
        let (subject, lead, follow_up) = match status {
            AttendanceStatus::Yes => (
                "Confirmation received! 🎉 See you at the wedding!",
                "We are thrilled that you confirmed you will be with us. We can't wait to celebrate with you!",
                "We saved your preferences (any intolerances or notes). If anything changes, just write to us!",
            ),
            AttendanceStatus::No => (
                "Thank you for letting us know",
                "We are sorry you can't make it, and thank you for telling us.",
                "We will miss you and hope to celebrate together another time.",
            ),
            AttendanceStatus::Maybe => (
                "We received your reply",
                "Thanks for your reply! We know you are not sure yet.",
                "When you know more, let us know so we can plan everything for the best.",
            ),
        };

        Self {
            subject: subject.to_string(),
            text: text_template(first_name, lead, follow_up, couple_name),
            html: html_template(first_name, lead, follow_up, couple_name, image_url),
        }
    }
}

fn text_template(first_name: &str, lead: &str, follow_up: &str, couple_name: &str) -> String {
    format!(
        "Hi {}!\n\n{}\n\n{}\n\nSee you soon,\n{}",
        first_name, lead, follow_up, couple_name
    )
}

fn html_template(
    first_name: &str,
    lead: &str,
    follow_up: &str,
    couple_name: &str,
    image_url: Option<&str>,
) -> String {
    let image = image_url
        .map(|url| {
            format!(
                r#"
        <div style="margin: 20px 0; text-align: center;">
            <img src="{}" alt="Thank you" style="max-width: 100%; border-radius: 8px;" />
        </div>"#,
                escape_html(url)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #e0e0e0; border-radius: 10px;">
        <h2 style="color: #333;">Hi {}!</h2>
        <p style="font-size: 16px; color: #555;">{}</p>{}
        <p style="font-size: 14px; color: #777;">{}</p>
        <hr style="border: 0; border-top: 1px solid #eee; margin: 20px 0;" />
        <p style="font-size: 12px; color: #999; text-align: center;">
            See you soon,<br>
            <strong>{}</strong>
        </p>
    </div>"#,
        escape_html(first_name),
        lead,
        image,
        follow_up,
        escape_html(couple_name)
    )
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
