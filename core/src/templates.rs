//! The two messages sent for every accepted submission.
//!
//! # Design
//! Everything the visitor typed is escaped before it is placed into HTML.
//! The owner notification carries the visitor as `reply_to` so the owner can
//! answer straight from their inbox.

use crate::types::{ContactRequest, OutboundEmail};

/// Identity used on outgoing mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Envelope `From` address for both messages.
    pub from: String,
    /// Where notifications about new submissions go.
    pub owner_email: String,
    /// Signature on the confirmation email.
    pub owner_name: String,
}

pub fn owner_notification(request: &ContactRequest, sender: &Sender) -> OutboundEmail {
    let name = escape_html(&request.name);
    let email = escape_html(&request.email);
    let message = escape_html(&request.message).replace('\n', "<br>");
    OutboundEmail {
        from: sender.from.clone(),
        to: sender.owner_email.clone(),
        reply_to: Some(request.email.clone()),
        subject: format!("New Contact Form Message from {}", request.name),
        html: format!(
            "<h2>New Contact Form Submission</h2>\n\
             <p><strong>From:</strong> {name} ({email})</p>\n\
             <p><strong>Message:</strong></p>\n\
             <p>{message}</p>\n"
        ),
    }
}

pub fn sender_confirmation(request: &ContactRequest, sender: &Sender) -> OutboundEmail {
    let name = escape_html(&request.name);
    let owner = escape_html(&sender.owner_name);
    OutboundEmail {
        from: sender.from.clone(),
        to: request.email.clone(),
        reply_to: None,
        subject: "Thank you for your message".to_string(),
        html: format!(
            "<h2>Thank you for contacting me!</h2>\n\
             <p>Dear {name},</p>\n\
             <p>I've received your message and will get back to you as soon as possible.</p>\n\
             <p>Best regards,<br>{owner}</p>\n"
        ),
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
