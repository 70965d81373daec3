//! Lead Submission Messages
//!
//! Deterministic formatting of the two texts produced per submission.

use serde::{Deserialize, Serialize};

/// A submitted project lead. All fields are required strings; no shape
/// validation is applied beyond presence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub email: String,
    pub phone: String,
    pub company: String,
    pub idea: String,
}

/// Acknowledgment addressed to the submitter, returned in the response
pub fn acknowledgment_message(submission: &LeadSubmission) -> String {
    format!(
        "Thank you for sharing your vision with us!\n\n\
         We're excited about your idea for {} and look forward to exploring \
         how we can bring it to life together.\n\n\
         Our team will reach out to you within the next 2 business days to \
         discuss your project in detail. We can't wait to collaborate with you!\n\n\
         Best regards,\nThe Oncode Team",
        submission.company
    )
}

/// Internal notification carrying all submission fields, sent by SMS
pub fn internal_notification(submission: &LeadSubmission) -> String {
    format!(
        "New Project Inquiry:\nCompany: {}\nEmail: {}\nPhone: {}\nIdea: {}",
        submission.company, submission.email, submission.phone, submission.idea
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> LeadSubmission {
        LeadSubmission {
            email: "a@b.com".into(),
            phone: "+15551234567".into(),
            company: "Acme".into(),
            idea: "widget delivery drones".into(),
        }
    }

    #[test]
    fn test_acknowledgment_mentions_company() {
        let message = acknowledgment_message(&submission());
        assert!(message.contains("Acme"));
        assert!(message.starts_with("Thank you for sharing your vision"));
    }

    #[test]
    fn test_internal_notification_carries_all_fields() {
        let body = internal_notification(&submission());
        assert!(body.contains("Company: Acme"));
        assert!(body.contains("Email: a@b.com"));
        assert!(body.contains("Phone: +15551234567"));
        assert!(body.contains("Idea: widget delivery drones"));
    }
}
