//! Confirmation emails: message composition and a dispatch loop over a
//! caller-supplied transport.

use std::convert::Infallible;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::enrich::{FRENCH_TOKENS, signals_both};
use crate::model::Participant;

const FALLBACK_NAME: &str = "participant";

/// Subject and plain-text body of a confirmation email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
}

/// Composes the confirmation for a participant, picking the language from
/// the raw language cell: bilingual when both languages are requested,
/// French when a French token matches, English otherwise.
pub fn compose(language: &str, full_name: &str) -> EmailContent {
    let name = if full_name.trim().is_empty() {
        FALLBACK_NAME
    } else {
        full_name.trim()
    };
    let english = format!(
        "Hello {name},\n\n\
         Welcome to the EEUEZ hackathon! You are registered. \
         We will share your team assignment and workshop details soon.\n\n\
         Stay tuned.\nTeam EEUEZ"
    );
    let french = format!(
        "Bonjour {name},\n\n\
         Bienvenue au hackathon EEUEZ ! Votre inscription est bien prise en compte. \
         Nous vous communiquerons bientot votre equipe et les informations des ateliers.\n\n\
         A tres vite,\nEquipe EEUEZ"
    );

    let lower = language.to_lowercase();
    if signals_both(&lower) {
        EmailContent {
            subject: "EEUEZ Hackathon / Hackathon EEUEZ".to_string(),
            body: format!("{french}\n\n----\n\n{english}"),
        }
    } else if FRENCH_TOKENS.iter().any(|token| lower.contains(token)) {
        EmailContent {
            subject: "Hackathon EEUEZ - Confirmation".to_string(),
            body: french,
        }
    } else {
        EmailContent {
            subject: "EEUEZ Hackathon - Confirmation".to_string(),
            body: english,
        }
    }
}

/// Transport used to deliver confirmations.
pub trait Mailer {
    type Error: Display;

    fn send(&mut self, from: &str, to: &str, content: &EmailContent) -> Result<(), Self::Error>;
}

/// A message handed to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that keeps every message in memory, for later hand-off to the real
/// transport or for previewing.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    pub messages: Vec<OutgoingEmail>,
}

impl Mailer for Outbox {
    type Error = Infallible;

    fn send(&mut self, from: &str, to: &str, content: &EmailContent) -> Result<(), Self::Error> {
        self.messages.push(OutgoingEmail {
            from: from.to_string(),
            to: to.to_string(),
            subject: content.subject.clone(),
            body: content.body.clone(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Skipped,
    Error,
}

/// What happened to one participant during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub status: DeliveryStatus,
    pub email: Option<String>,
    pub name: String,
    pub message: String,
}

/// Summary of a dispatch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub results: Vec<DeliveryOutcome>,
    pub success: usize,
    pub errors: usize,
    /// Participants that were still waiting for a confirmation.
    pub total: usize,
}

/// Picks `requested` when it is one of the allowed senders, `default`
/// otherwise.
pub fn resolve_sender(requested: Option<&str>, allowed: &[String], default: &str) -> String {
    match requested {
        Some(sender) if allowed.iter().any(|a| a == sender) => sender.to_string(),
        _ => default.to_string(),
    }
}

/// Sends a confirmation to every participant whose `email_sent` flag is
/// unset. Returns the participants, in order, with the flag set for every
/// successful delivery.
pub fn dispatch<M: Mailer>(
    participants: Vec<Participant>,
    sender: &str,
    mailer: &mut M,
) -> (Vec<Participant>, DispatchReport) {
    let mut report = DispatchReport::default();

    let participants = participants
        .into_iter()
        .map(|person| {
            if person.email_sent {
                return person;
            }
            report.total += 1;

            let name = if person.full_name.is_empty() {
                "Participant".to_string()
            } else {
                person.full_name.clone()
            };
            if person.email.is_empty() {
                report.results.push(DeliveryOutcome {
                    status: DeliveryStatus::Skipped,
                    email: None,
                    name,
                    message: "no email address".to_string(),
                });
                return person;
            }

            let content = compose(&person.language_raw, &name);
            match mailer.send(sender, &person.email, &content) {
                Ok(()) => {
                    report.success += 1;
                    report.results.push(DeliveryOutcome {
                        status: DeliveryStatus::Sent,
                        email: Some(person.email.clone()),
                        name,
                        message: "sent".to_string(),
                    });
                    person.with_email_sent(true)
                }
                Err(error) => {
                    warn!(email = %person.email, %error, "confirmation delivery failed");
                    report.errors += 1;
                    report.results.push(DeliveryOutcome {
                        status: DeliveryStatus::Error,
                        email: Some(person.email.clone()),
                        name,
                        message: error.to_string(),
                    });
                    person
                }
            }
        })
        .collect();

    info!(
        total = report.total,
        sent = report.success,
        errors = report.errors,
        "confirmation dispatch finished"
    );
    (participants, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{COL_EMAIL, COL_FULL_NAME, COL_LANGUAGE, RawRow, enrich_row};

    fn participant(idx: usize, name: &str, email: &str, language: &str) -> Participant {
        let mut row = RawRow::new();
        row.insert(COL_FULL_NAME.into(), name.into());
        row.insert(COL_EMAIL.into(), email.into());
        row.insert(COL_LANGUAGE.into(), language.into());
        enrich_row(idx, &row)
    }

    struct FailingFor(&'static str);

    impl Mailer for FailingFor {
        type Error = String;

        fn send(
            &mut self,
            _from: &str,
            to: &str,
            _content: &EmailContent,
        ) -> Result<(), String> {
            if to == self.0 {
                Err("mailbox unavailable".to_string())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn compose_picks_language() {
        let french = compose("Francais", "Alice");
        assert_eq!(french.subject, "Hackathon EEUEZ - Confirmation");
        assert!(french.body.starts_with("Bonjour Alice,"));

        let both = compose("Les deux", "");
        assert!(both.body.starts_with("Bonjour participant,"));
        assert!(both.body.contains("Hello participant,"));

        let english = compose("", "Bob");
        assert_eq!(english.subject, "EEUEZ Hackathon - Confirmation");
        assert!(english.body.starts_with("Hello Bob,"));
    }

    #[test]
    fn dispatch_marks_delivered_and_reports_failures() {
        let mut already = participant(3, "Dan", "dan@example.com", "en");
        already.email_sent = true;
        let participants = vec![
            participant(0, "Alice", "alice@example.com", "Francais"),
            participant(1, "", "", "English"),
            participant(2, "Carl", "carl@example.com", "English"),
            already,
        ];

        let (participants, report) =
            dispatch(participants, "noreply@example.com", &mut FailingFor("carl@example.com"));

        assert_eq!(report.total, 3);
        assert_eq!(report.success, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.results[1].status, DeliveryStatus::Skipped);
        assert_eq!(report.results[1].name, "Participant");
        assert_eq!(report.results[2].message, "mailbox unavailable");

        let flags: Vec<bool> = participants.iter().map(|p| p.email_sent).collect();
        assert_eq!(flags, vec![true, false, false, true]);
    }

    #[test]
    fn outbox_collects_messages() {
        let mut outbox = Outbox::default();
        let participants = vec![participant(0, "Alice", "alice@example.com", "Francais")];
        let (_, report) = dispatch(participants, "team@example.com", &mut outbox);
        assert_eq!(report.success, 1);
        assert_eq!(outbox.messages.len(), 1);
        assert_eq!(outbox.messages[0].from, "team@example.com");
        assert_eq!(outbox.messages[0].to, "alice@example.com");
    }

    #[test]
    fn sender_must_be_allowed() {
        let allowed = vec!["a@example.com".to_string()];
        assert_eq!(
            resolve_sender(Some("a@example.com"), &allowed, "d@example.com"),
            "a@example.com"
        );
        assert_eq!(
            resolve_sender(Some("x@example.com"), &allowed, "d@example.com"),
            "d@example.com"
        );
        assert_eq!(resolve_sender(None, &allowed, "d@example.com"), "d@example.com");
    }
}
