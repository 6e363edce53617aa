use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::ThreadId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub author: Author,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    /// Medication notes attached to assistant replies.
    #[serde(default)]
    pub notes: Vec<String>,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Author::User,
            text: text.into(),
            sent_at,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>, sent_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Author::Assistant,
            text: text.into(),
            sent_at,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_notes(mut self, notes: Vec<String>) -> Self {
        self.notes = notes;
        self
    }

    #[must_use]
    pub fn is_from_user(&self) -> bool {
        self.author == Author::User
    }
}

/// Ordered messages exchanged on one agent thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    thread_id: ThreadId,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    #[must_use]
    pub fn new(thread_id: ThreadId) -> Self {
        Self {
            thread_id,
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

/// Static reference entry for a medication the assistant recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedicationInfo {
    pub name: &'static str,
    pub class: &'static str,
    pub note: &'static str,
}

impl MedicationInfo {
    #[must_use]
    pub fn summary(&self) -> String {
        format!("{} ({}): {}", self.name, self.class, self.note)
    }
}

const MEDICATIONS: &[MedicationInfo] = &[
    MedicationInfo {
        name: "Aspirin",
        class: "antiplatelet",
        note: "may need to be paused before procedures; ask your coordinator first",
    },
    MedicationInfo {
        name: "Atorvastatin",
        class: "statin",
        note: "usually taken once daily; report unexplained muscle pain",
    },
    MedicationInfo {
        name: "Ibuprofen",
        class: "NSAID",
        note: "can interact with blood thinners and affect kidney labs",
    },
    MedicationInfo {
        name: "Insulin",
        class: "hormone",
        note: "log doses and glucose readings before study visits",
    },
    MedicationInfo {
        name: "Lisinopril",
        class: "ACE inhibitor",
        note: "keep a consistent dosing time on blood pressure visit days",
    },
    MedicationInfo {
        name: "Metformin",
        class: "biguanide",
        note: "often held before contrast imaging; confirm with the study team",
    },
    MedicationInfo {
        name: "Warfarin",
        class: "anticoagulant",
        note: "requires INR monitoring; report any dose change to your coordinator",
    },
];

/// Medications named in `text`, matched case-insensitively on whole words,
/// in table order and without duplicates.
#[must_use]
pub fn detect_medications(text: &str) -> Vec<&'static MedicationInfo> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    MEDICATIONS
        .iter()
        .filter(|med| {
            let name = med.name.to_lowercase();
            words.iter().any(|w| *w == name)
        })
        .collect()
}

/// Typing delay before an assistant reply is shown: a base pause plus a
/// per-character cost, capped. Jitter is added by the caller.
#[must_use]
pub fn typing_delay(reply: &str) -> Duration {
    const BASE_MS: u64 = 400;
    const PER_CHAR_MS: u64 = 15;
    const MAX_MS: u64 = 2_500;
    let chars = reply.chars().count() as u64;
    Duration::from_millis((BASE_MS + chars * PER_CHAR_MS).min(MAX_MS))
}
