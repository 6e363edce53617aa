use codeblue_core::chat::{ChatMessage, Conversation};

use crate::vm::markdown_vm::{markdown_to_html, plain_text_to_html};
use crate::vm::time_fmt::format_clock_time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatBubbleVm {
    pub key: String,
    pub from_user: bool,
    /// Sanitized HTML body.
    pub html: String,
    pub notes: Vec<String>,
    pub time_str: String,
}

impl ChatBubbleVm {
    #[must_use]
    pub fn class(&self) -> &'static str {
        if self.from_user {
            "chat-bubble chat-bubble--user"
        } else {
            "chat-bubble chat-bubble--assistant"
        }
    }
}

impl From<&ChatMessage> for ChatBubbleVm {
    fn from(message: &ChatMessage) -> Self {
        let html = if message.is_from_user() {
            plain_text_to_html(&message.text)
        } else {
            markdown_to_html(&message.text)
        };
        Self {
            key: message.id.to_string(),
            from_user: message.is_from_user(),
            html,
            notes: message.notes.clone(),
            time_str: format_clock_time(message.sent_at),
        }
    }
}

#[must_use]
pub fn map_conversation(conversation: &Conversation) -> Vec<ChatBubbleVm> {
    conversation
        .messages()
        .iter()
        .map(ChatBubbleVm::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeblue_core::model::ThreadId;
    use codeblue_core::time::fixed_now;

    #[test]
    fn assistant_markdown_is_rendered_and_user_text_is_not() {
        let mut conversation = Conversation::new(ThreadId::new("t"));
        conversation.push(ChatMessage::user("**not bold**", fixed_now()));
        conversation.push(
            ChatMessage::assistant("**bold**", fixed_now())
                .with_notes(vec!["Aspirin (antiplatelet): note".to_owned()]),
        );

        let bubbles = map_conversation(&conversation);

        assert_eq!(bubbles.len(), 2);
        assert!(bubbles[0].from_user);
        assert!(!bubbles[0].html.contains("<strong>"));
        assert_eq!(bubbles[0].class(), "chat-bubble chat-bubble--user");
        assert!(bubbles[1].html.contains("<strong>bold</strong>"));
        assert_eq!(bubbles[1].notes.len(), 1);
        assert_eq!(bubbles[1].time_str, "12:00");
    }
}
