use std::sync::Arc;
use std::time::Duration;

use codeblue_core::Clock;
use codeblue_core::chat::{ChatMessage, Conversation, detect_medications, typing_delay};
use codeblue_core::model::ThreadId;
use rand::Rng;

use crate::api::AgentApi;
use crate::error::ChatError;

/// Pause before an assistant reply appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    enabled: bool,
    jitter: Duration,
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self {
            enabled: true,
            jitter: Duration::from_millis(300),
        }
    }
}

impl TypingDelay {
    #[must_use]
    pub fn none() -> Self {
        Self {
            enabled: false,
            jitter: Duration::ZERO,
        }
    }

    /// Delay for `reply`, including random jitter.
    #[must_use]
    pub fn for_reply(&self, reply: &str) -> Duration {
        if !self.enabled {
            return Duration::ZERO;
        }
        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let extra = if jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=jitter_ms)
        };
        typing_delay(reply) + Duration::from_millis(extra)
    }
}

/// Talks to the backend agent on behalf of the chat screen.
#[derive(Clone)]
pub struct ChatService {
    agent: Arc<dyn AgentApi>,
    clock: Clock,
    typing: TypingDelay,
}

impl ChatService {
    #[must_use]
    pub fn new(agent: Arc<dyn AgentApi>, clock: Clock) -> Self {
        Self {
            agent,
            clock,
            typing: TypingDelay::default(),
        }
    }

    #[must_use]
    pub fn with_typing_delay(mut self, typing: TypingDelay) -> Self {
        self.typing = typing;
        self
    }

    #[must_use]
    pub fn start(&self, thread_id: ThreadId) -> Conversation {
        Conversation::new(thread_id)
    }

    /// Appends the user's message right away and returns a copy of it.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::EmptyMessage` for blank input; nothing is appended.
    pub fn post_user_message(
        &self,
        conversation: &mut Conversation,
        text: &str,
    ) -> Result<ChatMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let message = ChatMessage::user(text, self.clock.now());
        conversation.push(message.clone());
        Ok(message)
    }

    /// Asks the agent to answer `user_text` and returns the reply once the
    /// typing delay has passed. Medications named by the user are attached to
    /// the reply as notes.
    ///
    /// # Errors
    ///
    /// Returns `ChatError::Agent` when the call fails and
    /// `ChatError::EmptyResponse` for a blank reply.
    pub async fn request_reply(
        &self,
        thread_id: &ThreadId,
        user_text: &str,
    ) -> Result<ChatMessage, ChatError> {
        let reply = self.agent.invoke(thread_id, user_text.trim()).await?;
        let reply = reply.trim();
        if reply.is_empty() {
            return Err(ChatError::EmptyResponse);
        }

        let delay = self.typing.for_reply(reply);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let notes = detect_medications(user_text)
            .into_iter()
            .map(|med| med.summary())
            .collect();
        Ok(ChatMessage::assistant(reply, self.clock.now()).with_notes(notes))
    }

    /// Posts the user's message, waits for the reply and appends it.
    ///
    /// # Errors
    ///
    /// Returns `ChatError` as for [`ChatService::post_user_message`] and
    /// [`ChatService::request_reply`]; the user message stays in the
    /// conversation when the reply fails.
    pub async fn send(
        &self,
        conversation: &mut Conversation,
        text: &str,
    ) -> Result<ChatMessage, ChatError> {
        let posted = self.post_user_message(conversation, text)?;
        let reply = self
            .request_reply(conversation.thread_id(), &posted.text)
            .await?;
        conversation.push(reply.clone());
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codeblue_core::chat::Author;
    use codeblue_core::time::fixed_clock;
    use std::sync::Mutex;

    use crate::api::ApiError;

    struct EchoAgent {
        calls: Mutex<Vec<(String, String)>>,
        reply: Option<String>,
    }

    impl EchoAgent {
        fn replying(reply: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: Some(reply.to_owned()),
            }
        }

        fn failing() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reply: None,
            }
        }
    }

    #[async_trait]
    impl AgentApi for EchoAgent {
        async fn invoke(&self, thread_id: &ThreadId, content: &str) -> Result<String, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push((thread_id.to_string(), content.to_owned()));
            self.reply.clone().ok_or(ApiError::NotFound)
        }
    }

    fn service(agent: Arc<EchoAgent>) -> ChatService {
        ChatService::new(agent, fixed_clock()).with_typing_delay(TypingDelay::none())
    }

    #[tokio::test]
    async fn blank_input_is_rejected_without_calling_agent() {
        let agent = Arc::new(EchoAgent::replying("ok"));
        let chat = service(agent.clone());
        let mut conversation = chat.start(ThreadId::new("t-1"));

        let err = chat.send(&mut conversation, "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyMessage));
        assert!(conversation.messages().is_empty());
        assert!(agent.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reply_follows_user_message_with_medication_notes() {
        let agent = Arc::new(EchoAgent::replying("  Keep taking it as prescribed. "));
        let chat = service(agent.clone());
        let mut conversation = chat.start(ThreadId::new("t-1"));

        let reply = chat
            .send(&mut conversation, "Should I stop Metformin before my visit?")
            .await
            .unwrap();

        assert_eq!(reply.text, "Keep taking it as prescribed.");
        assert_eq!(reply.notes.len(), 1);
        assert!(reply.notes[0].starts_with("Metformin"));
        let authors: Vec<_> = conversation.messages().iter().map(|m| m.author).collect();
        assert_eq!(authors, vec![Author::User, Author::Assistant]);
        assert_eq!(
            agent.calls.lock().unwrap()[0],
            (
                "t-1".to_owned(),
                "Should I stop Metformin before my visit?".to_owned()
            )
        );
    }

    #[tokio::test]
    async fn failed_reply_keeps_user_message() {
        let chat = service(Arc::new(EchoAgent::failing()));
        let mut conversation = chat.start(ThreadId::new("t-2"));

        let err = chat.send(&mut conversation, "hello").await.unwrap_err();
        assert!(matches!(err, ChatError::Agent(_)));
        assert_eq!(conversation.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_delay_holds_the_reply() {
        let chat = ChatService::new(Arc::new(EchoAgent::replying("hi")), fixed_clock())
            .with_typing_delay(TypingDelay::default());
        let started = tokio::time::Instant::now();
        chat.request_reply(&ThreadId::new("t"), "hello").await.unwrap();
        assert!(started.elapsed() >= typing_delay("hi"));
    }

    #[test]
    fn disabled_delay_is_zero() {
        assert_eq!(TypingDelay::none().for_reply("anything"), Duration::ZERO);
    }
}
