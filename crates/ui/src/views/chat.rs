use codeblue_core::chat::Conversation;
use codeblue_core::model::ThreadId;
use dioxus::prelude::*;

use crate::context::AppContext;
use crate::routes::use_current_user;
use crate::vm::map_conversation;

const GREETING: &str = "Ask about your trial, visit preparation or medications.";

#[component]
pub fn ChatView() -> Element {
    let ctx = use_context::<AppContext>();
    let current_user = use_current_user();
    let chat = ctx.chat();
    let mut conversation = use_signal(|| {
        let thread = current_user()
            .map_or_else(|| "chat-guest".to_owned(), |user| format!("chat-{}", user.main_id));
        Conversation::new(ThreadId::new(thread))
    });
    let mut input = use_signal(String::new);
    let mut typing = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let mut send = move || {
        if typing() {
            return;
        }
        let text = input();
        let posted = chat.post_user_message(&mut conversation.write(), &text);
        let posted = match posted {
            Ok(posted) => posted,
            Err(err) => {
                error.set(Some(err.to_string()));
                return;
            }
        };
        input.set(String::new());
        error.set(None);
        typing.set(true);

        let chat = chat.clone();
        let thread_id = conversation.read().thread_id().clone();
        spawn(async move {
            match chat.request_reply(&thread_id, &posted.text).await {
                Ok(reply) => conversation.write().push(reply),
                Err(err) => error.set(Some(err.to_string())),
            }
            typing.set(false);
        });
    };

    let bubbles = map_conversation(&conversation.read());

    rsx! {
        div { class: "page chat",
            h2 { "Assistant" }
            div { class: "chat-log",
                if bubbles.is_empty() {
                    p { class: "muted", "{GREETING}" }
                }
                for bubble in bubbles {
                    div { key: "{bubble.key}", class: bubble.class(),
                        div { class: "chat-text", dangerous_inner_html: "{bubble.html}" }
                        for note in bubble.notes.iter() {
                            p { class: "chat-note", "{note}" }
                        }
                        span { class: "chat-time", "{bubble.time_str}" }
                    }
                }
                if typing() {
                    div { class: "chat-bubble chat-bubble--assistant chat-typing", "Assistant is typing…" }
                }
            }
            if let Some(err) = error() {
                p { class: "section-error", "{err}" }
            }
            form {
                class: "chat-input",
                onsubmit: move |evt: FormEvent| {
                    evt.prevent_default();
                    send();
                },
                input {
                    r#type: "text",
                    placeholder: "Type a message",
                    value: "{input}",
                    oninput: move |evt| input.set(evt.value()),
                }
                button { r#type: "submit", disabled: typing(), "Send" }
            }
        }
    }
}
