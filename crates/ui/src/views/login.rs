use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use crate::context::AppContext;
use crate::routes::{home_route_for, use_current_user};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SignInState {
    Idle,
    Working,
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut current_user = use_current_user();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut state = use_signal(|| SignInState::Idle);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        if state() == SignInState::Working {
            return;
        }
        let auth = ctx.auth();
        let email_value = email();
        let password_value = password();
        spawn(async move {
            state.set(SignInState::Working);
            match auth.sign_in(&email_value, &password_value).await {
                Ok(user) => {
                    error.set(None);
                    let home = home_route_for(user.user_type);
                    current_user.set(Some(user));
                    navigator.replace(home);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            state.set(SignInState::Idle);
        });
    };

    rsx! {
        div { class: "page page--centered login",
            h1 { "Code Blue" }
            p { class: "login-tagline", "Clinical trials, one step at a time." }

            if let Some(user) = current_user() {
                div { class: "login-resume",
                    p { "Signed in as {user.display_name()}." }
                    Link { class: "button", to: home_route_for(user.user_type), "Continue" }
                }
            }

            form { class: "login-form", onsubmit: submit,
                label { r#for: "login-email", "Email" }
                input {
                    id: "login-email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "login-password", "Password" }
                input {
                    id: "login-password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button {
                    r#type: "submit",
                    disabled: state() == SignInState::Working,
                    if state() == SignInState::Working { "Signing in…" } else { "Sign in" }
                }
            }
            if let Some(message) = error() {
                p { class: "section-error", "{message}" }
            }
        }
    }
}
