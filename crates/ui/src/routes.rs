use codeblue_core::model::{User, UserRole};
use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::AppContext;
use crate::views::{
    ChatView, CoordinatorView, DashboardView, LoginView, RecordsView, TimelineView, TrialsView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/", LoginView)] Login {},
    #[layout(Shell)]
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/trials", TrialsView)] Trials {},
        #[route("/timeline/:trial_id", TimelineView)] Timeline { trial_id: String },
        #[route("/records", RecordsView)] Records {},
        #[route("/chat", ChatView)] Chat {},
        #[route("/coordinator", CoordinatorView)] Coordinator {},
}

/// Landing screen for a role.
#[must_use]
pub fn home_route_for(role: UserRole) -> Route {
    match role {
        UserRole::Patient => Route::Dashboard {},
        UserRole::Crc => Route::Coordinator {},
        UserRole::Doctor => Route::Chat {},
    }
}

/// Signed-in user shared by every screen, seeded from the session context.
pub fn provide_current_user(ctx: &AppContext) -> Signal<Option<User>> {
    let session = ctx.session();
    use_context_provider(move || Signal::new(session.current_user()))
}

#[must_use]
pub fn use_current_user() -> Signal<Option<User>> {
    use_context::<Signal<Option<User>>>()
}

#[component]
fn Shell() -> Element {
    let current_user = use_current_user();

    match current_user() {
        Some(user) => rsx! {
            div { class: "app",
                Sidebar { user }
                main { class: "content",
                    Outlet::<Route> {}
                }
            }
        },
        None => rsx! {
            div { class: "page page--centered",
                p { "Your session has ended." }
                Link { class: "button", to: Route::Login {}, "Sign in" }
            }
        },
    }
}

#[component]
fn Sidebar(user: User) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut current_user = use_current_user();
    let mut sign_out_error = use_signal(|| None::<String>);

    let sign_out = move |_| {
        let auth = ctx.auth();
        spawn(async move {
            match auth.sign_out().await {
                Ok(()) => sign_out_error.set(None),
                Err(err) => sign_out_error.set(Some(err.to_string())),
            }
            current_user.set(None);
            navigator.replace(Route::Login {});
        });
    };

    rsx! {
        nav { class: "sidebar",
            h1 { "Code Blue" }
            p { class: "sidebar-user", "{user.display_name()}" }
            p { class: "sidebar-role", "{user.user_type.display_name()}" }
            ul {
                match user.user_type {
                    UserRole::Patient => rsx! {
                        li { Link { to: Route::Dashboard {}, "Dashboard" } }
                        li { Link { to: Route::Trials {}, "Find trials" } }
                        li { Link { to: Route::Records {}, "Medical records" } }
                        li { Link { to: Route::Chat {}, "Assistant" } }
                    },
                    UserRole::Crc => rsx! {
                        li { Link { to: Route::Coordinator {}, "Coordinator" } }
                        li { Link { to: Route::Trials {}, "Trials" } }
                        li { Link { to: Route::Chat {}, "Assistant" } }
                    },
                    UserRole::Doctor => rsx! {
                        li { Link { to: Route::Chat {}, "Assistant" } }
                        li { Link { to: Route::Trials {}, "Trials" } }
                    },
                }
            }
            button { class: "sidebar-signout", onclick: sign_out, "Sign out" }
            if let Some(err) = sign_out_error() {
                p { class: "section-error", "{err}" }
            }
        }
    }
}
