use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{QuizView, StatsView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", QuizView)] Quiz {},
        #[route("/stats", StatsView)] Stats {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "TypeDrill" }
            ul {
                li { Link { to: Route::Quiz {}, "Practice" } }
                li { Link { to: Route::Stats {}, "Statistics" } }
            }
        }
    }
}
