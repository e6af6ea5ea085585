use dioxus::prelude::*;

use services::{BucketOverview, StatsOverview};

use crate::context::AppContext;
use crate::views::{view_state_from_resource, ViewError, ViewState};

fn percent(value: Option<f64>) -> String {
    value.map_or_else(
        || "–".to_string(),
        |v| format!("{:.0}%", v * 100.0),
    )
}

#[component]
pub fn StatsView() -> Element {
    let ctx = use_context::<AppContext>();
    let stats_overview = ctx.stats_overview();

    let resource = use_resource(move || {
        let stats_overview = stats_overview.clone();
        async move {
            stats_overview
                .overview()
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page stats-page",
            header { class: "view-header",
                h2 { class: "view-title", "Statistics" }
                p { class: "view-subtitle", "Cumulative accuracy across all practice sessions." }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(overview) => rsx! {
                    StatsTable { overview }
                },
            }
        }
    }
}

#[component]
fn StatsTable(overview: StatsOverview) -> Element {
    let rows = std::iter::once(&overview.overall)
        .chain(overview.tiers.iter())
        .cloned()
        .collect::<Vec<_>>();
    rsx! {
        table { class: "stats-table",
            thead {
                tr {
                    th { "Bucket" }
                    th { "Items" }
                    th { "Fully correct" }
                    th { "Accuracy" }
                    th { "Type" }
                    th { "Instinct" }
                    th { "Wing" }
                }
            }
            tbody {
                for bucket in rows {
                    StatsRow { key: "{bucket.label}", bucket }
                }
            }
        }
    }
}

#[component]
fn StatsRow(bucket: BucketOverview) -> Element {
    let accuracy = percent(bucket.accuracy);
    let category = percent(bucket.category_accuracy);
    let sub_category = percent(bucket.sub_category_accuracy);
    let wing = percent(bucket.wing_accuracy);
    rsx! {
        tr {
            td { class: "stats-label", "{bucket.label}" }
            td { "{bucket.items_total}" }
            td { "{bucket.fully_correct}" }
            td { "{accuracy}" }
            td { "{category}" }
            td { "{sub_category}" }
            td { "{wing}" }
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formats_and_handles_absence() {
        assert_eq!(percent(Some(0.5)), "50%");
        assert_eq!(percent(Some(1.0)), "100%");
        assert_eq!(percent(None), "–");
    }
}
