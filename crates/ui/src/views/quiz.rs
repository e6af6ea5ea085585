use std::time::Duration;

use dioxus::document::eval;
use dioxus::prelude::*;

use drill_core::images::image_candidates;
use drill_core::model::{Answer, CatalogItem, Category, Round, Tier, SUB_CATEGORIES};
use services::{GradedRound, QuizSession};

use crate::context::AppContext;
use crate::traits_table::trait_entry;
use crate::views::{view_state_from_resource, ViewError, ViewState};
use crate::vm::{feedback_text, feedback_tone, wing_options};

/// Budget for the best-effort preload race before the next round appears.
/// Latency hiding only: the round renders either way.
const PRELOAD_BUDGET: Duration = Duration::from_millis(1500);

#[derive(Clone, Debug, PartialEq)]
struct ZoomImage {
    url: String,
    title: String,
}

#[derive(Clone, Debug, PartialEq)]
enum AnswerPatch {
    Category(Option<Category>),
    SubCategory(Option<String>),
    Wing(Option<Category>),
}

fn apply_patch(mut session: Signal<Option<QuizSession>>, slot: usize, patch: AnswerPatch) {
    session.with_mut(|maybe| {
        let Some(active) = maybe.as_mut() else {
            return;
        };
        let mut answer = active
            .answers()
            .map_or_else(Answer::empty, |answers| answers[slot].clone());
        match patch {
            AnswerPatch::Category(value) => answer.category = value,
            AnswerPatch::SubCategory(value) => answer.sub_category = value,
            AnswerPatch::Wing(value) => answer.wing = value,
        }
        // A graded round rejects edits; the controls are disabled then anyway.
        let _ = active.set_answer(slot, answer);
    });
}

fn preload_script(urls: &[String]) -> String {
    let urls_js = urls
        .iter()
        .map(|url| format!("{url:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r"await Promise.allSettled([{urls_js}].map((src) => new Promise((resolve) => {{
            const img = new Image();
            img.onload = resolve;
            img.onerror = resolve;
            img.src = src;
        }})));"
    )
}

/// Race the browser-side preload of the round's primary images against the
/// fixed budget and proceed regardless of the outcome.
async fn preload_round(image_base: &url::Url, round: &Round) {
    let urls: Vec<String> = round
        .slots()
        .iter()
        .filter_map(|item| image_candidates(image_base, item).into_iter().next())
        .map(|url| url.to_string())
        .collect();
    if urls.is_empty() {
        return;
    }
    let preload = async {
        let _ = eval(&preload_script(&urls)).await;
    };
    if tokio::time::timeout(PRELOAD_BUDGET, preload).await.is_err() {
        tracing::debug!("image preload exceeded its budget");
    }
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();
    let image_base = ctx.image_base();

    let default_tier = ctx.default_tier();
    let session = use_signal(|| None::<QuizSession>);
    let round = use_signal(|| None::<Round>);
    let mut graded = use_signal(|| None::<GradedRound>);
    let mut action_error = use_signal(|| None::<ViewError>);
    let mut tier = use_signal(move || default_tier);
    let zoom = use_signal(|| None::<ZoomImage>);
    let mut busy = use_signal(|| false);

    let ctx_for_resource = ctx.clone();
    let resource = use_resource(move || {
        let ctx = ctx_for_resource.clone();
        let mut session = session;
        let mut round = round;
        let mut graded = graded;
        let tier = tier;

        async move {
            let items = ctx
                .catalog()
                .fetch()
                .await
                .map_err(|_| ViewError::LoadFailed)?;
            let quiz_loop = ctx.quiz_loop();
            // Peek: switching tiers later must not restart the whole load.
            let start_tier = *tier.peek();
            let mut started = match ctx.rng_seed() {
                Some(seed) => quiz_loop.start_seeded(items, start_tier, seed),
                None => quiz_loop.start(items, start_tier),
            }
            .map_err(|_| ViewError::LoadFailed)?;
            let first = quiz_loop
                .next_round(&mut started)
                .await
                .map_err(|_| ViewError::LoadFailed)?;

            session.set(Some(started));
            round.set(Some(first));
            graded.set(None);
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let on_tier = {
        let mut session = session;
        use_callback(move |next: Tier| {
            tier.set(next);
            session.with_mut(|maybe| {
                if let Some(active) = maybe.as_mut() {
                    active.set_tier(next);
                }
            });
        })
    };

    let on_patch = use_callback(move |(slot, patch): (usize, AnswerPatch)| {
        apply_patch(session, slot, patch);
    });

    let quiz_loop_for_check = quiz_loop.clone();
    let on_check = use_callback(move |()| {
        let quiz_loop = quiz_loop_for_check.clone();
        let mut session = session;
        spawn(async move {
            if busy() {
                return;
            }
            busy.set(true);
            let Some(mut active) = session.write().take() else {
                busy.set(false);
                return;
            };
            let result = quiz_loop.grade_current(&mut active).await;
            *session.write() = Some(active);
            match result {
                Ok(outcome) => {
                    graded.set(Some(outcome));
                    action_error.set(None);
                }
                Err(_) => action_error.set(Some(ViewError::Unknown)),
            }
            busy.set(false);
        });
    });

    let quiz_loop_for_next = quiz_loop.clone();
    let image_base_for_next = image_base.clone();
    let on_next = use_callback(move |()| {
        let quiz_loop = quiz_loop_for_next.clone();
        let image_base = image_base_for_next.clone();
        let mut session = session;
        let mut round = round;
        spawn(async move {
            if busy() {
                return;
            }
            busy.set(true);
            let Some(mut active) = session.write().take() else {
                busy.set(false);
                return;
            };
            let result = quiz_loop.next_round(&mut active).await;
            *session.write() = Some(active);
            match result {
                Ok(next) => {
                    preload_round(&image_base, &next).await;
                    graded.set(None);
                    round.set(Some(next));
                    action_error.set(None);
                }
                Err(_) => action_error.set(Some(ViewError::Unknown)),
            }
            busy.set(false);
        });
    });

    let current_round = round.read().clone();
    let answers = session
        .read()
        .as_ref()
        .and_then(|active| active.answers().cloned())
        .unwrap_or_else(|| [Answer::empty(), Answer::empty()]);
    let grades = graded.read().clone();
    let is_graded = grades.is_some();
    let active_tier = tier();

    rsx! {
        div { class: "page quiz-page",
            header { class: "view-header",
                h2 { class: "view-title", "Typing Practice" }
                p { class: "view-subtitle", "Type both portraits, then check your answers." }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { class: "quiz-loading", "Loading catalog..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "quiz-error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Try again"
                    }
                },
                ViewState::Ready(()) => rsx! {
                    div { class: "tier-switch",
                        for candidate in Tier::ALL {
                            button {
                                class: if candidate == active_tier { "tier-btn tier-btn--active" } else { "tier-btn" },
                                r#type: "button",
                                onclick: move |_| on_tier.call(candidate),
                                "{candidate.label()}"
                            }
                        }
                    }
                    if let Some(err) = *action_error.read() {
                        p { class: "quiz-error", "{err.message()}" }
                    }
                    if let Some(active_round) = current_round {
                        div { class: "quiz-cards",
                            for (slot, item) in active_round.slots().iter().cloned().enumerate() {
                                SlotCard {
                                    key: "{item.folder}-{item.id}",
                                    slot,
                                    item: item.clone(),
                                    answer: answers[slot].clone(),
                                    tier: active_tier,
                                    grade: grades.as_ref().map(|g| g.grades[slot]),
                                    candidates: image_candidates(&image_base, &item)
                                        .iter()
                                        .map(url::Url::to_string)
                                        .collect::<Vec<_>>(),
                                    on_patch,
                                    zoom,
                                }
                            }
                        }
                        div { class: "quiz-actions",
                            if is_graded {
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    disabled: busy(),
                                    onclick: move |_| on_next.call(()),
                                    "Next round"
                                }
                            } else {
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    disabled: busy(),
                                    onclick: move |_| on_check.call(()),
                                    "Check answers"
                                }
                            }
                        }
                    }
                    ZoomOverlay { zoom }
                },
            }
        }
    }
}

#[component]
fn SlotCard(
    slot: usize,
    item: CatalogItem,
    answer: Answer,
    tier: Tier,
    grade: Option<drill_core::grading::SlotGrade>,
    candidates: Vec<String>,
    on_patch: EventHandler<(usize, AnswerPatch)>,
    zoom: Signal<Option<ZoomImage>>,
) -> Element {
    let mut src_index = use_signal(|| 0usize);
    let mut broken = use_signal(|| false);
    let src = candidates.get(src_index()).cloned();
    let candidates_len = candidates.len();

    let graded = grade.is_some();
    let traits = if tier == Tier::Expert {
        None
    } else {
        item.category
            .and_then(|category| trait_entry(&item.sub_category, category))
    };
    let wings = wing_options(answer.category);
    let feedback = grade.map(|grade| {
        let has_wing = item.wing.is_some();
        (
            feedback_tone(grade, tier, has_wing).css_class(),
            feedback_text(grade, tier, has_wing),
        )
    });
    let item_title = item.title.clone();
    let zoom_title = item.title.clone();
    let zoom_src = src.clone();
    let mut zoom = zoom;

    rsx! {
        div { class: "quiz-card",
            div { class: "quiz-card-frame",
                if let Some(src) = src {
                    img {
                        class: "quiz-card-image",
                        src: "{src}",
                        alt: "{item_title}",
                        onclick: move |_| {
                            if let Some(url) = zoom_src.clone() {
                                zoom.set(Some(ZoomImage { url, title: zoom_title.clone() }));
                            }
                        },
                        onerror: move |_| {
                            // One-shot extension toggle; after that the broken
                            // frame is the terminal state.
                            if src_index() + 1 < candidates_len {
                                src_index.set(src_index() + 1);
                            } else {
                                broken.set(true);
                            }
                        },
                    }
                }
                if broken() || candidates_len == 0 {
                    div { class: "quiz-card-broken", "Image unavailable" }
                }
            }

            div { class: "quiz-card-title", "{item_title}" }

            // Type is asked at every tier.
            select {
                class: "quiz-select",
                value: answer.category.map_or(String::new(), |c| c.to_string()),
                onchange: move |evt| {
                    let value = evt.value().parse::<u8>().ok().and_then(Category::new);
                    on_patch.call((slot, AnswerPatch::Category(value)));
                },
                disabled: graded,
                option { value: "", disabled: true, hidden: true, "Select type" }
                for category in Category::ALL {
                    option { value: "{category}", "{category}" }
                }
            }

            if tier.asks_sub_category() {
                select {
                    class: "quiz-select",
                    value: answer.sub_category.clone().unwrap_or_default(),
                    onchange: move |evt| {
                        let value = evt.value();
                        let value = (!value.is_empty()).then_some(value);
                        on_patch.call((slot, AnswerPatch::SubCategory(value)));
                    },
                    disabled: graded,
                    option { value: "", disabled: true, hidden: true, "Select instinct" }
                    for sub in SUB_CATEGORIES {
                        option { value: "{sub}", "{sub}" }
                    }
                }
            }

            // Wing is asked only at expert tier, only for winged items, and
            // only once a type is chosen: the options are that type's wings.
            if tier.asks_wing() && item.wing.is_some() && !wings.is_empty() {
                select {
                    class: "quiz-select",
                    value: answer.wing.map_or(String::new(), |w| w.to_string()),
                    onchange: move |evt| {
                        let value = evt.value().parse::<u8>().ok().and_then(Category::new);
                        on_patch.call((slot, AnswerPatch::Wing(value)));
                    },
                    disabled: graded,
                    option { value: "", disabled: true, hidden: true, "Select wing" }
                    for wing in wings {
                        option { value: "{wing}", "{wing}" }
                    }
                }
            }

            if let Some(entry) = traits {
                details { class: "quiz-traits",
                    summary { "Show type traits" }
                    div { strong { "Side of the ring: " } "{entry.side}" }
                    div { strong { "Gaze: " } "{entry.gaze}" }
                    div { strong { "Build: " } "{entry.build}" }
                    div { strong { "Impression: " } "{entry.impression}" }
                }
            }

            if let Some((tone_class, text)) = feedback {
                p { class: "quiz-feedback {tone_class}", "{text}" }
            }
        }
    }
}

#[component]
fn ZoomOverlay(zoom: Signal<Option<ZoomImage>>) -> Element {
    let current = zoom.read().clone();
    let mut zoom = zoom;
    rsx! {
        if let Some(image) = current {
            div {
                class: "zoom-overlay",
                onclick: move |_| zoom.set(None),
                div {
                    class: "zoom-panel",
                    onclick: move |evt| evt.stop_propagation(),
                    button {
                        class: "zoom-close",
                        r#type: "button",
                        aria_label: "Close",
                        onclick: move |_| zoom.set(None),
                        "×"
                    }
                    img { class: "zoom-image", src: "{image.url}", alt: "{image.title}" }
                }
            }
        }
    }
}
