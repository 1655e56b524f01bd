use serde_json::json;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::AddEventListenerOptions;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::analytics::{payload, use_analytics, AnalyticsEvent};
use crate::config::scroll::NAV_SOLID_THRESHOLD;
use crate::scroll::controller::{use_scroll, ScrollOptions};
use crate::Route;

/// The nav turns solid once the page has scrolled past 15% of the viewport.
pub fn is_solid(scroll_y: f64, viewport_height: f64) -> bool {
    scroll_y > viewport_height * NAV_SOLID_THRESHOLD
}

fn window_is_solid(window: &web_sys::Window) -> bool {
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|height| height.as_f64())
        .unwrap_or(0.0);
    is_solid(scroll_y, viewport)
}

#[function_component(StickyNav)]
pub fn sticky_nav() -> Html {
    let solid = use_state(|| false);
    let navigator = use_navigator();
    let analytics = use_analytics();
    let scroll = use_scroll();

    {
        let solid = solid.clone();
        use_effect_with_deps(
            move |_| {
                let destructor: Box<dyn FnOnce()> = if let Some(window) = web_sys::window() {
                    let callback = Closure::<dyn Fn()>::new({
                        let solid = solid.clone();
                        move || {
                            if let Some(win) = web_sys::window() {
                                solid.set(window_is_solid(&win));
                            }
                        }
                    });
                    let mut options = AddEventListenerOptions::new();
                    options.passive(true);
                    let registered = window
                        .add_event_listener_with_callback_and_add_event_listener_options(
                            "scroll",
                            callback.as_ref().unchecked_ref(),
                            &options,
                        )
                        .is_ok();
                    // Initial position, e.g. after a reload mid-page
                    solid.set(window_is_solid(&window));
                    if registered {
                        Box::new(move || {
                            let _ = window.remove_event_listener_with_callback(
                                "scroll",
                                callback.as_ref().unchecked_ref(),
                            );
                        })
                    } else {
                        log::warn!("Could not listen for scroll events");
                        Box::new(|| ())
                    }
                } else {
                    Box::new(|| ())
                };
                move || {
                    destructor();
                }
            },
            (),
        );
    }

    let on_cta = {
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            analytics.track_event(
                AnalyticsEvent::NavCtaClicked,
                Some(payload(json!({ "destination": Route::demo_report().to_path() }))),
            );
            if let Some(navigator) = &navigator {
                navigator.push(&Route::demo_report());
            }
        })
    };

    let on_how_it_works = {
        let scroll = scroll.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            scroll.reveal(
                "#how-it-works",
                ScrollOptions {
                    offset: Some(-80.0),
                    duration: None,
                },
            );
        })
    };

    let on_logo = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        scroll.scroll_to_top();
    });

    html! {
        <nav class={classes!("top-nav", (*solid).then(|| "solid"))}>
            <style>
                {r#"
                    .top-nav {
                        position: fixed;
                        top: 0;
                        left: 0;
                        right: 0;
                        z-index: 100;
                        background: transparent;
                        transition: background 0.3s ease, box-shadow 0.3s ease;
                    }
                    .top-nav.solid {
                        background: rgba(10, 10, 10, 0.95);
                        box-shadow: 0 4px 20px rgba(0, 0, 0, 0.4);
                    }
                    .nav-content {
                        max-width: 1200px;
                        margin: 0 auto;
                        padding: 1rem 1.5rem;
                        display: flex;
                        align-items: center;
                        justify-content: space-between;
                    }
                    .nav-logo {
                        color: #fff;
                        font-weight: 700;
                        font-size: 1.25rem;
                        text-decoration: none;
                    }
                    .nav-right {
                        display: flex;
                        align-items: center;
                        gap: 1.5rem;
                    }
                    .nav-link {
                        color: #ddd;
                        text-decoration: none;
                    }
                    .nav-cta {
                        background: #7EB2FF;
                        color: #0a0a0a;
                        border: none;
                        padding: 0.6rem 1.2rem;
                        border-radius: 8px;
                        font-weight: 600;
                        cursor: pointer;
                    }
                "#}
            </style>
            <div class="nav-content">
                <a href="#" class="nav-logo" onclick={on_logo}>{"Revenue Leak Diagnostic"}</a>
                <div class="nav-right">
                    <a href="#how-it-works" class="nav-link" onclick={on_how_it_works}>{"How it works"}</a>
                    <button class="nav-cta" onclick={on_cta}>{"Get your diagnostic"}</button>
                </div>
            </div>
        </nav>
    }
}
