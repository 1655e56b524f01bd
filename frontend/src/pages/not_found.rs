use serde_json::json;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::analytics::{payload, use_analytics, AnalyticsEvent};
use crate::Route;

#[function_component(NotFound)]
pub fn not_found() -> Html {
    let analytics = use_analytics();
    let location = use_location();

    {
        let path = location.map(|location| location.path().to_string()).unwrap_or_default();
        use_effect_with_deps(
            move |path: &String| {
                log::info!("No route for {}", path);
                analytics.track_event(
                    AnalyticsEvent::NotFoundViewed,
                    Some(payload(json!({ "path": path }))),
                );
                || ()
            },
            path,
        );
    }

    html! {
        <div class="not-found-page">
            <style>
                {r#"
                    .not-found-page {
                        min-height: 100vh;
                        display: flex;
                        flex-direction: column;
                        align-items: center;
                        justify-content: center;
                        gap: 1rem;
                        background: #0a0a0a;
                        color: #fff;
                    }
                    .not-found-page h1 {
                        font-size: 4rem;
                        margin: 0;
                    }
                    .not-found-page p {
                        color: #999;
                    }
                    .forward-link {
                        color: #7EB2FF;
                        text-decoration: none;
                        font-weight: 600;
                    }
                "#}
            </style>
            <h1>{"404"}</h1>
            <p>{"This page doesn't exist."}</p>
            <Link<Route> to={Route::demo_report()} classes="forward-link">
                {"See a sample revenue leak report"}
            </Link<Route>>
        </div>
    }
}
