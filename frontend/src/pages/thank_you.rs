use yew::prelude::*;
use yew_router::prelude::*;

use crate::analytics::{use_analytics, AnalyticsEvent};
use crate::Route;

#[function_component(ThankYou)]
pub fn thank_you() -> Html {
    let analytics = use_analytics();

    // Scroll to top only on initial mount
    {
        use_effect_with_deps(
            move |_| {
                if let Some(window) = web_sys::window() {
                    window.scroll_to_with_x_and_y(0.0, 0.0);
                }
                analytics.track_event(AnalyticsEvent::ThankYouViewed, None);
                || ()
            },
            (),
        );
    }

    html! {
        <div class="thank-you-page">
            <style>
                {r#"
                    .thank-you-page {
                        min-height: 100vh;
                        display: flex;
                        flex-direction: column;
                        align-items: center;
                        justify-content: center;
                        text-align: center;
                        padding: 8rem 1.5rem 4rem;
                        background: #0a0a0a;
                        color: #fff;
                    }
                    .thank-you-page h1 {
                        font-size: 2.75rem;
                        margin-bottom: 1rem;
                    }
                    .thank-you-page p {
                        color: #bbb;
                        max-width: 560px;
                        margin-bottom: 2rem;
                        font-size: 1.15rem;
                    }
                    .forward-link {
                        color: #7EB2FF;
                        text-decoration: none;
                        font-weight: 600;
                    }
                "#}
            </style>
            <h1>{"You're booked in"}</h1>
            <p>
                {"Thanks for scheduling a strategy call. Check your inbox for the invite; "}
                {"we'll walk through your leak report together and map out the fixes."}
            </p>
            <Link<Route> to={Route::demo_report()} classes="forward-link">
                {"Back to your report"}
            </Link<Route>>
        </div>
    }
}
