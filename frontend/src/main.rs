use yew::prelude::*;
use yew_router::prelude::*;
use log::info;

mod config;
mod analytics;
mod brief;
mod calculator;
mod scroll {
    pub mod animator;
    pub mod controller;
}
mod components {
    pub mod leak_bars;
    pub mod notification;
    pub mod schedule_modal;
    pub mod sticky_nav;
}
mod pages {
    pub mod not_found;
    pub mod report;
    pub mod thank_you;
}

use analytics::Analytics;
use brief::BriefStore;
use components::{
    notification::ToastProvider,
    sticky_nav::StickyNav,
};
use pages::{
    not_found::NotFound,
    report::ReportPage,
    thank_you::ThankYou,
};
use scroll::controller::SmoothScrollProvider;

#[derive(Clone, Routable, PartialEq, Debug)]
pub enum Route {
    #[at("/")]
    Root,
    #[at("/report/:id")]
    Report { id: String },
    #[at("/thank-you")]
    ThankYou,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    pub fn demo_report() -> Self {
        Route::Report {
            id: config::DEMO_REPORT_ID.to_string(),
        }
    }
}

/// Sends `/` to the demo report. Runs once, when the root route mounts.
#[function_component(RootRedirect)]
fn root_redirect() -> Html {
    let navigator = use_navigator();

    use_effect_with_deps(
        move |_| {
            if let Some(navigator) = navigator {
                info!("Redirecting / to the demo report");
                navigator.replace(&Route::demo_report());
            }
            || ()
        },
        (),
    );

    html! {}
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Root => {
            info!("Rendering root redirect");
            html! { <RootRedirect /> }
        },
        Route::Report { id } => {
            info!("Rendering Report page for {}", id);
            html! { <ReportPage id={id} /> }
        },
        Route::ThankYou => {
            info!("Rendering Thank You page");
            html! { <ThankYou /> }
        },
        Route::NotFound => {
            info!("Rendering Not Found page");
            html! { <NotFound /> }
        },
    }
}

#[function_component]
fn App() -> Html {
    let analytics = use_state(Analytics::window);
    let brief_store = use_state(BriefStore::default);

    html! {
        <ContextProvider<Analytics> context={(*analytics).clone()}>
            <ContextProvider<BriefStore> context={(*brief_store).clone()}>
                <ToastProvider>
                    <BrowserRouter>
                        <SmoothScrollProvider>
                            <StickyNav />
                            <Switch<Route> render={switch} />
                        </SmoothScrollProvider>
                    </BrowserRouter>
                </ToastProvider>
            </ContextProvider<BriefStore>>
        </ContextProvider<Analytics>>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting application");
    let root = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(config::APP_ELEMENT_ID));
    match root {
        Some(root) => yew::Renderer::<App>::with_root(root).render(),
        None => yew::Renderer::<App>::new().render(),
    };
}
