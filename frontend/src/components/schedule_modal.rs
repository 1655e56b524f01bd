use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::MessageEvent;
use yew::prelude::*;

use crate::config;

/// Message the booking embed posts to the parent window once a call is booked.
const SCHEDULED_MESSAGE: &str = "calendly.event_scheduled";

/// Embed URL for the booking widget, tagged with the host page's domain.
pub fn embed_url(url: &str, embed_domain: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}embed_domain={}&embed_type=PopupWidget",
        url,
        separator,
        urlencoding::encode(embed_domain)
    )
}

/// `scheme://host[:port]` of an absolute URL, the form `MessageEvent.origin` takes.
pub fn origin_of(url: &str) -> Option<&str> {
    let (scheme, rest) = url.split_once("://")?;
    if scheme.is_empty() {
        return None;
    }
    let authority = rest.find(|c| matches!(c, '/' | '?' | '#')).unwrap_or(rest.len());
    if authority == 0 {
        return None;
    }
    Some(&url[..scheme.len() + 3 + authority])
}

/// Only the booking embed's own origin may confirm a booking.
pub fn is_trusted_origin(origin: &str, url: &str) -> bool {
    origin_of(url).map_or(false, |expected| expected.eq_ignore_ascii_case(origin))
}

fn is_scheduled_message(data: &JsValue) -> bool {
    Reflect::get(data, &JsValue::from_str("event"))
        .ok()
        .and_then(|event| event.as_string())
        .map_or(false, |event| event == SCHEDULED_MESSAGE)
}

#[derive(Properties, PartialEq)]
pub struct ScheduleModalProps {
    pub open: bool,
    pub on_close: Callback<()>,
    #[prop_or(AttrValue::Static(config::SCHEDULING_URL))]
    pub url: AttrValue,
    #[prop_or_default]
    pub on_scheduled: Callback<()>,
}

#[function_component(ScheduleModal)]
pub fn schedule_modal(props: &ScheduleModalProps) -> Html {
    // Booking confirmation arrives via postMessage from the embed
    {
        let on_scheduled = props.on_scheduled.clone();
        use_effect_with_deps(
            move |(open, url): &(bool, AttrValue)| {
                let url = url.clone();
                let window = if *open { web_sys::window() } else { None };
                let listener = window.map(|window| {
                    let callback = Closure::<dyn Fn(MessageEvent)>::new(move |event: MessageEvent| {
                        if !is_scheduled_message(&event.data()) {
                            return;
                        }
                        if is_trusted_origin(&event.origin(), &url) {
                            on_scheduled.emit(());
                        } else {
                            log::warn!("Ignoring booking message from {}", event.origin());
                        }
                    });
                    let _ = window
                        .add_event_listener_with_callback("message", callback.as_ref().unchecked_ref());
                    (window, callback)
                });
                move || {
                    if let Some((window, callback)) = listener {
                        let _ = window.remove_event_listener_with_callback(
                            "message",
                            callback.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (props.open, props.url.clone()),
        );
    }

    let anchor = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(config::MODAL_ROOT_ID));
    let Some(anchor) = anchor else {
        return html! {};
    };

    if !props.open {
        return create_portal(html! {}, anchor);
    }

    let host = web_sys::window()
        .and_then(|window| window.location().hostname().ok())
        .unwrap_or_default();
    let src = embed_url(&props.url, &host);

    let close_overlay = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };
    let close_button = close_overlay.clone();
    let keep_open = Callback::from(|e: MouseEvent| e.stop_propagation());

    let modal = html! {
        <div class="schedule-overlay" data-scroll-prevent="" onclick={close_overlay}>
            <style>
                {r#"
                    .schedule-overlay {
                        position: fixed;
                        inset: 0;
                        background: rgba(0, 0, 0, 0.75);
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        z-index: 900;
                    }
                    .schedule-dialog {
                        position: relative;
                        width: min(1000px, 92vw);
                        height: min(720px, 88vh);
                        background: #fff;
                        border-radius: 12px;
                        overflow: hidden;
                    }
                    .schedule-dialog iframe {
                        width: 100%;
                        height: 100%;
                        border: none;
                    }
                    .schedule-close {
                        position: absolute;
                        top: 0.5rem;
                        right: 0.75rem;
                        background: none;
                        border: none;
                        font-size: 1.75rem;
                        cursor: pointer;
                        color: #333;
                    }
                "#}
            </style>
            <div class="schedule-dialog" role="dialog" aria-modal="true" onclick={keep_open}>
                <button class="schedule-close" aria-label="Close" onclick={close_button}>{"×"}</button>
                <iframe src={src} title="Schedule a call"></iframe>
            </div>
        </div>
    };

    create_portal(modal, anchor)
}
