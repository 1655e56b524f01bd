use std::rc::Rc;

use js_sys::{Function, Reflect};
use serde::Serialize;
use serde_json::{Map, Value};
use wasm_bindgen::{JsCast, JsValue};
use yew::prelude::*;

pub type Payload = Map<String, Value>;

/// Everything the funnel reports on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalyticsEvent {
    ReportViewed,
    CalculatorUpdated,
    LeaksExplored,
    BriefSaved,
    BriefSaveFailed,
    ScheduleOpened,
    ScheduleClosed,
    CallScheduled,
    NavCtaClicked,
    ThankYouViewed,
    NotFoundViewed,
}

impl AnalyticsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::ReportViewed => "report_viewed",
            AnalyticsEvent::CalculatorUpdated => "calculator_updated",
            AnalyticsEvent::LeaksExplored => "leaks_explored",
            AnalyticsEvent::BriefSaved => "brief_saved",
            AnalyticsEvent::BriefSaveFailed => "brief_save_failed",
            AnalyticsEvent::ScheduleOpened => "schedule_opened",
            AnalyticsEvent::ScheduleClosed => "schedule_closed",
            AnalyticsEvent::CallScheduled => "call_scheduled",
            AnalyticsEvent::NavCtaClicked => "nav_cta_clicked",
            AnalyticsEvent::ThankYouViewed => "thank_you_viewed",
            AnalyticsEvent::NotFoundViewed => "not_found_viewed",
        }
    }
}

/// Builds a payload from a `json!` object. Anything else becomes an empty payload.
pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Sink for analytics events. Implementations must never panic.
pub trait Reporter {
    fn track(&self, event: AnalyticsEvent, payload: &Payload);
}

pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn track(&self, _event: AnalyticsEvent, _payload: &Payload) {}
}

/// Forwards to `window.analytics.track` when a tracker snippet is loaded,
/// otherwise logs the event at debug level.
pub struct WindowReporter;

enum Sink {
    Missing,
    Found(JsValue, Function),
}

fn find_sink() -> Result<Sink, JsValue> {
    let Some(window) = web_sys::window() else {
        return Ok(Sink::Missing);
    };
    let analytics = Reflect::get(&window, &JsValue::from_str("analytics"))?;
    if analytics.is_undefined() || analytics.is_null() {
        return Ok(Sink::Missing);
    }
    let track = Reflect::get(&analytics, &JsValue::from_str("track"))?;
    match track.dyn_into::<Function>() {
        Ok(track) => Ok(Sink::Found(analytics, track)),
        Err(_) => Ok(Sink::Missing),
    }
}

fn forward(event: AnalyticsEvent, payload: &Payload) -> Result<bool, JsValue> {
    match find_sink()? {
        Sink::Missing => Ok(false),
        Sink::Found(analytics, track) => {
            let props = payload.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;
            track.call2(&analytics, &JsValue::from_str(event.name()), &props)?;
            Ok(true)
        }
    }
}

impl Reporter for WindowReporter {
    fn track(&self, event: AnalyticsEvent, payload: &Payload) {
        match forward(event, payload) {
            Ok(true) => {}
            Ok(false) => log::debug!("[analytics] {} {:?}", event.name(), payload),
            Err(err) => log::debug!("[analytics] {} dropped: {:?}", event.name(), err),
        }
    }
}

/// Reporter handle shared through context.
#[derive(Clone)]
pub struct Analytics(Rc<dyn Reporter>);

impl Analytics {
    pub fn new(reporter: impl Reporter + 'static) -> Self {
        Self(Rc::new(reporter))
    }

    pub fn window() -> Self {
        Self::new(WindowReporter)
    }

    /// Fire and forget.
    pub fn track_event(&self, event: AnalyticsEvent, payload: Option<Payload>) {
        let payload = payload.unwrap_or_default();
        self.0.track(event, &payload);
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new(NoopReporter)
    }
}

impl PartialEq for Analytics {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const (),
            Rc::as_ptr(&other.0) as *const (),
        )
    }
}

#[hook]
pub fn use_analytics() -> Analytics {
    use_context::<Analytics>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(&'static str, Payload)>>,
    }

    impl Reporter for Rc<Recorder> {
        fn track(&self, event: AnalyticsEvent, payload: &Payload) {
            self.seen.borrow_mut().push((event.name(), payload.clone()));
        }
    }

    #[test]
    fn injected_reporter_receives_events() {
        let recorder = Rc::new(Recorder::default());
        let analytics = Analytics::new(recorder.clone());

        analytics.track_event(
            AnalyticsEvent::ScheduleOpened,
            Some(payload(json!({ "report_id": "demo-123" }))),
        );
        analytics.track_event(AnalyticsEvent::ThankYouViewed, None);

        let seen = recorder.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "schedule_opened");
        assert_eq!(seen[0].1["report_id"], "demo-123");
        assert_eq!(seen[1].0, "thank_you_viewed");
        assert!(seen[1].1.is_empty());
    }

    #[test]
    fn default_handle_swallows_any_payload() {
        let analytics = Analytics::default();
        analytics.track_event(AnalyticsEvent::BriefSaveFailed, None);
        analytics.track_event(
            AnalyticsEvent::CalculatorUpdated,
            Some(payload(json!({ "nested": { "list": [1, null, "x"] }, "n": f64::MAX }))),
        );
    }

    #[test]
    fn non_object_payload_is_empty() {
        assert!(payload(json!([1, 2, 3])).is_empty());
        assert!(payload(Value::Null).is_empty());
        assert_eq!(payload(json!({ "a": 1 })).len(), 1);
    }

    #[test]
    fn handles_compare_by_identity() {
        let a = Analytics::default();
        let b = a.clone();
        assert!(a == b);
        assert!(a != Analytics::default());
    }

    #[test]
    fn event_names_are_unique() {
        let events = [
            AnalyticsEvent::ReportViewed,
            AnalyticsEvent::CalculatorUpdated,
            AnalyticsEvent::LeaksExplored,
            AnalyticsEvent::BriefSaved,
            AnalyticsEvent::BriefSaveFailed,
            AnalyticsEvent::ScheduleOpened,
            AnalyticsEvent::ScheduleClosed,
            AnalyticsEvent::CallScheduled,
            AnalyticsEvent::NavCtaClicked,
            AnalyticsEvent::ThankYouViewed,
            AnalyticsEvent::NotFoundViewed,
        ];
        let mut names: Vec<_> = events.iter().map(|event| event.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), events.len());
    }
}
