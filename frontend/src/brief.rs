use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use serde_json::json;
use thiserror::Error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::analytics::{payload, use_analytics, AnalyticsEvent};
use crate::calculator::CalculatorFormData;
use crate::components::notification::use_toaster;
use crate::config;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BriefId(pub String);

impl fmt::Display for BriefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SaveError {
    #[error("brief was rejected: {0}")]
    Rejected(String),
}

pub type SaveFuture = Pin<Box<dyn Future<Output = Result<BriefId, SaveError>>>>;

/// Persistence seam for calculator briefs.
pub trait SaveBrief {
    fn save(&self, data: CalculatorFormData) -> SaveFuture;
}

/// Stand-in store. Nothing is persisted; every save resolves to the same
/// placeholder id after a short delay. Failures only come from real stores.
pub struct MockBriefStore {
    delay_ms: u32,
}

impl MockBriefStore {
    pub fn new(delay_ms: u32) -> Self {
        Self { delay_ms }
    }
}

impl Default for MockBriefStore {
    fn default() -> Self {
        Self::new(config::SAVE_BRIEF_DELAY_MS)
    }
}

impl SaveBrief for MockBriefStore {
    fn save(&self, data: CalculatorFormData) -> SaveFuture {
        let delay_ms = self.delay_ms;
        Box::pin(async move {
            if delay_ms > 0 {
                TimeoutFuture::new(delay_ms).await;
            }
            log::info!(
                "Mock-saved brief for {} leads/month at ${} average deal",
                data.monthly_leads,
                data.avg_deal_value
            );
            Ok(BriefId(config::MOCK_BRIEF_ID.to_string()))
        })
    }
}

/// Store handle shared through context.
#[derive(Clone)]
pub struct BriefStore(Rc<dyn SaveBrief>);

impl BriefStore {
    pub fn new(store: impl SaveBrief + 'static) -> Self {
        Self(Rc::new(store))
    }

    pub fn save(&self, data: CalculatorFormData) -> SaveFuture {
        self.0.save(data)
    }
}

impl Default for BriefStore {
    fn default() -> Self {
        Self::new(MockBriefStore::default())
    }
}

impl PartialEq for BriefStore {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0) as *const (),
            Rc::as_ptr(&other.0) as *const (),
        )
    }
}

/// Title and description of the toast shown for a save outcome.
pub fn outcome_message(result: &Result<BriefId, SaveError>) -> (String, String) {
    match result {
        Ok(id) => (
            "Brief saved".to_string(),
            format!("Your diagnostic was saved as {}.", id),
        ),
        Err(err) => ("Could not save brief".to_string(), err.to_string()),
    }
}

pub struct UseSaveBrief {
    pub save: Callback<CalculatorFormData>,
    pub pending: bool,
    pub saved: Option<BriefId>,
}

#[hook]
pub fn use_save_brief() -> UseSaveBrief {
    let store = use_context::<BriefStore>().unwrap_or_default();
    let toaster = use_toaster();
    let analytics = use_analytics();
    let pending = use_state(|| false);
    let saved = use_state(|| None::<BriefId>);

    let save = {
        let pending = pending.clone();
        let saved = saved.clone();
        Callback::from(move |data: CalculatorFormData| {
            pending.set(true);
            let store = store.clone();
            let toaster = toaster.clone();
            let analytics = analytics.clone();
            let pending = pending.clone();
            let saved = saved.clone();
            spawn_local(async move {
                let result = store.save(data).await;
                let (title, description) = outcome_message(&result);
                match result {
                    Ok(id) => {
                        toaster.success(title, description);
                        analytics.track_event(
                            AnalyticsEvent::BriefSaved,
                            Some(payload(json!({ "brief_id": id.to_string() }))),
                        );
                        saved.set(Some(id));
                    }
                    Err(err) => {
                        log::warn!("Saving brief failed: {}", err);
                        toaster.error(title, description);
                        analytics.track_event(
                            AnalyticsEvent::BriefSaveFailed,
                            Some(payload(json!({ "error": err.to_string() }))),
                        );
                    }
                }
                pending.set(false);
            });
        })
    };

    UseSaveBrief {
        save,
        pending: *pending,
        saved: (*saved).clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStore;

    impl SaveBrief for FailingStore {
        fn save(&self, _data: CalculatorFormData) -> SaveFuture {
            Box::pin(async { Err::<BriefId, _>(SaveError::Rejected("network down".to_string())) })
        }
    }

    #[test]
    fn mock_store_returns_placeholder_id() {
        let store = BriefStore::new(MockBriefStore::new(0));
        let result = futures::executor::block_on(store.save(CalculatorFormData::default()));
        assert_eq!(result, Ok(BriefId(config::MOCK_BRIEF_ID.to_string())));
    }

    #[test]
    fn mock_store_id_is_fixed_across_inputs() {
        let store = MockBriefStore::new(0);
        let other = CalculatorFormData {
            monthly_leads: 1,
            ..CalculatorFormData::default()
        };
        let a = futures::executor::block_on(store.save(CalculatorFormData::default()));
        let b = futures::executor::block_on(store.save(other));
        assert_eq!(a, b);
    }

    #[test]
    fn mock_store_accepts_zero_leads() {
        let empty = CalculatorFormData {
            monthly_leads: 0,
            ..CalculatorFormData::default()
        };
        let result = futures::executor::block_on(MockBriefStore::new(0).save(empty));
        assert_eq!(result, Ok(BriefId(config::MOCK_BRIEF_ID.to_string())));
    }

    #[test]
    fn failure_message_carries_error_text() {
        let result = futures::executor::block_on(BriefStore::new(FailingStore).save(CalculatorFormData::default()));
        let (title, description) = outcome_message(&result);
        assert_eq!(title, "Could not save brief");
        assert_eq!(description, "brief was rejected: network down");
    }

    #[test]
    fn success_message_mentions_id() {
        let (title, description) = outcome_message(&Ok(BriefId("abc".to_string())));
        assert_eq!(title, "Brief saved");
        assert!(description.contains("abc"));
    }
}
