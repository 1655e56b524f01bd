use serde_json::json;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::analytics::{payload, use_analytics, AnalyticsEvent};
use crate::brief::use_save_brief;
use crate::calculator::{annual_loss, calculate_leaks, format_currency, total_monthly_loss, CalculatorFormData};
use crate::components::leak_bars::LeakBars;
use crate::components::schedule_modal::ScheduleModal;
use crate::scroll::controller::{use_scroll, ScrollOptions};
use crate::Route;

#[derive(Clone, Copy, PartialEq)]
enum Field {
    MonthlyLeads,
    AvgDealValue,
    CloseRate,
    ResponseMinutes,
    FollowUpAttempts,
    NoShowRate,
}

impl Field {
    fn name(&self) -> &'static str {
        match self {
            Field::MonthlyLeads => "monthly_leads",
            Field::AvgDealValue => "avg_deal_value",
            Field::CloseRate => "close_rate",
            Field::ResponseMinutes => "response_minutes",
            Field::FollowUpAttempts => "follow_up_attempts",
            Field::NoShowRate => "no_show_rate",
        }
    }

    fn read(&self, data: &CalculatorFormData) -> f64 {
        match self {
            Field::MonthlyLeads => f64::from(data.monthly_leads),
            Field::AvgDealValue => data.avg_deal_value,
            Field::CloseRate => data.close_rate,
            Field::ResponseMinutes => f64::from(data.response_minutes),
            Field::FollowUpAttempts => f64::from(data.follow_up_attempts),
            Field::NoShowRate => data.no_show_rate,
        }
    }

    /// Returns a copy of `data` with this field set, clamped to a sane range.
    fn write(&self, data: &CalculatorFormData, value: f64) -> CalculatorFormData {
        let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
        let count = value.round().min(f64::from(u32::MAX)) as u32;
        let mut next = data.clone();
        match self {
            Field::MonthlyLeads => next.monthly_leads = count,
            Field::AvgDealValue => next.avg_deal_value = value,
            Field::CloseRate => next.close_rate = value.min(100.0),
            Field::ResponseMinutes => next.response_minutes = count,
            Field::FollowUpAttempts => next.follow_up_attempts = count,
            Field::NoShowRate => next.no_show_rate = value.min(100.0),
        }
        next
    }
}

#[derive(Properties, PartialEq)]
struct NumberFieldProps {
    field: Field,
    label: AttrValue,
    value: f64,
    #[prop_or(1.0)]
    step: f64,
    on_change: Callback<(Field, f64)>,
}

#[function_component(NumberField)]
fn number_field(props: &NumberFieldProps) -> Html {
    let oninput = {
        let on_change = props.on_change.clone();
        let field = props.field;
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Ok(value) = input.value().parse::<f64>() {
                on_change.emit((field, value));
            }
        })
    };

    html! {
        <label class="calc-field">
            <span>{ props.label.clone() }</span>
            <input
                type="number"
                min="0"
                step={props.step.to_string()}
                value={props.value.to_string()}
                {oninput}
            />
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub struct ReportProps {
    pub id: String,
}

#[function_component(ReportPage)]
pub fn report_page(props: &ReportProps) -> Html {
    let form = use_state(CalculatorFormData::default);
    let schedule_open = use_state(|| false);
    let analytics = use_analytics();
    let scroll = use_scroll();
    let navigator = use_navigator();
    let brief = use_save_brief();

    {
        let analytics = analytics.clone();
        use_effect_with_deps(
            move |id: &String| {
                if let Some(window) = web_sys::window() {
                    window.scroll_to_with_x_and_y(0.0, 0.0);
                }
                analytics.track_event(
                    AnalyticsEvent::ReportViewed,
                    Some(payload(json!({ "report_id": id }))),
                );
                || ()
            },
            props.id.clone(),
        );
    }

    let leaks = calculate_leaks(&form);
    let monthly = total_monthly_loss(&leaks);
    let annual = annual_loss(&leaks);

    let on_field_change = {
        let form = form.clone();
        let analytics = analytics.clone();
        Callback::from(move |(field, value): (Field, f64)| {
            let next = field.write(&form, value);
            if next != *form {
                analytics.track_event(
                    AnalyticsEvent::CalculatorUpdated,
                    Some(payload(json!({ "field": field.name(), "value": field.read(&next) }))),
                );
                form.set(next);
            }
        })
    };

    let on_explore = {
        let scroll = scroll.clone();
        let analytics = analytics.clone();
        Callback::from(move |_: MouseEvent| {
            analytics.track_event(AnalyticsEvent::LeaksExplored, None);
            scroll.reveal("#leaks", ScrollOptions { offset: Some(-80.0), duration: None });
        })
    };

    let on_save = {
        let form = form.clone();
        let save = brief.save.clone();
        Callback::from(move |_: MouseEvent| save.emit((*form).clone()))
    };

    let on_book = {
        let schedule_open = schedule_open.clone();
        let analytics = analytics.clone();
        let report_id = props.id.clone();
        Callback::from(move |_: MouseEvent| {
            analytics.track_event(
                AnalyticsEvent::ScheduleOpened,
                Some(payload(json!({ "report_id": report_id }))),
            );
            schedule_open.set(true);
        })
    };

    let on_close = {
        let schedule_open = schedule_open.clone();
        let analytics = analytics.clone();
        Callback::from(move |_: ()| {
            analytics.track_event(AnalyticsEvent::ScheduleClosed, None);
            schedule_open.set(false);
        })
    };

    let on_scheduled = {
        let schedule_open = schedule_open.clone();
        let report_id = props.id.clone();
        Callback::from(move |_: ()| {
            analytics.track_event(
                AnalyticsEvent::CallScheduled,
                Some(payload(json!({ "report_id": report_id }))),
            );
            schedule_open.set(false);
            if let Some(navigator) = &navigator {
                navigator.push(&Route::ThankYou);
            }
        })
    };

    let on_back_to_top = Callback::from(move |_: MouseEvent| scroll.scroll_to_top());

    let fields = [
        (Field::MonthlyLeads, "Leads per month", 1.0),
        (Field::AvgDealValue, "Average deal value ($)", 100.0),
        (Field::CloseRate, "Close rate (%)", 1.0),
        (Field::ResponseMinutes, "Minutes until first response", 1.0),
        (Field::FollowUpAttempts, "Follow-up attempts per lead", 1.0),
        (Field::NoShowRate, "Appointment no-show rate (%)", 1.0),
    ];

    html! {
        <div class="report-page">
            <style>
                {r#"
                    .report-page {
                        min-height: 100vh;
                        background: #0a0a0a;
                        color: #fff;
                        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
                    }
                    .report-hero {
                        padding: 10rem 1.5rem 6rem;
                        text-align: center;
                        max-width: 900px;
                        margin: 0 auto;
                    }
                    .report-hero h1 {
                        font-size: 3rem;
                        margin-bottom: 1rem;
                        background: linear-gradient(45deg, #fff, #7EB2FF);
                        -webkit-background-clip: text;
                        -webkit-text-fill-color: transparent;
                    }
                    .report-hero p {
                        color: #bbb;
                        font-size: 1.2rem;
                    }
                    .report-section {
                        max-width: 900px;
                        margin: 0 auto;
                        padding: 3rem 1.5rem;
                    }
                    .report-section h2 {
                        font-size: 2rem;
                        margin-bottom: 1.5rem;
                    }
                    .calc-grid {
                        display: grid;
                        grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
                        gap: 1rem;
                    }
                    .calc-field {
                        display: flex;
                        flex-direction: column;
                        gap: 0.4rem;
                        color: #ccc;
                    }
                    .calc-field input {
                        padding: 0.7rem;
                        border-radius: 8px;
                        border: 1px solid rgba(126, 178, 255, 0.3);
                        background: rgba(255, 255, 255, 0.05);
                        color: #fff;
                        font-size: 1rem;
                    }
                    .totals {
                        display: flex;
                        gap: 2rem;
                        margin-bottom: 2rem;
                        flex-wrap: wrap;
                    }
                    .total-figure {
                        font-size: 2.25rem;
                        font-weight: 700;
                        color: #FF8A8A;
                    }
                    .total-caption {
                        color: #999;
                    }
                    .report-actions {
                        display: flex;
                        gap: 1rem;
                        flex-wrap: wrap;
                        margin-top: 2rem;
                    }
                    .primary-button, .secondary-button {
                        padding: 0.9rem 1.6rem;
                        border-radius: 8px;
                        font-size: 1rem;
                        font-weight: 600;
                        cursor: pointer;
                    }
                    .primary-button {
                        background: #7EB2FF;
                        color: #0a0a0a;
                        border: none;
                    }
                    .secondary-button {
                        background: transparent;
                        color: #7EB2FF;
                        border: 1px solid #7EB2FF;
                    }
                    .primary-button:disabled, .secondary-button:disabled {
                        opacity: 0.5;
                        cursor: wait;
                    }
                    .saved-note {
                        color: #8FD694;
                        margin-top: 1rem;
                    }
                "#}
            </style>

            <header class="report-hero">
                <h1>{"Where is your revenue leaking?"}</h1>
                <p>
                    {"Plug in your funnel numbers and see, in dollars, what slow replies, "}
                    {"thin follow-up and no-shows cost you every month."}
                </p>
                <div class="report-actions" style="justify-content: center;">
                    <button class="primary-button" onclick={on_explore}>{"See my leaks"}</button>
                    <button class="secondary-button" onclick={on_book.clone()}>{"Book a strategy call"}</button>
                </div>
            </header>

            <section id="how-it-works" class="report-section">
                <h2>{"Your numbers"}</h2>
                <div class="calc-grid">
                    {
                        fields.iter().map(|(field, label, step)| {
                            html! {
                                <NumberField
                                    field={*field}
                                    label={*label}
                                    value={field.read(&form)}
                                    step={*step}
                                    on_change={on_field_change.clone()}
                                />
                            }
                        }).collect::<Html>()
                    }
                </div>
            </section>

            <section id="leaks" class="report-section">
                <h2>{"Your revenue leaks"}</h2>
                <div class="totals">
                    <div>
                        <div class="total-figure">{ format_currency(monthly) }</div>
                        <div class="total-caption">{"lost every month"}</div>
                    </div>
                    <div>
                        <div class="total-figure">{ format_currency(annual) }</div>
                        <div class="total-caption">{"lost every year"}</div>
                    </div>
                </div>
                <LeakBars leaks={leaks} />
                <div class="report-actions">
                    <button class="primary-button" onclick={on_book}>{"Fix these leaks with us"}</button>
                    <button class="secondary-button" onclick={on_save} disabled={brief.pending}>
                        { if brief.pending { "Saving..." } else { "Save brief" } }
                    </button>
                    <button class="secondary-button" onclick={on_back_to_top}>{"Back to top"}</button>
                </div>
                {
                    if let Some(id) = &brief.saved {
                        html! { <p class="saved-note">{ format!("Saved as {}", id) }</p> }
                    } else {
                        html! {}
                    }
                }
            </section>

            <ScheduleModal open={*schedule_open} on_close={on_close} on_scheduled={on_scheduled} />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writing_a_field_reads_back() {
        let data = CalculatorFormData::default();
        let next = Field::AvgDealValue.write(&data, 4_500.0);
        assert_eq!(Field::AvgDealValue.read(&next), 4_500.0);
        assert_eq!(next.monthly_leads, data.monthly_leads);
    }

    #[test]
    fn counts_are_rounded_and_rates_capped() {
        let data = CalculatorFormData::default();
        assert_eq!(Field::MonthlyLeads.write(&data, 12.6).monthly_leads, 13);
        assert_eq!(Field::CloseRate.write(&data, 140.0).close_rate, 100.0);
        assert_eq!(Field::NoShowRate.write(&data, -5.0).no_show_rate, 0.0);
        assert_eq!(Field::FollowUpAttempts.write(&data, f64::NAN).follow_up_attempts, 0);
    }
}
