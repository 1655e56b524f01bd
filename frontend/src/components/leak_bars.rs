use yew::prelude::*;

use crate::calculator::{format_currency, Leak};

/// Percent width below which a bar is never drawn, so small leaks stay visible.
pub const MIN_BAR_WIDTH: f64 = 8.0;

/// Bar widths in percent, one per leak, relative to the largest loss.
pub fn bar_widths(leaks: &[Leak]) -> Vec<f64> {
    let max = leaks
        .iter()
        .map(|leak| leak.monthly_loss)
        .fold(0.0_f64, f64::max);
    leaks
        .iter()
        .map(|leak| {
            let ratio = if max > 0.0 { leak.monthly_loss / max } else { 0.0 };
            (ratio * 100.0).max(MIN_BAR_WIDTH)
        })
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct LeakBarsProps {
    pub leaks: Vec<Leak>,
}

#[function_component(LeakBars)]
pub fn leak_bars(props: &LeakBarsProps) -> Html {
    if props.leaks.is_empty() {
        return html! {};
    }

    let widths = bar_widths(&props.leaks);

    html! {
        <div class="leak-bars">
            <style>
                {r#"
                    .leak-bars {
                        display: flex;
                        flex-direction: column;
                        gap: 1.25rem;
                    }
                    .leak-row-header {
                        display: flex;
                        justify-content: space-between;
                        color: #ddd;
                        margin-bottom: 0.4rem;
                    }
                    .leak-amount {
                        color: #FF8A8A;
                        font-weight: 600;
                    }
                    .leak-track {
                        height: 14px;
                        border-radius: 7px;
                        background: rgba(255, 255, 255, 0.08);
                        overflow: hidden;
                    }
                    .leak-bar {
                        height: 100%;
                        border-radius: 7px;
                        background: linear-gradient(90deg, #7EB2FF, #FF6B6B);
                        transition: width 0.6s ease-out;
                    }
                "#}
            </style>
            {
                props.leaks.iter().zip(widths).map(|(leak, width)| {
                    html! {
                        <div class="leak-row" key={leak.kind.as_str()}>
                            <div class="leak-row-header">
                                <span class="leak-label">{ &leak.label }</span>
                                <span class="leak-amount">
                                    { format!("{}/mo", format_currency(leak.monthly_loss)) }
                                </span>
                            </div>
                            <div class="leak-track">
                                <div class="leak-bar" style={format!("width: {}%;", width)}></div>
                            </div>
                        </div>
                    }
                }).collect::<Html>()
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::LeakKind;

    fn leak(kind: LeakKind, label: &str, monthly_loss: f64) -> Leak {
        Leak {
            kind,
            label: label.to_string(),
            monthly_loss,
        }
    }

    #[test]
    fn widths_are_relative_to_largest_loss() {
        let leaks = vec![
            leak(LeakKind::SlowResponse, "A", 1_000.0),
            leak(LeakKind::NoShows, "B", 250.0),
        ];
        assert_eq!(bar_widths(&leaks), vec![100.0, 25.0]);
    }

    #[test]
    fn largest_is_full_width_regardless_of_position() {
        let leaks = vec![
            leak(LeakKind::SlowResponse, "A", 30.0),
            leak(LeakKind::NoShows, "B", 1_234.5),
            leak(LeakKind::ConversionGap, "C", 617.25),
        ];
        let widths = bar_widths(&leaks);
        assert_eq!(widths[1], 100.0);
        assert_eq!(widths[2], 50.0);
        assert_eq!(widths[0], MIN_BAR_WIDTH);
    }

    #[test]
    fn small_losses_floor_at_minimum() {
        let leaks = vec![
            leak(LeakKind::SlowResponse, "A", 10_000.0),
            leak(LeakKind::MissedFollowUp, "B", 1.0),
            leak(LeakKind::NoShows, "C", 0.0),
        ];
        assert_eq!(bar_widths(&leaks), vec![100.0, 8.0, 8.0]);
    }

    #[test]
    fn all_zero_losses_do_not_divide_by_zero() {
        let leaks = vec![
            leak(LeakKind::SlowResponse, "A", 0.0),
            leak(LeakKind::NoShows, "B", 0.0),
        ];
        assert_eq!(bar_widths(&leaks), vec![MIN_BAR_WIDTH, MIN_BAR_WIDTH]);
    }

    #[test]
    fn empty_input_has_no_bars() {
        assert!(bar_widths(&[]).is_empty());
    }
}
