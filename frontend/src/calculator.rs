use serde::{Deserialize, Serialize};

// Benchmarks the diagnostic compares a business against.
const BENCHMARK_RESPONSE_MINUTES: f64 = 5.0;
const RESPONSE_DECAY_PER_HOUR: f64 = 0.10;
const MAX_RESPONSE_PENALTY: f64 = 0.40;
const BENCHMARK_FOLLOW_UPS: u32 = 6;
const RECOVERY_PER_FOLLOW_UP: f64 = 0.01;
const BENCHMARK_NO_SHOW: f64 = 0.10;
const BOOKING_RATE: f64 = 0.40;
const BENCHMARK_CLOSE_RATE: f64 = 0.30;
const RECOVERABLE_CONVERSION_GAP: f64 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeakKind {
    SlowResponse,
    MissedFollowUp,
    NoShows,
    ConversionGap,
}

impl LeakKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeakKind::SlowResponse => "slow_response",
            LeakKind::MissedFollowUp => "missed_follow_up",
            LeakKind::NoShows => "no_shows",
            LeakKind::ConversionGap => "conversion_gap",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeakKind::SlowResponse => "Slow speed-to-lead",
            LeakKind::MissedFollowUp => "Missed follow-ups",
            LeakKind::NoShows => "Appointment no-shows",
            LeakKind::ConversionGap => "Pipeline conversion gap",
        }
    }
}

/// A categorized source of estimated recurring revenue loss.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Leak {
    pub kind: LeakKind,
    pub label: String,
    pub monthly_loss: f64,
}

impl Leak {
    fn new(kind: LeakKind, monthly_loss: f64) -> Self {
        let monthly_loss = if monthly_loss.is_finite() { monthly_loss.max(0.0) } else { 0.0 };
        Self {
            kind,
            label: kind.label().to_string(),
            monthly_loss,
        }
    }
}

/// Inputs of the revenue diagnostic calculator. Rates are percentages (0-100).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculatorFormData {
    pub monthly_leads: u32,
    pub avg_deal_value: f64,
    pub close_rate: f64,
    pub response_minutes: u32,
    pub follow_up_attempts: u32,
    pub no_show_rate: f64,
}

impl Default for CalculatorFormData {
    fn default() -> Self {
        Self {
            monthly_leads: 200,
            avg_deal_value: 3_000.0,
            close_rate: 20.0,
            response_minutes: 45,
            follow_up_attempts: 2,
            no_show_rate: 25.0,
        }
    }
}

fn fraction(percent: f64) -> f64 {
    if percent.is_finite() {
        (percent / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Estimates the monthly leaks for the given inputs, largest first.
pub fn calculate_leaks(data: &CalculatorFormData) -> Vec<Leak> {
    let leads = f64::from(data.monthly_leads);
    let deal = non_negative(data.avg_deal_value);
    let close = fraction(data.close_rate);
    let no_show = fraction(data.no_show_rate);

    let late_minutes = (f64::from(data.response_minutes) - BENCHMARK_RESPONSE_MINUTES).max(0.0);
    let response_penalty = (late_minutes / 60.0 * RESPONSE_DECAY_PER_HOUR).min(MAX_RESPONSE_PENALTY);
    let slow_response = leads * close * response_penalty * deal;

    let missing_follow_ups = BENCHMARK_FOLLOW_UPS.saturating_sub(data.follow_up_attempts);
    let missed_follow_up =
        leads * (1.0 - close) * RECOVERY_PER_FOLLOW_UP * f64::from(missing_follow_ups) * deal;

    let excess_no_show = (no_show - BENCHMARK_NO_SHOW).max(0.0);
    let no_shows = leads * BOOKING_RATE * excess_no_show * close * deal;

    let close_gap = (BENCHMARK_CLOSE_RATE - close).max(0.0);
    let conversion_gap = leads * close_gap * RECOVERABLE_CONVERSION_GAP * deal;

    let mut leaks = vec![
        Leak::new(LeakKind::SlowResponse, slow_response),
        Leak::new(LeakKind::MissedFollowUp, missed_follow_up),
        Leak::new(LeakKind::NoShows, no_shows),
        Leak::new(LeakKind::ConversionGap, conversion_gap),
    ];
    leaks.sort_by(|a, b| b.monthly_loss.total_cmp(&a.monthly_loss));
    leaks
}

pub fn total_monthly_loss(leaks: &[Leak]) -> f64 {
    leaks.iter().map(|leak| leak.monthly_loss).sum()
}

pub fn annual_loss(leaks: &[Leak]) -> f64 {
    total_monthly_loss(leaks) * 12.0
}

/// Whole-dollar amount with thousands separators, e.g. `$12,345`.
pub fn format_currency(amount: f64) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loss_of(leaks: &[Leak], kind: LeakKind) -> f64 {
        leaks
            .iter()
            .find(|leak| leak.kind == kind)
            .map(|leak| leak.monthly_loss)
            .unwrap()
    }

    #[test]
    fn default_inputs_produce_all_leaks_sorted() {
        let leaks = calculate_leaks(&CalculatorFormData::default());
        assert_eq!(leaks.len(), 4);
        assert!(leaks
            .windows(2)
            .all(|pair| pair[0].monthly_loss >= pair[1].monthly_loss));
        assert!(total_monthly_loss(&leaks) > 0.0);
    }

    #[test]
    fn benchmark_business_has_no_leaks() {
        let data = CalculatorFormData {
            monthly_leads: 100,
            avg_deal_value: 1_000.0,
            close_rate: 30.0,
            response_minutes: 5,
            follow_up_attempts: 6,
            no_show_rate: 10.0,
        };
        let leaks = calculate_leaks(&data);
        assert_eq!(total_monthly_loss(&leaks), 0.0);
    }

    #[test]
    fn slow_response_penalty_is_capped() {
        let mut data = CalculatorFormData {
            response_minutes: 24 * 60,
            ..CalculatorFormData::default()
        };
        let capped = loss_of(&calculate_leaks(&data), LeakKind::SlowResponse);
        data.response_minutes = 48 * 60;
        assert_eq!(loss_of(&calculate_leaks(&data), LeakKind::SlowResponse), capped);
        // 200 leads * 20% close * 40% penalty * $3000
        assert!((capped - 48_000.0).abs() < 1e-6);
    }

    #[test]
    fn garbage_rates_never_go_negative() {
        let data = CalculatorFormData {
            monthly_leads: 10,
            avg_deal_value: f64::NAN,
            close_rate: 250.0,
            response_minutes: 0,
            follow_up_attempts: 99,
            no_show_rate: -40.0,
        };
        for leak in calculate_leaks(&data) {
            assert!(leak.monthly_loss >= 0.0, "{:?}", leak);
        }
    }

    #[test]
    fn annual_is_twelve_months() {
        let leaks = calculate_leaks(&CalculatorFormData::default());
        assert!((annual_loss(&leaks) - total_monthly_loss(&leaks) * 12.0).abs() < 1e-6);
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1_000.0), "$1,000");
        assert_eq!(format_currency(1_234_567.8), "$1,234,568");
        assert_eq!(format_currency(-2_500.0), "-$2,500");
        assert_eq!(format_currency(f64::INFINITY), "$0");
    }
}
