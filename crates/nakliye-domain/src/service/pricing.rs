//! Ticket pricing and status derivation
//!
//! A ticket's charge and display status are derived from its entry/exit
//! timestamps every time they are shown. Nothing here is stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Ticket;

/// Billing constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Length of one billable wait window in minutes
    #[serde(default = "default_wait_window_minutes")]
    pub wait_window_minutes: i64,
    /// Fixed shipping charge
    #[serde(default = "default_base_price")]
    pub base_price: i64,
    /// Charge added per wait window
    #[serde(default = "default_price_per_wait_window")]
    pub price_per_wait_window: i64,
}

fn default_wait_window_minutes() -> i64 {
    6 * 60
}

fn default_base_price() -> i64 {
    100
}

fn default_price_per_wait_window() -> i64 {
    20
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            wait_window_minutes: default_wait_window_minutes(),
            base_price: default_base_price(),
            price_per_wait_window: default_price_per_wait_window(),
        }
    }
}

/// Presentational load status of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "windows", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Entered, still inside the first wait window (also the no-timestamp default)
    Arrived,
    /// Entered, not yet exited, with this many full windows elapsed
    Waiting(u32),
    /// Exited; billed for this many windows
    Unloaded(u32),
}

impl TicketStatus {
    pub fn label(&self) -> String {
        match self {
            TicketStatus::Arrived => "GİRİŞ YAPILDI".to_string(),
            TicketStatus::Waiting(n) => format!("BEKLEME ({})", n),
            TicketStatus::Unloaded(n) => format!("YÜK BOŞALTILDI ({})", n),
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketQuote {
    pub status: TicketStatus,
    /// Billed windows; zero unless the ticket has both timestamps
    pub wait_window_count: u32,
    pub total_price: i64,
}

/// Whole minutes between two instants, rounded down
pub fn whole_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(60_000)
}

/// Billed windows for a completed wait; a partial window counts in full
pub fn wait_window_count(completed_wait_minutes: i64, policy: &PricingPolicy) -> u32 {
    if completed_wait_minutes <= 0 || policy.wait_window_minutes <= 0 {
        return 0;
    }
    let windows = (completed_wait_minutes + policy.wait_window_minutes - 1) / policy.wait_window_minutes;
    u32::try_from(windows).unwrap_or(u32::MAX)
}

/// Derive status and charge from raw timestamps
pub fn quote(
    entry_time: Option<DateTime<Utc>>,
    exit_time: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    policy: &PricingPolicy,
) -> TicketQuote {
    let (status, windows) = match (entry_time, exit_time) {
        (Some(entry), Some(exit)) => {
            let windows = wait_window_count(whole_minutes(entry, exit), policy);
            (TicketStatus::Unloaded(windows), windows)
        }
        (Some(entry), None) => {
            let elapsed = whole_minutes(entry, now);
            if policy.wait_window_minutes > 0 && elapsed >= policy.wait_window_minutes {
                let full = u32::try_from(elapsed / policy.wait_window_minutes).unwrap_or(u32::MAX);
                (TicketStatus::Waiting(full), 0)
            } else {
                (TicketStatus::Arrived, 0)
            }
        }
        // Without an entry time there is nothing to measure, exit or not
        (None, _) => (TicketStatus::Arrived, 0),
    };

    TicketQuote {
        status,
        wait_window_count: windows,
        total_price: policy.base_price + i64::from(windows) * policy.price_per_wait_window,
    }
}

pub fn quote_ticket(ticket: &Ticket, now: DateTime<Utc>, policy: &PricingPolicy) -> TicketQuote {
    quote(ticket.entry_time, ticket.exit_time, now, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn policy() -> PricingPolicy {
        PricingPolicy::default()
    }

    #[test]
    fn test_default_constants() {
        let p = policy();
        assert_eq!(p.wait_window_minutes, 360);
        assert_eq!(p.base_price, 100);
        assert_eq!(p.price_per_wait_window, 20);
    }

    #[test]
    fn test_thirteen_hour_visit() {
        let exit = Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap();
        let q = quote(Some(t0()), Some(exit), exit, &policy());
        assert_eq!(q.wait_window_count, 3);
        assert_eq!(q.status, TicketStatus::Unloaded(3));
        assert_eq!(q.total_price, 160);
    }

    #[test]
    fn test_exact_window_boundary() {
        let exit = t0() + Duration::minutes(360);
        let q = quote(Some(t0()), Some(exit), exit, &policy());
        assert_eq!(q.wait_window_count, 1);
        assert_eq!(q.total_price, 120);

        let exit = t0() + Duration::minutes(361);
        let q = quote(Some(t0()), Some(exit), exit, &policy());
        assert_eq!(q.wait_window_count, 2);
        assert_eq!(q.total_price, 140);
    }

    #[test]
    fn test_ceiling_matches_formula_across_range() {
        for minutes in [1_i64, 59, 359, 360, 361, 719, 720, 721, 1440, 10_000] {
            let exit = t0() + Duration::minutes(minutes);
            let q = quote(Some(t0()), Some(exit), exit, &policy());
            let expected = ((minutes as f64) / 360.0).ceil() as u32;
            assert_eq!(q.wait_window_count, expected, "minutes = {}", minutes);
            assert_eq!(q.total_price, 100 + 20 * i64::from(expected));
        }
    }

    #[test]
    fn test_sub_minute_wait_is_free() {
        let exit = t0() + Duration::seconds(59);
        let q = quote(Some(t0()), Some(exit), exit, &policy());
        assert_eq!(q.status, TicketStatus::Unloaded(0));
        assert_eq!(q.total_price, 100);
    }

    #[test]
    fn test_exit_before_entry_clamps_to_zero() {
        let exit = t0() - Duration::hours(3);
        let q = quote(Some(t0()), Some(exit), t0(), &policy());
        assert_eq!(q.wait_window_count, 0);
        assert_eq!(q.status, TicketStatus::Unloaded(0));
        assert_eq!(q.total_price, 100);
    }

    #[test]
    fn test_waiting_transition() {
        let q = quote(Some(t0()), None, t0() + Duration::minutes(359), &policy());
        assert_eq!(q.status, TicketStatus::Arrived);

        let q = quote(Some(t0()), None, t0() + Duration::minutes(360), &policy());
        assert_eq!(q.status, TicketStatus::Waiting(1));
        assert_eq!(q.total_price, 100);

        let q = quote(Some(t0()), None, t0() + Duration::minutes(1000), &policy());
        assert_eq!(q.status, TicketStatus::Waiting(2));
        assert_eq!(q.wait_window_count, 0);
    }

    #[test]
    fn test_future_entry_is_arrived() {
        let q = quote(Some(t0() + Duration::hours(1)), None, t0(), &policy());
        assert_eq!(q.status, TicketStatus::Arrived);
    }

    #[test]
    fn test_no_timestamps() {
        let q = quote(None, None, t0(), &policy());
        assert_eq!(q.status, TicketStatus::Arrived);
        assert_eq!(q.total_price, 100);
    }

    #[test]
    fn test_exit_without_entry() {
        let q = quote(None, Some(t0()), t0(), &policy());
        assert_eq!(q.status, TicketStatus::Arrived);
        assert_eq!(q.wait_window_count, 0);
        assert_eq!(q.total_price, 100);
    }

    #[test]
    fn test_quote_is_repeatable() {
        let now = t0() + Duration::minutes(800);
        let a = quote(Some(t0()), None, now, &policy());
        let b = quote(Some(t0()), None, now, &policy());
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_policy() {
        let policy = PricingPolicy {
            wait_window_minutes: 60,
            base_price: 50,
            price_per_wait_window: 5,
        };
        let exit = t0() + Duration::minutes(150);
        let q = quote(Some(t0()), Some(exit), exit, &policy);
        assert_eq!(q.wait_window_count, 3);
        assert_eq!(q.total_price, 65);
    }

    #[test]
    fn test_labels() {
        assert_eq!(TicketStatus::Arrived.label(), "GİRİŞ YAPILDI");
        assert_eq!(TicketStatus::Waiting(2).label(), "BEKLEME (2)");
        assert_eq!(TicketStatus::Unloaded(3).label(), "YÜK BOŞALTILDI (3)");
    }
}
