//! Query Service - read-side views over tickets and reference records

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;

use nakliye_domain::model::{Facility, Organization, Ticket, Truck};
use nakliye_domain::service::{quote_ticket, selectable_trucks, PricingPolicy, TicketQuote};

pub const INVOICE_CREATED: &str = "KESİLDİ";
pub const INVOICE_NOT_CREATED: &str = "KESİLMEDİ";

/// One row of the ticket board, already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketBoardRow {
    pub id: String,
    pub date: String,
    pub plate_number: String,
    pub container_number: String,
    pub status: String,
    pub price: String,
    pub invoice: String,
    /// Unformatted quote the row was rendered from
    pub quote: TicketQuote,
}

impl TicketBoardRow {
    /// Column headers in row order
    pub const HEADERS: [&'static str; 6] =
        ["Tarih", "Plaka", "Konteyner No", "Durum", "Ücret", "Fatura"];

    pub fn cells(&self) -> [&str; 6] {
        [
            self.date.as_str(),
            self.plate_number.as_str(),
            self.container_number.as_str(),
            self.status.as_str(),
            self.price.as_str(),
            self.invoice.as_str(),
        ]
    }
}

/// Board rows in the local timezone
pub fn ticket_board(tickets: &[Ticket], policy: &PricingPolicy, now: DateTime<Utc>) -> Vec<TicketBoardRow> {
    ticket_board_in(tickets, policy, now, &Local)
}

/// Board rows with dates rendered in `tz`
///
/// Status and price are derived from `now` on every call.
pub fn ticket_board_in<Tz: TimeZone>(
    tickets: &[Ticket],
    policy: &PricingPolicy,
    now: DateTime<Utc>,
    tz: &Tz,
) -> Vec<TicketBoardRow>
where
    Tz::Offset: std::fmt::Display,
{
    tickets
        .iter()
        .map(|ticket| {
            let quote = quote_ticket(ticket, now, policy);
            TicketBoardRow {
                id: ticket.id.clone(),
                date: ticket
                    .created_at
                    .with_timezone(tz)
                    .format("%d.%m.%Y")
                    .to_string(),
                plate_number: or_dash(ticket.plate_number()),
                container_number: or_dash(ticket.container_number.as_deref()),
                status: quote.status.label(),
                price: format!("{} TL", quote.total_price),
                invoice: invoice_label(ticket.is_invoice_created).to_string(),
                quote,
            }
        })
        .collect()
}

fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub fn invoice_label(created: bool) -> &'static str {
    if created {
        INVOICE_CREATED
    } else {
        INVOICE_NOT_CREATED
    }
}

/// Anything but the explicit "not issued" label counts as issued
pub fn parse_invoice_label(label: &str) -> bool {
    label.trim() != INVOICE_NOT_CREATED
}

/// Trucks offered in ticket forms
pub fn available_trucks(trucks: &[Truck]) -> Vec<&Truck> {
    selectable_trucks(trucks)
}

pub fn resolve_truck_by_plate<'a>(trucks: &'a [Truck], plate: &str) -> Option<&'a Truck> {
    trucks.iter().find(|t| t.plate_number == plate)
}

pub fn resolve_facility_by_name<'a>(facilities: &'a [Facility], name: &str) -> Option<&'a Facility> {
    facilities.iter().find(|f| f.name == name)
}

pub fn resolve_organization_by_name<'a>(
    organizations: &'a [Organization],
    name: &str,
) -> Option<&'a Organization> {
    organizations.iter().find(|o| o.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};
    use nakliye_domain::model::TruckStatus;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, h, m, 0).unwrap()
    }

    fn truck(id: &str, plate: &str, status: TruckStatus) -> Truck {
        Truck {
            id: id.to_string(),
            plate_number: plate.to_string(),
            driver_name: "Ali".to_string(),
            driver_phone: "555".to_string(),
            capacity: 20.0,
            status,
            created_by_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn ticket(entry: Option<DateTime<Utc>>, exit: Option<DateTime<Utc>>) -> Ticket {
        Ticket {
            id: "tk1".to_string(),
            container_number: None,
            entry_time: entry,
            exit_time: exit,
            facility_id: None,
            organization_id: None,
            truck_id: None,
            is_invoice_created: false,
            created_by_id: None,
            created_at: at(22, 30),
            updated_at: at(22, 30),
            truck: None,
            facility: None,
            organization: None,
        }
    }

    #[test]
    fn test_board_row_for_unloaded_ticket() {
        let mut t = ticket(Some(at(8, 0)), Some(at(21, 0)));
        t.truck_id = Some("a".to_string());
        t.truck = Some(truck("a", "34 ABC 123", TruckStatus::Loaded));
        t.container_number = Some("MSCU1234567".to_string());
        t.is_invoice_created = true;

        let rows = ticket_board_in(&[t], &PricingPolicy::default(), at(23, 0), &Utc);
        let row = &rows[0];
        assert_eq!(row.date, "05.03.2024");
        assert_eq!(row.plate_number, "34 ABC 123");
        assert_eq!(row.container_number, "MSCU1234567");
        assert_eq!(row.status, "YÜK BOŞALTILDI (3)");
        assert_eq!(row.price, "160 TL");
        assert_eq!(row.invoice, "KESİLDİ");
    }

    #[test]
    fn test_board_row_defaults() {
        let rows = ticket_board_in(&[ticket(None, None)], &PricingPolicy::default(), at(23, 0), &Utc);
        let row = &rows[0];
        assert_eq!(row.plate_number, "-");
        assert_eq!(row.container_number, "-");
        assert_eq!(row.status, "GİRİŞ YAPILDI");
        assert_eq!(row.price, "100 TL");
        assert_eq!(row.invoice, "KESİLMEDİ");
    }

    #[test]
    fn test_board_date_follows_timezone() {
        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();
        let rows = ticket_board_in(&[ticket(None, None)], &PricingPolicy::default(), at(23, 0), &istanbul);
        // 22:30 UTC is already the next day at +03:00
        assert_eq!(rows[0].date, "06.03.2024");
    }

    #[test]
    fn test_board_is_recomputed_from_now() {
        let t = ticket(Some(at(0, 0)), None);
        let policy = PricingPolicy::default();
        let early = ticket_board_in(std::slice::from_ref(&t), &policy, at(1, 0), &Utc);
        let late = ticket_board_in(std::slice::from_ref(&t), &policy, at(0, 0) + Duration::hours(13), &Utc);
        assert_eq!(early[0].status, "GİRİŞ YAPILDI");
        assert_eq!(late[0].status, "BEKLEME (2)");
        assert_eq!(late[0].price, "100 TL");
    }

    #[test]
    fn test_invoice_label_parsing() {
        assert!(!parse_invoice_label("KESİLMEDİ"));
        assert!(parse_invoice_label("KESİLDİ"));
        assert!(parse_invoice_label("anything"));
    }

    #[test]
    fn test_resolution_by_name() {
        let trucks = vec![
            truck("a", "34 A 1", TruckStatus::Unloaded),
            truck("b", "34 B 2", TruckStatus::Loaded),
        ];
        assert_eq!(resolve_truck_by_plate(&trucks, "34 B 2").map(|t| t.id.as_str()), Some("b"));
        assert!(resolve_truck_by_plate(&trucks, "06 X 9").is_none());

        let available: Vec<_> = available_trucks(&trucks).iter().map(|t| t.id.clone()).collect();
        assert_eq!(available, vec!["a".to_string()]);
    }
}
