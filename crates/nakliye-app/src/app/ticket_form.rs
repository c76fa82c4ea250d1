//! Form-style ticket input
//!
//! Ticket forms select trucks by plate and facilities/organizations by name.
//! Names that match nothing are sent as `null`. Blank required fields are
//! rejected before anything is written.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use nakliye_domain::model::{Facility, Organization, TicketWrite, Truck};
use nakliye_types::{Error, Result};

use super::query_service::{
    parse_invoice_label, resolve_facility_by_name, resolve_organization_by_name,
    resolve_truck_by_plate,
};

const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%d.%m.%Y %H:%M"];

const PLATE_REQUIRED: &str = "Plaka Numarası Gerekli";
const ORGANIZATION_REQUIRED: &str = "Firma İsmi Gerekli";
const FACILITY_REQUIRED: &str = "Varış Birimi Gerekli";
const INVOICE_REQUIRED: &str = "Fatura Durumu Gerekli";

#[derive(Debug, Clone, Default)]
pub struct TicketForm {
    pub plate_number: Option<String>,
    pub container_number: Option<String>,
    pub entry_time: Option<String>,
    pub exit_time: Option<String>,
    pub facility_name: Option<String>,
    pub organization_name: Option<String>,
    /// `KESİLDİ` / `KESİLMEDİ`; absent means not issued
    pub invoice: Option<String>,
}

/// Reference lists the form selects from
pub struct FormChoices<'a> {
    pub trucks: &'a [Truck],
    pub facilities: &'a [Facility],
    pub organizations: &'a [Organization],
}

impl TicketForm {
    /// Plate, organization, facility and invoice status required for a new ticket
    pub fn check_new(&self) -> Result<()> {
        required(self.plate_number.as_deref(), PLATE_REQUIRED)?;
        required(self.organization_name.as_deref(), ORGANIZATION_REQUIRED)?;
        required(self.facility_name.as_deref(), FACILITY_REQUIRED)?;
        required(self.invoice.as_deref(), INVOICE_REQUIRED)
    }

    /// Payload for a new ticket
    pub fn resolve(&self, choices: &FormChoices<'_>) -> Result<TicketWrite> {
        self.check_new()?;
        Ok(TicketWrite {
            container_number: non_blank(self.container_number.as_deref()),
            entry_time: parse_optional(self.entry_time.as_deref())?,
            exit_time: parse_optional(self.exit_time.as_deref())?,
            facility_id: self
                .facility_name
                .as_deref()
                .and_then(|n| resolve_facility_by_name(choices.facilities, n))
                .map(|f| f.id.clone()),
            organization_id: self
                .organization_name
                .as_deref()
                .and_then(|n| resolve_organization_by_name(choices.organizations, n))
                .map(|o| o.id.clone()),
            truck_id: self
                .plate_number
                .as_deref()
                .and_then(|p| resolve_truck_by_plate(choices.trucks, p))
                .map(|t| t.id.clone()),
            is_invoice_created: self.invoice.as_deref().map(parse_invoice_label).unwrap_or(false),
        })
    }

    /// Overlay the fields given in this form onto an existing payload
    ///
    /// Unlike `resolve`, absent fields keep their current value. An empty
    /// string clears the field, except for organization, facility and
    /// invoice status, which cannot be blanked.
    pub fn merge_into(&self, mut base: TicketWrite, choices: &FormChoices<'_>) -> Result<TicketWrite> {
        if self.organization_name.is_some() {
            required(self.organization_name.as_deref(), ORGANIZATION_REQUIRED)?;
        }
        if self.facility_name.is_some() {
            required(self.facility_name.as_deref(), FACILITY_REQUIRED)?;
        }
        if self.invoice.is_some() {
            required(self.invoice.as_deref(), INVOICE_REQUIRED)?;
        }

        if let Some(container) = &self.container_number {
            base.container_number = non_blank(Some(container));
        }
        if let Some(entry) = &self.entry_time {
            base.entry_time = parse_optional(Some(entry))?;
        }
        if let Some(exit) = &self.exit_time {
            base.exit_time = parse_optional(Some(exit))?;
        }
        if let Some(name) = &self.facility_name {
            base.facility_id = resolve_facility_by_name(choices.facilities, name).map(|f| f.id.clone());
        }
        if let Some(name) = &self.organization_name {
            base.organization_id =
                resolve_organization_by_name(choices.organizations, name).map(|o| o.id.clone());
        }
        if let Some(plate) = &self.plate_number {
            base.truck_id = resolve_truck_by_plate(choices.trucks, plate).map(|t| t.id.clone());
        }
        if let Some(label) = &self.invoice {
            base.is_invoice_created = parse_invoice_label(label);
        }
        Ok(base)
    }
}

fn required(value: Option<&str>, message: &str) -> Result<()> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(Error::Validation(message.to_string())),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_optional(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match non_blank(value) {
        Some(v) => parse_instant(&v).map(Some),
        None => Ok(None),
    }
}

/// Parse RFC 3339, or a wall-clock time in the local timezone
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>> {
    parse_instant_in(value, &Local)
}

pub fn parse_instant_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| Error::InvalidTime(value.to_string()));
        }
    }
    Err(Error::InvalidTime(value.to_string()))
}
