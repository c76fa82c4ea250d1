//! Ticket: one truck visit at a facility

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Facility, Organization, Truck};

/// Ticket as read from the backend, with its related records embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    #[serde(default)]
    pub container_number: Option<String>,
    #[serde(default)]
    pub entry_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub facility_id: Option<String>,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default)]
    pub truck_id: Option<String>,
    #[serde(default)]
    pub is_invoice_created: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck: Option<Truck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<Facility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
}

impl Ticket {
    /// Embedded truck record, if it is the one the ticket references
    pub fn assigned_truck(&self) -> Option<&Truck> {
        let id = self.truck_id.as_deref()?;
        self.truck.as_ref().filter(|t| t.id == id)
    }

    pub fn plate_number(&self) -> Option<&str> {
        self.truck.as_ref().map(|t| t.plate_number.as_str())
    }

    /// Write payload reproducing the ticket's current fields
    pub fn to_write(&self) -> TicketWrite {
        TicketWrite {
            container_number: self.container_number.clone(),
            entry_time: self.entry_time,
            exit_time: self.exit_time,
            facility_id: self.facility_id.clone(),
            organization_id: self.organization_id.clone(),
            truck_id: self.truck_id.clone(),
            is_invoice_created: self.is_invoice_created,
        }
    }
}

/// Ticket write payload; absent values are sent as `null`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketWrite {
    pub container_number: Option<String>,
    pub entry_time: Option<DateTime<Utc>>,
    pub exit_time: Option<DateTime<Utc>>,
    pub facility_id: Option<String>,
    pub organization_id: Option<String>,
    pub truck_id: Option<String>,
    #[serde(default)]
    pub is_invoice_created: bool,
}

/// Partial ticket update as sent to `PATCH`
///
/// An absent field keeps the current value; an explicit `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    #[serde(default, deserialize_with = "present")]
    pub container_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub entry_time: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub exit_time: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present")]
    pub facility_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub organization_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub truck_id: Option<Option<String>>,
    #[serde(default)]
    pub is_invoice_created: Option<bool>,
}

impl TicketPatch {
    pub fn apply_to(&self, ticket: &Ticket) -> TicketWrite {
        let mut write = ticket.to_write();
        if let Some(v) = &self.container_number {
            write.container_number = v.clone();
        }
        if let Some(v) = self.entry_time {
            write.entry_time = v;
        }
        if let Some(v) = self.exit_time {
            write.exit_time = v;
        }
        if let Some(v) = &self.facility_id {
            write.facility_id = v.clone();
        }
        if let Some(v) = &self.organization_id {
            write.organization_id = v.clone();
        }
        if let Some(v) = &self.truck_id {
            write.truck_id = v.clone();
        }
        if let Some(v) = self.is_invoice_created {
            write.is_invoice_created = v;
        }
        write
    }
}

/// Marks a field as given, so `null` reaches the patch as `Some(None)`
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICKET_JSON: &str = r#"{
        "id": "tk1",
        "containerNumber": null,
        "entryTime": "2024-01-01T00:00:00.000Z",
        "exitTime": null,
        "createdById": "u1",
        "truckId": "t1",
        "organizationId": "o1",
        "facilityId": "f1",
        "isInvoiceCreated": false,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z",
        "truck": {
            "id": "t1",
            "plateNumber": "34 ABC 123",
            "driverName": "Ali",
            "driverPhone": "555",
            "capacity": "20",
            "status": "LOADED"
        }
    }"#;

    #[test]
    fn test_deserialize_backend_ticket() {
        let ticket: Ticket = serde_json::from_str(TICKET_JSON).unwrap();
        assert_eq!(ticket.truck_id.as_deref(), Some("t1"));
        assert!(ticket.exit_time.is_none());
        assert_eq!(ticket.plate_number(), Some("34 ABC 123"));
        assert!(ticket.assigned_truck().is_some());
    }

    #[test]
    fn test_assigned_truck_ignores_stale_embed() {
        let mut ticket: Ticket = serde_json::from_str(TICKET_JSON).unwrap();
        ticket.truck_id = Some("t2".to_string());
        assert!(ticket.assigned_truck().is_none());
    }

    #[test]
    fn test_write_serializes_nulls() {
        let value = serde_json::to_value(TicketWrite::default()).unwrap();
        assert!(value["truckId"].is_null());
        assert!(value["entryTime"].is_null());
        assert_eq!(value["isInvoiceCreated"], false);
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let ticket: Ticket = serde_json::from_str(TICKET_JSON).unwrap();
        let patch: TicketPatch = serde_json::from_str(r#"{"isInvoiceCreated": true}"#).unwrap();
        let write = patch.apply_to(&ticket);
        assert!(write.is_invoice_created);
        assert_eq!(write.truck_id.as_deref(), Some("t1"));
        assert_eq!(write.facility_id.as_deref(), Some("f1"));
        assert_eq!(write.organization_id.as_deref(), Some("o1"));
        assert_eq!(write.entry_time, ticket.entry_time);
    }

    #[test]
    fn test_patch_null_clears_field() {
        let ticket: Ticket = serde_json::from_str(TICKET_JSON).unwrap();
        let patch: TicketPatch =
            serde_json::from_str(r#"{"truckId": null, "containerNumber": "MSCU7"}"#).unwrap();
        assert_eq!(patch.truck_id, Some(None));
        let write = patch.apply_to(&ticket);
        assert!(write.truck_id.is_none());
        assert_eq!(write.container_number.as_deref(), Some("MSCU7"));
        assert_eq!(write.organization_id.as_deref(), Some("o1"));
    }
}
