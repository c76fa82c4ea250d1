//! Truck occupancy rules
//!
//! Which truck status writes a ticket lifecycle event requires. Trucks are
//! compared by id only. Releases are always ordered before occupations.

use serde::{Deserialize, Serialize};

use crate::model::{Truck, TruckStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckStatusChange {
    pub truck_id: String,
    pub status: TruckStatus,
}

impl TruckStatusChange {
    pub fn occupy(truck_id: &str) -> Self {
        Self {
            truck_id: truck_id.to_string(),
            status: TruckStatus::Loaded,
        }
    }

    pub fn release(truck_id: &str) -> Self {
        Self {
            truck_id: truck_id.to_string(),
            status: TruckStatus::Unloaded,
        }
    }
}

/// Ticket created with an optional truck
pub fn plan_create(truck_id: Option<&str>) -> Vec<TruckStatusChange> {
    truck_id.map(TruckStatusChange::occupy).into_iter().collect()
}

/// Ticket's assigned truck changes from `old` to `new`
pub fn plan_update(old: Option<&str>, new: Option<&str>) -> Vec<TruckStatusChange> {
    match (old, new) {
        (Some(old), Some(new)) if old == new => Vec::new(),
        (Some(old), Some(new)) => vec![
            TruckStatusChange::release(old),
            TruckStatusChange::occupy(new),
        ],
        (None, Some(new)) => vec![TruckStatusChange::occupy(new)],
        (Some(old), None) => vec![TruckStatusChange::release(old)],
        (None, None) => Vec::new(),
    }
}

/// Ticket holding an optional truck is deleted
pub fn plan_delete(truck_id: Option<&str>) -> Vec<TruckStatusChange> {
    truck_id.map(TruckStatusChange::release).into_iter().collect()
}

/// Trucks offered for (re)assignment
pub fn selectable_trucks(trucks: &[Truck]) -> Vec<&Truck> {
    trucks.iter().filter(|t| t.is_available()).collect()
}
