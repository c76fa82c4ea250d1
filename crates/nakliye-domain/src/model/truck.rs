//! Truck type definitions

use serde::{Deserialize, Deserializer, Serialize};

use super::require;
use nakliye_types::{Error, Result};

/// Occupancy flag of a truck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TruckStatus {
    /// Assigned to an open ticket
    Loaded,
    /// Available for assignment
    Unloaded,
}

impl TruckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TruckStatus::Loaded => "LOADED",
            TruckStatus::Unloaded => "UNLOADED",
        }
    }

    /// Display label used on the truck screens
    pub fn label(&self) -> &'static str {
        match self {
            TruckStatus::Loaded => "YÜKLÜ",
            TruckStatus::Unloaded => "BOŞ",
        }
    }

    /// Parse the form label; anything but `YÜKLÜ` means unloaded
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "YÜKLÜ" | "LOADED" => TruckStatus::Loaded,
            _ => TruckStatus::Unloaded,
        }
    }
}

impl std::fmt::Display for TruckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Truck {
    pub id: String,
    pub plate_number: String,
    pub driver_name: String,
    pub driver_phone: String,
    #[serde(deserialize_with = "number_or_string")]
    pub capacity: f64,
    pub status: TruckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Truck {
    pub fn is_available(&self) -> bool {
        self.status == TruckStatus::Unloaded
    }
}

/// Full truck write payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckWrite {
    pub plate_number: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub capacity: f64,
    pub status: TruckStatus,
}

impl TruckWrite {
    /// Payload that rewrites `truck` with only its status changed
    pub fn with_status(truck: &Truck, status: TruckStatus) -> Self {
        Self {
            plate_number: truck.plate_number.clone(),
            driver_name: truck.driver_name.clone(),
            driver_phone: truck.driver_phone.clone(),
            capacity: truck.capacity,
            status,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require(&self.plate_number, "Plaka numarası zorunludur")?;
        require(&self.driver_name, "Sürücü ismi zorunludur")?;
        require(&self.driver_phone, "Sürücü telefon numarası zorunludur")?;
        if !self.capacity.is_finite() || self.capacity == 0.0 {
            return Err(Error::Validation("Geçerli bir kapasite giriniz".to_string()));
        }
        Ok(())
    }
}

/// Partial edit of a truck, merged onto the current record before writing
#[derive(Debug, Clone, Default)]
pub struct TruckPatch {
    pub plate_number: Option<String>,
    pub driver_name: Option<String>,
    pub driver_phone: Option<String>,
    pub capacity: Option<f64>,
    pub status: Option<TruckStatus>,
}

impl TruckPatch {
    pub fn apply_to(&self, truck: &Truck) -> TruckWrite {
        TruckWrite {
            plate_number: self.plate_number.clone().unwrap_or_else(|| truck.plate_number.clone()),
            driver_name: self.driver_name.clone().unwrap_or_else(|| truck.driver_name.clone()),
            driver_phone: self.driver_phone.clone().unwrap_or_else(|| truck.driver_phone.clone()),
            capacity: self.capacity.unwrap_or(truck.capacity),
            status: self.status.unwrap_or(truck.status),
        }
    }
}

/// The backend has returned capacity both as a number and as a string
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid capacity: {}", s))),
    }
}
