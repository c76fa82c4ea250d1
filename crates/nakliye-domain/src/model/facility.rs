//! Facility (warehouse) type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use nakliye_types::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityWrite {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
}

impl FacilityWrite {
    pub fn validate(&self) -> Result<()> {
        require(&self.name, "Depo ismi zorunludur")?;
        require(&self.address, "Depo adresi zorunludur")?;
        require(&self.city, "Şehir zorunludur")?;
        require(&self.country, "Ülke zorunludur")
    }
}

#[derive(Debug, Clone, Default)]
pub struct FacilityPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl FacilityPatch {
    pub fn apply_to(&self, facility: &Facility) -> FacilityWrite {
        FacilityWrite {
            name: self.name.clone().unwrap_or_else(|| facility.name.clone()),
            address: self.address.clone().unwrap_or_else(|| facility.address.clone()),
            city: self.city.clone().unwrap_or_else(|| facility.city.clone()),
            country: self.country.clone().unwrap_or_else(|| facility.country.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reports_first_missing_field() {
        let write = FacilityWrite {
            name: "Ambarlı Depo".to_string(),
            address: "Liman Cd. 1".to_string(),
            city: String::new(),
            country: "Türkiye".to_string(),
        };
        let err = write.validate().unwrap_err();
        assert!(err.to_string().contains("Şehir zorunludur"));
    }
}
