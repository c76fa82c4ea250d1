//! Organization (customer account) type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::require;
use nakliye_types::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub tax_number: String,
    #[serde(default)]
    pub tax_office: String,
    #[serde(default)]
    pub invoice_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationWrite {
    pub name: String,
    pub address: String,
    pub tax_number: String,
    pub tax_office: String,
    pub invoice_address: String,
}

impl OrganizationWrite {
    pub fn validate(&self) -> Result<()> {
        require(&self.name, "Şirket ismi zorunludur")?;
        require(&self.address, "Şirket adresi zorunludur")?;
        require(&self.tax_number, "Vergi numarası zorunludur")?;
        require(&self.tax_office, "Vergi dairesi zorunludur")?;
        require(&self.invoice_address, "Fatura adresi zorunludur")
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrganizationPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub tax_number: Option<String>,
    pub tax_office: Option<String>,
    pub invoice_address: Option<String>,
}

impl OrganizationPatch {
    pub fn apply_to(&self, org: &Organization) -> OrganizationWrite {
        OrganizationWrite {
            name: self.name.clone().unwrap_or_else(|| org.name.clone()),
            address: self.address.clone().unwrap_or_else(|| org.address.clone()),
            tax_number: self.tax_number.clone().unwrap_or_else(|| org.tax_number.clone()),
            tax_office: self.tax_office.clone().unwrap_or_else(|| org.tax_office.clone()),
            invoice_address: self
                .invoice_address
                .clone()
                .unwrap_or_else(|| org.invoice_address.clone()),
        }
    }
}
