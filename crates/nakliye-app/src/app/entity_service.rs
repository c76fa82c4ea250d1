//! Entity Service - validated writes for trucks, facilities, organizations
//!
//! Payloads are validated before anything is sent. Updates take a patch and
//! merge it onto the current record, so unchanged fields are written back
//! as they were.

use std::sync::Arc;

use tracing::{info, warn};

use nakliye_domain::model::{
    Facility, FacilityPatch, FacilityWrite, Organization, OrganizationPatch, OrganizationWrite,
    Truck, TruckPatch, TruckWrite,
};
use nakliye_domain::repository::{FacilityRepository, OrganizationRepository, TruckRepository};
use nakliye_types::Result;

use super::notice::{Notice, Subject, WriteAction};

/// Notice for the outcome of one write
pub fn notice_for<T>(subject: Subject, action: WriteAction, outcome: &Result<T>) -> Notice {
    match outcome {
        Ok(_) => Notice::success(subject, action),
        Err(e) => {
            warn!(?subject, ?action, error = %e, "write failed");
            Notice::failure(subject, action)
        }
    }
}

pub struct EntityService<R> {
    repo: Arc<R>,
}

impl<R> EntityService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R: TruckRepository> EntityService<R> {
    pub async fn create_truck(&self, truck: TruckWrite) -> Result<Truck> {
        truck.validate()?;
        let created = TruckRepository::create(&*self.repo, &truck).await?;
        info!(truck_id = %created.id, plate = %created.plate_number, "truck created");
        Ok(created)
    }

    pub async fn update_truck(&self, id: &str, patch: &TruckPatch) -> Result<Truck> {
        let current = TruckRepository::get(&*self.repo, id).await?;
        let write = patch.apply_to(&current);
        write.validate()?;
        let updated = TruckRepository::update(&*self.repo, id, &write).await?;
        info!(truck_id = %id, "truck updated");
        Ok(updated)
    }

    pub async fn delete_truck(&self, id: &str) -> Result<()> {
        TruckRepository::delete(&*self.repo, id).await?;
        info!(truck_id = %id, "truck deleted");
        Ok(())
    }
}

impl<R: FacilityRepository> EntityService<R> {
    pub async fn create_facility(&self, facility: FacilityWrite) -> Result<Facility> {
        facility.validate()?;
        let created = FacilityRepository::create(&*self.repo, &facility).await?;
        info!(facility_id = %created.id, "facility created");
        Ok(created)
    }

    pub async fn update_facility(&self, id: &str, patch: &FacilityPatch) -> Result<Facility> {
        let current = FacilityRepository::get(&*self.repo, id).await?;
        let write = patch.apply_to(&current);
        write.validate()?;
        let updated = FacilityRepository::update(&*self.repo, id, &write).await?;
        info!(facility_id = %id, "facility updated");
        Ok(updated)
    }

    pub async fn delete_facility(&self, id: &str) -> Result<()> {
        FacilityRepository::delete(&*self.repo, id).await?;
        info!(facility_id = %id, "facility deleted");
        Ok(())
    }
}

impl<R: OrganizationRepository> EntityService<R> {
    pub async fn create_organization(&self, organization: OrganizationWrite) -> Result<Organization> {
        organization.validate()?;
        let created = OrganizationRepository::create(&*self.repo, &organization).await?;
        info!(organization_id = %created.id, "organization created");
        Ok(created)
    }

    pub async fn update_organization(
        &self,
        id: &str,
        patch: &OrganizationPatch,
    ) -> Result<Organization> {
        let current = OrganizationRepository::get(&*self.repo, id).await?;
        let write = patch.apply_to(&current);
        write.validate()?;
        let updated = OrganizationRepository::update(&*self.repo, id, &write).await?;
        info!(organization_id = %id, "organization updated");
        Ok(updated)
    }

    pub async fn delete_organization(&self, id: &str) -> Result<()> {
        OrganizationRepository::delete(&*self.repo, id).await?;
        info!(organization_id = %id, "organization deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nakliye_domain::model::TruckStatus;
    use nakliye_infra::{MemoryStore, WriteCall};
    use nakliye_types::Error;

    fn truck_write() -> TruckWrite {
        TruckWrite {
            plate_number: "34 ABC 123".to_string(),
            driver_name: "Ali Yılmaz".to_string(),
            driver_phone: "05551234567".to_string(),
            capacity: 24.0,
            status: TruckStatus::Unloaded,
        }
    }

    #[tokio::test]
    async fn test_invalid_truck_is_not_sent() {
        let store = Arc::new(MemoryStore::new());
        let service = EntityService::new(Arc::clone(&store));

        let mut write = truck_write();
        write.driver_phone = " ".to_string();
        let outcome = service.create_truck(write).await;
        match &outcome {
            Err(Error::Validation(msg)) => assert_eq!(msg, "Sürücü telefon numarası zorunludur"),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(
            notice_for(Subject::Truck, WriteAction::Create, &outcome).title,
            "Araç eklenirken hata oluştu"
        );
        assert!(store.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_truck_patch_keeps_other_fields() {
        let store = Arc::new(MemoryStore::new());
        let service = EntityService::new(Arc::clone(&store));
        let created = service.create_truck(truck_write()).await.unwrap();

        let patch = TruckPatch {
            driver_name: Some("Veli Demir".to_string()),
            ..Default::default()
        };
        let updated = service.update_truck(&created.id, &patch).await.unwrap();
        assert_eq!(updated.driver_name, "Veli Demir");
        assert_eq!(updated.plate_number, "34 ABC 123");
        assert_eq!(updated.status, TruckStatus::Unloaded);
    }

    #[tokio::test]
    async fn test_facility_lifecycle() {
        let store = Arc::new(MemoryStore::new());
        let service = EntityService::new(Arc::clone(&store));

        let created = service
            .create_facility(FacilityWrite {
                name: "Ana Depo".to_string(),
                address: "Liman Cd. 1".to_string(),
                city: "Mersin".to_string(),
                country: "Türkiye".to_string(),
            })
            .await
            .unwrap();
        let outcome = service.delete_facility(&created.id).await;
        assert!(outcome.is_ok());
        assert_eq!(
            notice_for(Subject::Facility, WriteAction::Delete, &outcome).message,
            "Depo başarıyla silindi."
        );
        assert_eq!(
            store.writes().await,
            vec![WriteCall::CreateFacility, WriteCall::DeleteFacility(created.id.clone())]
        );
    }

    #[tokio::test]
    async fn test_update_missing_organization_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let service = EntityService::new(store);

        let err = service
            .update_organization("nope", &OrganizationPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
