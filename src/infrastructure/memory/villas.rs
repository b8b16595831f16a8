//! In-memory villa catalog

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use super::require_admin;
use crate::domain::{
    AppResult, Credentials, DomainError, Villa, VillaCatalog, VillaFilter, VillaImage, VillaInput,
};

pub struct InMemoryVillaCatalog {
    villas: DashMap<i64, Villa>,
    admins: DashSet<i64>,
    next_id: AtomicI64,
}

impl InMemoryVillaCatalog {
    pub fn new(villas: Vec<Villa>) -> Self {
        let catalog = Self {
            villas: DashMap::new(),
            admins: DashSet::new(),
            next_id: AtomicI64::new(1),
        };
        for villa in villas {
            catalog.insert(villa);
        }
        catalog
    }

    pub fn insert(&self, villa: Villa) {
        self.next_id.fetch_max(villa.id + 1, Ordering::SeqCst);
        self.villas.insert(villa.id, villa);
    }

    pub fn grant_admin(&self, user_id: i64) {
        self.admins.insert(user_id);
    }
}

#[async_trait]
impl VillaCatalog for InMemoryVillaCatalog {
    async fn list(&self, filter: &VillaFilter) -> AppResult<Vec<Villa>> {
        let mut villas: Vec<Villa> = self
            .villas
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        villas.sort_by_key(|v| v.id);
        Ok(villas)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Villa>> {
        Ok(self.villas.get(&id).map(|v| v.clone()))
    }

    async fn create(
        &self,
        input: &VillaInput,
        image: &VillaImage,
        credentials: &Credentials,
    ) -> AppResult<Villa> {
        require_admin(&self.admins, credentials)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let villa = input.clone().into_villa(id, vec![image.file_name.clone()]);
        self.villas.insert(id, villa.clone());
        Ok(villa)
    }

    async fn update(
        &self,
        id: i64,
        input: &VillaInput,
        image: Option<&VillaImage>,
        credentials: &Credentials,
    ) -> AppResult<Villa> {
        require_admin(&self.admins, credentials)?;
        let mut entry = self
            .villas
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("Villa", "id", id))?;
        let images = match image {
            Some(image) => vec![image.file_name.clone()],
            None => entry.images.clone(),
        };
        *entry = input.clone().into_villa(id, images);
        Ok(entry.clone())
    }

    async fn delete(&self, id: i64, credentials: &Credentials) -> AppResult<()> {
        require_admin(&self.admins, credentials)?;
        self.villas
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Villa", "id", id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::tests::make_token;
    use crate::domain::villa::model::tests::{sample_input, sample_villa};
    use crate::domain::AppError;

    fn photo(name: &str) -> VillaImage {
        VillaImage {
            file_name: name.into(),
            content_type: Some("image/jpeg".into()),
            bytes: vec![0xff, 0xd8, 0xff],
        }
    }

    fn admin_catalog() -> (InMemoryVillaCatalog, Credentials) {
        let catalog = InMemoryVillaCatalog::new(vec![sample_villa(1), sample_villa(4)]);
        catalog.grant_admin(1);
        (catalog, Credentials::bearer(make_token("1", i64::MAX / 2)))
    }

    #[tokio::test]
    async fn create_assigns_next_id_and_stores_image() {
        let (catalog, admin) = admin_catalog();
        let villa = catalog
            .create(&sample_input(), &photo("lodge.jpg"), &admin)
            .await
            .unwrap();
        assert_eq!(villa.id, 5);
        assert_eq!(villa.images, vec!["lodge.jpg".to_string()]);
        assert_eq!(catalog.find_by_id(5).await.unwrap(), Some(villa));

        let guest = Credentials::bearer(make_token("2", i64::MAX / 2));
        let err = catalog
            .create(&sample_input(), &photo("x.jpg"), &guest)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_images_without_upload() {
        let (catalog, admin) = admin_catalog();
        catalog
            .update(1, &sample_input(), Some(&photo("first.jpg")), &admin)
            .await
            .unwrap();

        let mut input = sample_input();
        input.title = "Renamed".into();
        let villa = catalog.update(1, &input, None, &admin).await.unwrap();
        assert_eq!(villa.id, 1);
        assert_eq!(villa.title, "Renamed");
        assert_eq!(villa.city, "Masuleh");
        assert_eq!(villa.images, vec!["first.jpg".to_string()]);

        let err = catalog.update(42, &input, None, &admin).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let mut kish = sample_villa(1);
        kish.city = "Kish".into();
        let catalog = InMemoryVillaCatalog::new(vec![sample_villa(3), kish, sample_villa(2)]);

        let all = catalog.list(&VillaFilter::default()).await.unwrap();
        assert_eq!(all.iter().map(|v| v.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        let filter = VillaFilter {
            city: Some("Kish".into()),
            ..Default::default()
        };
        let found = catalog.list(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[tokio::test]
    async fn delete_requires_admin() {
        let catalog = InMemoryVillaCatalog::new(vec![sample_villa(1)]);
        catalog.grant_admin(1);
        let guest = Credentials::bearer(make_token("2", i64::MAX / 2));
        let admin = Credentials::bearer(make_token("1", i64::MAX / 2));

        let err = catalog.delete(1, &guest).await.unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Forbidden(_))));

        catalog.delete(1, &admin).await.unwrap();
        assert!(catalog.find_by_id(1).await.unwrap().is_none());
        assert!(catalog.delete(1, &admin).await.is_err());
    }
}
