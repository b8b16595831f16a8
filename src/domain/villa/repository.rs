//! Villa catalog interface

use async_trait::async_trait;

use super::model::{Villa, VillaFilter, VillaImage, VillaInput};
use crate::domain::{AppResult, Credentials};

#[async_trait]
pub trait VillaCatalog: Send + Sync {
    /// List villas matching the filter
    async fn list(&self, filter: &VillaFilter) -> AppResult<Vec<Villa>>;

    /// Find villa by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Villa>>;

    /// Create a villa from `input` with `image` as its picture (admin only)
    async fn create(
        &self,
        input: &VillaInput,
        image: &VillaImage,
        credentials: &Credentials,
    ) -> AppResult<Villa>;

    /// Replace a villa's attributes. Existing images are kept unless `image`
    /// is given (admin only).
    async fn update(
        &self,
        id: i64,
        input: &VillaInput,
        image: Option<&VillaImage>,
        credentials: &Credentials,
    ) -> AppResult<Villa>;

    /// Delete a villa (admin only; the villa service checks the role)
    async fn delete(&self, id: i64, credentials: &Credentials) -> AppResult<()>;
}
