//! Villa aggregate
//!
//! Villa records as served by the villa service, search filters, and the
//! catalog port.

pub mod model;
pub mod repository;

pub use model::{Villa, VillaFilter, VillaImage, VillaInput};
pub use repository::VillaCatalog;
