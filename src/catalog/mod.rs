mod loader;

use serde::{Deserialize, Serialize};

pub use loader::{load_catalog, CatalogSource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraRecord {
    pub id: u64,
    pub location: String,
    pub stream: String,
}
