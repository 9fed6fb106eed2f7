pub mod content_client;
pub mod http;
pub mod study_material_client;

pub use content_client::{ContentStore, HttpContentStore};
pub use http::{ApiClient, RetryPolicy};
pub use study_material_client::StudyMaterialClient;
