pub mod api;
pub mod docs;
pub mod health;
pub mod metrics;

pub use api::*;
pub use docs::{openapi_json, swagger_ui, ApiDoc};
pub use health::*;
pub use metrics::*;
