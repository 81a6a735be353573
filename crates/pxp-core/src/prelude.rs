pub use crate::app::App;
pub use pxp_types::error::{ClResult, Error};
pub use pxp_types::types::{ApiResponse, EntityType, RecordId, Role};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
