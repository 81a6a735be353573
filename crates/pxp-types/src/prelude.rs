pub use crate::error::{ClResult, Error};
pub use crate::types::{ApiResponse, EntityType, RecordId, Role};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
