pub mod dates;
pub mod forms;
pub mod schema;
pub mod stats;
pub mod status;

pub use schema::SchemaBinding;
pub use stats::DashboardStats;
pub use status::{CanonicalStatus, StatusBadge};
