pub mod dashboard;
pub mod status_update;
pub mod submissions;
