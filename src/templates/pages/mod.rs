pub mod admin;
pub mod contact;
pub mod error;
pub mod home;
pub mod registration;

pub use admin::{admin_page, AdminVm};
pub use contact::contact_page;
pub use error::error_page;
pub use home::home_page;
pub use registration::registration_page;
