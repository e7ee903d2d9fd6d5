mod admin;
mod assets;
mod auth;
mod contact;
mod public;
mod site;
mod uploads;

pub use admin::{normalize_section_data, AdminFeature};
pub use assets::{AssetsFeature, ContentPath};
pub use auth::AuthFeature;
pub use contact::{compose, ContactFeature, ContactForm, FormField};
pub use public::{get_page_by_slug, list_routes, PublicFeature};
pub use site::SiteFeature;
pub use uploads::UploadsFeature;
