//! Page and section content model.

pub mod model;
pub mod ordering;
pub mod slug;
pub mod templates;

pub use model::{NewPage, NewSection, Page, PageWithSections, Section, SectionKind, SiteRoute, User};
pub use ordering::OrderingError;
