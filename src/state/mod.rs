//! Application state modules
//!
//! Each state struct owns its related fields and is passed explicitly to the
//! commands that use it. Nothing here is global.

mod catalog;
mod details;

pub use catalog::CatalogState;
pub use details::DetailsState;
