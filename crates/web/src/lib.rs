//! Storefront presentation: view models, templates, the page surface, and event handling.

pub mod dom;
pub mod page;
pub mod render;
pub mod storefront;
pub mod templates;
pub mod view;

pub use page::{DocumentPage, Page};
pub use render::{RenderError, RenderOutcome, Renderer};
pub use storefront::{EventOutcome, PageEvent, Storefront, StorefrontSettings};
pub use view::{CartView, CatalogView};
