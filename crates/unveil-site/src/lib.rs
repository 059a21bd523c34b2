//! Site collaborators around the reveal engine.
//!
//! - [`content`]: product and solution records embedded as JSON
//! - [`page`]: section layouts and their reveal settings
//! - [`router`]: navigation with full teardown between pages
//! - [`form`]: contact form validation and submission
//! - [`widgets`]: dropdowns, accordion, modal, magnetic button, orbit

pub mod content;
pub mod form;
pub mod page;
pub mod router;
pub mod widgets;

pub use content::{Catalog, CatalogError, Entry, EntryKind, Feature};
pub use form::{
    ContactForm, Field, FormController, FormStatus, HttpTransport, SubmitOutcome, SubmitResponse,
    Transport, TransportError,
};
pub use page::{MountedPage, MountedSection, PageLayout, Section, SectionKind};
pub use router::{NavigationError, PageFrame, Router, HOME};
