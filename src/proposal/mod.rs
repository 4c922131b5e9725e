//! Proposal module
//!
//! Proposal working copies: the data model, section editing, templates
//! and the in-memory store.

mod models;
mod sections;
mod store;
pub mod templates;

pub use models::*;
pub use sections::{SectionDraft, SectionPatch};
pub use store::ProposalStore;
