//! REST service layer

pub mod client;
pub mod privacy;
pub mod service;

pub use client::{ApiClient, Envelope, Pagination};
pub use privacy::{PrivacyConsent, PrivacyConsentSource};
pub use service::{entity_id, EntityService, InMemoryService, ListQuery, Page, RestService};
