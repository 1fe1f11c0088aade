//! Campus Admin Core - headless administration engine
//!
//! One "database page" engine for activities, students, roles, rooms,
//! groups and devices, parameterised by per-entity configuration.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              ADMIN PAGE                                 │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌─────────────┐ │
//! │  │     List     │  │    Detail    │  │     Form     │  │   Dialog    │ │
//! │  │ Orchestrator │  │   Composer   │  │    State     │  │  (confirm)  │ │
//! │  │ search/filter│  │ header/badges│  │ coerce/valid.│  │             │ │
//! │  └──────┬───────┘  └──────────────┘  └──────┬───────┘  └─────────────┘ │
//! │         │                                   │                          │
//! │  ┌──────▼───────┐                    ┌──────▼───────┐                  │
//! │  │  Debouncer   │                    │ OptionLoader │                  │
//! │  └──────────────┘                    └──────┬───────┘                  │
//! │                                             │                          │
//! │  ┌──────────────────────────────────────────▼────────────────────────┐ │
//! │  │            EntityService / ApiClient  (REST, /api/...)            │ │
//! │  └───────────────────────────────────────────────────────────────────┘ │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐                  │
//! │  │ EntityConfig │  │    Config    │  │   Logging    │                  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod debounce;
pub mod detail;
pub mod dialog;
pub mod entity;
pub mod error;
pub mod form;
pub mod list;
pub mod logging;
pub mod notice;
pub mod page;
pub mod value;

pub use api::{ApiClient, EntityService, InMemoryService, ListQuery, Page, RestService};
pub use config::AdminConfig;
pub use detail::{compose_detail, DetailView};
pub use dialog::{Dialog, DialogPhase};
pub use entity::{EntityConfig, EntityKind};
pub use error::{AdminError, AdminResult, ApiError, ErrorKind};
pub use form::{FormField, FormSection, FormState, SubmitOutcome};
pub use list::{Confirm, DeleteConfirmation, ListOrchestrator, Refresh};
pub use notice::{Notice, NoticeLevel};
pub use page::{AdminPage, PageMode};
