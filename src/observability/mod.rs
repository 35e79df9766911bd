//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing (trace: declared, debug: bound, info: applied)
//! http    (debug: bound, info: serving, tower-http request spans)
//!     → logging.rs (filter + formatter)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured fields, never interpolated messages
//! - Request IDs come from the request-id middleware and show up in spans

pub mod logging;

pub use logging::init_logging;
