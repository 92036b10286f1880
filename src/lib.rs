//! Quire - a flat-file YAML document store
//!
//! An embedded record database for a small publishing platform: one
//! directory per collection, one YAML file per record, no schema.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                 callers (controllers, CLI)            │
//! └───────────┬──────────────────────────────┬────────────┘
//!             │ single-record access         │ snapshot queries
//!             ▼                              ▼
//! ┌───────────────────────┐  list()  ┌────────────────────┐
//! │         Store         │ ───────> │   Search + Rules   │
//! │  create / read /      │          │  filter / order /  │
//! │  update / remove      │          │  get / first       │
//! └───┬───────────────┬───┘          │   (in-memory)      │
//!     │               │              └────────────────────┘
//!     ▼               ▼
//! ┌─────────┐   ┌───────────┐
//! │  Codec  │   │  Resolver │
//! │  (YAML) │   │  (paths)  │
//! └────┬────┘   └─────┬─────┘
//!      │              │
//!      ▼              ▼
//! ┌───────────────────────────────────────────────────────┐
//! │   File System    /<collection>/<uuid>.yaml            │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! The query layer never touches the filesystem; it operates on the
//! snapshot handed to it, which keeps query semantics independent of
//! storage mechanics.

pub mod error;
pub mod query;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
pub use query::{Rule, Search};
pub use store::record::{Fields, Record, Revision, Value};
pub use store::Store;
