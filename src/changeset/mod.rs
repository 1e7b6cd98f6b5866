//! Core changeset layer: the release record and the query pipeline
//!
//! This module provides the core functionality for ranking, filtering,
//! grouping and rendering Unity releases, and the operations resolving a
//! version string to its changeset.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────────────────┐
//! │   Catalog   │────▶│  sort ▶ filter ▶ group ▶ fmt │
//! │  (providers)│     │          (pipeline)          │
//! └─────────────┘     └──────────────────────────────┘
//!        │                          │
//!        ▼                          ▼
//! ┌─────────────┐            ┌─────────────┐
//! │   release   │            │   number    │
//! │  (record)   │            │ (total ord) │
//! └─────────────┘            └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`release`]: the `UnityChangeset` record and its classification enums
//! - [`number`]: integer encoding giving versions a total order
//! - [`filter`]: range/pattern/lifecycle narrowing of release lists
//! - [`group`]: per-minor-version grouping and reduction
//! - [`output`]: plain-text and JSON rendering
//! - [`search`]: catalog orchestration and the resolve/list operations
//! - [`error`]: error types for lookup and pipeline failures

pub mod error;
pub mod filter;
pub mod group;
pub mod number;
pub mod output;
pub mod release;
pub mod search;
