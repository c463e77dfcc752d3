//! # Shallow
//!
//! Tag-keyed struct comparison and partial merge.
//!
//! Given two values of the same record type, [`diff`] reports the keys of the
//! fields that differ and [`merge`] additionally copies those fields from one
//! value into the other. Fields are matched by their serialization tag (the
//! `json` namespace unless configured otherwise), which makes the pair a good
//! fit for PATCH-style updates: decode the request body into a record, merge
//! it onto the stored one, and learn exactly which keys changed.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine only walks values handed to it
//! - **Stateless**: every call is a pure function of its inputs and options
//! - **Shallow**: fields are compared and replaced whole; only embedded records
//!   are walked into
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! Rust has no runtime reflection, so record types describe their fields once
//! with the [`record!`] macro. Each plain field lists its tags per namespace;
//! embedded fields (`..name`) are flattened into the containing record.
//! Embedded fields must hold a record, an `Option` of one or an
//! `Option<Box<_>>` of one.
//!
//! ### Keys and filters
//!
//! The key of a field is its tag up to the first comma, so
//! `json = "email,omitempty"` gives the key `email`. Untagged fields and empty
//! keys are never compared. A [`KeyFilter`] restricts a call to a set of keys;
//! any map or set of strings works, including the object of a decoded JSON
//! body.
//!
//! ### Embedded optionals
//!
//! When the source side of an optional embedded record is absent, the whole
//! subtree is skipped. When only the target side is absent, [`diff`] compares
//! against its zero value, and [`merge`] creates it from that zero value as
//! soon as one of its keys is written.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Deserialize;
//! use shallow::{diff, merge, KeyFilter};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
//! #[serde(default)]
//! struct User {
//!     name: String,
//!     email: Option<String>,
//!     age: u32,
//! }
//!
//! shallow::record! {
//!     User {
//!         name [json = "name"],
//!         email [json = "email,omitempty"],
//!         age [json = "age"],
//!     }
//! }
//!
//! let mut stored = User {
//!     name: "Alice".into(),
//!     email: None,
//!     age: 30,
//! };
//!
//! // A PATCH body only carries the keys it wants to change
//! let body: serde_json::Value = serde_json::json!({"email": "alice@example.com", "age": 30});
//! let patch: User = serde_json::from_value(body.clone()).unwrap();
//! let keys = body.as_object().unwrap();
//!
//! assert_eq!(diff(&stored, &patch, keys).unwrap(), vec!["email"]);
//!
//! let changed = merge(&mut stored, &patch, keys).unwrap();
//! assert_eq!(changed, vec!["email"]);
//! assert_eq!(stored.name, "Alice");
//! assert_eq!(stored.email.as_deref(), Some("alice@example.com"));
//!
//! // Nothing left to change for the keys in the body
//! assert!(diff(&stored, &patch, keys).unwrap().is_empty());
//!
//! // Without a filter the missing `name` counts as a difference
//! assert_eq!(diff(&stored, &patch, KeyFilter::All).unwrap(), vec!["name"]);
//! ```
//!
//! ## Errors
//!
//! Both operations fail with [`Error::InvalidArgument`] when an operand is
//! absent, is not a record, or the two operands have different types, and with
//! [`Error::UnsupportedField`] when an embedded field holds something other
//! than a record. A merge that fails halfway keeps the fields it already wrote.

pub mod equal;
pub mod error;
pub mod filter;
pub mod options;
pub mod record;
pub mod reflect;
pub mod traverse;

// Re-export main types at crate root
pub use equal::deep_eq;
pub use error::{Error, Result};
pub use filter::{KeyFilter, KeySet};
pub use options::{Options, DEFAULT_TAG};
pub use record::FieldInfo;
pub use reflect::{Field, FieldMut, Kind, KindMut, Map, Optional, Reflect, Shape, Struct};
pub use traverse::{diff, diff_with, merge, merge_with};
