//! A configuration registry mapping Rust types to the field and collection
//! conventions of a schemaless document store.
//!
//! Serialization code should never hardcode naming rules. Instead, a single
//! [`MappingRegistry`] answers, per document type:
//! * which property is the document identifier, and that it serializes under the
//!   store's reserved `_id` field
//! * which properties are renamed (aliased) and which are excluded from
//!   serialization
//! * which custom [`TypeConverter`] applies to a field's native value type
//! * which collection the type's documents belong to, and over which connection
//!   they are reached
//!
//! Types describe their property surface through the [`Document`] trait, normally
//! via the [`define_document!`] macro. The registry is built and populated at
//! startup through [`MappingRegistry::configure`] and read concurrently afterwards:
//!
//! ```rust
//! use docmap::{define_document, MappingRegistry};
//!
//! struct User {
//!     id: u64,
//!     name: String,
//!     age: u32,
//! }
//! define_document!(User, [Id, Name, Age]);
//!
//! let mut registry = MappingRegistry::new();
//! registry.configure::<User>(|cfg| {
//!     cfg.property("Name").use_alias("fullName");
//!     cfg.use_collection("users");
//! });
//!
//! assert_eq!(registry.get_property_alias::<User>("Id"), "_id");
//! assert_eq!(registry.get_property_alias::<User>("Name"), "fullName");
//! assert_eq!(registry.get_collection_name::<User>(), "users");
//! ```

pub mod convert;
pub mod document;
pub mod error;
pub mod hashing;
pub mod identifier;
pub mod log;
pub mod prelude;
pub mod registry;
pub mod settings;

pub use crate::convert::{DurationConverter, TypeConverter};
pub use crate::document::{short_type_name, DbRef, Document, DocumentInfo};
pub use crate::error::DocmapError;
pub use crate::hashing::{HashMap, HashSet};
pub use crate::identifier::{ConventionProbe, IdentifierProbe};
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::registry::MappingRegistry;
pub use crate::settings::{PropertySetting, TypeConfiguration};
