/*!

The type surface the registry reads: a [`Document`] is any type whose values are
stored as records of a document collection. The registry never inspects a value,
only the static description a `Document` impl provides (simple type name, declared
property names, reference-wrapper marker).

Implement the trait with the [`define_document!`](crate::define_document) macro:

```rust
use docmap::define_document;

struct User {
    id: u64,
    name: String,
}

define_document!(User, [Id, Name]);
```

Property names are declared in the casing the serialization layer emits, which need
not match Rust field casing.

*/

use std::any::{Any, TypeId};
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

/// The simple name of a type: the last path segment, with any generic arguments
/// stripped. `my_app::models::User` becomes `User`; `DbRef<User>` becomes `DbRef`.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A type whose values live in a document collection. All documents must implement
/// this trait, normally through [`define_document!`](crate::define_document).
pub trait Document: Any {
    /// Simple name of the document type. Used as the default collection name.
    #[must_use]
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name::<Self>()
    }

    /// The declared property names, in declaration order.
    fn properties() -> &'static [&'static str]
    where
        Self: Sized;

    /// Whether this type is a reference wrapper denoting a link to another document.
    /// Reference wrappers are exempt from identifier-field renaming.
    #[must_use]
    fn is_reference() -> bool
    where
        Self: Sized,
    {
        false
    }
}

/// Defines a [`Document`] with the following parameters:
/// * `$document`: The document type
/// * a bracketed list of property names, in declaration order
#[macro_export]
macro_rules! define_document {
    ($document:ty, [$($property:ident),* $(,)?]) => {
        impl $crate::document::Document for $document {
            fn properties() -> &'static [&'static str] {
                &[$(stringify!($property)),*]
            }
        }
    };
}
pub use define_document;

/// A static description of a document type, captured once at a call site so that
/// non-generic code (probes, the summary table) can work with it.
#[derive(Copy, Clone, Debug)]
pub struct DocumentInfo {
    type_id: TypeId,
    name: &'static str,
    properties: &'static [&'static str],
    is_reference: bool,
}

impl DocumentInfo {
    #[must_use]
    pub fn of<T: Document>() -> Self {
        DocumentInfo {
            type_id: TypeId::of::<T>(),
            name: T::type_name(),
            properties: T::properties(),
            is_reference: T::is_reference(),
        }
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn properties(&self) -> &'static [&'static str] {
        self.properties
    }

    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.is_reference
    }
}

/// A link to a document of type `T` in another collection, stored under the store's
/// `$ref`/`$id` convention. The identifier key type defaults to `String`.
///
/// The wrapper's own `Id` property keeps its configured or default name when
/// serialized; only true document identifiers are renamed to the reserved field.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "I: Serialize",
    deserialize = "I: Deserialize<'de>"
))]
pub struct DbRef<T: Document, I = String> {
    /// The collection the referenced document lives in.
    #[serde(rename = "$ref")]
    pub collection: String,
    /// The referenced document's identifier value.
    #[serde(rename = "$id")]
    pub id: I,
    #[serde(skip)]
    marker: PhantomData<fn() -> T>,
}

impl<T: Document, I> DbRef<T, I> {
    /// A reference into `T`'s default collection (its simple type name). If the
    /// target type has a configured collection binding, use `with_collection` with
    /// the name resolved from the registry.
    pub fn new(id: I) -> Self {
        Self::with_collection(T::type_name(), id)
    }

    pub fn with_collection(collection: impl Into<String>, id: I) -> Self {
        DbRef {
            collection: collection.into(),
            id,
            marker: PhantomData,
        }
    }
}

// Manual impls: the std derives would put bounds on `T`, which is only a marker here.
impl<T: Document, I: Clone> Clone for DbRef<T, I> {
    fn clone(&self) -> Self {
        DbRef {
            collection: self.collection.clone(),
            id: self.id.clone(),
            marker: PhantomData,
        }
    }
}

impl<T: Document, I: PartialEq> PartialEq for DbRef<T, I> {
    fn eq(&self, other: &Self) -> bool {
        self.collection == other.collection && self.id == other.id
    }
}

impl<T: Document, I: std::fmt::Debug> std::fmt::Debug for DbRef<T, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbRef")
            .field("collection", &self.collection)
            .field("id", &self.id)
            .finish()
    }
}

impl<T: Document, I: Any> Document for DbRef<T, I> {
    fn properties() -> &'static [&'static str] {
        &["Collection", "Id"]
    }

    fn is_reference() -> bool {
        true
    }
}
