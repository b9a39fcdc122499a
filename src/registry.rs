/*!

The [`MappingRegistry`]: one process-wide object owning every table the crate
manages — property settings, the identifier cache, type converters, and the
collection/connection/summary bindings.

# Lifecycle

Build the registry at startup, run every [`configure`](MappingRegistry::configure)
and [`register_converter`](MappingRegistry::register_converter) call before read
traffic begins, then share it (`&` or `Arc`) with the serialization and query
layers. Mutation takes `&mut self` and reads take `&self`, so the borrow checker
enforces the write-then-read phase separation for a shared registry. The identifier
cache is the only state written on the read path; it is internally synchronized and
idempotent, so concurrent first access to the same type is benign.

# Resolution order for aliases

For `get_property_alias::<T>("P")`:

1. If `P` is `T`'s identifier property and `T` is not a reference wrapper
   ([`DbRef`](crate::document::DbRef)), the reserved field name `_id` is returned,
   overriding any configured alias.
2. Otherwise the settings of *all* configured types are scanned in configuration
   order for the first setting named `P`; its alias is returned if it has one. The
   scan is deliberately not scoped to `T`: an alias declared once against a shared
   base type applies to every type with a same-named property. The flip side is
   that an alias can leak between unrelated types that happen to share a property
   name; callers who need exact scoping should alias the property on each type.
3. Otherwise `P` is returned unchanged.

Ignore resolution is exact-type-scoped: excluding a property from serialization is
too destructive to apply to a type that never asked for it.

*/

use std::any::{Any, TypeId};

use crate::convert::{ConverterRegistry, TypeConverter};
use crate::document::{Document, DocumentInfo};
use crate::error::DocmapError;
use crate::hashing::HashMap;
use crate::identifier::{ConventionProbe, IdentifierProbe, IdentifierResolver};
use crate::log::debug;
use crate::settings::{PropertySettingStore, TypeConfiguration};

pub struct MappingRegistry {
    identifiers: IdentifierResolver,
    settings: PropertySettingStore,
    converters: ConverterRegistry,
    collections: HashMap<TypeId, String>,
    connections: HashMap<TypeId, String>,
    summaries: HashMap<TypeId, DocumentInfo>,
}

impl MappingRegistry {
    /// A registry resolving identifier properties with the default
    /// [`ConventionProbe`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_probe(ConventionProbe)
    }

    /// A registry resolving identifier properties with a caller-supplied probe.
    pub fn with_probe(probe: impl IdentifierProbe + 'static) -> Self {
        MappingRegistry {
            identifiers: IdentifierResolver::new(Box::new(probe)),
            settings: PropertySettingStore::default(),
            converters: ConverterRegistry::default(),
            collections: HashMap::default(),
            connections: HashMap::default(),
            summaries: HashMap::default(),
        }
    }

    /// Configures properties and bindings for type `T` through a fluent builder:
    ///
    /// ```rust
    /// # use docmap::{define_document, MappingRegistry};
    /// # struct User;
    /// # define_document!(User, [Id, Name, Age]);
    /// let mut registry = MappingRegistry::new();
    /// registry.configure::<User>(|cfg| {
    ///     cfg.property("Name").use_alias("fullName");
    ///     cfg.property("Age").ignore();
    ///     cfg.use_collection("users");
    /// });
    /// ```
    pub fn configure<T: Document>(
        &mut self,
        configuration_action: impl FnOnce(&mut TypeConfiguration<T>),
    ) {
        let mut configuration = TypeConfiguration::<T>::new();
        configuration_action(&mut configuration);

        let type_id = TypeId::of::<T>();

        // An explicit identifier() mark is a first successful resolution, so it
        // seeds the cache and the structural probe never runs for this type.
        for setting in configuration.settings.values() {
            if setting.is_identifier() {
                self.identifiers.seed(type_id, setting.source_property());
            }
        }

        debug!(
            "configured document type '{}' ({} property settings)",
            T::type_name(),
            configuration.settings.len()
        );

        self.settings.merge(type_id, configuration.settings);
        if let Some(collection) = configuration.collection {
            self.collections.insert(type_id, collection);
        }
        if let Some(connection) = configuration.connection {
            self.connections.insert(type_id, connection);
        }
        if let Some(summary) = configuration.summary {
            self.summaries.insert(type_id, summary);
        }
    }

    /// Whether `property` is the identifier property of `T`. The first successful
    /// structural resolution is cached for the life of the registry.
    #[must_use]
    pub fn is_identifier_property<T: Document>(&self, property: &str) -> bool {
        self.identifiers
            .is_identifier_property(&DocumentInfo::of::<T>(), property)
    }

    /// The field name `property` serializes under for documents of type `T`. See
    /// the module docs for the resolution order. Total: an unconfigured property
    /// maps to itself.
    #[must_use]
    pub fn get_property_alias<'a, T: Document>(&'a self, property: &'a str) -> &'a str {
        if self.is_identifier_property::<T>(property) && !T::is_reference() {
            return "_id";
        }
        if let Some(setting) = self.settings.find_any(property) {
            if let Some(alias) = setting.alias() {
                return alias;
            }
        }
        property
    }

    /// Whether `property` of type `T` is excluded from serialization. Scoped to
    /// exactly `T`; settings on other types never ignore a property here.
    #[must_use]
    pub fn get_property_ignored<T: Document>(&self, property: &str) -> bool {
        self.settings
            .find_exact(TypeId::of::<T>(), property)
            .is_some_and(crate::settings::PropertySetting::is_ignored)
    }

    /// Registers a default-constructed `C` as the converter for native value type
    /// `N`.
    ///
    /// # Errors
    ///
    /// [`DocmapError::DuplicateConverter`] if `N` already has a converter; remove
    /// it first to replace it.
    pub fn register_converter<N: Any, C: TypeConverter + Default>(
        &mut self,
    ) -> Result<(), DocmapError> {
        self.converters.register::<N, C>()
    }

    /// The converter registered for the native value type with the given
    /// `TypeId`, if any.
    #[must_use]
    pub fn get_converter(&self, native: TypeId) -> Option<&dyn TypeConverter> {
        self.converters.get(native)
    }

    /// Typed variant of [`get_converter`](Self::get_converter).
    #[must_use]
    pub fn get_converter_for<N: Any>(&self) -> Option<&dyn TypeConverter> {
        self.get_converter(TypeId::of::<N>())
    }

    /// Removes the converter for native type `N`. Removing an absent converter is
    /// a no-op.
    pub fn remove_converter<N: Any>(&mut self) {
        self.converters.remove(TypeId::of::<N>());
    }

    /// The collection documents of type `T` are stored in: the configured binding,
    /// or the type's simple name.
    #[must_use]
    pub fn get_collection_name<T: Document>(&self) -> &str {
        self.collections
            .get(&TypeId::of::<T>())
            .map(String::as_str)
            .unwrap_or_else(|| T::type_name())
    }

    /// The connection string configured for type `T`. There is no default.
    #[must_use]
    pub fn get_connection_string<T: Document>(&self) -> Option<&str> {
        self.connections.get(&TypeId::of::<T>()).map(String::as_str)
    }

    /// The summary/projection type bound to `T`, if one was configured.
    #[must_use]
    pub fn get_summary_type<T: Document>(&self) -> Option<DocumentInfo> {
        self.summaries.get(&TypeId::of::<T>()).copied()
    }

    /// Removes every mapping scoped to `T`: property settings, collection,
    /// connection and summary bindings, the cached identifier resolution, and a
    /// converter keyed by `T` itself.
    ///
    /// Added to support unit testing, where tests share one registry and must not
    /// see each other's configuration. Unsafe for production use: it mutates
    /// shared state that readers assume is frozen after startup.
    pub fn remove_mappings_for<T: Document>(&mut self) {
        let type_id = TypeId::of::<T>();
        self.settings.remove_type(type_id);
        self.collections.remove(&type_id);
        self.connections.remove(&type_id);
        self.summaries.remove(&type_id);
        self.identifiers.clear(type_id);
        self.converters.remove(type_id);
    }
}

impl Default for MappingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
