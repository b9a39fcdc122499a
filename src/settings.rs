/*!

Per-property configuration: the [`PropertySetting`] record, the ordered store the
resolver scans, and the fluent builder used by
[`MappingRegistry::configure`](crate::registry::MappingRegistry::configure).

Settings are held in insertion-ordered maps (`IndexMap`), outer map keyed by the
configured type, inner map keyed by source property name. Alias resolution scans the
outer map in insertion order, so the order in which types are configured is
observable (see the registry docs for why the scan is cross-type).

*/

use std::any::TypeId;
use std::marker::PhantomData;

use indexmap::IndexMap;

use crate::document::{Document, DocumentInfo};

/// Configuration recorded for a single property of a single type.
#[derive(Clone, Debug)]
pub struct PropertySetting {
    source_property: String,
    alias: Option<String>,
    is_identifier: bool,
    is_ignored: bool,
}

impl PropertySetting {
    pub(crate) fn new(source_property: &str) -> Self {
        PropertySetting {
            source_property: source_property.to_string(),
            alias: None,
            is_identifier: false,
            is_ignored: false,
        }
    }

    /// Serialize this property under `alias` instead of its own name.
    pub fn use_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        self.alias = Some(alias.into());
        self
    }

    /// Mark this property as the type's document identifier.
    pub fn identifier(&mut self) -> &mut Self {
        self.is_identifier = true;
        self
    }

    /// Exclude this property from serialization.
    pub fn ignore(&mut self) -> &mut Self {
        self.is_ignored = true;
        self
    }

    #[must_use]
    pub fn source_property(&self) -> &str {
        &self.source_property
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.is_identifier
    }

    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.is_ignored
    }
}

/// The ordered collection of property settings for all configured types.
#[derive(Default)]
pub(crate) struct PropertySettingStore {
    settings: IndexMap<TypeId, IndexMap<String, PropertySetting>>,
}

impl PropertySettingStore {
    /// Appends a batch of settings produced by one configuration action. Settings
    /// for a property already configured on the same type are replaced; the type's
    /// position in the scan order is kept from its first configuration.
    pub(crate) fn merge(
        &mut self,
        type_id: TypeId,
        additions: IndexMap<String, PropertySetting>,
    ) {
        self.settings.entry(type_id).or_default().extend(additions);
    }

    /// The first setting for `property` across all configured types, in store
    /// iteration order, independent of declaring type.
    pub(crate) fn find_any(&self, property: &str) -> Option<&PropertySetting> {
        self.settings.values().find_map(|map| map.get(property))
    }

    /// The setting for `property` configured on exactly the given type.
    pub(crate) fn find_exact(
        &self,
        type_id: TypeId,
        property: &str,
    ) -> Option<&PropertySetting> {
        self.settings.get(&type_id).and_then(|map| map.get(property))
    }

    pub(crate) fn remove_type(&mut self, type_id: TypeId) {
        self.settings.shift_remove(&type_id);
    }
}

/// The fluent builder handed to a configuration action. Accumulates property
/// settings and type-level bindings, which the registry merges when the action
/// returns.
pub struct TypeConfiguration<T: Document> {
    pub(crate) settings: IndexMap<String, PropertySetting>,
    pub(crate) collection: Option<String>,
    pub(crate) connection: Option<String>,
    pub(crate) summary: Option<DocumentInfo>,
    marker: PhantomData<fn() -> T>,
}

impl<T: Document> TypeConfiguration<T> {
    pub(crate) fn new() -> Self {
        TypeConfiguration {
            settings: IndexMap::new(),
            collection: None,
            connection: None,
            summary: None,
            marker: PhantomData,
        }
    }

    /// The setting for one of the type's properties, created on first use.
    pub fn property(&mut self, name: &str) -> &mut PropertySetting {
        self.settings
            .entry(name.to_string())
            .or_insert_with(|| PropertySetting::new(name))
    }

    /// Store documents of this type in the named collection instead of the
    /// default (the type's simple name).
    pub fn use_collection(&mut self, name: impl Into<String>) -> &mut Self {
        self.collection = Some(name.into());
        self
    }

    /// Read and write documents of this type over the given connection.
    pub fn use_connection_string(&mut self, connection: impl Into<String>) -> &mut Self {
        self.connection = Some(connection.into());
        self
    }

    /// Bind `S` as the summary/projection type for this type.
    pub fn summary_of<S: Document>(&mut self) -> &mut Self {
        self.summary = Some(DocumentInfo::of::<S>());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_document;

    struct User;
    define_document!(User, [Id, Name]);

    struct Order;
    define_document!(Order, [Id, Name, Total]);

    fn settings_for<T: Document>(
        action: impl FnOnce(&mut TypeConfiguration<T>),
    ) -> IndexMap<String, PropertySetting> {
        let mut configuration = TypeConfiguration::<T>::new();
        action(&mut configuration);
        configuration.settings
    }

    #[test]
    fn builder_records_alias_and_ignore() {
        let settings = settings_for::<User>(|cfg| {
            cfg.property("Name").use_alias("fullName");
            cfg.property("Id").identifier().ignore();
        });

        let name = &settings["Name"];
        assert_eq!(name.source_property(), "Name");
        assert_eq!(name.alias(), Some("fullName"));
        assert!(!name.is_ignored());

        let id = &settings["Id"];
        assert_eq!(id.alias(), None);
        assert!(id.is_identifier());
        assert!(id.is_ignored());
    }

    #[test]
    fn repeated_property_calls_update_one_setting() {
        let settings = settings_for::<User>(|cfg| {
            cfg.property("Name").use_alias("first");
            cfg.property("Name").use_alias("second");
        });
        assert_eq!(settings.len(), 1);
        assert_eq!(settings["Name"].alias(), Some("second"));
    }

    #[test]
    fn cross_type_scan_takes_first_configured_type() {
        let mut store = PropertySettingStore::default();
        store.merge(
            TypeId::of::<Order>(),
            settings_for::<Order>(|cfg| {
                cfg.property("Name").use_alias("orderName");
            }),
        );
        store.merge(
            TypeId::of::<User>(),
            settings_for::<User>(|cfg| {
                cfg.property("Name").use_alias("userName");
            }),
        );

        // `Order` was configured first, so its setting wins the scan even when the
        // query is about `User`.
        let found = store.find_any("Name").unwrap();
        assert_eq!(found.alias(), Some("orderName"));
    }

    #[test]
    fn exact_lookup_is_type_scoped() {
        let mut store = PropertySettingStore::default();
        store.merge(
            TypeId::of::<Order>(),
            settings_for::<Order>(|cfg| {
                cfg.property("Total").ignore();
            }),
        );

        assert!(store
            .find_exact(TypeId::of::<Order>(), "Total")
            .unwrap()
            .is_ignored());
        assert!(store.find_exact(TypeId::of::<User>(), "Total").is_none());
    }

    #[test]
    fn remove_type_clears_its_settings_only() {
        let mut store = PropertySettingStore::default();
        store.merge(
            TypeId::of::<User>(),
            settings_for::<User>(|cfg| {
                cfg.property("Name").use_alias("userName");
            }),
        );
        store.merge(
            TypeId::of::<Order>(),
            settings_for::<Order>(|cfg| {
                cfg.property("Total").ignore();
            }),
        );

        store.remove_type(TypeId::of::<User>());
        assert!(store.find_exact(TypeId::of::<User>(), "Name").is_none());
        assert!(store.find_exact(TypeId::of::<Order>(), "Total").is_some());
    }
}
