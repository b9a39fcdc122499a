/*!

Identifier-property resolution. Determining which property of a type is its document
identifier requires a structural search over the type's property surface, which sits
on the hot path of every field emitted during serialization, so successful results
are cached per type.

The search itself is a pluggable strategy ([`IdentifierProbe`]); the default
[`ConventionProbe`] implements the store's naming conventions. A probe must be
deterministic, side-effect-free, and return at most one property.

*/

use std::any::TypeId;
use std::sync::RwLock;

use crate::document::DocumentInfo;
use crate::log::trace;
use crate::HashMap;

/// A strategy that finds the identifier property of a document type, if it has one.
pub trait IdentifierProbe: Send + Sync {
    fn find_identifier_property(&self, document: &DocumentInfo) -> Option<&'static str>;
}

/// The default probe: the first property named `_id`, else `Id` (any casing), else
/// `{TypeName}Id` (any casing). Property declaration order breaks ties within a tier.
pub struct ConventionProbe;

impl IdentifierProbe for ConventionProbe {
    fn find_identifier_property(&self, document: &DocumentInfo) -> Option<&'static str> {
        let properties = document.properties();
        properties
            .iter()
            .copied()
            .find(|property| *property == "_id")
            .or_else(|| {
                properties
                    .iter()
                    .copied()
                    .find(|property| property.eq_ignore_ascii_case("id"))
            })
            .or_else(|| {
                let conventional = format!("{}Id", document.name());
                properties
                    .iter()
                    .copied()
                    .find(|property| property.eq_ignore_ascii_case(&conventional))
            })
    }
}

/// Composes a probe with a per-type cache of resolved identifier-property names.
///
/// The cache is the only state written outside the configuration phase, so it sits
/// behind an `RwLock`. A redundant probe under concurrent first access is benign:
/// the probe is deterministic, so duplicate writes insert the same value.
pub(crate) struct IdentifierResolver {
    probe: Box<dyn IdentifierProbe>,
    cache: RwLock<HashMap<TypeId, String>>,
}

impl IdentifierResolver {
    pub(crate) fn new(probe: Box<dyn IdentifierProbe>) -> Self {
        IdentifierResolver {
            probe,
            cache: RwLock::new(HashMap::default()),
        }
    }

    /// Whether `property` is the identifier property of the type described by
    /// `document`. A cached resolution wins; otherwise the probe runs and a
    /// successful result is cached. "Not found" is not memoized: a type with no
    /// identifier is re-probed on every call, so that nothing stale is recorded
    /// for types configured later.
    pub(crate) fn is_identifier_property(
        &self,
        document: &DocumentInfo,
        property: &str,
    ) -> bool {
        if let Some(cached) = self.cache.read().unwrap().get(&document.type_id()) {
            return cached.as_str() == property;
        }

        match self.probe.find_identifier_property(document) {
            Some(found) => {
                self.seed(document.type_id(), found);
                trace!(
                    "cached identifier property '{}' for document type '{}'",
                    found,
                    document.name()
                );
                found == property
            }
            None => false,
        }
    }

    /// Records `property` as the identifier of `type_id` unless one is already
    /// cached. First successful resolution wins.
    pub(crate) fn seed(&self, type_id: TypeId, property: &str) {
        self.cache
            .write()
            .unwrap()
            .entry(type_id)
            .or_insert_with(|| property.to_string());
    }

    /// Drops the cached resolution for a type. Test isolation only.
    pub(crate) fn clear(&self, type_id: TypeId) {
        self.cache.write().unwrap().remove(&type_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define_document;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Plain;
    define_document!(Plain, [Name, Age]);

    struct Keyed;
    define_document!(Keyed, [Name, Id]);

    struct Underscored;
    define_document!(Underscored, [_id, Id]);

    struct Conventional;
    define_document!(Conventional, [Name, ConventionalId]);

    #[test]
    fn convention_probe_tiers() {
        let probe = ConventionProbe;
        assert_eq!(
            probe.find_identifier_property(&DocumentInfo::of::<Plain>()),
            None
        );
        assert_eq!(
            probe.find_identifier_property(&DocumentInfo::of::<Keyed>()),
            Some("Id")
        );
        // `_id` outranks `Id` regardless of declaration order.
        assert_eq!(
            probe.find_identifier_property(&DocumentInfo::of::<Underscored>()),
            Some("_id")
        );
        assert_eq!(
            probe.find_identifier_property(&DocumentInfo::of::<Conventional>()),
            Some("ConventionalId")
        );
    }

    /// Wraps a probe and counts invocations so tests can observe caching.
    struct CountingProbe {
        calls: Arc<AtomicUsize>,
        result: Option<&'static str>,
    }

    impl IdentifierProbe for CountingProbe {
        fn find_identifier_property(&self, _document: &DocumentInfo) -> Option<&'static str> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result
        }
    }

    #[test]
    fn successful_resolution_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = IdentifierResolver::new(Box::new(CountingProbe {
            calls: Arc::clone(&calls),
            result: Some("Id"),
        }));
        let info = DocumentInfo::of::<Keyed>();

        assert!(resolver.is_identifier_property(&info, "Id"));
        assert!(resolver.is_identifier_property(&info, "Id"));
        assert!(!resolver.is_identifier_property(&info, "Name"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_identifier_reprobes_every_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolver = IdentifierResolver::new(Box::new(CountingProbe {
            calls: Arc::clone(&calls),
            result: None,
        }));
        let info = DocumentInfo::of::<Plain>();

        assert!(!resolver.is_identifier_property(&info, "Name"));
        assert!(!resolver.is_identifier_property(&info, "Name"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn first_seed_wins() {
        let resolver = IdentifierResolver::new(Box::new(ConventionProbe));
        let type_id = std::any::TypeId::of::<Plain>();
        resolver.seed(type_id, "Key");
        resolver.seed(type_id, "Other");

        let info = DocumentInfo::of::<Plain>();
        assert!(resolver.is_identifier_property(&info, "Key"));
        assert!(!resolver.is_identifier_property(&info, "Other"));
    }

    #[test]
    fn clear_forgets_the_resolution() {
        let resolver = IdentifierResolver::new(Box::new(ConventionProbe));
        let info = DocumentInfo::of::<Keyed>();
        assert!(resolver.is_identifier_property(&info, "Id"));

        resolver.clear(info.type_id());
        resolver.seed(info.type_id(), "Name");
        assert!(!resolver.is_identifier_property(&info, "Id"));
        assert!(resolver.is_identifier_property(&info, "Name"));
    }
}
