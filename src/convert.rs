/*!

The type-converter registry. A [`TypeConverter`] turns a native value into a
store-representable value (modeled as a `serde_json::Value`) and back; the registry
maps a native value type to the single converter responsible for it.

The registry only manages registration and lookup. Conversion itself happens in the
serialization layer, which fetches the converter for a field's value type and applies
it. At most one converter may be registered per native type; registering a second is
a configuration error, not an overwrite.

*/

use std::any::{type_name, Any, TypeId};

use serde_json::Value;

use crate::error::DocmapError;
use crate::hashing::HashMap;
use crate::log::debug;

/// The capability of converting a native value to and from a store-representable
/// value. Implementations are selected by the native value's type, not by
/// inheritance-style dispatch, so the value arrives type-erased.
pub trait TypeConverter: Any + Send + Sync {
    /// Converts a native value into a store-representable value. Fails with
    /// [`DocmapError::ConverterInput`] if `value` is not of the native type this
    /// converter was registered for.
    fn to_store(&self, value: &dyn Any) -> Result<Value, DocmapError>;

    /// Converts a store-representable value back into a boxed native value.
    fn from_store(&self, value: &Value) -> Result<Box<dyn Any>, DocmapError>;
}

struct ConverterEntry {
    /// Converter type name, kept for duplicate-registration diagnostics.
    name: &'static str,
    converter: Box<dyn TypeConverter>,
}

/// Maps a native value type to its registered converter.
#[derive(Default)]
pub(crate) struct ConverterRegistry {
    converters: HashMap<TypeId, ConverterEntry>,
}

impl ConverterRegistry {
    /// Registers a default-constructed `C` as the converter for native type `N`.
    pub(crate) fn register<N: Any, C: TypeConverter + Default>(
        &mut self,
    ) -> Result<(), DocmapError> {
        if let Some(existing) = self.converters.get(&TypeId::of::<N>()) {
            return Err(DocmapError::DuplicateConverter {
                native: type_name::<N>(),
                existing: existing.name,
                attempted: type_name::<C>(),
            });
        }
        debug!(
            "registered converter '{}' for native type '{}'",
            type_name::<C>(),
            type_name::<N>()
        );
        self.converters.insert(
            TypeId::of::<N>(),
            ConverterEntry {
                name: type_name::<C>(),
                converter: Box::new(C::default()),
            },
        );
        Ok(())
    }

    /// Pure lookup; returns `None` for native types with no registered converter.
    pub(crate) fn get(&self, native: TypeId) -> Option<&dyn TypeConverter> {
        self.converters
            .get(&native)
            .map(|entry| entry.converter.as_ref())
    }

    /// Idempotent removal; removing an absent converter is a no-op.
    pub(crate) fn remove(&mut self, native: TypeId) {
        self.converters.remove(&native);
    }
}

/// Stores a [`std::time::Duration`] as a humantime-formatted string
/// (e.g. `"2h 15m"`).
#[derive(Default)]
pub struct DurationConverter;

impl TypeConverter for DurationConverter {
    fn to_store(&self, value: &dyn Any) -> Result<Value, DocmapError> {
        let duration = value
            .downcast_ref::<std::time::Duration>()
            .ok_or_else(|| {
                DocmapError::ConverterInput("expected a std::time::Duration".to_string())
            })?;
        Ok(Value::String(
            humantime::format_duration(*duration).to_string(),
        ))
    }

    fn from_store(&self, value: &Value) -> Result<Box<dyn Any>, DocmapError> {
        let text = value.as_str().ok_or_else(|| {
            DocmapError::ConverterInput(format!("expected a string, got {value}"))
        })?;
        let duration = humantime::parse_duration(text)
            .map_err(|error| DocmapError::ConverterInput(error.to_string()))?;
        Ok(Box::new(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Default)]
    struct NoopConverter;

    impl TypeConverter for NoopConverter {
        fn to_store(&self, _value: &dyn Any) -> Result<Value, DocmapError> {
            Ok(Value::Null)
        }

        fn from_store(&self, _value: &Value) -> Result<Box<dyn Any>, DocmapError> {
            Ok(Box::new(()))
        }
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ConverterRegistry::default();
        registry.register::<Duration, DurationConverter>().unwrap();

        let error = registry
            .register::<Duration, NoopConverter>()
            .unwrap_err();
        match error {
            DocmapError::DuplicateConverter {
                native,
                existing,
                attempted,
            } => {
                assert!(native.contains("Duration"));
                assert!(existing.contains("DurationConverter"));
                assert!(attempted.contains("NoopConverter"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn remove_then_reregister_succeeds() {
        let mut registry = ConverterRegistry::default();
        registry.register::<Duration, DurationConverter>().unwrap();
        registry.remove(TypeId::of::<Duration>());
        // Removal of an absent key is a no-op.
        registry.remove(TypeId::of::<Duration>());
        registry.register::<Duration, NoopConverter>().unwrap();
    }

    #[test]
    fn lookup_is_total() {
        let registry = ConverterRegistry::default();
        assert!(registry.get(TypeId::of::<Duration>()).is_none());
    }

    #[test]
    fn duration_converter_round_trips() {
        let converter = DurationConverter;
        let stored = converter
            .to_store(&Duration::from_secs(8100))
            .unwrap();
        assert_eq!(stored, Value::String("2h 15m".to_string()));

        let restored = converter.from_store(&stored).unwrap();
        let duration = restored.downcast_ref::<Duration>().unwrap();
        assert_eq!(*duration, Duration::from_secs(8100));
    }

    #[test]
    fn duration_converter_rejects_foreign_values() {
        let converter = DurationConverter;
        assert!(converter.to_store(&"not a duration").is_err());
        assert!(converter.from_store(&Value::Bool(true)).is_err());
    }
}
