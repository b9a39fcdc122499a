pub use crate::convert::TypeConverter;
pub use crate::define_document;
pub use crate::document::{DbRef, Document, DocumentInfo};
pub use crate::error::DocmapError;
pub use crate::identifier::{ConventionProbe, IdentifierProbe};
pub use crate::log::{debug, error, info, trace, warn};
pub use crate::registry::MappingRegistry;
pub use crate::settings::{PropertySetting, TypeConfiguration};
