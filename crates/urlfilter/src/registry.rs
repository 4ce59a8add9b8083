//! The metadata registry.
//!
//! A [`Registry`] owns the scan and zero tables and caches one
//! [`StructMetadata`] per record type. Build it once and share it by
//! reference; metadata for a type is built on first use and reused after.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::metadata::StructMetadata;
use crate::scan::{ParseValue, ScanFn, ScanRegistry};
use crate::traits::Record;
use crate::values::Values;
use crate::zero::{ZeroFn, ZeroRegistry};

type Cache = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Shared cache of record metadata.
///
/// # Example
///
/// ```
/// use urlfilter::{DeclaredField, Record, Registry, Shape, Values};
///
/// #[derive(Default)]
/// struct Filter {
///     age_gte: u32,
/// }
///
/// impl Record for Filter {
///     fn declared_fields() -> Vec<DeclaredField<Self>> {
///         vec![DeclaredField::<Self>::value::<u32>(
///             0,
///             "age_gte",
///             "",
///             Shape::Scalar,
///             |f| &f.age_gte,
///             |f| &mut f.age_gte,
///         )]
///     }
/// }
///
/// let registry = Registry::new();
/// let meta = registry.metadata::<Filter>().unwrap();
/// assert_eq!(meta.find("age__gte").unwrap().column(), "age");
///
/// let mut filter = Filter::default();
/// let values: Values = [("age__gte", "18")].into_iter().collect();
/// registry.decode(&mut filter, &values).unwrap();
/// assert_eq!(filter.age_gte, 18);
/// ```
pub struct Registry {
    scans: ScanRegistry,
    zeros: ZeroRegistry,
    cache: RwLock<Cache>,
}

impl Registry {
    /// Creates a registry with the built-in scan functions and zero checks.
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    /// Returns a builder starting from the built-in tables.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the scan table.
    pub fn scanners(&self) -> &ScanRegistry {
        &self.scans
    }

    /// Returns the zero-check table.
    pub fn zero_checks(&self) -> &ZeroRegistry {
        &self.zeros
    }

    /// Returns the metadata of `R`, building it on first use.
    ///
    /// Concurrent callers for the same type get the same `Arc`. A build
    /// failure is returned to the caller and nothing is cached.
    pub fn metadata<R: Record>(&self) -> Result<Arc<StructMetadata<R>>> {
        if let Some(meta) = lookup::<R>(&self.cache.read()) {
            return Ok(meta);
        }

        let mut cache = self.cache.write();
        if let Some(meta) = lookup::<R>(&cache) {
            return Ok(meta);
        }

        let meta = Arc::new(StructMetadata::<R>::build(&self.scans, &self.zeros)?);
        debug!(
            record = type_name::<R>(),
            fields = meta.fields().len(),
            hooks = meta.hook_paths().count(),
            custom_decode = meta.has_custom_decode(),
            "built struct metadata"
        );
        cache.insert(TypeId::of::<R>(), meta.clone() as Arc<dyn Any + Send + Sync>);
        Ok(meta)
    }

    /// Decodes `values` into `record` using the metadata of `R`.
    pub fn decode<R: Record>(&self, record: &mut R, values: &Values) -> Result<()> {
        self.metadata::<R>()?.decode(record, values)
    }

    /// Returns `true` if the metadata of `R` has been built.
    pub fn is_cached<R: Record>(&self) -> bool {
        self.cache.read().contains_key(&TypeId::of::<R>())
    }

    /// Returns the number of record types with cached metadata.
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Returns `true` if no metadata has been built yet.
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

fn lookup<R: Record>(cache: &Cache) -> Option<Arc<StructMetadata<R>>> {
    cache
        .get(&TypeId::of::<R>())
        .cloned()
        .and_then(|entry| entry.downcast::<StructMetadata<R>>().ok())
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("scans", &self.scans)
            .field("zeros", &self.zeros)
            .field("cached", &self.len())
            .finish()
    }
}

/// Builder configuring the tables of a [`Registry`].
///
/// ```
/// use urlfilter::{ParseValue, Registry, ScanError};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Cents(i64);
///
/// impl ParseValue for Cents {
///     fn parse_value(raw: &str) -> Result<Self, ScanError> {
///         let amount: f64 = urlfilter::parse_value(raw)?;
///         Ok(Cents((amount * 100.0).round() as i64))
///     }
/// }
///
/// let registry = Registry::builder().parsed::<Cents>().build();
/// assert!(registry.scanners().scalar(std::any::TypeId::of::<Cents>()).is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    scans: ScanRegistry,
    zeros: ZeroRegistry,
}

impl RegistryBuilder {
    /// Starts from the built-in tables.
    pub fn new() -> Self {
        RegistryBuilder {
            scans: ScanRegistry::builtin(),
            zeros: ZeroRegistry::builtin(),
        }
    }

    /// Starts from empty tables.
    pub fn empty() -> Self {
        RegistryBuilder {
            scans: ScanRegistry::empty(),
            zeros: ZeroRegistry::empty(),
        }
    }

    /// Registers a scalar scan function for `T`.
    pub fn scalar<T: Any>(mut self, scan: ScanFn) -> Self {
        self.scans.register_scalar::<T>(scan);
        self
    }

    /// Registers a sequence scan function for the sequence type `T`.
    pub fn sequence<T: Any>(mut self, scan: ScanFn) -> Self {
        self.scans.register_sequence::<T>(scan);
        self
    }

    /// Registers a zero check for `T`.
    pub fn zero<T: Any>(mut self, check: ZeroFn) -> Self {
        self.zeros.register::<T>(check);
        self
    }

    /// Registers scanning and `Default`-based zero checks for `T`,
    /// `Option<T>` and `Vec<T>`.
    pub fn parsed<T: ParseValue + PartialEq>(mut self) -> Self {
        self.scans.register_parsed::<T>();
        self.zeros
            .register_default::<T>()
            .register_default::<Option<T>>()
            .register_default::<Vec<T>>();
        self
    }

    /// Builds the registry.
    pub fn build(self) -> Registry {
        Registry {
            scans: self.scans,
            zeros: self.zeros,
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
