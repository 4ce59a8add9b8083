//! Zero-value checks.
//!
//! A field holding its type's zero value contributes no filter condition.
//! The [`ZeroRegistry`] maps a concrete type to the predicate deciding that.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

/// Returns `true` if `value` is the zero value of its type.
pub type ZeroFn = fn(value: &dyn Any) -> bool;

/// Zero check comparing against `T::default()`.
///
/// A value of another type is never zero.
pub fn is_default<T: Any + Default + PartialEq>(value: &dyn Any) -> bool {
    value
        .downcast_ref::<T>()
        .is_some_and(|value| *value == T::default())
}

macro_rules! register_defaults {
    ($registry:ident; $($ty:ty),* $(,)?) => {
        $(
            $registry
                .register_default::<$ty>()
                .register_default::<Option<$ty>>()
                .register_default::<Vec<$ty>>();
        )*
    };
}

static BUILTIN: Lazy<ZeroRegistry> = Lazy::new(|| {
    let mut registry = ZeroRegistry::empty();
    register_defaults!(
        registry;
        i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
        String,
    );
    registry
});

/// Table of zero checks keyed by type.
#[derive(Clone, Default)]
pub struct ZeroRegistry {
    checks: HashMap<TypeId, ZeroFn>,
}

impl ZeroRegistry {
    /// Creates a registry with no zero checks.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry with zero checks for the primitive types, `String`,
    /// and their `Option<T>` and `Vec<T>` forms.
    pub fn builtin() -> Self {
        (*BUILTIN).clone()
    }

    /// Registers the zero check for `T`.
    pub fn register<T: Any>(&mut self, check: ZeroFn) -> &mut Self {
        self.checks.insert(TypeId::of::<T>(), check);
        self
    }

    /// Registers a zero check comparing against `T::default()`.
    pub fn register_default<T: Any + Default + PartialEq>(&mut self) -> &mut Self {
        self.register::<T>(is_default::<T>)
    }

    /// Returns the zero check for a type.
    pub fn get(&self, ty: TypeId) -> Option<ZeroFn> {
        self.checks.get(&ty).copied()
    }
}

impl fmt::Debug for ZeroRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZeroRegistry")
            .field("checks", &self.checks.len())
            .finish()
    }
}
