//! # Member Bindings
//!
//! A [`Binding`] is a get/set closure pair over one member of a registered
//! Rust type, erased to `dyn Any` so tables for different types can live in
//! one registry. The closures are resolved once, at registration time, and
//! are `Send + Sync` so the frozen registry can be shared across threads.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::AccessorError;

type Getter<V> = dyn Fn(&dyn Any) -> Result<V, AccessorError> + Send + Sync;
type Setter<V> = dyn Fn(&mut dyn Any, V) -> Result<(), AccessorError> + Send + Sync;

/// Type-erased accessor pair producing and consuming values of type `V`.
pub struct Binding<V> {
    get: Arc<Getter<V>>,
    set: Arc<Setter<V>>,
}

impl<V: 'static> Binding<V> {
    /// Bind closures over instances of `T`.
    ///
    /// The erased closures fail with [`AccessorError::TypeMismatch`] when
    /// handed anything other than a `T`.
    pub fn new<T, G, S>(get: G, set: S) -> Self
    where
        T: 'static,
        G: Fn(&T) -> Result<V, AccessorError> + Send + Sync + 'static,
        S: Fn(&mut T, V) -> Result<(), AccessorError> + Send + Sync + 'static,
    {
        let expected = std::any::type_name::<T>();
        Self {
            get: Arc::new(move |instance: &dyn Any| {
                let typed = instance
                    .downcast_ref::<T>()
                    .ok_or(AccessorError::TypeMismatch { expected })?;
                get(typed)
            }),
            set: Arc::new(move |instance: &mut dyn Any, value: V| {
                let typed = instance
                    .downcast_mut::<T>()
                    .ok_or(AccessorError::TypeMismatch { expected })?;
                set(typed, value)
            }),
        }
    }

    /// Read the member from `instance`.
    ///
    /// # Errors
    ///
    /// Fails on a type mismatch or when the getter fails to convert.
    pub fn get(&self, instance: &dyn Any) -> Result<V, AccessorError> {
        (self.get)(instance)
    }

    /// Write the member of `instance`.
    ///
    /// # Errors
    ///
    /// Fails on a type mismatch or when the setter fails to convert.
    pub fn set(&self, instance: &mut dyn Any, value: V) -> Result<(), AccessorError> {
        (self.set)(instance, value)
    }
}

impl<V> Clone for Binding<V> {
    fn clone(&self) -> Self {
        Self {
            get: Arc::clone(&self.get),
            set: Arc::clone(&self.set),
        }
    }
}

impl<V> fmt::Debug for Binding<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Binding")
    }
}
