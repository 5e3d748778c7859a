//! # Service Model
//!
//! The frozen registry. Built once by [`ServiceModelBuilder`] and shared
//! via `Arc` across threads; nothing mutates it afterwards.
//!
//! Lookups by Rust type and by API type name are single hash probes.
//!
//! [`ServiceModelBuilder`]: crate::builder::ServiceModelBuilder

use std::any::TypeId;
use std::collections::HashMap;

use crate::error::ServiceModelError;
use crate::resource_type::{ComplexType, ResourceType};

/// Immutable registry of resource and complex types.
#[derive(Debug, Clone)]
pub struct ServiceModel {
    resource_types: Vec<ResourceType>,
    by_type_id: HashMap<TypeId, usize>,
    by_api_type: HashMap<String, usize>,
    complex_types: HashMap<TypeId, ComplexType>,
}

impl ServiceModel {
    pub(crate) fn new(resource_types: Vec<ResourceType>, complex_types: HashMap<TypeId, ComplexType>) -> Self {
        let by_type_id = resource_types
            .iter()
            .enumerate()
            .map(|(i, rt)| (rt.type_id, i))
            .collect();
        let by_api_type = resource_types
            .iter()
            .enumerate()
            .map(|(i, rt)| (rt.identity.api_type.clone(), i))
            .collect();
        Self {
            resource_types,
            by_type_id,
            by_api_type,
            complex_types,
        }
    }

    /// The resource type registered for `T`.
    ///
    /// # Errors
    ///
    /// [`ServiceModelError::UnregisteredType`] if `T` was never registered.
    pub fn resource_type<T: 'static>(&self) -> Result<&ResourceType, ServiceModelError> {
        self.try_resource_type::<T>()
            .ok_or_else(|| ServiceModelError::UnregisteredType {
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    /// The resource type registered for `T`, if any.
    pub fn try_resource_type<T: 'static>(&self) -> Option<&ResourceType> {
        self.try_resource_type_of(TypeId::of::<T>())
    }

    /// The resource type registered for a `TypeId`, if any.
    pub fn try_resource_type_of(&self, type_id: TypeId) -> Option<&ResourceType> {
        self.by_type_id.get(&type_id).map(|&i| &self.resource_types[i])
    }

    /// The resource type with API type name `api_type` (case-sensitive).
    ///
    /// # Errors
    ///
    /// [`ServiceModelError::UnregisteredApiType`] if no such type exists.
    pub fn resource_type_by_api_type(&self, api_type: &str) -> Result<&ResourceType, ServiceModelError> {
        self.try_resource_type_by_api_type(api_type)
            .ok_or_else(|| ServiceModelError::UnregisteredApiType {
                api_type: api_type.to_string(),
            })
    }

    /// The resource type with API type name `api_type`, if any.
    pub fn try_resource_type_by_api_type(&self, api_type: &str) -> Option<&ResourceType> {
        self.by_api_type.get(api_type).map(|&i| &self.resource_types[i])
    }

    /// The complex type registered for a `TypeId`, if any.
    pub fn complex_type(&self, type_id: TypeId) -> Option<&ComplexType> {
        self.complex_types.get(&type_id)
    }

    /// All resource types in registration order.
    pub fn resource_types(&self) -> impl Iterator<Item = &ResourceType> {
        self.resource_types.iter()
    }

    /// All complex types, unordered.
    pub fn complex_types(&self) -> impl Iterator<Item = &ComplexType> {
        self.complex_types.values()
    }
}
