//! Common repository traits
//!
//! This module defines generic interfaces for record store operations.

use crate::store::StoreError;

/// Trait for creating new records
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the backend)
/// * `CreateDTO` - DTO for creation (without ID, will be generated by the backend)
pub trait Create<Entity, CreateDTO> {
    /// Creates a new record
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with its ID
    /// * `Err(StoreError)` - Error during insertion
    async fn create(&self, data: &CreateDTO) -> Result<Entity, StoreError>;
}

/// Trait for reading a single record by ID
pub trait Read<Entity, Id> {
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    /// * `Err(StoreError)` - Error during reading
    async fn read(&self, id: &Id) -> Result<Option<Entity>, StoreError>;
}

/// Trait for updating existing records
///
/// # Type Parameters
/// * `UpdateDTO` - DTO for updating (only `Some(_)` fields are sent)
pub trait Update<Entity, UpdateDTO, Id> {
    /// # Returns
    /// * `Ok(Entity)` - Updated entity
    /// * `Err(StoreError)` - Error during update (e.g. `StoreError::NotFound`)
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, StoreError>;
}

/// Trait for deleting records
pub trait Delete<Id> {
    /// # Returns
    /// * `Ok(())` - Deletion successful (also when nothing matched)
    /// * `Err(StoreError)` - Error during deletion
    async fn delete(&self, id: &Id) -> Result<(), StoreError>;
}
