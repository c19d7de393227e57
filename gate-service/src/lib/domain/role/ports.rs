use async_trait::async_trait;

use super::errors::RoleError;
use super::models::Role;

/// Read access to the role store.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    /// Retrieve every role.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_all(&self) -> Result<Vec<Role>, RoleError>;
}
