use super::errors::RoleError;
use super::models::AccessRole;
use super::models::Role;
use super::models::RoleId;
use super::models::RoleNames;
use super::ports::RoleRepository;

/// Access roles resolved against the role store.
///
/// Built once at startup and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRegistry {
    admin: Role,
    member: Role,
}

impl RoleRegistry {
    /// Resolve the access roles from a list of stored roles.
    ///
    /// # Errors
    /// * `Missing` - A configured role name does not exist in `roles`
    pub fn resolve(roles: &[Role], names: &RoleNames) -> Result<Self, RoleError> {
        let find = |access: AccessRole| {
            let name = names.name_of(access);
            roles
                .iter()
                .find(|role| role.name == name)
                .cloned()
                .ok_or_else(|| RoleError::Missing(name.to_string()))
        };

        Ok(Self {
            admin: find(AccessRole::Admin)?,
            member: find(AccessRole::Member)?,
        })
    }

    /// Load the stored roles and resolve the access roles from them.
    pub async fn load<RR: RoleRepository>(
        repository: &RR,
        names: &RoleNames,
    ) -> Result<Self, RoleError> {
        let roles = repository.find_all().await?;
        Self::resolve(&roles, names)
    }

    pub fn role(&self, access: AccessRole) -> &Role {
        match access {
            AccessRole::Admin => &self.admin,
            AccessRole::Member => &self.member,
        }
    }

    pub fn id_of(&self, access: AccessRole) -> RoleId {
        self.role(access).id
    }
}
