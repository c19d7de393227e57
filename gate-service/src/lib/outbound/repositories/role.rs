use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::role::errors::RoleError;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::ports::RoleRepository;

pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    id: i32,
    name: String,
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_all(&self) -> Result<Vec<Role>, RoleError> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name
            FROM roles
            WHERE deleted_at IS NULL
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RoleError::StoreUnavailable(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| Role {
                id: RoleId(r.id),
                name: r.name,
            })
            .collect())
    }
}
