use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    surname: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    role_id: i32,
    role_name: String,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let id = r.id;
        let corrupt = move |field: &str, e: String| {
            UserError::StoreUnavailable(format!(
                "stored {} for user {} is invalid: {}",
                field, id, e
            ))
        };

        Ok(User {
            id: UserId(id),
            name: PersonName::new(r.name).map_err(|e| corrupt("name", e.to_string()))?,
            surname: PersonName::new(r.surname).map_err(|e| corrupt("surname", e.to_string()))?,
            email: EmailAddress::new(r.email).map_err(|e| corrupt("email", e.to_string()))?,
            password_hash: r.password_hash,
            role: Role {
                id: RoleId(r.role_id),
                name: r.role_name,
            },
            created_at: r.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, role_id, name, surname, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.0)
        .bind(user.role.id.0)
        .bind(user.name.as_str())
        .bind(user.surname.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return UserError::AlreadyExists(user.email.as_str().to_string());
                }
            }
            UserError::StoreUnavailable(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.name, u.surname, u.email, u.password_hash, u.created_at,
                   r.id AS role_id, r.name AS role_name
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.id = $1 AND u.deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::StoreUnavailable(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.name, u.surname, u.email, u.password_hash, u.created_at,
                   r.id AS role_id, r.name AS role_name
            FROM users u
            JOIN roles r ON r.id = u.role_id
            WHERE u.email = $1 AND u.deleted_at IS NULL
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::StoreUnavailable(e.to_string()))?;

        row.map(User::try_from).transpose()
    }
}
