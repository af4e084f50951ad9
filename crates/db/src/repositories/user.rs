//! User repository for database operations, including project access grants.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{
    sea_orm_active_enums::{AccessLevel, UserRole},
    user_project_access, users,
};

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Email address (must be unique).
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Full name.
    pub full_name: String,
    /// System role.
    pub role: UserRole,
}

/// User repository for CRUD operations and access grants.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Checks whether an email is already registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Counts users holding the admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_admins(&self) -> Result<u64, DbErr> {
        users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Admin))
            .count(&self.db)
            .await
    }

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateUserInput) -> Result<users::Model, DbErr> {
        let now = chrono::Utc::now().into();

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            full_name: Set(input.full_name),
            role: Set(input.role),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Lists all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    // ========================================================================
    // Project access grants
    // ========================================================================

    /// Gets a user's access grant for a project, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_project_access(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<user_project_access::Model>, DbErr> {
        user_project_access::Entity::find_by_id((user_id, project_id))
            .one(&self.db)
            .await
    }

    /// Grants (or upgrades) a user's access to a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn grant_project_access(
        &self,
        user_id: Uuid,
        project_id: Uuid,
        access_level: AccessLevel,
    ) -> Result<user_project_access::Model, DbErr> {
        let now: chrono::DateTime<chrono::FixedOffset> = chrono::Utc::now().into();

        if let Some(existing) = self.get_project_access(user_id, project_id).await? {
            let mut grant: user_project_access::ActiveModel = existing.into();
            grant.access_level = Set(access_level);
            grant.updated_at = Set(now);
            return grant.update(&self.db).await;
        }

        let grant = user_project_access::ActiveModel {
            user_id: Set(user_id),
            project_id: Set(project_id),
            access_level: Set(access_level),
            created_at: Set(now),
            updated_at: Set(now),
        };

        grant.insert(&self.db).await
    }

    /// Revokes a user's access to a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn revoke_project_access(
        &self,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<bool, DbErr> {
        let result = user_project_access::Entity::delete_by_id((user_id, project_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Lists the project IDs a user holds grants for.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn accessible_project_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        user_project_access::Entity::find()
            .filter(user_project_access::Column::UserId.eq(user_id))
            .select_only()
            .column(user_project_access::Column::ProjectId)
            .into_tuple()
            .all(&self.db)
            .await
    }
}
