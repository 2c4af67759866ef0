//! PostgreSQL Repository Implementations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppResult;
use kernel::id::{RecipeId, UserId};
use kernel::pagination::PageRequest;
use kernel::relation::RelationRepository;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    credentials::Credentials,
    session::Session,
    user::{NewUser, User},
};
use crate::domain::repository::{
    CredentialRepository, ProfileQuery, SessionRepository, UserRepository,
};
use crate::domain::subscription::{RecipesLimit, Subscription};
use crate::domain::value_object::{
    email::Email, person_name::PersonName, username::Username,
};
use crate::domain::view::{RecipePreview, SubscriptionView, UserProfile};
use crate::error::{UserError, UserResult};

/// PostgreSQL-backed users repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Subscription views for `rows`, keeping their order
    ///
    /// Previews for every author come from one query, newest first and cut
    /// to `limit` per author (all of them when `limit` is `None`).
    async fn subscription_views(
        &self,
        rows: Vec<SubscriptionRow>,
        limit: Option<u32>,
    ) -> UserResult<Vec<SubscriptionView>> {
        let authors: Vec<i64> = rows.iter().map(|row| row.id).collect();
        if authors.is_empty() {
            return Ok(Vec::new());
        }

        let previews = sqlx::query_as::<_, RecipePreviewRow>(
            r#"
            SELECT author_id, id, name, image, cooking_time
            FROM (
                SELECT
                    r.author_id,
                    r.id,
                    r.name,
                    r.image,
                    r.cooking_time,
                    ROW_NUMBER() OVER (
                        PARTITION BY r.author_id
                        ORDER BY r.created_at DESC, r.id DESC
                    ) AS position
                FROM recipes r
                WHERE r.author_id = ANY($1)
            ) ranked
            WHERE $2::bigint IS NULL OR position <= $2
            ORDER BY author_id, position
            "#,
        )
        .bind(&authors)
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await?;

        let mut by_author: HashMap<i64, Vec<RecipePreview>> = HashMap::new();
        for preview in previews {
            by_author
                .entry(preview.author_id)
                .or_default()
                .push(preview.into_preview());
        }

        Ok(rows
            .into_iter()
            .map(|row| SubscriptionView {
                recipes: by_author.remove(&row.id).unwrap_or_default(),
                author: UserProfile {
                    email: row.email,
                    id: UserId::from_raw(row.id),
                    username: row.username,
                    first_name: row.first_name,
                    last_name: row.last_name,
                    is_subscribed: true,
                },
                recipes_count: row.recipes_count,
            })
            .collect())
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: NewUser, password: &HashedPassword) -> UserResult<User> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (
                email,
                username,
                first_name,
                last_name,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id
            "#,
        )
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO user_credentials (user_id, password_hash, updated_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(id)
        .bind(password.as_phc_string())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(User::from_new(UserId::from_raw(id), user, now))
    }

    async fn find_user(&self, id: UserId) -> UserResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, first_name, last_name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_user_by_email(&self, email: &Email) -> UserResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, first_name, last_name, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn email_taken(&self, email: &Email, except: Option<UserId>) -> UserResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(email.as_str())
        .bind(except.map(|id| id.get()))
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn username_taken(
        &self,
        username: &Username,
        except: Option<UserId>,
    ) -> UserResult<bool> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND id IS DISTINCT FROM $2)",
        )
        .bind(username.as_str())
        .bind(except.map(|id| id.get()))
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn update_user(&self, user: &User) -> UserResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                email = $2,
                username = $3,
                first_name = $4,
                last_name = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(user.id.get())
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> UserResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Credential Repository Implementation
// ============================================================================

impl CredentialRepository for PgUserRepository {
    async fn find_credentials(&self, user_id: UserId) -> UserResult<Option<Credentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(
            "SELECT user_id, password_hash, updated_at FROM user_credentials WHERE user_id = $1",
        )
        .bind(user_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CredentialsRow::into_credentials).transpose()
    }

    async fn update_credentials(&self, credentials: &Credentials) -> UserResult<()> {
        sqlx::query(
            r#"
            UPDATE user_credentials SET
                password_hash = $2,
                updated_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(credentials.user_id.get())
        .bind(credentials.password_hash.as_phc_string())
        .bind(credentials.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Session Repository Implementation
// ============================================================================

impl SessionRepository for PgUserRepository {
    async fn create_session(&self, session: &Session) -> UserResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                session_id,
                user_id,
                expires_at_ms,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(session.session_id)
        .bind(session.user_id.get())
        .bind(session.expires_at_ms)
        .bind(&session.client_fingerprint_hash)
        .bind(&session.client_ip)
        .bind(&session.user_agent)
        .bind(session.created_at)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_session(&self, session_id: Uuid) -> UserResult<Option<Session>> {
        let now_ms = Utc::now().timestamp_millis();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT
                session_id,
                user_id,
                expires_at_ms,
                client_fingerprint_hash,
                client_ip,
                user_agent,
                created_at,
                last_activity_at
            FROM auth_sessions
            WHERE session_id = $1 AND expires_at_ms > $2
            "#,
        )
        .bind(session_id)
        .bind(now_ms)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SessionRow::into_session))
    }

    async fn update_session(&self, session: &Session) -> UserResult<()> {
        sqlx::query(
            r#"
            UPDATE auth_sessions SET
                expires_at_ms = $2,
                last_activity_at = $3
            WHERE session_id = $1
            "#,
        )
        .bind(session.session_id)
        .bind(session.expires_at_ms)
        .bind(session.last_activity_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_session(&self, session_id: Uuid) -> UserResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn cleanup_expired(&self) -> UserResult<u64> {
        let now_ms = Utc::now().timestamp_millis();

        let deleted = sqlx::query("DELETE FROM auth_sessions WHERE expires_at_ms < $1")
            .bind(now_ms)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

// ============================================================================
// Profile Queries
// ============================================================================

impl ProfileQuery for PgUserRepository {
    async fn list_profiles(
        &self,
        viewer: Option<UserId>,
        page: &PageRequest,
    ) -> UserResult<(Vec<UserProfile>, i64)> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                u.id,
                u.email,
                u.username,
                u.first_name,
                u.last_name,
                EXISTS(
                    SELECT 1 FROM subscriptions s
                    WHERE s.user_id = $1 AND s.author_id = u.id
                ) AS is_subscribed
            FROM users u
            ORDER BY u.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(viewer.map(|id| id.get()))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((rows.into_iter().map(ProfileRow::into_profile).collect(), count))
    }

    async fn find_profile(
        &self,
        viewer: Option<UserId>,
        id: UserId,
    ) -> UserResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT
                u.id,
                u.email,
                u.username,
                u.first_name,
                u.last_name,
                EXISTS(
                    SELECT 1 FROM subscriptions s
                    WHERE s.user_id = $1 AND s.author_id = u.id
                ) AS is_subscribed
            FROM users u
            WHERE u.id = $2
            "#,
        )
        .bind(viewer.map(|id| id.get()))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn list_subscriptions(
        &self,
        user: UserId,
        page: &PageRequest,
        recipes_limit: Option<u32>,
    ) -> UserResult<(Vec<SubscriptionView>, i64)> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(user.get())
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT
                u.id,
                u.email,
                u.username,
                u.first_name,
                u.last_name,
                (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipes_count
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user.get())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let items = self.subscription_views(rows, recipes_limit).await?;
        Ok((items, count))
    }

    async fn find_subscription(
        &self,
        viewer: UserId,
        author: UserId,
        recipes_limit: Option<u32>,
    ) -> UserResult<Option<SubscriptionView>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT
                u.id,
                u.email,
                u.username,
                u.first_name,
                u.last_name,
                (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipes_count
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.user_id = $1 AND s.author_id = $2
            "#,
        )
        .bind(viewer.get())
        .bind(author.get())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.subscription_views(vec![row], recipes_limit).await?.pop())
    }
}

// ============================================================================
// Subscription Relation
// ============================================================================

impl RelationRepository<Subscription> for PgUserRepository {
    async fn target_exists(&self, author: UserId) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(author.get())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn relation_exists(&self, user: UserId, author: UserId) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user.get())
        .bind(author.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert_relation(&self, user: UserId, author: UserId) -> AppResult<()> {
        sqlx::query("INSERT INTO subscriptions (user_id, author_id, created_at) VALUES ($1, $2, $3)")
            .bind(user.get())
            .bind(author.get())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove_relation(&self, user: UserId, author: UserId) -> AppResult<bool> {
        let deleted = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user.get())
            .bind(author.get())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn represent(
        &self,
        user: UserId,
        author: UserId,
        params: &RecipesLimit,
    ) -> AppResult<SubscriptionView> {
        self.find_subscription(user, author, params.recipes_limit)
            .await?
            .ok_or_else(|| UserError::NotFound.into())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::from_raw(self.id),
            email: Email::from_db(self.email),
            username: Username::from_db(self.username),
            first_name: PersonName::from_db(self.first_name),
            last_name: PersonName::from_db(self.last_name),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    user_id: i64,
    password_hash: String,
    updated_at: DateTime<Utc>,
}

impl CredentialsRow {
    fn into_credentials(self) -> UserResult<Credentials> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| UserError::Internal(format!("Invalid password hash: {e}")))?;

        Ok(Credentials {
            user_id: UserId::from_raw(self.user_id),
            password_hash,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    session_id: Uuid,
    user_id: i64,
    expires_at_ms: i64,
    client_fingerprint_hash: Vec<u8>,
    client_ip: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_session(self) -> Session {
        Session {
            session_id: self.session_id,
            user_id: UserId::from_raw(self.user_id),
            expires_at_ms: self.expires_at_ms,
            client_fingerprint_hash: self.client_fingerprint_hash,
            client_ip: self.client_ip,
            user_agent: self.user_agent,
            created_at: self.created_at,
            last_activity_at: self.last_activity_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    is_subscribed: bool,
}

impl ProfileRow {
    fn into_profile(self) -> UserProfile {
        UserProfile {
            email: self.email,
            id: UserId::from_raw(self.id),
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            is_subscribed: self.is_subscribed,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: i64,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    recipes_count: i64,
}

#[derive(sqlx::FromRow)]
struct RecipePreviewRow {
    author_id: i64,
    id: i64,
    name: String,
    image: String,
    cooking_time: i32,
}

impl RecipePreviewRow {
    fn into_preview(self) -> RecipePreview {
        RecipePreview {
            id: RecipeId::from_raw(self.id),
            name: self.name,
            image: self.image,
            cooking_time: self.cooking_time,
        }
    }
}
