//! Account business logic - sign-up and lookup of shoppers.
//!
//! A shopper is identified by their Discord user ID. Carts, purchases and profile
//! views all require a signed-up account; [`require_user`] is the single gate used
//! for that check.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use tracing::{info, instrument};

/// Finds the account linked to a Discord user ID.
pub async fn get_user(db: &DatabaseConnection, discord_id: &str) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an account by its primary key.
pub async fn get_user_by_id<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Like [`get_user`], but a missing account is an [`Error::NotSignedUp`].
pub async fn require_user(db: &DatabaseConnection, discord_id: &str) -> Result<user::Model> {
    get_user(db, discord_id).await?.ok_or(Error::NotSignedUp)
}

/// Creates an account with zeroed statistics.
///
/// # Errors
/// Returns an error if:
/// - The Discord ID is empty
/// - The email is present but blank or has no `@`
/// - An account already exists for this Discord ID
#[instrument(skip(db, email))]
pub async fn sign_up(
    db: &DatabaseConnection,
    discord_id: &str,
    email: Option<String>,
) -> Result<user::Model> {
    if discord_id.trim().is_empty() {
        return Err(Error::InvalidInput {
            message: "Discord ID cannot be empty".to_string(),
        });
    }

    let email = email.map(|e| e.trim().to_string());
    if let Some(address) = email
        .as_deref()
        .filter(|a| a.is_empty() || !a.contains('@'))
    {
        return Err(Error::InvalidInput {
            message: format!("'{address}' is not a valid email address"),
        });
    }

    if get_user(db, discord_id).await?.is_some() {
        return Err(Error::AlreadyRegistered);
    }

    let user = user::ActiveModel {
        discord_id: Set(discord_id.to_string()),
        email: Set(email),
        total_spent: Set(0.0),
        total_purchases: Set(0),
        favorite_category: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = user.insert(db).await?;
    info!(user_id = created.id, "User signed up");
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_sign_up_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = sign_up(&db, "  ", None).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result = sign_up(&db, "user1", Some("not-an-email".to_string())).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        let result = sign_up(&db, "user1", Some("   ".to_string())).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_sign_up_creates_zeroed_stats() -> Result<()> {
        let db = setup_test_db().await?;
        let user = sign_up(&db, "user123", Some(" shopper@example.com ".to_string())).await?;

        assert_eq!(user.discord_id, "user123");
        assert_eq!(user.email.as_deref(), Some("shopper@example.com"));
        assert_eq!(user.total_spent, 0.0);
        assert_eq!(user.total_purchases, 0);
        assert!(user.favorite_category.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_sign_up_twice_fails() -> Result<()> {
        let db = setup_test_db().await?;
        sign_up(&db, "user123", None).await?;

        let result = sign_up(&db, "user123", None).await;
        assert!(matches!(result, Err(Error::AlreadyRegistered)));
        Ok(())
    }

    #[tokio::test]
    async fn test_require_user() -> Result<()> {
        let db = setup_test_db().await?;
        let result = require_user(&db, "ghost").await;
        assert!(matches!(result, Err(Error::NotSignedUp)));

        let created = create_test_user(&db, "user123").await?;
        let found = require_user(&db, "user123").await?;
        assert_eq!(found.id, created.id);
        let by_id = get_user_by_id(&db, created.id).await?.unwrap();
        assert_eq!(by_id.discord_id, "user123");
        Ok(())
    }
}
