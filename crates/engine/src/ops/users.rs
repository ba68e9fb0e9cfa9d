use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, ValidationErrors, users,
    validation::REQUIRED,
};

use super::{Engine, with_tx};

impl Engine {
    /// Check credentials, returning the user id on success.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> ResultEngine<Option<String>> {
        with_tx!(self, |db_tx| {
            let user = users::Entity::find_by_id(username.to_string())
                .filter(users::Column::Password.eq(password))
                .one(&db_tx)
                .await?;
            Ok(user.map(|user| user.username))
        })
    }

    pub async fn user_exists(&self, username: &str) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            Ok(users::Entity::find_by_id(username.to_string())
                .one(&db_tx)
                .await?
                .is_some())
        })
    }

    pub async fn create_user(&self, username: &str, password: &str) -> ResultEngine<()> {
        let username = username.trim();
        let mut errors = ValidationErrors::default();
        if username.is_empty() {
            errors.push("username", REQUIRED);
        }
        if password.is_empty() {
            errors.push("password", REQUIRED);
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.to_string())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username.to_string()));
            }

            users::ActiveModel {
                username: ActiveValue::Set(username.to_string()),
                password: ActiveValue::Set(password.to_string()),
            }
            .insert(&db_tx)
            .await?;
            tracing::debug!(username, "user created");
            Ok(())
        })
    }
}
