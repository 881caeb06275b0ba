use uuid::Uuid;

use crate::{
    EngineError, ProfileUpdate, ResultEngine, SessionProvider, User, query,
    util::{
        checked_sum, hash_password, normalize_email, normalize_optional_text,
        normalize_required_text, verify_password,
    },
};

use super::Engine;

impl Engine {
    /// Create an account with an empty balance and no points.
    ///
    /// The e-mail must not belong to another active account.
    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> ResultEngine<User> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(EngineError::InvalidArgument(
                "email must not be empty".to_string(),
            ));
        }
        let full_name = normalize_required_text(full_name, "full name")?;
        let password_hash = hash_password(password)?;

        let user = self
            .with_unit("register_user", move |unit| {
                if query::user_by_email(unit, &email, true).is_some() {
                    return Err(EngineError::ExistingKey(email));
                }
                let user = User::new(email, password_hash, full_name);
                unit.put(user.clone())?;
                Ok(user)
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// The active user matching `email` and `password`.
    pub fn authenticate(&self, email: &str, password: &str) -> ResultEngine<User> {
        query::user_by_email(&*self.store, email, true)
            .filter(|user| verify_password(password, &user.password_hash))
            .ok_or(EngineError::InvalidCredentials)
    }

    /// Credit `amount` to the user's balance.
    pub async fn top_up(&self, user_id: Uuid, amount: i64) -> ResultEngine<User> {
        let user = self
            .with_unit("top_up", move |unit| {
                if amount <= 0 {
                    return Err(EngineError::InvalidArgument(format!(
                        "top-up amount must be > 0, got {amount}"
                    )));
                }
                let mut user = query::user_by_id(unit, user_id)?;
                user.balance = checked_sum(user.balance, amount, "user balance")?;
                unit.put(user.clone())?;
                Ok(user)
            })
            .await?;

        tracing::info!(user_id = %user.id, amount, "balance topped up");
        Ok(user)
    }

    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> ResultEngine<User> {
        let full_name = update
            .full_name
            .as_deref()
            .map(|name| normalize_required_text(name, "full name"))
            .transpose()?;

        self.with_unit("update_profile", move |unit| {
            let mut user = query::user_by_id(unit, user_id)?;
            if let Some(full_name) = full_name {
                user.full_name = full_name;
            }
            if update.phone_number.is_some() {
                user.phone_number = normalize_optional_text(update.phone_number.as_deref());
            }
            if update.address.is_some() {
                user.address = normalize_optional_text(update.address.as_deref());
            }
            unit.put(user.clone())?;
            Ok(user)
        })
        .await
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current: &str,
        new_password: &str,
    ) -> ResultEngine<()> {
        let password_hash = hash_password(new_password)?;
        let current = current.to_string();
        self.with_unit("change_password", move |unit| {
            let mut user = query::user_by_id(unit, user_id)?;
            if !verify_password(&current, &user.password_hash) {
                return Err(EngineError::InvalidCredentials);
            }
            user.password_hash = password_hash;
            unit.put(user)?;
            Ok(())
        })
        .await
    }

    pub fn user(&self, user_id: Uuid) -> ResultEngine<User> {
        query::user_by_id(&*self.store, user_id)
    }

    /// The active user registered with `email`.
    pub fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        query::user_by_email(&*self.store, email, true)
            .ok_or_else(|| EngineError::NotFound(format!("user {}", normalize_email(email))))
    }

    /// The signed-in user, if the session has one.
    pub fn current_user(&self, session: &impl SessionProvider) -> ResultEngine<Option<User>> {
        session
            .current_user_id()
            .map(|user_id| self.user(user_id))
            .transpose()
    }
}
