use chrono::Utc;
use uuid::Uuid;

use crate::{
    EngineError, Exchange, NewReward, ResultEngine, Reward, query,
    util::{ensure_non_negative, normalize_optional_text, normalize_required_text},
};

use super::Engine;

impl Engine {
    /// Exchange loyalty points for one unit of a reward.
    ///
    /// Fails with [`EngineError::NotFound`] when the user or the reward is
    /// missing, [`EngineError::OutOfStock`] when no unit is left and
    /// [`EngineError::InsufficientPoints`] when the user cannot afford it.
    pub async fn redeem_reward(&self, user_id: Uuid, reward_id: Uuid) -> ResultEngine<Exchange> {
        let exchange = self
            .with_unit("redeem_reward", move |unit| {
                let mut user = query::user_by_id(unit, user_id)?;
                let mut reward = query::reward_by_id(unit, reward_id)?;

                if !reward.is_available() {
                    return Err(EngineError::OutOfStock(reward.name));
                }
                if user.total_points < reward.points_required {
                    return Err(EngineError::InsufficientPoints(format!(
                        "{} points available, {} required",
                        user.total_points, reward.points_required
                    )));
                }

                let exchange = Exchange {
                    id: Uuid::new_v4(),
                    user_id,
                    reward_id,
                    points_used: reward.points_required,
                    redeemed_at: Utc::now(),
                };
                reward.stock -= 1;
                user.total_points -= reward.points_required;

                unit.put(reward)?;
                unit.put(user)?;
                unit.put(exchange.clone())?;
                Ok(exchange)
            })
            .await?;

        tracing::info!(
            exchange_id = %exchange.id,
            user_id = %exchange.user_id,
            reward_id = %exchange.reward_id,
            points = exchange.points_used,
            "reward redeemed"
        );
        Ok(exchange)
    }

    pub fn reward(&self, reward_id: Uuid) -> ResultEngine<Reward> {
        query::reward_by_id(&*self.store, reward_id)
    }

    /// Rewards that still have stock, cheapest first.
    pub fn active_rewards(&self) -> Vec<Reward> {
        query::active_rewards(&*self.store)
    }

    /// The user's redemptions, most recent first.
    pub fn exchange_history(&self, user_id: Uuid) -> Vec<Exchange> {
        query::exchanges_by_user(&*self.store, user_id)
    }

    pub async fn create_reward(&self, cmd: NewReward) -> ResultEngine<Reward> {
        let name = normalize_required_text(&cmd.name, "reward name")?;
        let mut reward = Reward::new(name, cmd.points_required, cmd.stock, Utc::now())?;
        reward.description = normalize_optional_text(cmd.description.as_deref());

        self.with_unit("create_reward", move |unit| {
            unit.put(reward.clone())?;
            Ok(reward)
        })
        .await
    }

    /// Set the number of units available for a reward.
    pub async fn restock_reward(&self, reward_id: Uuid, stock: i64) -> ResultEngine<Reward> {
        let stock = ensure_non_negative(stock, "reward stock")?;
        self.with_unit("restock_reward", move |unit| {
            let mut reward = query::reward_by_id(unit, reward_id)?;
            reward.stock = stock;
            unit.put(reward.clone())?;
            Ok(reward)
        })
        .await
    }
}
