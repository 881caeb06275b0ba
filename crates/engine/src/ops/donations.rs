use chrono::Utc;
use uuid::Uuid;

use crate::{
    Donation, DonationCmd, EngineError, ResultEngine, query,
    util::{checked_sum, normalize_optional_text},
};

use super::Engine;

impl Engine {
    /// Donate food: spend the user's balance, take the units out of stock and
    /// credit the loyalty points, all in one unit of work.
    ///
    /// Checked in order, the first failure wins and nothing is written:
    ///
    /// 1. `quantity > 0` ([`EngineError::InvalidArgument`])
    /// 2. the food exists ([`EngineError::NotFound`])
    /// 3. the user exists ([`EngineError::NotFound`])
    /// 4. `food.stock >= quantity` ([`EngineError::InsufficientStock`])
    /// 5. `user.balance >= food.price * quantity` ([`EngineError::InsufficientBalance`])
    ///
    /// `restaurant_id` is recorded on the donation as given.
    pub async fn create_donation(&self, cmd: DonationCmd) -> ResultEngine<Donation> {
        let DonationCmd {
            user_id,
            food_id,
            restaurant_id,
            quantity,
            note,
        } = cmd;
        let note = normalize_optional_text(note.as_deref());

        let donation = self
            .with_unit("create_donation", move |unit| {
                if quantity <= 0 {
                    return Err(EngineError::InvalidArgument(format!(
                        "quantity must be > 0, got {quantity}"
                    )));
                }
                let mut food = query::food_by_id(unit, food_id)?;
                let mut user = query::user_by_id(unit, user_id)?;

                if !food.has_stock_for(quantity) {
                    return Err(EngineError::InsufficientStock(format!(
                        "{} has {} left, {quantity} requested",
                        food.name, food.stock
                    )));
                }
                let cost = food.cost_of(quantity)?;
                if user.balance < cost {
                    return Err(EngineError::InsufficientBalance(format!(
                        "balance {} is below cost {cost}",
                        user.balance
                    )));
                }

                let points_earned = food.points_for(quantity)?;
                let donation = Donation {
                    id: Uuid::new_v4(),
                    user_id,
                    food_id,
                    restaurant_id,
                    food_name: food.name.clone(),
                    quantity,
                    note,
                    points_earned,
                    created_at: Utc::now(),
                };

                food.stock -= quantity;
                user.balance -= cost;
                user.total_points = checked_sum(user.total_points, points_earned, "user points")?;

                unit.put(food)?;
                unit.put(user)?;
                unit.put(donation.clone())?;
                Ok(donation)
            })
            .await?;

        tracing::info!(
            donation_id = %donation.id,
            user_id = %donation.user_id,
            food_id = %donation.food_id,
            quantity = donation.quantity,
            points = donation.points_earned,
            "donation committed"
        );
        Ok(donation)
    }

    /// Advisory pre-check for the presentation layer: `true` when the food
    /// exists and has at least `quantity` units. The donation re-checks under
    /// its own unit of work.
    pub fn has_sufficient_stock(&self, food_id: Uuid, quantity: i64) -> bool {
        quantity > 0
            && query::food_by_id(&*self.store, food_id).is_ok_and(|food| food.has_stock_for(quantity))
    }

    /// The user's donations, most recent first.
    pub fn donation_history(&self, user_id: Uuid) -> Vec<Donation> {
        query::donations_by_user(&*self.store, user_id)
    }
}
