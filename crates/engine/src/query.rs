//! Query Layer.
//!
//! Typed read helpers over a [`ReadView`]. They run the same way against the
//! committed store and from inside a unit of work, and never write.

use std::cmp::Reverse;

use uuid::Uuid;

use crate::{
    Donation, EngineError, Exchange, Food, Restaurant, ResultEngine, Reward, User,
    store::{EntityKind, ReadView, Record},
    util::normalize_email,
};

pub(crate) fn not_found(kind: EntityKind, id: Uuid) -> EngineError {
    EngineError::NotFound(format!("{} {id}", kind.as_str()))
}

fn require<V: ReadView, R: Record>(view: &V, id: Uuid) -> ResultEngine<R> {
    view.fetch::<R>(id).ok_or_else(|| not_found(R::KIND, id))
}

pub(crate) fn user_by_id<V: ReadView>(view: &V, id: Uuid) -> ResultEngine<User> {
    require(view, id)
}

/// The user registered under `email`, optionally ignoring deactivated
/// accounts. The comparison uses the normalized address.
pub(crate) fn user_by_email<V: ReadView>(
    view: &V,
    email: &str,
    active_only: bool,
) -> Option<User> {
    let email = normalize_email(email);
    view.collect(|user: &User| user.email == email && (user.active || !active_only))
        .into_iter()
        .max_by_key(|user| user.active)
}

pub(crate) fn restaurant_by_id<V: ReadView>(view: &V, id: Uuid) -> ResultEngine<Restaurant> {
    require(view, id)
}

pub(crate) fn restaurants<V: ReadView>(view: &V) -> Vec<Restaurant> {
    let mut restaurants: Vec<Restaurant> = view.collect(|_| true);
    restaurants.sort_by(|a, b| a.name.cmp(&b.name));
    restaurants
}

pub(crate) fn food_by_id<V: ReadView>(view: &V, id: Uuid) -> ResultEngine<Food> {
    require(view, id)
}

/// Foods sold by `restaurant_id`, by name.
pub(crate) fn foods_by_restaurant<V: ReadView>(view: &V, restaurant_id: Uuid) -> Vec<Food> {
    let mut foods: Vec<Food> = view.collect(|food: &Food| food.restaurant_id == restaurant_id);
    foods.sort_by(|a, b| a.name.cmp(&b.name));
    foods
}

pub(crate) fn reward_by_id<V: ReadView>(view: &V, id: Uuid) -> ResultEngine<Reward> {
    require(view, id)
}

/// Rewards with stock left, cheapest first.
pub(crate) fn active_rewards<V: ReadView>(view: &V) -> Vec<Reward> {
    let mut rewards: Vec<Reward> = view.collect(Reward::is_available);
    rewards.sort_by(|a, b| {
        a.points_required
            .cmp(&b.points_required)
            .then_with(|| a.name.cmp(&b.name))
    });
    rewards
}

/// Donations made by `user_id`, most recent first.
pub(crate) fn donations_by_user<V: ReadView>(view: &V, user_id: Uuid) -> Vec<Donation> {
    let mut donations: Vec<Donation> =
        view.collect(|donation: &Donation| donation.user_id == user_id);
    donations.sort_by_key(|donation| Reverse(donation.created_at));
    donations
}

/// Rewards redeemed by `user_id`, most recent first.
pub(crate) fn exchanges_by_user<V: ReadView>(view: &V, user_id: Uuid) -> Vec<Exchange> {
    let mut exchanges: Vec<Exchange> =
        view.collect(|exchange: &Exchange| exchange.user_id == user_id);
    exchanges.sort_by_key(|exchange| Reverse(exchange.redeemed_at));
    exchanges
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::store::Tables;

    fn insert<R: Record>(view: &mut Tables, record: R) {
        R::table_mut(view).insert(record.key(), record);
    }

    fn reward(name: &str, points: i64, stock: i64) -> Reward {
        Reward::new(name.to_string(), points, stock, Utc::now()).unwrap()
    }

    #[test]
    fn active_rewards_skip_empty_stock_and_sort_by_price() {
        let mut view = Tables::default();
        for reward in [
            reward("Mug", 500, 2),
            reward("Sticker", 50, 10),
            reward("Hoodie", 1000, 0),
            reward("Tote", 250, 1),
        ] {
            insert(&mut view, reward);
        }

        let names: Vec<String> = active_rewards(&view).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Sticker", "Tote", "Mug"]);
    }

    #[test]
    fn exchanges_are_newest_first() {
        let mut view = Tables::default();
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        for (offset, points) in [(2, 20), (0, 0), (1, 10)] {
            let exchange = Exchange {
                id: Uuid::new_v4(),
                user_id,
                reward_id: Uuid::new_v4(),
                points_used: points,
                redeemed_at: now - Duration::minutes(offset),
            };
            insert(&mut view, exchange);
        }
        let other = Exchange {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            reward_id: Uuid::new_v4(),
            points_used: 99,
            redeemed_at: now,
        };
        insert(&mut view, other);

        let points: Vec<i64> = exchanges_by_user(&view, user_id)
            .into_iter()
            .map(|e| e.points_used)
            .collect();
        assert_eq!(points, vec![0, 10, 20]);
    }

    #[test]
    fn user_lookup_by_email_respects_active_flag() {
        let mut view = Tables::default();
        let mut user = User::new(
            "dina@example.com".to_string(),
            "hash".to_string(),
            "Dina".to_string(),
        );
        user.active = false;
        insert(&mut view, user.clone());

        assert_eq!(user_by_email(&view, " Dina@Example.com", true), None);
        assert_eq!(user_by_email(&view, "dina@example.com", false), Some(user));
    }

    #[test]
    fn missing_records_are_not_found() {
        let view = Tables::default();
        let id = Uuid::new_v4();
        assert_eq!(
            reward_by_id(&view, id).unwrap_err(),
            EngineError::NotFound(format!("reward {id}"))
        );
    }
}
