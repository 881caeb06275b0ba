use uuid::Uuid;

use crate::{
    Food, NewFood, NewRestaurant, ResultEngine, Restaurant, query,
    util::{normalize_optional_text, normalize_required_text},
};

use super::Engine;

impl Engine {
    pub async fn create_restaurant(&self, cmd: NewRestaurant) -> ResultEngine<Restaurant> {
        let mut restaurant = Restaurant::new(
            normalize_required_text(&cmd.name, "restaurant name")?,
            normalize_required_text(&cmd.address, "restaurant address")?,
        );
        restaurant.phone_number = normalize_optional_text(cmd.phone_number.as_deref());
        restaurant.description = normalize_optional_text(cmd.description.as_deref());

        self.with_unit("create_restaurant", move |unit| {
            unit.put(restaurant.clone())?;
            Ok(restaurant)
        })
        .await
    }

    /// Add a food to an existing restaurant.
    pub async fn create_food(&self, cmd: NewFood) -> ResultEngine<Food> {
        let name = normalize_required_text(&cmd.name, "food name")?;
        let mut food = Food::new(cmd.restaurant_id, name, cmd.price, cmd.point_value, cmd.stock)?;
        food.description = normalize_optional_text(cmd.description.as_deref());

        self.with_unit("create_food", move |unit| {
            query::restaurant_by_id(unit, food.restaurant_id)?;
            unit.put(food.clone())?;
            Ok(food)
        })
        .await
    }

    pub fn restaurant(&self, restaurant_id: Uuid) -> ResultEngine<Restaurant> {
        query::restaurant_by_id(&*self.store, restaurant_id)
    }

    /// Every restaurant, by name.
    pub fn restaurants(&self) -> Vec<Restaurant> {
        query::restaurants(&*self.store)
    }

    pub fn food(&self, food_id: Uuid) -> ResultEngine<Food> {
        query::food_by_id(&*self.store, food_id)
    }

    pub fn foods_by_restaurant(&self, restaurant_id: Uuid) -> Vec<Food> {
        query::foods_by_restaurant(&*self.store, restaurant_id)
    }
}
