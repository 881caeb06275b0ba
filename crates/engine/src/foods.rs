//! The module contains the `Food` record and its table mapping.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    util::{checked_product, ensure_non_negative, parse_uuid},
};

/// A food item sold by a restaurant.
///
/// Donating `n` units costs `price * n` from the donor's balance and earns
/// `point_value * n` loyalty points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub point_value: i64,
    pub stock: i64,
}

impl Food {
    pub fn new(
        restaurant_id: Uuid,
        name: String,
        price: i64,
        point_value: i64,
        stock: i64,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            restaurant_id,
            name,
            description: None,
            price: ensure_non_negative(price, "food price")?,
            point_value: ensure_non_negative(point_value, "food point value")?,
            stock: ensure_non_negative(stock, "food stock")?,
        })
    }

    /// Balance needed to donate `quantity` units.
    pub fn cost_of(&self, quantity: i64) -> ResultEngine<i64> {
        checked_product(self.price, quantity, "donation cost")
    }

    /// Points earned by donating `quantity` units.
    pub fn points_for(&self, quantity: i64) -> ResultEngine<i64> {
        checked_product(self.point_value, quantity, "donation points")
    }

    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "foods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub point_value: i64,
    pub stock: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Food> for ActiveModel {
    fn from(value: &Food) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            restaurant_id: ActiveValue::Set(value.restaurant_id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            price: ActiveValue::Set(value.price),
            point_value: ActiveValue::Set(value.point_value),
            stock: ActiveValue::Set(value.stock),
        }
    }
}

impl TryFrom<Model> for Food {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "food")?,
            restaurant_id: parse_uuid(&model.restaurant_id, "restaurant")?,
            name: model.name,
            description: model.description,
            price: ensure_non_negative(model.price, "food price")?,
            point_value: ensure_non_negative(model.point_value, "food point value")?,
            stock: ensure_non_negative(model.stock, "food stock")?,
        })
    }
}
