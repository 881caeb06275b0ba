//! The module contains the `User` record and its table mapping.
//!
//! Only the ledger operations change `balance` and `total_points`; profile
//! fields and the password hash belong to the account management side.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{ensure_non_negative, parse_uuid},
};

/// A registered user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    /// Spendable balance, in currency units. Never negative.
    pub balance: i64,
    /// Loyalty points earned by donating. Never negative.
    pub total_points: i64,
    pub active: bool,
}

impl User {
    pub fn new(email: String, password_hash: String, full_name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            phone_number: None,
            address: None,
            balance: 0,
            total_points: 0,
            active: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub balance: i64,
    pub total_points: i64,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(value: &User) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            email: ActiveValue::Set(value.email.clone()),
            password_hash: ActiveValue::Set(value.password_hash.clone()),
            full_name: ActiveValue::Set(value.full_name.clone()),
            phone_number: ActiveValue::Set(value.phone_number.clone()),
            address: ActiveValue::Set(value.address.clone()),
            balance: ActiveValue::Set(value.balance),
            total_points: ActiveValue::Set(value.total_points),
            active: ActiveValue::Set(value.active),
        }
    }
}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "user")?,
            email: model.email,
            password_hash: model.password_hash,
            full_name: model.full_name,
            phone_number: model.phone_number,
            address: model.address,
            balance: ensure_non_negative(model.balance, "user balance")?,
            total_points: ensure_non_negative(model.total_points, "user points")?,
            active: model.active,
        })
    }
}
