//! Command structs for engine operations.
//!
//! These types group parameters for write operations (donations, catalog
//! entries, profile changes), keeping call sites readable and avoiding long
//! argument lists.

use uuid::Uuid;

/// Donate `quantity` units of a food on behalf of a user.
#[derive(Clone, Debug)]
pub struct DonationCmd {
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub restaurant_id: Uuid,
    pub quantity: i64,
    pub note: Option<String>,
}

impl DonationCmd {
    #[must_use]
    pub fn new(user_id: Uuid, food_id: Uuid, restaurant_id: Uuid, quantity: i64) -> Self {
        Self {
            user_id,
            food_id,
            restaurant_id,
            quantity,
            note: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Register a restaurant.
#[derive(Clone, Debug)]
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
}

impl NewRestaurant {
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone_number: None,
            description: None,
        }
    }

    #[must_use]
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Add a food item to a restaurant's menu.
#[derive(Clone, Debug)]
pub struct NewFood {
    pub restaurant_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub point_value: i64,
    pub stock: i64,
}

impl NewFood {
    #[must_use]
    pub fn new(restaurant_id: Uuid, name: impl Into<String>, price: i64, point_value: i64) -> Self {
        Self {
            restaurant_id,
            name: name.into(),
            description: None,
            price,
            point_value,
            stock: 0,
        }
    }

    #[must_use]
    pub fn stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Add a reward to the catalog.
#[derive(Clone, Debug)]
pub struct NewReward {
    pub name: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub stock: i64,
}

impl NewReward {
    #[must_use]
    pub fn new(name: impl Into<String>, points_required: i64, stock: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            points_required,
            stock,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Profile fields a user may change. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    #[must_use]
    pub fn phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}
