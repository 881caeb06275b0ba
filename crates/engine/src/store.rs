//! Entity Store.
//!
//! Keeps the last committed state of every table in memory, keyed by primary
//! key, and mirrors it to the database. The in-memory tables are the source of
//! truth for reads; they only change through [`EntityStore::publish`], which
//! the coordinator calls after the database transaction has committed.
//!
//! Reads hand out clones, so a caller never observes a record changing under
//! its feet.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use sea_orm::{DatabaseConnection, DatabaseTransaction, prelude::*};
use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::{
    Donation, Exchange, Food, ResultEngine, Restaurant, Reward, User, donations, exchanges, foods,
    restaurants, rewards, users,
};

/// The entity kinds held by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Restaurant,
    Food,
    Donation,
    Reward,
    Exchange,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Restaurant => "restaurant",
            Self::Food => "food",
            Self::Donation => "donation",
            Self::Reward => "reward",
            Self::Exchange => "exchange",
        }
    }
}

/// One keyed map per entity kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct Tables {
    users: HashMap<Uuid, User>,
    restaurants: HashMap<Uuid, Restaurant>,
    foods: HashMap<Uuid, Food>,
    donations: HashMap<Uuid, Donation>,
    rewards: HashMap<Uuid, Reward>,
    exchanges: HashMap<Uuid, Exchange>,
}

/// A record type the store knows how to hold.
pub(crate) trait Record: Clone + Send + Sync + 'static {
    const KIND: EntityKind;
    /// Log entries: once committed, the key can never be written again.
    const APPEND_ONLY: bool;

    fn key(&self) -> Uuid;
    fn table(tables: &Tables) -> &HashMap<Uuid, Self>;
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self>;
}

/// Generates the `Record` impl binding a record type to its table.
macro_rules! impl_record {
    ($record:ty, $field:ident, $kind:expr, $append_only:expr) => {
        impl Record for $record {
            const KIND: EntityKind = $kind;
            const APPEND_ONLY: bool = $append_only;

            fn key(&self) -> Uuid {
                self.id
            }

            fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
                &tables.$field
            }

            fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
                &mut tables.$field
            }
        }
    };
}

impl_record!(User, users, EntityKind::User, false);
impl_record!(Restaurant, restaurants, EntityKind::Restaurant, false);
impl_record!(Food, foods, EntityKind::Food, false);
impl_record!(Donation, donations, EntityKind::Donation, true);
impl_record!(Reward, rewards, EntityKind::Reward, false);
impl_record!(Exchange, exchanges, EntityKind::Exchange, true);

/// Load every row of a table into its in-memory map.
macro_rules! load_table {
    ($db:expr, $module:ident, $record:ty, $map:expr) => {{
        for model in $module::Entity::find().all($db).await? {
            let record = <$record>::try_from(model)?;
            $map.insert(record.id, record);
        }
    }};
}

/// Insert-or-update one record inside a database transaction.
macro_rules! upsert {
    ($db:expr, $module:ident, $record:expr) => {{
        let model = $module::ActiveModel::from($record);
        let exists = $module::Entity::find_by_id($record.id.to_string())
            .one($db)
            .await?
            .is_some();
        if exists {
            model.update($db).await?;
        } else {
            model.insert($db).await?;
        }
    }};
}

/// Append one log record inside a database transaction.
macro_rules! append {
    ($db:expr, $module:ident, $record:expr) => {{
        $module::ActiveModel::from($record).insert($db).await?;
    }};
}

impl Tables {
    async fn load(db: &DatabaseConnection) -> ResultEngine<Self> {
        let mut tables = Self::default();
        load_table!(db, users, User, tables.users);
        load_table!(db, restaurants, Restaurant, tables.restaurants);
        load_table!(db, foods, Food, tables.foods);
        load_table!(db, donations, Donation, tables.donations);
        load_table!(db, rewards, Reward, tables.rewards);
        load_table!(db, exchanges, Exchange, tables.exchanges);
        Ok(tables)
    }

    /// Write the record `kind`/`key` of this table set to the database.
    pub(crate) async fn persist(
        &self,
        db: &DatabaseTransaction,
        kind: EntityKind,
        key: Uuid,
    ) -> ResultEngine<()> {
        match kind {
            EntityKind::User => {
                if let Some(record) = self.users.get(&key) {
                    upsert!(db, users, record);
                }
            }
            EntityKind::Restaurant => {
                if let Some(record) = self.restaurants.get(&key) {
                    upsert!(db, restaurants, record);
                }
            }
            EntityKind::Food => {
                if let Some(record) = self.foods.get(&key) {
                    upsert!(db, foods, record);
                }
            }
            EntityKind::Reward => {
                if let Some(record) = self.rewards.get(&key) {
                    upsert!(db, rewards, record);
                }
            }
            EntityKind::Donation => {
                if let Some(record) = self.donations.get(&key) {
                    append!(db, donations, record);
                }
            }
            EntityKind::Exchange => {
                if let Some(record) = self.exchanges.get(&key) {
                    append!(db, exchanges, record);
                }
            }
        }
        Ok(())
    }

    /// Move every record of `other` into `self`, replacing same-key rows.
    fn absorb(&mut self, other: Tables) {
        self.users.extend(other.users);
        self.restaurants.extend(other.restaurants);
        self.foods.extend(other.foods);
        self.donations.extend(other.donations);
        self.rewards.extend(other.rewards);
        self.exchanges.extend(other.exchanges);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.restaurants.is_empty()
            && self.foods.is_empty()
            && self.donations.is_empty()
            && self.rewards.is_empty()
            && self.exchanges.is_empty()
    }
}

/// Read access to records, either committed or as seen from inside a unit of
/// work.
pub(crate) trait ReadView {
    fn fetch<R: Record>(&self, key: Uuid) -> Option<R>;

    /// Every record of kind `R` matching `predicate`, unordered.
    fn collect<R: Record>(&self, predicate: impl Fn(&R) -> bool) -> Vec<R>;
}

impl ReadView for Tables {
    fn fetch<R: Record>(&self, key: Uuid) -> Option<R> {
        R::table(self).get(&key).cloned()
    }

    fn collect<R: Record>(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        R::table(self)
            .values()
            .filter(|record| predicate(record))
            .cloned()
            .collect()
    }
}

#[derive(Debug)]
pub(crate) struct EntityStore {
    committed: RwLock<Tables>,
    /// Single-writer token; held for the whole life of a unit of work.
    writer: Mutex<()>,
    database: DatabaseConnection,
}

impl EntityStore {
    /// Load the committed state from `database`.
    pub(crate) async fn open(database: DatabaseConnection) -> ResultEngine<Self> {
        let tables = Tables::load(&database).await?;
        Ok(Self {
            committed: RwLock::new(tables),
            writer: Mutex::new(()),
            database,
        })
    }

    pub(crate) fn database(&self) -> &DatabaseConnection {
        &self.database
    }

    /// Wait until no other unit of work is in progress, then take the token.
    pub(crate) async fn acquire_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().await
    }

    /// `true` while some unit of work holds the writer token.
    #[cfg(test)]
    pub(crate) fn writer_busy(&self) -> bool {
        self.writer.try_lock().is_err()
    }

    pub(crate) fn contains<R: Record>(&self, key: Uuid) -> bool {
        R::table(&self.read()).contains_key(&key)
    }

    /// Make `staged` visible to every reader at once.
    pub(crate) fn publish(&self, staged: Tables) {
        self.write().absorb(staged);
    }

    // Writers only swap in whole records, so a poisoned lock still guards
    // consistent tables.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.committed.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.committed.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReadView for EntityStore {
    fn fetch<R: Record>(&self, key: Uuid) -> Option<R> {
        self.read().fetch(key)
    }

    fn collect<R: Record>(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        self.read().collect(predicate)
    }
}
