//! Transaction Coordinator.
//!
//! A [`Coordinator`] drives one unit of work through
//! `Idle -> InProgress -> {Committed, RolledBack}`:
//!
//! - [`begin`](Coordinator::begin) waits for the store's single-writer token.
//!   A second writer blocks here until the first one commits or rolls back.
//! - [`put`](Coordinator::put) stages a record. Staged records are visible to
//!   reads made through the same coordinator and to nobody else.
//! - [`commit`](Coordinator::commit) writes every staged record inside one
//!   database transaction, then publishes them to the store in one step.
//! - [`rollback`](Coordinator::rollback) drops the staged records.
//!
//! The coordinator never validates business rules; operations do that before
//! staging anything.
//!
//! Misuse (a second `begin`, or staging/committing outside `InProgress`)
//! is a programming error and panics.

use tokio::sync::MutexGuard;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    store::{EntityKind, EntityStore, ReadView, Record, Tables},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnitState {
    Idle,
    InProgress,
    Committed,
    RolledBack,
}

pub(crate) struct Coordinator<'s> {
    store: &'s EntityStore,
    state: UnitState,
    token: Option<MutexGuard<'s, ()>>,
    staged: Tables,
    /// Write order, used when persisting.
    order: Vec<(EntityKind, Uuid)>,
}

#[track_caller]
fn illegal_state(message: String) -> ! {
    panic!("{}", EngineError::IllegalState(message))
}

impl<'s> Coordinator<'s> {
    pub(crate) fn new(store: &'s EntityStore) -> Self {
        Self {
            store,
            state: UnitState::Idle,
            token: None,
            staged: Tables::default(),
            order: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> UnitState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn staged_len(&self) -> usize {
        self.order.len()
    }

    /// Start the unit of work, waiting for any other writer to finish.
    ///
    /// # Panics
    ///
    /// If this coordinator has already been started.
    pub(crate) async fn begin(&mut self) {
        if self.state != UnitState::Idle {
            illegal_state(format!("begin() on a unit of work that is {:?}", self.state));
        }
        self.token = Some(self.store.acquire_writer().await);
        self.state = UnitState::InProgress;
        tracing::debug!("unit of work started");
    }

    /// Stage `record` for the commit.
    ///
    /// Staging the same key twice keeps the last version. Log records
    /// (donations, exchanges) can only be staged under a fresh key.
    ///
    /// # Panics
    ///
    /// If the unit of work is not in progress.
    pub(crate) fn put<R: Record>(&mut self, record: R) -> ResultEngine<()> {
        self.require_in_progress("put");
        let key = record.key();
        if R::APPEND_ONLY
            && (self.store.contains::<R>(key) || R::table(&self.staged).contains_key(&key))
        {
            return Err(EngineError::ExistingKey(format!(
                "{} {key}",
                R::KIND.as_str()
            )));
        }
        if R::table_mut(&mut self.staged).insert(key, record).is_none() {
            self.order.push((R::KIND, key));
        }
        Ok(())
    }

    /// Persist and publish every staged record.
    ///
    /// On a database failure the error is returned, nothing becomes visible
    /// and the unit of work stays `InProgress`; the caller must then
    /// [`rollback`](Self::rollback).
    ///
    /// # Panics
    ///
    /// If the unit of work is not in progress.
    pub(crate) async fn commit(&mut self) -> ResultEngine<()> {
        self.require_in_progress("commit");
        if let Err(err) = self.persist().await {
            tracing::error!(error = %err, staged = self.order.len(), "commit failed");
            return Err(err);
        }

        let writes = self.order.len();
        self.order.clear();
        self.store.publish(std::mem::take(&mut self.staged));
        self.finish(UnitState::Committed);
        tracing::debug!(writes, "unit of work committed");
        Ok(())
    }

    /// Discard every staged record.
    ///
    /// # Panics
    ///
    /// If the unit of work is not in progress.
    pub(crate) fn rollback(&mut self) {
        self.require_in_progress("rollback");
        let discarded = self.order.len();
        self.order.clear();
        self.staged = Tables::default();
        self.finish(UnitState::RolledBack);
        tracing::debug!(discarded, "unit of work rolled back");
    }

    async fn persist(&self) -> ResultEngine<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let db_tx = sea_orm::TransactionTrait::begin(self.store.database()).await?;
        for (kind, key) in &self.order {
            self.staged.persist(&db_tx, *kind, *key).await?;
        }
        db_tx.commit().await?;
        Ok(())
    }

    fn finish(&mut self, state: UnitState) {
        self.state = state;
        self.token = None;
    }

    #[track_caller]
    fn require_in_progress(&self, action: &str) {
        if self.state != UnitState::InProgress {
            illegal_state(format!("{action}() on a unit of work that is {:?}", self.state));
        }
    }
}

impl ReadView for Coordinator<'_> {
    fn fetch<R: Record>(&self, key: Uuid) -> Option<R> {
        self.require_in_progress("read");
        R::table(&self.staged)
            .get(&key)
            .cloned()
            .or_else(|| self.store.fetch(key))
    }

    fn collect<R: Record>(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        self.require_in_progress("read");
        let staged = R::table(&self.staged);
        let mut records: Vec<R> = self
            .store
            .collect(|record: &R| !staged.contains_key(&record.key()) && predicate(record));
        records.extend(staged.values().filter(|record| predicate(record)).cloned());
        records
    }
}

impl Drop for Coordinator<'_> {
    fn drop(&mut self) {
        if self.state == UnitState::InProgress {
            tracing::warn!(
                discarded = self.order.len(),
                "unit of work dropped while in progress"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use chrono::Utc;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};

    use super::*;
    use crate::{Restaurant, Reward};

    async fn store() -> EntityStore {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        EntityStore::open(db).await.unwrap()
    }

    fn reward(stock: i64) -> Reward {
        Reward::new("Tote bag".to_string(), 100, stock, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn commit_publishes_staged_records() {
        let store = store().await;
        let reward = reward(5);

        let mut unit = Coordinator::new(&store);
        assert_eq!(unit.state(), UnitState::Idle);
        unit.begin().await;
        unit.put(reward.clone()).unwrap();

        // Staged records are visible inside the unit only.
        assert_eq!(unit.fetch::<Reward>(reward.id), Some(reward.clone()));
        assert_eq!(store.fetch::<Reward>(reward.id), None);
        assert_eq!(unit.staged_len(), 1);

        unit.commit().await.unwrap();
        assert_eq!(unit.state(), UnitState::Committed);
        assert_eq!(store.fetch::<Reward>(reward.id), Some(reward));
        assert!(!store.writer_busy());
    }

    #[tokio::test]
    async fn rollback_discards_staged_records() {
        let store = store().await;
        let reward = reward(5);

        let mut unit = Coordinator::new(&store);
        unit.begin().await;
        unit.put(reward.clone()).unwrap();
        assert!(store.writer_busy());
        unit.rollback();

        assert_eq!(unit.state(), UnitState::RolledBack);
        assert_eq!(store.fetch::<Reward>(reward.id), None);
        assert!(!store.writer_busy());
    }

    #[tokio::test]
    async fn collect_overlays_staged_versions() {
        let store = store().await;
        let first = reward(1);

        let mut unit = Coordinator::new(&store);
        unit.begin().await;
        unit.put(first.clone()).unwrap();
        unit.commit().await.unwrap();

        let mut unit = Coordinator::new(&store);
        unit.begin().await;
        let mut drained = first.clone();
        drained.stock = 0;
        unit.put(drained).unwrap();
        unit.put(reward(3)).unwrap();

        let available: Vec<Reward> = unit.collect(|r: &Reward| r.stock > 0);
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].stock, 3);
        unit.rollback();

        let committed: Vec<Reward> = store.collect(|r: &Reward| r.stock > 0);
        assert_eq!(committed, vec![first]);
    }

    #[tokio::test]
    async fn log_records_cannot_be_overwritten() {
        let store = store().await;
        let restaurant = Restaurant::new("Warung".to_string(), "Jl. Merdeka 1".to_string());

        let mut unit = Coordinator::new(&store);
        unit.begin().await;
        unit.put(restaurant.clone()).unwrap();
        // Mutable records may be staged twice.
        unit.put(restaurant.clone()).unwrap();
        assert_eq!(unit.staged_len(), 1);
        unit.commit().await.unwrap();

        let exchange = crate::Exchange {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            reward_id: uuid::Uuid::new_v4(),
            points_used: 10,
            redeemed_at: Utc::now(),
        };
        let mut unit = Coordinator::new(&store);
        unit.begin().await;
        unit.put(exchange.clone()).unwrap();
        let err = unit.put(exchange.clone()).unwrap_err();
        assert_eq!(
            err,
            EngineError::ExistingKey(format!("exchange {}", exchange.id))
        );
        unit.rollback();
    }

    #[tokio::test]
    async fn failed_commit_keeps_unit_in_progress() {
        let store = store().await;
        let backend = store.database().get_database_backend();
        store
            .database()
            .execute(Statement::from_string(backend, "DROP TABLE rewards"))
            .await
            .unwrap();

        let reward = reward(1);
        let mut unit = Coordinator::new(&store);
        unit.begin().await;
        unit.put(reward.clone()).unwrap();

        let err = unit.commit().await.unwrap_err();
        assert!(matches!(err, EngineError::Persistence(_)));
        assert_eq!(unit.state(), UnitState::InProgress);
        assert_eq!(store.fetch::<Reward>(reward.id), None);

        unit.rollback();
        assert_eq!(unit.state(), UnitState::RolledBack);
        assert!(!store.writer_busy());
    }

    #[tokio::test]
    #[should_panic(expected = "Illegal state: begin() on a unit of work that is InProgress")]
    async fn double_begin_panics() {
        let store = store().await;
        let mut unit = Coordinator::new(&store);
        unit.begin().await;
        unit.begin().await;
    }

    #[tokio::test]
    #[should_panic(expected = "Illegal state: put() on a unit of work that is Idle")]
    async fn put_before_begin_panics() {
        let store = store().await;
        let mut unit = Coordinator::new(&store);
        let _ = unit.put(reward(1));
    }

    #[tokio::test]
    #[should_panic(expected = "Illegal state: commit() on a unit of work that is Committed")]
    async fn commit_twice_panics() {
        let store = store().await;
        let mut unit = Coordinator::new(&store);
        unit.begin().await;
        unit.commit().await.unwrap();
        let _ = unit.commit().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn second_writer_waits_for_the_first() {
        let store = Arc::new(store().await);
        let mut first = Coordinator::new(&store);
        first.begin().await;

        let waiting = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let mut second = Coordinator::new(&store);
                second.begin().await;
                second.rollback();
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiting.is_finished());

        first.rollback();
        tokio::time::timeout(Duration::from_secs(5), waiting)
            .await
            .unwrap()
            .unwrap();
    }
}
