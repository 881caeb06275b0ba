use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine, coordinator::Coordinator, store::EntityStore};

mod catalog;
mod donations;
mod rewards;
mod users;

/// Handle to the ledger.
///
/// Build one per process with [`Engine::builder`] and share it (for example
/// behind an `Arc`). Reads are plain functions over the last committed state;
/// writes go through a unit of work and are serialized.
#[derive(Debug)]
pub struct Engine {
    store: Arc<EntityStore>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Run `body` inside a unit of work, committing on success and rolling
    /// back on error. A failed commit is rolled back too.
    ///
    /// The unit runs on its own task: dropping the returned future does not
    /// stop it, so a started unit always ends in commit or rollback.
    async fn with_unit<T, F>(&self, operation: &'static str, body: F) -> ResultEngine<T>
    where
        F: FnOnce(&mut Coordinator<'_>) -> ResultEngine<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let task = tokio::spawn(async move {
            let mut unit = Coordinator::new(&store);
            unit.begin().await;
            let result = match body(&mut unit) {
                Ok(value) => unit.commit().await.map(|()| value),
                Err(err) => Err(err),
            };
            if let Err(err) = &result {
                unit.rollback();
                if err.is_domain() {
                    tracing::warn!(operation, error = %err, "operation rejected");
                } else {
                    tracing::error!(operation, error = %err, "operation failed");
                }
            }
            result
        });

        match task.await {
            Ok(result) => result,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(err) => Err(EngineError::IllegalState(format!(
                "{operation} did not run to completion: {err}"
            ))),
        }
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`, loading the committed state from the database.
    pub async fn build(self) -> ResultEngine<Engine> {
        let store = EntityStore::open(self.database).await?;
        Ok(Engine {
            store: Arc::new(store),
        })
    }
}
