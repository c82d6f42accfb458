use super::{Collection, DocumentStore};
use crate::error::{not_found, AppResult};
use crate::models::{
    Affectation, Company, Driver, Employee, PlanningFilters, PlanningSnapshot, UserAccount,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// An entity stored in its own collection, identified by a string id
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;
    /// Name used in log and error messages
    const KIND: &'static str;

    fn id(&self) -> Option<&str>;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_record {
    ($type:ty, $collection:expr, $kind:literal) => {
        impl Record for $type {
            const COLLECTION: Collection = $collection;
            const KIND: &'static str = $kind;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }
        }
    };
}

impl_record!(Employee, Collection::Agents, "employee");
impl_record!(Driver, Collection::Drivers, "driver");
impl_record!(Company, Collection::Companies, "company");
impl_record!(Affectation, Collection::Assignments, "assignment");
impl_record!(UserAccount, Collection::Users, "user");

/// Typed access to one collection
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _record: PhantomData,
        }
    }

    /// All records. Documents that no longer deserialize are skipped.
    pub async fn list(&self) -> AppResult<Vec<T>> {
        let documents = self.store.list(T::COLLECTION).await?;
        let mut records = Vec::with_capacity(documents.len());
        for document in documents {
            match serde_json::from_str(&document) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unreadable {} document: {}", T::KIND, e),
            }
        }
        Ok(records)
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<T>> {
        match self.store.get(T::COLLECTION, id).await? {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    /// Store a new record under a fresh id
    pub async fn insert(&self, mut record: T) -> AppResult<T> {
        let id = Uuid::new_v4().to_string();
        record.set_id(id.clone());
        self.store
            .put(T::COLLECTION, &id, &serde_json::to_string(&record)?)
            .await?;
        info!("Created {} {}", T::KIND, id);
        Ok(record)
    }

    /// Replace an existing record, keeping its id
    pub async fn update(&self, id: &str, mut record: T) -> AppResult<T> {
        if self.store.get(T::COLLECTION, id).await?.is_none() {
            return Err(not_found(T::KIND, id));
        }
        record.set_id(id.to_string());
        self.store
            .put(T::COLLECTION, id, &serde_json::to_string(&record)?)
            .await?;
        Ok(record)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if self.store.delete(T::COLLECTION, id).await? {
            info!("Deleted {} {}", T::KIND, id);
            Ok(())
        } else {
            Err(not_found(T::KIND, id))
        }
    }
}

/// Keys of the session collection
mod keys {
    pub const PLANNING: &str = "planning";
    pub const FILTERS: &str = "filters";
}

/// The imported planning and the filters last used on it
#[derive(Clone)]
pub struct PlanningRepository {
    store: Arc<dyn DocumentStore>,
}

impl PlanningRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> AppResult<Option<PlanningSnapshot>> {
        match self.store.get(Collection::Session, keys::PLANNING).await? {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }

    /// Replace the stored planning
    pub async fn save(&self, snapshot: &PlanningSnapshot) -> AppResult<()> {
        self.store
            .put(
                Collection::Session,
                keys::PLANNING,
                &serde_json::to_string(snapshot)?,
            )
            .await?;
        info!("Stored planning with {} rows", snapshot.rows.len());
        Ok(())
    }

    /// Forget the planning and its filters
    pub async fn clear(&self) -> AppResult<()> {
        self.store.delete(Collection::Session, keys::PLANNING).await?;
        self.store.delete(Collection::Session, keys::FILTERS).await?;
        info!("Cleared planning");
        Ok(())
    }

    pub async fn load_filters(&self) -> AppResult<PlanningFilters> {
        match self.store.get(Collection::Session, keys::FILTERS).await? {
            Some(document) => Ok(serde_json::from_str(&document)?),
            None => Ok(PlanningFilters::default()),
        }
    }

    pub async fn save_filters(&self, filters: &PlanningFilters) -> AppResult<()> {
        self.store
            .put(
                Collection::Session,
                keys::FILTERS,
                &serde_json::to_string(filters)?,
            )
            .await
    }
}
