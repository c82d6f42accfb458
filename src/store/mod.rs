//! Persistence.
//!
//! Entities are stored as JSON documents grouped in collections. A
//! [`DocumentStore`] only knows about raw documents; [`Repository`] adds the
//! typed layer on top and [`PlanningRepository`] keeps the imported planning
//! and the last filters used.

mod memory;
mod redis_db;
mod repository;

pub use self::memory::InMemoryDb;
pub use self::redis_db::RedisDb;
pub use self::repository::{PlanningRepository, Record, Repository};

use crate::error::AppResult;
use async_trait::async_trait;
use std::fmt;

/// Groups of documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Agents,
    Drivers,
    Companies,
    Assignments,
    Users,
    /// Imported planning and UI state
    Session,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Agents => "agents",
            Collection::Drivers => "chauffeurs",
            Collection::Companies => "societes",
            Collection::Assignments => "affectations",
            Collection::Users => "users",
            Collection::Session => "session",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage backend for JSON documents
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// All documents of a collection
    async fn list(&self, collection: Collection) -> AppResult<Vec<String>>;

    /// One document by id
    async fn get(&self, collection: Collection, id: &str) -> AppResult<Option<String>>;

    /// Insert or replace a document
    async fn put(&self, collection: Collection, id: &str, document: &str) -> AppResult<()>;

    /// Remove a document, returning whether it existed
    async fn delete(&self, collection: Collection, id: &str) -> AppResult<bool>;
}
