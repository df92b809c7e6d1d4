pub mod file_repository;
pub mod pg_repository;
pub mod pool;
pub mod repository;

pub use file_repository::JsonFileRepository;
pub use pg_repository::PgSnapshotRepository;
pub use repository::{InMemoryRepository, SnapshotRepository};
