pub mod csv_export;
pub mod file;
pub mod store;

pub use file::JsonStore;
pub use store::{MemoryStore, TaskStore};
