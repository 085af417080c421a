#![forbid(unsafe_code)]

pub mod repository;

pub use repository::{
    InMemoryRepository, SessionRecordRepository, SessionRecordRow, Storage, StorageError,
};
