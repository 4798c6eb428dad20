//! Backend-agnostic persistence for settings documents.
//!
//! Responsibilities:
//! - Define the `Backend` read/write contract and the registry that maps
//!   backend names to shared instances.
//! - Load a document from a backend, accepting JSON text and legacy native
//!   mappings.
//! - Commit a document as a JSON object string.
//! - Provide in-memory and file-backed backends.
//!
//! Does NOT handle:
//! - Deciding when to commit (see `store.rs`).
//! - Retry policy; a failed commit is reported once and left to the caller.
//!
//! Invariants:
//! - An unregistered backend name, or an empty storage key, turns load and
//!   commit into no-ops so the store runs purely in memory.
//! - An empty document is always written as `{}`, never as a list.
//! - File writes are atomic (temp file + rename).

mod adapter;
mod backend;
mod file;
mod memory;

pub use adapter::{CommitOutcome, LoadOutcome, PersistenceAdapter};
pub use backend::{Backend, BackendRegistry, StoredValue};
pub use file::FileBackend;
pub use memory::MemoryBackend;
