//! In-memory persistence
//!
//! Process-local store implementing every repository trait. Selected with
//! `STORE_BACKEND=memory` and used as the injected fake in tests.

mod store;

pub use store::MemoryStore;
