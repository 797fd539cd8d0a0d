//! Tasklane core: workspace/board/list/card model, the ordered collection
//! engine, and the single-writer board store built on it.
pub mod config;
pub mod drag;
pub mod error;
pub mod ids;
pub mod lookup;
pub mod ordering;
pub mod search;
pub mod seed;
pub mod snapshot;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::{BoardStore, StoreChange};
