//! # Owlset Store
//!
//! Durable [`GraphStore`](owlset_graph::GraphStore) backed by SQLite.
//!
//! Two tables: `nodes` keyed by id and `edges` keyed by
//! `(source_id, target_id, kind)`. The database runs in WAL mode so other
//! processes can read while a scan writes.
//!
//! ```no_run
//! use owlset_graph::GraphStore;
//! use owlset_store::SqliteGraphStore;
//!
//! # fn main() -> Result<(), owlset_graph::StoreError> {
//! let store = SqliteGraphStore::open("data/owlset.db")?;
//! println!("{} nodes", store.get_all_nodes()?.len());
//! # Ok(())
//! # }
//! ```

mod sqlite;

pub use sqlite::SqliteGraphStore;
