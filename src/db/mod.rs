//! Persistence module split across logical submodules. SQLite stands in for
//! the browser's local storage: a flat key/value table holding strings.

mod connection;
mod storage;

pub use connection::{ensure_schema, open_database, open_in_memory};
pub use storage::{get_value, set_value};
