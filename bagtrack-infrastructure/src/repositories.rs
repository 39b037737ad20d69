pub mod clickhouse_repo;
pub mod memory;
pub mod sqlite;

pub use clickhouse_repo::*;
pub use memory::*;
pub use sqlite::*;
