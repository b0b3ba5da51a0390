pub mod inventory;
pub mod pool;
pub mod queries;

pub use inventory::PgInventory;
pub use pool::create_pool;
