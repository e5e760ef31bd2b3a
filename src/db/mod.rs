//! User persistence: the `UserStore` seam, PostgreSQL and in-memory backends.

mod memory;
mod pool;
mod repositories;
mod store;

pub use memory::MemoryUserStore;
pub use pool::{create_pool, DbPool};
pub use repositories::*;
pub use store::UserStore;

#[cfg(test)]
pub use store::MockUserStore;
