pub mod memory;
pub mod pg_store;
pub mod pool;
pub mod queries;
pub mod queries_shopping;
pub mod repository;

pub use memory::{MemoryStore, NewIngredient};
pub use pg_store::PgStore;
pub use pool::create_pool;
pub use repository::{ExpenseRepository, RecipeRepository};
