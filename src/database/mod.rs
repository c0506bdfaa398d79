pub mod connection;
pub mod memory;
pub mod models;
pub mod repository;
pub mod traits;

pub use connection::DatabaseConnection;
pub use memory::InMemoryStore;
pub use models::*;
pub use repository::*;
pub use traits::*;
