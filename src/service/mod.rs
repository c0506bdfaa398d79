pub mod error;
pub mod sellers;
pub mod transactions;

pub use error::{ServiceError, ServiceResult};
pub use sellers::SellerService;
pub use transactions::TransactionService;
