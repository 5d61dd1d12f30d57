//! Data models for Bookrent

pub mod book;
pub mod rent;
pub mod transaction;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use rent::{BIHistory, BorrowedBook, RentReceipt, RentalLine};
pub use transaction::{Transaction, TransactionDetails, TransactionItem};
pub use user::{User, UserClaims};
