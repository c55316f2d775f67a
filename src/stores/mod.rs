//! Contains traits and implementations for objects that store the domain [models](crate::models).
//!
//! Each record collection has its own store trait. The stores only append,
//! replace by ID, delete by ID and return whole collections; all filtering and
//! aggregation happens in memory in [query](crate::query).

mod account;
mod activity;
mod transaction;
mod transaction_type;

pub mod sqlite;

pub use account::AccountStore;
pub use activity::ActivityStore;
pub use transaction::TransactionStore;
pub use transaction_type::TransactionTypeStore;
