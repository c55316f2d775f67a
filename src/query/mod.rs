//! The stateless query engine: filtering and summary statistics over an
//! in-memory set of transactions.
//!
//! Nothing here touches a store. Every call works on the slice it is given,
//! so the results are always recomputed from the full set of transactions
//! rather than maintained incrementally.

mod filter;
mod statistics;

pub use filter::{FilterParams, FilterSpec, filter};
pub use statistics::{Statistics, TransactionView, aggregate, recent};
