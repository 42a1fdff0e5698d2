//! SQL query functions. Each takes a `&Connection` so it can run on the
//! writer, a reader, or inside a transaction.

pub mod codec;
pub mod compress_ops;
pub mod link_ops;
pub mod memory_crud;
pub mod memory_query;
