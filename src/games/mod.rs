//! Game implementations.

pub mod tien_len;
