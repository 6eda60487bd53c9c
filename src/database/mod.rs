pub mod client;
pub mod connection;
pub mod result;
#[cfg(test)]
pub mod testing;

pub use client::{QueryClient, Statement};
pub use connection::Connection;
pub use result::{Cell, ResultCursor, ResultSet};
