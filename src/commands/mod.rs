pub mod meta;
pub mod query;
pub mod render;

pub use meta::{help_text, Input, MetaCommand, META_COMMANDS};
pub use query::QueryExecutor;
