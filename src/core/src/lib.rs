mod error;
pub use error::{Error, Result};

pub mod driver;
pub use driver::Adapter;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

pub use async_trait::async_trait;
