mod row;
pub use row::Row;

mod statement;
pub use statement::Statement;

mod value;
pub use value::Value;
