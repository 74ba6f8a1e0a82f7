use super::Value;

/// A parameterized SQL statement ready for the adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// SQL text with `?` placeholders.
    pub text: String,

    /// Arguments bound to the placeholders, in order.
    pub args: Vec<Value>,
}

impl Statement {
    pub fn new(text: impl Into<String>, args: Vec<Value>) -> Statement {
        Statement {
            text: text.into(),
            args,
        }
    }

    /// A statement with no bound arguments.
    pub fn raw(text: impl Into<String>) -> Statement {
        Statement::new(text, vec![])
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
