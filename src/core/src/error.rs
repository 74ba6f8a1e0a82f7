use std::fmt;

/// An error that can occur in Lagoon.
pub struct Error {
    inner: Box<ErrorKind>,
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
enum ErrorKind {
    /// The caller supplied input that does not conform to the schema or to an
    /// operation's nesting rules.
    InvalidArgument(String),

    /// A query that must identify at most one row matched several.
    NotUnique(String),

    /// A record that an operation requires was not found. The payload names
    /// the operation (`Create`, `Update`, `Delete`).
    RecordNotFound(&'static str),

    /// A value or statement form the engine cannot express.
    Unsupported(String),

    /// A schema registry lookup missed.
    UnknownEntity(String),

    /// The schema itself is inconsistent (missing relation dual, absent FK
    /// column, duplicate table).
    InvalidSchema(String),

    /// A failure propagated from the database adapter.
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Error {
        ErrorKind::InvalidArgument(msg.into()).into()
    }

    pub fn not_unique(msg: impl Into<String>) -> Error {
        ErrorKind::NotUnique(msg.into()).into()
    }

    pub fn record_not_found(operation: &'static str) -> Error {
        ErrorKind::RecordNotFound(operation).into()
    }

    pub fn unsupported(msg: impl Into<String>) -> Error {
        ErrorKind::Unsupported(msg.into()).into()
    }

    pub fn unknown_entity(msg: impl Into<String>) -> Error {
        ErrorKind::UnknownEntity(msg.into()).into()
    }

    pub fn invalid_schema(msg: impl Into<String>) -> Error {
        ErrorKind::InvalidSchema(msg.into()).into()
    }

    pub fn adapter(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Error {
        ErrorKind::Adapter(err.into()).into()
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(*self.inner, ErrorKind::InvalidArgument(_))
    }

    pub fn is_not_unique(&self) -> bool {
        matches!(*self.inner, ErrorKind::NotUnique(_))
    }

    pub fn is_record_not_found(&self) -> bool {
        matches!(*self.inner, ErrorKind::RecordNotFound(_))
    }

    /// The operation name carried by a `RecordNotFound` error.
    pub fn record_not_found_operation(&self) -> Option<&str> {
        match *self.inner {
            ErrorKind::RecordNotFound(op) => Some(op),
            _ => None,
        }
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(*self.inner, ErrorKind::Unsupported(_))
    }

    pub fn is_unknown_entity(&self) -> bool {
        matches!(*self.inner, ErrorKind::UnknownEntity(_))
    }

    pub fn is_invalid_schema(&self) -> bool {
        matches!(*self.inner, ErrorKind::InvalidSchema(_))
    }

    pub fn is_adapter(&self) -> bool {
        matches!(*self.inner, ErrorKind::Adapter(_))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Box::new(kind),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorKind::*;

        match &*self.inner {
            InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            NotUnique(msg) => write!(f, "not unique: {msg}"),
            RecordNotFound(op) => write!(f, "record not found: {op}"),
            Unsupported(msg) => write!(f, "unsupported: {msg}"),
            UnknownEntity(msg) => write!(f, "unknown entity: {msg}"),
            InvalidSchema(msg) => write!(f, "invalid schema: {msg}"),
            Adapter(err) => write!(f, "adapter error: {err}"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("Error").field("kind", &self.inner).finish()
        } else {
            fmt::Display::fmt(self, f)
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.inner {
            ErrorKind::Adapter(err) => Some(&**err),
            _ => None,
        }
    }
}
