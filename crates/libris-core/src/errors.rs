use thiserror::Error;

/// Result type alias using the canonical error facility
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that crosses a layer boundary is classified by one of these
/// kinds. The HTTP layer maps kinds to status codes; nothing below it knows
/// about HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Request/Validation
    InvalidInput,
    NotFound,
    ConstraintViolation,

    // Store
    Persistence,
    Concurrency,
    Serialization,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus the
/// operation and entity that failed for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True when the error means "no such row"
    pub fn is_not_found(&self) -> bool {
        self.kind == ExErrorKind::NotFound
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for Libris operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibrisError {
    /// Author row does not exist
    #[error("Author not found: {author_id}")]
    AuthorNotFound { author_id: i64 },

    /// Book row does not exist
    #[error("Book not found: {book_id}")]
    BookNotFound { book_id: i64 },

    /// Identifier text is not an integer
    #[error("Invalid {entity} id: {raw:?}")]
    InvalidId { entity: &'static str, raw: String },

    /// Publication year outside the accepted range or not a number
    #[error("Invalid year: {reason}")]
    InvalidYear { reason: String },

    /// ISBN fails the format or checksum check
    #[error("Invalid ISBN: {reason}")]
    InvalidIsbn { reason: String },

    /// Birthday is not a `YYYY-MM-DD` calendar date
    #[error("Invalid birthday: {reason}")]
    InvalidBirthday { reason: String },

    /// The book's stored author reference differs from the supplied author id
    #[error("Book {book_id} is linked to author {actual:?}, not {supplied}")]
    AuthorLinkMismatch {
        book_id: i64,
        supplied: i64,
        actual: Option<i64>,
    },
}

/// Conversion from LibrisError to ExError
impl From<LibrisError> for ExError {
    fn from(err: LibrisError) -> Self {
        let message = err.to_string();
        match err {
            LibrisError::AuthorNotFound { author_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(format!("author:{}", author_id))
                .with_message(message),

            LibrisError::BookNotFound { book_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(format!("book:{}", book_id))
                .with_message(message),

            LibrisError::InvalidId { .. }
            | LibrisError::InvalidYear { .. }
            | LibrisError::InvalidIsbn { .. }
            | LibrisError::InvalidBirthday { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            LibrisError::AuthorLinkMismatch { book_id, .. } => {
                ExError::new(ExErrorKind::ConstraintViolation)
                    .with_entity_id(format!("book:{}", book_id))
                    .with_message(message)
            }
        }
    }
}
