use bigdecimal::BigDecimal;

/// Errors returned by every ledger and shopping-list operation
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid input: at least one participant is required")]
    EmptyParticipants,

    #[error("Split amounts total {actual} but the expense is {expected} (remaining: {delta})")]
    ValidationMismatch {
        expected: BigDecimal,
        actual: BigDecimal,
        delta: BigDecimal,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Expense {expense_id} was modified concurrently, reload and retry")]
    ConcurrencyConflict { expense_id: i64 },

    #[error("Member {member_id} may not manage expenses of trip {trip_id}")]
    Forbidden { trip_id: i64, member_id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Export failed: {0}")]
    Export(String),
}

impl LedgerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Stable machine-readable kind, used in API error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) | Self::EmptyParticipants => "invalid_input",
            Self::ValidationMismatch { .. } => "validation_mismatch",
            Self::NotFound { .. } => "not_found",
            Self::ConcurrencyConflict { .. } => "concurrency_conflict",
            Self::Forbidden { .. } => "forbidden",
            Self::Database(_) => "database",
            Self::Export(_) => "export",
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
