use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Table '{table}' is missing required column '{column}'")]
    Schema { table: String, column: String },

    #[error("Table '{table}' not found in data source")]
    MissingTable { table: String },

    #[error("Duplicate key '{key}' in table '{table}'")]
    DuplicateKey { table: String, key: String },

    #[error("Unknown client '{client}'")]
    UnknownClient { client: String },

    #[error("Numeric overflow while computing {context}")]
    NumericOverflow { context: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
