use thiserror::Error;

#[derive(Error, Debug)]
pub enum NestError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid Configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Geometry Error: {0}")]
    Geometry(String),

    /// A fitness value was read before the genome was evaluated.
    #[error("Genome has not been evaluated yet")]
    UninitializedGenome,
}

pub type NestResult<T> = Result<T, NestError>;
