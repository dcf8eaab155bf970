use thiserror::Error;

/// Validation failures from the portfolio store. Every variant maps to a
/// user-visible warning; none of them changes prior state.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Portfolio name cannot be blank")]
    BlankName,

    #[error("Cannot create a portfolio with no holdings")]
    EmptyHoldings,

    #[error("Portfolio not found: {0}")]
    NotFound(String),

    #[error("Asset already added: {0}")]
    DuplicateSymbol(String),

    #[error("Weight must be between 0 and 100, got {0}")]
    InvalidWeight(f64),

    #[error("Import contains no rows")]
    EmptyImport,

    #[error("Malformed import: {0}")]
    MalformedImport(String),
}

/// HTTP-level failures from the market-data and news providers. These stay
/// internal to the clients: the risk resolver and the news aggregator
/// degrade to static defaults or demo data instead of propagating them.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("No data returned for {0}")]
    NoData(String),
}
