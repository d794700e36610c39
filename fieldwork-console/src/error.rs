// Error types for the script console

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Invalid option spec: {0}")]
    InvalidSpec(String),

    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("Timer '{0}' was never started")]
    UnknownTimer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Report rendering error: {0}")]
    Render(#[from] handlebars::RenderError),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
