use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SelectionError {
    #[error("Selection syntax error: '{query}'")]
    Syntax { query: String },

    #[error("Selection '{query}' matched no atoms")]
    Empty { query: String },
}
