//! Request-time errors.

use thiserror::Error;

/// Failure while producing a response. Returned to the surrounding chain,
/// never panicked.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot render `{path}`")]
    Template {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot resolve bindings for `{path}`")]
    Bindings {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}
