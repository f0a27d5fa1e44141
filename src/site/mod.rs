//! Site index and request resolution.
//!
//! [`load`] compiles a directory or file list into an immutable [`Site`];
//! [`Site::handle_request`] turns it into a [`RequestHandler`] that maps
//! request paths to artifacts and renders templates on demand.
//!
//! ```text
//! Source ──► files ──► skip ──► Compiler ──► hide .html ──► Site
//! Request ──► method check ──► lookup ──► render ──► Outcome
//! ```

mod conflict;
mod error;
mod handler;
mod index;
mod request;
pub mod route;
mod source;

pub use conflict::ConflictPolicy;
pub use error::RenderError;
pub use handler::{DEFAULT_CACHE_SECONDS, HandlerOptions, RequestHandler, VarsResolver};
pub use index::{LoadOptions, Site, load};
pub use request::{Method, NOT_FOUND_BODY, Outcome, Request, Response, RouteParams};
pub use source::Source;
