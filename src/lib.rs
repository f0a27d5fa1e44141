//! kiln: compile a directory of web assets and serve it.
//!
//! Files are classified by the extension markers in their names
//! (`app.jsx.js`, `page.ejs.html`, `theme.scss.css`) and run through the
//! matching transforms: script lowering, template compilation, style
//! compilation and prefixing, then minification. The result is a
//! [`site::Site`], an immutable map from public path to
//! [`asset::Artifact`], which a [`site::RequestHandler`] serves.
//!
//! ```no_run
//! use kiln::site::{self, HandlerOptions, LoadOptions, Request};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let site = site::load(std::path::PathBuf::from("public"), LoadOptions::default())?;
//! let handler = site.handle_request(HandlerOptions::default());
//! let outcome = handler.handle(&Request::get("/about")).await?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

pub mod logger;

pub mod asset;
pub mod cli;
pub mod config;
pub mod site;
pub mod template;
pub mod toolchain;
pub mod utils;
