//! Asset compilation: one source file in, one [`Artifact`] out.
//!
//! ```text
//! path ──► read ──► stage table ──► optimize ──► type ──► minify ──► Artifact
//!                     │
//!                     └─ template rule ──► (minify source) ──► engine ──► Artifact
//! ```

mod artifact;
mod compile;
mod error;
pub mod minify;
mod name;
pub mod stage;

pub use artifact::{Artifact, Payload};
pub use compile::{CompileOptions, Compiler, compile};
pub use error::AssetError;
pub use name::AssetName;
pub use stage::Stage;
