//! Configuration section definitions.
//!
//! Each module corresponds to a section in `kiln.toml`:
//!
//! | Module  | TOML Section | Purpose                                  |
//! |---------|--------------|------------------------------------------|
//! | `load`  | `[load]`     | What to compile and how to serve it      |
//! | `serve` | `[serve]`    | HTTP adapter (interface, port)           |

mod load;
mod serve;

pub use load::LoadConfig;
pub use serve::ServeConfig;
