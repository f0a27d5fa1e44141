//! MIME type detection utilities.
//!
//! Provides consistent MIME type detection for compiled artifacts.

/// Common MIME type constants.
pub mod types {
    // Content families the pipeline transforms
    pub const HTML: &str = "text/html";
    pub const CSS: &str = "text/css";
    pub const JAVASCRIPT: &str = "application/javascript";
    pub const PLAIN: &str = "text/plain";

    // Text
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";
    pub const MARKDOWN: &str = "text/markdown";
    pub const YAML: &str = "text/yaml";
    pub const TOML: &str = "application/toml";
    pub const CSV: &str = "text/csv";
    pub const TYPESCRIPT: &str = "application/typescript";

    // Web feeds
    pub const RSS: &str = "application/rss+xml";
    pub const ATOM: &str = "application/atom+xml";
    pub const WEBMANIFEST: &str = "application/manifest+json";

    // Documents / binary
    pub const PDF: &str = "application/pdf";
    pub const WASM: &str = "application/wasm";
    pub const ZIP: &str = "application/zip";
    pub const GZIP: &str = "application/gzip";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const BMP: &str = "image/bmp";

    // Audio / video
    pub const MP3: &str = "audio/mpeg";
    pub const WAV: &str = "audio/wav";
    pub const OGG_AUDIO: &str = "audio/ogg";
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";

    // Fonts
    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const TTF: &str = "font/ttf";
    pub const OTF: &str = "font/otf";
}

/// Guess MIME type from the final extension marker (case-insensitive).
///
/// Returns `None` when the extension is unknown; callers pick their own fallback.
pub fn from_extension(ext: Option<&str>) -> Option<&'static str> {
    let ext = ext?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "html" | "htm" => types::HTML,
        "css" => types::CSS,
        "js" | "mjs" | "cjs" => types::JAVASCRIPT,
        "txt" | "text" => types::PLAIN,
        "json" | "map" => types::JSON,
        "xml" => types::XML,
        "md" | "markdown" => types::MARKDOWN,
        "yaml" | "yml" => types::YAML,
        "toml" => types::TOML,
        "csv" => types::CSV,
        "ts" | "mts" | "cts" => types::TYPESCRIPT,

        "rss" => types::RSS,
        "atom" => types::ATOM,
        "webmanifest" => types::WEBMANIFEST,

        "pdf" => types::PDF,
        "wasm" => types::WASM,
        "zip" => types::ZIP,
        "gz" | "gzip" => types::GZIP,

        "png" => types::PNG,
        "jpg" | "jpeg" => types::JPEG,
        "gif" => types::GIF,
        "webp" => types::WEBP,
        "avif" => types::AVIF,
        "svg" => types::SVG,
        "ico" => types::ICO,
        "bmp" => types::BMP,

        "mp3" => types::MP3,
        "wav" => types::WAV,
        "ogg" | "oga" => types::OGG_AUDIO,
        "mp4" | "m4v" => types::MP4,
        "webm" => types::WEBM,

        "woff" => types::WOFF,
        "woff2" => types::WOFF2,
        "ttf" => types::TTF,
        "otf" => types::OTF,

        _ => return None,
    };
    Some(mime)
}
