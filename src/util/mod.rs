//! Helpers shared by the UI and the binary.
//!
//! - **Text**: terminal-safe rendering of untrusted article text
//! - **Dates**: short and long renderings of ISO-8601 publish times
//! - **URLs**: checks applied before handing an article URL to the browser
//! - **Clipboard**: OSC 52 copy through the terminal

mod clipboard;
mod dates;
mod links;
mod text;

pub use clipboard::{copy_to_clipboard, osc52_sequence};
pub use dates::{format_long_date, format_short_date};
pub use links::{validate_url_for_open, OpenUrlError};
pub use text::{display_width, id_suffix, strip_control_chars, truncate_to_width};

/// Maximum search query length accepted from the input line.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
