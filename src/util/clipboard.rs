//! Clipboard access through the terminal.
//!
//! The text is sent as an OSC 52 escape sequence, which most modern
//! terminals (and tmux with `set-clipboard on`) turn into a system clipboard
//! write.

use base64::Engine;
use std::io::{self, Write};

/// OSC 52 sequence that sets the clipboard selection to `text`.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{}\x07", encoded)
}

/// Write the OSC 52 sequence for `text` to `out` and flush it.
pub fn copy_to_clipboard(out: &mut impl Write, text: &str) -> io::Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}
