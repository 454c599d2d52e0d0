//! Content normalization for change detection.
//!
//! The server's storage-format converter does not round-trip cleanly: the
//! same logical content comes back with a handful of cosmetic differences
//! (entity encodings, self-closing tag spacing, list attributes, link
//! classes). Both sides are scrubbed with a fixed substitution table before
//! comparison so that only real edits count as changes. The table must stay
//! exactly as-is; loosening it reintroduces spurious updates.

/// Scrub round-trip artifacts from content fetched from the server.
pub fn normalize_remote(content: &str) -> String {
  content
    .replace("&quot;", "\"")
    .replace("<br />", "<br/>")
    .replace("<ul class=\"alternate\">", "<ul class=\"alternate\" type=\"square\">")
    .replace(" class=\"external-link\"", "")
}

/// Scrub converter artifacts from the locally prepared candidate content.
pub fn normalize_candidate(content: &str) -> String {
  content
    .replace("&#94;", "^")
    .replace("&#8211;", "&ndash;")
    .replace("&#41;", ")")
    .replace("&#95;", "_")
    .replace("class=\"external-link\"", "")
}
