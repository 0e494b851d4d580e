// SPDX-License-Identifier: Apache-2.0

//! Bounded pagination over large text blobs.
//!
//! Scanner output can run to tens of thousands of lines; every operation
//! returns a bounded window over it, addressable by line offset. `paginate`
//! is a pure function so the windowing rules are testable without any
//! scanner in the loop.

use crate::error::{Result, WaspError};

/// Lines returned when a request does not set `max_lines`.
pub const DEFAULT_MAX_LINES: usize = 200;

/// Absolute cap on `max_lines`, enforced by input validation.
pub const MAX_ALLOWED_LINES: usize = 100_000;

/// A bounded window over a text blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// The windowed lines, rejoined with newlines.
    pub text: String,
    /// Whether lines beyond the window were cut off.
    pub truncated: bool,
    /// Line count of the full input.
    pub total_lines: usize,
    /// The offset the window was taken at.
    pub offset: usize,
    /// Number of lines in the window.
    pub shown: usize,
}

/// Take a window of at most `max_lines` lines starting at `offset`.
///
/// `max_lines == 0` applies [`DEFAULT_MAX_LINES`] so a careless request can
/// never pull an unbounded blob. An offset at or past the end yields an
/// empty, non-truncated window rather than an error.
#[must_use]
pub fn paginate(text: &str, max_lines: usize, offset: usize) -> PageWindow {
    let max_lines = if max_lines == 0 {
        DEFAULT_MAX_LINES
    } else {
        max_lines
    };

    let lines: Vec<&str> = text.split('\n').collect();
    let total_lines = lines.len();

    let mut truncated = false;
    let window: &[&str] = if offset > 0 && offset < total_lines {
        let end = if offset + max_lines < total_lines {
            truncated = true;
            offset + max_lines
        } else {
            total_lines
        };
        &lines[offset..end]
    } else if offset == 0 && total_lines > max_lines {
        truncated = true;
        &lines[..max_lines]
    } else if offset >= total_lines {
        &[]
    } else {
        &lines[..]
    };

    PageWindow {
        text: window.join("\n"),
        truncated,
        total_lines,
        offset,
        shown: window.len(),
    }
}

impl PageWindow {
    /// The range banner for a partial view: the 1-based inclusive range
    /// shown and the total line count, so a caller can page forward
    /// deterministically. `None` when the window covers the whole input.
    #[must_use]
    pub fn banner(&self) -> Option<String> {
        (self.truncated || self.offset > 0).then(|| {
            format!(
                "[Showing lines {}-{} of {} lines. Use offset parameter to view more.]",
                self.offset + 1,
                self.offset + self.shown,
                self.total_lines,
            )
        })
    }

    /// Render the window, prepending the range banner when the view is
    /// partial.
    #[must_use]
    pub fn render(&self) -> String {
        match self.banner() {
            Some(banner) => format!("{banner}\n\n{}", self.text),
            None => self.text.clone(),
        }
    }
}

/// Validate the pagination fields of a request.
pub fn validate_max_lines(max_lines: usize) -> Result<()> {
    if max_lines > MAX_ALLOWED_LINES {
        return Err(WaspError::Validation {
            message: format!("max_lines {max_lines} exceeds limit of {MAX_ALLOWED_LINES}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(n: usize) -> String {
        (1..=n)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn zero_max_lines_applies_default() {
        let text = blob(500);
        let window = paginate(&text, 0, 0);
        assert_eq!(window.shown, DEFAULT_MAX_LINES);
        assert!(window.truncated);
        assert_eq!(window.total_lines, 500);
    }

    #[test]
    fn short_input_passes_through_unbannered() {
        let text = blob(5);
        let window = paginate(&text, 10, 0);
        assert_eq!(window.text, text);
        assert!(!window.truncated);
        assert_eq!(window.render(), text);
    }

    #[test]
    fn offset_past_end_yields_empty_window() {
        let text = blob(10);
        let window = paginate(&text, 10, 50);
        assert_eq!(window.shown, 0);
        assert!(!window.truncated);
        assert_eq!(window.total_lines, 10);
    }

    #[test]
    fn offset_past_end_banner_does_not_claim_truncation() {
        let text = blob(10);
        let window = paginate(&text, 10, 50);
        // offset > 0 still produces a banner, but an empty range
        let rendered = window.render();
        assert!(rendered.starts_with("[Showing lines 51-50 of 10 lines."));
    }

    #[test]
    fn first_page_of_hundred_lines() {
        let text = blob(100);
        let window = paginate(&text, 10, 0);
        assert!(window.truncated);
        let rendered = window.render();
        assert!(rendered.starts_with(
            "[Showing lines 1-10 of 100 lines. Use offset parameter to view more.]\n\n"
        ));
        assert!(rendered.contains("line 1\n"));
        assert!(rendered.ends_with("line 10"));
    }

    #[test]
    fn middle_page_of_fifty_lines() {
        let text = blob(50);
        let window = paginate(&text, 10, 20);
        assert!(window.truncated);
        let rendered = window.render();
        assert!(rendered.starts_with(
            "[Showing lines 21-30 of 50 lines. Use offset parameter to view more.]\n\n"
        ));
        assert!(rendered.contains("line 21"));
        assert!(rendered.ends_with("line 30"));
    }

    #[test]
    fn last_partial_page_is_not_truncated() {
        let text = blob(25);
        let window = paginate(&text, 10, 20);
        assert!(!window.truncated);
        assert_eq!(window.shown, 5);
        // banner still present because offset > 0
        assert!(window.render().starts_with("[Showing lines 21-25 of 25 lines."));
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let text = blob(10);
        let window = paginate(&text, 10, 0);
        assert!(!window.truncated);
        assert_eq!(window.render(), text);
    }

    #[test]
    fn validate_max_lines_accepts_cap() {
        assert!(validate_max_lines(MAX_ALLOWED_LINES).is_ok());
        assert!(validate_max_lines(0).is_ok());
    }

    #[test]
    fn validate_max_lines_rejects_over_cap() {
        assert!(validate_max_lines(MAX_ALLOWED_LINES + 1).is_err());
    }
}
