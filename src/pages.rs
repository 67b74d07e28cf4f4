//! Page-range parsing: user-supplied text → validated half-open interval.
//!
//! Ranges are written 1-based and inclusive (`"3"`, `"2-5"`, `"-5"`, `"2-"`)
//! because that is how people talk about document pages. Internally every
//! consumer wants a 0-based half-open interval it can iterate directly, so
//! normalisation happens exactly once here and [`PageInterval`] carries the
//! invariant `0 ≤ start < end ≤ page_count`. An interval that would come out
//! empty is a validation error, never a silent no-op.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A validated, non-empty, half-open interval of 0-based page indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInterval {
    start: usize,
    end: usize,
}

impl PageInterval {
    /// First selected page index (0-based, inclusive).
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last selected page index. Equals the 1-based number of
    /// the final selected page.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of pages selected. Always at least 1.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        false // the constructor rejects empty intervals
    }

    /// Iterate the selected 0-based page indices in ascending order.
    pub fn iter(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Zero-padding width for page numbers in output filenames: the digit
    /// count of the final 1-based page number, so that filenames sort
    /// lexicographically in page order (`_p01` … `_p12`, `_p001` … `_p120`).
    pub fn pad_width(&self) -> usize {
        // self.end is exactly the 1-based number of the last selected page.
        self.end.to_string().len()
    }
}

/// Parse an optional page-range expression against a known page count.
///
/// Rules:
/// - absent or empty input → the full interval `[0, page_count)`;
/// - `"n"` → the single page `[n-1, n)`;
/// - `"a-b"` → missing `a` defaults to `1`, missing `b` to `page_count`;
/// - endpoints are clamped to `[1, page_count]`;
/// - if after clamping the end is before the start, the range is rejected
///   with [`ConvertError::InvalidRange`];
/// - any non-numeric token is rejected with [`ConvertError::RangeSyntax`].
pub fn parse_page_range(
    range: Option<&str>,
    page_count: usize,
) -> Result<PageInterval, ConvertError> {
    let trimmed = range.map(str::trim).filter(|s| !s.is_empty());

    let Some(text) = trimmed else {
        if page_count == 0 {
            return Err(ConvertError::InvalidRange {
                range: String::new(),
                page_count,
            });
        }
        return Ok(PageInterval {
            start: 0,
            end: page_count,
        });
    };

    let (start, end) = match text.split_once('-') {
        Some((start_s, end_s)) => {
            let start = parse_endpoint(start_s, 1, text)?;
            let end = parse_endpoint(end_s, page_count, text)?;
            (start, end)
        }
        None => {
            let page = parse_endpoint(text, 0, text)?;
            (page, page)
        }
    };

    // Clamp to the document, then reject rather than silently empty out.
    let start = start.max(1);
    let end = end.min(page_count);
    if end < start {
        return Err(ConvertError::InvalidRange {
            range: text.to_string(),
            page_count,
        });
    }

    Ok(PageInterval {
        start: start - 1,
        end,
    })
}

/// Parse one endpoint, substituting `default` for a blank token.
fn parse_endpoint(token: &str, default: usize, whole: &str) -> Result<usize, ConvertError> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(default);
    }
    token.parse::<usize>().map_err(|_| ConvertError::RangeSyntax {
        range: whole.to_string(),
    })
}
