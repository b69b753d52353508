//! Conversion between textual paths and segment slices.
//!
//! The tree itself only ever sees `&[S]` where `S: AsRef<str>`. Routers and
//! configuration files deal in strings such as `"/cat/news"`, so this module
//! splits them on a separator and joins them back.

use crate::error::path::PathError;

/// Splits `input` into segments on `separator`.
///
/// One leading and one trailing separator are ignored, so `"/a/b"`, `"a/b"`
/// and `"/a/b/"` all yield `["a", "b"]`. The empty string and a lone
/// separator yield the identity path.
///
/// # Errors
///
/// * [`PathError::EmptySeparator`] if `separator` is empty.
/// * [`PathError::EmptySegment`] if two separators are adjacent.
pub fn split_path<'a>(input: &'a str, separator: &str) -> Result<Vec<&'a str>, PathError> {
    if separator.is_empty() {
        return Err(PathError::EmptySeparator);
    }

    let body = input.strip_prefix(separator).unwrap_or(input);
    if body.is_empty() {
        return Ok(Vec::new());
    }
    let body = body.strip_suffix(separator).unwrap_or(body);

    body.split(separator)
        .enumerate()
        .map(|(position, segment)| {
            if segment.is_empty() {
                Err(PathError::EmptySegment {
                    path: input.to_string(),
                    position,
                })
            } else {
                Ok(segment)
            }
        })
        .collect()
}

/// Joins `segments` with `separator`, always emitting a leading separator.
///
/// The identity path is rendered as the separator alone.
pub fn join_path<S: AsRef<str>>(segments: &[S], separator: &str) -> String {
    if segments.is_empty() {
        return separator.to_string();
    }

    let mut joined = String::new();
    for segment in segments {
        joined.push_str(separator);
        joined.push_str(segment.as_ref());
    }
    joined
}
