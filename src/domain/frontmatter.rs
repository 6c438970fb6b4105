//! Front-matter document parsing.
//!
//! A document is a header of `key: value` lines terminated by a `---`
//! boundary line, followed by the body. The body is returned exactly as it
//! appears after the boundary's newline; no re-escaping or trimming is
//! applied to it.

use thiserror::Error;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::domain::entities::{Author, Category, Post};

/// Line that separates the metadata header from the body.
pub const BOUNDARY: &str = "---";

pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[error("missing `{BOUNDARY}` boundary between header and body")]
    MissingBoundary,
    #[error("malformed header line `{line}`")]
    MalformedHeader { line: String },
    #[error("slug `{value}` is not in canonical slug form")]
    InvalidSlug { value: String },
    #[error("invalid date `{value}`: {message}")]
    InvalidDate { value: String, message: String },
}

/// Parse one raw document into a [`Post`].
///
/// Pure over the input text: identical bytes always yield a value-equal
/// record. `title` and `slug` are required; `excerpt`, `date`, `category`
/// and `author` are optional. Unknown header keys are ignored.
pub fn parse(raw: &str) -> Result<Post, ParseError> {
    let mut title = None;
    let mut slug = None;
    let mut excerpt = None;
    let mut date = None;
    let mut category = None;
    let mut author = None;

    let mut rest = raw;
    let body = loop {
        let (line, tail) = match rest.split_once('\n') {
            Some((line, tail)) => (line, Some(tail)),
            None => (rest, None),
        };
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line == BOUNDARY {
            break tail.unwrap_or("");
        }
        let Some(tail) = tail else {
            return Err(ParseError::MissingBoundary);
        };

        if !line.trim().is_empty() {
            let (key, value) = line
                .split_once(':')
                .ok_or_else(|| ParseError::MalformedHeader {
                    line: line.to_string(),
                })?;
            let value = value.trim();
            match key.trim() {
                "title" => title = Some(value.to_string()),
                "slug" => slug = Some(validated_slug(value)?),
                "excerpt" => excerpt = Some(value.to_string()),
                "date" => date = Some(parsed_date(value)?),
                "category" => {
                    category = Some(Category {
                        slug: value.to_string(),
                        name: value.to_string(),
                    });
                }
                "author" => {
                    author = Some(Author {
                        username: value.to_string(),
                        name: value.to_string(),
                    });
                }
                _ => {}
            }
        }

        rest = tail;
    };

    let title = title.ok_or(ParseError::MissingField { field: "title" })?;
    let slug = slug.ok_or(ParseError::MissingField { field: "slug" })?;

    Ok(Post {
        slug,
        title,
        excerpt,
        body: body.to_string(),
        published_at: date,
        category,
        author,
    })
}

fn validated_slug(value: &str) -> Result<String, ParseError> {
    if value.is_empty() || slug::slugify(value) != value {
        return Err(ParseError::InvalidSlug {
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

fn parsed_date(value: &str) -> Result<Date, ParseError> {
    Date::parse(value, DATE_FORMAT).map_err(|err| ParseError::InvalidDate {
        value: value.to_string(),
        message: err.to_string(),
    })
}
