//! IDF object parsing.

use regex::RegexBuilder;

use crate::error::{Error, Result};

/// Removes `!` comments from IDF text, keeping line structure.
pub fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| match line.find('!') {
            Some(i) => &line[..i],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the IDF class name at the head of an object's text.
pub fn object_type(text: &str) -> String {
    let clean = strip_comments(text);
    let end = clean.find([',', ';']).unwrap_or(clean.len());
    clean[..end].trim().to_string()
}

/// Splits a single IDF object into its field values.
///
/// The object type token is dropped, so index 0 of the result is the first
/// field (usually the name). Parsing stops at the first `;`.
///
/// # Errors
///
/// Returns [`Error::IdfParse`] if the text holds no object terminator or if
/// `expected_type` is given and does not match the object type.
pub fn parse_idf_string(text: &str, expected_type: Option<&str>) -> Result<Vec<String>> {
    let clean = strip_comments(text);
    let expected = expected_type.map(|t| t.trim_end_matches(','));
    let Some(end) = clean.find(';') else {
        return Err(Error::idf(
            expected.unwrap_or("object"),
            "missing terminating ';'",
        ));
    };
    let mut fields = clean[..end].split(',').map(|f| f.trim().to_string());
    let object_type = fields.next().unwrap_or_default();
    if let Some(expected) = expected {
        if !object_type.eq_ignore_ascii_case(expected) {
            return Err(Error::idf(
                expected,
                format!("found object of type \"{object_type}\""),
            ));
        }
    }
    Ok(fields.collect())
}

/// Returns the text of every object of `object_type` found in an IDF file.
///
/// The file is split at `;` terminators and an object matches only when its
/// first token is the type name, so a field value that equals the type name
/// never starts an object. Matching is case-insensitive and each returned
/// string runs from the type name through its terminating `;`.
pub fn extract_objects(file_text: &str, object_type: &str) -> Vec<String> {
    let name = object_type.trim().trim_end_matches(',');
    let head = format!(r"\A\s*{}\s*,", regex::escape(name));
    let Ok(head) = RegexBuilder::new(&head).case_insensitive(true).build() else {
        return Vec::new();
    };
    strip_comments(file_text)
        .split_inclusive(';')
        .filter(|object| object.ends_with(';') && head.is_match(object))
        .map(|object| object.trim_start().to_string())
        .collect()
}

/// Parses a numeric IDF field.
pub(crate) fn parse_f64(field: &str, object_type: &str, label: &str) -> Result<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::idf(object_type, format!("{label} \"{field}\" is not a number")))
}

/// Parses an optional numeric field, returning `None` when blank.
pub(crate) fn parse_opt_f64(
    fields: &[String],
    index: usize,
    object_type: &str,
    label: &str,
) -> Result<Option<f64>> {
    match fields.get(index).map(|s| s.trim()) {
        None | Some("") => Ok(None),
        Some(v) => parse_f64(v, object_type, label).map(Some),
    }
}

/// Returns a required field or an error naming it.
pub(crate) fn field<'a>(
    fields: &'a [String],
    index: usize,
    object_type: &str,
    label: &str,
) -> Result<&'a str> {
    fields
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| Error::idf(object_type, format!("missing {label}")))
}
