//! The `variant` URL parameter.
//!
//! A selection is shared as `variant=colore:rosso,taglia:M`: the non-empty
//! string values of the selection, in order, as `name:value` pairs. Lists,
//! booleans and uploads are not carried, so a reload restores only the
//! string-typed options.

use crate::variant::state::SelectionState;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Name of the query parameter carrying the variant string.
pub const VARIANT_PARAM: &str = "variant";

/// Characters escaped in a query value: everything except alphanumerics and
/// `*-._`, like `application/x-www-form-urlencoded`. Spaces are handled
/// separately and become `+`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b' ');

/// Encode the string-typed subset of a selection as `name:value,...`.
pub fn encode_variant(state: &SelectionState) -> String {
    encode_pairs(state.string_pairs())
}

/// Join pairs as `name:value`, comma-separated.
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(name, value)| format!("{}:{}", name, value))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split a variant string into `(name, value)` pairs.
///
/// Segments are split on their first colon. Segments with no colon, an
/// empty name or an empty value are dropped without error.
pub fn decode_variant(raw: &str) -> Vec<(&str, &str)> {
    raw.split(',')
        .filter_map(|segment| {
            let (name, value) = segment.split_once(':')?;
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name, value))
        })
        .collect()
}

/// Escape a value for use in a query string.
pub fn form_encode(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE)
        .to_string()
        .replace(' ', "+")
}

/// Reverse [`form_encode`]. Invalid UTF-8 sequences are replaced.
pub fn form_decode(value: &str) -> String {
    let spaced = value.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// The `variant=...` query fragment for a selection, or `None` when the
/// selection has no string values to share.
pub fn variant_query(state: &SelectionState) -> Option<String> {
    let encoded = encode_variant(state);
    if encoded.is_empty() {
        None
    } else {
        Some(format!("{}={}", VARIANT_PARAM, form_encode(&encoded)))
    }
}

/// Find the `variant` parameter in a raw query string and decode it.
pub fn variant_from_query(query: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == VARIANT_PARAM)
        .map(|(_, value)| form_decode(value))
}
