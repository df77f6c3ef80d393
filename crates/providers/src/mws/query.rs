//! Canonical query strings.
//!
//! The same function produces the query that is signed and the query that
//! is sent, so the two can never disagree.

/// Percent-encode everything except `A-Z a-z 0-9 - _ . ~`. Spaces become `%20`.
#[must_use]
pub fn escape(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Serialize parameters as `key=value` pairs sorted by key, joined with `&`.
///
/// Keys are compared by byte value. Input order does not matter.
#[must_use]
pub fn canonical_query<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = params.into_iter().collect();
    pairs.sort_by(|(a, _), (b, _)| a.as_ref().as_bytes().cmp(b.as_ref().as_bytes()));

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k.as_ref()), escape(v.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}
