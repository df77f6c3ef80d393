//! Helpers for request/response trace lines.

use std::borrow::Cow;

/// Replacement for credential values in logged text.
pub const FILTERED: &str = "[filtered]";

/// Suffix appended to bodies cut by [`truncate`].
pub const TRUNCATED_MARKER: &str = "[...TRUNCATED...]";

/// Replace every occurrence of each secret, raw or percent-encoded, with [`FILTERED`].
#[must_use]
pub fn redact<S: AsRef<str>>(text: &str, secrets: &[S]) -> String {
    let mut out = text.to_string();
    for secret in secrets.iter().map(AsRef::as_ref).filter(|s| !s.is_empty()) {
        out = out.replace(secret, FILTERED);

        let encoded = urlencoding::encode(secret);
        if encoded != secret {
            out = out.replace(encoded.as_ref(), FILTERED);
        }
    }
    out
}

/// Extend `secrets` with the form each one takes after `escape`.
///
/// A body serializer rewrites characters such as `&` or `"`, so a secret
/// embedded in XML or JSON no longer matches its raw text.
#[must_use]
pub fn with_escaped_forms<F>(secrets: &[&str], escape: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    let mut forms: Vec<String> = secrets.iter().map(|s| (*s).to_string()).collect();
    for secret in secrets {
        let escaped = escape(secret);
        if escaped != *secret && !forms.contains(&escaped) {
            forms.push(escaped);
        }
    }
    forms
}

/// A secret as it appears in XML text or attribute content.
#[must_use]
pub fn xml_escaped(secret: &str) -> String {
    quick_xml::escape::escape(secret).into_owned()
}

/// A secret as it appears inside a JSON string literal, without the quotes.
#[must_use]
pub fn json_escaped(secret: &str) -> String {
    serde_json::to_string(secret)
        .ok()
        .and_then(|quoted| {
            quoted
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .map(str::to_string)
        })
        .unwrap_or_else(|| secret.to_string())
}

/// Cut `body` to `max_chars` characters and mark it, when `max_chars > 0`
/// and the body is longer.
#[must_use]
pub fn truncate(body: &str, max_chars: usize) -> Cow<'_, str> {
    if max_chars == 0 {
        return Cow::Borrowed(body);
    }

    match body.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let head = body.get(..cut).unwrap_or(body);
            Cow::Owned(format!("{head}{TRUNCATED_MARKER}"))
        }
        None => Cow::Borrowed(body),
    }
}
