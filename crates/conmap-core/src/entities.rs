//! Character-entity decoding for dictionary attribute values.

use std::borrow::Cow;

/// Escapes handled by [`decode_entities`]. `&amp;` stays last so that a
/// doubly escaped sequence such as `&amp;lt;` collapses by one level only.
const ENTITIES: [(&str, &str); 5] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&apos;", "'"),
    ("&quot;", "\""),
    ("&amp;", "&"),
];

/// Replace the five XML character entities with their literal characters.
///
/// Unknown entities are left untouched.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut result = input.to_string();
    for (entity, literal) in ENTITIES {
        if result.contains(entity) {
            result = result.replace(entity, literal);
        }
    }

    Cow::Owned(result)
}
