use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("attribute pattern is valid")
});

/// Extract quoted `name="value"` / `name='value'` pairs from the inside of a tag.
///
/// Unquoted and valueless attributes are ignored. Values are returned raw,
/// without entity decoding. Names are lowercased; the first occurrence wins.
pub fn extract_attributes(source: &str) -> HashMap<String, String> {
    let mut attributes = HashMap::new();

    for caps in ATTRIBUTE_RE.captures_iter(source) {
        let name = caps[1].to_ascii_lowercase();
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        attributes.entry(name).or_insert(value);
    }

    attributes
}
