/// Rewrites a camelCase property name into CSS kebab-case.
///
/// Every uppercase character becomes `-` followed by its lowercase form; all
/// other characters, digits and punctuation included, pass through. No word
/// segmentation is attempted, so `WebkitTransition` yields
/// `-webkit-transition`.
pub fn kebab_property(name: &str) -> String {
    let mut out = String::with_capacity(name.len().saturating_add(4));
    for ch in name.chars() {
        if ch.is_uppercase() {
            out.push('-');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
