//! `<column>` placeholder substitution for outline rows.

/// Replace each `<key>` token in `text` with the matching value.
///
/// Pairs are applied in order. Tokens with no matching key are left intact.
///
/// # Examples
/// ```
/// use cress_patterns::substitute_placeholders;
///
/// let row = [("fruit", "apples"), ("count", "3")];
/// assert_eq!(
///     substitute_placeholders("I eat <count> <fruit> and <other>", &row),
///     "I eat 3 apples and <other>"
/// );
/// ```
#[must_use]
pub fn substitute_placeholders<K, V>(text: &str, row: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    row.iter().fold(text.to_string(), |acc, (key, value)| {
        let token = format!("<{}>", key.as_ref());
        if acc.contains(&token) {
            acc.replace(&token, value.as_ref())
        } else {
            acc
        }
    })
}

/// Return `true` when `text` still contains a `<name>` token.
#[must_use]
pub fn has_placeholder(text: &str) -> bool {
    text.match_indices('<').any(|(start, _)| {
        text.get(start + 1..).is_some_and(|rest| {
            rest.find('>')
                .is_some_and(|end| end > 0 && !rest.get(..end).is_some_and(|n| n.contains('<')))
        })
    })
}
