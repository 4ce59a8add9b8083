//! Identifier case conversion.

/// Converts an identifier into its lowercase, underscored form.
///
/// An uppercase letter starts a new word when it follows a lowercase letter
/// or is followed by one, so acronyms stay together:
///
/// ```
/// use urlfilter::underscore;
///
/// assert_eq!(underscore("CreatedAt"), "created_at");
/// assert_eq!(underscore("UserID"), "user_id");
/// assert_eq!(underscore("ID"), "id");
/// assert_eq!(underscore("age_gte"), "age_gte");
/// ```
pub fn underscore(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 5);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let starts_word = i > 0
                && i + 1 < chars.len()
                && (chars[i - 1].is_ascii_lowercase() || chars[i + 1].is_ascii_lowercase());
            if starts_word {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}
