//! SQL identifier quoting and sanitization utilities.
//!
//! The quote character varies by dialect (backtick for MySQL, double-quote
//! for PostgreSQL and SQLite), so quoting takes the character as a parameter.
//! Embedded quote characters are escaped by doubling, which makes the result
//! safe against identifier injection for any input string.

/// Quote a SQL identifier segment with the given quote character.
///
/// Embedded quote characters are doubled. `*` is returned unquoted, since it
/// is a syntactic token rather than an identifier.
///
/// # Examples
///
/// ```
/// use quarry_core::quote_with;
///
/// assert_eq!(quote_with('"', "users"), "\"users\"");
/// assert_eq!(quote_with('`', "users"), "`users`");
/// assert_eq!(quote_with('"', "user\"name"), "\"user\"\"name\"");
/// assert_eq!(quote_with('"', "*"), "*");
/// ```
#[inline]
pub fn quote_with(quote: char, name: &str) -> String {
    if name == "*" {
        return name.to_string();
    }
    let doubled = format!("{quote}{quote}");
    format!("{quote}{}{quote}", name.replace(quote, &doubled))
}

/// Sanitize a SQL identifier by removing non-alphanumeric/underscore
/// characters.
///
/// Use this when quoting is not possible. If the input contains only invalid
/// characters the result is an empty string.
///
/// # Examples
///
/// ```
/// use quarry_core::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("user_name"), "user_name");
/// assert_eq!(sanitize_identifier("user;DROP TABLE--"), "userDROPTABLE");
/// ```
#[inline]
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ansi() {
        assert_eq!(quote_with('"', "users"), "\"users\"");
    }

    #[test]
    fn test_quote_mysql() {
        assert_eq!(quote_with('`', "users"), "`users`");
    }

    #[test]
    fn test_quote_embedded_quote() {
        assert_eq!(quote_with('"', "user\"name"), "\"user\"\"name\"");
        assert_eq!(quote_with('`', "user`name"), "`user``name`");
    }

    #[test]
    fn test_quote_star_unquoted() {
        assert_eq!(quote_with('"', "*"), "*");
        assert_eq!(quote_with('`', "*"), "*");
    }

    #[test]
    fn test_quote_sql_keyword() {
        assert_eq!(quote_with('"', "select"), "\"select\"");
    }

    #[test]
    fn test_quote_empty() {
        assert_eq!(quote_with('"', ""), "\"\"");
    }

    #[test]
    fn test_quote_injection_attempt() {
        let malicious = "users\"; drop table secrets; --";
        assert_eq!(
            quote_with('"', malicious),
            "\"users\"\"; drop table secrets; --\""
        );
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_identifier("users"), "users");
        assert_eq!(sanitize_identifier("user name"), "username");
        assert_eq!(sanitize_identifier("!@#$%"), "");
    }
}
