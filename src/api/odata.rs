//! URL building helpers shared by the command families.

/// Percent-encode a value for use inside a single-quoted OData literal.
///
/// Single quotes are doubled first, as OData string literals require.
pub fn encode_query_value(value: &str) -> String {
    urlencoding::encode(&value.replace('\'', "''")).into_owned()
}

/// Percent-encode one URL path segment (`19:abc@thread.skype` becomes
/// `19%3Aabc%40thread.skype`).
pub fn encode_path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `$filter=displayName eq '<name>'` query fragment
pub fn display_name_filter(name: &str) -> String {
    format!("$filter=displayName eq '{}'", encode_query_value(name))
}

/// Append a query fragment to a URL that may already carry a query string.
pub fn append_query(url: &str, fragment: &str) -> String {
    if url.contains('?') {
        format!("{}&{}", url, fragment)
    } else {
        format!("{}?{}", url, fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_filter() {
        assert_eq!(
            display_name_filter("Team Name"),
            "$filter=displayName eq 'Team%20Name'"
        );
        assert_eq!(
            display_name_filter("O'Brien"),
            "$filter=displayName eq 'O%27%27Brien'"
        );
    }

    #[test]
    fn test_encode_channel_id() {
        assert_eq!(
            encode_path_segment("19:00000000000000000000000000000000@thread.skype"),
            "19%3A00000000000000000000000000000000%40thread.skype"
        );
    }

    #[test]
    fn test_append_query() {
        assert_eq!(append_query("https://x/a", "$top=1"), "https://x/a?$top=1");
        assert_eq!(
            append_query("https://x/a?$expand=b", "$top=1"),
            "https://x/a?$expand=b&$top=1"
        );
    }
}
