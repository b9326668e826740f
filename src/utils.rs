// src/utils.rs
use crate::types::OsintError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use url::Url;

/// Reads lines from a file into a vector of strings.
pub fn read_lines(path: &PathBuf) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    reader.lines().collect()
}

/// Substitute `{username}` in a profile template, percent-encoding the name.
pub fn fill_template(template: &str, username: &str) -> Result<String, OsintError> {
    let filled = template.replace("{username}", &urlencoding::encode(username));
    Url::parse(&filled)
        .map(|url| url.to_string())
        .map_err(|e| OsintError::ParseError(format!("Invalid profile URL {}: {}", filled, e)))
}

/// Host part of a URL, used for log lines.
pub fn host_of(url_str: &str) -> String {
    Url::parse(url_str)
        .ok()
        .and_then(|url| url.host_str().map(|s| s.to_string()))
        .unwrap_or_else(|| url_str.to_string())
}

/// Fully qualified name: at most 253 bytes, hostname labels of 1 to 63
/// characters, and an alphabetic top-level label of at least two.
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.len() > 253 {
        return false;
    }
    let Some((tld, labels)) = domain.rsplit_once('.') else {
        return false;
    };
    (2..=63).contains(&tld.len())
        && tld.chars().all(|c| c.is_ascii_alphabetic())
        && labels.split('.').all(is_hostname_label)
}

fn is_hostname_label(label: &str) -> bool {
    (1..=63).contains(&label.len())
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Drop the separators people type into phone numbers.
pub fn strip_phone_formatting(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn html_escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Trailing root dot off a DNS name.
pub fn trim_dns_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_domain() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("sub.example.com"));
        assert!(!is_valid_domain("example"));
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("-example.com"));
        assert!(!is_valid_domain("example-.com"));
        assert!(!is_valid_domain("..com"));
        assert!(!is_valid_domain("example.c0m"));
        assert!(!is_valid_domain("example.com."));

        let label = "a".repeat(63);
        let long = format!("{0}.{0}.{0}.{0}.com", label);
        assert!(long.len() > 253);
        assert!(!is_valid_domain(&long));
        assert!(!is_valid_domain(&format!("{}.com", "a".repeat(64))));
    }

    #[test]
    fn test_fill_template_encodes() {
        let url = fill_template("https://example.com/{username}", "john doe").unwrap();
        assert_eq!(url, "https://example.com/john%20doe");
    }

    #[test]
    fn test_strip_phone_formatting() {
        assert_eq!(strip_phone_formatting("+1 (555) 123-4567"), "+15551234567");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_host_of() {
        assert_eq!(host_of("https://api.github.com/users/x"), "api.github.com");
        assert_eq!(host_of("not a url"), "not a url");
    }
}
