//! Path tokenizing, formatting and decoding.

use super::error::HistoryError;
use super::location::PartialLocation;
use percent_encoding::percent_decode_str;

/// Characters `decodeURI` keeps encoded because they carry URI syntax.
const RESERVED: &[u8] = b";/?:@&=+$,#";

/// Split a path string into pathname, search and hash.
///
/// A leading `http://host`, `https://host` or protocol-relative `//host`
/// is dropped so fully-qualified URLs resolve to their path. Search and hash keep their `?` and `#` sigils.
pub fn parse_path(path: &str) -> PartialLocation {
    let mut rest = strip_origin(path);

    let mut hash = None;
    if let Some(index) = rest.find('#') {
        hash = Some(rest[index..].to_string());
        rest = &rest[..index];
    }

    let mut search = None;
    if let Some(index) = rest.find('?') {
        search = Some(rest[index..].to_string());
        rest = &rest[..index];
    }

    PartialLocation {
        pathname: Some(rest.to_string()).filter(|p| !p.is_empty()),
        search,
        hash,
        ..PartialLocation::default()
    }
}

fn strip_origin(path: &str) -> &str {
    let rest = path
        .strip_prefix("https:")
        .or_else(|| path.strip_prefix("http:"))
        .unwrap_or(path);
    let Some(authority) = rest.strip_prefix("//") else {
        return path;
    };
    match authority.find('/') {
        Some(index) => &authority[index..],
        None => "",
    }
}

/// Join pathname, search and hash into a single path string.
pub fn create_path(pathname: &str, search: &str, hash: &str) -> String {
    let mut path = String::with_capacity(pathname.len() + search.len() + hash.len() + 2);
    path.push_str(pathname);
    if !search.is_empty() && search != "?" {
        if !search.starts_with('?') {
            path.push('?');
        }
        path.push_str(search);
    }
    if !hash.is_empty() && hash != "#" {
        if !hash.starts_with('#') {
            path.push('#');
        }
        path.push_str(hash);
    }
    path
}

/// Percent-decode a pathname the way `decodeURI` does.
///
/// Escapes for reserved characters are left untouched. A truncated or
/// non-hex escape, or bytes that do not form UTF-8, fail the decode.
pub fn decode_pathname(pathname: &str) -> Result<String, HistoryError> {
    let error = || HistoryError::PathDecoding {
        pathname: pathname.to_string(),
    };

    let bytes = pathname.as_bytes();
    let mut guarded = String::with_capacity(pathname.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            let ch_len = utf8_len(bytes[i]);
            guarded.push_str(&pathname[i..i + ch_len]);
            i += ch_len;
            continue;
        }
        let hi = bytes.get(i + 1).and_then(|b| hex_value(*b)).ok_or_else(error)?;
        let lo = bytes.get(i + 2).and_then(|b| hex_value(*b)).ok_or_else(error)?;
        if RESERVED.contains(&(hi << 4 | lo)) {
            // Escape the percent sign so the decoder hands the triplet back verbatim.
            guarded.push_str("%25");
            guarded.push_str(&pathname[i + 1..i + 3]);
        } else {
            guarded.push_str(&pathname[i..i + 3]);
        }
        i += 3;
    }

    percent_decode_str(&guarded)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| error())
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

fn utf8_len(first: u8) -> usize {
    match first {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_parts() {
        let parsed = parse_path("/home?the=query#the-hash");
        assert_eq!(parsed.pathname.as_deref(), Some("/home"));
        assert_eq!(parsed.search.as_deref(), Some("?the=query"));
        assert_eq!(parsed.hash.as_deref(), Some("#the-hash"));
    }

    #[test]
    fn question_mark_inside_hash_belongs_to_hash() {
        let parsed = parse_path("/a#b?c");
        assert_eq!(parsed.pathname.as_deref(), Some("/a"));
        assert_eq!(parsed.search, None);
        assert_eq!(parsed.hash.as_deref(), Some("#b?c"));
    }

    #[test]
    fn drops_origin_of_fully_qualified_url() {
        let parsed = parse_path("https://example.com/home");
        assert_eq!(parsed.pathname.as_deref(), Some("/home"));

        let bare = parse_path("https://example.com");
        assert_eq!(bare.pathname, None);
    }

    #[test]
    fn drops_protocol_relative_origin() {
        let parsed = parse_path("//cdn.example.com/x?v=2");
        assert_eq!(parsed.pathname.as_deref(), Some("/x"));
        assert_eq!(parsed.search.as_deref(), Some("?v=2"));

        let plain = parse_path("http://example.com/a");
        assert_eq!(plain.pathname.as_deref(), Some("/a"));
    }

    #[test]
    fn keeps_other_schemes_as_path() {
        let parsed = parse_path("foo://x/a");
        assert_eq!(parsed.pathname.as_deref(), Some("foo://x/a"));
    }

    #[test]
    fn keeps_url_like_query_values() {
        let parsed = parse_path("/home?redirect=https://example.com/");
        assert_eq!(parsed.pathname.as_deref(), Some("/home"));
        assert_eq!(parsed.search.as_deref(), Some("?redirect=https://example.com/"));
    }

    #[test]
    fn create_path_adds_missing_sigils() {
        assert_eq!(create_path("/a", "b=1", "top"), "/a?b=1#top");
        assert_eq!(create_path("/a", "?b=1", "#top"), "/a?b=1#top");
        assert_eq!(create_path("/a", "?", "#"), "/a");
        assert_eq!(create_path("/a", "", ""), "/a");
    }

    #[test]
    fn decodes_unreserved_escapes() {
        assert_eq!(decode_pathname("/caf%C3%A9").unwrap(), "/café");
        assert_eq!(decode_pathname("/a%20b").unwrap(), "/a b");
        assert_eq!(decode_pathname("/plain/é").unwrap(), "/plain/é");
    }

    #[test]
    fn reserved_escapes_stay_encoded() {
        assert_eq!(decode_pathname("/a%2Fb").unwrap(), "/a%2Fb");
        assert_eq!(decode_pathname("/q%3f%23").unwrap(), "/q%3f%23");
    }

    #[test]
    fn malformed_escape_fails_with_the_raw_pathname() {
        let err = decode_pathname("/bad%E0%A4%A").unwrap_err();
        match err {
            HistoryError::PathDecoding { pathname } => assert_eq!(pathname, "/bad%E0%A4%A"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(decode_pathname("/%zz").is_err());
        assert!(decode_pathname("/%").is_err());
    }

    #[test]
    fn invalid_utf8_fails() {
        assert!(decode_pathname("/%C3").is_err());
    }
}
