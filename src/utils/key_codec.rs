//! Link key normalization.
//!
//! Keys on most domains are case-insensitive and stored lowercased in their
//! ASCII form (non-ASCII labels punycoded). A few domains treat `Abc` and
//! `abc` as different links; their keys are stored base64url-encoded so the
//! case survives any case-folding storage or index.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::collections::HashSet;

/// Encodes a key for storage on a case-sensitive domain.
pub fn encode_key(key: &str) -> String {
    URL_SAFE_NO_PAD.encode(key.as_bytes())
}

/// Reverses [`encode_key`]. Input that is not valid base64url or does not
/// decode to UTF-8 is returned unchanged.
pub fn decode_key(encoded: &str) -> String {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| encoded.to_string())
}

/// Punycodes every non-ASCII dot-separated label (`xn--` prefixed); ASCII
/// labels pass through untouched.
pub fn puny_encode(key: &str) -> String {
    key.split('.')
        .map(|label| {
            if label.is_ascii() {
                return label.to_string();
            }
            match idna::punycode::encode_str(label) {
                Some(encoded) => format!("xn--{encoded}"),
                None => label.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Decodes percent-escapes; keys that do not decode to UTF-8 are kept raw.
fn percent_decode(key: &str) -> String {
    urlencoding::decode(key)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| key.to_string())
}

/// Key codec bound to the configured set of case-sensitive domains.
#[derive(Debug, Clone, Default)]
pub struct KeyCodec {
    case_sensitive_domains: HashSet<String>,
}

impl KeyCodec {
    pub fn new<I, S>(case_sensitive_domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            case_sensitive_domains: case_sensitive_domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn is_case_sensitive_domain(&self, domain: &str) -> bool {
        self.case_sensitive_domains
            .contains(&domain.to_ascii_lowercase())
    }

    /// The form of `key` as it is compared against `links.key`.
    pub fn key_to_query(&self, domain: &str, key: &str) -> String {
        if self.is_case_sensitive_domain(domain) {
            encode_key(key)
        } else {
            self.decoded_key_to_query(domain, &percent_decode(key))
        }
    }

    /// Like [`KeyCodec::key_to_query`] for a key the router already
    /// percent-decoded (path segments, query parameters).
    pub fn decoded_key_to_query(&self, domain: &str, key: &str) -> String {
        if self.is_case_sensitive_domain(domain) {
            encode_key(key)
        } else {
            puny_encode(&key.to_lowercase())
        }
    }

    /// Query form of a key as it is already stored in `links.key`.
    pub fn stored_key_to_query(&self, domain: &str, stored_key: &str) -> String {
        if self.is_case_sensitive_domain(domain) {
            stored_key.to_string()
        } else {
            puny_encode(&stored_key.to_lowercase())
        }
    }

    /// Turns a stored key back into what the user typed, for case-sensitive
    /// domains only.
    pub fn decode_key_if_case_sensitive(&self, domain: &str, key: &str) -> String {
        if self.is_case_sensitive_domain(domain) {
            decode_key(key)
        } else {
            key.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> KeyCodec {
        KeyCodec::new(["buff.ly"])
    }

    #[test]
    fn test_case_sensitive_roundtrip_preserves_case() {
        let codec = codec();

        for key in ["AbC", "abc", "Summer-Sale_2026", "ünï"] {
            let stored = codec.key_to_query("buff.ly", key);
            let decoded = codec.decode_key_if_case_sensitive("buff.ly", &stored);

            assert_eq!(decoded, key);
            assert_eq!(encode_key(&decoded), stored);
        }

        assert_ne!(
            codec.key_to_query("buff.ly", "AbC"),
            codec.key_to_query("buff.ly", "abc")
        );
    }

    #[test]
    fn test_case_insensitive_key_is_lowercased_and_decoded() {
        let codec = codec();

        assert_eq!(codec.key_to_query("dub.sh", "Summer"), "summer");
        assert_eq!(codec.key_to_query("dub.sh", "big%20Sale"), "big sale");
        assert_eq!(
            codec.key_to_query("dub.sh", "AbC"),
            codec.key_to_query("dub.sh", "abc")
        );
    }

    #[test]
    fn test_case_insensitive_key_is_punycoded() {
        let codec = codec();

        assert_eq!(codec.key_to_query("dub.sh", "münchen"), "xn--mnchen-3ya");
        assert_eq!(codec.key_to_query("dub.sh", "M%C3%BCnchen"), "xn--mnchen-3ya");
        assert_eq!(puny_encode("a.bücher"), "a.xn--bcher-kva");
    }

    #[test]
    fn test_domain_lookup_ignores_case() {
        let codec = KeyCodec::new(["Buff.LY", " "]);

        assert!(codec.is_case_sensitive_domain("buff.ly"));
        assert!(codec.is_case_sensitive_domain("BUFF.ly"));
        assert!(!codec.is_case_sensitive_domain("dub.sh"));
    }

    #[test]
    fn test_stored_key_matches_request_form() {
        let codec = codec();

        let stored = encode_key("AbC");
        assert_eq!(
            codec.stored_key_to_query("buff.ly", &stored),
            codec.key_to_query("buff.ly", "AbC")
        );
        assert_eq!(
            codec.stored_key_to_query("dub.sh", "Summer"),
            codec.key_to_query("dub.sh", "SUMMER")
        );
    }

    #[test]
    fn test_decode_key_keeps_invalid_input() {
        assert_eq!(decode_key("not base64!"), "not base64!");
        assert_eq!(
            codec().decode_key_if_case_sensitive("dub.sh", "QWJD"),
            "QWJD"
        );
    }

    #[test]
    fn test_decoded_key_is_not_decoded_twice() {
        let codec = codec();

        // `/a%2541` reaches the handler as `a%41`.
        assert_eq!(codec.decoded_key_to_query("dub.sh", "a%41"), "a%41");
        assert_eq!(codec.key_to_query("dub.sh", "a%41"), "aa");
        assert_eq!(codec.decoded_key_to_query("dub.sh", "München"), "xn--mnchen-3ya");
        assert_eq!(
            codec.decoded_key_to_query("buff.ly", "AbC"),
            codec.key_to_query("buff.ly", "AbC")
        );
    }

    #[test]
    fn test_undecodable_percent_sequence_is_kept() {
        assert_eq!(codec().key_to_query("dub.sh", "%FF"), "%ff");
    }
}
