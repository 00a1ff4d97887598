//! NCP API Gateway 签名 (signature v2)
//!
//! 参考: <https://api.ncloud-docs.com/docs/en/common-ncpapi>

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the request timestamp (epoch milliseconds).
pub const TIMESTAMP_HEADER: &str = "x-ncp-apigw-timestamp";
/// Header carrying the IAM access key.
pub const ACCESS_KEY_HEADER: &str = "x-ncp-iam-access-key";
/// Header carrying the base64 HMAC signature.
pub const SIGNATURE_HEADER: &str = "x-ncp-apigw-signature-v2";

/// HMAC-SHA256 计算
#[allow(clippy::expect_used)]
fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// 生成 signature v2
///
/// 待签名字符串: `"{METHOD} {URI}\n{timestamp}\n{accessKey}"`，
/// 以 `secret_key` 为密钥计算 HMAC-SHA256，再做标准 base64 编码。
pub fn make_signature(
    method: &str,
    request_uri: &str,
    timestamp_millis: i64,
    access_key: &str,
    secret_key: &str,
) -> String {
    let message = format!("{method} {request_uri}\n{timestamp_millis}\n{access_key}");
    STANDARD.encode(hmac_sha256(secret_key.as_bytes(), message.as_bytes()))
}

/// Path plus query of `url`, exactly as it appears on the request line.
pub fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "/dns/v1/ncpdns/domain?page=0&size=20&domainName=example.com";

    fn sign_default() -> String {
        make_signature("GET", URI, 1_700_000_000_000, "access", "secret")
    }

    #[test]
    fn deterministic() {
        assert_eq!(sign_default(), sign_default());
    }

    #[test]
    fn output_is_base64_of_32_bytes() {
        let sig = sign_default();
        // 32 bytes -> 44 base64 chars with one '=' of padding
        assert_eq!(sig.len(), 44);
        assert!(sig.ends_with('='));
        let raw = STANDARD.decode(&sig).unwrap();
        assert_eq!(raw.len(), 32);
    }

    #[test]
    fn matches_manual_hmac_of_canonical_message() {
        let expected = STANDARD.encode(hmac_sha256(
            b"secret",
            format!("GET {URI}\n1700000000000\naccess").as_bytes(),
        ));
        assert_eq!(sign_default(), expected);
    }

    #[test]
    fn changes_with_method() {
        let other = make_signature("POST", URI, 1_700_000_000_000, "access", "secret");
        assert_ne!(sign_default(), other);
    }

    #[test]
    fn changes_with_uri() {
        let other = make_signature(
            "GET",
            "/dns/v1/ncpdns/domain?page=0&size=20&domainName=example.org",
            1_700_000_000_000,
            "access",
            "secret",
        );
        assert_ne!(sign_default(), other);
    }

    #[test]
    fn changes_with_timestamp() {
        let other = make_signature("GET", URI, 1_700_000_000_001, "access", "secret");
        assert_ne!(sign_default(), other);
    }

    #[test]
    fn changes_with_access_key() {
        let other = make_signature("GET", URI, 1_700_000_000_000, "accesz", "secret");
        assert_ne!(sign_default(), other);
    }

    #[test]
    fn changes_with_secret_key() {
        let other = make_signature("GET", URI, 1_700_000_000_000, "access", "secreT");
        assert_ne!(sign_default(), other);
    }

    #[test]
    fn signs_with_empty_and_oversized_secret_keys() {
        let long_key = "k".repeat(200);
        for secret in ["", long_key.as_str()] {
            let sig = make_signature("GET", URI, 1_700_000_000_000, "access", secret);
            assert_eq!(STANDARD.decode(&sig).unwrap().len(), 32);
        }
    }

    #[test]
    fn request_uri_keeps_query() {
        let url = Url::parse(&format!("https://ncloud.example.test{URI}")).unwrap();
        assert_eq!(request_uri(&url), URI);
    }

    #[test]
    fn request_uri_without_query() {
        let url = Url::parse("https://ncloud.example.test/dns/v1/ncpdns/record/apply/42").unwrap();
        assert_eq!(request_uri(&url), "/dns/v1/ncpdns/record/apply/42");
    }
}
