//! 域名名称处理

/// 去掉域名末尾的根分隔符 `.`
pub fn un_fqdn(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// 将完整记录名转换为相对 zone 的 host
///
/// - `"_acme-challenge.sub.example.com."` + `"example.com."` -> `"_acme-challenge.sub"`
/// - zone 不是后缀时原样返回（去掉末尾 `.`）：
///   `"_acme-challenge.example.com."` + `"other.com."` -> `"_acme-challenge.example.com"`
pub fn extract_record_name(fqdn: &str, zone: &str) -> String {
    let name = un_fqdn(fqdn);
    let zone = un_fqdn(zone);

    name.strip_suffix(zone)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .filter(|host| !host.is_empty())
        .unwrap_or(name)
        .to_string()
}
