//! SSRF protection for the HTTPS oracle protocol.

use std::net::IpAddr;

/// Checks if a host is an internal/private host that should be blocked.
pub(crate) async fn is_internal_host(uri: &url::Url) -> Result<bool, std::io::Error> {
    let host = match uri.host_str() {
        Some(host) => host,
        None => return Ok(false),
    };

    if is_localhost_name(host) {
        return Ok(true);
    }

    // Raw IP addresses are checked directly.
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(is_internal_ip(ip));
    }

    // DNS lookup and check resolved IP
    let addr = tokio::net::lookup_host((host, 0)).await?.next();
    if let Some(addr) = addr {
        if is_internal_ip(addr.ip()) {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Check if a hostname is a localhost variant.
fn is_localhost_name(host: &str) -> bool {
    let host_lower = host.to_ascii_lowercase();
    matches!(
        host_lower.as_str(),
        "localhost" | "localhost.localdomain" | "ip6-localhost" | "ip6-loopback"
    ) || host_lower.ends_with(".local")
        || host_lower.ends_with(".internal")
}

/// Check if an IP address is internal, private or otherwise non-routable.
pub(crate) fn is_internal_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ip) => {
            if ip.is_loopback() || ip.is_broadcast() || ip.is_unspecified() {
                return true;
            }
            let octets = ip.octets();
            match octets[0] {
                0 => true,                                    // 0.0.0.0/8 (current network)
                10 => true,                                   // 10.0.0.0/8 (private)
                127 => true,                                  // 127.0.0.0/8 (loopback)
                169 if octets[1] == 254 => true,              // 169.254.0.0/16 (link-local)
                172 if (16..32).contains(&octets[1]) => true, // 172.16.0.0/12 (private)
                192 => match octets[1] {
                    0 if octets[2] == 0 || octets[2] == 2 => true, // 192.0.0.0/24, 192.0.2.0/24 (test)
                    88 if octets[2] == 99 => true,                 // 192.88.99.0/24 (6to4 relay)
                    168 => true,                                   // 192.168.0.0/16 (private)
                    _ => false,
                },
                198 if octets[1] == 18 => true, // 198.18.0.0/15 (benchmark)
                198 if octets[1] == 51 && octets[2] == 100 => true, // 198.51.100.0/24 (test)
                203 if octets[1] == 0 && octets[2] == 113 => true, // 203.0.113.0/24 (test)
                224..=239 => true,             // 224.0.0.0/4 (multicast)
                240..=255 => true,             // 240.0.0.0/4 (reserved)
                _ => false,
            }
        }
        IpAddr::V6(ip) => {
            if ip.is_loopback()
                || ip.is_unspecified()
                || ip.is_multicast()
                || ((ip.segments()[0] & 0xfe00) == 0xfc00)
            {
                // fc00::/7 (unique local)
                return true;
            }
            if (ip.segments()[0] & 0xffc0) == 0xfe80 {
                // fe80::/10 (link-local)
                return true;
            }
            // IPv4-mapped addresses inherit their IPv4 classification.
            if let Some(ipv4) = ip.to_ipv4_mapped() {
                return is_internal_ip(IpAddr::V4(ipv4));
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_ipv4() {
        assert!(is_internal_ip("127.0.0.1".parse().unwrap()));
        assert!(is_internal_ip("10.0.0.1".parse().unwrap()));
        assert!(is_internal_ip("192.168.1.1".parse().unwrap()));
        assert!(is_internal_ip("172.16.0.1".parse().unwrap()));
        assert!(is_internal_ip("169.254.10.10".parse().unwrap()));
        assert!(is_internal_ip("0.0.0.0".parse().unwrap()));
        assert!(!is_internal_ip("8.8.8.8".parse().unwrap()));
        assert!(!is_internal_ip("1.1.1.1".parse().unwrap()));
    }

    #[test]
    fn internal_ipv6() {
        assert!(is_internal_ip("::1".parse().unwrap()));
        assert!(is_internal_ip("::".parse().unwrap()));
        assert!(is_internal_ip("fc00::1".parse().unwrap()));
        assert!(is_internal_ip("fe80::1".parse().unwrap()));
        assert!(is_internal_ip("::ffff:192.168.0.1".parse().unwrap()));
        assert!(!is_internal_ip("2001:4860:4860::8888".parse().unwrap()));
    }

    #[test]
    fn localhost_names() {
        assert!(is_localhost_name("localhost"));
        assert!(is_localhost_name("LOCALHOST"));
        assert!(is_localhost_name("localhost.localdomain"));
        assert!(is_localhost_name("myhost.local"));
        assert!(is_localhost_name("db.internal"));
        assert!(!is_localhost_name("example.com"));
    }

    #[tokio::test]
    async fn literal_ip_urls_are_classified() {
        let internal = url::Url::parse("https://192.168.0.5/data").unwrap();
        assert!(is_internal_host(&internal).await.unwrap());
        let public = url::Url::parse("https://8.8.8.8/data").unwrap();
        assert!(!is_internal_host(&public).await.unwrap());
    }
}
