//! 公共端点限流
//!
//! 等待名单注册和推荐码查询按客户端 IP 限流，超限返回 429。

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use governor::middleware::NoOpMiddleware;
use std::net::IpAddr;
use tracing::debug;

/// 基于 IP 地址的限流 key 提取器
///
/// 策略：
/// - 默认使用连接 IP（peer_addr），无法被伪造
/// - 如果连接来自配置的可信代理，则使用 X-Forwarded-For
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let conn_info = req.connection_info();

        // 获取连接 IP（TCP peer address，无法伪造）
        let peer_ip = conn_info
            .peer_addr()
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))?;

        // 检查是否启用了可信代理
        let config = crate::config::get_config();
        let trusted_proxies = &config.api.trusted_proxies;

        if !trusted_proxies.is_empty() && is_trusted_proxy(peer_ip, trusted_proxies) {
            // 来自可信代理，使用 X-Forwarded-For
            let real_ip = conn_info.realip_remote_addr().unwrap_or(peer_ip);
            debug!("Rate limit key from trusted proxy: {}", real_ip);
            Ok(real_ip.to_string())
        } else {
            // 默认：使用连接 IP
            Ok(peer_ip.to_string())
        }
    }
}

/// 检查 IP 是否在可信代理列表中
fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    let Ok(ip_addr) = ip.parse::<IpAddr>() else {
        return false;
    };

    for proxy in trusted_proxies {
        if proxy.contains('/') {
            // CIDR 格式（如 "192.168.1.0/24"）
            if ip_in_cidr(&ip_addr, proxy) {
                return true;
            }
        } else {
            // 单 IP
            if let Ok(proxy_addr) = proxy.parse::<IpAddr>()
                && ip_addr == proxy_addr
            {
                return true;
            }
        }
    }
    false
}

/// CIDR 检查（简易实现）
fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u32::from_be_bytes(ip.octets());
            let net_bits = u32::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u128::from_be_bytes(ip.octets());
            let net_bits = u128::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}

/// 创建公共端点限流器
///
/// 配置来自 api.rate_limit_per_minute（默认 30/min），突发最多 10 次。
/// 超限返回 HTTP 429 Too Many Requests。
pub fn public_rate_limiter() -> Governor<ClientIpKeyExtractor, NoOpMiddleware> {
    let config = crate::config::get_config();
    let per_minute = config.api.rate_limit_per_minute.max(1) as u64;
    let seconds_per_request = (60 / per_minute).max(1);

    let governor_config = GovernorConfigBuilder::default()
        .seconds_per_request(seconds_per_request)
        .burst_size(10)
        .key_extractor(ClientIpKeyExtractor)
        .finish()
        .expect("Invalid rate limit config");

    debug!(
        "Public rate limiter created: {} req/min, burst 10",
        per_minute
    );
    Governor::new(&governor_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_in_cidr_v4_match() {
        let ip: IpAddr = "192.168.1.42".parse().unwrap();
        assert!(ip_in_cidr(&ip, "192.168.1.0/24"));
        assert!(!ip_in_cidr(&ip, "192.168.2.0/24"));
    }

    #[test]
    fn test_ip_in_cidr_invalid_prefix() {
        let ip: IpAddr = "192.168.1.42".parse().unwrap();
        assert!(!ip_in_cidr(&ip, "192.168.1.0/99"));
        assert!(!ip_in_cidr(&ip, "not-a-cidr"));
    }

    #[test]
    fn test_is_trusted_proxy_single_ip() {
        assert!(is_trusted_proxy("10.0.0.1", &["10.0.0.1".to_string()]));
        assert!(!is_trusted_proxy("10.0.0.2", &["10.0.0.1".to_string()]));
    }
}
