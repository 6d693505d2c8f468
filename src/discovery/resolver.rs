//! Reverse DNS lookup for discovered addresses

use super::HostnameResolver;
use crate::{Result, ScanError};
use dns_lookup::lookup_addr;
use std::net::IpAddr;

/// Hostname recorded when reverse lookup fails
pub const UNRESOLVED_HOSTNAME: &str = "<unresolved>";

/// Resolver using the system's reverse lookup (getnameinfo)
#[derive(Debug, Clone, Default)]
pub struct DnsResolver;

impl DnsResolver {
    pub fn new() -> Self {
        Self
    }

    /// Blocking reverse lookup.
    ///
    /// A reply that only echoes the numeric address counts as a failure.
    pub fn reverse_lookup(ip: IpAddr) -> Result<String> {
        let hostname = lookup_addr(&ip)
            .map_err(|e| ScanError::ResolveError(format!("{}: {}", ip, e)))?;

        if hostname.is_empty() || hostname == ip.to_string() {
            return Err(ScanError::ResolveError(format!("{}: no PTR record", ip)));
        }
        Ok(hostname)
    }
}

#[async_trait::async_trait]
impl HostnameResolver for DnsResolver {
    async fn resolve(&self, ip: &str) -> Result<String> {
        let addr: IpAddr = ip
            .parse()
            .map_err(|e| ScanError::ResolveError(format!("{}: {}", ip, e)))?;

        tokio::task::spawn_blocking(move || Self::reverse_lookup(addr))
            .await
            .map_err(|e| ScanError::ResolveError(format!("lookup task for {} failed: {}", ip, e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unparsable_address_is_resolve_error() {
        let resolver = DnsResolver::new();
        let err = resolver.resolve("not-an-address").await.unwrap_err();
        assert!(matches!(err, ScanError::ResolveError(_)));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_link_local_scope_suffix_is_resolve_error() {
        // `ip neigh` never prints scope ids, but a bad field must not panic
        let resolver = DnsResolver::new();
        assert!(resolver.resolve("fe80::1%eth0").await.is_err());
    }
}
