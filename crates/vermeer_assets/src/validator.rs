//! URL safety validation against server-side request forgery.
//!
//! A reference is usable only if its scheme is allowed and every address its
//! host resolves to is publicly routable. Checking all addresses, not just the
//! first, closes the window where a rebinding DNS server answers with one
//! public and one internal address.

use crate::ValidatorConfig;
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::{Host, Url};
use vermeer_core::{AssetReference, RequestContext};
use vermeer_error::{AssetError, AssetErrorKind, AssetResult};

/// Resolves host names to addresses.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Every address `host` resolves to.
    async fn resolve(&self, host: &str, port: u16) -> std::io::Result<Vec<IpAddr>>;
}

/// Resolver backed by the operating system via tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, host: &str, port: u16) -> std::io::Result<Vec<IpAddr>> {
        let addrs = tokio::net::lookup_host((host, port)).await?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// Whether `ip` belongs to a network that references may not reach.
///
/// Covers private, loopback, link-local unicast and multicast, and
/// unspecified addresses for both families. IPv4-mapped IPv6 addresses are
/// judged by the embedded IPv4 address.
///
/// # Examples
///
/// ```
/// use std::net::IpAddr;
/// use vermeer_assets::is_restricted;
///
/// assert!(is_restricted("127.0.0.1".parse::<IpAddr>().unwrap()));
/// assert!(is_restricted("::ffff:10.0.0.1".parse::<IpAddr>().unwrap()));
/// assert!(!is_restricted("93.184.216.34".parse::<IpAddr>().unwrap()));
/// ```
pub fn is_restricted(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_restricted_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_restricted_v4(v4),
            None => is_restricted_v6(v6),
        },
    }
}

fn is_restricted_v4(ip: Ipv4Addr) -> bool {
    let [a, b, c, _] = ip.octets();
    ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        // 224.0.0.0/24
        || (a == 224 && b == 0 && c == 0)
}

fn is_restricted_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // fc00::/7 unique local
        || (first & 0xfe00) == 0xfc00
        // fe80::/10 link-local unicast
        || (first & 0xffc0) == 0xfe80
        // ffx2::/16 link-local multicast
        || (first & 0xff0f) == 0xff02
}

/// Classifies references as usable or rejected.
#[derive(Clone)]
pub struct UrlValidator {
    config: ValidatorConfig,
    resolver: Arc<dyn Resolver>,
}

impl std::fmt::Debug for UrlValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlValidator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UrlValidator {
    /// Create a validator using `resolver` for host names.
    pub fn new(config: ValidatorConfig, resolver: Arc<dyn Resolver>) -> Self {
        Self { config, resolver }
    }

    /// Validator using the system resolver.
    pub fn with_system_resolver(config: ValidatorConfig) -> Self {
        Self::new(config, Arc::new(SystemResolver))
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Accept or reject a reference.
    ///
    /// Object storage references are trusted structurally and accepted without
    /// resolution. Rejection is reported as
    /// [`AssetErrorKind::RejectedReference`]; an interrupted resolution as
    /// [`AssetErrorKind::Interrupted`].
    #[instrument(skip(self, ctx, reference), fields(source_uri = %reference.source_uri()))]
    pub async fn validate(&self, ctx: &RequestContext, reference: &AssetReference) -> AssetResult<()> {
        if reference.is_object_storage() {
            debug!("Object storage reference accepted without network checks");
            return Ok(());
        }

        let url = Url::parse(reference.source_uri())
            .map_err(|e| rejected(format!("unparseable URL: {}", e)))?;

        if !self
            .config
            .allowed_schemes()
            .iter()
            .any(|s| s.eq_ignore_ascii_case(url.scheme()))
        {
            return Err(rejected(format!("scheme '{}' not allowed", url.scheme())));
        }

        let addresses = match url.host() {
            None => return Err(rejected("URL has no host")),
            Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
            Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
            Some(Host::Domain(domain)) => {
                let port = url.port_or_known_default().unwrap_or(443);
                ctx.run(self.resolver.resolve(domain, port))
                    .await?
                    .map_err(|e| rejected(format!("failed to resolve '{}': {}", domain, e)))?
            }
        };

        if addresses.is_empty() {
            return Err(rejected("host resolved to no addresses"));
        }

        if let Some(ip) = addresses.iter().copied().find(|ip| is_restricted(*ip)) {
            warn!(%ip, "Reference resolves to a restricted network");
            return Err(rejected(format!("restricted address {}", ip)));
        }

        debug!(addresses = addresses.len(), "Reference accepted");
        Ok(())
    }
}

#[track_caller]
fn rejected(reason: impl Into<String>) -> AssetError {
    AssetError::new(AssetErrorKind::RejectedReference(reason.into()))
}
