//! Client address and user agent of a request.

use std::net::IpAddr;

use actix_web::HttpRequest;
use ap_core::domain::value_objects::RequestContext;

const MAX_USER_AGENT_LEN: usize = 255;

/// Build the audit and rate limit context of a request
///
/// `X-Forwarded-For` and `X-Real-IP` are only believed when the direct peer
/// is one of `trusted_proxies`; otherwise the peer address is used.
pub fn request_context(req: &HttpRequest, trusted_proxies: &[String]) -> RequestContext {
    RequestContext::new(extract_client_ip(req, trusted_proxies), extract_user_agent(req))
}

pub fn extract_client_ip(req: &HttpRequest, trusted_proxies: &[String]) -> Option<String> {
    let peer = req.peer_addr().map(|addr| addr.ip());

    let behind_trusted_proxy = peer
        .map(|ip| is_trusted(ip, trusted_proxies))
        .unwrap_or(false);
    if behind_trusted_proxy {
        if let Some(ip) = forwarded_ip(req, trusted_proxies) {
            return Some(ip.to_string());
        }
    }

    peer.map(|ip| ip.to_string())
}

pub fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|h| h.to_str().ok())
        .map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect())
}

fn is_trusted(ip: IpAddr, trusted_proxies: &[String]) -> bool {
    trusted_proxies
        .iter()
        .filter_map(|proxy| proxy.trim().parse::<IpAddr>().ok())
        .any(|proxy| proxy == ip)
}

/// Client address according to the forwarding headers
///
/// Proxies append the peer they saw, so `X-Forwarded-For` is read from the
/// right and the first hop that is not a trusted proxy is the client.
/// Anything left of it was written by the client itself.
fn forwarded_ip(req: &HttpRequest, trusted_proxies: &[String]) -> Option<IpAddr> {
    let headers = req.headers();
    let forwarded_for = headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| first_untrusted_hop(value, trusted_proxies));

    forwarded_for.or_else(|| {
        headers
            .get("X-Real-IP")
            .and_then(|h| h.to_str().ok())
            .and_then(|ip| ip.trim().parse().ok())
    })
}

fn first_untrusted_hop(value: &str, trusted_proxies: &[String]) -> Option<IpAddr> {
    for hop in value.rsplit(',') {
        // An unreadable hop ends the chain of addresses we can vouch for
        let ip: IpAddr = hop.trim().parse().ok()?;
        if !is_trusted(ip, trusted_proxies) {
            return Some(ip);
        }
    }
    None
}
