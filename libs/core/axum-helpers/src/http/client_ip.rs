use axum::{
    extract::ConnectInfo,
    http::{Extensions, HeaderMap},
};
use std::net::{IpAddr, SocketAddr};

/// Client address as seen through a proxy.
///
/// Order: first entry of `X-Forwarded-For`, then `X-Real-IP`, then the peer
/// address. The headers are client-controlled unless a proxy rewrites them;
/// use [`peer_ip`] for anything that must not be spoofed.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> Option<IpAddr> {
    forwarded_ip(headers).or_else(|| peer_ip(extensions))
}

/// Socket peer recorded by `into_make_service_with_connect_info`
pub fn peer_ip(extensions: &Extensions) -> Option<IpAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    header("x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .and_then(|ip| ip.trim().parse().ok())
        .or_else(|| header("x-real-ip").and_then(|ip| ip.trim().parse().ok()))
}
