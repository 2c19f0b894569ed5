use actix_web::HttpRequest;

/// Identifier shared by every client whose address cannot be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Extract the client's IP address from the request.
/// `trust_forwarded_headers`: whether to honour X-Forwarded-For / X-Real-IP set by a proxy
pub fn get_client_ip(req: &HttpRequest, trust_forwarded_headers: bool) -> String {
    if trust_forwarded_headers {
        if let Some(ip) = header_value(req, "x-forwarded-for")
            .and_then(|s| s.split(',').next().map(str::trim))
            .filter(|s| !s.is_empty())
        {
            return ip.to_string();
        }
        if let Some(ip) = header_value(req, "x-real-ip").map(str::trim).filter(|s| !s.is_empty()) {
            return ip.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}
