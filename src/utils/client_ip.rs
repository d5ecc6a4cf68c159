use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// Visitor address: first `X-Forwarded-For` entry, else the peer socket.
pub fn client_ip(req: &HttpRequest) -> String {
    forwarded_for(req.headers())
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("x-forwarded-for")?.to_str().ok()?;

    value
        .split(',')
        .next()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(String::from)
}
