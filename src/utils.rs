use std::{error, fmt};

use actix_web::HttpRequest;

/// Client key shared by every caller whose remote address is unavailable
pub const UNKNOWN_CLIENT_KEY: &str = "unknown";

/// Provide a representation for any type that implements `Error`
pub fn error_chain_fmt(e: &impl error::Error, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{e}\n")?;

    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }

    Ok(())
}

/// Derive the rate limiting key of a request from its remote peer address
pub fn client_key(req: &HttpRequest) -> String {
    req.peer_addr().map_or_else(
        || UNKNOWN_CLIENT_KEY.to_owned(),
        |addr| addr.ip().to_string(),
    )
}
