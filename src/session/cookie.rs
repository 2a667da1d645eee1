//! Cookie transport.
//!
//! Reads session cookies from request headers and renders `Set-Cookie`
//! headers from [`SessionOptions`].

use ::cookie::time::{Duration, OffsetDateTime};
use ::cookie::{Cookie, CookieBuilder};
use axum::http::{header, HeaderMap, HeaderValue};

use crate::error::{Result, SessionError};
use crate::session::SessionOptions;

/// Returns the value of the first cookie called `name` in the request headers.
pub fn read(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(|parsed| parsed.ok())
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

/// Builds a cookie mirroring `options`.
///
/// Positive max-age sets both `Max-Age` and `Expires`. Negative max-age
/// expires the cookie immediately. Zero leaves a browser-session cookie.
/// Fails when the expiry date cannot be represented.
pub fn build(name: &str, value: &str, options: &SessionOptions) -> Result<Cookie<'static>> {
    let mut builder = base(name, value, options);

    if options.max_age > 0 {
        let max_age = Duration::seconds(options.max_age);
        let expires = OffsetDateTime::now_utc()
            .checked_add(max_age)
            .ok_or_else(|| {
                SessionError::Header(format!("max-age {} is out of range", options.max_age))
            })?;
        builder = builder.max_age(max_age).expires(expires);
    } else if options.max_age < 0 {
        builder = expire_now(builder);
    }

    Ok(builder.build())
}

/// Builds a cookie that deletes `name` in the browser.
pub fn expired(name: &str, options: &SessionOptions) -> Cookie<'static> {
    expire_now(base(name, "", options)).build()
}

/// Renders `cookie` as a `Set-Cookie` header value.
pub fn header_value(cookie: &Cookie<'_>) -> Result<HeaderValue> {
    HeaderValue::from_str(&cookie.to_string()).map_err(|e| SessionError::Header(e.to_string()))
}

/// Appends `cookie` to the response as a `Set-Cookie` header.
pub fn set(response: &mut HeaderMap, cookie: &Cookie<'_>) -> Result<()> {
    response.append(header::SET_COOKIE, header_value(cookie)?);
    Ok(())
}

fn base(name: &str, value: &str, options: &SessionOptions) -> CookieBuilder<'static> {
    let mut builder = Cookie::build((name.to_string(), value.to_string()))
        .path(options.path.clone())
        .secure(options.secure)
        .http_only(options.http_only);

    if let Some(domain) = &options.domain {
        builder = builder.domain(domain.clone());
    }
    if let Some(same_site) = options.same_site {
        builder = builder.same_site(same_site);
    }
    builder
}

fn expire_now(builder: CookieBuilder<'static>) -> CookieBuilder<'static> {
    builder
        .max_age(Duration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
}
