use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING};
use reqwest::redirect::Policy;
use reqwest::Client;

const APP_USER_AGENT: &str = concat!("UnchainedLauncher/", env!("CARGO_PKG_VERSION"));

/// Client for release downloads. HTTPS only; redirects to the release CDN
/// are followed.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
    default_headers.insert(ACCEPT, HeaderValue::from_static("application/octet-stream"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .https_only(true)
        .redirect(Policy::limited(10))
        .build()
}
