use poem::http::{StatusCode, header, uri::Scheme};
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};

const DEFAULT_HTTPS_PORT: u16 = 443;

/// Redirects plain-HTTP requests to their HTTPS equivalent.
///
/// Inactive without an HTTPS port: requests then pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpsRedirection {
    https_port: Option<u16>,
}

impl HttpsRedirection {
    pub fn new(https_port: Option<u16>) -> Self {
        Self { https_port }
    }

    pub fn is_active(&self) -> bool {
        self.https_port.is_some()
    }
}

impl<E: Endpoint> Middleware<E> for HttpsRedirection {
    type Output = HttpsRedirectionEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        HttpsRedirectionEndpoint {
            inner: ep,
            https_port: self.https_port,
        }
    }
}

pub struct HttpsRedirectionEndpoint<E> {
    inner: E,
    https_port: Option<u16>,
}

impl<E: Endpoint> Endpoint for HttpsRedirectionEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let Some(https_port) = self.https_port else {
            return self.inner.call(req).await.map(IntoResponse::into_response);
        };

        if is_encrypted(&req) {
            return self.inner.call(req).await.map(IntoResponse::into_response);
        }

        match redirect_location(&req, https_port) {
            Some(location) => {
                tracing::debug!(%location, "Redirecting plain request to HTTPS");
                Ok(Response::builder()
                    .status(StatusCode::TEMPORARY_REDIRECT)
                    .header(header::LOCATION, location)
                    .finish())
            }
            None => Ok(StatusCode::BAD_REQUEST.into_response()),
        }
    }
}

fn is_encrypted(req: &Request) -> bool {
    req.scheme() == &Scheme::HTTPS || req.uri().scheme() == Some(&Scheme::HTTPS)
}

fn redirect_location(req: &Request, https_port: u16) -> Option<String> {
    let host = req
        .header(header::HOST)
        .or_else(|| req.uri().host())
        .filter(|host| !host.is_empty())?;
    let host = strip_port(host);

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Some(if https_port == DEFAULT_HTTPS_PORT {
        format!("https://{host}{path_and_query}")
    } else {
        format!("https://{host}:{https_port}{path_and_query}")
    })
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        host.find(']').map(|end| &host[..=end]).unwrap_or(host)
    } else {
        host.split(':').next().unwrap_or(host)
    }
}
