//! HTTP transport with Send-safe futures on every target.
//!
//! On wasm32, `reqwest`'s response future is not `Send` because it wraps JS
//! types bound to the browser thread. Commands still have to return
//! `Pin<Box<dyn Future<Output = ()> + Send>>`, so the wasm path runs the
//! actual request via `wasm_bindgen_futures::spawn_local` and hands the
//! Send-safe result back over a bounded `flume` channel. The native path
//! talks to reqwest directly.

use std::collections::HashMap;

use thiserror::Error;

/// Transport-level failure: connect, TLS, body read, or request encoding.
#[derive(Debug, Clone, Error)]
#[error("http: {0}")]
pub struct HttpError(pub String);

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Response reduced to Send-safe data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Header map with lowercased keys.
    headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header lookup by name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    #[cfg(test)]
    fn from_parts(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}

/// One outgoing request, built with the verb constructors.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl HttpRequest {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Serialize `value` as the JSON body and set the content type.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> HttpResult<Self> {
        let body =
            serde_json::to_vec(value).map_err(|e| HttpError(format!("encode request body: {e}")))?;
        self.body = Some(body);
        Ok(self.header("content-type", "application/json"))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub async fn send(self) -> HttpResult<HttpResponse> {
        self.execute().await
    }

    #[cfg(target_arch = "wasm32")]
    pub async fn send(self) -> HttpResult<HttpResponse> {
        // The request future is not Send here; run it on the JS thread and
        // bridge the result through a channel, which is.
        let (tx, rx) = flume::bounded::<HttpResult<HttpResponse>>(1);
        wasm_bindgen_futures::spawn_local(async move {
            let result = self.execute().await;
            let _ = tx.send_async(result).await;
        });
        rx.recv_async()
            .await
            .map_err(|_| HttpError("request cancelled".to_owned()))?
    }

    async fn execute(self) -> HttpResult<HttpResponse> {
        let client = reqwest::Client::new();
        let mut request = match self.method {
            Method::Get => client.get(&self.url),
            Method::Post => client.post(&self.url),
            Method::Put => client.put(&self.url),
            Method::Delete => client.delete(&self.url),
        };
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if let Some(body) = self.body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError(e.to_string()))?;

        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), value.to_owned());
            }
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError(e.to_string()))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
