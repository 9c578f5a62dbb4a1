//! Default transport + builder.
//! Constants (UA, endpoints, timeouts) live in `constants`.

pub mod constants;

use crate::core::transport::{GetRequest, HttpResponse, ResponseCache, Transport};
use crate::core::{YfError, proxy::Proxies};
use constants::USER_AGENT;
use futures::future::BoxFuture;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use url::Url;

/// Settings shared by the direct client and every proxied one.
fn http_builder(
    user_agent: &str,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
) -> reqwest::ClientBuilder {
    let mut httpb = Client::builder().user_agent(user_agent).cookie_store(true);
    if let Some(t) = timeout {
        httpb = httpb.timeout(t);
    }
    if let Some(ct) = connect_timeout {
        httpb = httpb.connect_timeout(ct);
    }
    httpb
}

#[derive(Debug)]
struct CacheEntry {
    response: HttpResponse,
    expires_at: Instant,
}

#[derive(Debug)]
struct CacheStore {
    map: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

impl ResponseCache for CacheStore {
    fn delete_url(&self, url: &str) {
        let prefix = format!("{url}?");
        let mut guard = self.map.write().unwrap_or_else(PoisonError::into_inner);
        guard.retain(|key, _| key != url && !key.starts_with(&prefix));
    }
}

/// Thin `reqwest` wrapper used as the default [`Transport`].
///
/// Cloning is cheap; clones share the response cache and the pool of proxied clients.
#[derive(Debug, Clone)]
pub struct YfClient {
    http: Client,
    user_agent: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    proxied: Arc<Mutex<HashMap<String, Client>>>,
    cache: Option<Arc<CacheStore>>,
}

impl Default for YfClient {
    fn default() -> Self {
        Self::builder().build().expect("default client")
    }
}

impl YfClient {
    /// Create a new builder.
    pub fn builder() -> YfClientBuilder {
        YfClientBuilder::default()
    }

    /// Whether the in-memory response cache is enabled.
    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of responses held by the cache.
    ///
    /// Expired entries are never served but stay counted until the next response is stored,
    /// which drops them.
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |store| {
            store.map.read().unwrap_or_else(PoisonError::into_inner).len()
        })
    }

    fn cache_get(&self, url: &Url) -> Option<HttpResponse> {
        let store = self.cache.as_ref()?;
        let guard = store.map.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = guard.get(url.as_str())
            && Instant::now() <= entry.expires_at
        {
            return Some(entry.response.clone());
        }
        None
    }

    fn cache_put(&self, url: &Url, response: &HttpResponse) {
        let Some(store) = &self.cache else {
            return;
        };
        let now = Instant::now();
        let entry = CacheEntry {
            response: response.clone(),
            expires_at: now + store.default_ttl,
        };
        let mut guard = store.map.write().unwrap_or_else(PoisonError::into_inner);
        guard.retain(|_, e| now <= e.expires_at);
        guard.insert(url.as_str().to_string(), entry);
    }

    /// The client to send through: the shared one, or a lazily-built proxied one.
    fn client_for(&self, proxies: Option<&Proxies>) -> Result<Client, YfError> {
        let Some(addr) = proxies.and_then(|p| p.get("https")) else {
            return Ok(self.http.clone());
        };
        let mut pool = self.proxied.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = pool.get(addr) {
            return Ok(client.clone());
        }
        let client = http_builder(&self.user_agent, self.timeout, self.connect_timeout)
            .proxy(reqwest::Proxy::https(addr.as_str())?)
            .build()?;
        pool.insert(addr.clone(), client.clone());
        Ok(client)
    }

    async fn send_get(&self, req: &GetRequest) -> Result<HttpResponse, YfError> {
        let mut url = Url::parse(&req.url)?;
        if let Some(params) = req.params.as_ref().filter(|p| !p.is_empty()) {
            url.query_pairs_mut().extend_pairs(params);
        }

        if let Some(hit) = self.cache_get(&url) {
            return Ok(hit);
        }

        let http = self.client_for(req.proxies.as_ref())?;
        let mut rb = http.get(url.clone()).timeout(req.timeout);
        for (name, value) in &req.headers {
            rb = rb.header(name.as_str(), value.as_str());
        }
        let resp = rb.send().await?;

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let final_url = resp.url().to_string();
        let body = crate::core::net::get_text(resp, &url).await?;

        let response = HttpResponse {
            status,
            url: final_url,
            headers,
            body,
        };
        if response.is_success() {
            self.cache_put(&url, &response);
        }
        Ok(response)
    }
}

impl Transport for YfClient {
    fn get<'a>(&'a self, req: &'a GetRequest) -> BoxFuture<'a, Result<HttpResponse, YfError>> {
        Box::pin(self.send_get(req))
    }

    fn response_cache(&self) -> Option<&dyn ResponseCache> {
        self.cache.as_deref().map(|store| store as &dyn ResponseCache)
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct YfClientBuilder {
    user_agent: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
}

impl YfClientBuilder {
    /// Override the transport's default User-Agent.
    ///
    /// Headers passed per request still take precedence.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set a global request timeout (overall). Default: none.
    ///
    /// Each [`GetRequest`] carries its own timeout, which overrides this one.
    #[must_use]
    pub const fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub const fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Enable the in-memory response cache with a default TTL.
    /// If not set, caching is disabled and the client exposes no [`ResponseCache`].
    ///
    /// Expired responses are dropped whenever a new one is stored.
    #[must_use]
    pub const fn cache_ttl(mut self, dur: Duration) -> Self {
        self.cache_ttl = Some(dur);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`YfError::Http`] if the underlying `reqwest` client cannot be constructed.
    pub fn build(self) -> Result<YfClient, YfError> {
        let user_agent = self.user_agent.unwrap_or_else(|| USER_AGENT.to_string());

        let http = http_builder(&user_agent, self.timeout, self.connect_timeout).build()?;

        Ok(YfClient {
            http,
            user_agent,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            proxied: Arc::new(Mutex::new(HashMap::new())),
            cache: self.cache_ttl.map(|ttl| {
                Arc::new(CacheStore {
                    map: RwLock::new(HashMap::new()),
                    default_ttl: ttl,
                })
            }),
        })
    }
}
