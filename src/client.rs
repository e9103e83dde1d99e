//! Tutor API Client
//!
//! Cache-aware HTTP client for the AI Vision Tutor backend. Chat answers and
//! image analyses are served from the response cache when an identical
//! request was answered recently; every other call goes straight to the
//! backend.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::{multipart, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{content_hash, make_key, CacheStats, CacheStore, DEFAULT_TTL, IMAGE_TTL};
use crate::config::Config;
use crate::error::{RequestError, Result};
use crate::models::{
    AvatarRequest, AvatarResponse, ChatRequest, ChatResponse, FileAnalysisRequest,
    FileAnalysisResponse, HealthResponse, ScreenFrameRequest, ScreenFrameResponse, Upload,
    VisionAnalyzeResponse,
};

/// Cache key operation for chat answers
const CHAT_OPERATION: &str = "chat";

/// Cache key operation for image analyses
const VISION_OPERATION: &str = "vision";

// == Endpoints ==
/// Absolute URLs of the backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub base_url: String,
    pub vision_analyze: String,
    pub chat_respond: String,
    pub chat_file: String,
    pub heygen_avatar: String,
    pub screen_frame: String,
    pub health: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            base_url: base.to_string(),
            vision_analyze: format!("{}/api/vision/analyze", base),
            chat_respond: format!("{}/api/chat/respond", base),
            chat_file: format!("{}/api/chat/respond/file", base),
            heygen_avatar: format!("{}/api/heygen/avatar", base),
            screen_frame: format!("{}/api/screen/frame", base),
            health: format!("{}/api/health", base),
        }
    }
}

/// Arguments fingerprinted for image analysis cache keys
#[derive(Serialize)]
struct VisionKeyArgs<'a> {
    content_hash: &'a str,
    language: &'a str,
}

// == Api Client ==
/// Client for the tutor backend with a shared response cache.
///
/// Cloning is cheap; clones share the HTTP connection pool and the cache.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    endpoints: Arc<Endpoints>,
    cache: Arc<RwLock<CacheStore>>,
    chat_ttl: Duration,
    image_ttl: Duration,
}

impl ApiClient {
    // == Constructors ==
    /// Creates a client for `base_url` with a default HTTP client and cache.
    pub fn new(base_url: &str) -> Self {
        Self::with_parts(Client::new(), base_url, CacheStore::default())
    }

    /// Creates a client from an existing HTTP client and cache store.
    pub fn with_parts(http: Client, base_url: &str, cache: CacheStore) -> Self {
        Self {
            http,
            endpoints: Arc::new(Endpoints::new(base_url)),
            cache: Arc::new(RwLock::new(cache)),
            chat_ttl: DEFAULT_TTL,
            image_ttl: IMAGE_TTL,
        }
    }

    /// Creates a client from configuration.
    ///
    /// Builds the HTTP client with the configured timeout and a cache store
    /// with the configured capacity and default TTL.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        let cache = CacheStore::new(config.max_entries, config.default_ttl());

        Ok(Self::with_parts(http, &config.api_base_url, cache)
            .with_ttls(config.default_ttl(), config.image_ttl()))
    }

    /// Overrides the TTLs used for chat answers and image analyses.
    pub fn with_ttls(mut self, chat_ttl: Duration, image_ttl: Duration) -> Self {
        self.chat_ttl = chat_ttl;
        self.image_ttl = image_ttl;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Shared handle to the response cache.
    pub fn cache(&self) -> Arc<RwLock<CacheStore>> {
        Arc::clone(&self.cache)
    }

    // == Chat ==
    /// Asks the tutor a question.
    ///
    /// Cached by `(message, language, context)` for the chat TTL.
    pub async fn chat(
        &self,
        message: &str,
        language: &str,
        context: Option<&str>,
    ) -> Result<ChatResponse> {
        let request = ChatRequest::new(message, language, context.map(str::to_string));
        let key = make_key(CHAT_OPERATION, &request);

        if let Some(hit) = self.cached::<ChatResponse>(&key).await {
            return Ok(hit);
        }

        let value = self
            .execute(self.http.post(&self.endpoints.chat_respond).json(&request))
            .await?;
        let response: ChatResponse = serde_json::from_value(value.clone())?;

        if response.success {
            self.store(key, value, self.chat_ttl).await;
        }
        Ok(response)
    }

    // == Analyze Image ==
    /// Asks the tutor to explain an image.
    ///
    /// Cached by the SHA-256 of the image bytes and the language, for the
    /// image TTL. Re-encoding an image changes its hash and misses.
    pub async fn analyze_image(
        &self,
        upload: &Upload,
        language: &str,
    ) -> Result<VisionAnalyzeResponse> {
        if let Some(reason) = upload.validate_image() {
            return Err(RequestError::InvalidInput(reason));
        }

        let hash = content_hash(&upload.bytes);
        let key = make_key(
            VISION_OPERATION,
            &VisionKeyArgs {
                content_hash: &hash,
                language,
            },
        );

        if let Some(hit) = self.cached::<VisionAnalyzeResponse>(&key).await {
            return Ok(hit);
        }

        let file_part = multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime_type)
            .map_err(|_| {
                RequestError::InvalidInput(format!("Invalid MIME type: {}", upload.mime_type))
            })?;
        let form = multipart::Form::new()
            .part("file", file_part)
            .text("language", language.to_string());

        let value = self
            .execute(self.http.post(&self.endpoints.vision_analyze).multipart(form))
            .await?;
        let response: VisionAnalyzeResponse = serde_json::from_value(value.clone())?;

        if response.success {
            self.store(key, value, self.image_ttl).await;
        }
        Ok(response)
    }

    // == Analyze File ==
    /// Asks the tutor to read a document. Never cached.
    ///
    /// The file type and size are checked before anything is sent.
    pub async fn analyze_file(&self, upload: &Upload, language: &str) -> Result<FileAnalysisResponse> {
        if let Some(reason) = upload.validate_document() {
            return Err(RequestError::InvalidInput(reason));
        }

        let request = FileAnalysisRequest {
            file: BASE64.encode(&upload.bytes),
            file_name: upload.file_name.clone(),
            file_type: upload.mime_type.clone(),
            language: language.to_string(),
        };

        self.post_json(&self.endpoints.chat_file, &request).await
    }

    // == Generate Avatar ==
    /// Requests a talking-avatar video for `text`. Never cached.
    pub async fn generate_avatar(&self, text: &str, language: &str) -> Result<AvatarResponse> {
        let request = AvatarRequest {
            text: text.to_string(),
            language: language.to_string(),
        };

        self.post_json(&self.endpoints.heygen_avatar, &request).await
    }

    // == Analyze Screen Frame ==
    /// Asks the tutor to explain a captured screen frame. Never cached.
    ///
    /// Accepts raw base64 or a `data:` URL; the prefix is stripped.
    pub async fn analyze_screen_frame(
        &self,
        frame: &str,
        language: &str,
    ) -> Result<ScreenFrameResponse> {
        let request = ScreenFrameRequest {
            frame: strip_data_url_prefix(frame).to_string(),
            language: language.to_string(),
        };

        self.post_json(&self.endpoints.screen_frame, &request).await
    }

    // == Health Check ==
    /// Checks that the backend is up. Never cached.
    pub async fn health_check(&self) -> Result<HealthResponse> {
        let value = self.execute(self.http.get(&self.endpoints.health)).await?;
        Ok(serde_json::from_value(value)?)
    }

    // == Cache Administration ==
    /// Drops every cached response. Returns how many were dropped.
    pub async fn clear_cache(&self) -> usize {
        let mut cache = self.cache.write().await;
        let cleared = cache.len();
        cache.clear();
        cleared
    }

    /// Returns the cache contents and counters.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Drops expired responses. Returns how many were dropped.
    pub async fn clear_expired_cache(&self) -> usize {
        self.cache.write().await.cleanup()
    }

    // == Internals ==
    async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut cache = self.cache.write().await;
        let hit = cache.get_with(key, |value| match serde_json::from_value::<T>(value.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(key, error = %e, "cached response no longer decodes, refetching");
                None
            }
        });

        match hit {
            Some(value) => {
                let ttl_ms = cache
                    .ttl_remaining(key)
                    .map(|ttl| ttl.as_millis() as u64)
                    .unwrap_or(0);
                debug!(key, ttl_ms, "cache hit");
                Some(value)
            }
            None => {
                debug!(key, "cache miss");
                None
            }
        }
    }

    async fn store(&self, key: String, value: Value, ttl: Duration) {
        debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "cache store");
        self.cache.write().await.set(key, value, Some(ttl));
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self.execute(self.http.post(url).json(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Sends a request once and reads its JSON body.
    ///
    /// Non-2xx responses become `RequestError::Api` carrying the body's
    /// `detail` message.
    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "tutor backend unreachable");
            RequestError::Network(e)
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = RequestError::from_status(status.as_u16(), &body);
            warn!(status = status.as_u16(), path = %url, error = %err, "tutor backend error");
            return Err(err);
        }

        debug!(status = status.as_u16(), path = %url, "tutor backend ok");
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Strips a `data:<mime>;base64,` prefix, leaving bare base64.
pub fn strip_data_url_prefix(frame: &str) -> &str {
    frame
        .strip_prefix("data:")
        .and_then(|rest| rest.find(";base64,").map(|idx| &rest[idx + ";base64,".len()..]))
        .unwrap_or(frame)
}
