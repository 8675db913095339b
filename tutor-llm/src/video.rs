//! Video Lookup Client: one instructional video per topic via YouTube search.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use tutor_core::config::VideoConfig;
use tutor_core::error::classify_video_failure;
use tutor_core::session::VideoKey;
use tutor_core::{ServiceError, SessionContext, VideoReference};

use crate::error::{body_failure, transport_failure};

/// Fallback reason when an error body carries nothing usable.
const GENERIC_ERROR: &str = "YouTube API error";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    id: Option<ItemId>,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

/// The search query sent for `topic`.
#[must_use]
pub fn search_query(topic: &str, strict: bool) -> String {
    let mut query = format!("{} tutorial", topic.trim());
    if strict {
        query.push_str(" educational");
    }
    query
}

/// Reason text from a YouTube error body: first `errors[].reason`, else
/// `message`, else a generic marker.
#[must_use]
pub fn error_reason(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .error
                .errors
                .into_iter()
                .find_map(|d| d.reason.filter(|r| !r.trim().is_empty()))
                .or(parsed.error.message.filter(|m| !m.trim().is_empty()))
        })
        .unwrap_or_else(|| GENERIC_ERROR.to_string())
}

/// Interpret a search response.
///
/// # Errors
/// Non-2xx statuses are classified from the error reason; an unreadable 2xx
/// body is `UnknownProvider`.
pub fn interpret_search_response(
    status: u16,
    body: &str,
) -> Result<Option<VideoReference>, ServiceError> {
    if !(200..300).contains(&status) {
        return Err(classify_video_failure(&error_reason(body)));
    }

    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|e| ServiceError::UnknownProvider(format!("unreadable search response: {e}")))?;

    let Some(first) = parsed.items.into_iter().next() else {
        return Ok(None);
    };
    let Some(video_id) = first
        .id
        .and_then(|id| id.video_id)
        .filter(|id| !id.trim().is_empty())
    else {
        return Ok(None);
    };
    let title = first.snippet.and_then(|s| s.title).unwrap_or_default();
    Ok(Some(VideoReference::youtube(video_id, title)))
}

/// Looks up a video through the YouTube Data API `search` endpoint.
pub struct VideoLookup {
    http: Client,
    config: VideoConfig,
}

impl VideoLookup {
    /// Create a client.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be built.
    pub fn new(config: &VideoConfig) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ServiceError::Config(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Whether lookups are enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Find one video for `topic`.
    ///
    /// Without a credential (absent or blank) this returns `Ok(None)` and
    /// makes no request. Outcomes, including "nothing found", are cached per
    /// session for the cache TTL.
    ///
    /// # Errors
    /// Quota, auth, network and provider failures, classified.
    pub async fn find(
        &self,
        ctx: &SessionContext,
        topic: &str,
        credential: Option<&str>,
    ) -> Result<Option<Arc<VideoReference>>, ServiceError> {
        let Some(credential) = credential.map(str::trim).filter(|c| !c.is_empty()) else {
            debug!("No video credential; skipping lookup");
            return Ok(None);
        };

        let key = VideoKey::new(topic, credential);
        let topic = key.topic.clone();
        ctx.video_cache()
            .get_or_try_init(key, move || async move {
                let found = self.search(&topic, credential).await?;
                Ok(found.map(Arc::new))
            })
            .await
    }

    async fn search(
        &self,
        topic: &str,
        credential: &str,
    ) -> Result<Option<VideoReference>, ServiceError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let query = search_query(topic, self.config.strict);
        let mut params = vec![
            ("part", "snippet"),
            ("q", query.as_str()),
            ("type", "video"),
            ("maxResults", "1"),
            ("key", credential),
        ];
        if self.config.strict {
            params.push(("safeSearch", "strict"));
        }

        debug!(topic = %topic, strict = self.config.strict, "Searching for a video");

        let response = self.http.get(&url).query(&params).send().await.map_err(|e| {
            warn!(error = %e, "Video search request failed");
            transport_failure(&e)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            warn!(error = %e, "Video search response could not be read");
            body_failure(&e, |e| {
                ServiceError::UnknownProvider(format!("unreadable search response: {e}"))
            })
        })?;

        match interpret_search_response(status, &body) {
            Ok(Some(video)) => {
                info!(topic = %topic, video_id = %video.video_id, "Video found");
                Ok(Some(video))
            }
            Ok(None) => {
                info!(topic = %topic, "No video found");
                Ok(None)
            }
            Err(err) => {
                warn!(topic = %topic, status, kind = %err.kind(), "Video search failed");
                Err(err)
            }
        }
    }
}
