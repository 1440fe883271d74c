mod shoptag;

pub use shoptag::ShopTagService;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Listing text generated for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    pub description: String,
    /// Keywords in the order the service ranked them.
    pub keywords: Vec<String>,
}

/// Decoded outcome of a single tagging call.
///
/// The service reports per-image problems (unsupported format, quota, ...)
/// in-band through its `error` field; those become [`TagResponse::Failure`].
/// Transport problems never reach this type, they are returned as `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum TagResponse {
    Success(Listing),
    Failure { message: String },
}

/// Trait for remote tagging backends.
///
/// The crate ships with [`ShopTagService`]. Tests substitute their own
/// implementation to drive the pipeline without network access.
///
/// # Example
///
/// ```rust,no_run
/// use shoptag_listings::config::ApiConfig;
/// use shoptag_listings::tagging::{ShopTagService, TagResponse, TaggingService};
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let service = ShopTagService::new("my-token".into(), ApiConfig::default())?;
/// match service.tag(Path::new("shoe.jpg"), "image/jpeg").await? {
///     TagResponse::Success(listing) => println!("Title: {}", listing.title),
///     TagResponse::Failure { message } => eprintln!("Rejected: {message}"),
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait TaggingService: Send + Sync {
    /// The display name of this service (e.g., "ShopTag").
    fn name(&self) -> &str;
    /// Upload one image and decode the service's answer.
    ///
    /// * `path` — The image file to upload
    /// * `mime_type` — The MIME type of the image (e.g., `"image/png"`)
    async fn tag(&self, path: &Path, mime_type: &str) -> Result<TagResponse>;
}

/// Response envelope as it appears on the wire.
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// Decode a ShopTag response body into a [`TagResponse`].
///
/// A non-null `error` wins over anything in `data`. With no error, `data`
/// must carry `title`, `description` and `keywords`; any other shape is
/// rejected with an error naming what is missing.
pub fn parse_response(text: &str) -> Result<TagResponse> {
    log::debug!("Raw tagging response:\n{text}");

    let wire: WireResponse =
        serde_json::from_str(text).context("Tagging response is not a JSON object")?;

    if let Some(error) = wire.error {
        return Ok(TagResponse::Failure {
            message: error_message(&error),
        });
    }

    let data = wire
        .data
        .context("Tagging response has neither an error nor a data object")?;
    let listing: Listing =
        serde_json::from_value(data).context("Malformed data object in tagging response")?;

    Ok(TagResponse::Success(listing))
}

/// Render an error value for the console: strings verbatim, anything else as JSON.
fn error_message(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
