use std::io::Cursor;

use bytes::Bytes;
use crux_core::capability::{Capability, CapabilityContext, Operation};
use image::{GenericImageView, ImageReader, Limits};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::PhotoDecodeConfig;
use crate::error::ReviewsError;
use crate::model::Photo;

pub const MAX_URL_LENGTH: usize = 2048;

/// Raw photo bytes as delivered by the shell. Fails with `BadUrl` when the
/// URL cannot be requested at all and `BadData` when the transfer fails.
pub type PhotoBytesResult = Result<Bytes, ReviewsError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PhotoOperation {
    Get { url: String },
}

impl Operation for PhotoOperation {
    type Output = PhotoBytesResult;
}

/// Fetches review photos through the shell and decodes them in the core.
pub struct Photos<Ev> {
    context: CapabilityContext<PhotoOperation, Ev>,
}

impl<Ev> Capability<Ev> for Photos<Ev> {
    type Operation = PhotoOperation;
    type MappedSelf<MappedEv> = Photos<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Photos::new(self.context.map_event(f))
    }
}

impl<Ev> Photos<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<PhotoOperation, Ev>) -> Self {
        Self { context }
    }

    /// Requests `url` and decodes the bytes within `config`'s bounds. URLs
    /// that cannot be valid never reach the shell.
    pub fn fetch<F>(&self, url: String, config: PhotoDecodeConfig, callback: F)
    where
        F: FnOnce(Result<Photo, ReviewsError>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let result = match validate_photo_url(&url) {
                Ok(_) => ctx
                    .request_from_shell(PhotoOperation::Get { url })
                    .await
                    .and_then(|bytes| decode_photo(&bytes, &config)),
                Err(e) => Err(e),
            };
            ctx.update_app(callback(result));
        });
    }
}

pub fn validate_photo_url(raw: &str) -> Result<Url, ReviewsError> {
    if raw.trim().is_empty() {
        return Err(ReviewsError::bad_url(raw, "URL cannot be empty"));
    }

    if raw.len() > MAX_URL_LENGTH {
        return Err(ReviewsError::bad_url(
            raw,
            format!("URL exceeds maximum length of {MAX_URL_LENGTH} bytes"),
        ));
    }

    let parsed = Url::parse(raw).map_err(|e| ReviewsError::bad_url(raw, e.to_string()))?;

    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(ReviewsError::bad_url(
            raw,
            format!("invalid scheme '{scheme}', only 'http' and 'https' are allowed"),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(ReviewsError::bad_url(raw, "URL must have a host"));
    }

    Ok(parsed)
}

/// Decodes fetched bytes into a photo, enforcing the configured bounds.
pub fn decode_photo(raw_bytes: &[u8], config: &PhotoDecodeConfig) -> Result<Photo, ReviewsError> {
    if raw_bytes.is_empty() {
        return Err(ReviewsError::BadData("photo bytes empty".into()));
    }

    if raw_bytes.len() > config.max_input_bytes {
        return Err(ReviewsError::BadData(format!(
            "photo too large: {} bytes, max {}",
            raw_bytes.len(),
            config.max_input_bytes
        )));
    }

    let mut reader = ImageReader::new(Cursor::new(raw_bytes))
        .with_guessed_format()
        .map_err(|e| ReviewsError::BadData(e.to_string()))?;

    if reader.format().is_none() {
        return Err(ReviewsError::BadData("unsupported image format".into()));
    }

    let mut limits = Limits::default();
    limits.max_image_width = Some(config.max_dimension);
    limits.max_image_height = Some(config.max_dimension);
    limits.max_alloc = Some(config.max_alloc_bytes);
    reader.limits(limits);

    let img = reader.decode()?;
    let (w, h) = img.dimensions();
    let pixels = u64::from(w) * u64::from(h);

    if pixels > config.max_image_pixels {
        return Err(ReviewsError::BadData(format!(
            "image too large: {w}x{h} = {pixels} pixels, max {}",
            config.max_image_pixels
        )));
    }

    Ok(Photo::new(img))
}
