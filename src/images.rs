//! Best-effort capture of article images.
//!
//! Image capture is advisory: a failed download is logged and the article is
//! kept. Files are written once per filename: articles of a page that share
//! a filename get a single download, and an existing file is left as is.

use crate::error::ImageError;
use crate::models::ExtractedArticle;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, error, info, instrument};

/// Downloads running at the same time for one results page.
const PARALLEL_DOWNLOADS: usize = 4;

/// Destination for article images.
pub trait ImageSink {
    /// Store the image at `url` under `path`.
    async fn save(&self, url: &str, path: &Path) -> Result<(), ImageError>;
}

/// [`ImageSink`] that downloads over HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageSink {
    client: reqwest::Client,
}

impl HttpImageSink {
    pub fn new() -> Result<Self, ImageError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client })
    }
}

impl ImageSink for HttpImageSink {
    #[instrument(level = "debug", skip(self), fields(path = %path.display()))]
    async fn save(&self, url: &str, path: &Path) -> Result<(), ImageError> {
        if fs::try_exists(path).await? {
            debug!("Image already stored; skipping download");
            return Ok(());
        }
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, &bytes).await?;
        Ok(())
    }
}

/// Save the images of `articles` into `dir`, a few at a time.
///
/// Returns how many images were stored. Articles without an image URL or
/// filename are skipped, and only the first article per filename is
/// downloaded, since concurrent writes to one path would race.
#[instrument(level = "info", skip_all, fields(dir = %dir.display()))]
pub async fn capture_images<S: ImageSink>(
    sink: &S,
    dir: &Path,
    articles: &[ExtractedArticle],
) -> usize {
    let jobs: Vec<(&str, PathBuf)> = articles
        .iter()
        .filter_map(|article| {
            let url = article.image_url.as_deref()?;
            let filename = article.record.image_filename.as_deref()?;
            Some((url, dir.join(filename)))
        })
        .unique_by(|(_, path)| path.clone())
        .collect();

    stream::iter(jobs)
        .map(|(url, path)| async move {
            match sink.save(url, &path).await {
                Ok(()) => {
                    info!(path = %path.display(), "Image saved");
                    true
                }
                Err(e) => {
                    error!(%url, path = %path.display(), error = %e, "Failed to save image");
                    false
                }
            }
        })
        .buffer_unordered(PARALLEL_DOWNLOADS)
        .fold(0, |count, saved| async move { count + usize::from(saved) })
        .await
}
