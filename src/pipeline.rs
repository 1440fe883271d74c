use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;
use crate::tagging::{Listing, ShopTagService, TagResponse, TaggingService};

/// Separator used when flattening a keyword list into one CSV cell.
pub const KEYWORD_SEPARATOR: &str = ", ";

/// Image formats accepted by the tagging API.
///
/// Detection is by file-name suffix, case-insensitive, so `SHOE.JPG` and a
/// file literally named `.png` both qualify.
///
/// # Example
///
/// ```rust
/// use shoptag_listings::pipeline::ImageKind;
///
/// assert_eq!(ImageKind::from_file_name("Shoe.JPEG"), Some(ImageKind::Jpeg));
/// assert_eq!(ImageKind::from_file_name("notes.txt"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
}

impl ImageKind {
    /// Determine the image kind from a file name.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            Some(Self::Jpeg)
        } else if lower.ends_with(".png") {
            Some(Self::Png)
        } else if lower.ends_with(".webp") {
            Some(Self::WebP)
        } else {
            None
        }
    }

    /// MIME type attached to the uploaded file part.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }
}

/// One image found by [`collect_images`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub path: PathBuf,
    /// Base name, as written to the `File Name` column.
    pub name: String,
    pub kind: ImageKind,
}

impl ImageFile {
    /// Build an `ImageFile` if the path names a supported image.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().into_owned();
        let kind = ImageKind::from_file_name(&name)?;
        Some(Self { path, name, kind })
    }
}

/// One line of the output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub file_name: String,
    pub title: String,
    pub description: String,
    /// Keywords joined with [`KEYWORD_SEPARATOR`], in service order.
    pub keywords: String,
}

impl ListingRow {
    pub fn new(file_name: &str, listing: Listing) -> Self {
        Self {
            file_name: file_name.to_string(),
            title: listing.title,
            description: listing.description,
            keywords: listing.keywords.join(KEYWORD_SEPARATOR),
        }
    }
}

/// A file that produced no row, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub file_name: String,
    pub error: String,
}

/// Everything a batch produced, in scan order.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub rows: Vec<ListingRow>,
    pub failures: Vec<ItemFailure>,
}

impl BatchReport {
    /// Number of images attempted.
    pub fn total(&self) -> usize {
        self.rows.len() + self.failures.len()
    }
}

/// Collect supported image files directly inside `dir`.
///
/// Subdirectories are not descended into and, like any non-image entry,
/// are skipped without notice. Symlinks are followed. The result is sorted
/// by file name so repeated runs see the same order.
///
/// Fails if `dir` does not exist, is not a directory, or cannot be listed.
///
/// # Example
///
/// ```rust,no_run
/// use shoptag_listings::pipeline::collect_images;
/// use std::path::Path;
///
/// let images = collect_images(Path::new("./products")).unwrap();
/// println!("Found {} images", images.len());
/// ```
pub fn collect_images(dir: &Path) -> Result<Vec<ImageFile>> {
    let metadata = std::fs::metadata(dir)
        .with_context(|| format!("Cannot access input directory {}", dir.display()))?;
    if !metadata.is_dir() {
        anyhow::bail!("Input path is not a directory: {}", dir.display());
    }

    let mut images = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            // Depth 0 is the input directory itself.
            Err(e) if e.depth() == 0 => {
                return Err(e)
                    .with_context(|| format!("Failed to list input directory {}", dir.display()));
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(image) = ImageFile::from_path(entry.into_path()) {
            images.push(image);
        }
    }

    Ok(images)
}

/// Build the ShopTag client from configuration and the caller's token.
///
/// An empty token is rejected up front rather than surfacing as one
/// authorization failure per image.
pub fn build_service(config: &Config, api_token: &str) -> Result<ShopTagService> {
    if api_token.trim().is_empty() {
        anyhow::bail!("API token is empty");
    }
    ShopTagService::new(api_token.to_string(), config.api.clone())
}

/// Tag a single image and turn the answer into a row or an error message.
///
/// API-reported errors and transport failures both come back as the
/// message in `Err`; the caller decides whether to carry on.
pub async fn process_image(
    image: &ImageFile,
    service: &dyn TaggingService,
) -> Result<ListingRow, String> {
    match service.tag(&image.path, image.kind.mime_type()).await {
        Ok(TagResponse::Success(listing)) => Ok(ListingRow::new(&image.name, listing)),
        Ok(TagResponse::Failure { message }) => Err(message),
        Err(e) => Err(format!("{e:#}")),
    }
}

/// Tag every image in order, one request at a time.
///
/// A failing image is logged and recorded in [`BatchReport::failures`];
/// the batch always runs to the end.
///
/// # Example
///
/// ```rust,no_run
/// use shoptag_listings::config::Config;
/// use shoptag_listings::pipeline::{build_service, collect_images, process_images};
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::default();
/// let service = build_service(&config, "my-token")?;
/// let images = collect_images(Path::new("./products"))?;
///
/// let report = process_images(&images, &service).await;
/// println!("{} rows, {} failures", report.rows.len(), report.failures.len());
/// # Ok(())
/// # }
/// ```
pub async fn process_images(images: &[ImageFile], service: &dyn TaggingService) -> BatchReport {
    let mut report = BatchReport::default();

    for image in images {
        log::info!("Processing {}...", image.name);

        match process_image(image, service).await {
            Ok(row) => report.rows.push(row),
            Err(error) => {
                log::error!("Error processing {}: {error}", image.name);
                report.failures.push(ItemFailure {
                    file_name: image.name.clone(),
                    error,
                });
            }
        }
    }

    report
}
