// SPDX-License-Identifier: GPL-3.0-only

//! Screenshot storage

use crate::errors::{AppError, AppResult};
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Folder under the home directory that receives screenshots
const SCREENSHOT_FOLDER: &str = "vision_calib/screenshots";

/// Default screenshot directory (`~/vision_calib/screenshots`)
pub fn default_screenshot_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SCREENSHOT_FOLDER)
}

/// Timestamped file name for a screenshot
pub fn screenshot_file_name(unix_seconds: i64) -> String {
    format!("Screenshot_{}.png", unix_seconds)
}

/// Write `frame` as PNG into `dir`, creating the directory if needed
pub fn save_screenshot(frame: &RgbImage, dir: &Path) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(screenshot_file_name(chrono::Utc::now().timestamp()));
    frame.save_with_format(&path, image::ImageFormat::Png)?;
    info!(path = %path.display(), "Saved screenshot");
    Ok(path)
}

/// Save off the UI loop
pub async fn save_screenshot_async(frame: Arc<RgbImage>, dir: PathBuf) -> AppResult<PathBuf> {
    tokio::task::spawn_blocking(move || save_screenshot(&frame, &dir))
        .await
        .map_err(|e| AppError::from(format!("Screenshot task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        assert_eq!(screenshot_file_name(1_700_000_000), "Screenshot_1700000000.png");
    }

    #[test]
    fn test_default_dir_ends_with_folder() {
        assert!(default_screenshot_dir().ends_with("vision_calib/screenshots"));
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = std::env::temp_dir()
            .join(format!("vision-calib-test-{}", std::process::id()))
            .join("nested");
        let frame = RgbImage::new(4, 4);

        let path = save_screenshot(&frame, &dir).unwrap();
        assert!(path.exists());
        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (4, 4));

        let _ = std::fs::remove_dir_all(dir.parent().unwrap());
    }

    #[tokio::test]
    async fn test_async_save_reports_storage_error() {
        let blocker = std::env::temp_dir().join(format!("vision-calib-file-{}", std::process::id()));
        std::fs::write(&blocker, b"not a directory").unwrap();

        let result = save_screenshot_async(Arc::new(RgbImage::new(1, 1)), blocker.join("shots")).await;
        assert!(matches!(result, Err(AppError::Storage(_))));

        let _ = std::fs::remove_file(&blocker);
    }
}
