//! Loading of external data (texture images) and built-in geometry.

use std::path::Path;

use anyhow::Context;
use image::{ImageFormat, RgbaImage};

pub mod geometry;

pub use geometry::{CUBE_INDEX_COUNT, CUBE_VERTEX_COUNT, cube_indices, cube_vertices};

/// Reads `file_name` below `root`.
///
/// Native builds read from disk; on the web `root` is the base URL the file
/// is fetched from.
pub async fn load_binary(root: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let base = reqwest::Url::parse(&format!("{}/", root.to_string_lossy()))?;
        let url = base.join(file_name)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = root.join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    };

    Ok(data)
}

/// Loads and decodes an image into tightly packed RGBA8 rows.
///
/// The file extension is used as a format hint; without a known extension
/// the format is guessed from the data.
pub async fn load_texture_image(root: &Path, file_name: &str) -> anyhow::Result<RgbaImage> {
    let data = load_binary(root, file_name).await?;
    let img = match ImageFormat::from_path(file_name) {
        Ok(format) => image::load_from_memory_with_format(&data, format),
        Err(_) => image::load_from_memory(&data),
    }
    .with_context(|| format!("decoding {file_name}"))?;
    Ok(img.to_rgba8())
}
