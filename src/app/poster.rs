use std::error::Error;

use image::DynamicImage;

/// Downloads and decodes a movie poster. Turning it into a terminal image
/// protocol happens on the UI thread, which owns the picker.
pub fn download_poster(poster_url: &str) -> Result<DynamicImage, Box<dyn Error + Send + Sync>> {
    let response = reqwest::blocking::get(poster_url)?;

    if !response.status().is_success() {
        return Err(format!("Failed to download poster: status {}", response.status()).into());
    }

    let bytes = response.bytes()?;
    let dyn_img = image::load_from_memory(&bytes)?;

    Ok(dyn_img)
}
