/// Preview rendering for the staged file
/// Decodes the picked image off the UI thread and downsizes it for display

use iced::widget::image::Handle;

/// Longest edge of the staged-file preview
const PREVIEW_SIZE: u32 = 256;

/// Render a preview of a staged image file
pub async fn render_preview(bytes: Vec<u8>) -> Result<Handle, String> {
    // Spawn blocking task for CPU-bound decoding
    tokio::task::spawn_blocking(move || render_preview_blocking(&bytes))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Blocking version of preview rendering
fn render_preview_blocking(bytes: &[u8]) -> Result<Handle, String> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    // Resize maintaining aspect ratio; small images are left alone
    let preview = if img.width() > PREVIEW_SIZE || img.height() > PREVIEW_SIZE {
        img.thumbnail(PREVIEW_SIZE, PREVIEW_SIZE)
    } else {
        img
    };

    let rgba = preview.to_rgba8();
    let (width, height) = rgba.dimensions();

    log::debug!("📸 Rendered {}x{} preview", width, height);
    Ok(Handle::from_rgba(width, height, rgba.into_raw()))
}
