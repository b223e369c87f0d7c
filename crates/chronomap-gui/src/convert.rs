use image::RgbaImage;

/// Convert a composed canvas frame to an egui ColorImage.
pub fn frame_to_color_image(frame: &RgbaImage) -> egui::ColorImage {
    let size = [frame.width() as usize, frame.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw())
}
