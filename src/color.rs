use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed series colours
// ---------------------------------------------------------------------------

pub const RED_SERIES: Color32 = Color32::from_rgb(0xff, 0x4d, 0x4d);
pub const GREEN_SERIES: Color32 = Color32::from_rgb(0x33, 0xcc, 0x33);
pub const BLUE_SERIES: Color32 = Color32::from_rgb(0x33, 0x99, 0xff);
pub const TOTAL_SERIES: Color32 = Color32::WHITE;
pub const CALIBRATION_POINTS: Color32 = Color32::from_rgb(0xff, 0xa5, 0x00);
pub const FIT_LINE: Color32 = Color32::from_rgb(0x00, 0xcc, 0xff);

// ---------------------------------------------------------------------------
// Wavelength → colour
// ---------------------------------------------------------------------------

/// Approximate display colour of visible light: 400 nm maps to violet,
/// 700 nm to red, with the hue spread evenly in between.
pub fn wavelength_color(nm: u32) -> Color32 {
    let t = ((nm as f32 - 400.0) / 300.0).clamp(0.0, 1.0);
    let hue = (1.0 - t) * 270.0;
    let hsl = Hsl::new(hue, 0.85, 0.5);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
