//! Programmatic tray and menu icons
//!
//! Icons are drawn pixel by pixel into 16x16 RGBA buffers so the tray works
//! without any icon theme. The application icon can be overridden with a
//! `legion-tray.png` next to the executable.
use crate::setting::{ConservationState, FnLockState, KbdLedState};
use anyhow::{anyhow, Result};
use image::{Rgba, RgbaImage};
use std::f32::consts::PI;
use std::path::PathBuf;

pub const MENU_ICON_SIZE: u32 = 16;
pub const APP_ICON_SIZE: u32 = 32;
const APP_ICON_FILE: &str = "legion-tray.png";

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const DARK_RED: Rgba<u8> = Rgba([128, 0, 0, 255]);
const GREEN: Rgba<u8> = Rgba([0, 200, 0, 255]);
const DARK_GREEN: Rgba<u8> = Rgba([0, 100, 0, 255]);
const YELLOW: Rgba<u8> = Rgba([255, 220, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const GRAY: Rgba<u8> = Rgba([160, 160, 164, 255]);
const LIGHT_GRAY: Rgba<u8> = Rgba([192, 192, 192, 255]);
const DARK_GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// Icon selector for one menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Conservation(ConservationState),
    FnLock(FnLockState),
    KbdLed(KbdLedState),
    Refresh,
    Exit,
}

/// 3x5 glyphs, one row per entry, high bit on the left
fn glyph(c: char) -> [u8; 5] {
    match c {
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'n' => [0b000, 0b110, 0b101, 0b101, 0b101],
        _ => [0; 5],
    }
}

fn put(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn fill_rect(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
    for py in y..y + h {
        for px in x..x + w {
            put(img, px, py, color);
        }
    }
}

fn stroke_rect(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
    for px in x..=x + w {
        put(img, px, y, color);
        put(img, px, y + h, color);
    }
    for py in y..=y + h {
        put(img, x, py, color);
        put(img, x + w, py, color);
    }
}

/// Pixels whose centre falls inside the ellipse bounded by (x, y, w, h)
fn fill_ellipse(img: &mut RgbaImage, x: i32, y: i32, w: i32, h: i32, color: Rgba<u8>) {
    let (cx, cy) = (x as f32 + w as f32 / 2.0, y as f32 + h as f32 / 2.0);
    let (rx, ry) = (w as f32 / 2.0, h as f32 / 2.0);
    for py in y..=y + h {
        for px in x..=x + w {
            let dx = (px as f32 + 0.5 - cx) / rx;
            let dy = (py as f32 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                put(img, px, py, color);
            }
        }
    }
}

/// Circular band of `width` pixels, skipping angles outside `[from, to]`
/// (degrees, counter-clockwise from three o'clock).
fn stroke_arc(
    img: &mut RgbaImage,
    center: (f32, f32),
    radius: f32,
    width: f32,
    from: f32,
    to: f32,
    color: Rgba<u8>,
) {
    for py in 0..img.height() as i32 {
        for px in 0..img.width() as i32 {
            let dx = px as f32 + 0.5 - center.0;
            let dy = center.1 - (py as f32 + 0.5);
            let dist = (dx * dx + dy * dy).sqrt();
            if (dist - radius).abs() > width / 2.0 {
                continue;
            }
            let angle = dy.atan2(dx).rem_euclid(2.0 * PI).to_degrees();
            if angle >= from && angle <= to {
                put(img, px, py, color);
            }
        }
    }
}

fn line(img: &mut RgbaImage, from: (i32, i32), to: (i32, i32), thickness: i32, color: Rgba<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    let offset = (thickness - 1) / 2;
    loop {
        fill_rect(img, x - offset, y - offset, thickness, thickness, color);
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn text(img: &mut RgbaImage, x: i32, y: i32, s: &str, color: Rgba<u8>) {
    for (i, c) in s.chars().enumerate() {
        for (row, bits) in glyph(c).into_iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100 >> col) != 0 {
                    put(img, x + i as i32 * 4 + col, y + row as i32, color);
                }
            }
        }
    }
}

fn battery(img: &mut RgbaImage, enabled: bool) {
    stroke_rect(img, 2, 4, 10, 8, DARK_GRAY);
    stroke_rect(img, 12, 6, 2, 4, DARK_GRAY);
    if enabled {
        fill_rect(img, 3, 5, 9, 7, GREEN);
        text(img, 6, 6, "E", DARK_GREEN);
    } else {
        fill_rect(img, 3, 5, 9, 7, GRAY);
    }
}

fn fn_key(img: &mut RgbaImage, enabled: bool) {
    fill_rect(img, 3, 7, 11, 7, if enabled { YELLOW } else { LIGHT_GRAY });
    stroke_rect(img, 2, 6, 12, 8, DARK_GRAY);
    text(img, 4, 8, "Fn", BLACK);
    if enabled {
        // padlock shackle and stem
        stroke_arc(img, (12.0, 4.0), 2.0, 1.5, 0.0, 360.0, RED);
        line(img, (12, 6), (12, 4), 2, RED);
    }
}

fn keyboard(img: &mut RgbaImage, level: KbdLedState) {
    fill_rect(img, 1, 8, 14, 6, LIGHT_GRAY);
    stroke_rect(img, 1, 8, 14, 6, DARK_GRAY);
    for i in 0..3 {
        stroke_rect(img, 2 + i * 4, 9, 3, 2, DARK_GRAY);
        stroke_rect(img, 2 + i * 4, 11, 3, 2, DARK_GRAY);
    }
    match level {
        KbdLedState::Off => {}
        KbdLedState::Min => fill_ellipse(img, 6, 2, 4, 4, YELLOW),
        KbdLedState::Max => {
            fill_ellipse(img, 3, 1, 3, 3, YELLOW);
            fill_ellipse(img, 6, 2, 4, 4, YELLOW);
            fill_ellipse(img, 10, 1, 3, 3, YELLOW);
        }
    }
}

/// Draw a 16x16 menu icon
pub fn render(kind: IconKind) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(MENU_ICON_SIZE, MENU_ICON_SIZE, TRANSPARENT);
    match kind {
        IconKind::Conservation(state) => battery(&mut img, state == ConservationState::Enabled),
        IconKind::FnLock(state) => fn_key(&mut img, state == FnLockState::Enabled),
        IconKind::KbdLed(level) => keyboard(&mut img, level),
        IconKind::Refresh => {
            stroke_arc(&mut img, (8.0, 8.0), 6.0, 2.0, 30.0, 330.0, BLUE);
            line(&mut img, (12, 3), (14, 2), 2, BLUE);
            line(&mut img, (12, 3), (13, 5), 2, BLUE);
        }
        IconKind::Exit => {
            line(&mut img, (4, 4), (12, 12), 2, RED);
            line(&mut img, (4, 12), (12, 4), 2, RED);
        }
    }
    img
}

/// Red disc with a white "V"
pub fn render_app_icon() -> RgbaImage {
    let mut img = RgbaImage::from_pixel(APP_ICON_SIZE, APP_ICON_SIZE, TRANSPARENT);
    fill_ellipse(&mut img, 2, 2, 28, 28, RED);
    stroke_arc(&mut img, (16.0, 16.0), 14.0, 2.0, 0.0, 360.0, DARK_RED);
    stroke_arc(&mut img, (16.0, 16.0), 12.0, 1.0, 45.0, 135.0, LIGHT_GRAY);
    line(&mut img, (10, 8), (16, 22), 3, WHITE);
    line(&mut img, (16, 22), (22, 8), 3, WHITE);
    img
}

fn app_icon_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    {
        paths.push(dir.join(APP_ICON_FILE));
    }
    paths.push(PathBuf::from(APP_ICON_FILE));
    paths
}

/// Application icon from disk if present, otherwise the drawn one
pub fn app_icon_image() -> RgbaImage {
    for path in app_icon_candidates() {
        if !path.exists() {
            continue;
        }
        match image::open(&path) {
            Ok(img) => {
                tracing::debug!("Loaded app icon from {:?}", path);
                return img
                    .resize_exact(
                        APP_ICON_SIZE,
                        APP_ICON_SIZE,
                        image::imageops::FilterType::Lanczos3,
                    )
                    .to_rgba8();
            }
            Err(e) => tracing::warn!("Ignoring unreadable icon {:?}: {}", path, e),
        }
    }
    render_app_icon()
}

pub fn app_tray_icon() -> Result<tray_icon::Icon> {
    let img = app_icon_image();
    let (w, h) = img.dimensions();
    tray_icon::Icon::from_rgba(img.into_raw(), w, h)
        .map_err(|e| anyhow!("Failed to create tray icon from image: {:?}", e))
}

pub fn menu_icon(kind: IconKind) -> Result<tray_icon::menu::Icon> {
    let img = render(kind);
    let (w, h) = img.dimensions();
    tray_icon::menu::Icon::from_rgba(img.into_raw(), w, h)
        .map_err(|e| anyhow!("Failed to create menu icon {:?}: {:?}", kind, e))
}
