//! PNG rendering of a card's render model.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use rusttype::{Font, Scale, point};

use crate::card::GRID_SIZE;
use crate::error::{BingoError, Result};
use crate::session::{RenderCell, RenderModel};

const FONT_CANDIDATES: &[&str] = &[
    "Arial", "Helvetica", "DejaVuSans", "LiberationSans", "SegoeUI", "Segoe UI", "NotoSans-Regular", "NotoSans", "Cantarell-Regular"
];

const CELL_PX: u32 = 128;
const PADDING: u32 = 20;
const TITLE_PX: u32 = 48;
const CELL_MARGIN: u32 = 10;

const BACKGROUND: Rgb<u8> = Rgb([245, 245, 245]);
const GRID_LINE: Rgb<u8> = Rgb([30, 30, 30]);
const TEXT: Rgb<u8> = Rgb([20, 20, 20]);
const CENTER_FILL: Rgb<u8> = Rgb([255, 236, 179]);
const MARKED_FILL: Rgb<u8> = Rgb([187, 222, 251]);
const WINNING_FILL: Rgb<u8> = Rgb([129, 199, 132]);

/// Background for a cell: winning beats marked beats center.
pub fn cell_fill(cell: &RenderCell) -> Rgb<u8> {
    if cell.is_winning {
        WINNING_FILL
    } else if cell.marked {
        MARKED_FILL
    } else if cell.is_center {
        CENTER_FILL
    } else {
        BACKGROUND
    }
}

fn font_search_dirs() -> Vec<PathBuf> {
    let home = dirs_next::home_dir();
    let mut dirs = Vec::new();
    if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.extend(home.map(|h| h.join("Library/Fonts")));
    } else if cfg!(target_os = "windows") {
        if let Some(win) = std::env::var_os("WINDIR") {
            dirs.push(PathBuf::from(win).join("Fonts"));
        }
        dirs.push(PathBuf::from("C:/Windows/Fonts"));
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = home {
            dirs.push(home.join(".fonts"));
            dirs.push(home.join(".local/share/fonts"));
        }
    }
    dirs
}

fn font_files(dirs: &[PathBuf]) -> Vec<PathBuf> {
    dirs.iter()
        .filter(|dir| dir.exists())
        .flat_map(|dir| walkdir::WalkDir::new(dir).follow_links(true).into_iter().filter_map(|e| e.ok()))
        .map(walkdir::DirEntry::into_path)
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf"))
        })
        .collect()
}

fn ascii_coverage(font: &Font<'_>) -> usize {
    (32u8..=126).filter(|&ch| font.glyph(ch as char).id().0 != 0).count()
}

/// Font bytes from `BINGO_FONT_PATH`, a known family, or the system font
/// with the widest printable ASCII coverage.
fn load_font_data() -> Result<Vec<u8>> {
    if let Ok(path) = std::env::var("BINGO_FONT_PATH") {
        match fs::read(&path) {
            Ok(bytes) => return Ok(bytes),
            Err(err) => tracing::warn!(%path, %err, "BINGO_FONT_PATH unreadable, searching system fonts"),
        }
    }

    let files = font_files(&font_search_dirs());
    for &candidate in FONT_CANDIDATES {
        let hit = files.iter().find(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.eq_ignore_ascii_case(candidate))
        });
        if let Some(bytes) = hit.and_then(|p| fs::read(p).ok()) {
            return Ok(bytes);
        }
    }

    files
        .iter()
        .filter_map(|path| fs::read(path).ok())
        .filter_map(|bytes| {
            let score = Font::try_from_vec(bytes.clone()).map(|font| ascii_coverage(&font))?;
            Some((score, bytes))
        })
        .max_by_key(|(score, _)| *score)
        .map(|(_, bytes)| bytes)
        .ok_or(BingoError::FontUnavailable)
}

struct TextPainter {
    font: Font<'static>,
    scale: Scale,
    line_height: f32,
}

impl TextPainter {
    fn new(font_data: Vec<u8>, px: f32) -> Result<Self> {
        let font = Font::try_from_vec(font_data).ok_or(BingoError::InvalidFont)?;
        let scale = Scale::uniform(px);
        let v = font.v_metrics(scale);
        let line_height = (v.ascent - v.descent + v.line_gap).ceil();
        Ok(Self { font, scale, line_height })
    }

    fn text_width(&self, text: &str) -> f32 {
        self.font
            .layout(text, self.scale, point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Greedy word wrap into lines no wider than `max_w`.
    fn wrap(&self, text: &str, max_w: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut line = String::new();
        for word in text.split_whitespace() {
            let candidate = if line.is_empty() { word.to_string() } else { format!("{line} {word}") };
            if !line.is_empty() && self.text_width(&candidate) > max_w {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            } else {
                line = candidate;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }

    fn draw_wrapped(&self, img: &mut RgbImage, text: &str, left: u32, top: u32, max_w: u32, max_h: u32) {
        let ascent = self.font.v_metrics(self.scale).ascent;
        let fitting = (max_h as f32 / self.line_height).floor() as usize;
        for (row, line) in self.wrap(text, max_w as f32).iter().take(fitting).enumerate() {
            let baseline = row as f32 * self.line_height + ascent;
            self.draw_line(img, line, left, top, baseline);
        }
    }

    fn draw_line(&self, img: &mut RgbImage, text: &str, left: u32, top: u32, baseline_y: f32) {
        for glyph in self.font.layout(text, self.scale, point(0.0, baseline_y)) {
            let Some(bb) = glyph.pixel_bounding_box() else { continue };
            glyph.draw(|x, y, v| {
                if v < 0.05 { return; }
                let gx = left as i32 + x as i32 + bb.min.x;
                let gy = top as i32 + y as i32 + bb.min.y;
                if gx >= 0 && gy >= 0 && (gx as u32) < img.width() && (gy as u32) < img.height() {
                    let dst = img.get_pixel_mut(gx as u32, gy as u32);
                    for i in 0..3 { dst[i] = ((dst[i] as f32) * (1.0 - v) + (TEXT[i] as f32) * v) as u8; }
                }
            });
        }
    }
}

fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgb<u8>) {
    for y in y0..(y0 + h).min(img.height()) {
        for x in x0..(x0 + w).min(img.width()) {
            img.put_pixel(x, y, color);
        }
    }
}

/// Draw the card into an image: title band, filled cells, grid, text.
pub fn render_board(model: &RenderModel) -> Result<RgbImage> {
    let size = GRID_SIZE as u32;
    let grid_px = size * CELL_PX;
    let grid_top = PADDING + TITLE_PX;
    let img_w = grid_px + PADDING * 2;
    let img_h = grid_top + grid_px + PADDING;

    let mut img = RgbImage::from_pixel(img_w, img_h, BACKGROUND);

    for (index, cell) in model.cells.iter().enumerate() {
        let (row, col) = ((index / GRID_SIZE) as u32, (index % GRID_SIZE) as u32);
        let fill = cell_fill(cell);
        if fill != BACKGROUND {
            fill_rect(&mut img, PADDING + col * CELL_PX, grid_top + row * CELL_PX, CELL_PX, CELL_PX, fill);
        }
    }

    for i in 0..=size {
        let y = grid_top + i * CELL_PX;
        for x in PADDING..=(PADDING + grid_px) { img.put_pixel(x, y, GRID_LINE); }
        let x = PADDING + i * CELL_PX;
        for y in grid_top..=(grid_top + grid_px) { img.put_pixel(x, y, GRID_LINE); }
    }

    let font_data = load_font_data()?;
    let title_painter = TextPainter::new(font_data.clone(), 28.0)?;
    title_painter.draw_wrapped(&mut img, &model.title, PADDING, PADDING, grid_px, TITLE_PX);

    let painter = TextPainter::new(font_data, 18.0)?;
    for (index, cell) in model.cells.iter().enumerate() {
        let (row, col) = ((index / GRID_SIZE) as u32, (index % GRID_SIZE) as u32);
        let x0 = PADDING + col * CELL_PX + CELL_MARGIN;
        let y0 = grid_top + row * CELL_PX + CELL_MARGIN;
        let inner = CELL_PX - 2 * CELL_MARGIN;
        painter.draw_wrapped(&mut img, &cell.content, x0, y0, inner, inner);
    }

    Ok(img)
}

/// Render the card and write it as a PNG.
pub fn render_board_to_png(model: &RenderModel, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let img = render_board(model)?;
    let mut file = File::create(path)?;
    img.write_to(&mut file, image::ImageFormat::Png)?;
    tracing::info!(path = %path.display(), "card written");
    Ok(())
}
