//! Snapshot of the report region as a raster image.
//!
//! There is no font stack here: words are drawn as solid bars sized by
//! their character count, numbers use the 3x5 digit font. The layout is
//! painted twice, once to measure the height and once into the buffer.

use async_trait::async_trait;

use super::capability::Capability;
use super::raster::{Raster, Rgb};
use super::region::{RenderMode, ReportRegion};
use crate::error::ExportError;
use crate::report::{ReportView, Section, Span, SCORE_DOMAIN};

/// Report width in pixels at scale 1.
pub const BASE_WIDTH: u32 = 600;
pub const MAX_SCALE: u32 = 8;

const MARGIN: i64 = 24;
const GAP: i64 = 12;
const PAD: i64 = 12;
const GLYPH: i64 = 5;
const LINE: i64 = 14;
const TEXT_HEIGHT: i64 = 6;
const WORD_GAP: i64 = 4;
const TILE_COLUMNS: i64 = 4;
const RADAR_RADIUS: i64 = 130;
const BAR_LABEL: i64 = 170;

#[async_trait]
pub trait Rasterizer: Capability {
    /// Capture `region` as drawn in its current mode at `scale` times
    /// the base width.
    async fn snapshot(&self, region: &ReportRegion, scale: u32) -> Result<Raster, ExportError>;
}

/// Colours for one render mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub panel: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub accent: Rgb,
    pub primary: Rgb,
    pub bar: Rgb,
    pub highlight: Rgb,
    pub grid: Rgb,
    pub radar_fill: Rgb,
}

impl Palette {
    pub fn for_mode(mode: RenderMode) -> Self {
        match mode {
            // on-screen panels are translucent; these are the blended values
            RenderMode::Screen => Palette {
                background: Rgb::hex(0x0f172a),
                panel: Rgb::hex(0x1b2436),
                text: Rgb::hex(0xcbd5e1),
                muted: Rgb::hex(0x64748b),
                accent: Rgb::hex(0x22d3ee),
                primary: Rgb::hex(0x60a5fa),
                bar: Rgb::hex(0x3b82f6),
                highlight: Rgb::hex(0x67e8f9),
                grid: Rgb::hex(0x334155),
                radar_fill: Rgb::hex(0x0c475d),
            },
            RenderMode::Print => Palette {
                background: Rgb::hex(0x0f172a),
                panel: Rgb::hex(0x1e293b),
                text: Rgb::hex(0xe2e8f0),
                muted: Rgb::hex(0x94a3b8),
                accent: Rgb::hex(0x22d3ee),
                primary: Rgb::hex(0x60a5fa),
                bar: Rgb::hex(0x3b82f6),
                highlight: Rgb::hex(0x67e8f9),
                grid: Rgb::hex(0x475569),
                radar_fill: Rgb::hex(0x06b6d4),
            },
        }
    }
}

/// Built-in renderer for the results dashboard. Always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRasterizer;

impl Capability for ChartRasterizer {
    fn name(&self) -> &str {
        "chart-renderer"
    }

    fn is_ready(&self) -> bool {
        true
    }
}

#[async_trait]
impl Rasterizer for ChartRasterizer {
    async fn snapshot(&self, region: &ReportRegion, scale: u32) -> Result<Raster, ExportError> {
        if scale == 0 || scale > MAX_SCALE {
            return Err(ExportError::Rasterize(format!(
                "unsupported scale {scale} (expected 1..={MAX_SCALE})"
            )));
        }
        let palette = Palette::for_mode(region.mode());
        Ok(render(region.view(), scale, palette))
    }
}

/// Draw `view` at `scale` into a new raster.
pub fn render(view: &ReportView, scale: u32, palette: Palette) -> Raster {
    let width = i64::from(BASE_WIDTH * scale);

    let mut measure = Painter {
        target: None,
        palette,
        scale: i64::from(scale),
        width,
    };
    let height = paint(view, &mut measure);

    let mut raster = Raster::new(width as u32, height as u32, palette.background);
    let mut painter = Painter {
        target: Some(&mut raster),
        palette,
        scale: i64::from(scale),
        width,
    };
    paint(view, &mut painter);
    raster
}

struct Word {
    chars: i64,
    color: Rgb,
}

fn words(text: &str, color: Rgb) -> Vec<Word> {
    text.split_whitespace()
        .map(|w| Word {
            chars: w.chars().count() as i64,
            color,
        })
        .collect()
}

fn span_words(spans: &[Span], plain: Rgb, emphasis: Rgb) -> Vec<Word> {
    spans
        .iter()
        .flat_map(|s| words(&s.text, if s.emphasis { emphasis } else { plain }))
        .collect()
}

fn first_line(label: &str) -> &str {
    label.split('\n').next().unwrap_or(label)
}

/// Drawing surface that does nothing but track geometry when measuring.
struct Painter<'a> {
    target: Option<&'a mut Raster>,
    palette: Palette,
    scale: i64,
    width: i64,
}

impl Painter<'_> {
    fn u(&self, n: i64) -> i64 {
        n * self.scale
    }

    fn rect(&mut self, x: i64, y: i64, w: i64, h: i64, color: Rgb) {
        if let Some(r) = self.target.as_deref_mut() {
            r.fill_rect(x, y, w, h, color);
        }
    }

    fn line(&mut self, from: (i64, i64), to: (i64, i64), thickness: i64, color: Rgb) {
        if let Some(r) = self.target.as_deref_mut() {
            r.line(from, to, thickness, color);
        }
    }

    fn polygon(&mut self, points: &[(f64, f64)], fill: Rgb, stroke: Rgb, thickness: i64) {
        if let Some(r) = self.target.as_deref_mut() {
            r.fill_polygon(points, fill);
            r.stroke_polygon(points, thickness, stroke);
        }
    }

    fn outline(&mut self, points: &[(f64, f64)], thickness: i64, color: Rgb) {
        if let Some(r) = self.target.as_deref_mut() {
            r.stroke_polygon(points, thickness, color);
        }
    }

    /// Returns the drawn width.
    fn number(&mut self, x: i64, y: i64, value: u32, cell: i64, color: Rgb) -> i64 {
        match self.target.as_deref_mut() {
            Some(r) => r.draw_number(x, y, value, cell, color),
            None => value.to_string().len() as i64 * 4 * cell - cell,
        }
    }

    /// Wrapped words starting at `y`; returns the bottom of the last line.
    fn text(&mut self, x: i64, y: i64, max_width: i64, words: &[Word]) -> i64 {
        if words.is_empty() {
            return y;
        }
        let line = self.u(LINE);
        let bar = self.u(TEXT_HEIGHT);
        let (mut cx, mut cy) = (x, y);
        for word in words {
            let w = (word.chars * self.u(GLYPH)).min(max_width);
            if cx > x && cx + w > x + max_width {
                cx = x;
                cy += line;
            }
            self.rect(cx, cy + (line - bar) / 2, w, bar, word.color);
            cx += w + self.u(WORD_GAP);
        }
        cy + line
    }

    /// Panel background sized to whatever `content` draws.
    fn panel(&mut self, x: i64, y: i64, w: i64, content: impl Fn(&mut Self, i64) -> i64) -> i64 {
        let pad = self.u(PAD);
        let target = self.target.take();
        let bottom = content(self, y + pad);
        self.target = target;

        let height = bottom + pad - y;
        let color = self.palette.panel;
        self.rect(x, y, w, height, color);
        content(self, y + pad);
        y + height
    }
}

fn paint(view: &ReportView, p: &mut Painter<'_>) -> i64 {
    let left = p.u(MARGIN);
    let inner = p.width - 2 * left;
    let gap = p.u(GAP);

    let mut y = p.u(MARGIN);
    y = title_bar(view, p, left, y, inner) + gap;
    y = overall_panel(view, p, left, y, inner) + gap;
    y = score_tiles(view, p, left, y, inner) + gap;
    y = radar_panel(view, p, left, y, inner) + gap;
    y = bar_panel(view, p, left, y, inner);
    for section in &view.sections {
        y = section_panel(section, p, left, y + gap, inner);
    }
    y + p.u(MARGIN)
}

fn title_bar(view: &ReportView, p: &mut Painter<'_>, x: i64, y: i64, w: i64) -> i64 {
    let accent = p.palette.accent;
    p.rect(x, y, p.u(48), p.u(4), accent);
    let text = p.palette.text;
    p.text(x, y + p.u(8), w, &words(view.title(), text))
}

fn overall_panel(view: &ReportView, p: &mut Painter<'_>, x: i64, y: i64, w: i64) -> i64 {
    p.panel(x, y, w, |p, top| {
        let cx = x + p.u(PAD);
        let cw = w - 2 * p.u(PAD);
        let pal = p.palette;
        let big = p.u(8);
        let small = p.u(3);

        let drawn = p.number(cx, top, u32::from(view.overall), big, pal.accent);
        p.number(
            cx + drawn + p.u(8),
            top + 5 * big - 5 * small,
            u32::from(SCORE_DOMAIN.1),
            small,
            pal.muted,
        );
        let mut y = top + 5 * big + p.u(12);

        let gauge = p.u(8);
        p.rect(cx, y, cw, gauge, pal.grid);
        let filled = cw * i64::from(view.overall.min(SCORE_DOMAIN.1)) / i64::from(SCORE_DOMAIN.1);
        p.rect(cx, y, filled, gauge, pal.primary);
        y += gauge + p.u(12);

        y = p.text(cx, y, cw, &words(&view.persona.name, pal.highlight));
        p.text(cx, y + p.u(4), cw, &words(&view.persona.description, pal.muted))
    })
}

fn score_tiles(view: &ReportView, p: &mut Painter<'_>, x: i64, y: i64, w: i64) -> i64 {
    let gap = p.u(GAP);
    let tile_w = (w - (TILE_COLUMNS - 1) * gap) / TILE_COLUMNS;
    let mut bottom = y;
    for (row, tiles) in view.tiles.chunks(TILE_COLUMNS as usize).enumerate() {
        let top = if row == 0 { y } else { bottom + gap };
        let mut row_bottom = top;
        for (col, tile) in tiles.iter().enumerate() {
            let tx = x + col as i64 * (tile_w + gap);
            let end = p.panel(tx, top, tile_w, |p, inner_top| {
                let cx = tx + p.u(PAD);
                let cw = tile_w - 2 * p.u(PAD);
                let muted = p.palette.muted;
                let accent = p.palette.accent;
                let y = p.text(cx, inner_top, cw, &words(first_line(&tile.label), muted));
                let cell = p.u(4);
                p.number(cx, y + p.u(6), u32::from(tile.score), cell, accent);
                y + p.u(6) + 5 * cell
            });
            row_bottom = row_bottom.max(end);
        }
        bottom = row_bottom;
    }
    bottom
}

fn radar_panel(view: &ReportView, p: &mut Painter<'_>, x: i64, y: i64, w: i64) -> i64 {
    p.panel(x, y, w, |p, top| {
        let pal = p.palette;
        let cx = x + p.u(PAD);
        let cw = w - 2 * p.u(PAD);
        let header = p.text(cx, top, cw, &words("Competency radar", pal.text));

        let radius = p.u(RADAR_RADIUS);
        let label_room = p.u(24);
        let centre = ((x + w / 2) as f64, (header + label_room + radius) as f64);
        let axes = &view.radar.axes;
        let n = axes.len();
        let (lo, hi) = view.radar.domain;
        let span = f64::from(hi.saturating_sub(lo).max(1));

        let point = |i: usize, fraction: f64| -> (f64, f64) {
            let angle = -std::f64::consts::FRAC_PI_2 + std::f64::consts::TAU * i as f64 / n as f64;
            (
                centre.0 + angle.cos() * radius as f64 * fraction,
                centre.1 + angle.sin() * radius as f64 * fraction,
            )
        };
        let to_px = |(px, py): (f64, f64)| (px.round() as i64, py.round() as i64);

        if n > 0 {
            let thin = p.scale;
            for tick in view.radar.ticks().into_iter().skip(1) {
                let fraction = f64::from(tick.saturating_sub(lo)) / span;
                let ring: Vec<(f64, f64)> = (0..n).map(|i| point(i, fraction)).collect();
                p.outline(&ring, thin, pal.grid);
            }
            for i in 0..n {
                p.line(to_px(centre), to_px(point(i, 1.0)), thin, pal.grid);
            }

            let shape: Vec<(f64, f64)> = axes
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    let fraction = f64::from(a.score.clamp(lo, hi) - lo) / span;
                    point(i, fraction)
                })
                .collect();
            p.polygon(&shape, pal.radar_fill, pal.accent, 2 * p.scale);
            let dot = p.u(4);
            for vertex in &shape {
                let (vx, vy) = to_px(*vertex);
                p.rect(vx - dot / 2, vy - dot / 2, dot, dot, pal.accent);
            }

            for (i, axis) in axes.iter().enumerate() {
                let reach = 1.0 + label_room as f64 / 2.0 / radius as f64;
                let (lx, ly) = to_px(point(i, reach));
                let label = first_line(&axis.label);
                let width = (label.chars().count() as i64 * p.u(GLYPH)).min(cw);
                let lx = (lx - width / 2).clamp(cx, cx + cw - width);
                p.text(lx, ly - p.u(LINE) / 2, width, &words(label, pal.muted));
            }
        }
        header + 2 * (label_room + radius)
    })
}

fn bar_panel(view: &ReportView, p: &mut Painter<'_>, x: i64, y: i64, w: i64) -> i64 {
    p.panel(x, y, w, |p, top| {
        let pal = p.palette;
        let cx = x + p.u(PAD);
        let cw = w - 2 * p.u(PAD);
        let mut y = p.text(cx, top, cw, &words("Focus areas", pal.text)) + p.u(6);

        let label_w = p.u(BAR_LABEL);
        let track_x = cx + label_w;
        let track_w = cw - label_w - p.u(36);
        let track_h = p.u(8);
        let max = i64::from(SCORE_DOMAIN.1);

        for tile in &view.ranked {
            let label = tile.label.replace('\n', " ");
            let label_bottom = p.text(cx, y, label_w - p.u(8), &words(&label, pal.muted));
            let bar_y = y + (p.u(LINE) - track_h) / 2;
            p.rect(track_x, bar_y, track_w, track_h, pal.grid);
            p.rect(
                track_x,
                bar_y,
                track_w * i64::from(tile.score.min(SCORE_DOMAIN.1)) / max,
                track_h,
                pal.bar,
            );
            p.number(track_x + track_w + p.u(8), bar_y - p.scale, u32::from(tile.score), 2 * p.scale, pal.text);
            y = label_bottom.max(y + p.u(LINE)) + p.u(6);
        }

        for tick in view.radar.ticks() {
            let tx = track_x + track_w * i64::from(tick) / max;
            p.rect(tx, y, p.scale, p.u(4), pal.grid);
        }
        y + p.u(4)
    })
}

fn section_panel(section: &Section, p: &mut Painter<'_>, x: i64, y: i64, w: i64) -> i64 {
    p.panel(x, y, w, |p, top| {
        let pal = p.palette;
        let cx = x + p.u(PAD);
        let cw = w - 2 * p.u(PAD);
        let marker = p.u(8);
        p.rect(cx, top + (p.u(LINE) - marker) / 2, marker, marker, pal.accent);
        let mut y = p.text(cx + marker + p.u(6), top, cw - marker - p.u(6), &words(&section.title, pal.text));

        let indent = p.u(14);
        let bullet = p.u(4);
        for item in &section.items {
            y += p.u(6);
            p.rect(cx, y + (p.u(LINE) - bullet) / 2, bullet, bullet, pal.accent);
            let item_words = span_words(item, pal.text, pal.highlight);
            y = p.text(cx + indent, y, cw - indent, &item_words).max(y + p.u(LINE));
        }
        y
    })
}
