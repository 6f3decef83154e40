//! Timer text rasterization.
//!
//! Lines are laid out as a block centered on the style's fractional
//! position, each line horizontally centered. Glyph coverage comes from
//! `rusttype`; the optional outline is a round-joined stroke produced by
//! dilating that coverage with a disk, drawn under the fill so it never
//! covers it.

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale, VMetrics};
use runtimer_run_model::style::{clamp_outline_width, clamp_point_size, Color, TimerStyle};

/// One line of timer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayLine {
    /// Prefix such as `"RTA: "`, drawn as part of the line.
    pub label: Option<&'static str>,
    pub text: String,
}

impl OverlayLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            label: None,
            text: text.into(),
        }
    }

    pub fn labeled(label: &'static str, text: impl Into<String>) -> Self {
        Self {
            label: Some(label),
            text: text.into(),
        }
    }

    /// The string actually drawn.
    pub fn display_text(&self) -> String {
        match self.label {
            Some(label) => format!("{label}{}", self.text),
            None => self.text.clone(),
        }
    }
}

/// Where one line lands on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    pub text: String,
    /// Left edge of the pen at the baseline.
    pub origin_x: f32,
    pub baseline_y: f32,
    /// Advance width of the whole line.
    pub width: f32,
}

/// Vertical metrics used for the block: one line is
/// `ascent - descent + line_gap` pixels tall.
fn line_metrics(font: &Font<'static>, scale: Scale) -> (VMetrics, f32) {
    let v = font.v_metrics(scale);
    (v, v.ascent - v.descent + v.line_gap)
}

fn advance_width(font: &Font<'static>, scale: Scale, text: &str) -> f32 {
    font.layout(text, scale, point(0.0, 0.0))
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .fold(0.0, f32::max)
}

/// Compute line positions for a `width` x `height` surface.
pub fn layout_lines(
    width: u32,
    height: u32,
    style: &TimerStyle,
    lines: &[OverlayLine],
) -> Vec<LineLayout> {
    let font = style.typeface.font();
    let scale = Scale::uniform(clamp_point_size(style.point_size));
    let (v, line_height) = line_metrics(font, scale);

    let center_x = width as f32 * style.position_x;
    let center_y = height as f32 * style.position_y;
    let top = center_y - line_height * lines.len() as f32 / 2.0;

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let text = line.display_text();
            let line_width = advance_width(font, scale, &text);
            let line_center = top + line_height * (i as f32 + 0.5);
            LineLayout {
                origin_x: center_x - line_width / 2.0,
                baseline_y: line_center + (v.ascent + v.descent) / 2.0,
                width: line_width,
                text,
            }
        })
        .collect()
}

/// Draw `lines` onto `surface` using `style`.
///
/// Everything is read from `style` on every call; nothing is cached between
/// calls. Sizes outside the editor's limits are clamped, and only text that
/// can reach the surface is rasterized.
pub fn render_overlay(surface: &mut RgbaImage, style: &TimerStyle, lines: &[OverlayLine]) {
    if lines.is_empty() || surface.width() == 0 || surface.height() == 0 {
        return;
    }

    let font = style.typeface.font();
    let scale = Scale::uniform(clamp_point_size(style.point_size));
    let outline_radius = if style.draws_outline() {
        Some(clamp_outline_width(style.outline_width))
    } else {
        None
    };

    for layout in layout_lines(surface.width(), surface.height(), style, lines) {
        let glyphs: Vec<PositionedGlyph<'_>> = font
            .layout(
                &layout.text,
                scale,
                point(layout.origin_x, layout.baseline_y),
            )
            .collect();

        let pad = outline_radius.map(|r| r.ceil() as i32 + 1).unwrap_or(0);
        let clip = Clip::around(surface, pad);
        let Some(mask) = CoverageMask::rasterize(&glyphs, pad, clip) else {
            continue;
        };

        if let Some(radius) = outline_radius {
            let stroke = mask.dilate(radius);
            stroke.blend_onto(surface, style.outline_color);
        }
        mask.blend_onto(surface, style.fill_color);
    }
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clip {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl Clip {
    /// The surface grown by `pad` on every side: the only coverage a stroke
    /// of reach `pad` can carry onto the surface.
    fn around(surface: &RgbaImage, pad: i32) -> Self {
        Self {
            x0: -pad,
            y0: -pad,
            x1: surface.width() as i32 + pad,
            y1: surface.height() as i32 + pad,
        }
    }

    fn intersect(self, other: Clip) -> Option<Clip> {
        let clip = Clip {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        (clip.x0 < clip.x1 && clip.y0 < clip.y1).then_some(clip)
    }

    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Anti-aliased coverage of one line, in surface coordinates offset by
/// `(left, top)`.
#[derive(Debug)]
struct CoverageMask {
    left: i32,
    top: i32,
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl CoverageMask {
    /// Rasterize glyphs into a mask with `pad` spare pixels on every side,
    /// limited to `clip`. Glyphs entirely outside `clip` are never drawn.
    /// Returns `None` when nothing visible falls inside `clip`.
    fn rasterize(glyphs: &[PositionedGlyph<'_>], pad: i32, clip: Clip) -> Option<Self> {
        let text = glyphs
            .iter()
            .filter_map(|g| g.pixel_bounding_box())
            .map(|bb| Clip {
                x0: bb.min.x,
                y0: bb.min.y,
                x1: bb.max.x,
                y1: bb.max.y,
            })
            .filter(|bb| bb.intersect(clip).is_some())
            .reduce(|a, b| Clip {
                x0: a.x0.min(b.x0),
                y0: a.y0.min(b.y0),
                x1: a.x1.max(b.x1),
                y1: a.y1.max(b.y1),
            })?;

        let padded = Clip {
            x0: text.x0 - pad,
            y0: text.y0 - pad,
            x1: text.x1 + pad,
            y1: text.y1 + pad,
        };
        let area = padded.intersect(clip)?;
        let width = (area.x1 - area.x0) as usize;
        let height = (area.y1 - area.y0) as usize;
        let mut mask = Self {
            left: area.x0,
            top: area.y0,
            width,
            height,
            data: vec![0.0; width * height],
        };

        for glyph in glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            let glyph_box = Clip {
                x0: bb.min.x,
                y0: bb.min.y,
                x1: bb.max.x,
                y1: bb.max.y,
            };
            if glyph_box.intersect(area).is_none() {
                continue;
            }
            glyph.draw(|x, y, v| {
                let (sx, sy) = (bb.min.x + x as i32, bb.min.y + y as i32);
                if !area.contains(sx, sy) {
                    return;
                }
                let idx = (sy - mask.top) as usize * mask.width + (sx - mask.left) as usize;
                let cell = &mut mask.data[idx];
                *cell = (*cell + v).min(1.0);
            });
        }
        Some(mask)
    }

    fn at(&self, x: i32, y: i32) -> f32 {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            0.0
        } else {
            self.data[y as usize * self.width + x as usize]
        }
    }

    /// Grayscale dilation by a disk of `radius` pixels with a one pixel soft
    /// edge. A stroke of width `2 * radius` centered on the contour covers
    /// exactly the glyph plus this band, with round joins.
    fn dilate(&self, radius: f32) -> Self {
        let reach = radius.ceil() as i32 + 1;
        let kernel: Vec<(i32, i32, f32)> = (-reach..=reach)
            .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
            .filter_map(|(dx, dy)| {
                let dist = ((dx * dx + dy * dy) as f32).sqrt();
                let weight = (radius + 0.5 - dist).clamp(0.0, 1.0);
                (weight > 0.0).then_some((dx, dy, weight))
            })
            .collect();

        let mut data = vec![0.0; self.data.len()];
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let coverage = kernel
                    .iter()
                    .map(|&(dx, dy, w)| self.at(x + dx, y + dy) * w)
                    .fold(0.0, f32::max);
                data[y as usize * self.width + x as usize] = coverage;
            }
        }

        Self {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
            data,
        }
    }

    fn blend_onto(&self, surface: &mut RgbaImage, color: Color) {
        let (sw, sh) = (surface.width() as i32, surface.height() as i32);
        for my in 0..self.height {
            let y = self.top + my as i32;
            if y < 0 || y >= sh {
                continue;
            }
            for mx in 0..self.width {
                let x = self.left + mx as i32;
                if x < 0 || x >= sw {
                    continue;
                }
                let coverage = self.data[my * self.width + mx];
                if coverage > 0.0 {
                    blend_pixel(surface.get_pixel_mut(x as u32, y as u32), color, coverage);
                }
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` onto a straight-alpha pixel.
fn blend_pixel(dst: &mut Rgba<u8>, color: Color, coverage: f32) {
    let sa = color.a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let src = [color.r, color.g, color.b];
    for c in 0..3 {
        let value = (src[c] as f32 * sa + dst[c] as f32 * da * (1.0 - sa)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
