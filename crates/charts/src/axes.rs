//! A single plotting area: data limits, artists, ticks, labels and legend.
//!
//! Artists are recorded in data coordinates and only projected to SVG
//! units when the owning [`Figure`](crate::Figure) lays the axes out.

use crate::svg::{self, Dash, HAlign, TextStyle, VAlign};
use nexpro_core::palette::{BLACK, WHITE};
use nexpro_core::Color;
use std::fmt::Write as _;

/// Length of tick marks, in points.
const TICK_LEN: f64 = 3.5;
/// Gap between a tick mark and its label, in points.
const TICK_PAD: f64 = 3.5;
/// Default text size for tick labels and legends.
const DEFAULT_FONT: f64 = 10.0;
/// Relative padding added around auto-scaled data limits.
const AUTO_MARGIN: f64 = 0.05;

const GRID_COLOR: Color = Color::rgb(0xB0, 0xB0, 0xB0);
const LEGEND_EDGE: Color = Color::rgb(0xCC, 0xCC, 0xCC);

/// Marker glyphs for lines and scatter points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Diamond,
    Star,
}

/// Which side a y-axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YSide {
    Left,
    Right,
}

/// Legend placement inside the axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLoc {
    UpperLeft,
    UpperRight,
}

/// Axes border lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spine {
    Top,
    Right,
    Left,
    Bottom,
}

/// Swatch drawn next to a legend label.
#[derive(Debug, Clone, PartialEq)]
pub enum Handle {
    Patch {
        color: Color,
        alpha: f64,
    },
    Line {
        color: Color,
        width: f64,
        dash: Dash,
        marker: Option<Marker>,
        alpha: f64,
    },
}

/// One legend row.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub handle: Handle,
}

/// Rounded box drawn behind annotation text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStyle {
    pub fill: Color,
    pub edge: Color,
    pub alpha: f64,
    /// Padding as a fraction of the font size.
    pub pad: f64,
}

impl BoxStyle {
    pub fn new(fill: Color, edge: Color) -> Self {
        Self {
            fill,
            edge,
            alpha: 1.0,
            pad: 0.3,
        }
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

/// A set of bars sharing one style.
#[derive(Debug, Clone)]
pub struct Bars {
    /// `(x0, y0, width, height)` in data coordinates.
    rects: Vec<(f64, f64, f64, f64)>,
    colors: Vec<Color>,
    alpha: f64,
    edge: Option<(Color, f64)>,
    label: Option<String>,
    zorder: f64,
}

impl Bars {
    /// Vertical bars of `width` centred on `xs`, rising from zero.
    pub fn vertical(xs: &[f64], heights: &[f64], width: f64) -> Self {
        let rects = xs
            .iter()
            .zip(heights)
            .map(|(&x, &h)| (x - width / 2.0, 0.0, width, h))
            .collect();
        Self::from_rects(rects)
    }

    /// One horizontal bar centred on `y`, spanning `left..left + length`.
    pub fn horizontal(y: f64, length: f64, left: f64, height: f64) -> Self {
        Self::from_rects(vec![(left, y - height / 2.0, length, height)])
    }

    fn from_rects(rects: Vec<(f64, f64, f64, f64)>) -> Self {
        Self {
            rects,
            colors: vec![BLACK],
            alpha: 1.0,
            edge: None,
            label: None,
            zorder: 1.0,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.colors = vec![color];
        self
    }

    /// One colour per bar, cycled if shorter than the bar count.
    /// An empty slice keeps the current colour.
    pub fn colors(mut self, colors: &[Color]) -> Self {
        if !colors.is_empty() {
            self.colors = colors.to_vec();
        }
        self
    }

    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn edge(mut self, color: Color, width: f64) -> Self {
        self.edge = Some((color, width));
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn zorder(mut self, zorder: f64) -> Self {
        self.zorder = zorder;
        self
    }

    /// Top-centre of each bar, for value annotations.
    pub fn tops(&self) -> Vec<(f64, f64)> {
        self.rects
            .iter()
            .map(|&(x, y, w, h)| (x + w / 2.0, y + h))
            .collect()
    }
}

/// A polyline with optional markers.
#[derive(Debug, Clone)]
pub struct Line {
    points: Vec<(f64, f64)>,
    color: Color,
    width: f64,
    dash: Dash,
    alpha: f64,
    marker: Option<(Marker, f64)>,
    label: Option<String>,
    zorder: f64,
}

impl Line {
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        Self {
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
            color: BLACK,
            width: 1.5,
            dash: Dash::Solid,
            alpha: 1.0,
            marker: None,
            label: None,
            zorder: 2.0,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    pub fn dash(mut self, dash: Dash) -> Self {
        self.dash = dash;
        self
    }

    /// Marker glyph with its diameter in points.
    pub fn marker(mut self, marker: Marker, size: f64) -> Self {
        self.marker = Some((marker, size));
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn zorder(mut self, zorder: f64) -> Self {
        self.zorder = zorder;
        self
    }
}

#[derive(Debug, Clone)]
enum ItemKind {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Color,
        alpha: f64,
        edge: Option<(Color, f64)>,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: Color,
        width: f64,
        dash: Dash,
        alpha: f64,
    },
    Markers {
        points: Vec<(f64, f64)>,
        marker: Marker,
        size: f64,
        color: Color,
        edge: Option<(Color, f64)>,
    },
    Text {
        x: f64,
        y: f64,
        offset: (f64, f64),
        text: String,
        style: TextStyle,
        bbox: Option<BoxStyle>,
    },
    Arrow {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        width: f64,
        dash: Dash,
    },
    HLine {
        y: f64,
        color: Color,
        width: f64,
        dash: Dash,
        alpha: f64,
    },
    VLine {
        x: f64,
        color: Color,
        width: f64,
        dash: Dash,
        alpha: f64,
    },
    VSpan {
        x0: f64,
        x1: f64,
        color: Color,
        alpha: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        w: f64,
        h: f64,
        color: Color,
        alpha: f64,
    },
}

impl ItemKind {
    /// Whether the artist is clipped to the axes box.
    fn clipped(&self) -> bool {
        !matches!(self, ItemKind::Text { .. } | ItemKind::Arrow { .. })
    }

    /// Data-space x and y extents, for auto-scaling.
    fn extents(&self) -> Option<((f64, f64), (f64, f64))> {
        match self {
            ItemKind::Rect { x, y, w, h, .. } => {
                Some(((x.min(x + w), x.max(x + w)), (y.min(y + h), y.max(y + h))))
            }
            ItemKind::Polyline { points, .. } | ItemKind::Markers { points, .. } => {
                bounds(points.iter().copied())
            }
            ItemKind::Ellipse { cx, cy, w, h, .. } => Some((
                (cx - w / 2.0, cx + w / 2.0),
                (cy - h / 2.0, cy + h / 2.0),
            )),
            _ => None,
        }
    }
}

fn bounds(points: impl Iterator<Item = (f64, f64)>) -> Option<((f64, f64), (f64, f64))> {
    points.fold(None, |acc, (x, y)| match acc {
        None => Some(((x, x), (y, y))),
        Some(((x0, x1), (y0, y1))) => Some(((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))),
    })
}

#[derive(Debug, Clone)]
struct Item {
    zorder: f64,
    kind: ItemKind,
}

#[derive(Debug, Clone)]
struct Legend {
    entries: Vec<LegendEntry>,
    loc: LegendLoc,
    size: f64,
    frame_alpha: f64,
}

#[derive(Debug, Clone)]
struct AxisLabel {
    text: String,
    style: TextStyle,
}

#[derive(Debug, Clone)]
struct Title {
    text: String,
    style: TextStyle,
    pad: f64,
}

/// Axes box in SVG units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Projection from data space to SVG units for one axes.
#[derive(Debug, Clone, Copy)]
struct Projection {
    rect: Rect,
    xlim: (f64, f64),
    ylim: (f64, f64),
    invert_y: bool,
}

impl Projection {
    fn x(&self, v: f64) -> f64 {
        let (x0, x1) = self.xlim;
        self.rect.x + (v - x0) / (x1 - x0) * self.rect.w
    }

    fn y(&self, v: f64) -> f64 {
        let (y0, y1) = self.ylim;
        let t = (v - y0) / (y1 - y0);
        if self.invert_y {
            self.rect.y + t * self.rect.h
        } else {
            self.rect.y + self.rect.h - t * self.rect.h
        }
    }

    fn point(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (self.x(x), self.y(y))
    }

    fn contains_x(&self, v: f64) -> bool {
        let (lo, hi) = ordered(self.xlim);
        v >= lo - 1e-9 && v <= hi + 1e-9
    }

    fn contains_y(&self, v: f64) -> bool {
        let (lo, hi) = ordered(self.ylim);
        v >= lo - 1e-9 && v <= hi + 1e-9
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Evenly spaced "round" tick positions covering `lo..=hi`.
///
/// Steps are drawn from 1, 2, 2.5 and 5 times a power of ten, aiming for
/// at most eight intervals.
pub fn nice_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let (lo, hi) = ordered((lo, hi));
    let span = hi - lo;
    if span <= 0.0 || !span.is_finite() {
        return vec![lo];
    }
    let raw = span / 8.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step - 1e-9).ceil() as i64;
    let last = (hi / step + 1e-9).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Format a tick value with just enough decimals for its step.
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = (0..=3)
        .find(|d| {
            let scaled = step * 10f64.powi(*d);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(3) as usize;
    let v = if value.abs() < 1e-12 { 0.0 } else { value };
    format!("{:.*}", decimals, v)
}

/// One plotting area.
#[derive(Debug, Clone)]
pub struct Axes {
    items: Vec<Item>,
    handles: Vec<LegendEntry>,
    xlim: Option<(f64, f64)>,
    ylim: Option<(f64, f64)>,
    invert_y: bool,
    xticks: Option<Vec<(f64, String)>>,
    xtick_size: f64,
    show_yticks: bool,
    xlabel: Option<AxisLabel>,
    ylabel: Option<AxisLabel>,
    title: Option<Title>,
    grid_x: Option<f64>,
    grid_y: Option<f64>,
    spines: [bool; 4],
    axis_on: bool,
    background: Option<Color>,
    side: YSide,
    legend: Option<Legend>,
}

impl Default for Axes {
    fn default() -> Self {
        Self::new()
    }
}

impl Axes {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            handles: Vec::new(),
            xlim: None,
            ylim: None,
            invert_y: false,
            xticks: None,
            xtick_size: DEFAULT_FONT,
            show_yticks: true,
            xlabel: None,
            ylabel: None,
            title: None,
            grid_x: None,
            grid_y: None,
            spines: [true; 4],
            axis_on: true,
            background: None,
            side: YSide::Left,
            legend: None,
        }
    }

    /// A second y-axis on the right sharing this axes' x-limits and box.
    ///
    /// The x-limits are frozen at the time of the call, so add the primary
    /// data first.
    pub fn twin(&self) -> Self {
        let mut twin = Self::new();
        twin.xlim = Some(self.auto_limits().0);
        twin.side = YSide::Right;
        twin
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = Some(color);
    }

    pub fn set_xlim(&mut self, lo: f64, hi: f64) {
        self.xlim = Some((lo, hi));
    }

    pub fn set_ylim(&mut self, lo: f64, hi: f64) {
        self.ylim = Some((lo, hi));
    }

    pub fn invert_yaxis(&mut self) {
        self.invert_y = !self.invert_y;
    }

    /// Fixed x tick positions with their labels.
    pub fn set_xticks<S: AsRef<str>>(&mut self, ticks: &[(f64, S)], size: f64) {
        self.xticks = Some(
            ticks
                .iter()
                .map(|(x, label)| (*x, label.as_ref().to_string()))
                .collect(),
        );
        self.xtick_size = size;
    }

    pub fn hide_yticks(&mut self) {
        self.show_yticks = false;
    }

    pub fn set_xlabel(&mut self, text: impl Into<String>, style: TextStyle) {
        self.xlabel = Some(AxisLabel {
            text: text.into(),
            style,
        });
    }

    pub fn set_ylabel(&mut self, text: impl Into<String>, style: TextStyle) {
        self.ylabel = Some(AxisLabel {
            text: text.into(),
            style,
        });
    }

    /// Title centred above the axes, `pad` points above the top edge.
    pub fn set_title(&mut self, text: impl Into<String>, style: TextStyle, pad: f64) {
        self.title = Some(Title {
            text: text.into(),
            style,
            pad,
        });
    }

    /// Grid lines along the y ticks (`y`) and/or x ticks (`x`).
    pub fn grid(&mut self, x: bool, y: bool, alpha: f64) {
        self.grid_x = x.then_some(alpha);
        self.grid_y = y.then_some(alpha);
    }

    pub fn hide_spines(&mut self, spines: &[Spine]) {
        for spine in spines {
            self.spines[*spine as usize] = false;
        }
    }

    /// Hide spines, ticks, labels, grid and background; the title stays.
    pub fn axis_off(&mut self) {
        self.axis_on = false;
    }

    /// Legend from this axes' own labelled artists.
    pub fn legend(&mut self, loc: LegendLoc, size: f64) {
        let entries = self.handles.clone();
        self.legend_with(entries, loc, size);
    }

    /// Legend from an explicit list of entries, e.g. merged with a twin axes.
    pub fn legend_with(&mut self, entries: Vec<LegendEntry>, loc: LegendLoc, size: f64) {
        self.legend = Some(Legend {
            entries,
            loc,
            size,
            frame_alpha: 0.8,
        });
    }

    pub fn set_legend_frame_alpha(&mut self, alpha: f64) {
        if let Some(legend) = self.legend.as_mut() {
            legend.frame_alpha = alpha;
        }
    }

    /// Labelled artists, in the order they were added.
    pub fn handles(&self) -> Vec<LegendEntry> {
        self.handles.clone()
    }

    fn push(&mut self, zorder: f64, kind: ItemKind) {
        self.items.push(Item { zorder, kind });
    }

    pub fn add_bars(&mut self, bars: Bars) {
        if let Some(label) = &bars.label {
            self.handles.push(LegendEntry {
                label: label.clone(),
                handle: Handle::Patch {
                    color: bars.colors[0],
                    alpha: bars.alpha,
                },
            });
        }
        for (i, &(x, y, w, h)) in bars.rects.iter().enumerate() {
            let fill = bars.colors[i % bars.colors.len()];
            self.push(
                bars.zorder,
                ItemKind::Rect {
                    x,
                    y,
                    w,
                    h,
                    fill,
                    alpha: bars.alpha,
                    edge: bars.edge,
                },
            );
        }
    }

    pub fn add_line(&mut self, line: Line) {
        if let Some(label) = &line.label {
            self.handles.push(LegendEntry {
                label: label.clone(),
                handle: Handle::Line {
                    color: line.color,
                    width: line.width,
                    dash: line.dash,
                    marker: line.marker.map(|(m, _)| m),
                    alpha: line.alpha,
                },
            });
        }
        self.push(
            line.zorder,
            ItemKind::Polyline {
                points: line.points.clone(),
                color: line.color,
                width: line.width,
                dash: line.dash,
                alpha: line.alpha,
            },
        );
        if let Some((marker, size)) = line.marker {
            self.push(
                line.zorder,
                ItemKind::Markers {
                    points: line.points,
                    marker,
                    size,
                    color: line.color,
                    edge: None,
                },
            );
        }
    }

    /// One scatter point; `area` is in square points.
    pub fn scatter(&mut self, x: f64, y: f64, area: f64, color: Color, marker: Marker, zorder: f64) {
        self.push(
            zorder,
            ItemKind::Markers {
                points: vec![(x, y)],
                marker,
                size: area.sqrt(),
                color,
                edge: Some((BLACK, 0.5)),
            },
        );
    }

    /// Filled rectangle with its lower-left corner at `(x, y)`.
    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Color,
        alpha: f64,
        edge: Option<(Color, f64)>,
        zorder: f64,
    ) {
        self.push(
            zorder,
            ItemKind::Rect {
                x,
                y,
                w,
                h,
                fill,
                alpha,
                edge,
            },
        );
    }

    pub fn ellipse(&mut self, center: (f64, f64), w: f64, h: f64, color: Color, alpha: f64, zorder: f64) {
        self.push(
            zorder,
            ItemKind::Ellipse {
                cx: center.0,
                cy: center.1,
                w,
                h,
                color,
                alpha,
            },
        );
    }

    /// Text anchored at a data position.
    pub fn text(&mut self, x: f64, y: f64, text: impl Into<String>, style: TextStyle) {
        self.push(
            3.0,
            ItemKind::Text {
                x,
                y,
                offset: (0.0, 0.0),
                text: text.into(),
                style,
                bbox: None,
            },
        );
    }

    /// Text at a data point shifted by `offset` points (right, up).
    pub fn annotate(&mut self, text: impl Into<String>, at: (f64, f64), offset: (f64, f64), style: TextStyle) {
        self.push(
            3.0,
            ItemKind::Text {
                x: at.0,
                y: at.1,
                offset,
                text: text.into(),
                style,
                bbox: None,
            },
        );
    }

    /// Like [`annotate`](Self::annotate) with a rounded box behind the text.
    pub fn annotate_boxed(
        &mut self,
        text: impl Into<String>,
        at: (f64, f64),
        offset: (f64, f64),
        style: TextStyle,
        bbox: BoxStyle,
    ) {
        self.push(
            3.0,
            ItemKind::Text {
                x: at.0,
                y: at.1,
                offset,
                text: text.into(),
                style,
                bbox: Some(bbox),
            },
        );
    }

    /// Open-headed arrow between two data points.
    pub fn arrow(&mut self, from: (f64, f64), to: (f64, f64), color: Color, width: f64, dash: Dash) {
        self.push(
            3.0,
            ItemKind::Arrow {
                from,
                to,
                color,
                width,
                dash,
            },
        );
    }

    pub fn axhline(&mut self, y: f64, color: Color, width: f64, dash: Dash, alpha: f64, label: Option<&str>) {
        if let Some(label) = label {
            self.handles.push(LegendEntry {
                label: label.to_string(),
                handle: Handle::Line {
                    color,
                    width,
                    dash,
                    marker: None,
                    alpha,
                },
            });
        }
        self.push(
            2.0,
            ItemKind::HLine {
                y,
                color,
                width,
                dash,
                alpha,
            },
        );
    }

    pub fn axvline(&mut self, x: f64, color: Color, width: f64, dash: Dash, alpha: f64, zorder: f64) {
        self.push(
            zorder,
            ItemKind::VLine {
                x,
                color,
                width,
                dash,
                alpha,
            },
        );
    }

    /// Shaded vertical band across the full height of the axes.
    pub fn axvspan(&mut self, x0: f64, x1: f64, color: Color, alpha: f64, zorder: f64) {
        self.push(zorder, ItemKind::VSpan { x0, x1, color, alpha });
    }

    /// Number of recorded artists.
    pub fn artist_count(&self) -> usize {
        self.items.len()
    }

    fn auto_limits(&self) -> ((f64, f64), (f64, f64)) {
        let data = bounds_of(self.items.iter().filter_map(|i| i.kind.extents()));
        let has_bars = self
            .items
            .iter()
            .any(|i| matches!(i.kind, ItemKind::Rect { y, .. } if y == 0.0));
        let pad = |(lo, hi): (f64, f64), sticky_zero: bool| {
            let span = if hi > lo { hi - lo } else { 1.0 };
            let lo = if sticky_zero && lo == 0.0 {
                0.0
            } else {
                lo - span * AUTO_MARGIN
            };
            (lo, hi + span * AUTO_MARGIN)
        };
        let (dx, dy) = data.unwrap_or(((0.0, 1.0), (0.0, 1.0)));
        let xlim = self.xlim.unwrap_or_else(|| pad(dx, false));
        let ylim = self.ylim.unwrap_or_else(|| pad(dy, has_bars));
        (xlim, ylim)
    }

    /// Data limits after auto-scaling, as used for layout.
    pub fn limits(&self) -> ((f64, f64), (f64, f64)) {
        self.auto_limits()
    }

    fn y_ticks(&self, ylim: (f64, f64)) -> Vec<(f64, String)> {
        let ticks = nice_ticks(ylim.0, ylim.1);
        let step = if ticks.len() > 1 {
            ticks[1] - ticks[0]
        } else {
            1.0
        };
        ticks
            .into_iter()
            .map(|v| (v, format_tick(v, step)))
            .collect()
    }

    fn x_ticks(&self, xlim: (f64, f64)) -> Vec<(f64, String)> {
        match &self.xticks {
            Some(ticks) => ticks.clone(),
            None => {
                let ticks = nice_ticks(xlim.0, xlim.1);
                let step = if ticks.len() > 1 {
                    ticks[1] - ticks[0]
                } else {
                    1.0
                };
                ticks
                    .into_iter()
                    .map(|v| (v, format_tick(v, step)))
                    .collect()
            }
        }
    }

    /// Draw everything except the legend.
    pub(crate) fn render(&self, out: &mut String, rect: Rect, clip_id: &str) {
        let (xlim, ylim) = self.auto_limits();
        let proj = Projection {
            rect,
            xlim,
            ylim,
            invert_y: self.invert_y,
        };

        let _ = writeln!(
            out,
            "<clipPath id='{}'><rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}'/></clipPath>",
            clip_id, rect.x, rect.y, rect.w, rect.h
        );

        if self.axis_on {
            if let Some(bg) = self.background {
                let _ = writeln!(
                    out,
                    "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='{}'/>",
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    bg.svg()
                );
            }
            self.render_grid(out, &proj);
        }

        let mut order: Vec<&Item> = self.items.iter().collect();
        order.sort_by(|a, b| {
            a.zorder
                .partial_cmp(&b.zorder)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for item in order {
            let clip = if item.kind.clipped() {
                format!(" clip-path='url(#{})'", clip_id)
            } else {
                String::new()
            };
            render_item(out, &proj, &item.kind, &clip);
        }

        if self.axis_on {
            self.render_spines(out, &proj);
            self.render_ticks(out, &proj);
        }

        if let Some(title) = &self.title {
            let style = title.style.align(HAlign::Center, VAlign::Bottom);
            svg::write_text(
                out,
                rect.x + rect.w / 2.0,
                rect.y - title.pad,
                &title.text,
                &style,
            );
        }
    }

    fn render_grid(&self, out: &mut String, proj: &Projection) {
        let r = proj.rect;
        if let Some(alpha) = self.grid_y {
            for (v, _) in self.y_ticks(proj.ylim) {
                if !proj.contains_y(v) {
                    continue;
                }
                let y = proj.y(v);
                let _ = writeln!(
                    out,
                    "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' {}/>",
                    r.x,
                    y,
                    r.x + r.w,
                    y,
                    svg::stroke_attrs(GRID_COLOR, 0.8, Dash::Solid, alpha)
                );
            }
        }
        if let Some(alpha) = self.grid_x {
            for (v, _) in self.x_ticks(proj.xlim) {
                if !proj.contains_x(v) {
                    continue;
                }
                let x = proj.x(v);
                let _ = writeln!(
                    out,
                    "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' {}/>",
                    x,
                    r.y,
                    x,
                    r.y + r.h,
                    svg::stroke_attrs(GRID_COLOR, 0.8, Dash::Solid, alpha)
                );
            }
        }
    }

    fn render_spines(&self, out: &mut String, proj: &Projection) {
        let r = proj.rect;
        let segments = [
            (Spine::Top, (r.x, r.y), (r.x + r.w, r.y)),
            (Spine::Right, (r.x + r.w, r.y), (r.x + r.w, r.y + r.h)),
            (Spine::Left, (r.x, r.y), (r.x, r.y + r.h)),
            (Spine::Bottom, (r.x, r.y + r.h), (r.x + r.w, r.y + r.h)),
        ];
        for (spine, (x1, y1), (x2, y2)) in segments {
            if !self.spines[spine as usize] {
                continue;
            }
            // A twin axes only owns its own side.
            if self.side == YSide::Right && spine != Spine::Right {
                continue;
            }
            let _ = writeln!(
                out,
                "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' {}/>",
                x1,
                y1,
                x2,
                y2,
                svg::stroke_attrs(BLACK, 0.8, Dash::Solid, 1.0)
            );
        }
    }

    fn render_ticks(&self, out: &mut String, proj: &Projection) {
        let r = proj.rect;
        let tick_stroke = svg::stroke_attrs(BLACK, 0.8, Dash::Solid, 1.0);

        let mut xtick_height: f64 = 0.0;
        if self.side == YSide::Left {
            let style = TextStyle::new(self.xtick_size, BLACK).align(HAlign::Center, VAlign::Top);
            for (v, label) in self.x_ticks(proj.xlim) {
                if !proj.contains_x(v) {
                    continue;
                }
                let x = proj.x(v);
                let bottom = r.y + r.h;
                let _ = writeln!(
                    out,
                    "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' {}/>",
                    x,
                    bottom,
                    x,
                    bottom + TICK_LEN,
                    tick_stroke
                );
                svg::write_text(out, x, bottom + TICK_LEN + TICK_PAD, &label, &style);
                xtick_height = xtick_height.max(svg::text_height(&label, self.xtick_size));
            }
            if let Some(xlabel) = &self.xlabel {
                let style = xlabel.style.align(HAlign::Center, VAlign::Top);
                svg::write_text(
                    out,
                    r.x + r.w / 2.0,
                    r.y + r.h + TICK_LEN + TICK_PAD + xtick_height + 4.0,
                    &xlabel.text,
                    &style,
                );
            }
        }

        let mut ytick_width: f64 = 0.0;
        if self.show_yticks {
            let (axis_x, dir, ha) = match self.side {
                YSide::Left => (r.x, -1.0, HAlign::Right),
                YSide::Right => (r.x + r.w, 1.0, HAlign::Left),
            };
            let style = TextStyle::new(DEFAULT_FONT, BLACK).align(ha, VAlign::Center);
            for (v, label) in self.y_ticks(proj.ylim) {
                if !proj.contains_y(v) {
                    continue;
                }
                let y = proj.y(v);
                let _ = writeln!(
                    out,
                    "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' {}/>",
                    axis_x,
                    y,
                    axis_x + dir * TICK_LEN,
                    y,
                    tick_stroke
                );
                svg::write_text(out, axis_x + dir * (TICK_LEN + TICK_PAD), y, &label, &style);
                ytick_width = ytick_width.max(svg::text_width(&label, DEFAULT_FONT, false));
            }
        }

        if let Some(ylabel) = &self.ylabel {
            let gap = TICK_LEN + TICK_PAD + ytick_width + 4.0 + ylabel.style.size / 2.0;
            let x = match self.side {
                YSide::Left => r.x - gap,
                YSide::Right => r.x + r.w + gap,
            };
            let style = ylabel.style.centered().rotated(90.0);
            svg::write_text(out, x, r.y + r.h / 2.0, &ylabel.text, &style);
        }
    }

    /// Draw the legend box, if any. Called after every axes has rendered.
    pub(crate) fn render_legend(&self, out: &mut String, rect: Rect) {
        let Some(legend) = &self.legend else {
            return;
        };
        if legend.entries.is_empty() {
            return;
        }
        let size = legend.size;
        let pad = 0.4 * size;
        let handle_len = 2.0 * size;
        let gap = 0.8 * size;
        let row_gap = 0.5 * size;
        let inset = 7.0;

        let label_width = legend
            .entries
            .iter()
            .map(|e| svg::text_width(&e.label, size, false))
            .fold(0.0, f64::max);
        let rows: Vec<f64> = legend
            .entries
            .iter()
            .map(|e| svg::text_height(&e.label, size))
            .collect();
        let box_w = pad * 2.0 + handle_len + gap + label_width;
        let box_h = pad * 2.0 + rows.iter().sum::<f64>() + row_gap * (rows.len() as f64 - 1.0);

        let box_x = match legend.loc {
            LegendLoc::UpperLeft => rect.x + inset,
            LegendLoc::UpperRight => rect.x + rect.w - inset - box_w,
        };
        let box_y = rect.y + inset;

        let _ = writeln!(
            out,
            "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' rx='2' fill='{}' fill-opacity='{:.3}' stroke='{}' stroke-width='0.8'/>",
            box_x,
            box_y,
            box_w,
            box_h,
            WHITE.svg(),
            legend.frame_alpha,
            LEGEND_EDGE.svg()
        );

        let mut y = box_y + pad;
        for (entry, row_h) in legend.entries.iter().zip(&rows) {
            let cy = y + row_h / 2.0;
            let hx = box_x + pad;
            match &entry.handle {
                Handle::Patch { color, alpha } => {
                    let _ = writeln!(
                        out,
                        "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='{}' opacity='{:.3}'/>",
                        hx,
                        cy - size * 0.35,
                        handle_len,
                        size * 0.7,
                        color.svg(),
                        alpha
                    );
                }
                Handle::Line {
                    color,
                    width,
                    dash,
                    marker,
                    alpha,
                } => {
                    let _ = writeln!(
                        out,
                        "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' {}/>",
                        hx,
                        cy,
                        hx + handle_len,
                        cy,
                        svg::stroke_attrs(*color, *width, *dash, *alpha)
                    );
                    if let Some(marker) = marker {
                        write_marker(out, *marker, hx + handle_len / 2.0, cy, size * 0.6, *color, None);
                    }
                }
            }
            let style = TextStyle::new(size, BLACK).align(HAlign::Left, VAlign::Center);
            svg::write_text(out, hx + handle_len + gap, cy, &entry.label, &style);
            y += row_h + row_gap;
        }
    }
}

fn bounds_of(
    extents: impl Iterator<Item = ((f64, f64), (f64, f64))>,
) -> Option<((f64, f64), (f64, f64))> {
    extents.fold(None, |acc, ((x0, x1), (y0, y1))| match acc {
        None => Some(((x0, x1), (y0, y1))),
        Some(((ax0, ax1), (ay0, ay1))) => {
            Some(((ax0.min(x0), ax1.max(x1)), (ay0.min(y0), ay1.max(y1))))
        }
    })
}

fn render_item(out: &mut String, proj: &Projection, kind: &ItemKind, clip: &str) {
    match kind {
        ItemKind::Rect {
            x,
            y,
            w,
            h,
            fill,
            alpha,
            edge,
        } => {
            let (px0, py0) = proj.point((*x, *y));
            let (px1, py1) = proj.point((x + w, y + h));
            let mut attrs = format!("fill='{}'", fill.svg());
            if *alpha < 1.0 {
                let _ = write!(attrs, " opacity='{:.3}'", alpha);
            }
            if let Some((color, width)) = edge {
                let _ = write!(attrs, " stroke='{}' stroke-width='{:.2}'", color.svg(), width);
            }
            let _ = writeln!(
                out,
                "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' {}{}/>",
                px0.min(px1),
                py0.min(py1),
                (px1 - px0).abs(),
                (py1 - py0).abs(),
                attrs,
                clip
            );
        }
        ItemKind::Polyline {
            points,
            color,
            width,
            dash,
            alpha,
        } => {
            let pts: Vec<String> = points
                .iter()
                .map(|p| {
                    let (x, y) = proj.point(*p);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();
            let _ = writeln!(
                out,
                "<polyline points='{}' {} stroke-linejoin='round' stroke-linecap='round'{}/>",
                pts.join(" "),
                svg::stroke_attrs(*color, *width, *dash, *alpha),
                clip
            );
        }
        ItemKind::Markers {
            points,
            marker,
            size,
            color,
            edge,
        } => {
            for p in points {
                let (x, y) = proj.point(*p);
                write_marker(out, *marker, x, y, *size, *color, *edge);
            }
        }
        ItemKind::Text {
            x,
            y,
            offset,
            text,
            style,
            bbox,
        } => {
            let (px, py) = proj.point((*x, *y));
            let tx = px + offset.0;
            let ty = py - offset.1;
            if let Some(b) = bbox {
                let (x0, y0, x1, y1) = svg::text_bounds(tx, ty, text, style);
                let pad = b.pad * style.size;
                let _ = writeln!(
                    out,
                    "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' rx='{:.2}' fill='{}' stroke='{}' stroke-width='1' opacity='{:.3}'/>",
                    x0 - pad,
                    y0 - pad,
                    x1 - x0 + 2.0 * pad,
                    y1 - y0 + 2.0 * pad,
                    pad,
                    b.fill.svg(),
                    b.edge.svg(),
                    b.alpha
                );
            }
            svg::write_text(out, tx, ty, text, style);
        }
        ItemKind::Arrow {
            from,
            to,
            color,
            width,
            dash,
        } => {
            let (x0, y0) = proj.point(*from);
            let (x1, y1) = proj.point(*to);
            write_arrow(out, (x0, y0), (x1, y1), *color, *width, *dash);
        }
        ItemKind::HLine {
            y,
            color,
            width,
            dash,
            alpha,
        } => {
            let py = proj.y(*y);
            let r = proj.rect;
            let _ = writeln!(
                out,
                "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' {}{}/>",
                r.x,
                py,
                r.x + r.w,
                py,
                svg::stroke_attrs(*color, *width, *dash, *alpha),
                clip
            );
        }
        ItemKind::VLine {
            x,
            color,
            width,
            dash,
            alpha,
        } => {
            let px = proj.x(*x);
            let r = proj.rect;
            let _ = writeln!(
                out,
                "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' {}{}/>",
                px,
                r.y,
                px,
                r.y + r.h,
                svg::stroke_attrs(*color, *width, *dash, *alpha),
                clip
            );
        }
        ItemKind::VSpan {
            x0,
            x1,
            color,
            alpha,
        } => {
            let a = proj.x(*x0);
            let b = proj.x(*x1);
            let r = proj.rect;
            let _ = writeln!(
                out,
                "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='{}' opacity='{:.3}'{}/>",
                a.min(b),
                r.y,
                (b - a).abs(),
                r.h,
                color.svg(),
                alpha,
                clip
            );
        }
        ItemKind::Ellipse {
            cx,
            cy,
            w,
            h,
            color,
            alpha,
        } => {
            let (px, py) = proj.point((*cx, *cy));
            let rx = (proj.x(cx + w / 2.0) - px).abs();
            let ry = (proj.y(cy + h / 2.0) - py).abs();
            let _ = writeln!(
                out,
                "<ellipse cx='{:.2}' cy='{:.2}' rx='{:.2}' ry='{:.2}' fill='{}' opacity='{:.3}'{}/>",
                px,
                py,
                rx,
                ry,
                color.svg(),
                alpha,
                clip
            );
        }
    }
}

/// Draw one marker of diameter `size` centred at `(x, y)`.
fn write_marker(
    out: &mut String,
    marker: Marker,
    x: f64,
    y: f64,
    size: f64,
    color: Color,
    edge: Option<(Color, f64)>,
) {
    let r = size / 2.0;
    let stroke = match edge {
        Some((c, w)) => format!(" stroke='{}' stroke-width='{:.2}'", c.svg(), w),
        None => String::new(),
    };
    match marker {
        Marker::Circle => {
            let _ = writeln!(
                out,
                "<circle cx='{:.2}' cy='{:.2}' r='{:.2}' fill='{}'{}/>",
                x,
                y,
                r,
                color.svg(),
                stroke
            );
        }
        Marker::Square => {
            let _ = writeln!(
                out,
                "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='{}'{}/>",
                x - r,
                y - r,
                size,
                size,
                color.svg(),
                stroke
            );
        }
        Marker::Diamond => {
            let _ = writeln!(
                out,
                "<polygon points='{:.2},{:.2} {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}' fill='{}'{}/>",
                x,
                y - r,
                x + r,
                y,
                x,
                y + r,
                x - r,
                y,
                color.svg(),
                stroke
            );
        }
        Marker::Star => {
            let outer = r * 1.25;
            let inner = outer * 0.4;
            let pts: Vec<String> = (0..10)
                .map(|i| {
                    let radius = if i % 2 == 0 { outer } else { inner };
                    let angle = std::f64::consts::PI * (i as f64) / 5.0 - std::f64::consts::FRAC_PI_2;
                    format!("{:.2},{:.2}", x + radius * angle.cos(), y + radius * angle.sin())
                })
                .collect();
            let _ = writeln!(
                out,
                "<polygon points='{}' fill='{}'{}/>",
                pts.join(" "),
                color.svg(),
                stroke
            );
        }
    }
}

/// Draw a `->` style arrow: a shaft plus an open head at `to`.
fn write_arrow(out: &mut String, from: (f64, f64), to: (f64, f64), color: Color, width: f64, dash: Dash) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1e-6 {
        return;
    }
    let (ux, uy) = (dx / len, dy / len);
    // Leave a small gap at both ends.
    let shrink = 2.0_f64.min(len / 4.0);
    let start = (from.0 + ux * shrink, from.1 + uy * shrink);
    let tip = (to.0 - ux * shrink, to.1 - uy * shrink);

    let _ = writeln!(
        out,
        "<line x1='{:.2}' y1='{:.2}' x2='{:.2}' y2='{:.2}' {} stroke-linecap='round'/>",
        start.0,
        start.1,
        tip.0,
        tip.1,
        svg::stroke_attrs(color, width, dash, 1.0)
    );

    let head_len = 4.0 + width * 1.5;
    let head_half = head_len * 0.55;
    let base = (tip.0 - ux * head_len, tip.1 - uy * head_len);
    let left = (base.0 - uy * head_half, base.1 + ux * head_half);
    let right = (base.0 + uy * head_half, base.1 - ux * head_half);
    let _ = writeln!(
        out,
        "<polyline points='{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}' {} stroke-linejoin='round' stroke-linecap='round'/>",
        left.0,
        left.1,
        tip.0,
        tip.1,
        right.0,
        right.1,
        svg::stroke_attrs(color, width, Dash::Solid, 1.0)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexpro_core::palette::{ACCENT, NAVY};

    #[test]
    fn test_nice_ticks_revenue_range() {
        let ticks = nice_ticks(0.0, 1600.0);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks.last(), Some(&1600.0));
        assert_eq!(ticks[1] - ticks[0], 200.0);
    }

    #[test]
    fn test_nice_ticks_small_range() {
        assert_eq!(nice_ticks(0.0, 5.0), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_nice_ticks_offset_range() {
        let ticks = nice_ticks(1.0, 10.5);
        assert_eq!(ticks, vec![2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_nice_ticks_degenerate() {
        assert_eq!(nice_ticks(3.0, 3.0), vec![3.0]);
    }

    #[test]
    fn test_format_tick_decimals_follow_step() {
        assert_eq!(format_tick(200.0, 100.0), "200");
        assert_eq!(format_tick(1.5, 0.5), "1.5");
        assert_eq!(format_tick(75.0, 25.0), "75");
        assert_eq!(format_tick(-0.0, 1.0), "0");
    }

    #[test]
    fn test_bar_labels_become_patch_handles() {
        let mut ax = Axes::new();
        ax.add_bars(Bars::vertical(&[0.0, 1.0], &[3.0, 4.0], 0.5).color(NAVY).label("MRR"));
        ax.add_line(Line::new(&[0.0, 1.0], &[1.0, 2.0]).color(ACCENT).marker(Marker::Circle, 8.0).label("total"));
        let handles = ax.handles();
        assert_eq!(handles.len(), 2);
        assert!(matches!(handles[0].handle, Handle::Patch { .. }));
        assert!(matches!(handles[1].handle, Handle::Line { marker: Some(Marker::Circle), .. }));
    }

    #[test]
    fn test_auto_limits_keep_bars_on_zero() {
        let mut ax = Axes::new();
        ax.add_bars(Bars::vertical(&[0.0, 1.0, 2.0], &[10.0, 20.0, 30.0], 0.5));
        let ((x0, x1), (y0, y1)) = ax.limits();
        assert_eq!(y0, 0.0);
        assert!(y1 > 30.0);
        assert!(x0 < -0.25 && x1 > 2.25);
    }

    #[test]
    fn test_explicit_limits_win() {
        let mut ax = Axes::new();
        ax.add_bars(Bars::vertical(&[0.0], &[10.0], 0.5));
        ax.set_ylim(0.0, 1600.0);
        assert_eq!(ax.limits().1, (0.0, 1600.0));
    }

    #[test]
    fn test_twin_shares_xlim_and_sits_right() {
        let mut ax = Axes::new();
        ax.set_xlim(-1.0, 6.0);
        let twin = ax.twin();
        assert_eq!(twin.xlim, Some((-1.0, 6.0)));
        assert_eq!(twin.side, YSide::Right);
    }

    #[test]
    fn test_bar_colors_cycle() {
        let mut ax = Axes::new();
        ax.add_bars(Bars::vertical(&[0.0, 1.0, 2.0], &[1.0, 1.0, 1.0], 0.5).colors(&[NAVY, ACCENT]));
        let fills: Vec<Color> = ax
            .items
            .iter()
            .filter_map(|i| match i.kind {
                ItemKind::Rect { fill, .. } => Some(fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![NAVY, ACCENT, NAVY]);
    }

    #[test]
    fn test_empty_bar_colors_keep_previous() {
        let mut ax = Axes::new();
        ax.add_bars(
            Bars::vertical(&[0.0, 1.0], &[1.0, 2.0], 0.5)
                .color(NAVY)
                .colors(&[])
                .label("Revenue"),
        );
        let fills: Vec<Color> = ax
            .items
            .iter()
            .filter_map(|i| match i.kind {
                ItemKind::Rect { fill, .. } => Some(fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![NAVY, NAVY]);
        assert_eq!(ax.handles().len(), 1);
    }
}
