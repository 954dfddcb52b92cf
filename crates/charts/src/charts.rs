//! The ten strategy charts, built from literal data.

use crate::axes::{Axes, Bars, BoxStyle, LegendLoc, Line, Marker, Spine};
use crate::figure::{Figure, Margins};
use crate::svg::{Dash, HAlign, TextStyle, VAlign};
use nexpro_core::palette::{
    ACCENT, ACCENT_RED, BG, BLUE, CALLOUT_BG, GREEN, GREY, LIGHT_BLUE, LIGHT_GREY, MESSAGE_BG,
    NAVY, WHITE,
};
use nexpro_core::Color;

/// One entry of the chart registry.
#[derive(Clone, Copy)]
pub struct ChartSpec {
    /// Short identifier, also the file stem.
    pub name: &'static str,
    pub file_name: &'static str,
    pub build: fn() -> Figure,
}

impl std::fmt::Debug for ChartSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSpec")
            .field("name", &self.name)
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// Every chart, in generation order.
pub const CHARTS: [ChartSpec; 10] = [
    ChartSpec {
        name: "revenue_trend",
        file_name: "revenue_trend.png",
        build: revenue_trend,
    },
    ChartSpec {
        name: "mrr_arpa",
        file_name: "mrr_arpa.png",
        build: mrr_arpa,
    },
    ChartSpec {
        name: "new_revenue",
        file_name: "new_revenue.png",
        build: new_revenue,
    },
    ChartSpec {
        name: "churn_rate",
        file_name: "churn_rate.png",
        build: churn_rate,
    },
    ChartSpec {
        name: "positioning_map1",
        file_name: "positioning_map1.png",
        build: positioning_map1,
    },
    ChartSpec {
        name: "positioning_map2",
        file_name: "positioning_map2.png",
        build: positioning_map2,
    },
    ChartSpec {
        name: "saas_layers",
        file_name: "saas_layers.png",
        build: saas_layers,
    },
    ChartSpec {
        name: "roadmap",
        file_name: "roadmap.png",
        build: roadmap,
    },
    ChartSpec {
        name: "kpi_tree",
        file_name: "kpi_tree.png",
        build: kpi_tree,
    },
    ChartSpec {
        name: "accounts",
        file_name: "accounts.png",
        build: accounts,
    },
];

/// Look a chart up by name.
pub fn find(name: &str) -> Option<&'static ChartSpec> {
    CHARTS.iter().find(|c| c.name == name)
}

/// Integer with comma thousands separators.
fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Shortest decimal form: `17` for whole numbers, `3.2` otherwise.
fn short(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

fn indices(n: usize) -> Vec<f64> {
    (0..n).map(|i| i as f64).collect()
}

fn shifted(xs: &[f64], by: f64) -> Vec<f64> {
    xs.iter().map(|x| x + by).collect()
}

fn plot_axes() -> Axes {
    let mut ax = Axes::new();
    ax.set_background(BG);
    ax
}

/// Horizontally centred label sitting on its baseline.
fn label(size: f64, color: Color) -> TextStyle {
    TextStyle::new(size, color).align(HAlign::Center, VAlign::Baseline)
}

fn title(size: f64) -> TextStyle {
    TextStyle::new(size, NAVY).bold()
}

fn xticks(labels: &[&str]) -> Vec<(f64, String)> {
    labels
        .iter()
        .enumerate()
        .map(|(i, l)| (i as f64, l.to_string()))
        .collect()
}

pub fn revenue_trend() -> Figure {
    let mut fig = Figure::new(10.0, 5.5);
    let mut ax = plot_axes();

    let years = ["FY22", "FY23", "FY24", "FY25\n(計画)", "FY26\n(計画)", "FY27\n(計画)"];
    let revenue = [418.0, 497.0, 513.0, 650.0, 912.0, 1383.0];
    let mrr = [226.0, 253.0, 288.0, 330.0, 417.0, 527.0];
    let option_svc = [192.0, 245.0, 227.0, 320.0, 495.0, 856.0];

    let x = indices(years.len());
    let w = 0.35;

    ax.add_bars(
        Bars::vertical(&shifted(&x, -w / 2.0), &mrr, w)
            .color(NAVY)
            .label("MRR（システム利用料）")
            .zorder(3.0),
    );
    ax.add_bars(
        Bars::vertical(&shifted(&x, w / 2.0), &option_svc, w)
            .color(LIGHT_BLUE)
            .label("オプション+新規事業")
            .zorder(3.0),
    );
    ax.add_line(
        Line::new(&x, &revenue)
            .color(ACCENT)
            .marker(Marker::Circle, 8.0)
            .width(2.5)
            .label("売上総合計")
            .zorder(4.0),
    );

    for (i, v) in revenue.iter().enumerate() {
        ax.annotate(
            format!("¥{}M", thousands(*v as i64)),
            (x[i], *v),
            (0.0, 12.0),
            label(10.0, ACCENT).bold(),
        );
    }

    let yoy = [None, Some("+19.0%"), Some("+3.1%"), Some("+26.7%"), Some("+40.3%"), Some("+51.6%")];
    for (i, y) in yoy.iter().enumerate() {
        if let Some(y) = y {
            let color = if *y == "+3.1%" { ACCENT_RED } else { NAVY };
            ax.annotate(*y, (x[i], revenue[i]), (0.0, 26.0), label(8.0, color));
        }
    }

    ax.set_xticks(&xticks(&years), 10.0);
    ax.set_ylabel("百万円 (M)", TextStyle::new(10.0, GREY));
    ax.set_title("売上推移と構成（FY22-FY27）", title(14.0), 20.0);
    ax.legend(LegendLoc::UpperLeft, 9.0);
    ax.set_legend_frame_alpha(0.9);
    ax.grid(false, true, 0.3);
    ax.hide_spines(&[Spine::Top, Spine::Right]);
    ax.set_ylim(0.0, 1600.0);

    fig.add_axes(ax);
    fig
}

pub fn mrr_arpa() -> Figure {
    let mut fig = Figure::new(10.0, 5.0).margins(Margins::TWIN);
    let mut ax1 = plot_axes();

    let years = ["FY22", "FY23", "FY24", "FY25(計画)", "FY26(計画)", "FY27(計画)"];
    let mrr_annual = [226.0, 253.0, 288.0, 330.0, 417.0, 527.0];
    let arpa = [105.0, 138.0, 148.0, 169.0, 186.0, 204.0];

    let x = indices(years.len());

    ax1.add_bars(
        Bars::vertical(&x, &mrr_annual, 0.5)
            .color(NAVY)
            .alpha(0.85)
            .label("MRR年間合計(M)")
            .zorder(3.0),
    );
    ax1.set_ylabel("MRR年間合計（百万円）", TextStyle::new(10.0, NAVY));
    ax1.set_ylim(0.0, 650.0);

    let mut ax2 = ax1.twin();
    ax2.add_line(
        Line::new(&x, &arpa)
            .color(ACCENT)
            .marker(Marker::Square, 8.0)
            .width(2.5)
            .label("ARPA長期PF(千円/月)")
            .zorder(4.0),
    );
    ax2.set_ylabel("ARPA（千円/月）", TextStyle::new(10.0, ACCENT));
    ax2.set_ylim(50.0, 250.0);

    for (i, v) in arpa.iter().enumerate() {
        ax2.annotate(
            format!("¥{}K", v),
            (x[i], *v),
            (0.0, 10.0),
            label(9.0, ACCENT).bold(),
        );
    }

    ax1.set_xticks(&xticks(&years), 9.0);
    ax1.set_title("MRR成長とARPA推移", title(14.0), 15.0);

    let mut entries = ax1.handles();
    entries.extend(ax2.handles());
    ax1.legend_with(entries, LegendLoc::UpperLeft, 9.0);

    ax1.grid(false, true, 0.3);
    ax1.hide_spines(&[Spine::Top]);

    fig.add_axes(ax1);
    fig.add_axes(ax2);
    fig
}

pub fn new_revenue() -> Figure {
    let mut fig = Figure::new(10.0, 5.0);
    let mut ax = plot_axes();

    let years = ["FY25(計画)", "FY26(計画)", "FY27(計画)"];
    let compound = [3.2, 17.0, 51.0];
    let sales_dx = [33.5, 121.8, 327.0];
    let share = [5.6, 15.2, 27.3];
    let x = indices(years.len());
    let w = 0.35;

    ax.add_bars(
        Bars::vertical(&shifted(&x, -w / 2.0), &compound, w)
            .color(LIGHT_BLUE)
            .label("コンパウンド\n(AF・名刺OCR・動画マニュアル)")
            .zorder(3.0),
    );
    ax.add_bars(
        Bars::vertical(&shifted(&x, w / 2.0), &sales_dx, w)
            .color(ACCENT)
            .label("営業DX\n(営業代行・営業DX)")
            .zorder(3.0),
    );

    for i in 0..years.len() {
        ax.annotate(
            format!("¥{}M", short(compound[i])),
            (x[i] - w / 2.0, compound[i]),
            (0.0, 5.0),
            label(9.0, NAVY),
        );
        ax.annotate(
            format!("¥{}M", short(sales_dx[i])),
            (x[i] + w / 2.0, sales_dx[i]),
            (0.0, 5.0),
            label(9.0, ACCENT).bold(),
        );
    }

    for i in 0..years.len() {
        let total = compound[i] + sales_dx[i];
        ax.annotate_boxed(
            format!("合計 ¥{:.0}M\n(全体の{}%)", total, short(share[i])),
            (x[i], f64::max(compound[i], sales_dx[i])),
            (0.0, 20.0),
            label(9.0, NAVY).bold(),
            BoxStyle::new(MESSAGE_BG, LIGHT_BLUE).alpha(0.8),
        );
    }

    ax.set_xticks(&xticks(&years), 11.0);
    ax.set_ylabel("百万円 (M)", TextStyle::new(10.0, GREY));
    ax.set_title("新収益柱の成長計画", title(14.0), 20.0);
    ax.legend(LegendLoc::UpperLeft, 9.0);
    ax.grid(false, true, 0.3);
    ax.hide_spines(&[Spine::Top, Spine::Right]);
    ax.set_ylim(0.0, 420.0);

    fig.add_axes(ax);
    fig
}

pub fn churn_rate() -> Figure {
    let mut fig = Figure::new(10.0, 4.5);
    let mut ax = plot_axes();

    let years = ["FY22", "FY23", "FY24", "FY25(目標)", "FY26(目標)", "FY27(目標)"];
    let churn = [3.6, 2.3, 1.7, 1.0, 1.0, 1.0];
    let colors = [ACCENT_RED, ACCENT, ACCENT, BLUE, BLUE, BLUE];
    let x = indices(years.len());

    let bars = Bars::vertical(&x, &churn, 0.5)
        .colors(&colors)
        .zorder(3.0)
        .alpha(0.85);
    let tops = bars.tops();
    ax.add_bars(bars);

    for ((bx, _), v) in tops.iter().zip(churn) {
        ax.annotate(
            format!("{:.1}%", v),
            (*bx, v),
            (0.0, 8.0),
            label(12.0, NAVY).bold(),
        );
    }

    ax.axhline(1.0, BLUE, 1.5, Dash::Dashed, 0.5, Some("目標: 1.0%"));
    ax.axhline(
        0.42,
        GREEN,
        1.5,
        Dash::Dotted,
        0.5,
        Some("SaaS優良水準: ~0.4%/月(年5%)"),
    );

    ax.set_xticks(&xticks(&years), 10.0);
    ax.set_title("月次解約率（長期PF）推移と目標", title(14.0), 15.0);
    ax.set_ylabel("月次解約率 (%)", TextStyle::new(10.0, GREY));
    ax.legend(LegendLoc::UpperRight, 9.0);
    ax.grid(false, true, 0.3);
    ax.hide_spines(&[Spine::Top, Spine::Right]);
    ax.set_ylim(0.0, 5.0);

    fig.add_axes(ax);
    fig
}

/// A company plotted on a positioning map.
struct Player {
    name: &'static str,
    x: f64,
    y: f64,
    color: Color,
}

impl Player {
    const fn new(name: &'static str, x: f64, y: f64, color: Color) -> Self {
        Self { name, x, y, color }
    }

    fn is_nexpro(&self) -> bool {
        self.name.contains("ネクプロ")
    }

    fn is_target(&self) -> bool {
        self.name.contains("目標")
    }
}

/// Scatter the players with their name labels.
fn plot_players(ax: &mut Axes, players: &[Player]) {
    for p in players {
        let (size, marker) = if p.is_nexpro() {
            let marker = if p.is_target() { Marker::Star } else { Marker::Circle };
            (220.0, marker)
        } else {
            (150.0, Marker::Circle)
        };
        ax.scatter(p.x, p.y, size, p.color, marker, 5.0);

        let offset_y = if p.is_target() { -20.0 } else { 15.0 };
        let mut style = TextStyle::new(10.0, p.color);
        if p.is_nexpro() {
            style = style.bold();
        }
        ax.annotate(p.name, (p.x, p.y), (12.0, offset_y), style);
    }
}

fn map_axes(xlabel: &str, ylabel: &str, heading: &str) -> Axes {
    let mut ax = plot_axes();
    ax.set_xlabel(xlabel, TextStyle::new(11.0, NAVY).bold());
    ax.set_ylabel(ylabel, TextStyle::new(11.0, NAVY).bold());
    ax.set_title(heading, title(13.0), 15.0);
    ax
}

fn quadrant_guides(ax: &mut Axes) {
    ax.axvline(5.5, LIGHT_GREY, 1.5, Dash::Solid, 0.5, 2.0);
    ax.axhline(5.5, LIGHT_GREY, 1.5, Dash::Solid, 0.5, None);
    ax.grid(true, true, 0.15);
    ax.hide_spines(&[Spine::Top, Spine::Right]);
}

pub fn positioning_map1() -> Figure {
    let mut fig = Figure::new(9.0, 7.0).margins(Margins::new(62.0, 22.0, 44.0, 56.0));

    let players = [
        Player::new("Zoom Webinars", 7.5, 3.0, GREY),
        Player::new("ON24", 8.5, 3.5, GREY),
        Player::new("EventHub", 4.5, 7.5, LIGHT_BLUE),
        Player::new("bizibl", 3.5, 7.0, LIGHT_BLUE),
        Player::new("FanGrowth", 3.0, 8.0, LIGHT_BLUE),
        Player::new("ネクプロ\n(現在)", 6.0, 7.5, BLUE),
        Player::new("ネクプロ\n(目標)", 8.5, 9.0, ACCENT),
    ];

    let mut ax = map_axes(
        "機能深度（配信 + 分析 + 実行）→",
        "日本企業適合性（商習慣 / 支援 / 言語 / 連携）→",
        "Positioning Map 1: 機能深度 × 日本企業適合性",
    );
    plot_players(&mut ax, &players);
    ax.arrow((6.2, 7.7), (8.3, 8.8), ACCENT, 2.5, Dash::Dashed);

    ax.set_xlim(1.0, 10.5);
    ax.set_ylim(1.0, 10.5);
    quadrant_guides(&mut ax);

    let muted = label(8.0, GREY).italic();
    ax.text(3.0, 9.8, "国内ツール型\n(高適合・低機能)", muted);
    ax.text(9.0, 9.8, "目標ポジション\n(高適合・高機能)", label(8.0, ACCENT).bold());
    ax.text(3.0, 1.5, "汎用ツール\n(低適合・低機能)", muted);
    ax.text(9.0, 1.5, "グローバル専業\n(低適合・高機能)", muted);

    fig.add_axes(ax);
    fig
}

pub fn positioning_map2() -> Figure {
    let mut fig = Figure::new(9.0, 7.0).margins(Margins::new(62.0, 22.0, 44.0, 56.0));

    let players = [
        Player::new("Zoom Webinars", 3.0, 3.5, GREY),
        Player::new("ON24", 8.5, 7.5, GREY),
        Player::new("EventHub", 3.5, 4.5, LIGHT_BLUE),
        Player::new("bizibl", 2.5, 3.0, LIGHT_BLUE),
        Player::new("FanGrowth", 2.0, 2.5, LIGHT_BLUE),
        Player::new("ネクプロ\n(現在)", 5.0, 5.0, BLUE),
        Player::new("ネクプロ\n(目標)", 8.0, 3.5, ACCENT),
    ];

    let mut ax = map_axes(
        "データ活用高度性（記録 → 示唆 → 自動実行）→",
        "← 導入ハードル（低い方が良い）",
        "Positioning Map 2: データ活用高度性 × 導入ハードル",
    );
    plot_players(&mut ax, &players);
    ax.arrow((5.2, 4.8), (7.8, 3.7), ACCENT, 2.5, Dash::Dashed);

    ax.ellipse((8.0, 3.5), 3.0, 2.5, ACCENT, 0.08, 1.0);
    ax.text(8.0, 2.0, "Sweet Spot", label(9.0, ACCENT).bold());

    ax.set_xlim(0.5, 10.5);
    ax.set_ylim(0.5, 10.5);
    ax.invert_yaxis();
    quadrant_guides(&mut ax);

    fig.add_axes(ax);
    fig
}

pub fn saas_layers() -> Figure {
    let mut fig = Figure::new(10.0, 5.5).margins(Margins::BARE);
    let mut ax = plot_axes();

    let layers = [
        ("AIエージェント層（実行）", 3.0, BLUE, "価値増大 — 業務を自律実行"),
        ("SaaS UIレイヤー（中間層）", 2.0, ACCENT_RED, "圧縮対象 — ダッシュボード・ワークフロー"),
        ("System of Record（データ層）", 1.0, NAVY, "価値増大 — CRM・ERP・独自データ"),
    ];

    for (name, y, color, desc) in layers {
        ax.rect(2.0, y - 0.35, 6.0, 0.7, color, 0.9, Some((WHITE, 2.0)), 3.0);
        ax.text(5.0, y + 0.05, name, TextStyle::new(12.0, WHITE).bold().centered());
        ax.text(5.0, y - 0.2, desc, TextStyle::new(8.0, WHITE).alpha(0.85).centered());
    }

    ax.arrow((8.5, 2.7), (8.5, 2.35), ACCENT_RED, 3.0, Dash::Solid);
    ax.arrow((8.5, 1.3), (8.5, 1.65), ACCENT_RED, 3.0, Dash::Solid);
    ax.text(9.2, 2.0, "圧縮", TextStyle::new(11.0, ACCENT_RED).bold().centered());

    ax.annotate_boxed(
        "ネクプロの\n目指す位置",
        (0.3, 0.3),
        (0.0, 0.0),
        TextStyle::new(10.0, ACCENT).bold(),
        BoxStyle::new(CALLOUT_BG, ACCENT),
    );
    ax.arrow((1.15, 0.5), (1.8, 1.0), ACCENT, 2.0, Dash::Solid);

    ax.set_xlim(-0.5, 10.5);
    ax.set_ylim(0.0, 4.2);
    ax.set_title("AIエージェント時代のSaaS価値構造", title(14.0), 10.0);
    ax.axis_off();

    fig.add_axes(ax);
    fig
}

pub fn roadmap() -> Figure {
    let mut fig = Figure::new(12.0, 6.0);
    let mut ax = plot_axes();

    let phases = [
        ("短期 0-6M\n止血・改善", 0.0, 6.0, ACCENT_RED),
        ("中期 6-18M\n転換・仕込み", 6.0, 12.0, ACCENT),
        ("長期 18-36M\n成長・回収", 18.0, 18.0, BLUE),
    ];

    let tracks: [(&str, [(&str, f64, f64, Color); 4]); 4] = [
        (
            "プロダクト",
            [
                ("エンゲージメントスコアMVP", 0.0, 6.0, NAVY),
                ("AI コンテンツ生成", 4.0, 8.0, NAVY),
                ("API-first移行", 6.0, 12.0, NAVY),
                ("HubSpot/Marketo連携", 18.0, 8.0, NAVY),
            ],
        ),
        (
            "GTM",
            [
                ("業種別パッケージ", 0.0, 4.0, BLUE),
                ("価格体系再設計", 6.0, 6.0, BLUE),
                ("営業DX加速", 0.0, 18.0, BLUE),
                ("ブランド・リポジショニング", 18.0, 12.0, BLUE),
            ],
        ),
        (
            "CS",
            [
                ("オンボーディング標準化", 0.0, 3.0, LIGHT_BLUE),
                ("ヘルススコア導入", 2.0, 4.0, LIGHT_BLUE),
                ("CS Profit Center化", 6.0, 8.0, LIGHT_BLUE),
                ("戦略アカウント制", 0.0, 6.0, LIGHT_BLUE),
            ],
        ),
        (
            "組織",
            [
                ("PMM兼務設置", 0.0, 3.0, GREY),
                ("RevOps設置", 3.0, 6.0, GREY),
                ("戦略採用 3-5名", 6.0, 8.0, GREY),
                ("KPIオーナー制度", 0.0, 1.0, GREY),
            ],
        ),
    ];

    // The first track sits at the top.
    let track_y = |i: usize| (tracks.len() - 1 - i) as f64 * 2.5;
    let phase_y_min = -0.8;
    let phase_y_max = track_y(0) + 1.8;

    for (name, start, duration, color) in phases {
        ax.axvspan(start, start + duration, color, 0.06, 0.0);
        ax.text(
            start + duration / 2.0,
            phase_y_max + 0.3,
            name,
            TextStyle::new(9.0, color)
                .bold()
                .align(HAlign::Center, VAlign::Bottom),
        );
    }

    for (t, (track, items)) in tracks.iter().enumerate() {
        let y = track_y(t);
        ax.text(
            -1.5,
            y + 0.3,
            *track,
            TextStyle::new(11.0, NAVY)
                .bold()
                .align(HAlign::Right, VAlign::Center),
        );
        for (i, (item, start, duration, color)) in items.iter().enumerate() {
            let bar_y = y + (i % 2) as f64 * 0.6;
            ax.add_bars(
                Bars::horizontal(bar_y, *duration, *start, 0.45)
                    .color(*color)
                    .alpha(0.7)
                    .edge(WHITE, 1.0)
                    .zorder(3.0),
            );
            ax.text(
                start + duration / 2.0,
                bar_y,
                *item,
                TextStyle::new(7.0, WHITE).bold().centered(),
            );
        }
    }

    for month in [6.0, 12.0, 18.0] {
        ax.axvline(month, ACCENT_RED, 1.5, Dash::Dashed, 0.4, 1.0);
        ax.text(
            month,
            phase_y_max - 0.3,
            "Gate\nReview",
            label(7.0, ACCENT_RED).bold(),
        );
    }

    ax.set_xlim(-2.0, 37.0);
    ax.set_ylim(phase_y_min, phase_y_max + 1.5);
    ax.set_xlabel("月数", TextStyle::new(10.0, GREY));
    ax.set_title("3層実行ロードマップ（0-36ヶ月）", title(14.0), 20.0);
    let months: Vec<(f64, String)> = (0..=6)
        .map(|i| ((i * 6) as f64, (i * 6).to_string()))
        .collect();
    ax.set_xticks(&months, 10.0);
    ax.hide_yticks();
    ax.hide_spines(&[Spine::Top, Spine::Right, Spine::Left]);

    fig.add_axes(ax);
    fig
}

pub fn kpi_tree() -> Figure {
    let mut fig = Figure::new(11.0, 6.5).margins(Margins::BARE);
    let mut ax = plot_axes();

    let draw_box = |ax: &mut Axes, x: f64, y: f64, text: &str, color: Color, w: f64, h: f64, size: f64| {
        ax.rect(x - w / 2.0, y - h / 2.0, w, h, color, 0.9, Some((WHITE, 1.5)), 3.0);
        ax.text(x, y, text, TextStyle::new(size, WHITE).bold().centered());
    };
    let draw_line = |ax: &mut Axes, x1: f64, y1: f64, x2: f64, y2: f64| {
        ax.add_line(
            Line::new(&[x1, x2], &[y1, y2])
                .color(LIGHT_GREY)
                .width(1.5)
                .zorder(2.0),
        );
    };

    draw_box(
        &mut ax,
        5.0,
        5.5,
        "North Star\n顧客あたりエンゲージメント成果価値",
        ACCENT,
        4.0,
        0.7,
        9.0,
    );

    let business = [
        (1.5, 4.0, "ARR成長率\n+27%→+40%→+52%"),
        (4.2, 4.0, "NRR\n100%→110%(仮説)"),
        (6.8, 4.0, "粗利率"),
        (9.5, 4.0, "顧客基盤\n167→210社"),
    ];
    for (x, y, text) in business {
        draw_box(&mut ax, x, y, text, NAVY, 2.2, 0.55, 8.0);
        draw_line(&mut ax, 5.0, 5.15, x, 4.28);
    }

    // (x, y, text, parent x)
    let leading = [
        (0.3, 2.5, "MRR\n¥330M→¥527M", 1.5),
        (2.3, 2.5, "新規MRR\n(長期PF)", 1.5),
        (4.2, 2.5, "Expansion\nMRR", 4.2),
        (6.0, 2.5, "Churn MRR\n解約率1.0%", 4.2),
        (7.8, 2.5, "ARPA\n¥169K→¥204K", 6.8),
        (9.8, 2.5, "成約率\n12%→15%", 9.5),
    ];
    for (x, y, text, parent_x) in leading {
        draw_box(&mut ax, x, y, text, BLUE, 1.7, 0.55, 7.0);
        draw_line(&mut ax, parent_x, 3.72, x, 2.78);
    }

    let new_revenue = [
        (1.5, 1.2, "営業DX\n¥33M→¥327M"),
        (4.0, 1.2, "コンパウンド\n¥3M→¥51M"),
        (7.0, 1.2, "エンゲージメント\nスコア導入数"),
        (9.5, 1.2, "オンボード\n完了率90%"),
    ];
    for (x, y, text) in new_revenue {
        draw_box(&mut ax, x, y, text, LIGHT_BLUE, 1.9, 0.55, 7.0);
    }

    ax.set_xlim(-1.0, 11.0);
    ax.set_ylim(0.5, 6.3);
    ax.set_title("KPIツリー構造", title(14.0), 10.0);
    ax.axis_off();

    fig.add_axes(ax);
    fig
}

pub fn accounts() -> Figure {
    let mut fig = Figure::new(10.0, 5.0).margins(Margins::TWIN);
    let mut ax = plot_axes();

    let years = ["FY22", "FY23", "FY24", "FY25(計画)", "FY26(計画)", "FY27(計画)"];
    let long_term = [160.0, 151.0, 167.0, 179.0, 195.0, 210.0];
    let new_per_year = [60.0, 27.0, 50.0, 38.0, 38.0, 38.0];
    let x = indices(years.len());

    ax.add_bars(
        Bars::vertical(&x, &long_term, 0.5)
            .color(NAVY)
            .alpha(0.85)
            .label("累計長期PFアカウント数")
            .zorder(3.0),
    );

    let mut ax2 = ax.twin();
    ax2.add_line(
        Line::new(&x, &new_per_year)
            .color(ACCENT)
            .marker(Marker::Diamond, 7.0)
            .width(2.0)
            .label("年間新規獲得数")
            .zorder(4.0),
    );

    for (i, v) in long_term.iter().enumerate() {
        ax.annotate(format!("{}社", v), (x[i], *v), (0.0, 8.0), label(10.0, NAVY).bold());
    }
    for (i, v) in new_per_year.iter().enumerate() {
        ax2.annotate(format!("{}社", v), (x[i], *v), (0.0, 10.0), label(9.0, ACCENT).bold());
    }

    ax.set_xticks(&xticks(&years), 9.0);
    ax.set_ylabel("累計アカウント数", TextStyle::new(10.0, NAVY));
    ax2.set_ylabel("年間新規獲得数", TextStyle::new(10.0, ACCENT));
    ax.set_ylim(0.0, 260.0);
    ax2.set_ylim(0.0, 80.0);

    ax.set_title("長期PFアカウント数推移", title(14.0), 15.0);

    let mut entries = ax.handles();
    entries.extend(ax2.handles());
    ax.legend_with(entries, LegendLoc::UpperLeft, 9.0);

    ax.grid(false, true, 0.3);
    ax.hide_spines(&[Spine::Top]);

    fig.add_axes(ax);
    fig.add_axes(ax2);
    fig
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// `(x, text)` of every `<text>` element in an SVG document.
    fn texts(svg: &str) -> Vec<(f64, String)> {
        svg.lines()
            .filter(|l| l.starts_with("<text "))
            .filter_map(|l| {
                let x = l.split("x='").nth(1)?.split('\'').next()?.parse().ok()?;
                let body = l.split('>').nth(1)?.split('<').next()?.to_string();
                Some((x, body))
            })
            .collect()
    }

    #[test]
    fn test_registry_has_ten_unique_charts() {
        assert_eq!(CHARTS.len(), 10);
        let names: HashSet<_> = CHARTS.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), 10);
        for chart in &CHARTS {
            assert_eq!(chart.file_name, format!("{}.png", chart.name));
        }
    }

    #[test]
    fn test_find_by_name() {
        assert_eq!(find("kpi_tree").map(|c| c.file_name), Some("kpi_tree.png"));
        assert!(find("pie").is_none());
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(1383), "1,383");
        assert_eq!(thousands(418), "418");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(-2500), "-2,500");
    }

    #[test]
    fn test_short_number_format() {
        assert_eq!(short(17.0), "17");
        assert_eq!(short(3.2), "3.2");
        assert_eq!(short(121.8), "121.8");
    }

    #[test]
    fn test_revenue_trend_labels_fy27_total() {
        let svg = revenue_trend().to_svg();
        let values: Vec<(f64, String)> = texts(&svg)
            .into_iter()
            .filter(|(_, t)| t.starts_with('¥'))
            .collect();
        assert_eq!(values.len(), 6);

        let (fy27_x, _) = values
            .iter()
            .find(|(_, t)| t == "¥1,383M")
            .expect("FY27 label");
        let rightmost = values.iter().map(|(x, _)| *x).fold(f64::MIN, f64::max);
        assert_eq!(*fy27_x, rightmost);
    }

    #[test]
    fn test_low_growth_year_is_highlighted() {
        let svg = revenue_trend().to_svg();
        let line = svg
            .lines()
            .find(|l| l.contains(">+3.1%<"))
            .expect("YoY label");
        assert!(line.contains("#D64045"));
    }

    #[test]
    fn test_twin_axis_charts_have_two_axes() {
        assert_eq!(mrr_arpa().axes().len(), 2);
        assert_eq!(accounts().axes().len(), 2);
        assert_eq!(churn_rate().axes().len(), 1);
    }

    #[test]
    fn test_new_revenue_totals() {
        let svg = new_revenue().to_svg();
        assert!(svg.contains(">合計 ¥37M<"));
        assert!(svg.contains(">(全体の27.3%)<"));
        assert!(svg.contains(">¥121.8M<"));
    }

    #[test]
    fn test_churn_labels_keep_one_decimal() {
        let svg = churn_rate().to_svg();
        assert!(svg.contains(">1.0%<"));
        assert!(svg.contains(">3.6%<"));
    }

    #[test]
    fn test_roadmap_draws_sixteen_items() {
        let svg = roadmap().to_svg();
        assert!(svg.contains(">エンゲージメントスコアMVP<"));
        assert!(svg.contains(">KPIオーナー制度<"));
        assert_eq!(svg.matches(">Gate<").count(), 3);
    }

    #[test]
    fn test_every_chart_builds() {
        for chart in &CHARTS {
            let fig = (chart.build)();
            assert!(!fig.axes().is_empty(), "{}", chart.name);
            assert!(fig.to_svg().contains("</svg>"));
        }
    }
}
