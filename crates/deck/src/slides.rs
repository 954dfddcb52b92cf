//! The twenty slides of the strategy deck, in presentation order.
//!
//! Every function appends exactly one slide to the assembler. All copy,
//! table contents and coordinates are literal.

use crate::builder::{DeckAssembler, ImageSize};
use nexpro_core::palette::{
    ACCENT, ACCENT_RED, BLUE, CARD_BG, DARK_GREY, GREY, LIGHT_BLUE, LIGHT_GREY, NAVY, PANEL_BG,
    WHITE,
};
use nexpro_core::{inches, Align, Color, Font, Frame, Geometry, Result};

const TITLE_SUBTITLE: Color = Color::rgb(0xAA, 0xCC, 0xEE);
const TITLE_PERIOD: Color = Color::rgb(0x88, 0xAA, 0xCC);
const OPTION_SUBTITLE: Color = Color::rgb(0xDD, 0xDD, 0xDD);

/// A named slide builder.
pub struct SlideSpec {
    /// Progress label printed while the deck is generated.
    pub label: &'static str,
    pub build: fn(&mut DeckAssembler) -> Result<()>,
}

impl std::fmt::Debug for SlideSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideSpec")
            .field("label", &self.label)
            .finish()
    }
}

/// Every slide, in deck order.
pub const SLIDES: [SlideSpec; 20] = [
    SlideSpec {
        label: "Title",
        build: title,
    },
    SlideSpec {
        label: "Executive Summary",
        build: executive_summary,
    },
    SlideSpec {
        label: "External Environment",
        build: external_environment,
    },
    SlideSpec {
        label: "Current Revenue",
        build: current_revenue,
    },
    SlideSpec {
        label: "Current KPIs",
        build: current_kpis,
    },
    SlideSpec {
        label: "Accounts & New Revenue",
        build: accounts_and_new_revenue,
    },
    SlideSpec {
        label: "SWOT",
        build: swot,
    },
    SlideSpec {
        label: "Competitive Table",
        build: competitive_table,
    },
    SlideSpec {
        label: "Positioning Map 1",
        build: positioning_map1,
    },
    SlideSpec {
        label: "Positioning Map 2",
        build: positioning_map2,
    },
    SlideSpec {
        label: "MECE Issues",
        build: mece_issues,
    },
    SlideSpec {
        label: "Strategy Options",
        build: strategy_options,
    },
    SlideSpec {
        label: "Recommended Strategy",
        build: recommended_strategy,
    },
    SlideSpec {
        label: "Product Initiatives",
        build: product_initiatives,
    },
    SlideSpec {
        label: "GTM Initiatives",
        build: gtm_initiatives,
    },
    SlideSpec {
        label: "Organization",
        build: organization,
    },
    SlideSpec {
        label: "Roadmap",
        build: roadmap,
    },
    SlideSpec {
        label: "KPI Tree",
        build: kpi_tree,
    },
    SlideSpec {
        label: "Decision Agenda",
        build: decision_agenda,
    },
    SlideSpec {
        label: "Q&A",
        build: qa_appendix,
    },
];

fn title(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.filled(Geometry::Rect, Frame::inches(0.0, 0.0, 13.333, 3.2), NAVY);

    s.text(
        Frame::inches(0.8, 0.8, 11.0, 1.0),
        "ネクプロ 全社戦略提案",
        Font::new(36.0, WHITE).bold(true),
    );
    s.text(
        Frame::inches(0.8, 1.8, 11.0, 0.6),
        "ウェビナーツールから B2B エンゲージメント・インテリジェンス基盤へ",
        Font::new(18.0, TITLE_SUBTITLE),
    );
    s.text(
        Frame::inches(0.8, 2.5, 5.0, 0.4),
        "対象期間：2026-2028（0-36ヶ月）  |  経営層・マネージャーMTG",
        Font::new(12.0, TITLE_PERIOD),
    );

    let decisions = [
        ("Decision 1", "資源配分の決定", "プロダクト45% / GTM35% / 組織20%", ACCENT),
        ("Decision 2", "ポジショニング転換", "ウェビナーツール→エンゲージメント基盤", BLUE),
        ("Decision 3", "組織再編の承認", "PMM/RevOps新設・KPIオーナー制度", LIGHT_BLUE),
    ];
    for (i, (label, heading, desc, bar)) in decisions.into_iter().enumerate() {
        let x = 0.8 + i as f64 * 4.1;
        let y = 3.8;
        s.panel(
            Geometry::RoundRect,
            Frame::inches(x, y, 3.7, 1.8),
            CARD_BG,
            LIGHT_BLUE,
            1.0,
        );
        s.filled(Geometry::Rect, Frame::inches(x, y, 3.7, 0.06), bar);
        s.text(
            Frame::inches(x + 0.2, y + 0.2, 3.3, 0.3),
            label,
            Font::new(10.0, ACCENT).bold(true),
        );
        s.text(
            Frame::inches(x + 0.2, y + 0.55, 3.3, 0.4),
            heading,
            Font::new(16.0, NAVY).bold(true),
        );
        s.text(
            Frame::inches(x + 0.2, y + 1.1, 3.3, 0.5),
            desc,
            Font::new(10.0, GREY),
        );
    }

    s.bottom_bar();
    s.text(
        Frame::inches(0.8, 6.3, 5.0, 0.3),
        "CONFIDENTIAL — 社外秘",
        Font::new(10.0, ACCENT_RED).bold(true),
    );
    Ok(())
}

fn executive_summary(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "エグゼクティブサマリー",
        Some("結論 — 「配信ツール」に留まれば死ぬ。「データ基盤」に転換すれば勝てる。"),
        Some(1),
    );
    s.key_message(
        "ネクプロは「ウェビナーツール」→「B2Bエンゲージメント・インテリジェンス基盤」への転換を今すぐ決断すべき",
    );

    s.table(
        Frame::inches(0.8, 2.2, 11.5, 3.2),
        (8, 4),
        &[
            &["項目", "現状（FY24実績）", "目標（FY27計画）", "変化率"],
            &["事業定義", "ウェビナー配信ツール", "エンゲージメント基盤", "—"],
            &["売上", "¥512M", "¥1,382M", "+170%"],
            &["MRR（年間）", "¥287M", "¥526M", "+83%"],
            &["ARPA（長期PF）", "¥148K/月", "¥204K/月", "+38%"],
            &["月次解約率", "1.7%", "1.0%（目標）", "−0.7pt"],
            &["長期PFアカウント数", "167社", "210社", "+26%"],
            &["新収益柱", "なし", "¥378M（全体27%）", "—"],
        ],
        &[2.5, 3.2, 3.5, 2.3],
        10.0,
    );

    s.multiline(
        Frame::inches(0.8, 5.6, 11.5, 1.2),
        [
            ("根拠: ", 11.0, true, NAVY),
            (
                "AIエージェント時代にUI中心SaaSの中間層は圧縮 / 日本ウェビナーSaaSはAI統合で12-18ヶ月遅れ → 先行者優位の猶予あり",
                10.0,
                false,
                DARK_GREY,
            ),
        ],
    );
    s.multiline(
        Frame::inches(0.8, 6.1, 11.5, 0.8),
        [
            ("反証リスク: ", 11.0, true, ACCENT_RED),
            (
                "30名体制での転換実行力 / 新収益柱（営業DX ¥327M）は未実証の仮説値",
                10.0,
                false,
                DARK_GREY,
            ),
        ],
    );
    Ok(())
}

fn external_environment(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "外部環境：AIエージェント時代の産業変化",
        Some("SaaS中間層の圧縮 — AIエージェントが変えるソフトウェア産業の構造"),
        Some(2),
    );
    s.key_message(
        "AIエージェントはSaaSの「UIレイヤー」を不要にするが、「データレイヤー」の価値は増大する",
    );

    s.image(
        "saas_layers.png",
        inches(0.5),
        inches(2.2),
        ImageSize::Width(inches(6.5)),
    )?;

    let facts = [
        ("$2,850億（42兆円）", "SaaS株時価総額消失\n（2026.2 Claude Cowork発表後）"),
        ("−43%", "バーティカルSaaS年初来下落率"),
        ("70%", "シートベース→成果ベース課金移行\n（2028年まで、IDC予測）"),
        ("4%", "日本のSaaS浸透率（米国15-18%）\n→ 構造的参入障壁＝時間稼ぎ"),
    ];
    for (i, (figure, desc)) in facts.into_iter().enumerate() {
        let y = 2.3 + i as f64 * 1.15;
        s.text(
            Frame::inches(7.3, y, 2.0, 0.4),
            figure,
            Font::new(22.0, ACCENT).bold(true),
        );
        s.text(
            Frame::inches(7.3, y + 0.4, 5.5, 0.6),
            desc,
            Font::new(9.0, DARK_GREY),
        );
    }

    s.multiline(
        Frame::inches(0.8, 6.3, 11.5, 0.6),
        [
            ("ネクプロへの示唆: ", 10.0, true, NAVY),
            (
                "配信機能 = battlegrounds（蚕食領域） / エンゲージメントデータ = gold mines（価値増大領域）",
                10.0,
                false,
                DARK_GREY,
            ),
        ],
    );
    Ok(())
}

fn current_revenue(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "自社現状①：売上推移と構成",
        Some("MRRは安定するも成長率は鈍化。新収益柱の立ち上げが急務。"),
        Some(3),
    );
    s.key_message(
        "FY24成長率+3.1%に急減速。¥1B突破には新収益柱（営業DX・コンパウンド）の成功が不可欠",
    );

    s.image(
        "revenue_trend.png",
        inches(0.5),
        inches(2.2),
        ImageSize::Width(inches(7.0)),
    )?;

    s.multiline(
        Frame::inches(7.8, 2.3, 5.0, 4.0),
        [
            ("FY27売上構成（計画）", 13.0, true, NAVY),
            ("", 6.0, false, NAVY),
            ("MRR（システム利用料）", 11.0, true, BLUE),
            ("  ¥527M（38%）", 11.0, false, DARK_GREY),
            ("", 4.0, false, NAVY),
            ("オプションサービス", 11.0, true, LIGHT_BLUE),
            ("  ¥478M（35%）", 11.0, false, DARK_GREY),
            ("", 4.0, false, NAVY),
            ("営業DX（新規）", 11.0, true, ACCENT),
            ("  ¥327M（24%） ← 未実証・最大リスク", 11.0, false, ACCENT_RED),
            ("", 4.0, false, NAVY),
            ("コンパウンド（新規）", 11.0, true, ACCENT),
            ("  ¥51M（4%）", 11.0, false, DARK_GREY),
            ("", 8.0, false, NAVY),
            ("※ 営業DXがFY27計画の24%を占める。", 9.0, true, ACCENT_RED),
            ("  この実行リスクが全計画の成否を左右。", 9.0, false, ACCENT_RED),
        ],
    );
    Ok(())
}

fn current_kpis(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "自社現状②：SaaS KPI分析",
        Some("ARPA改善は順調だが、解約率は依然「バケツの穴」状態"),
        Some(4),
    );

    s.image(
        "mrr_arpa.png",
        inches(0.3),
        inches(1.5),
        ImageSize::Width(inches(6.2)),
    )?;
    s.image(
        "churn_rate.png",
        inches(6.5),
        inches(1.5),
        ImageSize::Width(inches(6.2)),
    )?;

    s.table(
        Frame::inches(0.5, 5.0, 12.3, 2.0),
        (7, 5),
        &[
            &["KPI", "FY23", "FY24", "FY25計画", "評価"],
            &["長期PFアカウント数", "151社", "167社", "179社", "○ 回復傾向"],
            &["ARPA長期PF", "¥138K", "¥148K", "¥169K", "○ 改善中"],
            &["月次解約率（長期）", "2.3%", "1.7%", "1.0%", "△ 要改善"],
            &["新規成約数/年", "27社", "50社", "38社", "○ FY24回復"],
            &["成約率", "9.5%", "10.5%", "—", "△ 業界並み"],
            &["年換算解約率", "24.5%", "18.5%", "11.3%", "× SaaS優良=5%"],
        ],
        &[3.0, 1.8, 1.8, 1.8, 3.9],
        9.0,
    );
    Ok(())
}

fn accounts_and_new_revenue(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "自社現状③：顧客基盤と新収益柱",
        Some("アカウント数は回復基調。新規事業は急成長を前提とした計画。"),
        Some(5),
    );

    s.image(
        "accounts.png",
        inches(0.3),
        inches(1.5),
        ImageSize::Width(inches(6.2)),
    )?;
    s.image(
        "new_revenue.png",
        inches(6.5),
        inches(1.5),
        ImageSize::Width(inches(6.5)),
    )?;

    s.multiline(
        Frame::inches(0.8, 5.8, 11.5, 1.0),
        [
            ("課題仮説: ", 11.0, true, NAVY),
            ("① 利用深度のばらつき（上位/下位の格差大）  ", 10.0, false, DARK_GREY),
            ("② 受注後オンボーディングの再現性不足  ", 10.0, false, DARK_GREY),
            (
                "③ 高単価化のストーリー不足（データ活用→成果証明の接続が弱い）",
                10.0,
                false,
                DARK_GREY,
            ),
        ],
    );
    Ok(())
}

fn swot(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "戦略的SWOT分析",
        Some("「データモート」が唯一の持続的優位性"),
        Some(6),
    );

    let quadrants: [(&str, f64, f64, Color, [&str; 5]); 4] = [
        (
            "Strengths",
            0.5,
            1.4,
            NAVY,
            [
                "ITreview 13期連続受賞の製品品質",
                "Salesforce深度統合（Agentforce国内最先行）",
                "400-500社のエンタープライズ顧客基盤",
                "日本語運用ノウハウ・伴走支援体制",
                "擬似ライブ配信・メディアサイトビルダー",
            ],
        ),
        (
            "Weaknesses",
            6.7,
            1.4,
            ACCENT_RED,
            [
                "30名の少数体制（開発速度限界）",
                "総調達額¥7.5億（資金格差大）",
                "ブランド認知度（Zoom/V-CUBEに劣後）",
                "インテントデータ未整備",
                "PMM/RevOps機能の不在",
            ],
        ),
        (
            "Opportunities",
            0.5,
            4.2,
            BLUE,
            [
                "日本ウェビナーSaaSのAI統合12-18ヶ月遅れ",
                "ON24 Cvent買収→日本優先度低下",
                "Cookie廃止→1stパーティデータ価値増",
                "日本B2B DX余地（SaaS浸透率4%）",
                "企業あたりウェビナー数急増（13→47回/年）",
            ],
        ),
        (
            "Threats",
            6.7,
            4.2,
            DARK_GREY,
            [
                "Zoom/Webex/TeamsのAIエージェント搭載",
                "AIによる配信機能のコモディティ化",
                "Cvent大型統合（ON24+Goldcast ¥700億）",
                "価格競争の激化",
                "汎用AIで差別化希薄化",
            ],
        ),
    ];

    for (heading, x, y, color, items) in quadrants {
        s.panel(
            Geometry::RoundRect,
            Frame::inches(x, y, 6.0, 2.6),
            PANEL_BG,
            color,
            1.5,
        );
        s.filled(Geometry::Rect, Frame::inches(x, y, 6.0, 0.4), color);
        s.text(
            Frame::inches(x + 0.15, y + 0.02, 5.5, 0.35),
            heading,
            Font::new(13.0, WHITE).bold(true),
        );
        for (j, item) in items.into_iter().enumerate() {
            s.text(
                Frame::inches(x + 0.2, y + 0.5 + j as f64 * 0.38, 5.5, 0.35),
                &format!("• {}", item),
                Font::new(9.0, DARK_GREY),
            );
        }
    }
    Ok(())
}

fn competitive_table(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header("競合比較表", Some("5社×7軸の定量・定性比較"), Some(7));
    s.key_message(
        "グローバル勢は日本適合が弱く、国内勢はデータ活用が弱い → 両方持てば唯一の存在",
    );

    s.table(
        Frame::inches(0.5, 2.3, 12.3, 3.8),
        (8, 7),
        &[
            &["評価軸", "ネクプロ", "Zoom", "ON24", "EventHub", "bizibl", "FanGrowth"],
            &["配信品質", "◎", "◎", "○", "○", "○", "△"],
            &["MA/CRM連携", "◎ SF深度", "○ API", "◎ Eloqua", "△", "△", "△"],
            &["日本語適合", "◎", "△", "△", "◎", "◎", "◎"],
            &["データ分析", "○ (発展余地)", "△", "◎ 40-50pt", "△", "△", "△"],
            &["AI機能", "○ Agentforce", "○ AI Comp.", "◎ ACE AI", "△", "△", "△"],
            &["価格柔軟性", "◎", "○", "△ 高額", "○", "◎", "◎"],
            &["支援体制", "◎ 伴走型", "△ セルフ", "○ 海外", "○", "○", "◎ 運用代行"],
        ],
        &[1.8, 2.0, 1.6, 2.0, 1.6, 1.6, 1.7],
        9.0,
    );

    s.multiline(
        Frame::inches(0.8, 6.3, 11.5, 0.5),
        [
            ("示唆: ", 10.0, true, NAVY),
            (
                "ネクプロは「日本企業適合 × データ活用」で空白ポジションを獲得可能。ON24のCvent買収で日本市場投資が後退する今がチャンス。",
                10.0,
                false,
                DARK_GREY,
            ),
        ],
    );
    Ok(())
}

fn positioning_map1(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "Positioning Map 1: 機能深度 × 日本企業適合性",
        Some("右上象限（高機能×高適合）にネクプロを再配置する"),
        Some(8),
    );

    s.image(
        "positioning_map1.png",
        inches(0.8),
        inches(1.5),
        ImageSize::Width(inches(7.5)),
    )?;

    s.multiline(
        Frame::inches(8.5, 2.0, 4.2, 4.5),
        [
            ("戦略意図", 14.0, true, NAVY),
            ("", 6.0, false, NAVY),
            ("現在：", 11.0, true, BLUE),
            ("機能は中程度、日本適合性は高い。", 10.0, false, DARK_GREY),
            ("しかしデータ分析・AI実行力でON24に劣後。", 10.0, false, DARK_GREY),
            ("", 6.0, false, NAVY),
            ("目標：", 11.0, true, ACCENT),
            ("エンゲージメントスコア＋AIコンテンツ生成で", 10.0, false, DARK_GREY),
            ("機能深度を引き上げ、右上象限を占有。", 10.0, false, DARK_GREY),
            ("", 6.0, false, NAVY),
            ("Zoom/ON24は日本適合性を短期に", 10.0, false, DARK_GREY),
            ("改善することが困難（構造的障壁）。", 10.0, false, DARK_GREY),
            ("", 8.0, false, NAVY),
            ("→ 「日本×高機能」は空白ポジション", 11.0, true, ACCENT),
        ],
    );
    Ok(())
}

fn positioning_map2(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "Positioning Map 2: データ活用高度性 × 導入ハードル",
        Some("Sweet Spot = 高データ活用 × 低導入ハードル"),
        Some(9),
    );

    s.image(
        "positioning_map2.png",
        inches(0.8),
        inches(1.5),
        ImageSize::Width(inches(7.5)),
    )?;

    s.multiline(
        Frame::inches(8.5, 2.0, 4.2, 4.5),
        [
            ("Sweet Spot戦略", 14.0, true, NAVY),
            ("", 6.0, false, NAVY),
            ("ON24は高データ活用だが", 10.0, false, DARK_GREY),
            ("導入ハードルも高い（英語・高額・海外対応）。", 10.0, false, DARK_GREY),
            ("", 6.0, false, NAVY),
            ("ネクプロの差別化：", 11.0, true, ACCENT),
            ("• テンプレートによる即時活用", 10.0, false, DARK_GREY),
            ("• 伴走型CSによるオンボーディング", 10.0, false, DARK_GREY),
            ("• Salesforceネイティブ連携", 10.0, false, DARK_GREY),
            ("• 日本語完全対応", 10.0, false, DARK_GREY),
            ("", 6.0, false, NAVY),
            ("→ データ活用を高めつつ", 11.0, true, ACCENT),
            ("  導入障壁を下げる「両立」が勝ち筋", 11.0, true, ACCENT),
        ],
    );
    Ok(())
}

fn mece_issues(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "重要課題のMECE整理",
        Some("6視点×緊急度×インパクト×難易度で全社課題を構造化"),
        Some(10),
    );
    s.key_message(
        "最優先は「プロダクトのデータ基盤化」と「解約率の改善」。この2つが全戦略の基盤。",
    );

    s.table(
        Frame::inches(0.5, 2.3, 12.3, 4.5),
        (11, 5),
        &[
            &["視点", "課題", "緊急度", "インパクト", "難易度"],
            &["市場", "AI時代の事業価値再定義の遅れ", "高", "大", "中"],
            &["顧客", "成果指標（商談化）までの接続が弱い", "高", "大", "中"],
            &["プロダクト", "エンゲージメントスコアリング未実装", "高", "大", "中"],
            &["プロダクト", "AIコンテンツ自動生成の未実装", "中", "中", "中"],
            &["GTM", "業種別提案テンプレートの不足", "高", "中", "低"],
            &["GTM", "CSがコストセンターのまま", "中", "大", "中"],
            &["組織", "PMM機能の不在", "高", "大", "中"],
            &["組織", "30名体制の人材ボトルネック", "高", "大", "高"],
            &["財務", "新収益柱の実行リスク", "高", "大", "高"],
            &["財務", "LTV拡張余地（クロスセル不足）", "中", "大", "中"],
        ],
        &[1.5, 5.5, 1.5, 2.0, 1.8],
        9.0,
    );
    Ok(())
}

fn strategy_options(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "戦略オプション比較（3案）",
        Some("守るか、備えるか、攻めるか — 3つの道"),
        Some(11),
    );

    let options: [(&str, &str, Color, [&str; 7]); 3] = [
        (
            "梅：防衛型",
            "既存事業の効率最大化",
            GREY,
            [
                "投資: 現行水準維持",
                "FY27: ¥740M（仮説）",
                "プロダクト: 既存改善のみ",
                "GTM: 現行体制効率化",
                "組織: 変更なし",
                "リスク: 低（短期）→高（中長期）",
                "リターン: 低（縮小均衡）",
            ],
        ),
        (
            "竹：均衡型 ★推奨起点",
            "既存深耕＋データ機能拡張",
            BLUE,
            [
                "投資: +30-50%",
                "FY27: ¥930M（仮説）",
                "プロダクト: スコアMVP+AI要約",
                "GTM: 業種別PKG+CS高度化",
                "組織: PMM兼務設置",
                "リスク: 中（実行力分散）",
                "リターン: 中（持続成長軌道）",
            ],
        ),
        (
            "松：攻勢型",
            "基盤転換＋組織再編＋新収益",
            ACCENT,
            [
                "投資: +80-100%",
                "FY27: ¥1,385M（計画値）",
                "プロダクト: フルスタック転換",
                "GTM: 新セグメント+価格再設計",
                "組織: PMM/RevOps正式新設",
                "リスク: 高（キャッシュ・混乱）",
                "リターン: 高（市場ポジション確立）",
            ],
        ),
    ];

    for (i, (heading, subtitle, color, items)) in options.into_iter().enumerate() {
        let x = 0.5 + i as f64 * 4.2;
        let y = 1.6;
        // The recommended middle option gets the heavier border.
        let border = if i == 1 { 2.0 } else { 1.0 };
        s.panel(
            Geometry::RoundRect,
            Frame::inches(x, y, 3.9, 5.0),
            PANEL_BG,
            color,
            border,
        );
        s.filled(Geometry::Rect, Frame::inches(x, y, 3.9, 0.7), color);
        s.text(
            Frame::inches(x + 0.15, y + 0.02, 3.6, 0.35),
            heading,
            Font::new(14.0, WHITE).bold(true),
        );
        s.text(
            Frame::inches(x + 0.15, y + 0.35, 3.6, 0.3),
            subtitle,
            Font::new(9.0, OPTION_SUBTITLE),
        );
        for (j, item) in items.into_iter().enumerate() {
            s.text(
                Frame::inches(x + 0.2, y + 0.85 + j as f64 * 0.48, 3.5, 0.4),
                &format!("• {}", item),
                Font::new(9.0, DARK_GREY),
            );
        }
    }

    s.multiline(
        Frame::inches(0.8, 6.5, 11.5, 0.4),
        [
            ("推奨: ", 10.0, true, BLUE),
            (
                "「竹」案を6ヶ月で実行し、KPI達成を条件に「松」案へ段階移行",
                10.0,
                true,
                NAVY,
            ),
        ],
    );
    Ok(())
}

fn recommended_strategy(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "推奨戦略：「竹」→「松」段階移行",
        Some("全力投球ではなく、実績で信頼を獲得しながらギアを上げる"),
        Some(12),
    );

    let logics = [
        (
            "Logic 1: キャッシュ耐性",
            NAVY,
            "30名・¥7.5億の企業が全方位投資は自殺行為。\n竹案なら+30-50%で既存キャッシュフロー維持可能。",
        ),
        (
            "Logic 2: 小さく証明→大きく張る",
            BLUE,
            "エンゲージメントスコアMVPを6ヶ月で構築\n→ 5社で成果実証 → 本格投資判断。",
        ),
        (
            "Logic 3: 組織能力の段階構築",
            LIGHT_BLUE,
            "いきなりPMM/RevOps正式新設は機能しない。\n兼務→成果確認→専任化のステップが現実的。",
        ),
    ];
    for (i, (heading, color, desc)) in logics.into_iter().enumerate() {
        let x = 0.5 + i as f64 * 4.2;
        s.panel(
            Geometry::RoundRect,
            Frame::inches(x, 1.6, 3.9, 1.8),
            CARD_BG,
            color,
            1.5,
        );
        s.text(
            Frame::inches(x + 0.2, 1.7, 3.5, 0.3),
            heading,
            Font::new(12.0, color).bold(true),
        );
        s.text(
            Frame::inches(x + 0.2, 2.1, 3.5, 1.2),
            desc,
            Font::new(10.0, DARK_GREY),
        );
    }

    s.text(
        Frame::inches(0.8, 3.6, 5.0, 0.35),
        "6ヶ月後 Gate Review 判断基準",
        Font::new(14.0, NAVY).bold(true),
    );
    s.table(
        Frame::inches(0.5, 4.0, 12.3, 2.2),
        (5, 4),
        &[
            &["KPI", "Gate基準", "達成→", "未達→"],
            &["スコアMVP", "5社以上導入", "松案へ移行", "竹案延長・修正"],
            &["月次解約率", "1.3%以下", "松案へ移行", "CS施策見直し"],
            &["ARPA（長期）", "¥160K以上", "松案へ移行", "価格再検討"],
            &["営業DX売上", "¥15M/半期以上", "投資拡大", "ピボット検討"],
        ],
        &[2.5, 3.3, 3.3, 3.2],
        10.0,
    );
    Ok(())
}

fn product_initiatives(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "重点施策A：プロダクト（AI/データ基盤）",
        Some("エンゲージメントデータを「金鉱」から「製品」に変える"),
        Some(13),
    );

    s.table(
        Frame::inches(0.5, 1.6, 12.3, 3.0),
        (6, 5),
        &[
            &["#", "施策", "時期", "KPI", "責任"],
            &[
                "A1",
                "エンゲージメントスコアMVP\n視聴・チャット・Q&A・CTA統合",
                "0-6M",
                "MVP完成→5社導入",
                "プロダクト",
            ],
            &[
                "A2",
                "Salesforce連携強化\nリードスコアリングへのネイティブフィード",
                "0-6M",
                "SF連携ARPA +20%",
                "プロダクト",
            ],
            &[
                "A3",
                "日本語AIコンテンツ生成\nウェビナー→要約・ブログ・クリップ",
                "6-12M",
                "利用率30%以上",
                "プロダクト",
            ],
            &["A4", "API-firstアーキテクチャ移行", "6-18M", "API化率80%", "CTO"],
            &["A5", "HubSpot/Marketo連携", "12-18M", "非SF新規20社/年", "プロダクト"],
        ],
        &[0.5, 5.5, 1.3, 3.0, 2.0],
        9.0,
    );

    s.multiline(
        Frame::inches(0.8, 4.8, 11.5, 2.0),
        [
            ("根拠（なぜこの順序か）", 12.0, true, NAVY),
            ("", 4.0, false, NAVY),
            (
                "• A1が最優先: ON24は参加者あたり40-50データポイントでインテントスコアを構築。AutodeskはパイプラインROI 12倍を達成。",
                10.0,
                false,
                DARK_GREY,
            ),
            (
                "  日本市場ではまだ誰も本格提供していない → 先行者優位。",
                10.0,
                false,
                DARK_GREY,
            ),
            ("", 4.0, false, NAVY),
            (
                "• A3は市場実証済み: Goldcastは年間13万件超のAI動画クリップを生成。日本語特化が差別化要因。",
                10.0,
                false,
                DARK_GREY,
            ),
            ("", 4.0, false, NAVY),
            (
                "• A5は中期以降: 30名体制で3つのCRM/MA統合を同時開発は不可能。SF深化が先。",
                10.0,
                false,
                DARK_GREY,
            ),
        ],
    );
    Ok(())
}

fn gtm_initiatives(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "重点施策B：GTM（営業・CS・価格）",
        Some("「売り方」と「守り方」を同時に変える"),
        Some(14),
    );

    s.text(
        Frame::inches(0.8, 1.5, 5.0, 0.35),
        "営業施策",
        Font::new(14.0, NAVY).bold(true),
    );
    s.table(
        Frame::inches(0.5, 1.9, 6.0, 2.2),
        (5, 4),
        &[
            &["#", "施策", "時期", "KPI"],
            &["B1", "業種別ソリューションPKG（4業種）", "0-6M", "成約率+5pt"],
            &["B2", "価格体系再設計（3層構造）", "6-12M", "新規ARPA ¥180K"],
            &["B3", "営業DX事業の立上げ加速", "0-12M", "FY25 ¥33.4M"],
            &["B4", "SF経由獲得チャネル構築", "0-6M", "SF経由月2件"],
        ],
        &[0.4, 3.0, 0.9, 1.7],
        9.0,
    );

    s.text(
        Frame::inches(7.0, 1.5, 5.0, 0.35),
        "CS施策",
        Font::new(14.0, BLUE).bold(true),
    );
    s.table(
        Frame::inches(6.8, 1.9, 6.0, 2.2),
        (5, 4),
        &[
            &["#", "施策", "時期", "KPI"],
            &["C1", "オンボーディング標準化", "0-3M", "60日完了率90%"],
            &["C2", "ヘルススコア導入", "0-6M", "予兆検知率70%"],
            &["C3", "CS Profit Center化", "6-12M", "CS起点¥30M/年"],
            &["C4", "戦略アカウント制（上位20社）", "0-6M", "上位NRR 120%"],
        ],
        &[0.4, 3.0, 0.9, 1.7],
        9.0,
    );

    s.multiline(
        Frame::inches(0.8, 4.5, 11.5, 2.2),
        [
            ("CS Profit Center化の論理", 12.0, true, NAVY),
            ("", 4.0, false, NAVY),
            (
                "現状: CSは「解約防止」のコストセンター。成果が見えにくく投資判断が困難。",
                10.0,
                false,
                DARK_GREY,
            ),
            ("", 4.0, false, NAVY),
            (
                "転換: 伴走支援を「成果連動型コンサルティング」に再定義。",
                10.0,
                false,
                DARK_GREY,
            ),
            (
                "  • ウェビナー→商談化率の可視化（エンゲージメントスコア連動）",
                10.0,
                false,
                DARK_GREY,
            ),
            (
                "  • 成果レポートの定期提供 → アップセル提案の自然な接点",
                10.0,
                false,
                DARK_GREY,
            ),
            ("  • 目標: CS起点のアップセル売上 ¥30M/年", 10.0, false, DARK_GREY),
            ("", 4.0, false, NAVY),
            (
                "反証リスク: CS人員の「守り」工数を削ると解約率が悪化するリスク → 戦略アカウント制で優先度管理",
                10.0,
                true,
                ACCENT_RED,
            ),
        ],
    );
    Ok(())
}

fn organization(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "重点施策C：組織再編",
        Some("30名で勝つための「機能配置」と「採用計画」"),
        Some(15),
    );

    s.table(
        Frame::inches(0.5, 1.5, 12.3, 2.8),
        (5, 5),
        &[
            &["#", "施策", "時期", "KPI", "責任"],
            &[
                "D1",
                "PMM機能の兼務設置\n市場要件→製品要件の変換パイプライン",
                "0-3M",
                "月次市場要求レポート提出",
                "CEO直轄",
            ],
            &[
                "D2",
                "RevOps兼務設置\n営業/CS/プロダクトKPI統合",
                "3-6M",
                "統合ダッシュボード構築",
                "COO相当",
            ],
            &[
                "D3",
                "戦略採用（3-5名）\nAIエンジニア1+PMM1+CS2+営業DX1",
                "6-12M",
                "採用充足率80%",
                "人事/CEO",
            ],
            &[
                "D4",
                "KPIオーナー制度導入\n各KPIに個人名を紐付け",
                "0-1M",
                "全主要KPI\nオーナーアサイン完了",
                "CEO",
            ],
        ],
        &[0.5, 5.0, 1.3, 3.3, 2.2],
        9.0,
    );

    s.text(
        Frame::inches(0.8, 4.5, 5.0, 0.35),
        "組織変革のステップ",
        Font::new(13.0, NAVY).bold(true),
    );

    let steps = [
        ("Month 1", "KPIオーナー\nアサイン", NAVY),
        ("Month 1-3", "PMM兼務\n設置", BLUE),
        ("Month 3-6", "RevOps兼務\n設置", LIGHT_BLUE),
        ("Month 6-12", "戦略採用\n3-5名", ACCENT),
        ("Month 12+", "専任化\n判断", GREY),
    ];
    let last = steps.len() - 1;
    for (i, (period, label, color)) in steps.into_iter().enumerate() {
        let x = 0.8 + i as f64 * 2.4;
        let y = 5.0;
        s.filled(Geometry::RoundRect, Frame::inches(x, y, 2.0, 1.3), color);
        s.text(
            Frame::inches(x + 0.1, y + 0.1, 1.8, 0.25),
            period,
            Font::new(8.0, WHITE).bold(true),
        );
        s.text_aligned(
            Frame::inches(x + 0.1, y + 0.4, 1.8, 0.8),
            label,
            Font::new(10.0, WHITE).bold(true),
            Align::Center,
        );
        if i < last {
            s.filled(
                Geometry::RightArrow,
                Frame::inches(x + 2.05, y + 0.4, 0.3, 0.35),
                LIGHT_GREY,
            );
        }
    }
    Ok(())
}

fn roadmap(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "3層実行ロードマップ（0-36ヶ月）",
        Some("止血 → 転換 → 成長"),
        Some(16),
    );
    s.image(
        "roadmap.png",
        inches(0.3),
        inches(1.5),
        ImageSize::Width(inches(12.5)),
    )?;
    Ok(())
}

fn kpi_tree(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "KPIツリーと経営モニタリング設計",
        Some("「測れないものは改善できない」— KPIオーナーを個人名で紐付け"),
        Some(17),
    );

    s.image(
        "kpi_tree.png",
        inches(0.3),
        inches(1.4),
        ImageSize::Width(inches(8.0)),
    )?;

    s.text(
        Frame::inches(8.5, 1.5, 4.0, 0.35),
        "ガバナンス体制",
        Font::new(13.0, NAVY).bold(true),
    );
    s.table(
        Frame::inches(8.5, 1.9, 4.3, 2.8),
        (5, 3),
        &[
            &["会議体", "頻度", "アジェンダ"],
            &["経営KPI\nレビュー", "月次", "KPI進捗・逸脱分析"],
            &["四半期戦略\nレビュー", "四半期", "ロードマップ進捗\n方針修正"],
            &["Gate\nReview", "M6,12,18", "戦略オプション\n移行判断"],
            &["スプリント\nレビュー", "隔週", "開発進捗\n優先度見直し"],
        ],
        &[1.3, 1.0, 2.0],
        8.0,
    );

    s.text(
        Frame::inches(8.5, 5.0, 4.0, 0.35),
        "KPIオーナー（主要）",
        Font::new(12.0, NAVY).bold(true),
    );
    s.table(
        Frame::inches(8.5, 5.4, 4.3, 1.5),
        (6, 3),
        &[
            &["KPI", "目標(FY25)", "オーナー"],
            &["ARR成長率", "+27%", "CEO"],
            &["NRR", "100%+", "CS責任者"],
            &["ARPA長期", "¥169K", "営業責任者"],
            &["解約率", "1.0%", "CS責任者"],
            &["営業DX", "¥33.4M", "DX責任者"],
        ],
        &[1.5, 1.3, 1.5],
        8.0,
    );
    Ok(())
}

fn decision_agenda(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "本会議での決議依頼事項",
        Some("今日決めなければ、「何もしない」という選択を自動的にしたことになる"),
        Some(18),
    );

    let decisions = [
        (
            "投資配分の承認",
            "プロダクト45% / GTM35% / 組織20%の投資比率",
            NAVY,
        ),
        (
            "ポジショニング転換の正式承認",
            "「ウェビナーツール」→「B2Bエンゲージメント・インテリジェンス基盤」",
            BLUE,
        ),
        (
            "組織再編の承認",
            "PMM兼務設置（即時）+ RevOps兼務（3ヶ月後）+ KPIオーナー制度",
            LIGHT_BLUE,
        ),
        ("90日実行計画の承認", "短期施策パッケージの着手", ACCENT),
        (
            "6ヶ月後Gate Reviewの設定",
            "KPI達成時の松案移行判断プロセス",
            GREY,
        ),
    ];

    for (i, (heading, desc, color)) in decisions.into_iter().enumerate() {
        let y = 1.5 + i as f64 * 1.05;
        s.filled(Geometry::Ellipse, Frame::inches(0.8, y, 0.55, 0.55), color);
        s.text_aligned(
            Frame::inches(0.82, y + 0.05, 0.55, 0.45),
            &(i + 1).to_string(),
            Font::new(18.0, WHITE).bold(true),
            Align::Center,
        );

        s.text(
            Frame::inches(1.6, y, 5.0, 0.35),
            heading,
            Font::new(14.0, NAVY).bold(true),
        );
        s.text(
            Frame::inches(1.6, y + 0.35, 8.0, 0.3),
            desc,
            Font::new(10.0, DARK_GREY),
        );

        s.filled(
            Geometry::RoundRect,
            Frame::inches(10.5, y + 0.05, 2.0, 0.45),
            color,
        );
        s.text_aligned(
            Frame::inches(10.5, y + 0.08, 2.0, 0.4),
            "承認を推奨",
            Font::new(10.0, WHITE).bold(true),
            Align::Center,
        );
    }

    s.text(
        Frame::inches(0.8, 6.6, 12.0, 0.4),
        "Next Steps（承認後の即時アクション）",
        Font::new(12.0, NAVY).bold(true),
    );
    s.text(
        Frame::inches(0.8, 6.95, 12.0, 0.35),
        "KPIオーナーアサイン（1週間） → PMM兼務者選定（2週間） → スコアMVP要件定義KO（2週間） → 月次レビュー初回設定（1週間）",
        Font::new(9.0, DARK_GREY),
    );
    Ok(())
}

fn qa_appendix(asm: &mut DeckAssembler) -> Result<()> {
    let mut s = asm.add_slide();
    s.header(
        "想定Q&A（厳しめの指摘への回答）",
        Some("Appendix"),
        Some(19),
    );

    s.table(
        Frame::inches(0.3, 1.5, 12.7, 5.3),
        (12, 3),
        &[
            &["#", "想定質問", "回答要旨"],
            &[
                "Q1",
                "30名でこの施策量を実行できるか？",
                "竹案で3施策に絞る。全部同時は不可。Gate Reviewで判断。",
            ],
            &[
                "Q2",
                "結局ウェビナーツールでは？",
                "ON24実証：40-50データpt→ROI12倍。データ構造化が本質的価値。",
            ],
            &[
                "Q3",
                "営業DX ¥327M(FY27)は現実的か？",
                "¥15M/半期がリトマス試験。未達ならピボット。",
            ],
            &[
                "Q4",
                "Zoom/Webex/Teamsに勝てるか？",
                "配信では勝てない。日本B2Bファネル最適化で差別化。",
            ],
            &[
                "Q5",
                "SF依存は危険では？",
                "30名で3CRM同時開発は不可。SF深化→中期でAPI-first→拡張。",
            ],
            &[
                "Q6",
                "解約率1.0%は達成可能か？",
                "FY22:3.6%→FY24:1.7%と改善中。ヘルススコア+標準化で可能。",
            ],
            &[
                "Q7",
                "PMM/RevOps兼務で機能するか？",
                "3ヶ月で解像度UP→専任化判断。CEO直轄で工数20%確保。",
            ],
            &[
                "Q8",
                "FY26-27計画は攻めすぎでは？",
                "竹案¥930Mがベースケース。営業DX未達時のダウンサイド準備要。",
            ],
            &[
                "Q9",
                "bizibl/FanGrowthとの差別化は？",
                "SF深度統合+データ構造化+Agentforce。ただし6-12ヶ月の猶予。",
            ],
            &[
                "Q10",
                "ウェビナー市場自体が縮小しない？",
                "企業ウェビナー数:13→47回/年。ハイブリッド化で需要増大。",
            ],
        ],
        &[0.5, 4.5, 7.7],
        8.0,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexpro_core::Shape;

    fn build(index: usize) -> DeckAssembler {
        let dir = tempfile::tempdir().unwrap();
        let mut asm = DeckAssembler::new(dir.path());
        (SLIDES[index].build)(&mut asm).unwrap();
        asm
    }

    #[test]
    fn test_registry_has_twenty_distinct_labels() {
        let mut labels: Vec<_> = SLIDES.iter().map(|s| s.label).collect();
        assert_eq!(labels.len(), 20);
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 20);
        assert_eq!(SLIDES[0].label, "Title");
        assert_eq!(SLIDES[19].label, "Q&A");
    }

    #[test]
    fn test_each_builder_appends_one_slide() {
        for (i, spec) in SLIDES.iter().enumerate() {
            let asm = build(i);
            assert_eq!(asm.deck().slide_count(), 1, "{}", spec.label);
        }
    }

    #[test]
    fn test_title_slide_has_no_badge() {
        let asm = build(0);
        let lines = asm.deck().slides[0].text_lines();
        assert_eq!(lines[0], "ネクプロ 全社戦略提案");
        assert!(!lines.iter().any(|l| l.ends_with("/20")));
        assert!(lines.iter().any(|l| l == "CONFIDENTIAL — 社外秘"));
    }

    #[test]
    fn test_badges_lag_slide_position_by_one() {
        for (i, spec) in SLIDES.iter().enumerate().skip(1) {
            let asm = build(i);
            let lines = asm.deck().slides[0].text_lines();
            let badge = format!("{}/20", i);
            assert!(lines.contains(&badge), "{} lacks {}", spec.label, badge);
        }
    }

    #[test]
    fn test_missing_charts_leave_slides_intact() {
        let asm = build(4);
        assert_eq!(asm.deck().slides[0].picture_count(), 0);
        assert_eq!(asm.deck().slides[0].table_count(), 1);
        assert_eq!(asm.missing_images(), ["mrr_arpa.png", "churn_rate.png"]);
    }

    #[test]
    fn test_strategy_options_highlight_middle() {
        let asm = build(11);
        let widths: Vec<_> = asm.deck().slides[0]
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::AutoShape(a) => match a.outline {
                    nexpro_core::Outline::Solid { width, .. } => width,
                    _ => None,
                },
                _ => None,
            })
            .collect();
        assert_eq!(
            widths,
            vec![nexpro_core::points(1.0), nexpro_core::points(2.0), nexpro_core::points(1.0)]
        );
    }

    #[test]
    fn test_decision_agenda_numbers_circles() {
        let asm = build(18);
        let lines = asm.deck().slides[0].text_lines();
        for n in 1..=5 {
            assert!(lines.contains(&n.to_string()));
        }
        assert_eq!(lines.iter().filter(|l| *l == "承認を推奨").count(), 5);
    }

    #[test]
    fn test_qa_table_dimensions() {
        let asm = build(19);
        let Some(Shape::Table(table)) = asm.deck().slides[0]
            .shapes
            .iter()
            .find(|s| matches!(s, Shape::Table(_)))
        else {
            panic!("Q&A slide has no table");
        };
        // One trailing blank row below Q10.
        assert_eq!(table.row_count(), 12);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.rows[10][0].body.plain_text(), "Q10");
        assert_eq!(table.rows[11][2].body.plain_text(), "");
    }
}
