use nexpro_charts::ChartGenerator;
use nexpro_deck::{assemble, assemble_with, SLIDES, TOTAL_SLIDES};
use nexpro_pptx::PptxReader;
use std::fs;

const HEADER_TITLES: [&str; 19] = [
    "エグゼクティブサマリー",
    "外部環境：AIエージェント時代の産業変化",
    "自社現状①：売上推移と構成",
    "自社現状②：SaaS KPI分析",
    "自社現状③：顧客基盤と新収益柱",
    "戦略的SWOT分析",
    "競合比較表",
    "Positioning Map 1: 機能深度 × 日本企業適合性",
    "Positioning Map 2: データ活用高度性 × 導入ハードル",
    "重要課題のMECE整理",
    "戦略オプション比較（3案）",
    "推奨戦略：「竹」→「松」段階移行",
    "重点施策A：プロダクト（AI/データ基盤）",
    "重点施策B：GTM（営業・CS・価格）",
    "重点施策C：組織再編",
    "3層実行ロードマップ（0-36ヶ月）",
    "KPIツリーと経営モニタリング設計",
    "本会議での決議依頼事項",
    "想定Q&A（厳しめの指摘への回答）",
];

/// 1-based slide number and pictures expected once all charts exist.
const PICTURES: [(usize, usize); 8] = [
    (3, 1),
    (4, 1),
    (5, 2),
    (6, 2),
    (9, 1),
    (10, 1),
    (17, 1),
    (18, 1),
];

#[test]
fn empty_chart_dir_still_builds_twenty_slides() {
    let dir = tempfile::tempdir().unwrap();
    let mut seen = Vec::new();
    let asm = assemble_with(dir.path(), |n, spec| seen.push((n, spec.label))).unwrap();

    assert_eq!(asm.deck().slide_count(), TOTAL_SLIDES);
    assert!(asm.deck().slides.iter().all(|s| s.picture_count() == 0));
    assert_eq!(asm.missing_images().len(), 10);
    assert_eq!(seen.len(), 20);
    assert_eq!(seen[0], (1, "Title"));
    assert_eq!(seen[19], (20, SLIDES[19].label));
}

#[test]
fn written_deck_reads_back_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let charts = dir.path().join("chart_images");
    ChartGenerator::new(&charts).unwrap().generate_all().unwrap();

    let asm = assemble(&charts).unwrap();
    assert!(asm.missing_images().is_empty());

    let path = dir.path().join("deck.pptx");
    let artifact = asm.write(&path).unwrap();
    assert_eq!(artifact.package.slides, 20);
    assert_eq!(artifact.package.pictures, 10);
    assert_eq!(artifact.package.media, 10);
    assert_eq!(artifact.bytes, fs::metadata(&path).unwrap().len());

    let outline = PptxReader::new().read_path(&path).unwrap();
    assert_eq!(outline.slide_count(), 20);

    let titles = outline.titles();
    assert_eq!(titles[0], "ネクプロ 全社戦略提案");
    assert_eq!(&titles[1..], &HEADER_TITLES[..]);

    for slide in &outline.slides {
        let expected = PICTURES
            .iter()
            .find(|(n, _)| *n == slide.number)
            .map(|(_, count)| *count)
            .unwrap_or(0);
        assert_eq!(slide.pictures, expected, "slide {}", slide.number);
    }
    assert_eq!(outline.slides[1].tables, 1);
    assert_eq!(outline.slides[14].tables, 2);
    assert_eq!(outline.slides[17].tables, 2);
    assert!(outline.slides[19].contains("Q10"));
}

#[test]
fn rebuilding_gives_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.pptx");
    let b = dir.path().join("b.pptx");

    assemble(dir.path()).unwrap().write(&a).unwrap();
    assemble(dir.path()).unwrap().write(&b).unwrap();

    assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
}
