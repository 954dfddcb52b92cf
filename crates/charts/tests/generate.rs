use nexpro_charts::{ChartGenerator, CHARTS};
use resvg::usvg::{Group, Node, Tree};
use std::fs;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[test]
fn generates_all_ten_pngs() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chart_images");
    let generator = ChartGenerator::new(&out).unwrap();

    let artifacts = generator.generate_all().unwrap();
    assert_eq!(artifacts.len(), 10);

    for (artifact, spec) in artifacts.iter().zip(CHARTS.iter()) {
        assert_eq!(artifact.file_name, spec.file_name);
        let bytes = fs::read(out.join(spec.file_name)).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);
        assert_eq!(bytes.len(), artifact.bytes);
    }

    let mut names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    let mut expected: Vec<&str> = CHARTS.iter().map(|spec| spec.file_name).collect();
    expected.sort();
    assert_eq!(names, expected);
}

#[test]
fn png_dimensions_follow_figure_size() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ChartGenerator::new(dir.path()).unwrap();
    let artifact = generator.generate(&CHARTS[0]).unwrap();

    // revenue_trend is 10 x 5.5 inches at 200 DPI.
    assert_eq!((artifact.width_px, artifact.height_px), (2000, 1100));

    let decoder = png::Decoder::new(fs::File::open(&artifact.path).unwrap());
    let reader = decoder.read_info().unwrap();
    assert_eq!(reader.info().width, 2000);
    assert_eq!(reader.info().height, 1100);
}

#[test]
fn rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ChartGenerator::new(dir.path()).unwrap();

    for spec in CHARTS.iter() {
        generator.generate(spec).unwrap();
        let first = fs::read(dir.path().join(spec.file_name)).unwrap();
        generator.generate(spec).unwrap();
        let second = fs::read(dir.path().join(spec.file_name)).unwrap();
        assert!(first == second, "{} changed between runs", spec.file_name);
    }
}

#[test]
fn chart_text_is_drawn() {
    let dir = tempfile::tempdir().unwrap();
    let generator = ChartGenerator::new(dir.path()).unwrap();
    let options = generator.rasterizer().options();
    if options.fontdb.faces().next().is_none() {
        return;
    }

    let figure = (CHARTS[0].build)();
    let with_text = Tree::from_data(figure.to_svg().as_bytes(), options).unwrap();
    let without_text: String = figure
        .to_svg()
        .lines()
        .filter(|line| !line.trim_start().starts_with("<text "))
        .collect::<Vec<_>>()
        .join("\n");
    let without_text = Tree::from_data(without_text.as_bytes(), options).unwrap();

    assert!(count_text(with_text.root()) > 0);
    assert_eq!(count_text(without_text.root()), 0);
}

fn count_text(group: &Group) -> usize {
    group
        .children()
        .iter()
        .map(|node| match node {
            Node::Group(g) => count_text(g),
            Node::Text(t) => t.flattened().children().len(),
            _ => 0,
        })
        .sum()
}
