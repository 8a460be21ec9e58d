//! End-to-end runs with the real AVIF encoder.
//!
//! Builds small part trees on disk, runs them through `collect`, and reads the
//! generated module back: every string literal must be base64 AVIF that
//! decodes to the source dimensions.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{ImageFormat, Rgba, RgbaImage};
use robo_parts::collect::{self, CollectError};
use robo_parts::config::{ProcessingConfig, RunConfig};
use robo_parts::emit::EmitError;
use robo_parts::imaging::decode_avif;
use robo_parts::stacking::StackingOrder;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const WIDTH: u32 = 24;
const HEIGHT: u32 = 16;

fn write_part(path: &Path, shade: u8) {
    let img = RgbaImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let alpha = if (x + y) % 5 == 0 { 0 } else { 255 };
        Rgba([shade, (x * 10) as u8, (y * 15) as u8, alpha])
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

fn tree(root_name: &str, dirs: &[(&str, usize)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (dir, count) in dirs {
        let dir = tmp.path().join(root_name).join(dir);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..*count {
            write_part(&dir.join(format!("{i:03}.png")), (i * 60) as u8);
        }
    }
    tmp
}

fn run(tmp: &TempDir, root_name: &str) -> RunConfig {
    RunConfig {
        name: root_name.to_string(),
        source: tmp.path().join(root_name),
        output: tmp.path().join("generated/parts.rs"),
    }
}

fn verified() -> ProcessingConfig {
    ProcessingConfig {
        max_processes: None,
        verify: true,
    }
}

/// Every `"..."` literal inside the named array.
fn literals_of<'a>(text: &'a str, label: &str) -> Vec<&'a str> {
    let start = text
        .find(&format!("pub const {label}: "))
        .unwrap_or_else(|| panic!("no array named {label}"));
    let body = &text[start..];
    let body = &body[..body.find("];").unwrap()];
    body.lines()
        .filter_map(|line| line.trim().strip_prefix('"'))
        .filter_map(|line| line.strip_suffix("\","))
        .collect()
}

#[test]
fn layered_tree_generates_decodable_module() {
    let tmp = tree("parts", &[("hat#2", 3), ("face#1", 2)]);
    let run = run(&tmp, "parts");

    let report = collect::collect(&run, &verified(), None).unwrap();

    assert_eq!(report.order, StackingOrder::Layered);
    assert_eq!(report.width, 3);

    let text = fs::read_to_string(&run.output).unwrap();
    assert!(text.contains("pub static PARTS: [[&str; 3]; 2] = [FACE, HAT];"));
    assert!(text.contains("pub static PARTS_LENGTH: [u8; 2] = [2, 3];"));

    let face = literals_of(&text, "FACE");
    let hat = literals_of(&text, "HAT");
    assert_eq!(face.len(), 2);
    assert_eq!(hat.len(), 3);

    for literal in face.iter().chain(&hat) {
        let bytes = STANDARD.decode(literal).unwrap();
        let decoded = decode_avif(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (WIDTH, HEIGHT));
    }
}

#[test]
fn padding_is_the_empty_sentinel() {
    let tmp = tree("parts", &[("face#1", 1), ("hat#2", 3)]);
    let run = run(&tmp, "parts");

    collect::collect(&run, &ProcessingConfig::default(), None).unwrap();

    let text = fs::read_to_string(&run.output).unwrap();
    let start = text.find("pub const FACE: [&str; 3] = [").unwrap();
    let face = &text[start..];
    let face = &face[..face.find("];").unwrap()];
    assert_eq!(face.matches("    EMPTY,").count(), 2);
}

#[test]
fn distinct_images_get_distinct_encodings() {
    let tmp = tree("parts", &[("face#1", 3)]);
    let run = run(&tmp, "parts");

    collect::collect(&run, &ProcessingConfig::default(), None).unwrap();

    let text = fs::read_to_string(&run.output).unwrap();
    let mut face = literals_of(&text, "FACE");
    face.sort();
    face.dedup();
    assert_eq!(face.len(), 3);
}

#[test]
fn reruns_are_byte_identical() {
    let tmp = tree("parts", &[("face#1", 2), ("hat#2", 1)]);
    let run = run(&tmp, "parts");

    collect::collect(&run, &ProcessingConfig::default(), None).unwrap();
    let first = fs::read(&run.output).unwrap();
    collect::collect(&run, &ProcessingConfig::default(), None).unwrap();
    let second = fs::read(&run.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn corrupt_image_aborts_without_output() {
    let tmp = tree("parts", &[("face#1", 2)]);
    fs::write(tmp.path().join("parts/face#1/999.png"), b"not a png").unwrap();
    let run = run(&tmp, "parts");

    let result = collect::collect(&run, &ProcessingConfig::default(), None);

    assert!(matches!(result, Err(CollectError::Assemble(_))));
    assert!(!run.output.exists());
}

#[test]
fn colliding_categories_abort_without_output() {
    let tmp = tree("parts", &[("catA#1", 2), ("catA#2", 3)]);
    let run = run(&tmp, "parts");

    let plan = collect::plan(&run.source).unwrap();
    assert_eq!(plan.width, 3);
    let lengths: Vec<usize> = plan.categories.iter().map(|c| c.true_count()).collect();
    assert_eq!(lengths, vec![2, 3]);

    let result = collect::collect(&run, &ProcessingConfig::default(), None);

    assert!(matches!(
        result,
        Err(CollectError::Emit(EmitError::NameCollision { .. }))
    ));
    assert!(!run.output.exists());
}
