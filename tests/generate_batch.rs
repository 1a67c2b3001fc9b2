use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

use topicqr::{Error, Generator, QrDecoder, TopicEntry, TopicQrConfig, topic_key};

const BASE_URL: &str = "https://example.test/repo";

fn round_logo(dir: &Path) -> PathBuf {
    let size = 64u32;
    let radius = size as f32 / 2.0;
    let logo = RgbaImage::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - radius;
        let dy = y as f32 + 0.5 - radius;
        if dx * dx + dy * dy <= radius * radius {
            Rgba([20, 90, 200, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let path = dir.join("icon.png");
    logo.save(&path).expect("write logo");
    path
}

fn opaque_logo(dir: &Path) -> PathBuf {
    let path = dir.join("icon_rgb.png");
    RgbImage::from_pixel(48, 48, Rgb([200, 40, 40]))
        .save(&path)
        .expect("write logo");
    path
}

fn config_for(tmp: &TempDir, logo_path: PathBuf) -> TopicQrConfig {
    TopicQrConfig {
        logo_path,
        output_folder: tmp.path().join("assets").join("qrcodes"),
        base_url: BASE_URL.to_string(),
        ..TopicQrConfig::default()
    }
}

fn png_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .expect("read output dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".png"))
        .collect()
}

#[test]
fn writes_one_file_per_topic() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_for(&tmp, round_logo(tmp.path()));

    let generator = Generator::setup(&config).expect("setup");
    let report = generator.run(&config.base_url, &config.topics).expect("run");

    let expected: BTreeSet<String> = ["Citizenship.png", "Mensa.png", "Transportation.png"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(png_names(&config.output_folder), expected);

    let labels: Vec<&str> = report.codes.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, ["Mensa", "Transportation", "Citizenship"]);
    assert!(report.codes.iter().all(|c| c.verified && c.masked));
}

#[test]
fn decoded_payloads_match_topics() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_for(&tmp, round_logo(tmp.path()));

    Generator::setup(&config)
        .and_then(|g| g.run(&config.base_url, &config.topics))
        .expect("run");

    let decoder = QrDecoder::new();
    for entry in &config.topics {
        let path = config.output_folder.join(entry.file_name());
        let image = image::open(&path).expect("open generated code");
        let decoded = decoder.decode(&image).expect("decode generated code");

        assert_eq!(decoded.text, format!("{BASE_URL}?topic={}", entry.url_suffix));
        assert_eq!(topic_key(&decoded.text), Some(entry.url_suffix.as_str()));
    }
}

#[test]
fn logo_is_centered_on_square_image() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_for(&tmp, opaque_logo(tmp.path()));

    let generator = Generator::setup(&config).expect("setup");
    let report = generator.run(&config.base_url, &config.topics).expect("run");

    for code in &report.codes {
        let image = image::open(&code.path).expect("open").to_rgb8();
        let (w, h) = image.dimensions();
        assert_eq!(w, h);
        assert_eq!(w, code.width);

        let size = (f64::from(w) * 0.25).floor() as u32;
        assert_eq!(code.logo.size, size);
        assert_eq!((code.logo.x, code.logo.y), ((w - size) / 2, (h - size) / 2));
        assert!(!code.masked);

        // Opaque logo covers its whole bounding box.
        let (x, y) = (code.logo.x, code.logo.y);
        assert_eq!(*image.get_pixel(x, y), Rgb([200, 40, 40]));
        assert_eq!(*image.get_pixel(x + size - 1, y + size - 1), Rgb([200, 40, 40]));
        assert_eq!(*image.get_pixel(w / 2, h / 2), Rgb([200, 40, 40]));
    }
}

#[test]
fn rerun_is_deterministic_and_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_for(&tmp, round_logo(tmp.path()));
    let generator = Generator::setup(&config).expect("setup");

    generator.run(&config.base_url, &config.topics).expect("first run");
    let first: Vec<RgbImage> = config
        .topics
        .iter()
        .map(|t| {
            image::open(config.output_folder.join(t.file_name()))
                .unwrap()
                .to_rgb8()
        })
        .collect();
    let names = png_names(&config.output_folder);

    generator.run(&config.base_url, &config.topics).expect("second run");
    let second: Vec<RgbImage> = config
        .topics
        .iter()
        .map(|t| {
            image::open(config.output_folder.join(t.file_name()))
                .unwrap()
                .to_rgb8()
        })
        .collect();

    assert_eq!(first, second);
    assert_eq!(png_names(&config.output_folder), names);
}

#[test]
fn missing_logo_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_for(&tmp, tmp.path().join("missing.png"));

    match Generator::setup(&config) {
        Err(Error::MissingLogo { path, .. }) => assert_eq!(path, config.logo_path),
        Err(other) => panic!("expected MissingLogo, got {other}"),
        Ok(_) => panic!("setup should fail without a logo"),
    }

    assert!(!config.output_folder.exists());
}

#[test]
fn single_topic_scenario() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config_for(&tmp, round_logo(tmp.path()));
    config.topics = vec![TopicEntry::new("Mensa", "mensa")];

    let generator = Generator::setup(&config).expect("setup");
    let report = generator.run(&config.base_url, &config.topics).expect("run");

    assert_eq!(report.codes.len(), 1);
    assert_eq!(
        report.codes[0].payload,
        "https://example.test/repo?topic=mensa"
    );
    assert_eq!(
        png_names(&config.output_folder),
        BTreeSet::from(["Mensa.png".to_string()])
    );

    // Center of the round logo is opaque and distinct from the QR colors.
    let image = image::open(&report.codes[0].path).unwrap().to_rgb8();
    let (w, h) = image.dimensions();
    assert_eq!(*image.get_pixel(w / 2, h / 2), Rgb([20, 90, 200]));
}

#[test]
fn invalid_topics_fail_before_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = config_for(&tmp, round_logo(tmp.path()));
    config.topics = vec![TopicEntry::new("../escape", "x")];

    assert!(matches!(
        Generator::setup(&config),
        Err(Error::InvalidTopic(_))
    ));
    assert!(!config.output_folder.exists());
}

#[test]
fn write_failure_aborts_and_keeps_earlier_files() {
    let tmp = tempfile::tempdir().unwrap();
    let config = config_for(&tmp, round_logo(tmp.path()));
    let generator = Generator::setup(&config).expect("setup");

    // A directory squatting on the second entry's file name blocks the write.
    let blocker = config.output_folder.join("Transportation.png");
    fs::create_dir(&blocker).expect("create blocking dir");

    match generator.run(&config.base_url, &config.topics) {
        Err(Error::FileWrite { path, .. }) => assert_eq!(path, blocker),
        Err(other) => panic!("expected FileWrite, got {other}"),
        Ok(_) => panic!("run should fail on an unwritable file"),
    }

    assert!(config.output_folder.join("Mensa.png").is_file());
    assert!(blocker.is_dir());
    assert!(!config.output_folder.join("Citizenship.png").exists());
}
