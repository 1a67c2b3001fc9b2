//! Generate a single branded topic QR code into ./qr_demo
//!
//! Usage: cargo run --example generate_single -- <logo.png>

use std::path::Path;
use topicqr::{Generator, Logo, RenderOptions, TopicEntry, topic_key};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let logo_path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: generate_single <logo.png>"))?;
    let logo = Logo::load(Path::new(&logo_path))?;

    let generator = Generator::new(RenderOptions::default(), logo, "qr_demo");
    topicqr::generator::ensure_output_folder(generator.output_folder())?;

    let entry = TopicEntry::new("Mensa", "mensa");
    let payload = entry.payload("https://example.test/repo");
    let code = generator.generate(&entry.label, &payload)?;

    println!(
        "✓ {} written ({}x{} px, version {})",
        code.path.display(),
        code.width,
        code.width,
        code.version
    );
    println!("  Topic key: {}", topic_key(&code.payload).unwrap_or("<none>"));

    Ok(())
}
