//! Example: Show the generation parameters stored in a PNG
//!
//! Prints the chunk layout, then the highlighted parameters and the rest of
//! the text metadata. Set `RUST_LOG=png_text_io=trace` to see the scan.
//!
//! Run: `cargo run --example inspect --features serde -- <file.png> [--strict] [--json]`

use png_text_io::{ChunkScanner, Chunks, MetadataView, PngAsset, ScanOptions};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() -> png_text_io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <image.png> [--strict] [--json]", args[0]);
        std::process::exit(1);
    }

    let filename = &args[1];
    let strict = args.iter().any(|a| a == "--strict");
    let json = args.iter().any(|a| a == "--json");

    let asset = PngAsset::open(filename)?;
    println!("Parsing: {} ({}, {} bytes)", filename, asset.media_type(), asset.bytes().len());

    println!("\nChunks:");
    for (i, chunk) in Chunks::new(asset.bytes()).enumerate() {
        let crc = if chunk.crc_matches() { "ok" } else { "BAD" };
        println!(
            "  [{:3}] {:6} at offset {:8}, size {:8}, crc {}",
            i,
            chunk.type_str(),
            chunk.offset,
            chunk.length(),
            crc
        );
    }

    let options = ScanOptions::new()
        .check_signature(strict)
        .verify_crc(strict)
        .stop_at_iend(strict);
    let metadata = asset.metadata_with(&ChunkScanner::with_options(options))?;

    if json {
        match serde_json::to_string(&metadata) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Failed to serialize metadata: {}", e),
        }
        return Ok(());
    }

    if metadata.is_empty() {
        println!("\n✗ No tEXt metadata found");
        return Ok(());
    }

    println!();
    print!("{}", MetadataView::split(&metadata));

    Ok(())
}
