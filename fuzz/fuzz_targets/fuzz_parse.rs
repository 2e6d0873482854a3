#![no_main]

use libfuzzer_sys::fuzz_target;
use png_text_io::{ChunkScanner, Chunks, MetadataView, ScanOptions, TextEncoding};

fuzz_target!(|data: &[u8]| {
    // Any input must scan to completion without panicking
    let metadata = png_text_io::extract_metadata(data);

    // The walker must stay inside the buffer
    for chunk in Chunks::new(data) {
        assert!(chunk.end_offset() <= data.len());
    }

    // Every option combination is equally safe
    let strict = ScanOptions::new()
        .check_signature(true)
        .verify_crc(true)
        .stop_at_iend(true)
        .encoding(TextEncoding::Utf8Strict);
    let _ = ChunkScanner::with_options(strict).scan(data);
    let _ = ChunkScanner::with_options(ScanOptions::new().encoding(TextEncoding::Latin1)).collect(data);

    // Serialization must accept whatever text was decoded
    let _ = serde_json::to_string(&metadata);

    // Display path, including JSON pretty-printing
    let view = MetadataView::split(&metadata);
    let _ = view.to_string();
    let _ = view.copy_text();
});
