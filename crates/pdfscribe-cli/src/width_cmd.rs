use std::sync::Arc;

use pdfscribe::{FontRegistry, PdfError, StandardMetrics};

/// Print the width of `text` in points.
pub fn run(text: &str, font: &str, size: f64) -> Result<(), i32> {
    if !(size > 0.0 && size.is_finite()) {
        eprintln!("Error: font size must be positive, got {size}");
        return Err(1);
    }
    let registry = FontRegistry::new(Arc::new(StandardMetrics::new()));
    let handle = registry.load(font).map_err(|e| {
        match e {
            PdfError::NotFound(name) => eprintln!("Error: unknown font: {name}"),
            other => eprintln!("Error: {other}"),
        }
        1
    })?;
    let width = handle.metrics().text_width(text.as_bytes(), size);
    println!("{width:.2}");
    Ok(())
}
