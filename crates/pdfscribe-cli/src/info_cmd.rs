use std::path::Path;

use pdfscribe::{Pdf, PdfError};

use crate::cli::OutputFormat;

pub fn run(file: &Path, format: &OutputFormat) -> Result<(), i32> {
    let pdf = Pdf::open_file(file).map_err(|e| {
        match e {
            PdfError::NotFound(_) => eprintln!("Error: file not found: {}", file.display()),
            other => eprintln!("Error: failed to open PDF: {other}"),
        }
        1
    })?;

    match format {
        OutputFormat::Text => {
            println!("Pages: {}", pdf.page_count());
            for (i, page) in pdf.pages().iter().enumerate() {
                println!("  Page {}: {:.2} x {:.2}", i + 1, page.width(), page.height());
            }
            if !pdf.info().is_empty() {
                println!();
                println!("Info:");
                for (key, value) in pdf.info().iter() {
                    println!("  {key}: {value}");
                }
            }
            if !pdf.outlines().is_empty() {
                println!();
                println!("Outlines:");
                for outline in pdf.outlines() {
                    println!("  {} (page {})", outline.title, outline.page_index + 1);
                }
            }
        }
        OutputFormat::Json => {
            let pages: Vec<_> = pdf
                .pages()
                .iter()
                .enumerate()
                .map(|(i, page)| {
                    serde_json::json!({
                        "page": i + 1,
                        "width": page.width(),
                        "height": page.height(),
                    })
                })
                .collect();
            let info: serde_json::Map<String, serde_json::Value> = pdf
                .info()
                .iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                .collect();
            let outlines: Vec<_> = pdf
                .outlines()
                .iter()
                .map(|o| serde_json::json!({ "title": o.title, "page": o.page_index + 1 }))
                .collect();
            let output = serde_json::json!({
                "page_count": pdf.page_count(),
                "pages": pages,
                "info": info,
                "outlines": outlines,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).map_err(|e| {
                    eprintln!("Error: {e}");
                    1
                })?
            );
        }
    }
    Ok(())
}
