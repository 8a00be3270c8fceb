use std::fs;
use std::path::Path;

use pdfscribe::{Phase, WriteOptions};

use crate::script::{Runner, Script};

/// Run `script` into `output`.
///
/// Stops at the first failing step, reporting its 1-based number. The
/// document is closed at the end unless the script closed it itself.
pub fn run(script: &Path, output: &Path, pdf_version: &str, no_compress: bool) -> Result<(), i32> {
    let text = fs::read_to_string(script).map_err(|e| {
        eprintln!("Error: cannot read script {}: {e}", script.display());
        1
    })?;
    let script_data: Script = serde_json::from_str(&text).map_err(|e| {
        eprintln!("Error: invalid script {}: {e}", script.display());
        1
    })?;

    let write = WriteOptions {
        version: pdf_version.to_string(),
        compress: !no_compress,
        ..WriteOptions::default()
    };
    let mut session = pdfscribe::create_with_options(output, script_data.options, write);
    let base_dir = script.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    let mut runner = Runner::new(&mut session, base_dir);

    for (i, step) in script_data.steps.iter().enumerate() {
        match runner.run(step) {
            Ok(Some(left_over)) if left_over > 0 => {
                eprintln!("Warning: step {} ({}): {left_over} characters did not fit", i + 1, step.name());
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: step {} ({}): {e}", i + 1, step.name());
                return Err(1);
            }
        }
    }

    if session.phase() != Phase::Closed {
        session.close().map_err(|e| {
            eprintln!("Error: failed to write {}: {e}", output.display());
            1
        })?;
    }
    println!(
        "Wrote {} page(s) to {}",
        session.document().page_count(),
        output.display()
    );
    Ok(())
}
