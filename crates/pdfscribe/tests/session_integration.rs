//! End-to-end tests: drive a session, close it, and inspect the written file
//! with lopdf and with [`Pdf`].

use std::path::Path;

use lopdf::content::Content;
use lopdf::Object;
use pdfscribe::{DocumentOrigin, Pdf, SessionOptions, WriteOptions, create, create_with_options};

// --- helpers ---

fn number(obj: &Object) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => f64::from(*r),
        other => panic!("not a number: {other:?}"),
    }
}

/// Operators and numeric operands of the 1-based page `number`.
fn page_ops(path: &Path, page: u32) -> Vec<(String, Vec<Object>)> {
    let doc = lopdf::Document::load(path).unwrap();
    let page_id = doc.get_pages()[&page];
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
    content
        .operations
        .into_iter()
        .map(|op| (op.operator, op.operands))
        .collect()
}

/// Resources dictionary of the 1-based page `number`, resolving references.
fn resource_entries(doc: &lopdf::Document, page: u32, kind: &[u8]) -> Vec<lopdf::Dictionary> {
    let page_id = doc.get_pages()[&page];
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    resources
        .get(kind)
        .unwrap()
        .as_dict()
        .unwrap()
        .iter()
        .map(|(_, value)| {
            let id = value.as_reference().unwrap();
            match doc.get_object(id).unwrap() {
                Object::Dictionary(dict) => dict.clone(),
                Object::Stream(stream) => stream.dict.clone(),
                other => panic!("unexpected resource {other:?}"),
            }
        })
        .collect()
}

fn operators(ops: &[(String, Vec<Object>)]) -> Vec<&str> {
    ops.iter().map(|(op, _)| op.as_str()).collect()
}

fn operands_of<'a>(ops: &'a [(String, Vec<Object>)], operator: &str) -> Vec<&'a [Object]> {
    ops.iter()
        .filter(|(op, _)| op == operator)
        .map(|(_, args)| args.as_slice())
        .collect()
}

fn numbers(args: &[Object]) -> Vec<f64> {
    args.iter().map(number).collect()
}

// --- lifecycle ---

#[test]
fn one_page_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("letter.pdf");

    let mut session = create(&path);
    session.begin_page(612.0, 792.0).unwrap();
    session.end_page().unwrap();
    session.close().unwrap();

    let pdf = Pdf::open_file(&path).unwrap();
    assert_eq!(pdf.page_count(), 1);
    let page = pdf.page(0).unwrap();
    assert_eq!((page.width(), page.height()), (612.0, 792.0));
    assert_eq!(pdf.origin(), &DocumentOrigin::Loaded);
}

#[test]
fn reopening_appends_after_existing_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grow.pdf");

    let mut first = create(&path);
    first.begin_page(612.0, 792.0).unwrap();
    first.set_font("Courier", 10.0, "host").unwrap();
    first.show_xy("first page", 72.0, 700.0).unwrap();
    first.close().unwrap();

    let mut second = create(&path);
    assert!(second.document().is_loaded());
    assert_eq!(second.document().page_count(), 1);
    second.begin_page(300.0, 400.0).unwrap();
    second.close().unwrap();

    let pdf = Pdf::open_file(&path).unwrap();
    let sizes: Vec<_> = pdf.pages().iter().map(|p| (p.width(), p.height())).collect();
    assert_eq!(sizes, vec![(612.0, 792.0), (300.0, 400.0)]);

    // The carried-over page keeps its original content.
    let ops = page_ops(&path, 1);
    let shown = operands_of(&ops, "Tj");
    assert!(matches!(&shown[0][0], Object::String(bytes, _) if bytes == b"first page"));
}

#[test]
fn unreadable_file_is_replaced_by_recovered_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.pdf");
    std::fs::write(&path, b"this is not a PDF").unwrap();

    let mut session = create(&path);
    assert!(matches!(
        session.document().origin(),
        DocumentOrigin::Recovered { .. }
    ));
    session.begin_page(200.0, 200.0).unwrap();
    session.close().unwrap();

    let pdf = Pdf::open_file(&path).unwrap();
    assert_eq!(pdf.page_count(), 1);
}

#[test]
fn operations_after_close_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = create(dir.path().join("closed.pdf"));
    session.close().unwrap();
    assert!(session.begin_page(612.0, 792.0).unwrap_err().is_invalid_state());
    assert!(session.close().unwrap_err().is_invalid_state());
}

#[test]
fn close_into_missing_directory_keeps_session_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.pdf");
    let mut session = create(&path);
    session.begin_page(100.0, 100.0).unwrap();

    let err = session.close().unwrap_err();
    assert!(matches!(err, pdfscribe::PdfError::IoError(_)));
    // Still usable after the failed write.
    session.begin_page(100.0, 100.0).unwrap();
}

// --- drawing ---

#[test]
fn gray_rectangle_fill_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fill.pdf");

    let mut session = create(&path);
    session.begin_page(612.0, 792.0).unwrap();
    session.setgray_fill(0.5).unwrap();
    session.rect(10.0, 20.0, 30.0, 40.0).unwrap();
    session.fill().unwrap();
    session.close().unwrap();

    let ops = page_ops(&path, 1);
    assert_eq!(operators(&ops), vec!["g", "re", "f"]);
    assert_eq!(numbers(operands_of(&ops, "g")[0]), vec![0.5]);
    assert_eq!(numbers(operands_of(&ops, "re")[0]), vec![10.0, 20.0, 30.0, 40.0]);
}

#[test]
fn stroked_line_and_translation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("line.pdf");

    let mut session = create(&path);
    session.begin_page(612.0, 792.0).unwrap();
    session.save().unwrap();
    session.translate(100.0, 50.0).unwrap();
    session.moveto(0.0, 0.0).unwrap();
    session.lineto(10.0, 10.0).unwrap();
    session.stroke().unwrap();
    session.restore().unwrap();
    session.close().unwrap();

    let ops = page_ops(&path, 1);
    assert_eq!(operators(&ops), vec!["q", "cm", "m", "l", "S", "Q"]);
    assert_eq!(
        numbers(operands_of(&ops, "cm")[0]),
        vec![1.0, 0.0, 0.0, 1.0, 100.0, 50.0]
    );
}

#[test]
fn unbalanced_save_is_closed_at_end_of_page() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("balanced.pdf");

    let mut session = create(&path);
    session.begin_page(612.0, 792.0).unwrap();
    session.save().unwrap();
    session.save().unwrap();
    session.close().unwrap();

    let ops = page_ops(&path, 1);
    assert_eq!(operators(&ops), vec!["q", "q", "Q", "Q"]);
}

#[test]
fn clip_is_written_and_suppresses_outside_fills() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clip.pdf");

    let mut session = create(&path);
    session.begin_page(612.0, 792.0).unwrap();
    session.rect(0.0, 0.0, 100.0, 100.0).unwrap();
    session.clip().unwrap();
    session.rect(200.0, 200.0, 10.0, 10.0).unwrap();
    session.fill().unwrap();
    session.rect(50.0, 50.0, 100.0, 100.0).unwrap();
    session.fill().unwrap();

    let page = session.active_page().unwrap();
    assert_eq!(
        page.visible_regions(),
        vec![pdfscribe::BBox::new(50.0, 50.0, 100.0, 100.0)]
    );

    session.moveto(0.0, 0.0).unwrap();
    session.lineto(5.0, 5.0).unwrap();
    assert!(session.clip().unwrap_err().is_unsupported());
    session.close().unwrap();

    let ops = page_ops(&path, 1);
    assert_eq!(
        operators(&ops),
        vec!["re", "W", "n", "re", "f", "re", "f"]
    );
}

// --- text ---

#[test]
fn text_uses_standard_font_resource() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("text.pdf");

    let mut session = create(&path);
    session.begin_page(612.0, 792.0).unwrap();
    session.set_font("Helvetica-Bold", 12.0, "host").unwrap();
    session.show_xy("Hello", 72.0, 720.0).unwrap();
    session.continue_text("World").unwrap();
    session.close().unwrap();

    let ops = page_ops(&path, 1);
    let positions: Vec<_> = operands_of(&ops, "Td").into_iter().map(numbers).collect();
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[0], vec![72.0, 720.0]);
    assert!((positions[1][1] - (720.0 - 14.4)).abs() < 1e-3);

    let doc = lopdf::Document::load(&path).unwrap();
    let base_fonts: Vec<_> = resource_entries(&doc, 1, b"Font")
        .iter()
        .map(|font| font.get(b"BaseFont").unwrap().as_name().unwrap().to_vec())
        .collect();
    assert_eq!(base_fonts, vec![b"Helvetica-Bold".to_vec()]);
}

#[test]
fn font_set_before_first_page_applies_to_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deferred.pdf");

    let mut session = create(&path);
    session.set_font("Times-Roman", 9.0, "host").unwrap();
    session.begin_page(612.0, 792.0).unwrap();
    session.show_xy("x", 10.0, 10.0).unwrap();
    session.close().unwrap();

    let ops = page_ops(&path, 1);
    assert_eq!(operators(&ops)[0], "Tf");
}

#[test]
fn stringwidth_follows_courier_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = create(dir.path().join("width.pdf"));
    session.set_font("Courier", 12.0, "host").unwrap();
    let one = session.stringwidth("A").unwrap();
    assert!((one - 7.2).abs() < 1e-9);
    assert_eq!(session.stringwidth("AA").unwrap(), 2.0 * one);

    assert!(session.set_font("Bogus", 12.0, "host").unwrap_err().is_not_found());
    assert_eq!(session.stringwidth("A").unwrap(), one);
}

#[test]
fn boxed_text_wraps_and_reports_overflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boxed.pdf");

    let options = SessionOptions::default();
    let mut session = create_with_options(&path, options, WriteOptions::default());
    session.begin_page(612.0, 792.0).unwrap();
    session.set_font("Courier", 10.0, "host").unwrap();
    // 50pt wide at 10pt: 10 chars per line; 20pt tall with 12pt leading: 1 line.
    let left = session
        .show_boxed("aaaa bbbb cccc dddd", 100.0, 500.0, 50.0, 20.0, "left", "")
        .unwrap();
    assert_eq!(left, 9);
    assert_eq!(session.active_page().unwrap().text(), "aaaa bbbb");
    session.close().unwrap();

    let ops = page_ops(&path, 1);
    assert_eq!(operands_of(&ops, "Tj").len(), 1);
}

// --- document metadata ---

#[test]
fn info_and_outlines_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meta.pdf");

    let mut session = create(&path);
    assert!(session.add_outline("too early").unwrap_err().is_invalid_state());
    session.set_info_title("Quarterly Report").unwrap();
    session.set_info_author("Zoë Example").unwrap();
    session.set_info("Department", "Finance").unwrap();
    session.begin_page(612.0, 792.0).unwrap();
    session.add_outline("Introduction").unwrap();
    session.end_page().unwrap();
    session.begin_page(612.0, 792.0).unwrap();
    session.add_outline("Results").unwrap();
    session.close().unwrap();

    let pdf = Pdf::open_file(&path).unwrap();
    assert_eq!(pdf.info().title(), Some("Quarterly Report"));
    assert_eq!(pdf.info().author(), Some("Zoë Example"));
    assert_eq!(pdf.info().get("Department"), Some("Finance"));
    assert_eq!(pdf.info().get("Producer"), Some("pdfscribe"));
    let outlines: Vec<_> = pdf
        .outlines()
        .iter()
        .map(|o| (o.title.as_str(), o.page_index))
        .collect();
    assert_eq!(outlines, vec![("Introduction", 0), ("Results", 1)]);

    // Appending keeps the earlier outline entries.
    let mut again = create(&path);
    again.begin_page(612.0, 792.0).unwrap();
    again.add_outline("Appendix").unwrap();
    again.close().unwrap();
    let pdf = Pdf::open_file(&path).unwrap();
    assert_eq!(pdf.outlines().len(), 3);
    assert_eq!(pdf.outlines()[2].page_index, 2);
}

#[test]
fn uncompressed_output_uses_requested_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.pdf");
    let write = WriteOptions {
        version: "1.4".into(),
        compress: false,
        ..WriteOptions::default()
    };

    let mut session = create_with_options(&path, SessionOptions::default(), write);
    session.begin_page(612.0, 792.0).unwrap();
    session.rect(1.0, 2.0, 3.0, 4.0).unwrap();
    session.stroke().unwrap();
    session.close().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("re"));
    assert!(!text.contains("FlateDecode"));
}

// --- images ---

#[test]
fn png_image_is_embedded_and_scaled() {
    let dir = tempfile::tempdir().unwrap();
    let image_path = dir.path().join("swatch.png");
    image::RgbImage::from_pixel(4, 2, image::Rgb([255, 0, 0]))
        .save(&image_path)
        .unwrap();
    let path = dir.path().join("image.pdf");

    let mut session = create(&path);
    let id = session.load_image("png", &image_path).unwrap();
    session.begin_page(612.0, 792.0).unwrap();
    session.place_image(id, 10.0, 20.0, 2.0).unwrap();
    session.close().unwrap();

    let ops = page_ops(&path, 1);
    assert_eq!(operators(&ops), vec!["q", "cm", "Do", "Q"]);
    assert_eq!(
        numbers(operands_of(&ops, "cm")[0]),
        vec![8.0, 0.0, 0.0, 4.0, 10.0, 20.0]
    );

    let doc = lopdf::Document::load(&path).unwrap();
    let images = resource_entries(&doc, 1, b"XObject");
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].get(b"Width").unwrap().as_i64().unwrap(), 4);
    assert_eq!(images[0].get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceRGB");
}

#[test]
fn unknown_image_kind_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = create(dir.path().join("gif.pdf"));
    let err = session.load_image("gif", dir.path().join("x.gif")).unwrap_err();
    assert!(err.is_unsupported());
}
