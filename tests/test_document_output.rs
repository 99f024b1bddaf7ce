//! End-to-end tests: drive the drawing API and assert on the rendered
//! PDF bytes.

use pdf_quill::{Color, DocumentConfig, Engine, Error, Font, Image, TextEncoding};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn two_page_document_with_links_and_bookmarks() {
    init_logging();

    let engine = Engine::with_config(
        DocumentConfig::default()
            .with_title("Linked Document")
            .with_author("integration test"),
    );

    let mut first = engine.create_context(612.0, 792.0);
    let mut second = engine.create_context(612.0, 792.0);

    first.set_font(&Font::helvetica(), 12.0);
    first
        .draw_text("See the appendix", 72.0, 720.0, TextEncoding::WinAnsi)
        .unwrap();
    first
        .go_to_action(&second, 72.0, 715.0, 180.0, 730.0, 792.0)
        .unwrap();
    first
        .uri_action(72.0, 680.0, 180.0, 695.0, "https://example.com/spec")
        .unwrap();
    first.add_bookmark("Introduction", 792.0).unwrap();

    second.set_font(&Font::helvetica(), 12.0);
    second
        .draw_text("Appendix", 72.0, 720.0, TextEncoding::WinAnsi)
        .unwrap();
    second.add_bookmark("Appendix", 792.0).unwrap();

    let bytes = engine.render(&[first, second]).unwrap();
    let content = String::from_utf8_lossy(&bytes);

    assert!(content.starts_with("%PDF-1.7"));
    assert!(content.contains("/Type /Catalog"));
    assert!(content.contains("/Count 2"));
    assert!(content.contains("(See the appendix) Tj"));
    assert!(content.contains("/Annots"));
    assert!(content.contains("/URI (https://example.com/spec)"));
    assert!(content.contains("/FitH"));
    assert!(content.contains("/Type /Outlines"));
    assert!(content.contains("(Introduction)"));
    assert!(content.contains("(Appendix)"));
    assert!(content.contains("/Title (Linked Document)"));
    assert!(content.ends_with("%%EOF"));
}

#[test]
fn elision_shows_up_in_the_content_stream() {
    init_logging();

    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);

    let highlight = Color::Rgb(1.0, 1.0, 0.0);
    for i in 0..4 {
        gc.set_fill_color(&highlight);
        gc.draw_rounded_rectangle(
            72.0,
            700.0 - 20.0 * i as f32,
            540.0,
            712.0 - 20.0 * i as f32,
            3.0,
            "fill".parse().unwrap(),
        );
    }

    let bytes = engine.render(&[gc]).unwrap();
    let content = String::from_utf8_lossy(&bytes);

    // One color operator serves all four rectangles.
    assert_eq!(content.matches("1 1 0 rg").count(), 1);
    assert_eq!(content.matches("h\nf\n").count(), 4);
}

#[test]
fn drawing_primitives_render_expected_operators() {
    init_logging();

    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);

    gc.clip_rectangle(36.0, 36.0, 576.0, 756.0);
    gc.set_line_width(0.75);
    gc.draw_line(72.0, 100.0, 540.0, 100.0);
    gc.draw_polygon(
        &[100.0, 200.0, 150.0],
        &[200.0, 200.0, 280.0],
        "stroke".parse().unwrap(),
    );

    let image = Image::from_gray(2, 2, vec![0u8, 64, 128, 255]).unwrap();
    gc.draw_image(&image, 300.0, 400.0, 400.0, 500.0);

    let bytes = engine.render(&[gc]).unwrap();
    let content = String::from_utf8_lossy(&bytes);

    assert!(content.contains("36 36 540 720 re\nW\nn"));
    assert!(content.contains("0.75 w"));
    assert!(content.contains("72 100 m\n540 100 l\nS"));
    assert!(content.contains("100 200 m\n200 200 l\n150 280 l\nh\nS"));
    assert!(content.contains("/Im1 Do"));
    assert!(content.contains("/Subtype /Image"));
    assert!(content.contains("/ColorSpace /DeviceGray"));
}

#[test]
fn compression_replaces_plain_operators() {
    init_logging();

    let engine = Engine::with_config(DocumentConfig::default().with_compress(true));
    let mut gc = engine.create_context(612.0, 792.0);
    gc.set_font(&Font::courier(), 10.0);
    gc.draw_text("compressed payload", 72.0, 720.0, TextEncoding::WinAnsi)
        .unwrap();

    let bytes = engine.render(&[gc]).unwrap();
    let content = String::from_utf8_lossy(&bytes);

    assert!(content.contains("/Filter /FlateDecode"));
    assert!(!content.contains("(compressed payload) Tj"));
}

#[test]
fn link_to_unrendered_page_fails_the_render() {
    init_logging();

    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);
    let orphan = engine.create_context(612.0, 792.0);

    gc.go_to_action(&orphan, 0.0, 0.0, 10.0, 10.0, 700.0).unwrap();

    let err = engine.render(&[gc]).unwrap_err();
    assert!(matches!(err, Error::Engine(_)));
}

#[test]
fn utf16_text_renders_as_hex_string() {
    init_logging();

    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);
    gc.set_font(&Font::helvetica(), 12.0);
    gc.draw_text("A", 72.0, 720.0, TextEncoding::Utf16Be).unwrap();

    let bytes = engine.render(&[gc]).unwrap();
    let content = String::from_utf8_lossy(&bytes);
    assert!(content.contains("<0041> Tj"));
}

#[test]
fn save_writes_a_parsable_file() {
    init_logging();

    let engine = Engine::new();
    let mut gc = engine.create_context(595.0, 842.0);
    gc.set_font(&Font::helvetica(), 12.0);
    gc.draw_text("saved", 72.0, 800.0, TextEncoding::WinAnsi).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    engine.save(&[gc], &path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(bytes.ends_with(b"%%EOF"));
}

#[test]
fn cloned_page_renders_as_its_own_page() {
    init_logging();

    let engine = Engine::new();
    let mut template = engine.create_context(612.0, 792.0);
    template.set_font(&Font::helvetica(), 9.0);
    template
        .draw_text("confidential", 500.0, 20.0, TextEncoding::WinAnsi)
        .unwrap();

    let mut page_one = template.clone();
    let mut page_two = template.clone();
    page_one
        .draw_text("first page body", 72.0, 720.0, TextEncoding::WinAnsi)
        .unwrap();
    page_two
        .draw_text("second page body", 72.0, 720.0, TextEncoding::WinAnsi)
        .unwrap();

    let bytes = engine.render(&[page_one, page_two]).unwrap();
    let content = String::from_utf8_lossy(&bytes);

    assert_eq!(content.matches("(confidential) Tj").count(), 2);
    assert_eq!(content.matches("(first page body) Tj").count(), 1);
    assert_eq!(content.matches("(second page body) Tj").count(), 1);
}
