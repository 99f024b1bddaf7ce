//! Integration tests for the drawing API: elision laws, save/restore
//! semantics, and error wrapping observed through the page's operator
//! list.

use proptest::prelude::*;

use pdf_quill::engine::ContentOp;
use pdf_quill::{Color, DashPattern, Engine, Error, FillMode, Font, FontStyle, TextEncoding};

fn count_ops(ops: &[ContentOp], pred: fn(&ContentOp) -> bool) -> usize {
    ops.iter().filter(|op| pred(op)).count()
}

#[test]
fn repeated_styles_collapse_to_one_operator_each() {
    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);

    for _ in 0..5 {
        gc.set_fill_color(&Color::Rgb(0.2, 0.4, 0.6));
        gc.set_line_color(&Color::Gray(0.0));
        gc.set_line_width(1.5);
        gc.set_line_dashing_pattern(&DashPattern::Dotted);
    }

    let ops = gc.page().operations();
    assert_eq!(count_ops(ops, |op| matches!(op, ContentOp::SetFillColor(_))), 1);
    assert_eq!(count_ops(ops, |op| matches!(op, ContentOp::SetStrokeColor(_))), 1);
    assert_eq!(count_ops(ops, |op| matches!(op, ContentOp::SetLineWidth(_))), 1);
    assert_eq!(count_ops(ops, |op| matches!(op, ContentOp::SetDashPattern(..))), 1);
}

#[test]
fn equal_components_from_different_sources_are_elided() {
    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);

    gc.set_fill_color(&Color::from_hex("#336699").unwrap());
    gc.set_fill_color(&Color::from_rgb8(0x33, 0x66, 0x99));

    let ops = gc.page().operations();
    assert_eq!(count_ops(ops, |op| matches!(op, ContentOp::SetFillColor(_))), 1);
}

#[test]
fn dotted_pattern_matches_its_array_form() {
    assert_eq!(DashPattern::Dotted.resolve(), DashPattern::Custom(vec![1.0, 2.0]).resolve());

    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);
    gc.set_line_dashing_pattern(&DashPattern::Custom(vec![1.0, 2.0]));
    gc.set_line_dashing_pattern(&DashPattern::Dotted);

    let ops = gc.page().operations();
    assert_eq!(count_ops(ops, |op| matches!(op, ContentOp::SetDashPattern(..))), 1);
}

#[test]
fn save_restore_recovers_presave_elision_behavior() {
    let red = Color::Rgb(1.0, 0.0, 0.0);
    let blue = Color::Rgb(0.0, 0.0, 1.0);

    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);

    gc.set_fill_color(&red);
    gc.save_graphics_state();
    gc.set_fill_color(&blue);
    gc.restore_graphics_state();

    let before = count_ops(gc.page().operations(), |op| {
        matches!(op, ContentOp::SetFillColor(_))
    });
    gc.set_fill_color(&red); // elided: cache restored to red
    let after_red = count_ops(gc.page().operations(), |op| {
        matches!(op, ContentOp::SetFillColor(_))
    });
    assert_eq!(before, after_red);

    gc.set_fill_color(&blue); // not elided
    let after_blue = count_ops(gc.page().operations(), |op| {
        matches!(op, ContentOp::SetFillColor(_))
    });
    assert_eq!(after_blue, after_red + 1);

    // The page itself received a balanced q/Q pair.
    let ops = gc.page().operations();
    assert_eq!(count_ops(ops, |op| matches!(op, ContentOp::SaveState)), 1);
    assert_eq!(count_ops(ops, |op| matches!(op, ContentOp::RestoreState)), 1);
}

#[test]
fn stateful_font_forwards_current_variant() {
    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);

    let mut font = Font::times();
    gc.set_font(&font, 12.0);
    font.set_style(FontStyle::Italic);
    gc.set_font(&font, 12.0);

    // Both variants were forwarded; set_font is never cached.
    let font_ops: Vec<_> = gc
        .page()
        .operations()
        .iter()
        .filter_map(|op| match op {
            ContentOp::SetFont(name, _) => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(font_ops.len(), 2);
    // Distinct resource names: the italic variant is a different font.
    assert_ne!(font_ops[0], font_ops[1]);
}

#[test]
fn invalid_fill_mode_is_rejected_before_any_delegate_call() {
    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);

    let parsed = "crosshatch".parse::<FillMode>();
    assert!(matches!(parsed, Err(Error::InvalidFillMode(ref mode)) if mode == "crosshatch"));
    assert!(gc.page().operations().is_empty());

    // A recognized mode draws as usual.
    let mode = "fill_and_stroke".parse::<FillMode>().unwrap();
    gc.draw_rounded_rectangle(10.0, 10.0, 110.0, 60.0, 5.0, mode);
    assert_eq!(gc.page().operations().last(), Some(&ContentOp::FillStroke));
}

#[test]
fn failed_annotations_attach_nothing() {
    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);
    let target = engine.create_context(612.0, 792.0);

    assert!(gc.uri_action(0.0, 0.0, 10.0, 10.0, "::nonsense").is_err());
    assert!(gc
        .go_to_action(&target, 0.0, 0.0, 10.0, 10.0, f32::INFINITY)
        .is_err());
    assert!(gc.add_bookmark("", 100.0).is_err());

    assert!(gc.page().annotations().is_empty());
    assert_eq!(engine.bookmark_count(), 0);
}

#[test]
fn wrapped_errors_expose_their_engine_cause() {
    use std::error::Error as _;

    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);

    let err = gc.uri_action(0.0, 0.0, 10.0, 10.0, "bad uri").unwrap_err();
    let cause = err.source().expect("wrapped error keeps its cause");
    assert!(cause.to_string().contains("malformed URI"));
}

#[test]
fn draw_text_errors_pass_through_unwrapped() {
    let engine = Engine::new();
    let mut gc = engine.create_context(612.0, 792.0);

    // No font selected yet: the engine failure arrives untranslated.
    let err = gc
        .draw_text("hi", 72.0, 720.0, TextEncoding::WinAnsi)
        .unwrap_err();
    assert!(matches!(err, Error::Engine(_)));
}

#[test]
fn cloned_context_is_fully_independent() {
    let engine = Engine::new();
    let mut original = engine.create_context(612.0, 792.0);
    original.set_fill_color(&Color::black());
    original.draw_line(0.0, 0.0, 10.0, 10.0);

    let mut copy = original.clone();
    copy.draw_rounded_rectangle(0.0, 0.0, 50.0, 50.0, 4.0, FillMode::Fill);
    copy.uri_action(0.0, 0.0, 10.0, 10.0, "https://example.com")
        .unwrap();

    assert_ne!(original.page().id(), copy.page().id());
    assert!(original.page().annotations().is_empty());
    assert!(original
        .page()
        .operations()
        .iter()
        .all(|op| !matches!(op, ContentOp::CurveTo(..))));

    // The original still has everything it had before the clone.
    assert_eq!(
        count_ops(original.page().operations(), |op| {
            matches!(op, ContentOp::LineTo(..))
        }),
        1
    );
}

prop_compose! {
    fn palette_color()(index in 0u8..4) -> Color {
        match index {
            0 => Color::Rgb(1.0, 0.0, 0.0),
            1 => Color::Rgb(0.0, 0.0, 1.0),
            2 => Color::Gray(0.0),
            _ => Color::Cmyk(0.0, 0.0, 0.0, 1.0),
        }
    }
}

proptest! {
    /// For any call sequence, the number of emitted fill-color operators
    /// equals the number of component-value changes.
    #[test]
    fn fill_color_operator_count_equals_run_count(colors in prop::collection::vec(palette_color(), 0..24)) {
        let engine = Engine::new();
        let mut gc = engine.create_context(612.0, 792.0);

        let mut expected = 0;
        let mut last: Option<Vec<f32>> = None;
        for color in &colors {
            gc.set_fill_color(color);
            if last.as_ref() != Some(&color.components()) {
                expected += 1;
                last = Some(color.components());
            }
        }

        let emitted = count_ops(gc.page().operations(), |op| {
            matches!(op, ContentOp::SetFillColor(_))
        });
        prop_assert_eq!(emitted, expected);
    }

    /// Runs of equal line widths emit one operator per run, except the
    /// zero width, which is always re-applied.
    #[test]
    fn line_width_operator_count_matches_runs(widths in prop::collection::vec(prop::sample::select(vec![0.0f32, 0.5, 1.0, 2.0]), 0..24)) {
        let engine = Engine::new();
        let mut gc = engine.create_context(612.0, 792.0);

        let mut expected = 0;
        let mut last: Option<f32> = None;
        for &width in &widths {
            gc.set_line_width(width);
            if last.map_or(true, |cached| cached == 0.0 || cached != width) {
                expected += 1;
            }
            last = Some(width);
        }

        let emitted = count_ops(gc.page().operations(), |op| {
            matches!(op, ContentOp::SetLineWidth(_))
        });
        prop_assert_eq!(emitted, expected);
    }
}
