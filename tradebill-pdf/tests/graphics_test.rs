use tradebill_pdf::{Color, PdfDocument};

fn page_ops(build: impl FnOnce(&mut PdfDocument<Vec<u8>>)) -> String {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    build(&mut doc);
    let bytes = doc.end_document().unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[test]
fn filled_rect_emits_color_and_fill() {
    let output = page_ops(|doc| {
        doc.set_fill_color(Color::rgb(0.0, 0.5, 1.0));
        doc.rect(56.0, 600.0, 483.0, 20.0);
        doc.fill();
    });
    assert!(output.contains("0 0.5 1 rg\n56 600 483 20 re\nf\n"));
}

#[test]
fn stroked_rule_emits_path_operators() {
    let output = page_ops(|doc| {
        doc.set_stroke_color(Color::gray(0.75));
        doc.set_line_width(0.5);
        doc.move_to(56.0, 700.0);
        doc.line_to(539.0, 700.0);
        doc.stroke();
    });
    assert!(output.contains("0.75 0.75 0.75 RG\n0.5 w\n56 700 m\n539 700 l\nS\n"));
}

#[test]
fn state_is_saved_and_restored() {
    let output = page_ops(|doc| {
        doc.save_state();
        doc.set_fill_color(Color::WHITE);
        doc.restore_state();
    });
    assert!(output.contains("q\n1 1 1 rg\nQ\n"));
}

#[test]
fn rgb8_colors_round_trip_through_operators() {
    let output = page_ops(|doc| {
        doc.set_fill_color(Color::rgb8(255, 0, 0));
    });
    assert!(output.contains("1 0 0 rg\n"));
}
