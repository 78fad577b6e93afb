use super::*;

// =============================================================
// Color::parse
// =============================================================

#[test]
fn parse_six_digit_hex() {
    assert_eq!(Color::parse("#667eea").unwrap(), Color::rgb(0x66, 0x7e, 0xea));
}

#[test]
fn parse_eight_digit_hex_is_alpha_first() {
    assert_eq!(Color::parse("#80FF0000").unwrap(), Color::argb(0x80, 0xFF, 0, 0));
}

#[test]
fn parse_short_hex_forms() {
    assert_eq!(Color::parse("#f00").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(Color::parse("#8f00").unwrap(), Color::argb(0x88, 255, 0, 0));
}

#[test]
fn parse_named_colors_case_insensitive() {
    assert_eq!(Color::parse("Red").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(Color::parse("BLACK").unwrap(), Color::BLACK);
    assert!(Color::parse("transparent").unwrap().is_transparent());
}

#[test]
fn parse_trims_whitespace() {
    assert_eq!(Color::parse("  #000000 ").unwrap(), Color::BLACK);
}

#[test]
fn parse_rejects_garbage() {
    assert_eq!(Color::parse(""), Err(ColorError::Empty));
    assert!(matches!(Color::parse("#12345"), Err(ColorError::InvalidHex(_))));
    assert!(matches!(Color::parse("#gggggg"), Err(ColorError::InvalidHex(_))));
    assert!(matches!(Color::parse("#+f+f+f"), Err(ColorError::InvalidHex(_))));
    assert!(matches!(Color::parse("notacolor"), Err(ColorError::UnknownName(_))));
}

// =============================================================
// Formatting
// =============================================================

#[test]
fn to_hex_roundtrips_opaque_and_translucent() {
    for c in [Color::rgb(1, 2, 3), Color::argb(0x40, 10, 20, 30)] {
        assert_eq!(Color::parse(&c.to_hex()).unwrap(), c);
    }
    assert_eq!(Color::rgb(0x66, 0x7e, 0xea).to_hex(), "#667EEA");
}

#[test]
fn to_css_uses_rgba() {
    assert_eq!(Color::rgb(255, 0, 0).to_css(), "rgba(255, 0, 0, 1.000)");
    assert_eq!(Color::argb(0, 1, 2, 3).to_css(), "rgba(1, 2, 3, 0.000)");
}

#[test]
fn serde_uses_hex_strings() {
    let json = serde_json::to_string(&Color::rgb(255, 255, 255)).unwrap();
    assert_eq!(json, "\"#FFFFFF\"");
    let back: Color = serde_json::from_str("\"#00ff00\"").unwrap();
    assert_eq!(back, Color::rgb(0, 255, 0));
    assert!(serde_json::from_str::<Color>("\"bogus\"").is_err());
}

// =============================================================
// Stroke and fill rules
// =============================================================

#[test]
fn stroke_paint_falls_back_on_missing_or_bad() {
    assert_eq!(stroke_paint(None, Color::BLACK), Color::BLACK);
    assert_eq!(stroke_paint(Some("#zzz"), Color::BLACK), Color::BLACK);
    assert_eq!(stroke_paint(Some("#ffffff"), Color::BLACK), Color::WHITE);
}

#[test]
fn fill_paint_transparent_absent_and_empty_are_none() {
    assert_eq!(fill_paint(None), None);
    assert_eq!(fill_paint(Some("")), None);
    assert_eq!(fill_paint(Some("transparent")), None);
    assert_eq!(fill_paint(Some("Transparent")), None);
}

#[test]
fn fill_paint_parses_other_values() {
    assert_eq!(fill_paint(Some("#f0f0f0")), Some(Color::rgb(0xf0, 0xf0, 0xf0)));
}

#[test]
fn fill_paint_bad_value_is_unfilled() {
    assert_eq!(fill_paint(Some("nope")), None);
}
