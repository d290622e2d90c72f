use super::*;

#[test]
fn empty_json_yields_documented_defaults() {
    let cfg = BrandingConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, BrandingConfig::default());
    assert_eq!(cfg.logo_position, Anchor::TopCenter);
    assert_eq!(cfg.slogan_position, Anchor::BottomCenter);
    assert_eq!(cfg.logo_size_percent, 13.0);
    assert_eq!(cfg.slogan_size_percent, 4.0);
    assert!(cfg.gradient_enabled);
    assert_eq!(cfg.gradient_color.to_string(), "#3B82F6");
    assert_eq!(cfg.gradient_height_percent, 25.0);
    assert_eq!(cfg.gradient_position, GradientPosition::Both);
}

#[test]
fn camel_case_fields_override_defaults() {
    let cfg = BrandingConfig::from_json_str(
        r##"{
            "logoPosition": "bottom-right",
            "sloganPosition": "top-center",
            "logoSizePercent": 20,
            "gradientColor": "#000000",
            "gradientPosition": "top",
            "gradientEnabled": false
        }"##,
    )
    .unwrap();
    assert_eq!(cfg.logo_position, Anchor::BottomRight);
    assert_eq!(cfg.slogan_edge(), Edge::Top);
    assert_eq!(cfg.logo_size_percent, 20.0);
    assert_eq!(cfg.gradient_color, Rgb8::BLACK);
    assert!(cfg.gradient_position.has_top());
    assert!(!cfg.gradient_position.has_bottom());
    assert!(!cfg.gradient_enabled);
}

#[test]
fn invalid_anchor_token_fails_to_load() {
    let err = BrandingConfig::from_json_str(r#"{"logoPosition": "center"}"#).unwrap_err();
    assert!(err.to_string().contains("invalid anchor"));
}

#[test]
fn validate_enforces_ranges_and_slogan_anchor() {
    let mut cfg = BrandingConfig {
        logo_size_percent: 30.0,
        ..BrandingConfig::default()
    };
    assert!(cfg.validate().is_err());

    cfg.logo_size_percent = 25.0;
    cfg.validate().unwrap();

    cfg.slogan_size_percent = 1.0;
    assert!(cfg.validate().is_err());
    cfg.slogan_size_percent = 8.0;

    cfg.gradient_height_percent = 60.0;
    assert!(cfg.validate().is_err());
    cfg.gradient_height_percent = 10.0;

    cfg.slogan_position = Anchor::BottomLeft;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("sloganPosition"));
}

#[test]
fn reader_loading_matches_string_loading() {
    let json = br#"{"gradientHeightPercent": 40}"#;
    let cfg = BrandingConfig::from_reader(&json[..]).unwrap();
    assert_eq!(cfg.gradient_height_percent, 40.0);
}
