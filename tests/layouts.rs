use insta::assert_snapshot;
use tinyopt::{
    diagnostics, Compact, Custom, LayoutRegistry, NanBits, Optional,
    RegistrationError, Selected, Sentinel,
};

#[test]
fn builtin_registry() {
    #[cfg(feature = "logger")]
    let _ = env_logger::builder()
        .format_timestamp(None)
        .format_target(false)
        .try_init();

    let registry = LayoutRegistry::builtin();

    let described: Vec<String> =
        registry.iter().map(ToString::to_string).collect();
    let described = described.join("\n");

    assert!(described.contains("f64: 8 bytes for a 8-byte payload, rule 2"));
    assert!(described.contains("i32, sentinel -1: 4 bytes"));

    let string = registry.get_by_name("String").unwrap();
    assert_eq!(string.selected, Selected::Separate);
    assert_eq!(string.overhead(), align_of::<String>());
}

#[test]
fn user_layouts() {
    let mut registry = LayoutRegistry::default();

    let info = registry.store::<f32, Compact>("ratio").unwrap();
    assert_snapshot!(
        info.to_string(),
        @"ratio: 4 bytes for a 4-byte payload, rule 2 (registered)"
    );

    let info = registry.store::<f64, Custom<NanBits>>("nan").unwrap();
    assert_eq!(info.selected, Selected::Custom);
    assert_eq!(info.option_size, 16);

    let err = registry
        .store::<i64, Sentinel<0>>("ratio")
        .unwrap_err();
    assert!(matches!(err, RegistrationError::DuplicateName { .. }));

    let info = Optional::<i64, Sentinel<0>>::layout("id");
    assert_eq!(info.size, 8);
    assert_eq!(info.overhead(), 0);
}

#[test]
fn rule_diagnostics() {
    let listed: Vec<String> = Selected::ALL
        .iter()
        .map(|rule| format!("{rule}: {}", rule.diagnostics().len()))
        .collect();
    assert_snapshot!(
        listed.join(", "),
        @"rule 1 (custom): 0, rule 2 (registered): 1, rule 3 (sentinel): 2, rule 4 (field): 2, rule 5 (field sentinel): 3, rule 6 (separate): 0"
    );

    assert!(Selected::Sentinel
        .diagnostics()
        .contains(&diagnostics::SENTINEL_OUT_OF_RANGE));
}
