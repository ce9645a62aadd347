use errata::{Erratum, Rv, Severity, make_rv, prelude::*};

#[derive(Debug, thiserror::Error)]
enum ConfigError {
    #[error("missing key `{0}`")]
    MissingKey(&'static str),
    #[error("value for `{key}` is out of range")]
    OutOfRange { key: &'static str },
}

fn lookup(key: &'static str) -> Result<u32, ConfigError> {
    match key {
        "workers" => Ok(4),
        "port" => Err(ConfigError::OutOfRange { key }),
        _ => Err(ConfigError::MissingKey(key)),
    }
}

#[test]
fn test_rv_from_failed_erratum() {
    let mut rv: Rv<i32> = Erratum::new().with_error("could not compute").into();
    assert_eq!(*rv, 0);
    assert!(!rv.is_ok());
    assert!(rv.is_failure());
    assert_eq!(rv.severity(), Severity::Error);
    rv.clear();
    assert!(rv.is_ok());
}

#[test]
fn test_into_rv_from_error() {
    let rv = lookup("workers").into_rv();
    assert_eq!(*rv, 4);
    assert!(rv.errata().is_empty());

    let mut rv = lookup("threads").into_rv();
    assert_eq!(*rv, 0);
    assert_eq!(rv.errata().to_string(), "Error: missing key `threads`");
    rv.clear();
}

#[test]
fn test_into_rv_with_custom_note() {
    let mut rv = lookup("port").into_rv_with(Severity::Warn, |error| match error {
        ConfigError::OutOfRange { key } => format!("using default for `{key}`"),
        other => other.to_string(),
    });
    assert_eq!(rv.severity(), Severity::Warn);
    assert_eq!(
        rv.errata().front().map(|note| note.text()),
        Some("using default for `port`")
    );
    rv.clear();
}

#[test]
fn test_into_result() {
    let mut rv = Rv::new(String::from("ready"));
    rv.info("warmed up");
    assert_eq!(rv.into_result().ok().as_deref(), Some("ready"));

    let mut rv = Rv::new(7u8);
    rv.warn("degraded");
    let mut errata = rv.into_result().unwrap_err();
    assert_eq!(errata.to_string(), "Warn: degraded");
    errata.clear();
}

#[test]
fn test_parts() {
    let mut rv = make_rv(vec![1, 2], Erratum::new().with_info("loaded"));
    {
        let (result, errata) = rv.parts_mut();
        result.push(3);
        errata.warn("list grew");
    }
    let (result, errata) = rv.parts();
    assert_eq!(result, &[1, 2, 3]);
    assert_eq!(errata.len(), 2);

    let (result, mut errata) = rv.into_parts();
    assert_eq!(result.len(), 3);
    errata.clear();

    let rv = Rv::with_errata(9u8, Erratum::new().with_error("late failure"));
    let (value, mut errata): (u8, Erratum) = rv.into();
    assert_eq!(value, 9);
    errata.clear();
}

#[test]
fn test_deref_and_assignment() {
    let mut rv = Rv::new(10i64);
    assert_eq!(*rv * 2, 20);
    *rv += 5;
    assert_eq!(*rv.result(), 15);

    *rv.set(1) += 1;
    assert_eq!(*rv, 2);
    rv.assign(40).info("assigned");
    assert_eq!(*rv.result(), 40);
    assert!(rv.is_ok());

    let mut text = Rv::new(String::from("abc"));
    assert_eq!(text.len(), 3);
    text.push('d');
    assert_eq!(text.as_str(), "abcd");
}

#[test]
fn test_map_keeps_errata() {
    let mut rv = Rv::new(21);
    rv.warn("approximate");
    let mut doubled = rv.map(|value| value * 2);
    assert_eq!(*doubled, 42);
    assert_eq!(doubled.errata().to_string(), "Warn: approximate");
    doubled.clear();
}

#[test]
fn test_conversions_from_result() {
    let ok: Result<u32, Erratum> = Ok(3);
    let rv = Rv::from(ok);
    assert_eq!(*rv, 3);
    assert!(rv.is_ok());

    let failed: Result<u32, Erratum> = Err(Erratum::new().with_error("denied"));
    let mut rv = Rv::from(failed);
    assert_eq!(*rv, 0);
    assert!(rv.is_failure());
    rv.clear();

    let mut rv: Rv<&str> = ("partial", Erratum::new().with_warn("truncated")).into();
    assert_eq!(*rv, "partial");
    rv.clear();
}

#[test]
fn test_set_errata_replaces() {
    let mut rv = Rv::new(());
    rv.info("first");
    let mut previous = rv.errata().clone();
    rv.set_errata(Erratum::new().with_diag("second"));
    assert_eq!(rv.errata().to_string(), "Diag: second");
    assert_eq!(previous.to_string(), "Info: first");
    previous.clear();
}

#[test]
fn test_debug_output() {
    let mut rv = Rv::new(5);
    rv.error("broken");
    let debug = format!("{rv:?}");
    assert!(debug.contains("result: 5"));
    assert!(debug.contains("broken"));
    rv.clear();
}
