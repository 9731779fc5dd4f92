//! End-to-end tests against a real dynamically loaded engine library
//!
//! The fixture library (`crates/engine-fixture`) exports the engine's C ABI
//! plus allocator counters. Every test here goes through `dlopen`, symbol
//! resolution and native string ownership exactly as production does.

#[path = "../../engine-fixture/support.rs"]
mod support;

use bunsenite_core::PerimeterCode;
use bunsenite_ffi_bridge::NickelBridge;
use libloading::Library;
use serde_json::json;
use serial_test::serial;
use std::path::Path;

/// Allocator counters exported by the fixture
struct Counters {
    library: Library,
}

impl Counters {
    fn open(path: &Path) -> Self {
        // Safety: the fixture has no load-time initializers
        let library = unsafe { Library::new(path) }.expect("open fixture library");
        Self { library }
    }

    fn read(&self, symbol: &str) -> usize {
        unsafe {
            let counter = self
                .library
                .get::<unsafe extern "C" fn() -> usize>(symbol.as_bytes())
                .expect("fixture counter symbol");
            counter()
        }
    }

    fn calls(&self) -> usize {
        self.read("fixture_calls")
    }

    fn released(&self) -> usize {
        self.read("fixture_released")
    }

    fn live(&self) -> usize {
        self.read("fixture_live")
    }
}

fn load_fixture() -> (NickelBridge, Counters) {
    let bridge = NickelBridge::load(&support::fixture_locator()).expect("load fixture engine");
    let counters = Counters::open(bridge.library_path());
    (bridge, counters)
}

#[test]
#[serial]
fn test_load_resolves_every_entry_point() {
    let locator = support::fixture_locator();
    let bridge = NickelBridge::load(&locator).unwrap();

    assert_eq!(bridge.library_path(), locator.locate().unwrap());
    assert!(bridge
        .library_path()
        .starts_with(support::fixture_base_dir().join("target").join("release")));

    let meta = bridge.build_metadata().unwrap();
    assert_eq!(meta.version, "0.1.0-fixture");
    assert_eq!(meta.compliance_tier, "bronze");
    assert_eq!(meta.perimeter, PerimeterCode::new(3));
}

#[test]
#[serial]
fn test_valid_record_parses_and_validates() {
    let (bridge, counters) = load_fixture();
    let released = counters.released();

    let json = bridge.parse("{ a = 1 }", "t.ncl").unwrap().expect("valid input");
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value, json!({"a": 1}));
    assert!(bridge.validate("{ a = 1 }", "t.ncl").unwrap().is_valid());

    assert_eq!(counters.released() - released, 1);
    assert_eq!(counters.live(), 0);
}

#[test]
#[serial]
fn test_malformed_record_is_absent_and_invalid() {
    let (bridge, counters) = load_fixture();
    let released = counters.released();

    assert_eq!(bridge.parse("{ a = ", "t.ncl").unwrap(), None);
    let status = bridge.validate("{ a = ", "t.ncl").unwrap();
    assert!(!status.is_valid());
    assert_eq!(status.code(), 1);

    // Nothing was allocated, so nothing is released
    assert_eq!(counters.released(), released);
    assert_eq!(counters.live(), 0);
}

#[test]
#[serial]
fn test_empty_input_never_reaches_the_engine() {
    let (bridge, counters) = load_fixture();
    let calls = counters.calls();

    assert_eq!(bridge.parse("", "t.ncl").unwrap(), None);
    assert_eq!(bridge.parse("  \n\t", "t.ncl").unwrap(), None);
    assert!(!bridge.validate("", "t.ncl").unwrap().is_valid());

    assert_eq!(counters.calls(), calls);
}

#[test]
#[serial]
fn test_each_parse_result_released_exactly_once() {
    let (bridge, counters) = load_fixture();
    let sources = [
        "{ a = 1 }",
        "{ name = \"app\", port = 8080 }",
        "{ debug = true, retries = 3 }",
        "{ }",
    ];
    let released = counters.released();

    for source in sources {
        let value = bridge.parse_json(source, "t.ncl").unwrap().expect("valid input");
        assert!(value.is_object());
    }

    assert_eq!(counters.released() - released, sources.len());
    assert_eq!(counters.live(), 0, "leaked or double-freed native strings");
}

#[test]
#[serial]
fn test_parse_and_validate_agree() {
    let (bridge, counters) = load_fixture();
    for source in [
        "{ a = 1 }",
        "{ a = }",
        "{ a = \"unterminated }",
        "not a record",
        "{ flag = false }",
        "{ 1bad key = 2 }",
    ] {
        let parsed = bridge.parse(source, "t.ncl").unwrap();
        let status = bridge.validate(source, "t.ncl").unwrap();
        assert_eq!(parsed.is_some(), status.is_valid(), "disagreement on {source:?}");
    }
    assert_eq!(counters.live(), 0);
}

#[test]
#[serial]
fn test_interior_nul_never_reaches_the_engine() {
    let (bridge, counters) = load_fixture();
    let calls = counters.calls();

    assert_eq!(bridge.parse("{ a = 1 }\0{", "t.ncl").unwrap(), None);
    assert_eq!(bridge.validate("{ a = 1 }\0{", "t.ncl").unwrap().code(), -1);

    assert_eq!(counters.calls(), calls);
}
