//! Builds the fixture engine library for integration tests
//!
//! Shared by the test suites of `bunsenite-ffi-bridge` and `bunsenite-cli`
//! through `#[path]`. The library is built once per test binary into its own
//! target directory, `target/engine-fixture/target`, so the nested cargo
//! invocation never waits on the lock held by the outer one.

#![allow(dead_code)]

use bunsenite_core::Platform;
use bunsenite_ffi_bridge::LibraryLocator;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// Base name of the fixture library (`libbunsenite_fixture.so` on Linux)
pub const FIXTURE_BASE_NAME: &str = "bunsenite_fixture";

static BUILT: OnceLock<Result<PathBuf, String>> = OnceLock::new();

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn build() -> Result<PathBuf, String> {
    let base = workspace_root().join("target").join("engine-fixture");
    let cargo = std::env::var_os("CARGO").unwrap_or_else(|| "cargo".into());
    let output = Command::new(cargo)
        .current_dir(workspace_root())
        .args(["build", "--release", "--quiet", "-p", "bunsenite-engine-fixture"])
        .arg("--target-dir")
        .arg(base.join("target"))
        .output()
        .map_err(|e| format!("failed to run cargo: {e}"))?;
    if !output.status.success() {
        return Err(format!(
            "building the fixture engine failed:\n{}",
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(base)
}

/// Directory whose `target/release` holds the built fixture library
pub fn fixture_base_dir() -> &'static Path {
    match BUILT.get_or_init(build) {
        Ok(base) => base,
        Err(e) => panic!("{e}"),
    }
}

/// Locator that finds the fixture through the default search directories
pub fn fixture_locator() -> LibraryLocator {
    LibraryLocator::new()
        .base_dir(fixture_base_dir())
        .base_name(FIXTURE_BASE_NAME)
}

/// Copies the fixture into `dir` under the engine's real filename
///
/// Lets binaries that only know the default base name load the fixture with
/// `--library-dir dir`.
pub fn install_as_engine(dir: &Path) -> PathBuf {
    let built = fixture_locator().locate().expect("fixture library was built");
    let target = dir.join(Platform::current().library_filename("bunsenite"));
    std::fs::copy(&built, &target).expect("copy fixture library");
    target
}
