//! Behaviour-driven tests for shared configuration loading.

use std::cell::RefCell;
use std::convert::Infallible;
use std::str::FromStr;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;
use warden::{CONFIG_FILE_NAME, SharedConfig, SquareSet};

struct ConfigWorld {
    directory: TempDir,
    result: RefCell<Option<Result<SharedConfig, String>>>,
}

impl ConfigWorld {
    fn root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.directory.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temporary directory {} is not UTF-8", path.display()))
    }

    fn write_config(&self, contents: &str) {
        std::fs::write(self.root().join(CONFIG_FILE_NAME), contents)
            .unwrap_or_else(|error| panic!("failed to write {CONFIG_FILE_NAME}: {error}"));
    }

    fn loaded(&self) -> SharedConfig {
        match self.result.borrow().as_ref() {
            Some(Ok(config)) => config.clone(),
            Some(Err(error)) => panic!("expected configuration loading to succeed: {error}"),
            None => panic!("configuration should be loaded"),
        }
    }
}

#[fixture]
fn world() -> ConfigWorld {
    ConfigWorld {
        directory: TempDir::new().unwrap_or_else(|error| panic!("temp dir: {error}")),
        result: RefCell::new(None),
    }
}

#[derive(Debug)]
struct ErrorSnippet(String);

impl FromStr for ErrorSnippet {
    type Err = Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input
            .trim()
            .trim_matches(|candidate| matches!(candidate, '"' | '\''));

        Ok(Self(trimmed.to_owned()))
    }
}

#[given("no configuration state has been prepared")]
fn reset_state(world: &ConfigWorld) {
    world.result.borrow_mut().take();
    if std::fs::remove_file(world.root().join(CONFIG_FILE_NAME)).is_err() {
        // A fresh workspace has no file to remove.
    }
}

#[given("no workspace configuration file exists")]
fn no_file(world: &ConfigWorld) {
    assert!(!world.root().join(CONFIG_FILE_NAME).exists());
}

#[given("the workspace config sets the minimum digits per axis to {value}")]
fn override_min_digits(world: &ConfigWorld, value: u8) {
    world.write_config(&format!("[bng_centre_point]\nmin_digits = {value}\n"));
}

#[given("the workspace config includes unknown fields")]
fn unknown_fields(world: &ConfigWorld) {
    world.write_config(concat!(
        "unexpected = true\n",
        "[bng_centre_point]\n",
        "min_digits = 5\n",
    ));
}

#[when("the shared configuration is loaded")]
fn load_config(world: &ConfigWorld) {
    let outcome = SharedConfig::discover(&world.root()).map_err(|error| error.to_string());
    world.result.borrow_mut().replace(outcome);
}

#[then("the minimum digits per axis is {expected}")]
fn assert_min_digits(world: &ConfigWorld, expected: u8) {
    assert_eq!(world.loaded().bng_centre_point.min_digits, expected);
}

#[then("the grid square set is land")]
fn assert_land_squares(world: &ConfigWorld) {
    assert_eq!(world.loaded().bng_centre_point.squares, SquareSet::Land);
}

#[then("a configuration error mentioning {snippet} is reported")]
fn assert_error_with_snippet(world: &ConfigWorld, snippet: ErrorSnippet) {
    let expected = snippet.0;
    match world.result.borrow().as_ref() {
        Some(Err(error)) => {
            assert!(
                error.contains(expected.as_str()),
                "expected error '{error}' to mention '{expected}'",
            );
        }
        Some(Ok(config)) => {
            panic!("expected configuration loading to fail but succeeded with {config:?}")
        }
        None => panic!("configuration should be loaded"),
    }
}

#[scenario("tests/features/config_loading.feature", index = 0)]
fn scenario_defaults(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 1)]
fn scenario_override(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 2)]
fn scenario_invalid_range(world: ConfigWorld) {
    let _ = world;
}

#[scenario("tests/features/config_loading.feature", index = 3)]
fn scenario_unknown_fields(world: ConfigWorld) {
    let _ = world;
}
