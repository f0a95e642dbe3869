//! Command implementations.
//!
//! Each command writes its report to the supplied writer and returns an
//! [`Outcome`]; progress goes through the `log` facade so `-q` can silence it.

use std::io::Write;

use bng_centre_point::{BngCentrePoint, GridReference};
use camino::Utf8Path;
use log::{debug, info};
use serde_json::Value;
use warden::SharedConfig;
use warden_common::{Datatype, FieldContext, Localizer, Tile};
use warden_suite::{Registry, ResourceModel, validate_tile};

use crate::cli::{CentreArgs, CheckTileArgs, Cli, Command, ListArgs, ValidateArgs};
use crate::error::{CliError, Outcome, Result};
use crate::output::{
    format_centre_human, format_centre_json, format_listing_human, format_listing_json,
    format_tile_report, format_verdict,
};

const LOG_TARGET: &str = "warden_cli";

/// Configuration and locale shared by every command.
#[derive(Debug)]
pub struct Session {
    config: SharedConfig,
    localizer: Localizer,
}

impl Session {
    /// Loads the configuration named on the command line, or `warden.toml`
    /// from `working_dir`, and resolves the message locale.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] when the configuration cannot be loaded.
    pub fn load(cli: &Cli, working_dir: &Utf8Path) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => SharedConfig::load_from(path)?,
            None => SharedConfig::discover(working_dir)?,
        };
        let choice = config.choose_locale(cli.locale.as_deref());
        choice.log(LOG_TARGET);

        Ok(Self {
            config,
            localizer: choice.into_localizer(),
        })
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Returns the localizer for failure messages.
    #[must_use]
    pub const fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    fn registry(&self, plugins: Option<&Utf8Path>) -> Result<Registry> {
        let registry = match plugins {
            Some(directory) => {
                let mut registry = Registry::new(self.config.clone());
                let count = registry.load_plugin_dir(directory)?;
                info!(target: LOG_TARGET, "Loaded {count} plugin definition(s) from {directory}");
                registry
            }
            None => Registry::with_bundled_plugins(self.config.clone())?,
        };
        Ok(registry.with_localizer(self.localizer.clone()))
    }
}

/// Runs the command selected on the command line.
///
/// # Errors
///
/// Returns a [`CliError`] when configuration, plugin definitions, or input
/// documents cannot be loaded, or when the report cannot be written.
pub fn run(cli: &Cli, working_dir: &Utf8Path, stdout: &mut dyn Write) -> Result<Outcome> {
    let session = Session::load(cli, working_dir)?;
    match &cli.command {
        Command::Validate(args) => validate(&session, args, stdout),
        Command::Centre(args) => centre(&session, args, stdout),
        Command::CheckTile(args) => check_tile(&session, args, stdout),
        Command::List(args) => list(&session, args, stdout),
    }
}

fn validate(session: &Session, args: &ValidateArgs, stdout: &mut dyn Write) -> Result<Outcome> {
    let datatype = BngCentrePoint::from_shared(session.config());
    let field = FieldContext::detached(session.localizer());

    let mut outcome = Outcome::Valid;
    for value in &args.values {
        let failures = datatype.validate(&Value::String(value.clone()), &field);
        if !failures.is_empty() {
            outcome = outcome.and(Outcome::Invalid);
        }
        write!(stdout, "{}", format_verdict(value, &failures))?;
    }

    debug!(
        target: LOG_TARGET,
        "validated {} value(s): {outcome:?}",
        args.values.len()
    );
    Ok(outcome)
}

fn centre(session: &Session, args: &CentreArgs, stdout: &mut dyn Write) -> Result<Outcome> {
    let datatype = BngCentrePoint::from_shared(session.config());

    match GridReference::parse(&args.value, datatype.config()) {
        Ok(reference) => {
            let rendered = if args.json {
                format!("{}\n", format_centre_json(&reference)?)
            } else {
                format_centre_human(&reference)
            };
            write!(stdout, "{rendered}")?;
            Ok(Outcome::Valid)
        }
        Err(error) => {
            debug!(target: LOG_TARGET, "{} rejected: {error}", args.value);
            let field = FieldContext::detached(session.localizer());
            let failures = datatype.validate(&Value::String(args.value.clone()), &field);
            write!(stdout, "{}", format_verdict(&args.value, &failures))?;
            Ok(Outcome::Invalid)
        }
    }
}

fn check_tile(session: &Session, args: &CheckTileArgs, stdout: &mut dyn Write) -> Result<Outcome> {
    let registry = session.registry(args.plugins.as_deref())?;
    let model = ResourceModel::load_from(&args.model)?;
    if !model.is_active {
        info!(
            target: LOG_TARGET,
            "Model {} is inactive; tiles will validate but cannot be saved",
            model.graph_id
        );
    }
    let tile = read_tile(&args.tile)?;

    let failures = validate_tile(&tile, &model, &registry);
    write!(stdout, "{}", format_tile_report(tile.tile_id(), &failures))?;

    Ok(if failures.is_empty() {
        Outcome::Valid
    } else {
        Outcome::Invalid
    })
}

fn list(session: &Session, args: &ListArgs, stdout: &mut dyn Write) -> Result<Outcome> {
    let registry = session.registry(args.plugins.as_deref())?;
    let rendered = if args.json {
        format!("{}\n", format_listing_json(&registry)?)
    } else {
        format_listing_human(&registry)
    };
    write!(stdout, "{rendered}")?;
    Ok(Outcome::Valid)
}

fn read_tile(path: &Utf8Path) -> Result<Tile> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::TileRead {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| CliError::TileJson {
        path: path.to_owned(),
        source,
    })
}
