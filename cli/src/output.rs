//! Output formatting for CLI reports.
//!
//! Human output strips the Unicode isolation marks Fluent places around
//! interpolated arguments so terminals show plain text. JSON output is
//! pretty-printed.

use bng_centre_point::{CentrePoint, GridReference};
use serde::Serialize;
use serde_json::Value;
use warden_common::i18n::strip_isolation_marks;
use warden_common::{TileId, ValidationFailure};
use warden_suite::{DatatypeDefinition, Registry, WidgetDefinition};

/// Formats the verdict for one value passed to `warden validate`.
///
/// # Examples
///
/// ```
/// use warden_cli::output::format_verdict;
///
/// assert_eq!(format_verdict("SU1025169962", &[]), "SU1025169962: valid\n");
/// ```
#[must_use]
pub fn format_verdict(value: &str, failures: &[ValidationFailure]) -> String {
    if failures.is_empty() {
        return format!("{value}: valid\n");
    }

    let mut output = String::new();
    for failure in failures {
        output.push_str(&format!("{value}: {}\n", plain(failure.message())));
        push_details(&mut output, failure, "  ");
    }
    output
}

/// Formats the result of validating a tile.
#[must_use]
pub fn format_tile_report(tile_id: TileId, failures: &[ValidationFailure]) -> String {
    if failures.is_empty() {
        return format!("tile {tile_id}: valid\n");
    }

    let mut output = format!("tile {tile_id}: {} failure(s)\n", failures.len());
    for failure in failures {
        match failure.node() {
            Some(node) => output.push_str(&format!("  node {node}: ")),
            None => output.push_str("  "),
        }
        output.push_str(&plain(failure.message()));
        output.push('\n');
        push_details(&mut output, failure, "    ");
    }
    output
}

/// Formats a centre point as `REFERENCE: EASTING, NORTHING`.
#[must_use]
pub fn format_centre_human(reference: &GridReference) -> String {
    format!("{}: {}\n", reference.spaced(), reference.centre_point())
}

/// Formats a centre point as JSON with a GeoJSON geometry.
///
/// # Errors
///
/// Returns the serialisation error if the document cannot be rendered.
pub fn format_centre_json(reference: &GridReference) -> serde_json::Result<String> {
    let centre = reference.centre_point();
    let document = CentreJson {
        reference: reference.to_string(),
        resolution: reference.resolution_metres(),
        centre,
        geometry: centre.to_geojson(),
    };
    serde_json::to_string_pretty(&document)
}

/// Formats the registered datatypes and widgets for human-readable output.
#[must_use]
pub fn format_listing_human(registry: &Registry) -> String {
    let mut output = String::from("Datatypes:\n");
    let mut any = false;
    for definition in registry.datatypes() {
        any = true;
        output.push_str(&format!(
            "  {} ({})",
            definition.datatype, definition.implementation
        ));
        if let Some(widget) = &definition.defaultwidget {
            output.push_str(&format!(", default widget {widget}"));
        }
        output.push('\n');
    }
    if !any {
        output.push_str("  (none)\n");
    }

    output.push_str("\nWidgets:\n");
    any = false;
    for widget in registry.widgets() {
        any = true;
        output.push_str(&format!(
            "  {} edits {} ({})\n",
            widget.name, widget.datatype, widget.component
        ));
    }
    if !any {
        output.push_str("  (none)\n");
    }
    output
}

/// Formats the registered datatypes and widgets as JSON.
///
/// # Errors
///
/// Returns the serialisation error if the listing cannot be rendered.
pub fn format_listing_json(registry: &Registry) -> serde_json::Result<String> {
    let listing = Listing {
        datatypes: registry.datatypes().collect(),
        widgets: registry.widgets().collect(),
    };
    serde_json::to_string_pretty(&listing)
}

#[derive(Debug, Serialize)]
struct CentreJson {
    reference: String,
    resolution: u32,
    centre: CentrePoint,
    geometry: Value,
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    datatypes: Vec<&'a DatatypeDefinition>,
    widgets: Vec<&'a WidgetDefinition>,
}

fn push_details(output: &mut String, failure: &ValidationFailure, indent: &str) {
    for note in failure.notes() {
        output.push_str(&format!("{indent}note: {}\n", plain(note)));
    }
    for help in failure.helps() {
        output.push_str(&format!("{indent}help: {}\n", plain(help)));
    }
}

fn plain(text: &str) -> String {
    strip_isolation_marks(text).into_owned()
}
