//! Plugin definition documents.
//!
//! Datatypes and widgets are described by small JSON files shipped with the
//! plugin. The registry reads them at start-up; the documents themselves carry
//! no behaviour beyond naming the implementation and the default widget.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RegistryError;

/// A datatype definition such as `plugins/datatypes/bngcentrepoint.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatatypeDefinition {
    /// Datatype identifier referenced by resource model nodes.
    pub datatype: String,
    /// Icon shown beside the datatype in graph editors.
    #[serde(default)]
    pub iconclass: String,
    /// Name of the built-in implementation that validates values.
    pub implementation: String,
    /// Widget used to edit values when a node does not name one.
    #[serde(default)]
    pub defaultwidget: Option<String>,
    /// Node configuration applied when the datatype is first selected.
    #[serde(default)]
    pub defaultconfig: Option<Value>,
    /// Component that edits the node configuration.
    #[serde(default)]
    pub configcomponent: Option<String>,
    /// Registered name of the configuration component.
    #[serde(default)]
    pub configname: Option<String>,
    /// Whether values carry a geometry.
    #[serde(default)]
    pub isgeometric: bool,
}

/// A widget definition such as `plugins/widgets/bngpoint.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetDefinition {
    /// Widget name referenced by datatype definitions.
    pub name: String,
    /// Front-end component rendering the widget.
    pub component: String,
    /// Datatype the widget edits.
    pub datatype: String,
    /// Help text shown beside the widget.
    #[serde(default)]
    pub helptext: Option<String>,
    /// Widget configuration applied when the widget is first selected.
    #[serde(default)]
    pub defaultconfig: Option<Value>,
}

pub(crate) fn read_definition<T>(path: &Utf8Path) -> Result<T, RegistryError>
where
    T: for<'de> Deserialize<'de>,
{
    let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| RegistryError::Json {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn reads_a_datatype_definition() {
        let source = json!({
            "datatype": "bngcentrepoint",
            "iconclass": "fa fa-location-arrow",
            "implementation": "bng_centre_point",
            "defaultwidget": "bngpoint",
            "defaultconfig": null,
            "configcomponent": null,
            "configname": null,
            "isgeometric": false,
        });

        let definition: DatatypeDefinition =
            serde_json::from_value(source).expect("definition should deserialise");

        assert_eq!(definition.datatype, "bngcentrepoint");
        assert_eq!(definition.defaultwidget.as_deref(), Some("bngpoint"));
        assert!(definition.defaultconfig.is_none());
        assert!(!definition.isgeometric);
    }

    #[rstest]
    fn optional_widget_fields_default() {
        let source = json!({
            "name": "bngpoint",
            "component": "views/components/widgets/bngpoint",
            "datatype": "bngcentrepoint",
        });

        let definition: WidgetDefinition =
            serde_json::from_value(source).expect("definition should deserialise");

        assert!(definition.helptext.is_none());
        assert!(definition.defaultconfig.is_none());
    }

    #[rstest]
    fn reports_the_path_of_malformed_files() {
        let directory = tempfile::tempdir().expect("temporary directory");
        let path = Utf8Path::from_path(directory.path())
            .expect("utf-8 temp path")
            .join("broken.json");
        std::fs::write(&path, "{").expect("write definition");

        let outcome = read_definition::<WidgetDefinition>(&path);

        match outcome {
            Err(RegistryError::Json { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected a JSON error, got {other:?}"),
        }
    }
}
