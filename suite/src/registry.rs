//! Explicit registry of datatype and widget plugins.
//!
//! The registry is populated once at start-up, either definition by
//! definition or from a plugin directory laid out as `widgets/*.json` and
//! `datatypes/*.json`, and is read-only afterwards. Datatype definitions must
//! name one of the [`SUITE_DATATYPES`](crate::SUITE_DATATYPES)
//! implementations and a default widget that is already registered.

use std::collections::BTreeMap;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use warden::SharedConfig;
use warden_common::{Datatype, Localizer};

use crate::datatypes::implementation;
use crate::definition::{DatatypeDefinition, WidgetDefinition, read_definition};
use crate::error::RegistryError;

/// Result type alias using [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;

const LOG_TARGET: &str = "warden_suite::registry";

/// Sub-directory of a plugin directory holding widget definitions.
pub const WIDGETS_DIR: &str = "widgets";

/// Sub-directory of a plugin directory holding datatype definitions.
pub const DATATYPES_DIR: &str = "datatypes";

const BUNDLED_WIDGETS: &[(&str, &str)] = &[(
    "plugins/widgets/bngpoint.json",
    include_str!("../plugins/widgets/bngpoint.json"),
)];

const BUNDLED_DATATYPES: &[(&str, &str)] = &[(
    "plugins/datatypes/bngcentrepoint.json",
    include_str!("../plugins/datatypes/bngcentrepoint.json"),
)];

/// A datatype definition bound to its implementation.
pub struct RegisteredDatatype {
    definition: DatatypeDefinition,
    implementation: Box<dyn Datatype>,
}

impl RegisteredDatatype {
    /// Returns the definition the datatype was registered from.
    #[must_use]
    pub const fn definition(&self) -> &DatatypeDefinition {
        &self.definition
    }

    /// Returns the implementation that validates values.
    #[must_use]
    pub fn implementation(&self) -> &dyn Datatype {
        self.implementation.as_ref()
    }
}

impl fmt::Debug for RegisteredDatatype {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RegisteredDatatype")
            .field("definition", &self.definition)
            .field("implementation", &self.implementation.name())
            .finish()
    }
}

/// Datatypes and widgets available to tile validation.
#[derive(Debug)]
pub struct Registry {
    config: SharedConfig,
    localizer: Localizer,
    widgets: BTreeMap<String, WidgetDefinition>,
    datatypes: BTreeMap<String, RegisteredDatatype>,
}

impl Registry {
    /// Creates an empty registry.
    ///
    /// Failure messages use the locale from `WARDEN_LOCALE` or the
    /// configuration; see [`Self::with_localizer`] to override it.
    #[must_use]
    pub fn new(config: SharedConfig) -> Self {
        let localizer = config.localizer(LOG_TARGET);
        Self {
            config,
            localizer,
            widgets: BTreeMap::new(),
            datatypes: BTreeMap::new(),
        }
    }

    /// Creates a registry holding the plugin definitions bundled with the
    /// suite.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] if a bundled definition is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use warden::SharedConfig;
    /// use warden_suite::Registry;
    ///
    /// let registry = Registry::with_bundled_plugins(SharedConfig::default())?;
    /// assert!(registry.datatype("bngcentrepoint").is_some());
    /// assert!(registry.widget("bngpoint").is_some());
    /// # Ok::<(), warden_suite::RegistryError>(())
    /// ```
    pub fn with_bundled_plugins(config: SharedConfig) -> Result<Self> {
        let mut registry = Self::new(config);
        for (path, source) in BUNDLED_WIDGETS {
            registry.register_widget(parse_bundled(path, source)?)?;
        }
        for (path, source) in BUNDLED_DATATYPES {
            registry.register_datatype(parse_bundled(path, source)?)?;
        }
        Ok(registry)
    }

    /// Replaces the localizer used for failure messages.
    #[must_use]
    pub fn with_localizer(mut self, localizer: Localizer) -> Self {
        self.localizer = localizer;
        self
    }

    /// Returns the localizer used for failure messages.
    #[must_use]
    pub const fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// Returns the configuration datatypes are built with.
    #[must_use]
    pub const fn config(&self) -> &SharedConfig {
        &self.config
    }

    /// Registers a widget.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateWidget`] if the name is taken.
    pub fn register_widget(&mut self, definition: WidgetDefinition) -> Result<()> {
        if self.widgets.contains_key(&definition.name) {
            return Err(RegistryError::DuplicateWidget {
                name: definition.name,
            });
        }
        debug!(target: LOG_TARGET, "registered widget {}", definition.name);
        self.widgets.insert(definition.name.clone(), definition);
        Ok(())
    }

    /// Reads a widget definition from `path` and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Read`] or [`RegistryError::Json`] when the
    /// file cannot be loaded, otherwise as [`Self::register_widget`].
    pub fn register_widget_from_path(&mut self, path: &Utf8Path) -> Result<()> {
        self.register_widget(read_definition(path)?)
    }

    /// Registers a datatype, binding it to its implementation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateDatatype`] if the identifier is
    /// taken, [`RegistryError::UnknownImplementation`] if the implementation
    /// is not bundled, and [`RegistryError::MissingDefaultWidget`] if the
    /// default widget has not been registered.
    pub fn register_datatype(&mut self, definition: DatatypeDefinition) -> Result<()> {
        if self.datatypes.contains_key(&definition.datatype) {
            return Err(RegistryError::DuplicateDatatype {
                name: definition.datatype,
            });
        }
        let Some(descriptor) = implementation(&definition.implementation) else {
            return Err(RegistryError::UnknownImplementation {
                datatype: definition.datatype,
                implementation: definition.implementation,
            });
        };
        if let Some(widget_name) = &definition.defaultwidget {
            let Some(widget) = self.widgets.get(widget_name) else {
                return Err(RegistryError::MissingDefaultWidget {
                    datatype: definition.datatype.clone(),
                    widget: widget_name.clone(),
                });
            };
            if widget.datatype != definition.datatype {
                warn!(
                    target: LOG_TARGET,
                    "widget {widget_name} edits {} but is the default for {}",
                    widget.datatype,
                    definition.datatype,
                );
            }
        }

        debug!(
            target: LOG_TARGET,
            "registered datatype {} with implementation {}",
            definition.datatype,
            descriptor.crate_name,
        );
        let registered = RegisteredDatatype {
            implementation: descriptor.build(&self.config),
            definition,
        };
        self.datatypes
            .insert(registered.definition.datatype.clone(), registered);
        Ok(())
    }

    /// Reads a datatype definition from `path` and registers it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Read`] or [`RegistryError::Json`] when the
    /// file cannot be loaded, otherwise as [`Self::register_datatype`].
    pub fn register_datatype_from_path(&mut self, path: &Utf8Path) -> Result<()> {
        self.register_datatype(read_definition(path)?)
    }

    /// Removes a datatype, returning its definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownDatatype`] if nothing is registered
    /// under `name`.
    pub fn unregister_datatype(&mut self, name: &str) -> Result<DatatypeDefinition> {
        let registered = self
            .datatypes
            .remove(name)
            .ok_or_else(|| RegistryError::UnknownDatatype {
                name: name.to_owned(),
            })?;
        debug!(target: LOG_TARGET, "unregistered datatype {name}");
        Ok(registered.definition)
    }

    /// Removes a widget, returning its definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownWidget`] if nothing is registered
    /// under `name` and [`RegistryError::WidgetInUse`] while a datatype still
    /// names it as its default widget.
    pub fn unregister_widget(&mut self, name: &str) -> Result<WidgetDefinition> {
        if let Some(dependant) = self
            .datatypes
            .values()
            .find(|registered| registered.definition.defaultwidget.as_deref() == Some(name))
        {
            return Err(RegistryError::WidgetInUse {
                widget: name.to_owned(),
                datatype: dependant.definition.datatype.clone(),
            });
        }
        let definition = self
            .widgets
            .remove(name)
            .ok_or_else(|| RegistryError::UnknownWidget {
                name: name.to_owned(),
            })?;
        debug!(target: LOG_TARGET, "unregistered widget {name}");
        Ok(definition)
    }

    /// Registers every definition under `directory`: widgets first, then
    /// datatypes, each in file-name order. Missing sub-directories are
    /// skipped.
    ///
    /// Returns the number of definitions registered.
    ///
    /// # Errors
    ///
    /// Stops at the first definition that cannot be read or registered.
    pub fn load_plugin_dir(&mut self, directory: &Utf8Path) -> Result<usize> {
        let widgets = definition_files(&directory.join(WIDGETS_DIR))?;
        let datatypes = definition_files(&directory.join(DATATYPES_DIR))?;

        for path in &widgets {
            self.register_widget_from_path(path)?;
        }
        for path in &datatypes {
            self.register_datatype_from_path(path)?;
        }

        let count = widgets.len() + datatypes.len();
        debug!(target: LOG_TARGET, "loaded {count} plugin definitions from {directory}");
        Ok(count)
    }

    /// Returns the implementation registered under `name`.
    #[must_use]
    pub fn datatype(&self, name: &str) -> Option<&dyn Datatype> {
        self.datatypes
            .get(name)
            .map(RegisteredDatatype::implementation)
    }

    /// Returns the registration for `name`.
    #[must_use]
    pub fn registered_datatype(&self, name: &str) -> Option<&RegisteredDatatype> {
        self.datatypes.get(name)
    }

    /// Returns the widget registered under `name`.
    #[must_use]
    pub fn widget(&self, name: &str) -> Option<&WidgetDefinition> {
        self.widgets.get(name)
    }

    /// Iterates over the registered datatype definitions in name order.
    pub fn datatypes(&self) -> impl Iterator<Item = &DatatypeDefinition> {
        self.datatypes.values().map(RegisteredDatatype::definition)
    }

    /// Iterates over the registered widget definitions in name order.
    pub fn widgets(&self) -> impl Iterator<Item = &WidgetDefinition> {
        self.widgets.values()
    }
}

fn parse_bundled<T>(path: &str, source: &str) -> Result<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    serde_json::from_str(source).map_err(|source| RegistryError::Json {
        path: Utf8PathBuf::from(path),
        source,
    })
}

fn definition_files(directory: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if !directory.is_dir() {
        debug!(target: LOG_TARGET, "no plugin definitions in {directory}");
        return Ok(Vec::new());
    }
    let read_error = |source| RegistryError::Read {
        path: directory.to_owned(),
        source,
    };

    let mut files = Vec::new();
    for entry in directory.read_dir_utf8().map_err(read_error)? {
        let path = entry.map_err(read_error)?.into_path();
        if path.extension() == Some("json") && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn widget(name: &str) -> WidgetDefinition {
        WidgetDefinition {
            name: name.to_owned(),
            component: format!("views/components/widgets/{name}"),
            datatype: bng_centre_point::DATATYPE_NAME.to_owned(),
            helptext: None,
            defaultconfig: None,
        }
    }

    fn datatype(widget: Option<&str>) -> DatatypeDefinition {
        DatatypeDefinition {
            datatype: bng_centre_point::DATATYPE_NAME.to_owned(),
            iconclass: String::from("fa fa-location-arrow"),
            implementation: String::from("bng_centre_point"),
            defaultwidget: widget.map(str::to_owned),
            defaultconfig: None,
            configcomponent: None,
            configname: None,
            isgeometric: false,
        }
    }

    #[fixture]
    fn registry() -> Registry {
        Registry::new(SharedConfig::default())
    }

    #[rstest]
    fn registers_a_datatype_after_its_widget(mut registry: Registry) {
        registry.register_widget(widget("bngpoint")).expect("widget registers");
        registry
            .register_datatype(datatype(Some("bngpoint")))
            .expect("datatype registers");

        let implementation = registry.datatype("bngcentrepoint").expect("registered");
        assert_eq!(implementation.name(), "bngcentrepoint");
        assert_eq!(registry.datatypes().count(), 1);
    }

    #[rstest]
    fn rejects_a_missing_default_widget(mut registry: Registry) {
        let outcome = registry.register_datatype(datatype(Some("bngpoint")));

        assert!(matches!(
            outcome,
            Err(RegistryError::MissingDefaultWidget { ref widget, .. }) if widget == "bngpoint"
        ));
        assert!(registry.datatype("bngcentrepoint").is_none());
    }

    #[rstest]
    fn datatypes_without_a_default_widget_register(mut registry: Registry) {
        registry.register_datatype(datatype(None)).expect("datatype registers");

        assert!(registry.datatype("bngcentrepoint").is_some());
    }

    #[rstest]
    fn rejects_unknown_implementations(mut registry: Registry) {
        let mut definition = datatype(None);
        definition.implementation = String::from("geojson_feature_collection");

        let outcome = registry.register_datatype(definition);

        assert!(matches!(outcome, Err(RegistryError::UnknownImplementation { .. })));
    }

    #[rstest]
    fn rejects_duplicates(mut registry: Registry) {
        registry.register_widget(widget("bngpoint")).expect("widget registers");
        registry.register_datatype(datatype(None)).expect("datatype registers");

        assert!(matches!(
            registry.register_widget(widget("bngpoint")),
            Err(RegistryError::DuplicateWidget { .. })
        ));
        assert!(matches!(
            registry.register_datatype(datatype(None)),
            Err(RegistryError::DuplicateDatatype { .. })
        ));
    }

    #[rstest]
    fn widgets_in_use_cannot_be_unregistered(mut registry: Registry) {
        registry.register_widget(widget("bngpoint")).expect("widget registers");
        registry
            .register_datatype(datatype(Some("bngpoint")))
            .expect("datatype registers");

        assert!(matches!(
            registry.unregister_widget("bngpoint"),
            Err(RegistryError::WidgetInUse { .. })
        ));

        registry
            .unregister_datatype("bngcentrepoint")
            .expect("datatype unregisters");
        registry.unregister_widget("bngpoint").expect("widget unregisters");
        assert_eq!(registry.widgets().count(), 0);
    }

    #[rstest]
    fn unregistering_unknown_names_fails(mut registry: Registry) {
        assert!(matches!(
            registry.unregister_datatype("missing"),
            Err(RegistryError::UnknownDatatype { .. })
        ));
        assert!(matches!(
            registry.unregister_widget("missing"),
            Err(RegistryError::UnknownWidget { .. })
        ));
    }

    #[rstest]
    fn bundled_plugins_register_cleanly() {
        let registry =
            Registry::with_bundled_plugins(SharedConfig::default()).expect("bundled plugins");

        let definition = registry
            .registered_datatype("bngcentrepoint")
            .map(RegisteredDatatype::definition)
            .expect("bundled datatype");
        assert_eq!(definition.defaultwidget.as_deref(), Some("bngpoint"));
    }

    #[rstest]
    fn loads_plugin_directories_widgets_first(mut registry: Registry) {
        let directory = Utf8Path::new(env!("CARGO_MANIFEST_DIR")).join("plugins");

        let count = registry.load_plugin_dir(&directory).expect("plugins load");

        assert_eq!(count, 2);
        assert!(registry.widget("bngpoint").is_some());
        assert!(registry.datatype("bngcentrepoint").is_some());
    }

    #[rstest]
    fn missing_plugin_directories_are_empty(mut registry: Registry) {
        let directory = tempfile::tempdir().expect("temporary directory");
        let path = Utf8Path::from_path(directory.path()).expect("utf-8 temp path");

        assert_eq!(registry.load_plugin_dir(path).expect("empty load"), 0);
    }
}
