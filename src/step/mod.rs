//! The workflow step: load a process's record, fill in default-display
//! metadata, save it back.
//!
//! The hosting workflow engine drives a step through the [`StepPlugin`]
//! lifecycle: [`initialize`](StepPlugin::initialize) with the step to work
//! on, then [`execute`](StepPlugin::execute), then
//! [`finish`](StepPlugin::finish) or [`cancel`](StepPlugin::cancel) to learn
//! where to return to.

mod notify;

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::populate::{PopulateContext, PopulateStats, populate_defaults};
use crate::record::DocumentRecord;
use crate::rules::DisplayRules;
use crate::store::RecordStore;

pub use notify::{CollectingNotifier, LogNotifier, Notifier};

/// Name under which the step registers with the host.
pub const PLUGIN_NAME: &str = "MetsCreation";

/// Language the default-display rules are evaluated in unless configured.
pub const DEFAULT_LANGUAGE: &str = "de";

/// Kind of plugin, as seen by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginType {
    Step,
}

/// How much user interface a step brings along. This step has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginGuiType {
    None,
}

/// Validation findings keyed by subject. Steps without checks report none.
pub type ValidationReport = HashMap<String, String>;

/// Lifecycle hooks a workflow host calls on a step plugin.
pub trait StepPlugin {
    fn title(&self) -> &str;

    fn plugin_type(&self) -> PluginType {
        PluginType::Step
    }

    /// Capture the step to work on and where to return afterwards.
    fn initialize(&mut self, step: Step, return_path: String);

    /// Run the step. Failures are logged and reported to the operator.
    fn execute(&mut self) -> bool;

    fn cancel(&self) -> Option<&str>;

    fn finish(&self) -> Option<&str>;

    fn validate(&self) -> Option<ValidationReport>;

    /// The step captured at initialization.
    fn step(&self) -> Option<&Step>;

    fn gui_type(&self) -> PluginGuiType;

    fn page_path(&self) -> Option<&str> {
        None
    }
}

/// A process (one digitized work in the workflow) with its record storage
/// and ruleset.
pub struct Process {
    pub title: String,
    store: Box<dyn RecordStore>,
    ruleset: Rc<dyn DisplayRules>,
}

impl Process {
    pub fn new(
        title: impl Into<String>,
        store: impl RecordStore + 'static,
        ruleset: impl DisplayRules + 'static,
    ) -> Self {
        Self {
            title: title.into(),
            store: Box::new(store),
            ruleset: Rc::new(ruleset),
        }
    }

    pub fn read_metadata(&self) -> Result<DocumentRecord> {
        self.store.read_record()
    }

    pub fn write_metadata(&self, record: &DocumentRecord) -> Result<()> {
        self.store.write_record(record)
    }

    pub fn ruleset(&self) -> Rc<dyn DisplayRules> {
        Rc::clone(&self.ruleset)
    }
}

impl std::fmt::Debug for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Process")
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// A workflow step belonging to a process.
#[derive(Debug)]
pub struct Step {
    pub name: String,
    pub process: Process,
}

impl Step {
    pub fn new(name: impl Into<String>, process: Process) -> Self {
        Self {
            name: name.into(),
            process,
        }
    }
}

/// Settings of the default-metadata step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepConfig {
    /// Language passed to the display rules.
    pub language: String,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Why a step execution failed. Every variant ends the execution.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("step has not been initialized")]
    NotInitialized,

    #[error("loading metadata failed: {0}")]
    Load(Error),

    #[error("creating default metadata failed: {0}")]
    Resolution(Error),

    #[error("saving metadata failed: {0}")]
    Save(Error),
}

/// Step plugin that creates empty entries for all default-display metadata.
pub struct MetsCreationStep {
    config: StepConfig,
    notifier: Box<dyn Notifier>,
    step: Option<Step>,
    return_path: Option<String>,
    ruleset: Option<Rc<dyn DisplayRules>>,
}

impl MetsCreationStep {
    pub fn new(config: StepConfig) -> Self {
        Self {
            config,
            notifier: Box::new(LogNotifier),
            step: None,
            return_path: None,
            ruleset: None,
        }
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn description(&self) -> &str {
        PLUGIN_NAME
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    /// Load, populate and save the record of the initialized step.
    ///
    /// Nothing is written unless population succeeded for the whole tree.
    pub fn run(&self) -> std::result::Result<PopulateStats, StepError> {
        let (Some(step), Some(ruleset)) = (&self.step, &self.ruleset) else {
            return Err(StepError::NotInitialized);
        };
        let process = &step.process;

        let mut record = process.read_metadata().map_err(StepError::Load)?;

        let context = PopulateContext::new(ruleset.as_ref()).with_record_id(&record.id);
        let stats = populate_defaults(&mut record.root, &self.config.language, &context)
            .map_err(StepError::Resolution)?;

        process.write_metadata(&record).map_err(StepError::Save)?;
        Ok(stats)
    }
}

impl StepPlugin for MetsCreationStep {
    fn title(&self) -> &str {
        PLUGIN_NAME
    }

    fn initialize(&mut self, step: Step, return_path: String) {
        self.ruleset = Some(step.process.ruleset());
        self.step = Some(step);
        self.return_path = Some(return_path);
    }

    fn execute(&mut self) -> bool {
        let process = self
            .step
            .as_ref()
            .map(|s| s.process.title.as_str())
            .unwrap_or_default();

        match self.run() {
            Ok(stats) => {
                info!(
                    process,
                    nodes = stats.nodes,
                    fields = stats.fields,
                    persons = stats.persons,
                    groups = stats.groups,
                    "created default metadata"
                );
                true
            }
            Err(e) => {
                error!(process, error = %e, "{PLUGIN_NAME} step failed");
                self.notifier.error(&e.to_string());
                false
            }
        }
    }

    fn cancel(&self) -> Option<&str> {
        self.return_path.as_deref()
    }

    fn finish(&self) -> Option<&str> {
        self.return_path.as_deref()
    }

    fn validate(&self) -> Option<ValidationReport> {
        None
    }

    fn step(&self) -> Option<&Step> {
        self.step.as_ref()
    }

    fn gui_type(&self) -> PluginGuiType {
        PluginGuiType::None
    }
}
