// src/config/model.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::dag::graph::{Recipe, RecipeGraph};
use crate::exec::action::{Action, NoopAction};
use crate::exec::command::{CompileAction, LinkAction, ShellAction, DEFAULT_COMPILER};
use crate::state::DEFAULT_STATE_FILE;
use crate::types::TargetId;

/// Top-level recipe file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// state_file = "recipes.aux"
/// default_target = "hw"
///
/// [recipe."main.o"]
/// deps = ["main.c"]
/// action = { kind = "compile", flags = ["-Wall", "-g"] }
///
/// [recipe.hw]
/// deps = ["main.o"]
/// action = { kind = "link" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// Keys are target identifiers (usually output file names).
    #[serde(default)]
    pub recipe: BTreeMap<TargetId, RecipeConfig>,
}

/// Validated recipe file. Construct through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub recipe: BTreeMap<TargetId, RecipeConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        recipe: BTreeMap<TargetId, RecipeConfig>,
    ) -> Self {
        Self { config, recipe }
    }

    /// Build the engine-facing graph, wiring a concrete action per recipe.
    pub fn recipe_graph(&self) -> RecipeGraph {
        self.recipe
            .iter()
            .map(|(target, rc)| {
                (
                    target.clone(),
                    Recipe::with_shared_action(rc.deps.iter().cloned(), rc.action.build()),
                )
            })
            .collect()
    }

    /// Target names declared in the file, i.e. everything `clean` removes.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.recipe.keys().map(|s| s.as_str())
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Where the build state is persisted between runs.
    #[serde(default = "default_state_file")]
    pub state_file: String,

    /// Target built when none is named on the command line.
    #[serde(default)]
    pub default_target: Option<TargetId>,
}

fn default_state_file() -> String {
    DEFAULT_STATE_FILE.to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            default_target: None,
        }
    }
}

/// `[recipe.<target>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeConfig {
    /// Dependencies, resolved in this order.
    #[serde(default)]
    pub deps: Vec<TargetId>,

    /// How to rebuild the target. Defaults to a no-op (phony aggregate).
    #[serde(default)]
    pub action: ActionConfig,
}

/// Action kinds available from a recipe file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ActionConfig {
    /// `<compiler> <deps[0]> -c -o <target> <flags...>`
    Compile {
        #[serde(default)]
        compiler: Option<String>,
        #[serde(default)]
        flags: Option<Vec<String>>,
    },
    /// `<linker> <deps...> -o <target> <flags...>`
    Link {
        #[serde(default)]
        linker: Option<String>,
        #[serde(default)]
        flags: Vec<String>,
    },
    /// `sh -c <cmd>` with `TARGET` and `DEPS` in the environment.
    Shell { cmd: String },
    #[default]
    Noop,
}

impl ActionConfig {
    pub fn build(&self) -> Arc<dyn Action> {
        match self {
            ActionConfig::Compile { compiler, flags } => {
                let mut action = CompileAction::default();
                if let Some(compiler) = compiler {
                    action.compiler = compiler.clone();
                }
                if let Some(flags) = flags {
                    action.flags = flags.clone();
                }
                Arc::new(action)
            }
            ActionConfig::Link { linker, flags } => Arc::new(LinkAction {
                linker: linker.clone().unwrap_or_else(|| DEFAULT_COMPILER.to_string()),
                flags: flags.clone(),
            }),
            ActionConfig::Shell { cmd } => Arc::new(ShellAction::new(cmd.clone())),
            ActionConfig::Noop => Arc::new(NoopAction),
        }
    }
}
