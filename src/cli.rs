use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::normalize::SchemaVariant;
use crate::settings::{self, GenerationSettings};
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "xcresult-report",
    version,
    about = "Turn an xcresult bundle into a GitHub Check Run report",
    long_about = None
)]
pub struct Cli {
  /// Path to the .xcresult bundle
  #[arg(required_unless_present = "gen_man")]
  pub results: Option<PathBuf>,

  /// What to emit (default: full console analysis)
  #[arg(value_enum, default_value_t = Mode::Analyze)]
  pub command: Mode,

  /// Workspace prefix stripped from annotation paths, e.g. /Users/ci/project
  #[arg(long, default_value = "")]
  pub path_prefix: String,

  /// Check run name / report title
  #[arg(long, default_value = "Xcode Results")]
  pub title: String,

  /// Bundle schema produced by the local Xcode toolchain
  #[arg(long, value_enum, default_value_t = SchemaVariant::Compact)]
  pub schema: SchemaVariant,

  /// Omit the prose summary block
  #[arg(long)]
  pub no_summary: bool,

  /// Omit the build errors/warnings table
  #[arg(long)]
  pub no_build_table: bool,

  /// Omit the test totals table
  #[arg(long)]
  pub no_test_table: bool,

  /// Do not annotate failing tests
  #[arg(long)]
  pub no_test_failure_annotations: bool,

  /// Do not annotate compiler warnings
  #[arg(long)]
  pub no_warning_annotations: bool,

  /// Do not annotate build errors
  #[arg(long)]
  pub no_error_annotations: bool,

  /// Omit the destination/SDK table
  #[arg(long)]
  pub no_sdk_info: bool,

  /// Omit the per-action timing section
  #[arg(long)]
  pub no_timing: bool,

  /// Read settings, pathPrefix and title from GitHub Actions INPUT_* env vars
  #[arg(long)]
  pub from_action: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

/// Output modes, mirroring the subcommands CI pipelines script against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  /// Console report: metrics, summary markdown and annotations
  Analyze,
  /// Markdown summary only
  Summary,
  /// Metrics as JSON
  Metrics,
  /// The bare conclusion word: success or failure
  Conclusion,
  /// Annotations as JSON
  Annotations,
  /// Create a GitHub Check Run for the current commit
  Check,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EffectiveConfig {
  pub results: String, // absolute path for stability
  pub command: Mode,
  pub schema: SchemaVariant,
  pub path_prefix: String,
  pub title: String,
  pub settings: GenerationSettings,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let Some(results) = &cli.results else {
    bail!("missing path to an .xcresult bundle");
  };

  // Inside an action step the workflow declares every input; flags on the
  // command line are ignored in favor of the INPUT_* environment.
  let (settings, path_prefix, title) = if cli.from_action {
    (
      GenerationSettings::from_action_env(),
      settings::action_input("pathPrefix").unwrap_or_default(),
      settings::action_input("title").unwrap_or_else(|| cli.title.clone()),
    )
  } else {
    let settings = GenerationSettings {
      summary: !cli.no_summary,
      build_summary_table: !cli.no_build_table,
      test_summary_table: !cli.no_test_table,
      test_failure_annotations: !cli.no_test_failure_annotations,
      warning_annotations: !cli.no_warning_annotations,
      error_annotations: !cli.no_error_annotations,
      show_sdk_info: !cli.no_sdk_info,
      timing_summary: !cli.no_timing,
    };
    (settings, cli.path_prefix.clone(), cli.title.clone())
  };

  Ok(EffectiveConfig {
    results: util::canonicalize_lossy(results),
    command: cli.command,
    schema: cli.schema,
    path_prefix,
    title,
    settings,
  })
}
