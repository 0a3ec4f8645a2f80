//! Command execution for ahuctl
//!
//! Builds the shared context (config, knowledge base, matcher) once, then
//! dispatches the parsed subcommand. Returns the process exit code.

use crate::cli::{Cli, Commands};
use crate::errors::{EXIT_EMPTY_INPUT, EXIT_SUCCESS};
use crate::output::Renderer;
use ahu_common::config::CONFIG_ENV;
use ahu_common::matcher::unreachable_keywords;
use ahu_common::report::{timestamp_now, DiagnosticReport};
use ahu_common::{AhuConfig, AlarmMatcher, KnowledgeBase};
use anyhow::{anyhow, bail, Context as _, Result};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs
pub struct Context {
    pub config: AhuConfig,
    pub matcher: AlarmMatcher,
    pub renderer: Renderer,
}

/// Options of the diagnose command
#[derive(Debug, Clone, Default)]
pub struct DiagnoseOptions {
    pub no_timestamp: bool,
    pub json: bool,
    pub summary: bool,
    pub explain: bool,
}

/// Global options that shape the context
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    pub config: Option<PathBuf>,
    pub kb: Option<PathBuf>,
    pub no_color: bool,
}

/// Resolve config and knowledge base, and build the matcher.
///
/// Precedence for both files: command line, then config/env, then the
/// standard locations.
pub fn load_context(opts: &ContextOptions) -> Result<Context> {
    let config_path = opts
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    let config = match config_path {
        Some(path) => AhuConfig::load_from_path(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AhuConfig::load().context("Failed to load config")?,
    };

    let kb_path = opts.kb.clone().or_else(|| config.knowledge_base.path.clone());
    let kb = match kb_path {
        Some(path) => KnowledgeBase::load_from(&path)
            .with_context(|| format!("Failed to load knowledge base {}", path.display()))?,
        None => KnowledgeBase::load().context("Failed to load knowledge base")?,
    };
    debug!("Knowledge base ready with {} alarm types", kb.len());

    let matcher = AlarmMatcher::new(Arc::new(kb), config.matcher)
        .context("Invalid matcher settings")?;

    let color = !opts.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stdout().is_terminal();

    Ok(Context {
        config,
        matcher,
        renderer: Renderer::new(color),
    })
}

/// Run the parsed command line
pub fn run(cli: Cli) -> Result<i32> {
    let opts = ContextOptions {
        config: cli.config,
        kb: cli.kb,
        no_color: cli.no_color,
    };

    match cli.command {
        Commands::Diagnose {
            text,
            no_timestamp,
            json,
            summary,
            explain,
        } => {
            let ctx = load_context(&opts)?;
            let alarm = if text.is_empty() {
                read_stdin()?
            } else {
                text.join(" ")
            };
            let diagnose_opts = DiagnoseOptions {
                no_timestamp,
                json,
                summary,
                explain,
            };
            diagnose(&ctx, &alarm, &diagnose_opts)
        }
        Commands::List => list(&load_context(&opts)?),
        Commands::Show { id } => show(&load_context(&opts)?, &id),
        Commands::ExportKb => export_kb(&load_context(&opts)?),
        Commands::InitConfig { path } => init_config(path),
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read alarm text from stdin")?;
    Ok(buf)
}

/// Build the report for `alarm` and render it in the requested format
pub fn render_diagnosis(ctx: &Context, alarm: &str, opts: &DiagnoseOptions) -> Result<String> {
    let timestamp = if ctx.config.report.include_timestamp && !opts.no_timestamp {
        Some(timestamp_now())
    } else {
        None
    };
    let report = DiagnosticReport::build(&ctx.matcher, alarm, timestamp);
    debug!("Diagnosis: {:?}", report.matched_ids());

    if opts.json {
        serde_json::to_string_pretty(&report).context("Failed to serialize report")
    } else if opts.summary {
        Ok(report.render_summary())
    } else {
        Ok(ctx.renderer.render_report(&report, opts.explain))
    }
}

fn diagnose(ctx: &Context, alarm: &str, opts: &DiagnoseOptions) -> Result<i32> {
    if alarm.trim().is_empty() {
        eprintln!("Enter an alarm message, e.g.: ahuctl diagnose \"Filter DP high on AHU F201\"");
        return Ok(EXIT_EMPTY_INPUT);
    }

    let out = render_diagnosis(ctx, alarm, opts)?;
    println!("{}", out.trim_end());
    Ok(EXIT_SUCCESS)
}

fn list(ctx: &Context) -> Result<i32> {
    let kb = ctx.matcher.knowledge_base();
    let unreachable = unreachable_keywords(kb);
    print!("{}", ctx.renderer.render_catalog(kb, &unreachable));
    Ok(EXIT_SUCCESS)
}

fn show(ctx: &Context, id: &str) -> Result<i32> {
    let category = ctx
        .matcher
        .knowledge_base()
        .get(id)
        .ok_or_else(|| anyhow!("Unknown alarm type: {} (see `ahuctl list`)", id))?;
    print!("{}", ctx.renderer.render_category(category));
    Ok(EXIT_SUCCESS)
}

fn export_kb(ctx: &Context) -> Result<i32> {
    let toml_str = ctx
        .matcher
        .knowledge_base()
        .to_toml()
        .context("Failed to export knowledge base")?;
    print!("{}", toml_str);
    Ok(EXIT_SUCCESS)
}

/// Does not overwrite an existing file
fn init_config(path: Option<PathBuf>) -> Result<i32> {
    let path = match path {
        Some(path) => path,
        None => AhuConfig::user_path()
            .ok_or_else(|| anyhow!("Cannot find the home directory; pass a config path"))?,
    };
    if path.exists() {
        bail!("Config already exists: {}", path.display());
    }
    AhuConfig::save_default(&path).context("Failed to write default config")?;
    println!("Wrote default config to {}", path.display());
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        Context {
            config: AhuConfig::default(),
            matcher: AlarmMatcher::with_defaults(Arc::new(KnowledgeBase::new())),
            renderer: Renderer::new(false),
        }
    }

    #[test]
    fn test_render_diagnosis_summary_without_timestamp() {
        let opts = DiagnoseOptions {
            no_timestamp: true,
            summary: true,
            ..Default::default()
        };
        let out = render_diagnosis(&context(), "Filter DP high on AHU F201", &opts).unwrap();
        assert!(out.starts_with(
            "AHU Alarm Diagnostic Summary\nOriginal alarm: Filter DP high on AHU F201\n\n\
             Alarm match: filter_differential_high  (severity: warning)"
        ));
    }

    #[test]
    fn test_render_diagnosis_json() {
        let opts = DiagnoseOptions {
            json: true,
            ..Default::default()
        };
        let out = render_diagnosis(&context(), "Mixed air low limit trip: MAT = 36F", &opts).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["matches"][0]["id"], "mixed_air_low_limit_trip");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_config_can_disable_timestamp() {
        let mut ctx = context();
        ctx.config.report.include_timestamp = false;
        let out = render_diagnosis(&ctx, "pump trip", &DiagnoseOptions::default()).unwrap();
        assert!(!out.contains("Diagnosed at"));
    }

    #[test]
    fn test_blank_alarm_is_rejected() {
        assert_eq!(
            diagnose(&context(), "  \n", &DiagnoseOptions::default()).unwrap(),
            EXIT_EMPTY_INPUT
        );
    }

    #[test]
    fn test_init_config_writes_once() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ahu").join("config.toml");

        assert_eq!(init_config(Some(path.clone())).unwrap(), EXIT_SUCCESS);
        assert!(AhuConfig::load_from_path(&path).is_ok());
        assert!(init_config(Some(path)).is_err());
    }

    #[test]
    fn test_show_unknown_id_fails() {
        assert!(show(&context(), "boiler_fault").is_err());
    }
}
