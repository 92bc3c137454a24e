#![allow(dead_code)]

mod app;
mod binding;
mod cache;
mod canvas;
mod catalog;
mod infra;
mod input;
mod logging;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use app::controller::ApplicationController;
use canvas::ExportFormat;
use catalog::{category_label, filter_templates, ALL_CATEGORIES};
use infra::config::AppConfig;
use infra::fetch::DefaultFetcher;

fn main() -> ExitCode {
    logging::init_logging();
    let args: Vec<String> = std::env::args().collect();

    let invocation = parse_command(&args);
    match run_command(invocation) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            print_usage();
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Invocation {
    manifest: Option<String>,
    command: Command,
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Ui,
    Templates {
        category: Option<String>,
        search: Option<String>,
    },
    Export {
        design: PathBuf,
        format: ExportFormat,
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn parse_command(args: &[String]) -> Result<Invocation, CommandError> {
    let mut manifest = None;
    let mut rest = Vec::new();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--manifest" {
            manifest = Some(flag_value(&mut iter, "--manifest")?);
        } else {
            rest.push(arg.clone());
        }
    }

    let command = match rest.first().map(String::as_str) {
        None | Some("ui") => Command::Ui,
        Some("templates") => {
            let mut category = None;
            let mut search = None;
            let mut iter = rest.iter().skip(1);
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--category" => category = Some(flag_value(&mut iter, "--category")?),
                    "--search" => search = Some(flag_value(&mut iter, "--search")?),
                    other => return Err(CommandError::Usage(format!("unexpected argument: {other}"))),
                }
            }
            Command::Templates { category, search }
        }
        Some("export") => {
            let mut design = None;
            let mut format = ExportFormat::default();
            let mut out = None;
            let mut iter = rest.iter().skip(1);
            while let Some(arg) = iter.next() {
                match arg.as_str() {
                    "--format" => {
                        let value = flag_value(&mut iter, "--format")?;
                        format = value
                            .parse()
                            .map_err(|error| CommandError::Usage(format!("{error}")))?;
                    }
                    "--out" => out = Some(PathBuf::from(flag_value(&mut iter, "--out")?)),
                    other if design.is_none() => design = Some(PathBuf::from(other)),
                    other => return Err(CommandError::Usage(format!("unexpected argument: {other}"))),
                }
            }
            let design =
                design.ok_or_else(|| CommandError::Usage("missing design file".to_string()))?;
            Command::Export {
                design,
                format,
                out,
            }
        }
        Some(other) => return Err(CommandError::Usage(format!("unknown command: {other}"))),
    };

    Ok(Invocation { manifest, command })
}

fn flag_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<String, CommandError> {
    iter.next()
        .cloned()
        .ok_or_else(|| CommandError::Usage(format!("missing value for {flag}")))
}

fn build_controller(manifest: Option<String>) -> ApplicationController {
    let mut config = AppConfig::from_env();
    if let Some(manifest) = manifest {
        config = config.with_manifest(manifest);
    }
    ApplicationController::new(config, Arc::new(DefaultFetcher))
}

fn run_command(invocation: Result<Invocation, CommandError>) -> Result<(), CommandError> {
    let Invocation { manifest, command } = invocation?;
    let mut controller = build_controller(manifest);

    match command {
        Command::Ui => {
            controller.bootstrap();
            ui::editor::launch_editor(controller).map_err(CommandError::Runtime)
        }
        Command::Templates { category, search } => {
            controller.load_catalog_now();
            if let Some(status) = &controller.state().status {
                return Err(CommandError::Runtime(status.text.clone()));
            }
            let category = category.unwrap_or_else(|| ALL_CATEGORIES.to_string());
            let templates = filter_templates(
                controller.templates(),
                &category,
                search.as_deref().unwrap_or_default(),
            );
            if templates.is_empty() {
                println!("no templates match");
                return Ok(());
            }
            for template in templates {
                println!(
                    "{}\t{}\t{}",
                    category_label(&template.category),
                    template.name,
                    template.path
                );
            }
            Ok(())
        }
        Command::Export {
            design,
            format,
            out,
        } => {
            controller
                .load_design_from(&design)
                .map_err(|error| CommandError::Runtime(format!("design load failed: {error}")))?;
            controller.dispatch(app::events::AppEvent::SetExportFormat(format));
            let dir = out.unwrap_or_else(|| PathBuf::from(&controller.config().export_dir));
            let path = controller
                .export_to(&dir)
                .map_err(|error| CommandError::Runtime(format!("export failed: {error}")))?;
            println!("exported {}", path.display());
            Ok(())
        }
    }
}

fn print_usage() {
    println!("usage:");
    println!("  festive-post [--manifest <source>] ui");
    println!("  festive-post [--manifest <source>] templates [--category <name>] [--search <term>]");
    println!("  festive-post export <design.json> [--format png|jpeg] [--out <dir>]");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        std::iter::once("festive-post")
            .chain(values.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_opens_the_editor() {
        let invocation = parse_command(&args(&[])).expect("empty args should parse");
        assert_eq!(invocation.command, Command::Ui);
        assert_eq!(invocation.manifest, None);
    }

    #[test]
    fn parse_templates_with_filters_and_manifest() {
        let invocation = parse_command(&args(&[
            "--manifest",
            "https://cdn.example.com/templates.json",
            "templates",
            "--category",
            "diwali",
            "--search",
            "lamp",
        ]))
        .expect("templates should parse");

        assert_eq!(
            invocation.manifest.as_deref(),
            Some("https://cdn.example.com/templates.json")
        );
        assert_eq!(
            invocation.command,
            Command::Templates {
                category: Some("diwali".to_string()),
                search: Some("lamp".to_string()),
            }
        );
    }

    #[test]
    fn parse_export_with_format_and_output() {
        let invocation = parse_command(&args(&[
            "export",
            "design.json",
            "--format",
            "jpg",
            "--out",
            "out",
        ]))
        .expect("export should parse");

        assert_eq!(
            invocation.command,
            Command::Export {
                design: PathBuf::from("design.json"),
                format: ExportFormat::Jpeg,
                out: Some(PathBuf::from("out")),
            }
        );
    }

    #[test]
    fn parse_export_requires_design_file() {
        let command = parse_command(&args(&["export", "--format", "png"]));
        assert!(matches!(command, Err(CommandError::Usage(_))));
    }

    #[test]
    fn parse_rejects_unknown_format_and_command() {
        let bad_format = parse_command(&args(&["export", "d.json", "--format", "gif"]));
        assert!(matches!(bad_format, Err(CommandError::Usage(_))));
        let unknown = parse_command(&args(&["import"]));
        assert!(matches!(unknown, Err(CommandError::Usage(_))));
    }
}
