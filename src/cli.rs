// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::{env, path::PathBuf};

use crate::commands;
use crate::core::config::DEFAULT_CONFIG_FILE;
use crate::infra::t;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> String {
    let args: Vec<String> = env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--lang") {
        if let Some(lang) = args.get(pos + 1) {
            return lang.clone();
        }
    }
    // Fallback to system language detection
    sys_locale::get_locale().unwrap_or_else(|| "en".to_string())
}

fn config_arg(locale: &str) -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help(t!("arg_config", locale = locale).to_string())
        .value_name("CONFIG")
        .default_value(DEFAULT_CONFIG_FILE)
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn html_arg(locale: &str) -> Arg {
    Arg::new("html")
        .long("html")
        .help(t!("arg_html", locale = locale).to_string())
        .value_name("HTML")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("tcms-tester")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .arg(config_arg(locale))
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .help(t!("arg_file", locale = locale).to_string())
                        .value_name("FILE")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("filter")
                        .short('k')
                        .long("filter")
                        .help(t!("arg_filter", locale = locale).to_string())
                        .value_name("EXPRESSION")
                        .requires("file")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("upload")
                        .long("upload")
                        .help(t!("arg_upload", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                )
                .arg(html_arg(locale)),
        )
        .subcommand(
            Command::new("upload")
                .about(t!("cmd_upload_about", locale = locale).to_string())
                .arg(config_arg(locale))
                .arg(html_arg(locale)),
        )
        .subcommand(
            Command::new("configure")
                .about(t!("cmd_configure_about", locale = locale).to_string())
                .arg(config_arg(locale))
                .arg(
                    Arg::new("url")
                        .long("url")
                        .help(t!("arg_url", locale = locale).to_string())
                        .value_name("URL")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("username")
                        .long("username")
                        .help(t!("arg_username", locale = locale).to_string())
                        .value_name("USERNAME")
                        .required(true)
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help(t!("arg_password", locale = locale).to_string())
                        .value_name("PASSWORD")
                        .required(true)
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help(t!("arg_non_interactive", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = crate::resolve_locale(&pre_parse_language());
    rust_i18n::set_locale(&language);

    let matches = build_cli(&language).get_matches();
    // Only an explicit --lang overrides the language stored in Tester.toml.
    let lang_override = matches.get_one::<String>("lang").cloned();

    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let options = commands::run::RunOptions {
                config: run_matches
                    .get_one::<PathBuf>("config")
                    .cloned()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
                file: run_matches.get_one::<String>("file").cloned(),
                filter: run_matches.get_one::<String>("filter").cloned(),
                upload: run_matches.get_flag("upload"),
                html: run_matches.get_one::<PathBuf>("html").cloned(),
            };
            commands::run::execute(options, lang_override).await?;
        }
        Some(("upload", upload_matches)) => {
            let config = upload_matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let html = upload_matches.get_one::<PathBuf>("html").cloned();
            commands::upload::execute(config, html, lang_override).await?;
        }
        Some(("configure", configure_matches)) => {
            let config = configure_matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            // All three are required by clap.
            let get = |name: &str| {
                configure_matches
                    .get_one::<String>(name)
                    .cloned()
                    .unwrap_or_default()
            };
            commands::configure::execute(
                config,
                get("url"),
                get("username"),
                get("password"),
                lang_override,
            )?;
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");

            // Show language detection message if it was auto-detected
            if lang_override.is_none() {
                println!(
                    "🌐 {}",
                    t!("system_language_detected", locale = &language, lang = &language)
                );
            }
            commands::init::run_init_wizard(&language, non_interactive)?;
        }
        _ => {
            // subcommand_required: clap has already printed help and exited.
        }
    }
    Ok(())
}
