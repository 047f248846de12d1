/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

mod cli;

use std::path::Path;

use anyhow::{bail, Context, Result};
use bibtex_core::bib::{parse_yaml, write_yaml};
use bibtex_core::strings::split_name_list;
use bibtex_core::{parse_bib_files, write_bib, Config, Diagnostics};
use bibtex_processor::{make_bibliography_with_style, NameFormat, ProcessorError};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, Options};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,rbibtex=info,bibtex_processor=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        match e.downcast_ref::<ProcessorError>() {
            Some(err) => eprintln!("rbibtex: {}", err.report()),
            None => eprintln!("rbibtex: {e:#}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::FormatName {
            name,
            format,
            index,
        }) => format_name(&name, &format, index),
        Some(Command::Convert { input, output }) => {
            let config = load_config(&cli.options)?;
            convert(&input, &output, &config)
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
        None => {
            let Some(aux) = cli.aux else {
                Cli::command().print_help()?;
                bail!("no .aux file given");
            };
            let config = load_config(&cli.options)?;
            let outcome = make_bibliography_with_style(&aux, cli.options.style.as_deref(), &config)?;
            if cli.options.json {
                println!("{}", serde_json::to_string_pretty(&outcome.bibliography)?);
            }
            let warnings = outcome.bibliography.warnings.len();
            match warnings {
                0 => {}
                1 => eprintln!("(There was 1 warning)"),
                n => eprintln!("(There were {n} warnings)"),
            }
            Ok(())
        }
    }
}

/// The configuration file, overridden by command-line flags.
fn load_config(options: &Options) -> Result<Config> {
    let mut config = match &options.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load_from_project()?.unwrap_or_default(),
    };
    config.strict |= options.strict;
    config.native.abbreviate_names |= options.abbreviate_names;
    if let Some(n) = options.min_crossrefs {
        config.min_crossrefs = n;
    }
    if let Some(language) = &options.style_language {
        config.style_language = language.parse()?;
    }
    if let Some(backend) = &options.backend {
        config.native.output_backend = backend.parse()?;
    }
    if let Some(style) = &options.label_style {
        config.native.label_style = style.parse()?;
    }
    if let Some(style) = &options.name_style {
        config.native.name_style = style.parse()?;
    }
    if let Some(style) = &options.sorting_style {
        config.native.sorting_style = style.parse()?;
    }
    if let Some(encoding) = &options.encoding {
        let encoding = encoding.parse()?;
        config.bib_encoding = encoding;
        config.bst_encoding = encoding;
        config.output_encoding = encoding;
    }
    Ok(config)
}

fn format_name(names: &str, format: &str, index: usize) -> Result<()> {
    let format = NameFormat::parse(format)?;
    let list = split_name_list(names);
    let Some(name) = index.checked_sub(1).and_then(|i| list.get(i)) else {
        bail!("there is no name {index} in \"{names}\" ({} names)", list.len());
    };
    let person = bibtex_core::Person::parse(name)?;
    println!("{}", format.format(&person));
    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Convert between `.bib` and BibYAML, chosen by file extension.
fn convert(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let mut diagnostics = Diagnostics::new(config.error_policy());
    let data = if is_yaml(input) {
        let text = config.bib_encoding.read_file(input)?;
        parse_yaml(&text, config)?
    } else {
        parse_bib_files(&[input], None, config, &mut diagnostics)?
    };
    let text = if is_yaml(output) {
        write_yaml(&data)?
    } else {
        write_bib(&data)?
    };
    config.output_encoding.write_file(output, &text)?;
    tracing::info!(
        entries = data.len(),
        output = %output.display(),
        "bibliography converted"
    );
    Ok(())
}
