//! enexport CLI - DOCX archive to ENEX converter

mod server;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use enexport::{
    BatchConverter, BatchEvent, BatchOptions, BatchReport, ConvertOptions, TextEscaping,
    Workspace,
};

#[derive(Parser)]
#[command(name = "enexport")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert archives of DOCX notes into Evernote ENEX files", long_about = None)]
struct Cli {
    /// Input zip archive of .docx files
    #[arg(value_name = "ZIP")]
    input: Option<PathBuf>,

    #[command(flatten)]
    batch: BatchArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a zip archive of .docx files into a zip of .enex notes
    Convert {
        /// Input zip archive
        #[arg(value_name = "ZIP")]
        input: PathBuf,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Run the upload server
    Serve {
        /// Address to listen on
        #[arg(long, env = "ENEXPORT_BIND", default_value = "127.0.0.1:5000")]
        bind: String,

        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct BatchArgs {
    /// Output archive
    #[arg(short, long, value_name = "ZIP", default_value = "exports.zip")]
    output: PathBuf,

    /// Directory holding the imports/ and exports/ working folders
    #[arg(long, value_name = "DIR", default_value = ".")]
    work_dir: PathBuf,

    /// Worker threads (0 = number of CPUs)
    #[arg(long, env = "ENEXPORT_WORKERS", default_value = "0")]
    workers: usize,

    /// Convert documents one at a time
    #[arg(long)]
    sequential: bool,

    /// Escape &, < and > in note text
    #[arg(long)]
    escape_text: bool,

    /// Print the final progress as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl BatchArgs {
    fn converter(&self) -> BatchConverter {
        let escaping = if self.escape_text {
            TextEscaping::Escape
        } else {
            TextEscaping::Verbatim
        };
        let options = ConvertOptions::new().with_escaping(escaping);
        let batch = BatchOptions::new()
            .with_workers(self.workers)
            .with_parallel(!self.sequential);
        BatchConverter::docx(options).with_batch_options(batch)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert { input, batch }) => cmd_convert(&input, &batch),
        Some(Commands::Serve { bind, batch }) => cmd_serve(&bind, &batch),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, &cli.batch)
            } else {
                println!("{}", "Usage: enexport <ZIP> [-o exports.zip]".yellow());
                println!("       enexport serve [--bind 127.0.0.1:5000]");
                println!("       enexport --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_convert(input: &Path, args: &BatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let converter = args.converter();
    let workspace = Workspace::new(&args.work_dir);
    workspace.reset()?;

    let report = run_batch(&converter, &workspace, input);
    let report = match report {
        Ok(report) => report,
        Err(e) => {
            workspace.clean()?;
            return Err(e);
        }
    };

    if args.json {
        println!("{}", report.progress.to_json()?);
    } else {
        print_summary(&report);
    }

    let packed = workspace.pack(&args.output);
    workspace.clean()?;
    let packed = packed?;

    println!(
        "\n{} {} ({} notes)",
        "Output:".green().bold(),
        args.output.display(),
        packed
    );
    Ok(())
}

fn run_batch(
    converter: &BatchConverter,
    workspace: &Workspace,
    input: &Path,
) -> Result<BatchReport, Box<dyn std::error::Error>> {
    let extracted = workspace.extract(input)?;
    log::debug!("Extracted {} entries", extracted.len());

    let job = converter.submit(workspace.imports(), workspace.exports())?;

    let pb = ProgressBar::new(job.total() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    for event in job.events().iter() {
        match event {
            BatchEvent::Started { total } => pb.set_message(format!("Converting {} files...", total)),
            BatchEvent::Converted { source, .. } => {
                pb.set_message(source);
                pb.inc(1);
            }
            BatchEvent::Failed { source, .. } => {
                pb.println(format!("{} {}", "failed:".red(), source));
                pb.inc(1);
            }
            BatchEvent::Finished(_) => break,
        }
    }
    pb.finish_with_message("Done!");

    Ok(job.wait()?)
}

fn print_summary(report: &BatchReport) {
    let progress = &report.progress;
    println!("\n{}", "Summary:".green().bold());
    println!("  {} Total files: {}", "├─".dimmed(), progress.total);
    println!(
        "  {} Successfully converted: {}",
        "├─".dimmed(),
        progress.successful
    );
    println!("  {} Failed: {}", "└─".dimmed(), progress.failed());
    for name in &progress.unsuccessful {
        println!("       {}", name.red());
    }
}

fn cmd_serve(bind: &str, args: &BatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let converter = args.converter();
    println!("{} http://{}", "Serving on".green().bold(), bind);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(bind, converter, args.work_dir.clone()))
}

fn cmd_version() {
    println!("{} {}", "enexport".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("DOCX to Evernote ENEX converter");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/enexport".dimmed());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_positional_args() {
        let cli = Cli::try_parse_from(["enexport", "notes.zip", "--sequential"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("notes.zip")));
        assert!(cli.batch.sequential);
        assert_eq!(cli.batch.output, PathBuf::from("exports.zip"));
    }

    #[test]
    fn test_serve_subcommand() {
        let cli = Cli::try_parse_from(["enexport", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        match cli.command {
            Some(Commands::Serve { bind, .. }) => assert_eq!(bind, "0.0.0.0:8080"),
            _ => panic!("expected serve"),
        }
    }
}
