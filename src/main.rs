use anyhow::Result;
use clap::{CommandFactory, Parser};
use cleanup_older::{classify, execute, render, render_execution, Config, CleanupError};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:

  cleanup-older /path/to/folder 2014-09-30 -r
        Display files older than 2014-09-30 in path/to/folder and subfolders

  cleanup-older /path/to/folder 2014-09-30 -r --delete
        Delete files older than 2014-09-30 in path/to/folder and subfolders

  cleanup-older /path/to/folder 2014-09-30 -r -d -x mysubfolder
        Delete files older than 2014-09-30 in path/to/folder and subfolders but skip mysubfolder

  cleanup-older /path/to/folder 2014-09-30 -r -e -s -d
        Delete files older than 2014-09-30 in path/to/folder and subfolders,
        along with empty subfolders and symbolic links";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Find and optionally delete files, symbolic links and empty folders older than a date",
    long_about = None,
    after_help = EXAMPLES
)]
struct Args {
    /// Full path to folder
    folder: String,

    /// Older than date of type YYYY-MM-DD
    date: String,

    /// Proceed with deletion
    #[arg(long, short)]
    delete: bool,

    /// Process folder recursively
    #[arg(long, short)]
    recursive: bool,

    /// Delete folders left empty by the cleanup
    #[arg(long, short = 'e')]
    delete_empty_folder: bool,

    /// Delete symbolic links
    #[arg(long, short = 's')]
    delete_symbolic_link: bool,

    /// Subfolder, file or symbolic link to skip
    #[arg(long, short = 'x', num_args = 0.., value_name = "name")]
    skip: Vec<String>,

    /// Show debug output on stderr
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<Config, CleanupError> {
        Ok(Config::from_args(&self.folder, &self.date)?
            .with_recursive(self.recursive)
            .with_delete(self.delete)
            .with_delete_empty_folders(self.delete_empty_folder)
            .with_delete_symlinks(self.delete_symbolic_link)
            .with_skip(self.skip))
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,cleanup_older=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}

/// Print a usage error followed by the full help text, then exit
fn usage_error(err: &CleanupError) -> ! {
    eprintln!("\n{}\n", format!("ERROR: {err}").red());
    eprintln!("{}", Args::command().render_help());
    std::process::exit(2);
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = match args.into_config() {
        Ok(config) => config,
        Err(err) if err.is_usage() => usage_error(&err),
        Err(err) => return Err(err.into()),
    };

    let result = classify(config.root(), &config)?;

    if config.delete() {
        let report = execute(&result, &config);
        let text = render_execution(&report, &result, &config);
        print!("{text}");
        if report.has_failures() {
            eprintln!(
                "{}",
                "Some entries could not be deleted, see FAILED lines above".yellow()
            );
        }
    } else {
        print!("{}", render(&result, &config));
    }

    Ok(())
}
