use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weft_cli::{BuildOptions, DEFAULT_OUT_DIR, build};
use weft_compiler::{CompileOptions, Target};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TargetArg {
    Dom,
    Ssr,
}

impl From<TargetArg> for Target {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Dom => Target::Dom,
            TargetArg::Ssr => Target::Ssr,
        }
    }
}

#[derive(Parser)]
#[command(name = "weft", version, about = "Weft template compiler")]
struct Cli {
    /// Log compiled files and template counts.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile `view!` blocks in a .rs file or a directory of them.
    Build {
        input: PathBuf,
        /// Output directory
        #[arg(long, default_value = DEFAULT_OUT_DIR)]
        out_dir: PathBuf,
        /// Client DOM code or server string rendering
        #[arg(long, value_enum, default_value_t = TargetArg::Dom)]
        target: TargetArg,
        /// Path of the runtime crate in emitted imports
        #[arg(long, default_value = "::weft_runtime")]
        runtime: String,
        /// Name of the template macro to replace
        #[arg(long, default_value = "view")]
        macro_name: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build {
            input,
            out_dir,
            target,
            runtime,
            macro_name,
        } => {
            let options = BuildOptions {
                compile: CompileOptions::new()
                    .with_target(target.into())
                    .with_runtime(runtime)
                    .with_macro_name(macro_name),
                out_dir,
            };
            for file in build(&input, &options)? {
                println!("Generated: {} ({} templates)", file.output.display(), file.templates);
            }
        }
    }
    Ok(())
}
