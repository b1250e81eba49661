use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use resxgen_cli::generate::{GenerateCommand, run_generate_command};
use resxgen_cli::render::run_render_command;
use resxgen_cli::view::run_view_command;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Show debug logs (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate accessor modules for .resx files and register them in the project.
    Generate {
        /// The MSBuild-style project file to keep in sync
        #[arg(short, long)]
        project: String,

        /// Resource files or glob patterns (default: the project's embedded resources)
        #[arg(short, long = "resource")]
        resources: Vec<String>,

        /// Namespace of the generated bundles (default: the project file name)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Emit pub(crate) accessors instead of pub
        #[arg(long)]
        internal: bool,

        /// Also generate modules for resource files without string entries
        #[arg(long)]
        include_empty: bool,

        /// File-name suffix of generated modules (default: .designer.rs)
        #[arg(long)]
        suffix: Option<String>,

        /// Module path of the runtime used by generated code (default: resxgen::runtime)
        #[arg(long)]
        runtime_path: Option<String>,

        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Write a JSON report of the run to this path
        #[arg(long)]
        report_json: Option<String>,

        /// Config file (default: resxgen.toml beside the project file)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Format one resource the way its generated accessor would.
    Render {
        /// The .resx file to read
        #[arg(short, long)]
        input: String,

        /// Resource name
        #[arg(short, long)]
        key: String,

        /// Argument values, in accessor parameter order
        #[arg(short, long = "arg")]
        args: Vec<String>,

        /// Bundle name used in error messages (default: the file stem)
        #[arg(long)]
        bundle: Option<String>,
    },

    /// View the string entries of a .resx file.
    View {
        /// The input file to view
        #[arg(short, long)]
        input: String,

        /// Display full value without truncation
        #[arg(long)]
        full: bool,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "resxgen=debug" } else { "resxgen=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.commands {
        Commands::Generate {
            project,
            resources,
            namespace,
            internal,
            include_empty,
            suffix,
            runtime_path,
            dry_run,
            report_json,
            config,
        } => run_generate_command(GenerateCommand {
            project,
            resources,
            namespace,
            internal,
            include_empty,
            suffix,
            runtime_path,
            dry_run,
            report_json,
            config,
        }),
        Commands::Render {
            input,
            key,
            args,
            bundle,
        } => run_render_command(input, key, args, bundle),
        Commands::View { input, full } => run_view_command(input, full),
        Commands::Completions { shell } => {
            let mut command = Args::command();
            clap_complete::generate(shell, &mut command, "resxgen", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
