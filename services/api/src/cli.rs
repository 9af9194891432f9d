use crate::export::{run_export, ExportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tree_ledger::error::AppError;
use tree_ledger::names::{compose_full_name, display_name, normalize};

#[derive(Parser, Debug)]
#[command(
    name = "Tree Ledger",
    about = "Serve and inspect the tree-planting record ledger",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the canonical comparison form of one or more names
    Normalize(NormalizeArgs),
    /// Build a registration name from its parts and show its canonical form
    Compose(ComposeArgs),
    /// Write the records matching a name as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct NormalizeArgs {
    /// Names as typed, e.g. "Tserakhava, Anastasiya - Class of 2026"
    #[arg(required = true)]
    pub(crate) names: Vec<String>,
    /// Also print the title-cased display form
    #[arg(long)]
    pub(crate) display: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ComposeArgs {
    /// Given name
    #[arg(long)]
    pub(crate) first: String,
    /// Family name
    #[arg(long)]
    pub(crate) second: String,
    /// Graduating year
    #[arg(long)]
    pub(crate) year: String,
}

fn compose_line(args: &ComposeArgs) -> String {
    let full_name = compose_full_name(&args.first, &args.second, &args.year);
    let canonical = normalize(&full_name);
    format!("{full_name}\t{canonical}")
}

fn run_normalize(args: NormalizeArgs) {
    for name in args.names {
        let canonical = normalize(&name);
        if args.display {
            println!("{canonical}\t{}", display_name(&canonical));
        } else {
            println!("{canonical}");
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Normalize(args) => {
            run_normalize(args);
            Ok(())
        }
        Command::Compose(args) => {
            println!("{}", compose_line(&args));
            Ok(())
        }
        Command::Export(args) => run_export(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["tree-ledger-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_overrides() {
        let cli = Cli::try_parse_from(["tree-ledger-api", "serve", "--port", "8080"])
            .expect("parses");
        match cli.command {
            Some(Command::Serve(args)) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn normalize_requires_a_name() {
        assert!(Cli::try_parse_from(["tree-ledger-api", "normalize"]).is_err());
    }

    #[test]
    fn compose_prints_registration_and_canonical_names() {
        let cli = Cli::try_parse_from([
            "tree-ledger-api",
            "compose",
            "--first",
            "Anastasiya",
            "--second",
            "Tserakhava",
            "--year",
            "2026",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Compose(args)) => assert_eq!(
                compose_line(&args),
                "Anastasiya Tserakhava - Class of 2026\ttserakhava anastasiya class of 2026"
            ),
            other => panic!("expected compose, got {other:?}"),
        }
    }

    #[test]
    fn compose_requires_every_part() {
        assert!(
            Cli::try_parse_from(["tree-ledger-api", "compose", "--first", "Anastasiya"]).is_err()
        );
    }

    #[test]
    fn export_takes_name_and_output() {
        let cli = Cli::try_parse_from([
            "tree-ledger-api",
            "export",
            "--name",
            "Smith, John",
            "--output",
            "records.csv",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Export(args)) => {
                assert_eq!(args.name, "Smith, John");
                assert_eq!(
                    args.output.as_deref(),
                    Some(std::path::Path::new("records.csv"))
                );
            }
            other => panic!("expected export, got {other:?}"),
        }
    }
}
