use crate::demo::{
    run_breach_classify, run_demo, run_evidence_register, run_generate, BreachClassifyArgs,
    DemoArgs, EvidenceRegisterArgs, GenerateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use compliance_engine::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Compliance Document Engine",
    about = "Generate HIPAA policy documents, evidence registers, and breach determinations",
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
    /// Generate policy documents for an organization fixture
    Generate(GenerateArgs),
    /// Breach classification tools
    Breach {
        #[command(subcommand)]
        command: BreachCommand,
    },
    /// Evidence tracking tools
    Evidence {
        #[command(subcommand)]
        command: EvidenceCommand,
    },
    /// Run an end-to-end demo against a sample organization
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum BreachCommand {
    /// Classify an incident and list notification duties
    Classify(BreachClassifyArgs),
}

#[derive(Subcommand, Debug)]
enum EvidenceCommand {
    /// Print the evidence register for one policy
    Register(EvidenceRegisterArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Organization fixture (JSON) to load into the store; repeatable
    #[arg(long = "fixture")]
    pub(crate) fixtures: Vec<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Generate(args) => run_generate(args).await,
        Command::Breach {
            command: BreachCommand::Classify(args),
        } => run_breach_classify(args),
        Command::Evidence {
            command: EvidenceCommand::Register(args),
        } => run_evidence_register(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["compliance-engine-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn generate_accepts_policy_and_switches() {
        let cli = Cli::try_parse_from([
            "compliance-engine-api",
            "generate",
            "--fixture",
            "org.json",
            "--policy",
            "access-control",
            "--strict",
            "--no-summary",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Generate(args)) => {
                assert_eq!(args.fixture, PathBuf::from("org.json"));
                assert_eq!(
                    args.policy,
                    Some(compliance_engine::workflows::documents::PolicyId::AccessControl)
                );
                assert!(args.strict);
                assert!(args.no_summary);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn breach_classify_parses_dates() {
        let cli = Cli::try_parse_from([
            "compliance-engine-api",
            "breach",
            "classify",
            "--at-rest",
            "no",
            "--in-transit",
            "yes",
            "--affected",
            "700",
            "--discovered",
            "2026-03-01",
        ])
        .expect("parses");
        assert!(matches!(
            cli.command,
            Some(Command::Breach {
                command: BreachCommand::Classify(_)
            })
        ));
    }
}
