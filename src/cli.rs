//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use partifact::configure::Targets;
use partifact::login::{login, LoginOptions};
use partifact::providers::aws::AwsProvider;
use partifact::shell::SystemRunner;
use partifact::{AuthorizationToken, ConfigResolver, RepositoryDescriptor};
use serde::Serialize;
use std::path::PathBuf;

/// Partifact - log pip and Poetry into AWS CodeArtifact
#[derive(Parser, Debug)]
#[command(name = "partifact")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Configuration file holding the repository records
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "PARTIFACT_CONFIG",
        default_value = partifact::config::CONFIG_PATH
    )]
    config: PathBuf,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: LevelFilter,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log into CodeArtifact and configure Poetry (and optionally pip)
    Login(LoginArgs),

    /// Resolve and print the repository configuration without logging in
    Show(ShowArgs),
}

#[derive(Args, Debug)]
struct RepositoryArgs {
    /// Repository name, as used in pyproject.toml and by Poetry
    repository: String,

    /// The AWS profile to use when getting the CodeArtifact token
    #[arg(long)]
    profile: Option<String>,

    /// The AWS role to assume when getting the CodeArtifact token
    #[arg(long)]
    role: Option<String>,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[command(flatten)]
    repository: RepositoryArgs,

    /// Also set pip's global index-url to the repository
    #[arg(long)]
    configure_pip: bool,

    /// Print the token to stdout instead of a summary
    #[arg(long, conflicts_with = "json")]
    print_token: bool,

    /// Print a JSON summary, including the token
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ShowArgs {
    #[command(flatten)]
    repository: RepositoryArgs,

    /// Print the descriptor as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct LoginSummary<'a> {
    repository: &'a str,
    index_url: String,
    #[serde(flatten)]
    descriptor: &'a RepositoryDescriptor,
    token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Cli {
    /// Initialise logging; `RUST_LOG` wins over `--log-level`.
    pub fn init_logging(&self) {
        env_logger::Builder::new()
            .filter_level(self.log_level)
            .parse_default_env()
            .format_timestamp(None)
            .init();
    }

    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let resolver = ConfigResolver::new(self.config);

        match self.command {
            Commands::Login(args) => execute_login(&resolver, args).await,
            Commands::Show(args) => execute_show(&resolver, args),
        }
    }
}

async fn execute_login(resolver: &ConfigResolver, args: LoginArgs) -> Result<()> {
    let options = LoginOptions::new(args.repository.repository)
        .with_profile(args.repository.profile)
        .with_role(args.repository.role)
        .with_targets(Targets {
            pip: args.configure_pip,
            poetry: true,
        });

    let outcome = login(resolver, &AwsProvider::new(), &SystemRunner, &options).await?;

    if args.print_token {
        println!("{}", outcome.token.token());
    } else if args.json {
        let summary = summary(&options.repository, &outcome.descriptor, &outcome.token);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let configured = if args.configure_pip {
            "pip and poetry"
        } else {
            "poetry"
        };
        match outcome.token.expires_at() {
            Some(expires_at) => println!(
                "Logged into {} ({} configured, token valid until {})",
                options.repository, configured, expires_at
            ),
            None => println!("Logged into {} ({} configured)", options.repository, configured),
        }
    }

    Ok(())
}

fn execute_show(resolver: &ConfigResolver, args: ShowArgs) -> Result<()> {
    let descriptor = resolver.load(
        &args.repository.repository,
        args.repository.profile,
        args.repository.role,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        return Ok(());
    }

    println!("domain:     {}", descriptor.artifact_domain());
    println!("account:    {}", descriptor.account_id());
    println!("region:     {}", descriptor.region());
    println!("repository: {}", descriptor.repository_name());
    println!("profile:    {}", descriptor.profile().unwrap_or("-"));
    println!("role:       {}", descriptor.role_name().unwrap_or("-"));
    println!("index url:  {}", descriptor.index_url());
    Ok(())
}

fn summary<'a>(
    repository: &'a str,
    descriptor: &'a RepositoryDescriptor,
    token: &'a AuthorizationToken,
) -> LoginSummary<'a> {
    LoginSummary {
        repository,
        index_url: descriptor.index_url(),
        descriptor,
        token: token.token(),
        expires_at: token.expires_at(),
    }
}
