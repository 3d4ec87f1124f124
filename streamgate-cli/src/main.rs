use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use streamgate_core::config::Config;
use streamgate_core::logging::{init_logging_with_config, LogConfig};
use streamgate_core::policy::{AccessPolicy, AccessRequest, Decision};
use streamgate_core::store::{MemorySocialStore, SocialSnapshot};
use streamgate_core::stream::{ActivityId, CommentId, ContentRef};
use streamgate_core::IdentityId;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "streamgate")]
#[command(author, version, about = "Evaluate social stream access against a snapshot", long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Configuration file (TOML); environment variables are used otherwise
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print `allowed` or `denied`; exits 0 when allowed, 1 when denied
    Check(CheckArgs),

    /// Print the decision together with the rule that produced it
    Explain {
        #[command(flatten)]
        check: CheckArgs,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct CheckArgs {
    /// Snapshot file (.toml or .json)
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Identity performing the action
    #[arg(short, long)]
    actor: String,

    /// Action to check
    #[arg(value_enum)]
    action: ActionArg,

    /// Stream identity for `post`, activity id otherwise
    #[arg(short, long)]
    target: String,

    /// Treat the `delete` target as a comment id (only valid with `delete`)
    #[arg(long)]
    comment: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ActionArg {
    View,
    Post,
    Comment,
    Delete,
}

impl CheckArgs {
    fn request(&self) -> Result<AccessRequest> {
        let target = self.target.clone();
        let request = match self.action {
            ActionArg::Delete if self.comment => {
                AccessRequest::Delete(ContentRef::Comment(CommentId::new(target)))
            }
            ActionArg::Delete => {
                AccessRequest::Delete(ContentRef::Activity(ActivityId::new(target)))
            }
            _ if self.comment => bail!("--comment only applies to delete"),
            ActionArg::View => AccessRequest::View(ActivityId::new(target)),
            ActionArg::Post => AccessRequest::Post(IdentityId::new(target)),
            ActionArg::Comment => AccessRequest::Comment(ActivityId::new(target)),
        };
        Ok(request)
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            // Validated below, once the flags have been applied
            let mut config = Config::default();
            config.apply_env()?;
            config
        }
    };

    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.json_format = true;
    }
    config.validate()?;
    Ok(config)
}

fn evaluate(config: &Config, check: &CheckArgs) -> Result<Decision> {
    let snapshot = SocialSnapshot::load(&check.snapshot)
        .with_context(|| format!("loading snapshot {}", check.snapshot.display()))?;
    let store = MemorySocialStore::from_snapshot(snapshot)?;
    let policy = AccessPolicy::new(&store, &store, &store).with_options(config.policy.options());

    let actor = IdentityId::new(check.actor.clone());
    let request = check.request()?;
    debug!(actor = %actor, request = %request, "evaluating");
    Ok(policy.evaluate(&actor, &request)?)
}

fn run(args: Args) -> Result<bool> {
    let config = load_config(&args)?;
    init_logging_with_config(LogConfig::try_from(&config.logging)?)?;
    if config.metrics.enabled {
        streamgate_core::metrics::init_metrics();
    }

    info!("streamgate started");

    let allowed = match &args.command {
        Command::Check(check) => {
            let decision = evaluate(&config, check)?;
            println!("{}", if decision.allowed { "allowed" } else { "denied" });
            decision.allowed
        }
        Command::Explain { check, json } => {
            let decision = evaluate(&config, check)?;
            if *json {
                println!("{}", serde_json::to_string(&decision)?);
            } else {
                println!("{}", decision);
            }
            decision.allowed
        }
    };

    Ok(allowed)
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
