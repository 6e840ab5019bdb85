mod commands;
mod notify;
mod ssh;
mod templates;

use clap::{Parser, Subcommand};
use gridflow_cloud::{ClusterController, ClusterProvider, PollConfig, StepDispatcher};
use gridflow_cloud_aws::{EmrProvider, LambdaProvider};
use gridflow_config::Settings;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "grid")]
#[command(version, about = "Ephemeral EMR cluster admin tool", long_about = None)]
struct Cli {
    /// Region to operate in (default from GRIDFLOW_REGION)
    #[arg(long, global = true)]
    region: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active clusters
    Active,
    /// Create a cluster from a template, or resume watching an existing one
    Create {
        /// Name of the cluster template
        #[arg(long)]
        cluster: Option<String>,
        /// Template parameter, key=value (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,
        /// Existing cluster id to monitor instead of creating
        #[arg(long)]
        id: Option<String>,
        /// Return once the request is accepted instead of waiting for readiness
        #[arg(long)]
        no_wait: bool,
        /// Start an SSH tunnel once the cluster is running
        #[arg(long)]
        tunnel: bool,
    },
    /// Terminate a cluster and wait until it is gone
    Terminate {
        /// Cluster id
        #[arg(long)]
        id: String,
    },
    /// Open an SSH shell on the master node
    Ssh {
        /// Cluster id
        #[arg(long)]
        id: String,
        /// Command to execute on the master node (interactive shell if empty)
        #[arg(long, default_value = "")]
        cmd: String,
    },
    /// Keep a SOCKS tunnel open to the master node
    Tunnel {
        /// Cluster id
        #[arg(long)]
        id: String,
    },
    /// Add a step to a running cluster
    Step {
        /// Name of the step template
        #[arg(long)]
        step: String,
        /// Template parameter, key=value (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,
        /// Cluster id
        #[arg(long)]
        id: String,
    },
    /// Print a fully resolved template instead of calling the provider
    Render {
        /// Name of a cluster template
        #[arg(long)]
        cluster: Option<String>,
        /// Name of a step template
        #[arg(long)]
        step: Option<String>,
        /// Name of a bootstrap template
        #[arg(long)]
        bootstrap: Option<String>,
        /// Template parameter, key=value (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,
    },
    /// List registered templates
    Templates,
    /// Manage deployed scheduler functions
    #[command(subcommand)]
    Functions(FunctionCommands),
}

#[derive(Subcommand)]
enum FunctionCommands {
    /// List deployed functions
    List,
    /// Deploy a function from a pre-built archive (create, or update code)
    Deploy {
        /// Function name
        #[arg(long)]
        name: String,
        /// Entry point, module.function
        #[arg(long)]
        handler: String,
        /// Path to the deployment archive (.zip)
        #[arg(long)]
        archive: PathBuf,
    },
    /// Delete a function
    Delete {
        /// Function name
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Ctrl-C during a poll wait aborts with a clean message; there is
    // nothing to clean up, cluster state lives in the provider.
    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("Interrupted")),
    };

    if let Err(e) = result {
        eprintln!("\nFatal error: {e}; exiting.\n");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings = Settings::from_env()?;
    if let Some(region) = cli.region {
        settings.region = region;
    }

    let registries = templates::Registries::builtin(&settings)?;

    let provider: Arc<dyn ClusterProvider> = Arc::new(EmrProvider::new(&settings.region));
    let poll = PollConfig {
        interval: settings.poll_interval(),
        max_attempts: settings.poll_max_attempts,
    };
    let controller =
        ClusterController::new(provider.clone(), registries.clusters.clone(), poll);
    let dispatcher = StepDispatcher::new(
        provider.clone(),
        registries.steps.clone(),
        registries.bootstraps.clone(),
    );

    match cli.command {
        Commands::Active => commands::active::handle(&controller).await,
        Commands::Create {
            cluster,
            params,
            id,
            no_wait,
            tunnel,
        } => {
            commands::create::handle(
                &settings,
                &controller,
                provider.as_ref(),
                cluster.as_deref(),
                id.as_deref(),
                &params,
                !no_wait,
                tunnel,
            )
            .await
        }
        Commands::Terminate { id } => {
            commands::terminate::handle(&settings, &controller, &id).await
        }
        Commands::Ssh { id, cmd } => {
            commands::ssh::handle(&settings, provider.as_ref(), &id, &cmd).await
        }
        Commands::Tunnel { id } => {
            commands::tunnel::handle(&settings, provider.as_ref(), &id).await
        }
        Commands::Step { step, params, id } => {
            commands::step::handle(&dispatcher, &step, &params, &id).await
        }
        Commands::Render {
            cluster,
            step,
            bootstrap,
            params,
        } => commands::render::handle(
            &controller,
            &dispatcher,
            cluster.as_deref(),
            step.as_deref(),
            bootstrap.as_deref(),
            &params,
        ),
        Commands::Templates => commands::templates::handle(&controller, &dispatcher),
        Commands::Functions(command) => {
            let functions = LambdaProvider::new(&settings.region);
            match command {
                FunctionCommands::List => commands::functions::list(&functions).await,
                FunctionCommands::Deploy {
                    name,
                    handler,
                    archive,
                } => {
                    commands::functions::deploy(&settings, &functions, &name, &handler, &archive)
                        .await
                }
                FunctionCommands::Delete { name } => {
                    commands::functions::delete(&functions, &name).await
                }
            }
        }
    }
}
