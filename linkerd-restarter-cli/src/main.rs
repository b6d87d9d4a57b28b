use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use linkerd_restarter::Config;
use linkerd_restarter::Error;
use linkerd_restarter::RestartPlan;
use linkerd_restarter::Restarter;
use linkerd_restarter::Result;
use linkerd_restarter::config;
use linkerd_restarter::gate;
use linkerd_restarter_kubeapi::Cluster;
use linkerd_restarter_kubeapi::KubeApi;
use linkerd_restarter_kubeapi::Kubectl;
use tracing_subscriber::EnvFilter;

use clap::Parser;

use args::Args;

mod args;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    tracing::debug!(?args, "Starting linkerd-dataplane-restarter");

    // Built by hand so an interrupted prompt does not keep the process alive
    // waiting on the blocking stdin read.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!(%err, "Failed to start the async runtime");
            return ExitCode::FAILURE;
        }
    };

    let outcome = runtime.block_on(async {
        tokio::select! {
            outcome = run(args) => outcome,
            Ok(()) = tokio::signal::ctrl_c() => Err(Error::Interrupted),
        }
    });
    runtime.shutdown_background();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = args.config();
    let kubeconfig = args.kubeconfig()?;
    let kubeapi = KubeApi::from_kubeconfig(&kubeconfig)
        .await
        .map_err(|source| Error::Config {
            path: kubeconfig.clone(),
            source,
        })?;

    if args.kubectl {
        let kubectl = Kubectl::new(kubeapi)
            .program(args.kubectl_path)
            .kubeconfig(kubeconfig);
        restart(&kubectl, &config).await
    } else {
        restart(&kubeapi, &config).await
    }
}

async fn restart(cluster: &impl Cluster, config: &Config) -> Result<()> {
    let restarter = Restarter::new(cluster, config);
    let plan = restarter.plan().await?;

    let (plan, proceed) = confirm(plan).await?;
    if !proceed {
        tracing::info!("Nothing to do");
        return Ok(());
    }

    let restarted = restarter.execute(plan).await?;
    tracing::info!(restarted, "Finished restarting deployments");
    Ok(())
}

async fn confirm(plan: RestartPlan) -> Result<(RestartPlan, bool)> {
    tokio::task::spawn_blocking(move || {
        let proceed = gate::confirm(&plan, io::stdin().lock(), io::stdout())?;
        Ok::<_, Error>((plan, proceed))
    })
    .await
    .map_err(io::Error::other)?
}
