//! The run orchestrator: drives every stage in order, then tears down.
//!
//! The stage sequence runs as one future raced against `shutdown`. Whichever
//! way the race ends (success, a stage error, or an interrupt) the future is
//! dropped before cleanup starts, which kills any local child process still
//! attached to it. Cleanup runs exactly once, from here.

use std::future::Future;
use std::path::PathBuf;

use anyhow::Result;
use tokio::time::Instant;

use crate::application::ports::{
    FileTransfer, LocalEnv, ProgressReporter, ProvisioningClient, RemoteExecutor,
};
use crate::application::services::{deploy, preflight, provision, readiness, teardown};
use crate::domain::{
    InstanceHandle, InstanceRequest, PollPolicy, ProviderOutputParser, RunOutcome, RunReport,
    SkiffConfig, Stage,
};

/// Everything the orchestrator talks to.
pub struct Collaborators<'a, P, X, F, E, R> {
    pub provider: &'a P,
    pub remote: &'a X,
    pub transfer: &'a F,
    pub env: &'a E,
    pub parser: &'a dyn ProviderOutputParser,
    pub reporter: &'a R,
}

/// Mutable progress of one run. Lives outside the stage future so it can be
/// read after that future is dropped.
struct RunState {
    handle: InstanceHandle,
    stage: Stage,
    completed: Vec<Stage>,
    results: Vec<PathBuf>,
}

impl RunState {
    fn enter(&mut self, stage: Stage, reporter: &impl ProgressReporter) {
        tracing::info!(?stage, "entering stage");
        self.stage = stage;
        reporter.step(stage.description());
    }

    fn complete(&mut self) {
        self.completed.push(self.stage);
    }
}

/// Run the whole pipeline and return its report.
///
/// `shutdown` resolves when the operator asks to stop. It is only watched
/// while stages are running; once teardown has begun it is ignored.
pub async fn run<P, X, F, E, R>(
    c: &Collaborators<'_, P, X, F, E, R>,
    config: &SkiffConfig,
    shutdown: impl Future<Output = ()>,
) -> RunReport
where
    P: ProvisioningClient,
    X: RemoteExecutor,
    F: FileTransfer,
    E: LocalEnv,
    R: ProgressReporter,
{
    let started = Instant::now();
    let mut state = RunState {
        handle: InstanceHandle::new(&config.instance),
        stage: Stage::Validating,
        completed: Vec::new(),
        results: Vec::new(),
    };

    let finished = {
        let stages = run_stages(c, config, &mut state);
        tokio::pin!(stages);
        tokio::select! {
            biased;
            () = shutdown => None,
            result = &mut stages => Some(result),
        }
    };

    let outcome = match finished {
        Some(Ok(())) => RunOutcome::Succeeded,
        Some(Err(e)) => {
            let error = format!("{e:#}");
            tracing::error!(stage = ?state.stage, %error, "stage failed");
            c.reporter.error(&format!("{} failed: {error}", state.stage));
            RunOutcome::Failed {
                stage: state.stage,
                error,
            }
        }
        None => {
            tracing::warn!(stage = ?state.stage, "interrupted");
            c.reporter
                .warn(&format!("interrupted during: {}; cleaning up", state.stage));
            RunOutcome::Interrupted { stage: state.stage }
        }
    };

    state.stage = Stage::Destroying;
    let cleanup = teardown::release(
        c.provider,
        &state.handle,
        &config.teardown.strategy,
        c.reporter,
    )
    .await;
    state.stage = Stage::Done;

    let elapsed = started.elapsed();
    match &outcome {
        RunOutcome::Succeeded => c.reporter.success(&format!(
            "run complete in {}s, {} result file(s) in {}",
            elapsed.as_secs(),
            state.results.len(),
            config.results_dir.display()
        )),
        RunOutcome::Failed { stage, .. } => {
            c.reporter.error(&format!("run failed at stage: {stage}"));
        }
        RunOutcome::Interrupted { stage } => {
            c.reporter.warn(&format!("run interrupted at stage: {stage}"));
        }
    }
    teardown::report(&cleanup, c.reporter);

    RunReport {
        outcome,
        cleanup,
        completed: state.completed,
        results: state.results,
        instance: state.handle,
        elapsed,
    }
}

async fn run_stages<P, X, F, E, R>(
    c: &Collaborators<'_, P, X, F, E, R>,
    config: &SkiffConfig,
    state: &mut RunState,
) -> Result<()>
where
    P: ProvisioningClient,
    X: RemoteExecutor,
    F: FileTransfer,
    E: LocalEnv,
    R: ProgressReporter,
{
    let policy = PollPolicy::from(config.poll);

    state.enter(Stage::Validating, c.reporter);
    let pre = preflight::validate(c.provider, c.env, config, c.reporter).await?;
    state.complete();

    state.enter(Stage::Provisioning, c.reporter);
    let request = InstanceRequest::from_config(&config.instance, &pre.public_key);
    let id = provision::provision(c.provider, c.parser, &request, &mut state.handle, c.reporter)
        .await?;
    state.complete();

    state.enter(Stage::AwaitingNetworkAddress, c.reporter);
    let address = readiness::wait_for_address(c.provider, c.parser, &id, policy, c.reporter).await?;
    state.handle.assign_address(address.clone());
    state.complete();

    state.enter(Stage::AwaitingRemoteLogin, c.reporter);
    readiness::wait_for_login(c.remote, &address, policy, c.reporter).await?;
    state.handle.mark_reachable();
    state.complete();

    if config.install_runtime {
        state.enter(Stage::InstallingRuntime, c.reporter);
        deploy::install_runtime(c.remote, &address, c.reporter).await?;
        state.complete();
    } else {
        tracing::debug!("runtime install disabled, assuming docker is present");
    }

    state.enter(Stage::Syncing, c.reporter);
    deploy::sync(c.remote, c.transfer, &address, &pre.artifacts, c.reporter).await?;
    state.complete();

    state.enter(Stage::Building, c.reporter);
    deploy::build(c.remote, &address, c.reporter).await?;
    state.complete();

    state.enter(Stage::Executing, c.reporter);
    deploy::execute(c.remote, &address, c.reporter).await?;
    state.complete();

    state.enter(Stage::Retrieving, c.reporter);
    state.results = deploy::retrieve(c.transfer, &address, &config.results_dir, c.reporter).await?;
    state.complete();

    Ok(())
}
