//! Step pipeline executor
//!
//! Runs the configured steps strictly left to right. Predefined steps
//! delegate to the clock, inventory and packaging passes; shell steps go
//! through the [`CommandRunner`]; log steps only print.
//!
//! Early stops that are not failures (`local:finish`, nothing to upload,
//! dry-run checkpoint) end the run with a [`RunOutcome`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::DeployDocument;
use crate::domain::entities::{Inventory, PredefinedStep, ShellStep, Step};
use crate::domain::ports::{
    ArchiveUploader, DeployEvent, DeployEventSink, LogLevel, NoopEventSink, SessionConnector,
    ShellHost,
};
use crate::domain::services::DiffSettings;
use crate::domain::value_objects::{HostRole, IgnorePatterns, ProjectType};
use crate::error::{DeployError, DeployResult};
use crate::infrastructure::archive::{remove_archive, ARCHIVE_FILE_NAME};
use crate::infrastructure::platform::{local_platform, platform_for, Platform};
use crate::infrastructure::shell::LocalShell;
use crate::infrastructure::transport::remote_upload_dir;

use super::clock::{query_offset, utc_hour_now, ClockOffsets};
use super::context::{DeploymentContext, RunFlags};
use super::inventory::{fetch_inventory, InventoryRequest};
use super::runner::{CommandRunner, ShellRequest};
use super::sync_pass::{package_changes, scan_changes, ChangeScan, PackageOutcome};

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step ran
    Completed,
    /// `local:finish` reached
    Finished { elapsed_ms: u128 },
    /// Nothing differed from the remote
    NoNewFiles,
    /// `--dry-run` checkpoint reached
    DryRunStopped,
}

impl RunOutcome {
    /// Process exit code; every outcome is a success
    pub fn exit_code(&self) -> i32 {
        0
    }
}

/// `server:restart_iis_site` command line
pub fn restart_iis_site_command(pool: &str, site: &str) -> String {
    format!(
        "cd C:/Windows/System32/inetsrv && appcmd recycle apppool /apppool.name:\"{pool}\" && appcmd stop site /site.name:\"{site}\" && appcmd start site /site.name:\"{site}\""
    )
}

/// Executes a deploy document
pub struct DeployPipeline<'a> {
    document: &'a DeployDocument,
    connector: &'a dyn SessionConnector,
    uploader: &'a dyn ArchiveUploader,
    sink: Arc<dyn DeployEventSink>,
    local: Box<dyn ShellHost>,
    platform: Box<dyn Platform>,
    local_platform: Box<dyn Platform>,
    cancel: Arc<AtomicBool>,
    utc_hour: Option<u32>,
}

impl<'a> DeployPipeline<'a> {
    pub fn new(
        document: &'a DeployDocument,
        connector: &'a dyn SessionConnector,
        uploader: &'a dyn ArchiveUploader,
    ) -> Self {
        Self {
            document,
            connector,
            uploader,
            sink: Arc::new(NoopEventSink),
            local: Box::new(LocalShell::new()),
            platform: platform_for(document.config.project_type),
            local_platform: local_platform(),
            cancel: Arc::new(AtomicBool::new(false)),
            utc_hour: None,
        }
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn DeployEventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run local commands and the local clock query on `host`
    pub fn with_local_host(mut self, host: Box<dyn ShellHost>) -> Self {
        self.local = host;
        self
    }

    /// Flag checked between steps; set it to interrupt the run
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Use a fixed UTC hour instead of the system clock
    pub fn with_utc_hour(mut self, hour: u32) -> Self {
        self.utc_hour = Some(hour);
        self
    }

    /// Reject step lists that cannot run, before any remote I/O
    pub fn preflight(&self, flags: RunFlags) -> DeployResult<()> {
        let config = &self.document.config;
        let mut disposed_at: Option<usize> = None;
        let mut packaged = false;

        for (i, step) in self.document.steps.iter().enumerate() {
            let index = i + 1;
            let invalid = |message: String| DeployError::InvalidStep {
                index,
                step: step.label(),
                message,
            };

            if step.requires_session(flags.fresh) {
                if config.ssh.is_none() {
                    return Err(invalid(
                        "needs an SSH session but config.ssh is not set".to_string(),
                    ));
                }
                if let Some(at) = disposed_at {
                    return Err(invalid(format!(
                        "needs the SSH session, which step {} (local:dispose_ssh) already closed",
                        at
                    )));
                }
            }

            match step {
                Step::Predefined(PredefinedStep::DisposeSsh) => {
                    disposed_at.get_or_insert(index);
                }
                Step::Predefined(PredefinedStep::FindNewFiles) => packaged = true,
                Step::Predefined(PredefinedStep::UploadFiles) if !packaged => {
                    return Err(invalid(
                        "nothing to upload without a preceding server:find_new_files".to_string(),
                    ));
                }
                Step::Predefined(PredefinedStep::RestartIisSite { pool, site }) => {
                    if config.project_type != ProjectType::Iis {
                        return Err(invalid(format!(
                            "only available for project_type: iis (configured: {})",
                            config.project_type
                        )));
                    }
                    if pool.trim().is_empty() || site.trim().is_empty() {
                        return Err(invalid("pool and site must not be empty".to_string()));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Run every step; see [`RunOutcome`] for early stops
    pub fn run(&mut self, flags: RunFlags) -> DeployResult<RunOutcome> {
        self.preflight(flags)?;

        let document = self.document;
        let ssh = document.config.ssh_target();
        let mut ctx = DeploymentContext::new(
            flags,
            ssh.as_ref().map(|t| t.destination()).unwrap_or_default(),
        );

        let needs_session = document
            .steps
            .iter()
            .any(|s| s.requires_session(flags.fresh));
        if let (true, Some(target)) = (needs_session, ssh.as_ref()) {
            ctx.attach_session(self.connector.connect(target)?);
        }

        let sink = self.sink.clone();
        let runner = CommandRunner::new(flags.act, sink.as_ref());

        for (i, step) in document.steps.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                return Err(DeployError::Interrupted);
            }
            sink.on_event(DeployEvent::StepStarted {
                index: i + 1,
                label: step.label(),
            });
            if let Some(outcome) = self.run_step(i + 1, step, &mut ctx, &runner)? {
                return Ok(outcome);
            }
        }

        Ok(RunOutcome::Completed)
    }

    fn run_step(
        &mut self,
        index: usize,
        step: &Step,
        ctx: &mut DeploymentContext,
        runner: &CommandRunner<'_>,
    ) -> DeployResult<Option<RunOutcome>> {
        match step {
            Step::Log(text) => {
                self.sink.on_event(DeployEvent::Message {
                    level: LogLevel::Plain,
                    text: text.clone(),
                });
                Ok(None)
            }
            Step::Shell(shell) => {
                self.run_shell(shell, ctx, runner)?;
                Ok(None)
            }
            Step::Predefined(predefined) => self.run_predefined(index, predefined, ctx, runner),
        }
    }

    fn run_shell(
        &mut self,
        shell: &ShellStep,
        ctx: &mut DeploymentContext,
        runner: &CommandRunner<'_>,
    ) -> DeployResult<()> {
        let command = if shell.ssh {
            self.platform
                .in_target_dir(&self.document.config.target_basepath, &shell.command)
        } else {
            shell.command.clone()
        };
        let mut request = ShellRequest::new(&command)
            .with_policy(shell.on_error)
            .with_message(shell.message.as_deref());
        if shell.suppress_stdout {
            request = request.quiet();
        }

        if shell.ssh {
            runner.run(ctx.session()?, &request)?;
        } else {
            runner.run(self.local.as_mut(), &request)?;
        }
        Ok(())
    }

    fn run_remote(
        &self,
        command: &str,
        ctx: &mut DeploymentContext,
        runner: &CommandRunner<'_>,
    ) -> DeployResult<()> {
        runner.run(ctx.session()?, &ShellRequest::new(command))?;
        Ok(())
    }

    fn run_predefined(
        &mut self,
        index: usize,
        step: &PredefinedStep,
        ctx: &mut DeploymentContext,
        runner: &CommandRunner<'_>,
    ) -> DeployResult<Option<RunOutcome>> {
        let document = self.document;
        let target = &document.config.target_basepath;
        match step {
            PredefinedStep::DisposeSsh => ctx.dispose_session(),
            PredefinedStep::ExitIfDryRun => {
                if ctx.flags.dry_run {
                    self.sink.on_event(DeployEvent::DryRunStopped);
                    return Ok(Some(RunOutcome::DryRunStopped));
                }
            }
            PredefinedStep::Finish => {
                let elapsed_ms = ctx.elapsed_ms();
                self.sink.on_event(DeployEvent::Finished { elapsed_ms });
                return Ok(Some(RunOutcome::Finished { elapsed_ms }));
            }
            PredefinedStep::DeleteZip => {
                let command = self.platform.in_target_dir(
                    target,
                    &format!("{} {}", self.platform.delete_command(), ARCHIVE_FILE_NAME),
                );
                self.run_remote(&command, ctx, runner)?;
            }
            PredefinedStep::Unzip => {
                let command = self.platform.in_target_dir(
                    target,
                    &format!("{} {}", self.platform.unzip_command(), ARCHIVE_FILE_NAME),
                );
                self.run_remote(&command, ctx, runner)?;
            }
            PredefinedStep::RestartIisSite { pool, site } => {
                self.run_remote(&restart_iis_site_command(pool, site), ctx, runner)?;
            }
            PredefinedStep::Sleep { ms } => std::thread::sleep(Duration::from_millis(*ms)),
            PredefinedStep::FindNewFiles => return self.find_new_files(ctx, runner),
            PredefinedStep::UploadFiles => self.upload_files(index, ctx)?,
        }
        Ok(None)
    }

    fn resolve_clocks(&mut self, ctx: &mut DeploymentContext) -> DeployResult<ClockOffsets> {
        if let Some(offsets) = ctx.offsets {
            return Ok(offsets);
        }
        let utc_hour = self.utc_hour.unwrap_or_else(utc_hour_now);
        let local = query_offset(self.local.as_mut(), self.local_platform.as_ref(), utc_hour)?;
        let remote = if ctx.flags.fresh {
            None
        } else {
            Some(query_offset(
                ctx.session()?,
                self.platform.as_ref(),
                utc_hour,
            )?)
        };
        let offsets = ClockOffsets { local, remote };
        ctx.offsets = Some(offsets);
        self.sink.on_event(DeployEvent::ClockResolved {
            local_offset: local,
            remote_offset: remote,
        });
        Ok(offsets)
    }

    fn find_new_files(
        &mut self,
        ctx: &mut DeploymentContext,
        runner: &CommandRunner<'_>,
    ) -> DeployResult<Option<RunOutcome>> {
        let document = self.document;
        let config = &document.config;
        let offsets = self.resolve_clocks(ctx)?;

        let inventory = match ctx.inventory.take() {
            Some(inventory) => inventory,
            None => match offsets.remote {
                Some(remote_offset) => fetch_inventory(
                    ctx.session()?,
                    self.platform.as_ref(),
                    runner,
                    self.sink.as_ref(),
                    &InventoryRequest {
                        target_basepath: &config.target_basepath,
                        ignores: &config.ignores,
                        remote_offset,
                    },
                )?,
                None => Inventory::empty(),
            },
        };

        let ignores = IgnorePatterns::from_patterns(&config.source_basepath, &config.ignores)
            .map_err(|e| {
                DeployError::invalid_config(
                    &config.source_basepath,
                    format!("config.ignores: {}", e),
                )
            })?;
        let scan = ChangeScan {
            source_root: &config.source_basepath,
            ignores: &ignores,
            settings: DiffSettings {
                fresh: ctx.flags.fresh,
                local_offset: offsets.local,
                remote_has_seconds: self.platform.has_second_precision(),
            },
            log_files: ctx.flags.log_files,
        };
        let files = scan_changes(&scan, &inventory, self.sink.as_ref());
        ctx.inventory = Some(inventory);
        let files = files?;

        let outcome = package_changes(
            &files,
            &config.source_basepath,
            &config.dist_dirs,
            ctx.flags.dry_run,
            self.sink.as_ref(),
        )?;
        match outcome {
            PackageOutcome::NoNewFiles => {
                self.sink.on_event(DeployEvent::NoNewFiles);
                Ok(Some(RunOutcome::NoNewFiles))
            }
            PackageOutcome::DryRun(_) => {
                self.sink.on_event(DeployEvent::DryRunStopped);
                Ok(Some(RunOutcome::DryRunStopped))
            }
            PackageOutcome::Packaged { archive, .. } => {
                ctx.archive = Some(archive);
                Ok(None)
            }
        }
    }

    fn upload_files(&self, index: usize, ctx: &mut DeploymentContext) -> DeployResult<()> {
        let config = &self.document.config;
        let Some(archive) = ctx.archive.take() else {
            return Err(DeployError::InvalidStep {
                index,
                step: PredefinedStep::UploadFiles.to_string(),
                message: "no archive was packaged".to_string(),
            });
        };
        let remote_dir = remote_upload_dir(&config.target_basepath, &config.ftp.base_path);

        if ctx.flags.act {
            self.sink.on_event(DeployEvent::CommandEcho {
                host: HostRole::Local,
                command: self.uploader.display_command(&archive, &remote_dir),
            });
            return Ok(());
        }

        self.uploader.upload(&archive, &remote_dir)?;
        self.sink.on_event(DeployEvent::Uploaded { remote_dir });
        remove_archive(&archive)
    }
}
