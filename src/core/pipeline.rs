//! Build pipelines
//!
//! A pipeline drives one task through a fixed stage sequence and stops at
//! the first failure. Stages persist their tool output as stamped files
//! before the pipeline moves on, so the trail on disk is complete even
//! when a later stage fails or the process dies.
//!
//! Four flavors exist: the remote pipeline builds a source rpm from
//! scratch in its own workspace, the isolated pipeline hands the rpm to
//! mock, and the two local flavors operate on an already staged build
//! tree in the working directory.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::context::RunContext;
use crate::core::stage::{StageName, StageResult};
use crate::core::task::BuildTask;
use crate::core::workspace::Workspace;
use crate::error::{StageFailure, WorkspaceError};
use crate::infra::artifacts::{write_artifact, write_combined_log};
use crate::infra::executor;

/// Build one source rpm end to end in its own workspace
pub async fn run_remote(source: &Path, ctx: &RunContext) -> BuildTask {
    let mut task = BuildTask::new(source);
    remote_stages(&mut task, ctx).await;
    task.complete();
    task
}

async fn remote_stages(task: &mut BuildTask, ctx: &RunContext) -> Option<()> {
    let name = resolve_name(task, ctx.echo, ctx).await?;
    let workspace = stage_workspace(task, &name, ctx)?;
    let spec = materialize(task, &workspace, ctx).await?;
    snapshot_inventory(task, &workspace.package_dir, ctx).await?;
    resolve_deps(task, &workspace.package_dir, &spec, false, ctx).await?;
    compile(
        task,
        &workspace.package_dir,
        &workspace.build_root,
        &spec,
        false,
        ctx,
    )
    .await
}

/// Build one source rpm inside a mock chroot
pub async fn run_isolated(
    source: &Path,
    output: Option<&Path>,
    profile: &str,
    ctx: &RunContext,
) -> BuildTask {
    let mut task = BuildTask::new(source);
    isolated_stages(&mut task, output, profile, ctx).await;
    task.complete();
    task
}

async fn isolated_stages(
    task: &mut BuildTask,
    output: Option<&Path>,
    profile: &str,
    ctx: &RunContext,
) -> Option<()> {
    // the name query only picks the default result dir next to the srpm
    let result_dir = match output {
        Some(dir) => dir.to_path_buf(),
        None => {
            let name = resolve_name(task, false, ctx).await?;
            task.source_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(name)
        }
    };
    isolated_build(task, &result_dir, profile, ctx).await
}

/// Resolve dependencies and compile an already materialized build tree.
///
/// `workdir` is treated as the rpmbuild topdir, logs land next to it.
pub async fn run_local_build(workdir: &Path, ctx: &RunContext) -> BuildTask {
    let mut task = BuildTask::new(workdir);
    local_build_stages(&mut task, workdir, ctx).await;
    task.complete();
    task
}

async fn local_build_stages(task: &mut BuildTask, workdir: &Path, ctx: &RunContext) -> Option<()> {
    let spec = verify_build_tree(task, workdir)?;
    snapshot_inventory(task, workdir, ctx).await?;
    resolve_deps(task, workdir, &spec, true, ctx).await?;
    compile(task, workdir, workdir, &spec, true, ctx).await
}

/// Install a source rpm into an existing topdir without building it
pub async fn run_local_install(source: &Path, workdir: &Path, ctx: &RunContext) -> BuildTask {
    let mut task = BuildTask::new(source);
    let result = install_source(source, workdir, workdir, ctx).await;
    record_stage(&mut task, result);
    task.complete();
    task
}

async fn resolve_name(task: &mut BuildTask, echo: bool, ctx: &RunContext) -> Option<String> {
    let source = task.source_path.clone();
    let args: Vec<&OsStr> = vec![
        OsStr::new("-qp"),
        OsStr::new("--nosignature"),
        OsStr::new("--nodigest"),
        OsStr::new("--queryformat"),
        OsStr::new("%{NAME}"),
        source.as_os_str(),
    ];
    let mut result = run_tool(StageName::ResolveName, &ctx.tools.rpm, &args, echo).await;

    let mut name = None;
    if result.is_success() {
        let trimmed = result.stdout.trim();
        if trimmed.is_empty() {
            result.failure = Some(StageFailure::Semantic(
                "package name query produced no output".to_string(),
            ));
        } else {
            name = Some(trimmed.to_string());
        }
    }
    task.package_name = name.clone();
    record_stage(task, result)?;
    name
}

fn stage_workspace(task: &mut BuildTask, name: &str, ctx: &RunContext) -> Option<Workspace> {
    let staged = Workspace::resolve(&task.source_path, name, ctx).and_then(|ws| {
        ws.ensure_created()?;
        Ok(ws)
    });
    match staged {
        Ok(workspace) => {
            task.workspace = Some(workspace.clone());
            task.record(StageResult::ok(StageName::StageWorkspace));
            Some(workspace)
        }
        Err(error) => {
            record_stage(
                task,
                StageResult::from_failure(StageName::StageWorkspace, error.into()),
            );
            None
        }
    }
}

/// Unpack the source rpm into the build root, then confirm the staged
/// tree holds exactly one spec file. A zero or many spec count fails the
/// stage without a process error.
async fn materialize(
    task: &mut BuildTask,
    workspace: &Workspace,
    ctx: &RunContext,
) -> Option<PathBuf> {
    let source = task.source_path.clone();
    let mut result =
        install_source(&source, &workspace.build_root, &workspace.package_dir, ctx).await;

    let mut spec = None;
    if result.is_success() {
        match find_spec(&workspace.specs_dir()) {
            Ok(path) => spec = Some(path),
            Err(failure) => result.failure = Some(failure),
        }
    }
    record_stage(task, result)?;
    spec
}

async fn install_source(
    source: &Path,
    build_root: &Path,
    log_dir: &Path,
    ctx: &RunContext,
) -> StageResult {
    let topdir = topdir_define(build_root);
    let args: Vec<&OsStr> = vec![
        OsStr::new("-ivh"),
        OsStr::new("--define"),
        &topdir,
        source.as_os_str(),
    ];
    let mut result = run_tool(StageName::Materialize, &ctx.tools.rpm, &args, ctx.echo).await;
    if tool_failed(&result) {
        persist_failure_log(
            &mut result,
            log_dir.join(ctx.suffixed("mbuild_srpminstall_err.log")),
        );
    }
    result
}

/// The workdir must already look like an rpmbuild topdir with exactly
/// one spec staged, the local counterpart of the materialize stage.
fn verify_build_tree(task: &mut BuildTask, workdir: &Path) -> Option<PathBuf> {
    let checked = if workdir.join("SOURCES").is_dir() && workdir.join("SPECS").is_dir() {
        find_spec(&workdir.join("SPECS"))
    } else {
        Err(StageFailure::Semantic(format!(
            "no SOURCES or SPECS dir under {}",
            workdir.display()
        )))
    };
    match checked {
        Ok(spec) => {
            task.record(StageResult::ok(StageName::Materialize));
            Some(spec)
        }
        Err(failure) => {
            record_stage(
                task,
                StageResult::from_failure(StageName::Materialize, failure),
            );
            None
        }
    }
}

/// Record every installed package so a build can be diffed against the
/// host state it ran on. Never echoed, the listing is thousands of lines.
async fn snapshot_inventory(
    task: &mut BuildTask,
    artifact_dir: &Path,
    ctx: &RunContext,
) -> Option<()> {
    let mut result = run_tool(
        StageName::SnapshotInventory,
        &ctx.tools.rpm,
        &["-qa"],
        false,
    )
    .await;
    if result.is_success() {
        persist_success_log(
            &mut result,
            artifact_dir.join(ctx.suffixed("mbuild_rpm-manifest")),
            false,
        );
    } else if tool_failed(&result) {
        persist_failure_log(
            &mut result,
            artifact_dir.join(ctx.suffixed("mbuild_rpmqa_err.log")),
        );
    }
    record_stage(task, result)
}

async fn resolve_deps(
    task: &mut BuildTask,
    log_dir: &Path,
    spec: &Path,
    log_stderr: bool,
    ctx: &RunContext,
) -> Option<()> {
    let args: Vec<&OsStr> = vec![OsStr::new("builddep"), OsStr::new("-y"), spec.as_os_str()];
    let mut result = run_tool(StageName::ResolveDeps, &ctx.tools.yum, &args, ctx.echo).await;
    if result.is_success() {
        persist_success_log(
            &mut result,
            log_dir.join(ctx.suffixed("mbuild_builddep.log")),
            log_stderr,
        );
    } else if tool_failed(&result) {
        persist_failure_log(
            &mut result,
            log_dir.join(ctx.suffixed("mbuild_builddep_err.log")),
        );
    }
    record_stage(task, result)
}

async fn compile(
    task: &mut BuildTask,
    log_dir: &Path,
    build_root: &Path,
    spec: &Path,
    log_stderr: bool,
    ctx: &RunContext,
) -> Option<()> {
    let topdir = topdir_define(build_root);
    let args: Vec<&OsStr> = vec![
        OsStr::new("--define"),
        &topdir,
        OsStr::new("-ba"),
        spec.as_os_str(),
        OsStr::new("--nocheck"),
    ];
    let mut result = run_tool(StageName::Compile, &ctx.tools.rpmbuild, &args, ctx.echo).await;
    if result.is_success() {
        persist_success_log(
            &mut result,
            log_dir.join(ctx.suffixed("mbuild_rpmbuild.log")),
            log_stderr,
        );
    } else if tool_failed(&result) {
        persist_failure_log(&mut result, log_dir.join(ctx.suffixed("mbuild_build_err.log")));
    }
    record_stage(task, result)
}

async fn isolated_build(
    task: &mut BuildTask,
    result_dir: &Path,
    profile: &str,
    ctx: &RunContext,
) -> Option<()> {
    let source = task.source_path.clone();
    if let Err(error) = fs::create_dir_all(result_dir) {
        let failure = WorkspaceError::CreateDir {
            path: result_dir.to_path_buf(),
            error: error.to_string(),
        };
        return record_stage(
            task,
            StageResult::from_failure(StageName::IsolatedBuild, failure.into()),
        );
    }

    let args: Vec<&OsStr> = vec![
        OsStr::new("--root"),
        OsStr::new(profile),
        OsStr::new("--rebuild"),
        source.as_os_str(),
        OsStr::new("--resultdir"),
        result_dir.as_os_str(),
        OsStr::new("--verbose"),
    ];
    let mut result = run_tool(StageName::IsolatedBuild, &ctx.tools.mock, &args, ctx.echo).await;
    if result.is_success() {
        persist_success_log(
            &mut result,
            result_dir.join(ctx.suffixed("mbuild_mock.log")),
            true,
        );
    } else if tool_failed(&result) {
        persist_failure_log(
            &mut result,
            result_dir.join(ctx.suffixed("mbuild_mock_err.log")),
        );
    }
    record_stage(task, result)
}

async fn run_tool<S: AsRef<OsStr>>(
    stage: StageName,
    program: &str,
    args: &[S],
    echo: bool,
) -> StageResult {
    match executor::execute(program, args, echo).await {
        Ok(result) => StageResult::from_execution(stage, result),
        Err(error) => StageResult::from_failure(stage, error.into()),
    }
}

fn record_stage(task: &mut BuildTask, result: StageResult) -> Option<()> {
    let ok = result.is_success();
    if let Some(failure) = &result.failure {
        tracing::warn!(stage = %result.stage, error = %failure, "stage failed");
    }
    task.record(result);
    ok.then_some(())
}

/// The tool ran and exited non-zero, so there is output worth keeping
fn tool_failed(result: &StageResult) -> bool {
    matches!(result.failure, Some(StageFailure::NonZeroExit { .. }))
}

fn persist_success_log(result: &mut StageResult, path: PathBuf, include_stderr: bool) {
    let written = if include_stderr {
        write_combined_log(&path, &result.stdout, &result.stderr)
    } else {
        write_artifact(&path, &result.stdout)
    };
    match written {
        Ok(()) => result.add_artifact(path),
        Err(error) => result.failure = Some(error.into()),
    }
}

/// Failure logs are best effort, losing one must not mask the stage failure
fn persist_failure_log(result: &mut StageResult, path: PathBuf) {
    match write_combined_log(&path, &result.stdout, &result.stderr) {
        Ok(()) => result.add_artifact(path),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "failure log could not be written");
        }
    }
}

fn find_spec(specs_dir: &Path) -> Result<PathBuf, StageFailure> {
    let entries = fs::read_dir(specs_dir).map_err(|error| {
        StageFailure::Semantic(format!("cannot read {}: {error}", specs_dir.display()))
    })?;
    let mut specs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "spec") && path.is_file())
        .collect();
    specs.sort();

    match specs.len() {
        0 => Err(StageFailure::Semantic(format!(
            "no spec file under {}",
            specs_dir.display()
        ))),
        1 => Ok(specs.remove(0)),
        n => Err(StageFailure::Semantic(format!(
            "{n} spec files under {}, expected exactly one",
            specs_dir.display()
        ))),
    }
}

fn topdir_define(build_root: &Path) -> OsString {
    let mut define = OsString::from("_topdir ");
    define.push(build_root.as_os_str());
    define
}
