//! End-to-end staging of the curl layout against a scratch module directory.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use hdrstage_fsops::{
    CopyTask, StageAction, StageError, StageLayout, plan, run, stage, stage_task,
};
use tempfile::TempDir;

struct Module {
    _temp: TempDir,
    root: PathBuf,
}

impl Module {
    fn new() -> Result<Self, Box<dyn Error>> {
        let temp = tempfile::Builder::new()
            .prefix("hdrstage-module-")
            .tempdir()?;
        let root = temp.path().to_path_buf();
        fs::create_dir_all(root.join("upstream/include/curl"))?;
        fs::create_dir_all(root.join("upstream/lib"))?;
        Ok(Self { _temp: temp, root })
    }

    fn module_path(&self) -> PathBuf {
        self.root.join("configure.py")
    }

    fn curlbuild(&self) -> PathBuf {
        self.root.join("upstream/include/curl/curlbuild.h")
    }

    fn setup(&self) -> PathBuf {
        self.root.join("upstream/lib/setup.h")
    }

    fn write(&self, relative: &str, contents: &str) -> Result<(), Box<dyn Error>> {
        fs::write(self.root.join(relative), contents)?;
        Ok(())
    }
}

fn actions(report: &hdrstage_fsops::StageReport) -> Vec<StageAction> {
    report.records.iter().map(|record| record.action).collect()
}

#[test]
fn run_copies_then_reports_not_modified() -> Result<(), Box<dyn Error>> {
    let module = Module::new()?;
    module.write("curlbuild.h", "#define X 1")?;
    module.write("setup.h", "#define SETUP 1")?;

    let first = run(&module.module_path(), None, &[])?;
    assert_eq!(actions(&first), vec![StageAction::Copy, StageAction::Copy]);
    assert_eq!(fs::read_to_string(module.curlbuild())?, "#define X 1");
    assert_eq!(fs::read_to_string(module.setup())?, "#define SETUP 1");

    let second = run(&module.module_path(), None, &[])?;
    assert_eq!(
        actions(&second),
        vec![StageAction::NotModified, StageAction::NotModified]
    );
    assert!(second.is_up_to_date());
    Ok(())
}

#[test]
fn identical_destination_keeps_mtime() -> Result<(), Box<dyn Error>> {
    let module = Module::new()?;
    module.write("curlbuild.h", "#define X 1")?;
    module.write("setup.h", "#define SETUP 1")?;
    fs::write(module.curlbuild(), "#define X 1")?;
    fs::write(module.setup(), "#define SETUP 1")?;
    let before = fs::metadata(module.curlbuild())?.modified()?;

    let report = run(&module.module_path(), Some(Path::new("/global")), &[])?;
    assert_eq!(report.copied(), 0);
    assert_eq!(fs::metadata(module.curlbuild())?.modified()?, before);
    assert_eq!(fs::read_to_string(module.curlbuild())?, "#define X 1");
    Ok(())
}

#[test]
fn changed_source_overwrites_only_that_header() -> Result<(), Box<dyn Error>> {
    let module = Module::new()?;
    module.write("curlbuild.h", "#define X 2")?;
    module.write("setup.h", "#define SETUP 1")?;
    fs::write(module.curlbuild(), "#define X 1")?;
    fs::write(module.setup(), "#define SETUP 1")?;

    let report = run(&module.module_path(), None, &["ignored".to_string()])?;
    assert_eq!(
        actions(&report),
        vec![StageAction::Copy, StageAction::NotModified]
    );
    assert_eq!(fs::read_to_string(module.curlbuild())?, "#define X 2");
    Ok(())
}

#[test]
fn status_lines_name_source_destination_and_action() -> Result<(), Box<dyn Error>> {
    let module = Module::new()?;
    module.write("curlbuild.h", "#define X 1")?;
    module.write("setup.h", "#define SETUP 1")?;

    let report = run(&module.module_path(), None, &[])?;
    let line = report.records[0].to_string();
    assert_eq!(
        line,
        format!(
            "{} to {} COPY",
            module.root.join("curlbuild.h").display(),
            module.curlbuild().display()
        )
    );
    Ok(())
}

#[test]
fn missing_source_fails_without_touching_destination() -> Result<(), Box<dyn Error>> {
    let module = Module::new()?;
    module.write("setup.h", "#define SETUP 1")?;
    fs::write(module.curlbuild(), "old")?;

    let err = run(&module.module_path(), None, &[]);
    match err {
        Err(StageError::FileNotFound { path }) => {
            assert_eq!(path, module.root.join("curlbuild.h"));
        }
        other => return Err(format!("expected FileNotFound, got {other:?}").into()),
    }
    assert_eq!(fs::read_to_string(module.curlbuild())?, "old");
    Ok(())
}

#[test]
fn missing_upstream_tree_is_write_error() -> Result<(), Box<dyn Error>> {
    let temp = tempfile::tempdir()?;
    fs::write(temp.path().join("curlbuild.h"), "#define X 1")?;
    fs::write(temp.path().join("setup.h"), "#define SETUP 1")?;

    let tasks = StageLayout::curl().tasks(temp.path());
    let err = stage(&tasks);
    assert!(matches!(err, Err(StageError::WriteError { .. })));
    Ok(())
}

#[test]
fn upstream_file_in_place_of_directory_is_write_error() -> Result<(), Box<dyn Error>> {
    let temp = tempfile::tempdir()?;
    fs::write(temp.path().join("curlbuild.h"), "#define X 1")?;
    fs::write(temp.path().join("setup.h"), "#define SETUP 1")?;
    fs::write(temp.path().join("upstream"), "not a directory")?;

    let task = CopyTask::new(
        temp.path().join("curlbuild.h"),
        temp.path().join("upstream").join("curlbuild.h"),
    );
    match stage_task(&task) {
        Err(StageError::WriteError { path, .. }) => assert_eq!(path, task.destination),
        other => return Err(format!("expected WriteError, got {other:?}").into()),
    }

    let tasks = StageLayout::curl().tasks(temp.path());
    assert!(matches!(stage(&tasks), Err(StageError::WriteError { .. })));
    assert!(matches!(plan(&tasks), Err(StageError::WriteError { .. })));
    assert_eq!(fs::read_to_string(temp.path().join("upstream"))?, "not a directory");
    Ok(())
}

#[test]
fn plan_reports_pending_copies_without_writing() -> Result<(), Box<dyn Error>> {
    let module = Module::new()?;
    module.write("curlbuild.h", "#define X 1")?;
    module.write("setup.h", "#define SETUP 1")?;
    fs::write(module.setup(), "#define SETUP 1")?;

    let tasks = StageLayout::curl().tasks(&module.root);
    let report = plan(&tasks)?;
    assert_eq!(
        actions(&report),
        vec![StageAction::Copy, StageAction::NotModified]
    );
    assert!(!module.curlbuild().exists());
    Ok(())
}
