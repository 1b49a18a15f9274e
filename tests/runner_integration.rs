#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::tempdir;

use forcing_harness::validate::check_exit_status;
use forcing_harness::{
    reconstruct, ExperimentRunner, ExperimentSpec, HarnessConfig, HarnessError,
};

const FAKE_MODEL: &str = r#"#!/bin/sh
echo "model starting"
cat > atm.log <<'LOG'
{'cur_exp-datetime': '1958-01-01T00:00:00'}
{'cur_forcing-datetime': '1958-01-01T00:00:00'}
{'forcing_update_field-datetime': '1958-01-01T00:00:00'}
{'field_update_data-file': 'rsds_1958.nc'}
{'field_update_data-index': 1}
{'checksum-matmxx-swfld_ai-0000000000': 913497.713}
LOG
echo "coupling established" > matm.log
"#;

fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn config_with_experiment(root: &Path, name: &str, script: &str) -> HarnessConfig {
    let exp_dir = root.join(name);
    fs::create_dir(&exp_dir).unwrap();
    fs::write(
        exp_dir.join("accessom2.nml"),
        "&date_manager_nml\n\
         forcing_start_date = '1958-01-01T00:00:00'\n\
         forcing_end_date = '1959-01-01T00:00:00'\n/\n",
    )
    .unwrap();

    let executable = root.join("fake_atm.sh");
    write_executable(&executable, script);

    let mut config = HarnessConfig::rooted_at(root);
    config.executable = executable;
    config
}

#[test]
fn run_captures_exit_code_stdout_and_logs() {
    let temp = tempdir().unwrap();
    let config = config_with_experiment(temp.path(), "SMOKE", FAKE_MODEL);

    let runner = ExperimentRunner::new(config);
    let run = runner.run(&ExperimentSpec::named("SMOKE")).unwrap();

    assert_eq!(run.exit_code, 0);
    assert!(check_exit_status(&run).is_ok());
    assert!(run.stdout.contains("model starting"));
    assert!(run.secondary_log.contains("coupling established"));

    let reconstruction = reconstruct(&run.log).unwrap();
    assert_eq!(reconstruction.items.len(), 1);
    assert_eq!(reconstruction.items[0].field_name, "swfld_ai");
    assert_eq!(reconstruction.items[0].checksum.value, 913497.713);
}

#[test]
fn a_failing_model_reports_its_exit_code() {
    let temp = tempdir().unwrap();
    let config = config_with_experiment(temp.path(), "BROKEN", "#!/bin/sh\nexit 3\n");

    let runner = ExperimentRunner::new(config);
    let run = runner.run(&ExperimentSpec::named("BROKEN")).unwrap();

    assert_eq!(run.exit_code, 3);
    assert!(run.log.is_empty());
    let err = check_exit_status(&run).unwrap_err();
    assert!(matches!(err, HarnessError::Validation(_)), "got {err:?}");
}

#[test]
fn a_missing_experiment_directory_is_a_config_error() {
    let temp = tempdir().unwrap();
    let config = HarnessConfig::rooted_at(temp.path());
    let runner = ExperimentRunner::new(config);
    let err = runner.run(&ExperimentSpec::named("NOPE")).unwrap_err();
    assert!(matches!(err, HarnessError::Config(_)), "got {err:?}");
}

#[test]
fn duration_override_is_forwarded_to_the_model() {
    let temp = tempdir().unwrap();
    let config = config_with_experiment(
        temp.path(),
        "ARGS",
        "#!/bin/sh\necho \"args: $@\"\n",
    );

    let runner = ExperimentRunner::new(config);
    let run = runner
        .run(&ExperimentSpec::named("ARGS").with_years(1))
        .unwrap();
    assert!(run.stdout.contains("--years-duration 1"), "stdout: {}", run.stdout);
}
