use asg_test_model::ResourceDescriptor;
use assert_cmd::Command;
use std::fs;

fn asg_test() -> Command {
    let mut cmd = Command::cargo_bin("asg-test").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("ASG_E2E_BOOTSTRAP_DIR")
        .env_remove("ASG_E2E_REGION");
    cmd
}

fn stdout(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn replacements_fall_back_without_a_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let out = stdout(asg_test().args([
        "--bootstrap-dir",
        dir.path().to_str().unwrap(),
        "replacements",
    ]));
    assert!(out.contains("LAUNCH_TEMPLATE_ID=\n"));
    assert!(out.contains("LAUNCH_TEMPLATE_VERSION=$Latest\n"));
    assert!(out.contains("AVAILABILITY_ZONE_1=us-west-2a\n"));
}

#[test]
fn replacements_come_from_the_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    ResourceDescriptor::new("lt-0abc", "ack-test-asg-launch-template", "us-west-2c", ["subnet-1", "subnet-2"])
        .write_to(dir.path())
        .unwrap();
    let out = stdout(asg_test().args([
        "--bootstrap-dir",
        dir.path().to_str().unwrap(),
        "replacements",
        "--json",
    ]));
    let values: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(values["LAUNCH_TEMPLATE_ID"], "lt-0abc");
    assert_eq!(values["VPC_ZONE_IDENTIFIER"], "subnet-1,subnet-2");
}

#[test]
fn render_substitutes_name_and_overrides() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("auto_scaling_group.yaml"),
        "metadata:\n  name: $ASG_NAME\nspec:\n  minSize: $MIN_SIZE\n  version: \"$LAUNCH_TEMPLATE_VERSION\"\n",
    )
    .unwrap();
    let out = stdout(asg_test().args([
        "--bootstrap-dir",
        dir.path().to_str().unwrap(),
        "render",
        "--resource-dir",
        dir.path().to_str().unwrap(),
        "--name",
        "my-asg",
        "--set",
        "MIN_SIZE=2",
    ]));
    let rendered: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(rendered["metadata"]["name"], "my-asg");
    assert_eq!(rendered["spec"]["minSize"], 2);
    assert_eq!(rendered["spec"]["version"], "$Latest");
}

#[test]
fn render_of_a_missing_template_fails() {
    let dir = tempfile::tempdir().unwrap();
    asg_test()
        .args([
            "--bootstrap-dir",
            dir.path().to_str().unwrap(),
            "render",
            "nope",
            "--resource-dir",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn malformed_set_is_rejected() {
    asg_test()
        .args(["render", "--set", "NO_EQUALS_SIGN"])
        .assert()
        .failure();
}
