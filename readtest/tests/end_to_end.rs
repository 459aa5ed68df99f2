//! End-to-end tests running readtest against a store on the local filesystem.

use std::path::Path;
use std::process::{Command, Output};

use blockstore_service::BlockStore;
use readtest::config::Config;
use readtest::report::TextReport;
use readtest::sampler::Sampler;

fn write_objects(dir: &Path, sizes: &[usize]) {
    for (index, size) in sizes.iter().enumerate() {
        let name = format!("{:010}.dbin.zst", index * 100);
        std::fs::write(dir.join(name), vec![0x5a; *size]).unwrap();
    }
}

fn run_readtest(args: &[&str], envs: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_readtest"))
        .args(args)
        .env_remove("RUST_LOG")
        .envs(envs.iter().copied())
        .output()
        .unwrap()
}

#[tokio::test]
async fn reads_every_object_of_a_local_store() {
    blockstore_test::tracing::init();
    let tempdir = tempfile::tempdir().unwrap();
    write_objects(tempdir.path(), &[1000, 2000, 500, 4096, 0]);

    let store = BlockStore::from_url(tempdir.path().to_str().unwrap())
        .await
        .unwrap();
    let config = Config {
        max_iterations: 5,
        ..Default::default()
    };

    let mut report = TextReport::new(Vec::new());
    let summary = Sampler::new(config, 0)
        .run(&store, &mut report)
        .await
        .unwrap();

    assert_eq!(summary.total_bytes, 7596);
    assert_eq!(summary.fetch_count, 5);

    let output = String::from_utf8(report.into_inner()).unwrap();
    assert!(output.starts_with("Starting read test"), "{output}");
}

#[tokio::test]
async fn base_offset_shifts_the_sequence() {
    let tempdir = tempfile::tempdir().unwrap();
    std::fs::write(tempdir.path().join("0000000042.dbin"), b"first").unwrap();
    std::fs::write(tempdir.path().join("0000000142.dbin"), b"second").unwrap();

    let url = format!("file://{}?extension=dbin", tempdir.path().display());
    let store = BlockStore::from_url(&url).await.unwrap();
    let config = Config {
        max_iterations: 2,
        ..Default::default()
    };

    let summary = Sampler::new(config, 42)
        .run(&store, &mut TextReport::new(std::io::sink()))
        .await
        .unwrap();

    assert_eq!(summary.total_bytes, 11);
    assert_eq!(summary.fetch_count, 2);
}

#[test]
fn completed_run_prints_summary() {
    let tempdir = tempfile::tempdir().unwrap();
    write_objects(tempdir.path(), &[100, 200, 300]);

    let output = run_readtest(
        &[tempdir.path().to_str().unwrap()],
        &[("READTEST__MAX_ITERATIONS", "3")],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{output:?}");
    assert!(stdout.contains("Starting read test (transfer rate will be printed each 5s)"));
    assert!(stdout.contains("(3 fetches"), "{stdout}");
    assert!(stdout.contains("(600 bytes in"), "{stdout}");
}

#[test]
fn missing_object_fails_without_summary() {
    let tempdir = tempfile::tempdir().unwrap();
    write_objects(tempdir.path(), &[1000, 2000]);

    let output = run_readtest(&[tempdir.path().to_str().unwrap(), "0"], &[]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(!stdout.contains("Overall"), "{stdout}");
    assert!(stderr.contains("unable to open object 0000000200"), "{stderr}");
}

#[test]
fn wrong_argument_count_is_a_usage_error() {
    let output = run_readtest(&[], &[]);
    assert_eq!(output.status.code(), Some(1));

    let output = run_readtest(&["/tmp", "0", "extra"], &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn malformed_offset_is_rejected() {
    let tempdir = tempfile::tempdir().unwrap();

    let output = run_readtest(&[tempdir.path().to_str().unwrap(), "12ab"], &[]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("unable to parse block offset"), "{stderr}");
}

#[test]
fn unusable_store_is_rejected() {
    let output = run_readtest(&["ftp://blocks/merged"], &[]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("unable to create store"), "{stderr}");
}
