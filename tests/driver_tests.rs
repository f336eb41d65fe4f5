use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use regiondiff::{
    load_requests, run_batch, run_requests, ComparisonRequest, Console, Error, Options, Summary,
};
use tempfile::tempdir;

fn write(dir: &Path, rel: &str, content: &str) -> PathBuf {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn json_path(path: &Path) -> String {
    serde_json::to_string(&path.to_string_lossy()).unwrap()
}

#[test]
fn failures_are_printed_and_do_not_stop_the_batch() {
    let dir = tempdir().unwrap();
    let same_a = write(dir.path(), "same/a.py", "x = 1\n");
    let same_b = write(dir.path(), "same/b.py", "x = 1\n");
    let diff_a = write(dir.path(), "diff/a.py", "x = 1\n");
    let diff_b = write(dir.path(), "diff/b.py", "x = 2\n");
    let ghost = dir.path().join("ghost.py");

    let requests = [
        ComparisonRequest::new(&diff_a, &diff_b),
        ComparisonRequest::new(&same_a, &ghost),
        ComparisonRequest::new(&same_a, &same_b),
    ];
    let mut console = Console::new(Vec::new());
    let summary = run_requests(&requests, &Options::default(), &mut console).unwrap();
    assert_eq!(summary, Summary { total: 3, failed: 2 });

    let output = String::from_utf8(console.into_inner()).unwrap();
    let expected = format!(
        "Comparing {da} with {db}\n\
         FAILURE\n    \
         contents differ:\n      \
         --- {da}\n      \
         +++ {db}\n      \
         @@ -1 +1 @@\n      \
         -x = 1\n      \
         +x = 2\n\
         Comparing {sa} with {g}\n\
         FAILURE\n    \
         destination path does not exist: {g}\n\
         Comparing {sa} with {sb}\n\
         OK\n\
         ==== 2 of 3 comparisons FAILED ====\n",
        da = diff_a.display(),
        db = diff_b.display(),
        sa = same_a.display(),
        sb = same_b.display(),
        g = ghost.display(),
    );
    assert_eq!(output, expected);
}

#[test]
fn tree_requests_print_per_file_progress() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    write(&src, "a.py", "a\n");
    write(&src, "b.py", "b\n");
    write(&dst, "a.py", "a\n");

    let mut console = Console::new(Vec::new());
    let summary = run_requests(
        &[ComparisonRequest::new(&src, &dst)],
        &Options::default(),
        &mut console,
    )
    .unwrap();
    assert!(!summary.all_passed());

    let output = String::from_utf8(console.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], format!("Comparing {} with {}", src.display(), dst.display()));
    assert_eq!(
        &lines[1..6],
        ["  checking a.py", "    OK", "  checking b.py", "    FAILURE", "FAILURE"]
    );
    assert!(lines[6].starts_with("    b.py: no destination file: "));
}

#[test]
fn all_passing_batch_prints_no_banner() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.py", "same\n");
    let mut console = Console::recording(Vec::new());
    let summary = run_requests(
        &[ComparisonRequest::new(&a, &a)],
        &Options::default(),
        &mut console,
    )
    .unwrap();
    assert!(summary.all_passed());
    assert_eq!(
        console.transcript(),
        Some(format!("Comparing {0} with {0}\nOK\n", a.display()).as_str())
    );
}

#[test]
fn fatal_errors_abort_the_batch() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "a.py", "x\n");
    let requests = [
        ComparisonRequest::new(&file, dir.path()),
        ComparisonRequest::new(&file, &file),
    ];
    let mut console = Console::new(Vec::new());
    let err = run_requests(&requests, &Options::default(), &mut console).unwrap_err();
    assert!(matches!(err, Error::MixedPathKinds { .. }));
}

#[test]
fn batch_from_config_writes_report() {
    let dir = tempdir().unwrap();
    let a = write(
        dir.path(),
        "a/fec.py",
        "#region UTILS\nx = 1\n#endregion\n#region MAIN\nrun()\n#endregion\n",
    );
    let b = write(
        dir.path(),
        "b/fec.py",
        "#region HELPERS\nx = 1\n#endregion\n#region MAIN\nrun(fast=True)\n#endregion\n",
    );
    let config = write(
        dir.path(),
        "batch.json",
        &format!(
            r#"[
                {{"source": {a}, "dest": {b},
                  "regions": [{{"in_source": "UTILS", "in_dest": "HELPERS"}}]}},
                {{"source": {a}, "dest": {b},
                  "regions": [{{"in_source": "MAIN", "in_dest": "MAIN"}}]}}
            ]"#,
            a = json_path(&a),
            b = json_path(&b),
        ),
    );
    let report = dir.path().join("out/report.txt");
    fs::create_dir_all(report.parent().unwrap()).unwrap();

    let opts = Options {
        report: Some(report.clone()),
        ..Options::default()
    };
    let summary = run_batch(&config, &opts).unwrap();
    assert_eq!(summary, Summary { total: 2, failed: 1 });

    let written = fs::read_to_string(&report).unwrap();
    assert!(written.starts_with(&format!("Comparing {} with {}\nOK\n", a.display(), b.display())));
    assert!(written.contains("region \"MAIN\" differs from region \"MAIN\":"));
    assert!(written.contains("+run(fast=True)"));
    assert!(written.ends_with("==== 1 of 2 comparisons FAILED ====\n"));
}

#[test]
fn malformed_config_is_fatal() {
    let dir = tempdir().unwrap();
    let config = write(dir.path(), "batch.json", r#"{"source": "a"}"#);
    assert!(matches!(
        load_requests(&config),
        Err(Error::ConfigParse { .. })
    ));
    assert!(run_batch(&config, &Options::default()).is_err());
}
