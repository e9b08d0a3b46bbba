use super::*;

fn job_with_threads(threads: Option<usize>) -> JobConfig {
    JobConfig {
        threads,
        ..JobConfig::default()
    }
}

#[test]
fn caller_thread_count_wins_over_job_document() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = StageContext::new(dir.path()).unwrap().with_threads(Some(2));
    assert_eq!(effective_threads(&ctx, &job_with_threads(Some(8))), Some(2));
    assert_eq!(effective_threads(&ctx, &job_with_threads(None)), Some(2));

    let unset = StageContext::new(dir.path()).unwrap();
    assert_eq!(effective_threads(&unset, &job_with_threads(Some(8))), Some(8));
    assert_eq!(effective_threads(&unset, &job_with_threads(None)), None);
}

#[test]
fn empty_job_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = StageContext::new(dir.path()).unwrap();
    let job = JobConfig::default();
    assert!(job.is_empty());

    let report = run_job(&ctx, &job, Some("Lemons")).unwrap();
    assert_eq!(report, JobReport::default());
    assert!(report.written().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn invalid_thread_count_fails_before_any_stage() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = StageContext::new(dir.path()).unwrap();
    let err = run_job(&ctx, &job_with_threads(Some(0)), None).unwrap_err();
    assert!(err.is_config());
}
