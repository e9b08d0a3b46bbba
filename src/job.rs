//! Whole-run driver: every configured stage in dependency order.

use std::path::PathBuf;

use crate::compose::run_compose;
use crate::config::JobConfig;
use crate::foundation::error::FoundryResult;
use crate::listing::{PreviewReport, run_preview, run_primary};
use crate::pattern::{PatternReport, run_pattern};
use crate::text::TextEngine;
use crate::workspace::StageContext;

/// What each stage of a job produced. Skipped stages stay `None` / empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobReport {
    pub pattern: Option<PatternReport>,
    pub composed: Vec<PathBuf>,
    pub preview: Option<PreviewReport>,
    pub primary: Option<PathBuf>,
}

impl JobReport {
    /// Every file written, in stage order.
    pub fn written(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        if let Some(pattern) = &self.pattern {
            for o in &pattern.outputs {
                out.push(o.full.clone());
                out.push(o.preview.clone());
            }
        }
        out.extend(self.composed.iter().cloned());
        if let Some(preview) = &self.preview {
            out.extend(preview.outputs.iter().cloned());
        }
        out.extend(self.primary.iter().cloned());
        out
    }
}

/// Thread count for a job: the caller's setting wins over the job document's.
pub(crate) fn effective_threads(ctx: &StageContext, job: &JobConfig) -> Option<usize> {
    ctx.threads.or(job.threads)
}

/// Run pattern → compose → preview → primary. The first failing stage aborts the job.
#[tracing::instrument(skip(ctx, job, short_title), fields(dir = %ctx.working_dir.display()))]
pub fn run_job(
    ctx: &StageContext,
    job: &JobConfig,
    short_title: Option<&str>,
) -> FoundryResult<JobReport> {
    job.validate()?;
    let ctx = ctx.clone().with_threads(effective_threads(ctx, job));
    let mut report = JobReport::default();
    if job.is_empty() {
        tracing::warn!("job configures no stages; nothing to do");
        return Ok(report);
    }

    if let Some(cfg) = &job.pattern {
        report.pattern = Some(run_pattern(&ctx, cfg)?);
    }

    let text = (!job.compose.is_empty() || job.primary.is_some())
        .then(|| TextEngine::for_working_dir(&ctx.working_dir));

    if let Some(text) = &text {
        for cfg in &job.compose {
            report.composed.push(run_compose(&ctx, cfg, text)?);
        }
    }

    if let Some(cfg) = &job.preview {
        report.preview = Some(run_preview(&ctx, cfg)?);
    }

    if let (Some(cfg), Some(text)) = (&job.primary, &text) {
        report.primary = run_primary(&ctx, cfg, short_title, text)?;
    }

    tracing::info!(files = report.written().len(), "job finished");
    Ok(report)
}

#[cfg(test)]
#[path = "../tests/unit/job/job.rs"]
mod tests;
