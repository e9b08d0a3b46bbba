//! Working-directory context, file discovery and the parallel task runner shared by stages.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rayon::prelude::*;

use crate::foundation::error::{FoundryError, FoundryResult};

/// Everything a stage needs besides its own configuration.
#[derive(Clone, Debug)]
pub struct StageContext {
    /// Directory all relative input and output paths resolve against.
    pub working_dir: PathBuf,
    /// Worker threads for parallel stages; `None` uses one per core.
    pub threads: Option<usize>,
}

impl StageContext {
    /// Context rooted at `working_dir`, which must be an existing directory.
    pub fn new(working_dir: impl Into<PathBuf>) -> FoundryResult<Self> {
        let working_dir = working_dir.into();
        if working_dir.as_os_str().is_empty() || !working_dir.is_dir() {
            return Err(FoundryError::config(format!(
                "working directory '{}' does not exist",
                working_dir.display()
            )));
        }
        Ok(Self {
            working_dir,
            threads: None,
        })
    }

    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// `path` joined onto the working directory (absolute paths pass through).
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.working_dir.join(path)
    }

    /// Files in `dir` (relative to the working directory) whose names match `pattern`.
    pub fn discover(&self, dir: impl AsRef<Path>, pattern: &str) -> FoundryResult<Vec<PathBuf>> {
        discover(&self.resolve(dir), pattern)
    }

    /// Run `task` over `items` on a pool sized by [`StageContext::threads`].
    pub fn run_parallel<T, R>(
        &self,
        items: &[T],
        task: impl Fn(usize, &T) -> FoundryResult<R> + Sync,
    ) -> FoundryResult<Vec<R>>
    where
        T: Sync,
        R: Send,
    {
        run_parallel(self.threads, items, task)
    }
}

/// Regular files directly inside `dir` whose names match `pattern`, sorted by name.
///
/// `*` matches any run of characters and `?` exactly one; matching ignores ASCII case.
/// A missing directory yields no files.
pub fn discover(dir: &Path, pattern: &str) -> FoundryResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "discovery directory missing");
        return Ok(Vec::new());
    }
    let rd = std::fs::read_dir(dir).with_context(|| format!("read dir '{}'", dir.display()))?;

    let mut out = Vec::new();
    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if glob_match(pattern, name) {
            out.push(path);
        }
    }
    out.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!(dir = %dir.display(), pattern, count = out.len(), "discovered files");
    Ok(out)
}

/// Match a file name against a `*`/`?` wildcard pattern, ignoring ASCII case.
pub fn glob_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();
    let n: Vec<char> = name.chars().map(|c| c.to_ascii_lowercase()).collect();

    let (mut pi, mut ni) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;
    while ni < n.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == n[ni]) {
            pi += 1;
            ni += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ni));
            pi += 1;
        } else if let Some((sp, sn)) = star {
            pi = sp + 1;
            ni = sn + 1;
            star = Some((sp, sn + 1));
        } else {
            return false;
        }
    }
    p[pi..].iter().all(|c| *c == '*')
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> FoundryResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(FoundryError::config("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| FoundryError::config(format!("failed to build rayon thread pool: {e}")))
}

/// Run one task per item in parallel and wait for all of them.
///
/// Every task runs to completion. Results come back in item order; if any task failed, the
/// error of the lowest-index failure is returned.
pub fn run_parallel<T, R>(
    threads: Option<usize>,
    items: &[T],
    task: impl Fn(usize, &T) -> FoundryResult<R> + Sync,
) -> FoundryResult<Vec<R>>
where
    T: Sync,
    R: Send,
{
    let pool = build_thread_pool(threads)?;
    let results = pool.install(|| {
        items
            .par_iter()
            .enumerate()
            .map(|(i, item)| task(i, item))
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(results.len());
    for item in results {
        out.push(item?);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../tests/unit/workspace/workspace.rs"]
mod tests;
