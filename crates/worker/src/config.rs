use std::time::Duration;

use ecom_core::generation::DEFAULT_PRODUCT_COUNT;

/// Default number of jobs allowed to insert at the same time.
const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;
/// Default number of queued plus running jobs before new submissions are refused.
const DEFAULT_MAX_PENDING_JOBS: usize = 32;
/// Default ceiling on the product count of a single job.
const DEFAULT_MAX_PRODUCTS_PER_JOB: u32 = 100_000;
/// Default pause between two inserts of the same job.
const DEFAULT_INSERT_DELAY_MS: u64 = 10;
/// Default number of job snapshots kept in memory, finished ones are evicted first.
const DEFAULT_JOB_HISTORY: usize = 100;

/// Limits and pacing for the generation runner.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub max_concurrent_jobs: usize,
    pub max_pending_jobs: usize,
    pub max_products_per_job: u32,
    pub default_product_count: u32,
    pub insert_delay: Duration,
    pub job_history: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
            max_pending_jobs: DEFAULT_MAX_PENDING_JOBS,
            max_products_per_job: DEFAULT_MAX_PRODUCTS_PER_JOB,
            default_product_count: DEFAULT_PRODUCT_COUNT,
            insert_delay: Duration::from_millis(DEFAULT_INSERT_DELAY_MS),
            job_history: DEFAULT_JOB_HISTORY,
        }
    }
}

impl GeneratorConfig {
    /// Load generator limits from environment variables.
    ///
    /// | Env Var                          | Default  |
    /// |----------------------------------|----------|
    /// | `GENERATION_MAX_CONCURRENT_JOBS` | `4`      |
    /// | `GENERATION_MAX_PENDING_JOBS`    | `32`     |
    /// | `GENERATION_MAX_PRODUCTS`        | `100000` |
    /// | `GENERATION_INSERT_DELAY_MS`     | `10`     |
    /// | `GENERATION_JOB_HISTORY`         | `100`    |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but does not parse, or if a limit is zero.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let max_concurrent_jobs: usize =
            env_or("GENERATION_MAX_CONCURRENT_JOBS", defaults.max_concurrent_jobs);
        let max_pending_jobs: usize =
            env_or("GENERATION_MAX_PENDING_JOBS", defaults.max_pending_jobs);
        let max_products_per_job: u32 =
            env_or("GENERATION_MAX_PRODUCTS", defaults.max_products_per_job);
        let insert_delay_ms: u64 = env_or("GENERATION_INSERT_DELAY_MS", DEFAULT_INSERT_DELAY_MS);
        let job_history: usize = env_or("GENERATION_JOB_HISTORY", defaults.job_history);

        assert!(max_concurrent_jobs > 0, "GENERATION_MAX_CONCURRENT_JOBS must be > 0");
        assert!(max_pending_jobs > 0, "GENERATION_MAX_PENDING_JOBS must be > 0");
        assert!(max_products_per_job > 0, "GENERATION_MAX_PRODUCTS must be > 0");

        Self {
            max_concurrent_jobs,
            max_pending_jobs,
            max_products_per_job,
            default_product_count: defaults.default_product_count.min(max_products_per_job),
            insert_delay: Duration::from_millis(insert_delay_ms),
            job_history,
        }
    }
}

fn env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + ToString,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{key} must be a valid number"))
}
