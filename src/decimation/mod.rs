pub mod common;
pub mod min_max;

pub use common::{finite_points, merge_runs, scan_buckets, BucketExtrema};
pub use min_max::{bucket_duration, effective_window, reduce};
