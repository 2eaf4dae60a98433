pub mod batch;
pub mod pool;

pub use batch::{
    load_report_dir, parse_report_dir, parse_reports_parallel, BatchError, ReportFile,
    REPORT_EXTENSIONS,
};
pub use pool::WorkerPool;
