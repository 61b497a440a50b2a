pub mod repository;

pub use repository::{GitOps, ensure_clean_work_tree};
