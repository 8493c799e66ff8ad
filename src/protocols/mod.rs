pub mod raw;
pub mod wf_info;
