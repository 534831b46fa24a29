pub mod classify;
pub mod lazy_header;
pub mod pipeline;
pub mod report;
pub mod scan;
pub mod similarity;
