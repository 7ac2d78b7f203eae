pub mod jobs;
pub mod profile;
pub mod report;
