pub mod plagiarism;
pub mod report;
pub mod review;
pub mod session;
