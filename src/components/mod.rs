pub mod gate;
pub mod plagiarism_checker;
pub mod report_form;
pub mod review_form;
pub mod reviews_list;
