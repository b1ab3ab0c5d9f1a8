pub mod resumes;
pub mod screening;
