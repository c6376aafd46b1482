pub mod attendance;
pub mod company;
pub mod employee;
pub mod project;
