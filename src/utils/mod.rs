pub mod clock;
pub mod employee_lock;
pub mod fields;
pub mod pagination;
