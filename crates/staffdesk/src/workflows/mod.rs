pub mod assignments;
pub mod codes;
pub mod payroll;
