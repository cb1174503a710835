pub mod advance;
pub mod loan;
pub mod salary;
