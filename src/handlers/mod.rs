pub mod auth;
pub mod payroll;
pub mod shared;
pub mod shifts;
