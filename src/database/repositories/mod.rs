pub mod payment;
pub mod shift;
pub mod worker;

// Re-export all repositories for easy importing
pub use payment::{PaidTotals, PaymentRepository};
pub use shift::{ClosedShiftTotals, ShiftRepository};
pub use worker::WorkerRepository;
