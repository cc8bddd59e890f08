pub mod payment;
pub mod shift;
pub mod summary;
pub mod worker;

pub use payment::{PaymentInput, PaymentRecord};
pub use shift::{CloseShiftInput, OpenShiftInput, Shift, ShiftStatus};
pub use summary::WorkerSummary;
pub use worker::{Role, Worker, WorkerInfo};
