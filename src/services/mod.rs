pub mod reconciliation;
pub mod shifts;

pub use reconciliation::ReconciliationService;
pub use shifts::{Actor, RateLookup, ShiftService};
