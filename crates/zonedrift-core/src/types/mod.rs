mod delegation;
mod record;
mod report;
mod violation;

pub use delegation::*;
pub use record::*;
pub use report::*;
pub use violation::*;
