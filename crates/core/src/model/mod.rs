//! Entity model: customers, jobs, boxes and the aggregate that holds them.

mod customer;
mod job;
mod storage_box;
mod system;

pub use customer::Customer;
pub use job::{Job, JobState, PullRecord};
pub use storage_box::StorageBox;
pub use system::SystemData;
