mod domain_service;
mod record;
mod repository;
mod value_objects;

#[cfg(test)]
mod value_objects_test;

pub use domain_service::CheckInDomainService;
pub use record::CheckInRecord;
pub use repository::{CheckInRepository, CheckInWrite};
pub use value_objects::{CheckInDetails, DayNumber, NOTE_MAX_LEN};
