pub mod assessments;
pub mod attendance;
pub mod courses;
pub mod events;
pub mod pages;
pub mod reference;
pub mod scheduling;
pub mod students;
pub mod subjects;
