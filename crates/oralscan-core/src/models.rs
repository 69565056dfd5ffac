pub mod bucket;
pub mod confidence;
pub mod patient;
pub mod result;
pub mod suggestion;
