pub mod multi_send;
pub mod safe;
