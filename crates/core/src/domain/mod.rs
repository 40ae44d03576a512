pub mod category;
pub mod rate;
pub mod reservation;
