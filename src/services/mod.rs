pub mod openweather;
pub mod query;
