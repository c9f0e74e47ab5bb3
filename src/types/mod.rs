pub mod instrument;
pub mod order_params;
pub mod position;
pub mod price;
pub mod schedule_window;
pub mod time_of_day;
