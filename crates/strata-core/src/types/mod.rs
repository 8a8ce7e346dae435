//! Domain value types: dates, periods, frequencies and interest rates.

mod compounding;
mod date;
mod frequency;
mod period;

pub use compounding::{Compounding, InterestRate};
pub use date::{days_in_month, is_leap_year, Date};
pub use frequency::Frequency;
pub use period::{Period, TimeUnit};
