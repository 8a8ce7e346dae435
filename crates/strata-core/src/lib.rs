//! # Strata Core
//!
//! Foundational market conventions for the Strata curve engine.
//!
//! This crate provides the building blocks every other Strata crate leans on:
//!
//! - **Types**: `Date`, `Period` (tenors such as `3M` or `10Y`), `Frequency`,
//!   `Compounding` and rate/discount-factor conversions
//! - **Day Count Conventions**: ACT/360, ACT/365F, ACT/ACT (ISDA and ICMA), 30/360
//! - **Business Day Calendars**: TARGET, US government bond, US settlement,
//!   UK, weekends-only and null calendars, plus business-day conventions
//! - **Schedules**: coupon date generation (forward and backward)
//!
//! ## Example
//!
//! ```rust
//! use strata_core::prelude::*;
//!
//! let spot = Date::from_ymd(2008, 9, 18).unwrap();
//! let tenor: Period = "6M".parse().unwrap();
//! let calendar = CalendarId::Target.calendar();
//! let maturity = calendar
//!     .advance(spot, tenor, BusinessDayConvention::ModifiedFollowing, false)
//!     .unwrap();
//! assert_eq!(maturity, Date::from_ymd(2009, 3, 18).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::uninlined_format_args)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod schedule;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, CalendarId};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::schedule::{DateGeneration, Schedule, ScheduleBuilder};
    pub use crate::types::{Compounding, Date, Frequency, InterestRate, Period, TimeUnit};
}

pub use error::{CoreError, CoreResult};
pub use types::Date;
