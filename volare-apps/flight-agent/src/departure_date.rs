//!  Volare Flight Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Departure Date Normalization
//!
//! The provider rejects departures in the past, so every requested date is
//! moved to a bookable day before the search is sent.

use chrono::{Days, NaiveDate, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize `date_str` against the current UTC date.
///
/// Returns `YYYY-MM-DD`. Malformed, past and same-day dates become tomorrow.
pub fn normalize_date(date_str: &str) -> String {
    let today = Utc::now().date_naive();
    normalize_date_from(date_str, today)
        .format(DATE_FORMAT)
        .to_string()
}

pub fn normalize_date_from(date_str: &str, today: NaiveDate) -> NaiveDate {
    let tomorrow = today + Days::new(1);
    match NaiveDate::parse_from_str(date_str, DATE_FORMAT) {
        Ok(date) if date > today => date,
        Ok(date) => {
            tracing::debug!("Departure date {} is not in the future, using {}", date, tomorrow);
            tomorrow
        }
        Err(e) => {
            tracing::debug!("Unparseable departure date '{}' ({}), using {}", date_str, e, tomorrow);
            tomorrow
        }
    }
}
