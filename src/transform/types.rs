//! Data shapes shared by the transformation stages.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Records partitioned by full state name, in map insertion order.
pub type StateGrouped<T> = IndexMap<String, Vec<T>>;

/// Record count per state.
pub type StateCounts = IndexMap<String, usize>;

/// Cumulative totals for one state, years ascending.
pub type YearlyTotals = BTreeMap<i32, MonthlyTotals>;

/// Cumulative totals for every state.
pub type CumulativeTable = IndexMap<String, YearlyTotals>;

/// Calendar months in canonical (not alphabetical) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
            Month::April => "april",
            Month::May => "may",
            Month::June => "june",
            Month::July => "july",
            Month::August => "august",
            Month::September => "september",
            Month::October => "october",
            Month::November => "november",
            Month::December => "december",
        }
    }
}

/// Running totals for the twelve months of one year.
///
/// Field order is the serialization order, so JSON keys come out
/// january through december.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonthlyTotals {
    pub january: u64,
    pub february: u64,
    pub march: u64,
    pub april: u64,
    pub may: u64,
    pub june: u64,
    pub july: u64,
    pub august: u64,
    pub september: u64,
    pub october: u64,
    pub november: u64,
    pub december: u64,
}

impl MonthlyTotals {
    pub fn from_array(values: [u64; 12]) -> Self {
        let [
            january,
            february,
            march,
            april,
            may,
            june,
            july,
            august,
            september,
            october,
            november,
            december,
        ] = values;

        MonthlyTotals {
            january,
            february,
            march,
            april,
            may,
            june,
            july,
            august,
            september,
            october,
            november,
            december,
        }
    }

    pub fn to_array(&self) -> [u64; 12] {
        [
            self.january,
            self.february,
            self.march,
            self.april,
            self.may,
            self.june,
            self.july,
            self.august,
            self.september,
            self.october,
            self.november,
            self.december,
        ]
    }

    pub fn get(&self, month: Month) -> u64 {
        self.to_array()[month.index()]
    }

    /// `(month, total)` pairs in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (Month, u64)> {
        Month::ALL.into_iter().zip(self.to_array())
    }
}
