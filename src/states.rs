//! Two-letter postal code to state name lookup.
//!
//! The table covers the 50 states, the District of Columbia and the `US`
//! national pseudo-state, in English or French.

use std::collections::HashMap;

/// Language used for the full state names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Locale {
    #[default]
    English,
    French,
}

/// `(code, english, french)` for every supported code.
static STATES: &[(&str, &str, &str)] = &[
    ("AL", "Alabama", "Alabama"),
    ("AK", "Alaska", "Alaska"),
    ("AZ", "Arizona", "Arizona"),
    ("AR", "Arkansas", "Arkansas"),
    ("CA", "California", "Californie"),
    ("CO", "Colorado", "Colorado"),
    ("CT", "Connecticut", "Connecticut"),
    ("DE", "Delaware", "Delaware"),
    ("FL", "Florida", "Floride"),
    ("GA", "Georgia", "Géorgie"),
    ("HI", "Hawaii", "Hawaï"),
    ("ID", "Idaho", "Idaho"),
    ("IL", "Illinois", "Illinois"),
    ("IN", "Indiana", "Indiana"),
    ("IA", "Iowa", "Iowa"),
    ("KS", "Kansas", "Kansas"),
    ("KY", "Kentucky", "Kentucky"),
    ("LA", "Louisiana", "Louisiane"),
    ("ME", "Maine", "Maine"),
    ("MD", "Maryland", "Maryland"),
    ("MA", "Massachusetts", "Massachusetts"),
    ("MI", "Michigan", "Michigan"),
    ("MN", "Minnesota", "Minnesota"),
    ("MS", "Mississippi", "Mississippi"),
    ("MO", "Missouri", "Missouri"),
    ("MT", "Montana", "Montana"),
    ("NE", "Nebraska", "Nebraska"),
    ("NV", "Nevada", "Nevada"),
    ("NH", "New Hampshire", "New Hampshire"),
    ("NJ", "New Jersey", "New Jersey"),
    ("NM", "New Mexico", "Nouveau-Mexique"),
    ("NY", "New York", "New York"),
    ("NC", "North Carolina", "Caroline du Nord"),
    ("ND", "North Dakota", "Dakota du Nord"),
    ("OH", "Ohio", "Ohio"),
    ("OK", "Oklahoma", "Oklahoma"),
    ("OR", "Oregon", "Oregon"),
    ("PA", "Pennsylvania", "Pennsylvanie"),
    ("RI", "Rhode Island", "Rhode Island"),
    ("SC", "South Carolina", "Caroline du Sud"),
    ("SD", "South Dakota", "Dakota du Sud"),
    ("TN", "Tennessee", "Tennessee"),
    ("TX", "Texas", "Texas"),
    ("UT", "Utah", "Utah"),
    ("VT", "Vermont", "Vermont"),
    ("VA", "Virginia", "Virginie"),
    ("WA", "Washington", "Washington"),
    ("WV", "West Virginia", "Virginie-Occidentale"),
    ("WI", "Wisconsin", "Wisconsin"),
    ("WY", "Wyoming", "Wyoming"),
    ("DC", "District of Columbia", "District de Columbia"),
    ("US", "United States of America", "États-Unis d'Amérique"),
];

/// Immutable code → name table for one locale.
///
/// Built once per run and handed to the loaders that expand `State` columns.
#[derive(Debug, Clone)]
pub struct StateTable {
    names: HashMap<&'static str, &'static str>,
}

impl StateTable {
    pub fn new(locale: Locale) -> Self {
        let names = STATES
            .iter()
            .map(|&(code, english, french)| {
                let name = match locale {
                    Locale::English => english,
                    Locale::French => french,
                };
                (code, name)
            })
            .collect();

        Self { names }
    }

    /// Returns the full name for `code`, ignoring case and surrounding whitespace.
    pub fn lookup(&self, code: &str) -> Option<&'static str> {
        let code = code.trim().to_ascii_uppercase();
        self.names.get(code.as_str()).copied()
    }
}

impl Default for StateTable {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_states_dc_and_national_entry() {
        let table = StateTable::default();
        assert_eq!(STATES.len(), 52);
        assert_eq!(table.lookup("DC"), Some("District of Columbia"));
        assert_eq!(table.lookup("US"), Some("United States of America"));
    }

    #[test]
    fn test_lookup_english_and_french() {
        assert_eq!(StateTable::new(Locale::English).lookup("CA"), Some("California"));
        assert_eq!(StateTable::new(Locale::French).lookup("CA"), Some("Californie"));
        assert_eq!(
            StateTable::new(Locale::French).lookup("US"),
            Some("États-Unis d'Amérique")
        );
    }

    #[test]
    fn test_lookup_normalizes_case_and_whitespace() {
        let table = StateTable::default();
        assert_eq!(table.lookup(" ny "), Some("New York"));
    }

    #[test]
    fn test_unknown_code_is_none() {
        let table = StateTable::default();
        assert_eq!(table.lookup("PR"), None);
        assert_eq!(table.lookup(""), None);
        assert_eq!(table.lookup("State"), None);
    }

    #[test]
    fn test_every_code_maps_in_both_locales() {
        let english = StateTable::new(Locale::English);
        let french = StateTable::new(Locale::French);
        for (code, _, _) in STATES {
            assert!(english.lookup(code).is_some());
            assert!(french.lookup(code).is_some());
        }
    }
}
