//! Static US state reference table.
//!
//! Keys follow the climate-division dataset's own state numbering, which is
//! not the Census FIPS numbering (Alaska is `50`, Hawaii `51`).

use std::collections::HashMap;
use std::sync::OnceLock;

/// `(fips2, code2, name)` for the 50 states.
pub static STATE_FIPS: &[(&str, &str, &str)] = &[
    ("01", "AL", "Alabama"),
    ("02", "AZ", "Arizona"),
    ("03", "AR", "Arkansas"),
    ("04", "CA", "California"),
    ("05", "CO", "Colorado"),
    ("06", "CT", "Connecticut"),
    ("07", "DE", "Delaware"),
    ("08", "FL", "Florida"),
    ("09", "GA", "Georgia"),
    ("10", "ID", "Idaho"),
    ("11", "IL", "Illinois"),
    ("12", "IN", "Indiana"),
    ("13", "IA", "Iowa"),
    ("14", "KS", "Kansas"),
    ("15", "KY", "Kentucky"),
    ("16", "LA", "Louisiana"),
    ("17", "ME", "Maine"),
    ("18", "MD", "Maryland"),
    ("19", "MA", "Massachusetts"),
    ("20", "MI", "Michigan"),
    ("21", "MN", "Minnesota"),
    ("22", "MS", "Mississippi"),
    ("23", "MO", "Missouri"),
    ("24", "MT", "Montana"),
    ("25", "NE", "Nebraska"),
    ("26", "NV", "Nevada"),
    ("27", "NH", "New Hampshire"),
    ("28", "NJ", "New Jersey"),
    ("29", "NM", "New Mexico"),
    ("30", "NY", "New York"),
    ("31", "NC", "North Carolina"),
    ("32", "ND", "North Dakota"),
    ("33", "OH", "Ohio"),
    ("34", "OK", "Oklahoma"),
    ("35", "OR", "Oregon"),
    ("36", "PA", "Pennsylvania"),
    ("37", "RI", "Rhode Island"),
    ("38", "SC", "South Carolina"),
    ("39", "SD", "South Dakota"),
    ("40", "TN", "Tennessee"),
    ("41", "TX", "Texas"),
    ("42", "UT", "Utah"),
    ("43", "VT", "Vermont"),
    ("44", "VA", "Virginia"),
    ("45", "WA", "Washington"),
    ("46", "WV", "West Virginia"),
    ("47", "WI", "Wisconsin"),
    ("48", "WY", "Wyoming"),
    ("50", "AK", "Alaska"),
    ("51", "HI", "Hawaii"),
];

/// Two-letter code of the state synthesized when the climate file lacks it.
pub const HAWAII: &str = "HI";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRef {
    pub fips2: &'static str,
    pub code2: &'static str,
    pub name: &'static str,
}

/// Lookup table indexed both by 2-digit FIPS and by 2-letter code.
pub struct StateTable {
    entries: Vec<StateRef>,
    by_fips: HashMap<&'static str, usize>,
    by_code: HashMap<&'static str, usize>,
}

impl StateTable {
    fn build() -> Self {
        let entries: Vec<StateRef> = STATE_FIPS
            .iter()
            .map(|&(fips2, code2, name)| StateRef { fips2, code2, name })
            .collect();

        let by_fips = entries
            .iter()
            .enumerate()
            .map(|(i, s)| (s.fips2, i))
            .collect();
        let by_code = entries
            .iter()
            .enumerate()
            .map(|(i, s)| (s.code2, i))
            .collect();

        Self {
            entries,
            by_fips,
            by_code,
        }
    }

    /// Process-wide table, built on first use.
    pub fn global() -> &'static StateTable {
        static TABLE: OnceLock<StateTable> = OnceLock::new();
        TABLE.get_or_init(StateTable::build)
    }

    pub fn by_fips(&self, fips2: &str) -> Option<&StateRef> {
        self.by_fips.get(fips2).map(|&i| &self.entries[i])
    }

    pub fn by_code(&self, code2: &str) -> Option<&StateRef> {
        self.by_code.get(code2).map(|&i| &self.entries[i])
    }

    pub fn name_for(&self, code2: &str) -> Option<&'static str> {
        self.by_code(code2).map(|s| s.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateRef> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Converts the climate file's 3-digit state number to the table's 2-digit key.
///
/// Leading zeros are stripped and the result is left-padded back to two
/// digits, so `"001"` becomes `"01"` and `"110"` stays `"110"` (and later
/// fails to resolve).
pub fn normalize_fips3(fips3: &str) -> String {
    format!("{:0>2}", fips3.trim_start_matches('0'))
}

/// Canonical form for 2-letter codes read from CSV sources.
pub fn normalize_state_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_fifty_states() {
        let table = StateTable::global();
        assert_eq!(table.len(), 50);
    }

    #[test]
    fn test_fips_maps_to_exactly_one_code() {
        let table = StateTable::global();
        for s in table.iter() {
            assert_eq!(table.by_fips(s.fips2), Some(s));
            assert_eq!(table.by_code(s.code2), Some(s));
        }
    }

    #[test]
    fn test_lookup_both_directions() {
        let table = StateTable::global();
        assert_eq!(table.by_fips("04").map(|s| s.code2), Some("CA"));
        assert_eq!(table.by_fips("51").map(|s| s.code2), Some("HI"));
        assert_eq!(table.name_for("TX"), Some("Texas"));
    }

    #[test]
    fn test_unknown_keys_return_none() {
        let table = StateTable::global();
        assert!(table.by_fips("49").is_none());
        assert!(table.by_fips("").is_none());
        assert!(table.by_code("DC").is_none());
        assert!(table.name_for("PR").is_none());
    }

    #[test]
    fn test_normalize_fips3() {
        assert_eq!(normalize_fips3("001"), "01");
        assert_eq!(normalize_fips3("041"), "41");
        assert_eq!(normalize_fips3("050"), "50");
        assert_eq!(normalize_fips3("000"), "00");
        assert_eq!(normalize_fips3("110"), "110");
    }

    #[test]
    fn test_normalize_state_code() {
        assert_eq!(normalize_state_code(" ca "), "CA");
        assert_eq!(normalize_state_code("TX"), "TX");
    }
}
