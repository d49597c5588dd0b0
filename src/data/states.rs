//! U.S. state name and abbreviation table

/// Full state names paired with their postal abbreviations
const US_STATES: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
    ("District of Columbia", "DC"),
];

/// Immutable name/abbreviation mapping handed to the components that need it
#[derive(Debug, Clone, Copy)]
pub struct StateTable {
    entries: &'static [(&'static str, &'static str)],
}

impl StateTable {
    /// The 50 states plus the District of Columbia
    pub const US: StateTable = StateTable { entries: US_STATES };

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts a state name to its abbreviation.
    ///
    /// Empty input stays empty. Input of at most three characters that is
    /// already uppercase is treated as an abbreviation and returned as is.
    /// Names must match the table exactly; anything else is returned
    /// unchanged.
    pub fn to_abbreviation(&self, name_or_abbr: &str) -> String {
        if name_or_abbr.is_empty() {
            return String::new();
        }
        if name_or_abbr.chars().count() <= 3 && name_or_abbr.to_uppercase() == name_or_abbr {
            return name_or_abbr.to_string();
        }
        self.entries
            .iter()
            .find(|(name, _)| *name == name_or_abbr)
            .map(|(_, abbr)| (*abbr).to_string())
            .unwrap_or_else(|| name_or_abbr.to_string())
    }

    /// Name lookup ignoring case, for comparisons only
    fn abbreviate_any_case(&self, name_or_abbr: &str) -> String {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(name_or_abbr))
            .map(|(_, abbr)| (*abbr).to_string())
            .unwrap_or_else(|| name_or_abbr.to_string())
    }

    /// Whether two state strings refer to the same state, in any mix of
    /// full names and abbreviations, ignoring case
    pub fn same_state(&self, a: &str, b: &str) -> bool {
        if a.eq_ignore_ascii_case(b) {
            return true;
        }
        let a_abbr = self.abbreviate_any_case(a);
        let b_abbr = self.abbreviate_any_case(b);
        !a_abbr.is_empty() && a_abbr.eq_ignore_ascii_case(&b_abbr)
    }
}
