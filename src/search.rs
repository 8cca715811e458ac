//! Case-insensitive substring search over table rows.
//!
//! Row types opt in through [`Searchable`] by declaring which fields are
//! indexable. Searching "everything" is an explicit [`SearchScope`] rather
//! than runtime inspection of the row.

use std::borrow::Cow;

use crate::record::ContentRecord;

/// A row type that can be searched by field name.
pub trait Searchable {
    /// Names of every field that may be searched.
    const INDEXED_FIELDS: &'static [&'static str];

    /// Text of one indexed field, or `None` if the field is empty or unknown.
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>>;
}

/// Which fields a search looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchScope {
    /// Every field in [`Searchable::INDEXED_FIELDS`].
    #[default]
    AllIndexed,
    /// Only the named fields; names the row does not index never match.
    Fields(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct TableSearch {
    term: String,
    scope: SearchScope,
}

impl TableSearch {
    pub fn new(scope: SearchScope) -> Self {
        Self {
            term: String::new(),
            scope,
        }
    }

    pub fn over_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(SearchScope::Fields(fields.into_iter().map(Into::into).collect()))
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    pub fn clear(&mut self) {
        self.term.clear();
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches<T: Searchable>(&self, row: &T) -> bool {
        let needle = self.term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |field: &str| {
            row.field_text(field)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        };
        match &self.scope {
            SearchScope::AllIndexed => T::INDEXED_FIELDS.iter().any(|f| hit(f)),
            SearchScope::Fields(fields) => fields.iter().any(|f| hit(f)),
        }
    }

    /// Rows matching the current term, in input order. A blank term keeps
    /// every row.
    pub fn filter<'a, T: Searchable>(&self, rows: &'a [T]) -> Vec<&'a T> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }
}

fn non_empty(value: &str) -> Option<Cow<'_, str>> {
    (!value.is_empty()).then_some(Cow::Borrowed(value))
}

impl Searchable for ContentRecord {
    const INDEXED_FIELDS: &'static [&'static str] =
        &["title", "datetime", "location", "speaker", "desc"];

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        let value = match field {
            "title" => self.title.as_str(),
            "datetime" => self.datetime.as_deref()?,
            "location" => self.location.as_deref()?,
            "speaker" => self.speaker.as_deref()?,
            "desc" => self.description.as_deref()?,
            "qr" => self.qr_payload.as_deref()?,
            _ => return None,
        };
        non_empty(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ContentRecord> {
        vec![
            ContentRecord::new("Gottesdienst").with_location("Saal 1"),
            ContentRecord::new("Jugendabend").with_speaker("Anna Saalfeld"),
            ContentRecord::new("Konzert").with_qr_payload("https://saal.example"),
        ]
    }

    #[test]
    fn blank_term_keeps_all_rows() {
        let rows = records();
        let mut search = TableSearch::default();
        search.set_term("   ");
        assert_eq!(search.filter(&rows).len(), 3);
    }

    #[test]
    fn all_indexed_is_case_insensitive() {
        let rows = records();
        let mut search = TableSearch::default();
        search.set_term(" SAAL ");
        let titles: Vec<&str> = search.filter(&rows).iter().map(|r| r.title.as_str()).collect();
        // The QR payload is not indexed.
        assert_eq!(titles, ["Gottesdienst", "Jugendabend"]);
    }

    #[test]
    fn explicit_fields_restrict_the_search() {
        let rows = records();
        let mut search = TableSearch::over_fields(["location", "qr"]);
        search.set_term("saal");
        let titles: Vec<&str> = search.filter(&rows).iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Gottesdienst", "Konzert"]);

        search.clear();
        assert_eq!(search.term(), "");
        assert_eq!(search.filter(&rows).len(), 3);
    }

    #[test]
    fn unknown_fields_never_match() {
        let rows = records();
        let mut search = TableSearch::over_fields(["colour"]);
        search.set_term("a");
        assert!(search.filter(&rows).is_empty());
    }
}
