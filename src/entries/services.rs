use crate::error::{ApiError, ApiResult};

use super::{
    dto::{CreateEntryRequest, SearchQuery},
    repo_types::{Entry, NewEntry},
};

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Case-insensitive substring test; an empty or missing field never matches.
fn field_matches(field: Option<&str>, needle: &str) -> bool {
    field
        .filter(|f| !f.is_empty())
        .map(|f| f.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

impl SearchQuery {
    /// Every provided, non-blank filter must match.
    pub fn matches(&self, entry: &Entry) -> bool {
        let filters = [
            (self.nickname.as_deref(), Some(entry.nickname.as_str())),
            (self.discord.as_deref(), entry.discord.as_deref()),
            (self.instagram.as_deref(), entry.instagram.as_deref()),
        ];
        filters
            .into_iter()
            .filter_map(|(needle, field)| needle.filter(|n| !n.is_empty()).map(|n| (n, field)))
            .all(|(needle, field)| field_matches(field, needle))
    }
}

pub fn filter_entries(entries: Vec<Entry>, query: &SearchQuery) -> Vec<Entry> {
    entries.into_iter().filter(|e| query.matches(e)).collect()
}

/// Checks required fields and normalizes empty optional handles to `None`.
pub fn new_entry_from_request(req: CreateEntryRequest) -> ApiResult<NewEntry> {
    let (Some(code), Some(nickname), Some(status)) =
        (non_empty(req.code), non_empty(req.nickname), non_empty(req.status))
    else {
        return Err(ApiError::Validation(
            "Code, nickname, and status are required".into(),
        ));
    };

    Ok(NewEntry {
        code,
        nickname,
        status,
        instagram: non_empty(req.instagram),
        discord: non_empty(req.discord),
        platform: non_empty(req.platform),
        category: None,
    })
}

pub fn bulk_message(count: usize) -> String {
    format!("{count} entries added successfully")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, nickname: &str, discord: Option<&str>, instagram: Option<&str>) -> Entry {
        Entry {
            id,
            code: format!("C{id}"),
            nickname: nickname.into(),
            status: "ok".into(),
            instagram: instagram.map(String::from),
            discord: discord.map(String::from),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry(1, "FooBar", Some("bar#1"), None),
            entry(2, "foo", Some("baz#2"), Some("foo.gram")),
            entry(3, "Other", None, Some("BARgram")),
        ]
    }

    fn ids(entries: &[Entry]) -> Vec<u64> {
        entries.iter().map(|e| e.id).collect()
    }

    #[test]
    fn empty_query_returns_everything() {
        assert_eq!(ids(&filter_entries(sample(), &SearchQuery::default())), vec![1, 2, 3]);
        let blank = SearchQuery {
            nickname: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(sample(), &blank)), vec![1, 2, 3]);
    }

    #[test]
    fn nickname_filter_is_case_insensitive_substring() {
        let q = SearchQuery {
            nickname: Some("FOO".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(sample(), &q)), vec![1, 2]);
    }

    #[test]
    fn filters_combine_with_and() {
        let q = SearchQuery {
            nickname: Some("foo".into()),
            discord: Some("BAR".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(sample(), &q)), vec![1]);
    }

    #[test]
    fn null_fields_never_match_a_filter() {
        let q = SearchQuery {
            instagram: Some("gram".into()),
            ..Default::default()
        };
        assert_eq!(ids(&filter_entries(sample(), &q)), vec![2, 3]);
    }

    #[test]
    fn create_requires_code_nickname_status() {
        let missing = CreateEntryRequest {
            code: Some("A".into()),
            nickname: Some("N".into()),
            status: Some(String::new()),
            ..Default::default()
        };
        let err = new_entry_from_request(missing).unwrap_err();
        assert_eq!(err.to_string(), "Code, nickname, and status are required");
    }

    #[test]
    fn create_normalizes_empty_handles() {
        let req = CreateEntryRequest {
            code: Some("A".into()),
            nickname: Some("N".into()),
            status: Some("ok".into()),
            instagram: Some(String::new()),
            discord: Some("d#1".into()),
            platform: None,
        };
        let entry = new_entry_from_request(req).unwrap();
        assert_eq!(entry.instagram, None);
        assert_eq!(entry.discord.as_deref(), Some("d#1"));
        assert_eq!(entry.category, None);
    }

    #[test]
    fn bulk_message_counts() {
        assert_eq!(bulk_message(0), "0 entries added successfully");
        assert_eq!(bulk_message(3), "3 entries added successfully");
    }
}
