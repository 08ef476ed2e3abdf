use serde::{Deserialize, Serialize};

/// One directory record as stored in the data file.
///
/// Missing fields in the file fall back to their defaults so a single sparse
/// record does not invalidate the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
    pub id: u64,
    pub code: String,
    pub nickname: String,
    pub status: String,
    pub instagram: Option<String>,
    pub discord: Option<String>,
    pub platform: Option<String>,
    // only bulk imports carry a category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// An entry that has not been given an id yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub code: String,
    pub nickname: String,
    pub status: String,
    pub instagram: Option<String>,
    pub discord: Option<String>,
    pub platform: Option<String>,
    pub category: Option<String>,
}

impl NewEntry {
    pub fn with_id(self, id: u64) -> Entry {
        Entry {
            id,
            code: self.code,
            nickname: self.nickname,
            status: self.status,
            instagram: self.instagram,
            discord: self.discord,
            platform: self.platform,
            category: self.category,
        }
    }
}

/// Top-level shape of the data file: `{ "entries": [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct EntryDocument {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Serialize)]
pub struct EntryDocumentRef<'a> {
    pub entries: &'a [Entry],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_insert_entries_omit_category() {
        let entry = NewEntry {
            code: "C1".into(),
            nickname: "Nick".into(),
            status: "ok".into(),
            ..Default::default()
        }
        .with_id(7);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], 7);
        assert!(json["instagram"].is_null());
        assert!(json.get("category").is_none());
    }

    #[test]
    fn sparse_records_read_with_defaults() {
        let doc: EntryDocument =
            serde_json::from_str(r#"{"entries":[{"id":3,"nickname":"x"}]}"#).unwrap();
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].id, 3);
        assert_eq!(doc.entries[0].code, "");
        assert_eq!(doc.entries[0].category, None);
    }

    #[test]
    fn document_without_entries_key_is_empty() {
        let doc: EntryDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.entries.is_empty());
    }
}
