//! Offer/request postings from the `fluxos` table.

use serde::{Deserialize, Serialize};

/// Normalized kind of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostingKind {
    /// Something a member gives (`OFERTA`).
    Offer,
    /// Something a member is looking for (`DEMANDA`).
    Request,
}

impl PostingKind {
    /// Classifies a raw kind field.
    ///
    /// The value is trimmed and uppercased before comparison so that
    /// `" oferta "` and `"OFERTA"` land in the same bucket. Anything else
    /// returns `None` and is left out of both subsets.
    pub fn classify(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "OFERTA" | "OFFER" => Some(Self::Offer),
            "DEMANDA" | "REQUEST" => Some(Self::Request),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Offer => "Offer",
            Self::Request => "Request",
        }
    }
}

/// A single posting row.
///
/// Source: `SELECT * FROM fluxos`
///
/// Columns not listed here are ignored on deserialization, so older table
/// shapes (with `titol`, `preu`, ...) still load.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Posting {
    /// Unique, stable identifier.
    /// Source: `fluxos.id`
    pub id: i64,

    /// Raw kind as stored; see [`PostingKind::classify`].
    /// Source: `fluxos.tipus`
    #[serde(rename = "tipus", default, deserialize_with = "null_as_empty")]
    pub kind: String,

    /// Free-text description written by the author.
    /// Source: `fluxos.descripcio`
    #[serde(rename = "descripcio", default, deserialize_with = "null_as_empty")]
    pub description: String,

    /// Optional category label (e.g. "massatge", "transport").
    /// Source: `fluxos.categoria`
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,

    /// Author handle without the leading `@`.
    /// Source: `fluxos.username`
    #[serde(default)]
    pub username: Option<String>,

    /// Open/closed state written by the bot (e.g. "OBERT").
    /// Source: `fluxos.estat`
    #[serde(rename = "estat", default)]
    pub status: Option<String>,

    /// Whether the posting is still active.
    /// Source: `fluxos.actiu`
    #[serde(rename = "actiu", default)]
    pub active: Option<bool>,

    /// Creation timestamp as returned by the store (RFC 3339).
    /// Source: `fluxos.created_at`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub created_at: String,
}

impl Posting {
    /// Normalized kind, or `None` if the raw field is unrecognized.
    pub fn classify(&self) -> Option<PostingKind> {
        PostingKind::classify(&self.kind)
    }

    /// Category label with surrounding whitespace removed, if non-empty.
    pub fn category_label(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

pub(super) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_trims_and_uppercases() {
        assert_eq!(PostingKind::classify(" oferta "), Some(PostingKind::Offer));
        assert_eq!(PostingKind::classify("Demanda"), Some(PostingKind::Request));
        assert_eq!(PostingKind::classify("OFERTA"), Some(PostingKind::Offer));
        assert_eq!(PostingKind::classify("\tdemanda\n"), Some(PostingKind::Request));
    }

    #[test]
    fn classify_rejects_unknown_kinds() {
        assert_eq!(PostingKind::classify(""), None);
        assert_eq!(PostingKind::classify("tantra"), None);
        assert_eq!(PostingKind::classify("OFERTES"), None);
    }

    #[test]
    fn deserializes_minimal_row() {
        let row = r#"{"id":1,"tipus":" oferta ","descripcio":"X"}"#;
        let posting: Posting = serde_json::from_str(row).unwrap();
        assert_eq!(posting.id, 1);
        assert_eq!(posting.classify(), Some(PostingKind::Offer));
        assert_eq!(posting.description, "X");
        assert!(posting.category.is_none());
        assert!(posting.created_at.is_empty());
    }

    #[test]
    fn deserializes_full_row_and_ignores_extra_columns() {
        let row = r#"{
            "id": 42,
            "tipus": "DEMANDA",
            "descripcio": "Busco transport a Girona",
            "categoria": "transport",
            "username": "anna",
            "estat": "OBERT",
            "actiu": true,
            "telegram_id": "123",
            "preu": 10,
            "created_at": "2026-01-05T10:00:00+00:00"
        }"#;
        let posting: Posting = serde_json::from_str(row).unwrap();
        assert_eq!(posting.classify(), Some(PostingKind::Request));
        assert_eq!(posting.category_label(), Some("transport"));
        assert_eq!(posting.username.as_deref(), Some("anna"));
        assert_eq!(posting.active, Some(true));
        assert_eq!(posting.status.as_deref(), Some("OBERT"));
    }

    #[test]
    fn null_text_columns_become_empty() {
        let row = r#"{"id":3,"tipus":"OFERTA","descripcio":null,"created_at":null}"#;
        let posting: Posting = serde_json::from_str(row).unwrap();
        assert!(posting.description.is_empty());
        assert!(posting.created_at.is_empty());
    }

    #[test]
    fn null_kind_loads_as_unclassified() {
        let row = r#"{"id":4,"tipus":null,"descripcio":"Sense tipus"}"#;
        let posting: Posting = serde_json::from_str(row).unwrap();
        assert!(posting.kind.is_empty());
        assert_eq!(posting.classify(), None);
    }

    #[test]
    fn blank_category_has_no_label() {
        let posting = Posting {
            category: Some("  ".to_string()),
            ..Posting::default()
        };
        assert_eq!(posting.category_label(), None);
    }
}
