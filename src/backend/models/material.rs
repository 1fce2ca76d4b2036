// src/backend/models/material.rs
use crate::error::MaterialError;
use crate::models::common::*;
use candid::CandidType;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle of a material. The score only exists once the material is completed.
///
/// Completions made here always carry a score; `None` only comes from stored
/// records written without one.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq, Copy)]
pub enum Lifecycle {
    Generating,
    Ready,
    Completed { score: Option<Score> },
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::Generating
    }
}

impl Lifecycle {
    pub fn status(&self) -> MaterialStatus {
        match self {
            Lifecycle::Generating => MaterialStatus::Generating,
            Lifecycle::Ready => MaterialStatus::Ready,
            Lifecycle::Completed { .. } => MaterialStatus::Completed,
        }
    }

    pub fn score(&self) -> Option<Score> {
        match self {
            Lifecycle::Completed { score } => *score,
            _ => None,
        }
    }

    /// `generating -> ready`. Any other starting state is rejected.
    pub fn mark_ready(self, id: &str) -> Result<Lifecycle, MaterialError> {
        match self {
            Lifecycle::Generating => Ok(Lifecycle::Ready),
            other => Err(MaterialError::InvalidTransition {
                id: id.to_string(),
                from: other.status(),
                to: MaterialStatus::Ready,
            }),
        }
    }

    /// `ready -> completed`. Completing twice is rejected rather than re-scored.
    pub fn complete(self, id: &str, score: Score) -> Result<Lifecycle, MaterialError> {
        if !is_valid_score(score) {
            return Err(MaterialError::InvalidInput(format!(
                "Score {} outside [{}, {}]",
                score, MIN_SCORE, MAX_SCORE
            )));
        }
        match self {
            Lifecycle::Ready => Ok(Lifecycle::Completed { score: Some(score) }),
            other => Err(MaterialError::InvalidTransition {
                id: id.to_string(),
                from: other.status(),
                to: MaterialStatus::Completed,
            }),
        }
    }
}

/// A learning material as handed to the presentation layer.
#[derive(CandidType, Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Material {
    pub id: MaterialId,
    pub encrypted_data: String, // Placeholder ciphertext handle, never inspected
    pub timestamp: Timestamp,
    pub owner: OwnerId,
    pub difficulty: Difficulty,
    pub lifecycle: Lifecycle,
}

impl Material {
    pub fn status(&self) -> MaterialStatus {
        self.lifecycle.status()
    }

    pub fn score(&self) -> Option<Score> {
        self.lifecycle.score()
    }

    /// Rebuilds a material from its persisted record, applying field defaults.
    ///
    /// Listing is lenient: a missing or zero difficulty becomes 3, any other
    /// out-of-range difficulty is clamped into [1, 5], a missing or empty status
    /// reads as `generating`, and a completed record keeps whatever score it has.
    pub fn from_record(id: &str, record: MaterialRecord) -> Result<Self, MaterialError> {
        let difficulty = match record.difficulty {
            None | Some(0) => DEFAULT_DIFFICULTY,
            Some(d) => {
                let clamped = d.clamp(i64::from(MIN_DIFFICULTY), i64::from(MAX_DIFFICULTY));
                if clamped != d {
                    tracing::warn!("Material {} has difficulty {}, clamped to {}", id, d, clamped);
                }
                clamped as Difficulty
            }
        };

        let lifecycle = match record.status.unwrap_or_default() {
            MaterialStatus::Generating => Lifecycle::Generating,
            MaterialStatus::Ready => Lifecycle::Ready,
            MaterialStatus::Completed => {
                if record.score.is_none() {
                    tracing::warn!("Material {} is completed but carries no score", id);
                }
                Lifecycle::Completed { score: record.score }
            }
        };

        Ok(Material {
            id: id.to_string(),
            encrypted_data: record.data,
            timestamp: record.timestamp,
            owner: record.owner,
            difficulty,
            lifecycle,
        })
    }
}

/// Persisted JSON shape of a record: `{data, timestamp, owner, difficulty, status[, score]}`.
/// Field order here is the byte layout written to the store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MaterialRecord {
    pub data: String,
    pub timestamp: Timestamp,
    pub owner: OwnerId,
    // Wider than `Difficulty` so foreign out-of-range values still decode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_status"
    )]
    pub status: Option<MaterialStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
}

// `null` and `""` both mean "no status".
fn deserialize_status<'de, D>(deserializer: D) -> Result<Option<MaterialStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some("generating") => Ok(Some(MaterialStatus::Generating)),
        Some("ready") => Ok(Some(MaterialStatus::Ready)),
        Some("completed") => Ok(Some(MaterialStatus::Completed)),
        Some(other) => Err(D::Error::unknown_variant(other, &["generating", "ready", "completed"])),
    }
}

impl From<&Material> for MaterialRecord {
    fn from(material: &Material) -> Self {
        MaterialRecord {
            data: material.encrypted_data.clone(),
            timestamp: material.timestamp,
            owner: material.owner.clone(),
            difficulty: Some(i64::from(material.difficulty)),
            status: Some(material.status()),
            score: material.score(),
        }
    }
}

/// Decodes the bytes stored under a record key.
pub fn decode_record(id: &str, bytes: &[u8]) -> Result<Material, MaterialError> {
    if bytes.is_empty() {
        return Err(MaterialError::NotFound(id.to_string()));
    }
    let record: MaterialRecord = serde_json::from_slice(bytes)
        .map_err(|e| MaterialError::ParseError(format!("Material {}: {}", id, e)))?;
    Material::from_record(id, record)
}

/// Encodes a material into the UTF-8 JSON bytes stored under its record key.
pub fn encode_record(material: &Material) -> Result<Vec<u8>, MaterialError> {
    serde_json::to_vec(&MaterialRecord::from(material)).map_err(|e| {
        MaterialError::InternalError(format!("Failed to serialize material {}: {}", material.id, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(lifecycle: Lifecycle) -> Material {
        Material {
            id: "1700000000000-abc1234".to_string(),
            encrypted_data: "FHE-ENCRYPTED-MATERIAL-1700000000000-abc1234".to_string(),
            timestamp: 1_700_000_000,
            owner: "owner-1".to_string(),
            difficulty: 4,
            lifecycle,
        }
    }

    #[test]
    fn encodes_fields_in_persisted_order() {
        let bytes = encode_record(&sample(Lifecycle::Generating)).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"data":"FHE-ENCRYPTED-MATERIAL-1700000000000-abc1234","timestamp":1700000000,"owner":"owner-1","difficulty":4,"status":"generating"}"#
        );
    }

    #[test]
    fn completed_record_appends_score() {
        let bytes = encode_record(&sample(Lifecycle::Completed { score: Some(87) })).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with(r#""difficulty":4,"status":"completed","score":87}"#));
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let material = decode_record("x", br#"{"data":"d","timestamp":5,"owner":"o"}"#).unwrap();
        assert_eq!(material.difficulty, DEFAULT_DIFFICULTY);
        assert_eq!(material.lifecycle, Lifecycle::Generating);

        let zero = decode_record("x", br#"{"data":"d","timestamp":5,"owner":"o","difficulty":0}"#).unwrap();
        assert_eq!(zero.difficulty, DEFAULT_DIFFICULTY);
    }

    #[test]
    fn malformed_records_fail_to_decode() {
        assert!(matches!(decode_record("x", b""), Err(MaterialError::NotFound(_))));
        assert!(matches!(decode_record("x", b"{not json"), Err(MaterialError::ParseError(_))));
        assert!(matches!(
            decode_record("x", br#"{"data":"d","timestamp":5,"owner":"o","status":"archived"}"#),
            Err(MaterialError::ParseError(_))
        ));
    }

    #[test]
    fn completed_record_without_score_is_kept() {
        let material =
            decode_record("x", br#"{"data":"d","timestamp":5,"owner":"o","difficulty":2,"status":"completed"}"#).unwrap();
        assert_eq!(material.lifecycle, Lifecycle::Completed { score: None });
        assert_eq!(material.status(), MaterialStatus::Completed);
        assert_eq!(material.score(), None);
    }

    #[test]
    fn out_of_range_difficulty_is_clamped() {
        let high = decode_record("x", br#"{"data":"d","timestamp":5,"owner":"o","difficulty":7}"#).unwrap();
        assert_eq!(high.difficulty, MAX_DIFFICULTY);
        let negative = decode_record("x", br#"{"data":"d","timestamp":5,"owner":"o","difficulty":-2}"#).unwrap();
        assert_eq!(negative.difficulty, MIN_DIFFICULTY);
    }

    #[test]
    fn empty_or_null_status_reads_as_generating() {
        let empty = decode_record("x", br#"{"data":"d","timestamp":5,"owner":"o","status":""}"#).unwrap();
        assert_eq!(empty.lifecycle, Lifecycle::Generating);
        let null = decode_record("x", br#"{"data":"d","timestamp":5,"owner":"o","status":null}"#).unwrap();
        assert_eq!(null.lifecycle, Lifecycle::Generating);
    }

    #[test]
    fn score_is_dropped_unless_completed() {
        let material =
            decode_record("x", br#"{"data":"d","timestamp":5,"owner":"o","status":"ready","score":70}"#).unwrap();
        assert_eq!(material.lifecycle, Lifecycle::Ready);
        assert_eq!(material.score(), None);
    }

    #[test]
    fn lifecycle_only_moves_forward() {
        let ready = Lifecycle::Generating.mark_ready("m").unwrap();
        assert_eq!(ready, Lifecycle::Ready);
        assert_eq!(ready.complete("m", 75).unwrap(), Lifecycle::Completed { score: Some(75) });

        assert_eq!(
            Lifecycle::Generating.complete("m", 75),
            Err(MaterialError::InvalidTransition {
                id: "m".to_string(),
                from: MaterialStatus::Generating,
                to: MaterialStatus::Completed,
            })
        );
        assert!(matches!(
            Lifecycle::Completed { score: Some(61) }.complete("m", 90),
            Err(MaterialError::InvalidTransition { from: MaterialStatus::Completed, .. })
        ));
        assert!(matches!(
            Lifecycle::Ready.mark_ready("m"),
            Err(MaterialError::InvalidTransition { from: MaterialStatus::Ready, .. })
        ));
        assert!(matches!(Lifecycle::Ready.complete("m", 59), Err(MaterialError::InvalidInput(_))));
    }
}
