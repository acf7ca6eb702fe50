//! Drag payload codec and the per-gesture payload slot.
//!
//! A payload is encoded in two transfer representations at drag-start: a
//! structured JSON form under [`DRAG_DATA_KEY`], and a `"{type}:{id}"`
//! plain-text fallback for transfer channels that strip rich payloads
//! (cross-frame drags). Some drag sequences additionally refuse to expose
//! *any* transfer data before the drop, so [`DragSession`] mirrors the
//! payload outside the transfer channel for the lifetime of one gesture.

use crate::types::DragPayload;
use serde_json::Value;

/// Transfer key for the structured payload form.
pub const DRAG_DATA_KEY: &str = "application/x-loopbox-payload";

/// Both transfer representations of one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    /// JSON for the [`DRAG_DATA_KEY`] channel.
    pub structured: String,
    /// `"{type}:{id}"` for the plain-text channel.
    pub text: String,
}

/// Encode a payload into both transfer representations.
pub fn encode_payload(payload: &DragPayload) -> EncodedPayload {
    let structured =
        serde_json::to_string(payload).expect("drag payload serialization is infallible");
    let text = match payload {
        DragPayload::MusicVersion { id } => format!("music-version:{id}"),
        DragPayload::ImageVersion { id } => format!("image-version:{id}"),
        DragPayload::MusicSegment { index } => format!("music-segment:{index}"),
        DragPayload::ImageGroup { index } => format!("image-group:{index}"),
    };
    EncodedPayload { structured, text }
}

/// Decode transfer data back into a payload.
///
/// The structured form wins when it parses and normalizes; otherwise the
/// plain-text form is split on the first `:`. Malformed JSON, unknown type
/// tags, empty fields, and non-integer indices all decode to `None` —
/// callers treat `None` as "ignore this drop", never as a failure.
pub fn decode_payload(structured: Option<&str>, text: Option<&str>) -> Option<DragPayload> {
    if let Some(raw) = structured {
        if let Ok(value) = serde_json::from_str::<Value>(raw) {
            if let Some(payload) = normalize(&value) {
                return Some(payload);
            }
        }
    }
    let raw = text?;
    let (kind, rest) = raw.split_once(':')?;
    from_parts(kind, rest)
}

/// Map a raw decoded JSON value onto the known payload variants.
///
/// Index fields accept either an integer or a numeric string; older
/// encoders emitted the latter.
fn normalize(value: &Value) -> Option<DragPayload> {
    let kind = value.get("type")?.as_str()?;
    match kind {
        "music-version" | "image-version" => {
            let id = value.get("id")?.as_str()?;
            build_version(kind, id)
        }
        "music-segment" | "image-group" => {
            let index = value.get("index").and_then(index_value)?;
            build_indexed(kind, index)
        }
        _ => None,
    }
}

fn from_parts(kind: &str, rest: &str) -> Option<DragPayload> {
    match kind {
        "music-version" | "image-version" => build_version(kind, rest),
        "music-segment" | "image-group" => build_indexed(kind, rest.trim().parse().ok()?),
        _ => None,
    }
}

fn build_version(kind: &str, id: &str) -> Option<DragPayload> {
    if id.is_empty() {
        return None;
    }
    match kind {
        "music-version" => Some(DragPayload::MusicVersion { id: id.to_string() }),
        "image-version" => Some(DragPayload::ImageVersion { id: id.to_string() }),
        _ => None,
    }
}

fn build_indexed(kind: &str, index: usize) -> Option<DragPayload> {
    match kind {
        "music-segment" => Some(DragPayload::MusicSegment { index }),
        "image-group" => Some(DragPayload::ImageGroup { index }),
        _ => None,
    }
}

fn index_value(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return Some(n as usize);
    }
    value.as_str()?.trim().parse().ok()
}

// ---------------------------------------------------------------------------
// DragSession
// ---------------------------------------------------------------------------

/// The payload slot for one drag gesture.
///
/// Constructed by the owner of the drag handlers and threaded through them
/// explicitly; it is the only mutable state shared across a gesture.
/// Every way a gesture can finish — drop, cancel, window blur — must call
/// [`DragSession::end`], otherwise a stale payload leaks into the next
/// unrelated drag.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    active: Option<DragPayload>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the payload for the gesture that just started and hand back
    /// the transfer representations to feed the native channel.
    pub fn begin(&mut self, payload: DragPayload) -> EncodedPayload {
        let encoded = encode_payload(&payload);
        self.active = Some(payload);
        encoded
    }

    /// The payload of the gesture in flight, if any.
    pub fn active(&self) -> Option<&DragPayload> {
        self.active.as_ref()
    }

    /// Decode transfer data, falling back to the session slot when the
    /// transfer channel delivered nothing usable (some drag sequences only
    /// expose data at drop, not during drag-over).
    pub fn resolve(&self, structured: Option<&str>, text: Option<&str>) -> Option<DragPayload> {
        decode_payload(structured, text).or_else(|| self.active.clone())
    }

    /// Clear the slot. Required on drag-end, drop, and window blur alike.
    pub fn end(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // encode / decode round-trips
    // -----------------------------------------------------------------------

    #[test]
    fn structured_roundtrip() {
        let payload = DragPayload::MusicVersion { id: "mv-1".into() };
        let encoded = encode_payload(&payload);
        let decoded = decode_payload(Some(&encoded.structured), None).unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn text_fallback_roundtrip() {
        let decoded = decode_payload(None, Some("image-version:iv-2")).unwrap();
        assert_eq!(decoded, DragPayload::ImageVersion { id: "iv-2".into() });
    }

    #[test]
    fn indexed_variants_roundtrip() {
        for payload in [
            DragPayload::MusicSegment { index: 3 },
            DragPayload::ImageGroup { index: 0 },
        ] {
            let encoded = encode_payload(&payload);
            assert_eq!(
                decode_payload(Some(&encoded.structured), None).unwrap(),
                payload
            );
            assert_eq!(decode_payload(None, Some(&encoded.text)).unwrap(), payload);
        }
    }

    #[test]
    fn structured_wins_over_text() {
        let structured = encode_payload(&DragPayload::MusicSegment { index: 1 }).structured;
        let decoded = decode_payload(Some(&structured), Some("image-version:iv-9")).unwrap();
        assert_eq!(decoded, DragPayload::MusicSegment { index: 1 });
    }

    #[test]
    fn malformed_structured_falls_back_to_text() {
        let decoded = decode_payload(Some("{not json"), Some("music-version:mv-7")).unwrap();
        assert_eq!(decoded, DragPayload::MusicVersion { id: "mv-7".into() });
    }

    // -----------------------------------------------------------------------
    // rejection paths
    // -----------------------------------------------------------------------

    #[test]
    fn malformed_structured_alone_is_none() {
        assert_eq!(decode_payload(Some("{not json"), None), None);
    }

    #[test]
    fn unknown_type_tag_is_none() {
        assert_eq!(
            decode_payload(Some(r#"{"type":"video-track","id":"x"}"#), None),
            None
        );
        assert_eq!(decode_payload(None, Some("video-track:x")), None);
    }

    #[test]
    fn empty_fields_are_none() {
        assert_eq!(decode_payload(None, Some("music-version:")), None);
        assert_eq!(decode_payload(None, Some(":mv-1")), None);
        assert_eq!(
            decode_payload(Some(r#"{"type":"music-version","id":""}"#), None),
            None
        );
    }

    #[test]
    fn missing_required_field_is_none() {
        assert_eq!(
            decode_payload(Some(r#"{"type":"music-version"}"#), None),
            None
        );
        assert_eq!(
            decode_payload(Some(r#"{"type":"music-segment"}"#), None),
            None
        );
    }

    #[test]
    fn non_integer_index_is_none() {
        assert_eq!(decode_payload(None, Some("music-segment:abc")), None);
        assert_eq!(
            decode_payload(Some(r#"{"type":"image-group","index":-2}"#), None),
            None
        );
    }

    #[test]
    fn numeric_string_index_is_accepted() {
        let decoded =
            decode_payload(Some(r#"{"type":"music-segment","index":"4"}"#), None).unwrap();
        assert_eq!(decoded, DragPayload::MusicSegment { index: 4 });
    }

    #[test]
    fn id_containing_colons_survives_text_form() {
        let decoded = decode_payload(None, Some("music-version:urn:mv:1")).unwrap();
        assert_eq!(
            decoded,
            DragPayload::MusicVersion {
                id: "urn:mv:1".into()
            }
        );
    }

    #[test]
    fn nothing_to_decode_is_none() {
        assert_eq!(decode_payload(None, None), None);
    }

    // -----------------------------------------------------------------------
    // DragSession
    // -----------------------------------------------------------------------

    #[test]
    fn session_slot_fallback() {
        let mut session = DragSession::new();
        let payload = DragPayload::ImageGroup { index: 2 };
        session.begin(payload.clone());

        // Transfer channel delivered nothing during drag-over: slot wins.
        assert_eq!(session.resolve(None, None), Some(payload.clone()));
        // Transfer data, when present, still takes precedence.
        assert_eq!(
            session.resolve(None, Some("music-version:mv-1")),
            Some(DragPayload::MusicVersion { id: "mv-1".into() })
        );

        session.end();
        assert_eq!(session.resolve(None, None), None);
        assert!(session.active().is_none());
    }

    #[test]
    fn begin_returns_transfer_forms() {
        let mut session = DragSession::new();
        let encoded = session.begin(DragPayload::MusicVersion { id: "mv-3".into() });
        assert_eq!(encoded.text, "music-version:mv-3");
        assert!(encoded.structured.contains("music-version"));
        assert_eq!(
            session.active(),
            Some(&DragPayload::MusicVersion { id: "mv-3".into() })
        );
    }

    #[test]
    fn new_gesture_replaces_stale_payload() {
        let mut session = DragSession::new();
        session.begin(DragPayload::MusicSegment { index: 0 });
        session.begin(DragPayload::ImageGroup { index: 5 });
        assert_eq!(
            session.active(),
            Some(&DragPayload::ImageGroup { index: 5 })
        );
    }
}
