//! Electron ASAR archives.
//!
//! An ASAR file starts with a Chromium Pickle holding a JSON directory
//! header. This is a heuristic rather than a registered signature and can be
//! switched off through [`SniffOptions`](super::SniffOptions).

use serde_json::Value;

use super::cursor::Cursor;
use super::kind::FileKind;
use super::signatures::Verdict;

const JSON_SIZE_OFFSET: usize = 12;
const JSON_OFFSET: usize = 16;

pub const ASAR: FileKind = FileKind::new("asar", "application/x-asar");

/// Accept only when the declared header fits in the buffer, parses as JSON
/// and carries a truthy `files` key.
pub fn sniff(data: &[u8]) -> Verdict {
    let cur = Cursor::new(data);
    let Some(json_len) = cur.u32_le(JSON_SIZE_OFFSET) else {
        return Verdict::Pass;
    };
    let Some(header) = cur.bytes(JSON_OFFSET, json_len as usize) else {
        return Verdict::Pass;
    };

    match serde_json::from_slice::<Value>(header) {
        Ok(json) if is_truthy(json.get("files")) => Verdict::Match(ASAR),
        _ => Verdict::Pass,
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(_) => true,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn asar(json: &str) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&4u32.to_le_bytes());
        out.extend_from_slice(&((json.len() + 8) as u32).to_le_bytes());
        out.extend_from_slice(&((json.len() + 4) as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(json.as_bytes());
        out
    }

    #[test]
    fn files_header_matches() {
        let data = asar(r#"{"files":{"index.js":{"size":12,"offset":"0"}}}"#);
        assert_eq!(sniff(&data), Verdict::Match(ASAR));
    }

    #[test]
    fn missing_or_falsy_files_passes() {
        assert_eq!(sniff(&asar(r#"{"dirs":{}}"#)), Verdict::Pass);
        assert_eq!(sniff(&asar(r#"{"files":null}"#)), Verdict::Pass);
        assert_eq!(sniff(&asar(r#"{"files":0}"#)), Verdict::Pass);
        assert_eq!(sniff(&asar("not json")), Verdict::Pass);
    }

    #[test]
    fn header_past_buffer_passes() {
        let mut data = asar(r#"{"files":{}}"#);
        data.truncate(data.len() - 1);
        assert_eq!(sniff(&data), Verdict::Pass);
    }
}
