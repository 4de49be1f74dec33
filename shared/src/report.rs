//! Crane report datagram codec.
//!
//! Cranes send one ASCII datagram per sample:
//!
//! ```text
//! <id>:<r>:<g>:<b>:<luminance>:<position>
//! ```
//!
//! Exactly six `:`-separated fields. Color channels and the position are
//! floating point; luminance is carried for completeness but nothing
//! downstream reads it.

/// Number of `:`-separated fields in a well-formed report.
pub const REPORT_FIELDS: usize = 6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("empty report")]
    Empty,
    #[error("expected 6 fields, got {0}")]
    FieldCount(usize),
    #[error("field {field} is not a number: {value:?}")]
    Number { field: usize, value: String },
}

/// A decoded crane sample.
#[derive(Debug, Clone, PartialEq)]
pub struct CraneReport {
    pub sender_id: String,
    pub rgb: [f64; 3],
    pub luminance: f64,
    pub position: f64,
}

fn parse_field(fields: &[&str], field: usize) -> Result<f64, ReportError> {
    let raw = fields[field].trim();
    raw.parse::<f64>().map_err(|_| ReportError::Number {
        field,
        value: raw.to_string(),
    })
}

impl CraneReport {
    /// Decode a datagram payload. Trailing NULs and whitespace are ignored.
    pub fn parse(payload: &str) -> Result<Self, ReportError> {
        let payload = payload.trim_end_matches(['\0', '\r', '\n', ' ']);
        // A single stray byte is treated the same as nothing at all.
        if payload.len() <= 1 {
            return Err(ReportError::Empty);
        }

        let fields: Vec<&str> = payload.split(':').collect();
        if fields.len() != REPORT_FIELDS {
            return Err(ReportError::FieldCount(fields.len()));
        }

        Ok(Self {
            sender_id: fields[0].to_string(),
            rgb: [
                parse_field(&fields, 1)?,
                parse_field(&fields, 2)?,
                parse_field(&fields, 3)?,
            ],
            luminance: parse_field(&fields, 4)?,
            position: parse_field(&fields, 5)?,
        })
    }

    /// Decode raw datagram bytes. Non-UTF-8 payloads are rejected as empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReportError> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::parse(text),
            Err(_) => Err(ReportError::Empty),
        }
    }

    /// Encode in the crane firmware's format.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{}:{:.3}:{:.3}",
            self.sender_id,
            self.rgb[0] as i64,
            self.rgb[1] as i64,
            self.rgb[2] as i64,
            self.luminance,
            self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_report() {
        let report = CraneReport::parse("craneA:10:200:30:0:0.5").unwrap();
        assert_eq!(report.sender_id, "craneA");
        assert_eq!(report.rgb, [10.0, 200.0, 30.0]);
        assert_eq!(report.luminance, 0.0);
        assert_eq!(report.position, 0.5);
    }

    #[test]
    fn two_fields_rejected() {
        assert_eq!(
            CraneReport::parse("bad:data"),
            Err(ReportError::FieldCount(2))
        );
    }

    #[test]
    fn seven_fields_rejected() {
        assert_eq!(
            CraneReport::parse("a:1:2:3:4:5:6"),
            Err(ReportError::FieldCount(7))
        );
    }

    #[test]
    fn empty_and_single_byte_rejected() {
        assert_eq!(CraneReport::parse(""), Err(ReportError::Empty));
        assert_eq!(CraneReport::parse("x"), Err(ReportError::Empty));
        assert_eq!(CraneReport::parse("\0\0\0"), Err(ReportError::Empty));
    }

    #[test]
    fn non_numeric_channel_rejected() {
        assert!(matches!(
            CraneReport::parse("a:red:2:3:4:0.5"),
            Err(ReportError::Number { field: 1, .. })
        ));
    }

    #[test]
    fn trailing_nul_padding_ignored() {
        let report = CraneReport::parse("c:1:2:3:0.1:0.25\0\0\0").unwrap();
        assert_eq!(report.position, 0.25);
    }

    #[test]
    fn encode_matches_firmware_format() {
        let report = CraneReport {
            sender_id: "7".to_string(),
            rgb: [255.0, 0.0, 0.0],
            luminance: 0.5,
            position: 0.35,
        };
        assert_eq!(report.encode(), "7:255:0:0:0.500:0.350");
        assert_eq!(CraneReport::parse(&report.encode()).unwrap().position, 0.35);
    }

    #[test]
    fn invalid_utf8_rejected() {
        assert_eq!(
            CraneReport::from_bytes(&[0xff, 0xfe, 0x3a]),
            Err(ReportError::Empty)
        );
    }
}
