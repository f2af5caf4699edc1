pub mod history;
pub mod markup;

pub use history::History;

pub mod eval {
    use serde::{Deserialize, Serialize};
    use thiserror::Error;

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct StatementRequest {
        pub session: String,
        pub highlight: bool,
        pub code: String,
    }

    /// Wire form of a statement request; `highlight` travels as `1`/`0`.
    #[derive(Clone, Debug, Serialize)]
    pub struct StatementForm<'a> {
        pub session: &'a str,
        pub highlight: u8,
        pub code: &'a str,
    }

    impl StatementRequest {
        pub fn form(&self) -> StatementForm<'_> {
            StatementForm {
                session: &self.session,
                highlight: u8::from(self.highlight),
                code: &self.code,
            }
        }
    }

    #[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
    pub struct StatementReply {
        /// The statement as the server processed it, possibly marked up.
        #[serde(rename = "in", default)]
        pub input: String,
        #[serde(rename = "out", default)]
        pub output: String,
        /// True when the server is waiting for more lines of the statement.
        #[serde(rename = "result", default, deserialize_with = "loose_bool")]
        pub continuing: bool,
    }

    #[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
    pub struct BannerReply {
        #[serde(default)]
        pub banner: String,
    }

    fn loose_bool<'de, D>(d: D) -> Result<bool, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(d)?;
        Ok(match v {
            serde_json::Value::Bool(b) => b,
            serde_json::Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            serde_json::Value::String(s) => !s.is_empty() && s != "0" && s != "false",
            _ => false,
        })
    }

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum TransportError {
        #[error("timeout: {0}")]
        Timeout(String),
        #[error("error: {0}")]
        Error(String),
        #[error("notmodified")]
        NotModified,
        #[error("parseerror: {0}")]
        ParseError(String),
    }

    /// Server-side statement evaluator.
    #[allow(async_fn_in_trait)]
    pub trait Evaluator: Send + Sync {
        async fn statement(&self, req: &StatementRequest) -> Result<StatementReply, TransportError>;
        async fn banner(&self) -> Result<BannerReply, TransportError>;
    }
}

#[cfg(test)]
mod tests {
    use super::eval::*;

    #[test]
    fn statement_reply_uses_wire_names() {
        let r: StatementReply =
            serde_json::from_str(r#"{"in":"x = 1","out":"","result":false}"#).unwrap();
        assert_eq!(r.input, "x = 1");
        assert_eq!(r.output, "");
        assert!(!r.continuing);
    }

    #[test]
    fn continuing_flag_accepts_loose_values() {
        for (raw, want) in [("true", true), ("1", true), ("0", false), ("null", false), (r#""1""#, true)] {
            let body = format!(r#"{{"in":"","out":"","result":{}}}"#, raw);
            let r: StatementReply = serde_json::from_str(&body).unwrap();
            assert_eq!(r.continuing, want, "result={}", raw);
        }
    }

    #[test]
    fn missing_fields_default() {
        let r: StatementReply = serde_json::from_str("{}").unwrap();
        assert!(!r.continuing);
        let b: BannerReply = serde_json::from_str("{}").unwrap();
        assert_eq!(b.banner, "");
    }

    #[test]
    fn form_encodes_highlight_as_digit() {
        let req = StatementRequest {
            session: "s1".into(),
            highlight: true,
            code: "print 1".into(),
        };
        let f = req.form();
        assert_eq!(f.highlight, 1);
        assert_eq!(f.session, "s1");
        assert_eq!(f.code, "print 1");
    }
}
