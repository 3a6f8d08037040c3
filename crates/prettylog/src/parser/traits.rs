pub use super::model::{LogFormat, ParseError, StructuredEvent};
pub use super::classify::{FieldCandidates, FieldValue};

pub trait LogParser: Send + Sync {
    /// parse a raw payload into a structured event
    fn parse(&self, raw: &[u8], candidates: FieldCandidates<'_>) -> Result<StructuredEvent, ParseError>;
    /// renderer-state family of the events this parser produces
    fn format(&self) -> LogFormat;
}
