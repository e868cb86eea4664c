//! Tool-call decoding and text fallback extraction

pub mod decode;
pub mod fallback;

pub use decode::{decode_record, decode_str, DecodeError};
pub use fallback::{call_id_text, extract_tool_calls, strip_end_of_turn, synthetic_call_id, END_OF_TURN_MARKER};
