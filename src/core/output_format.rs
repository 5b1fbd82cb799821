//! Line formats for the writer backend
//!
//! - Text: `[ts] [LEVEL] message key=value ...`
//! - Json: one JSON object per line
//! - Logfmt: `ts=... level=... msg="..." key=value ...`

use super::fields::FieldValue;
use super::message::Message;
use super::timestamp::TimestampFormat;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Logfmt,
}

impl OutputFormat {
    /// Render `msg` as a single record, without the line terminator
    pub fn format(&self, msg: &Message, timestamp_format: &TimestampFormat, colors: bool) -> String {
        match self {
            OutputFormat::Text => format_text(msg, timestamp_format, colors),
            OutputFormat::Json => format_json(msg, timestamp_format),
            OutputFormat::Logfmt => format_logfmt(msg, timestamp_format),
        }
    }
}

#[cfg(feature = "console")]
fn level_label(msg: &Message, colors: bool) -> String {
    use colored::Colorize;

    let label = format!("{:5}", msg.level);
    if colors {
        label.color(msg.level.color_code()).to_string()
    } else {
        label
    }
}

#[cfg(not(feature = "console"))]
fn level_label(msg: &Message, _colors: bool) -> String {
    format!("{:5}", msg.level)
}

fn format_text(msg: &Message, timestamp_format: &TimestampFormat, colors: bool) -> String {
    let mut out = String::new();

    if let Some(ts) = timestamp_format.format(&msg.timestamp) {
        out.push('[');
        out.push_str(&ts);
        out.push_str("] ");
    }

    out.push('[');
    out.push_str(&level_label(msg, colors));
    out.push_str("] ");
    out.push_str(&msg.message);

    if !msg.fields.is_empty() {
        out.push(' ');
        out.push_str(&msg.fields.format_fields());
    }

    if let Some(ref stack) = msg.stack {
        for frame in stack.frames() {
            out.push_str("\n\t");
            out.push_str(frame.name());
        }
    }

    out
}

fn format_json(msg: &Message, timestamp_format: &TimestampFormat) -> String {
    let mut obj = serde_json::Map::new();

    if let Some(ts) = timestamp_format.to_json_value(&msg.timestamp) {
        obj.insert("timestamp".to_string(), ts);
    }
    obj.insert(
        "level".to_string(),
        serde_json::Value::String(msg.level.to_str().to_string()),
    );
    obj.insert(
        "message".to_string(),
        serde_json::Value::String(msg.message.clone()),
    );

    // Reserved keys above take precedence over same-named fields
    for (key, value) in msg.fields.iter() {
        obj.entry(key.to_string())
            .or_insert_with(|| value.to_json_value());
    }

    if let Some(ref stack) = msg.stack {
        if let Ok(value) = serde_json::to_value(stack.as_ref()) {
            obj.insert("stack".to_string(), value);
        }
    }

    serde_json::Value::Object(obj).to_string()
}

fn format_logfmt(msg: &Message, timestamp_format: &TimestampFormat) -> String {
    let mut parts = Vec::new();

    if let Some(ts) = timestamp_format.format(&msg.timestamp) {
        parts.push(format!("ts={}", escape_logfmt_value(&ts)));
    }
    parts.push(format!("level={}", msg.level.to_str()));
    parts.push(format!("msg={}", quote_logfmt_value(&msg.message)));

    for (key, value) in msg.fields.sorted() {
        let rendered = match value {
            FieldValue::String(s) => escape_logfmt_value(s),
            other => other.to_string(),
        };
        parts.push(format!("{}={}", escape_logfmt_key(key), rendered));
    }

    if let Some(frame) = msg.stack.as_ref().and_then(|stack| stack.top()) {
        parts.push(format!("caller={}", escape_logfmt_value(frame.name())));
    }

    parts.join(" ")
}

fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || *c == '.')
        .collect()
}

fn escape_logfmt_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=', '\n']) {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    format!(
        "\"{}\"",
        value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    )
}
