use console::style;
use serde::Serialize;

use crate::config::RobotFormat;
use crate::error::{Result, SmartbotError};

pub fn emit_json<T: Serialize>(value: &T, format: RobotFormat) -> Result<()> {
    let payload = match format {
        RobotFormat::Json => serde_json::to_string_pretty(value),
        RobotFormat::Jsonl => serde_json::to_string(value),
    }
    .map_err(|err| SmartbotError::Serialization(format!("serialize output: {err}")))?;
    println!("{payload}");
    Ok(())
}

/// Error object printed on stdout in robot mode.
#[must_use]
pub fn robot_error(err: &SmartbotError) -> serde_json::Value {
    serde_json::json!({
        "error": true,
        "code": err.code(),
        "message": err.to_string(),
    })
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 22,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let key_style = style(format!("{key:width$}", width = self.key_width)).dim();
        self.lines.push(format!("{key_style} {value}"));
        self
    }

    /// Key, numeric value and a 20-cell bar for a value in [0, 1].
    pub fn bar(&mut self, key: &str, fraction: f64, value: &str) -> &mut Self {
        const CELLS: usize = 20;
        let filled = (fraction.clamp(0.0, 1.0) * CELLS as f64).round() as usize;
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(CELLS - filled));
        self.kv(key, &format!("{bar} {value}"))
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}
