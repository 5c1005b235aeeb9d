//! Rendering decode results as tables, JSON or CSV

use colored::Colorize;
use esam_protocol::display::outcome_message;
use esam_protocol::{DecodeOutcome, ResultField};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::settings::{OutputFormat, Settings, TableStyle};

/// One input frame and what decoding made of it
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame: String,
    pub outcome: DecodeOutcome,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "原始数据")]
    origin: String,
    #[tabled(rename = "解析值")]
    analyzed: String,
    #[tabled(rename = "含义")]
    meaning: String,
    #[tabled(rename = "详细说明")]
    details: String,
}

#[derive(Tabled)]
struct BriefRow {
    #[tabled(rename = "原始数据")]
    origin: String,
    #[tabled(rename = "解析值")]
    analyzed: String,
    #[tabled(rename = "含义")]
    meaning: String,
}

#[derive(Tabled)]
struct KeyRow {
    #[tabled(rename = "键")]
    key: String,
    #[tabled(rename = "主功能")]
    function: String,
    #[tabled(rename = "命令")]
    command: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    frame: &'a str,
    outcome: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [ResultField]>,
}

/// Output options resolved from settings and command-line flags
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub format: OutputFormat,
    pub style: TableStyle,
    pub show_details: bool,
}

impl Renderer {
    /// Settings, overridden by whatever flags were given
    pub fn new(settings: &Settings, format: Option<OutputFormat>, no_details: bool) -> Self {
        Self {
            format: format.unwrap_or(settings.format),
            style: settings.table_style,
            show_details: settings.show_details && !no_details,
        }
    }

    /// Render every report in the configured format
    pub fn render(&self, reports: &[FrameReport]) -> anyhow::Result<String> {
        match self.format {
            OutputFormat::Table => Ok(self.render_tables(reports)),
            OutputFormat::Json => render_json(reports),
            OutputFormat::Csv => self.render_csv(reports),
        }
    }

    fn render_tables(&self, reports: &[FrameReport]) -> String {
        let mut out = String::new();
        for report in reports {
            let message = outcome_message(&report.outcome);
            let message = if report.outcome.is_complete() {
                message.green()
            } else {
                message.red()
            };
            out.push_str(&format!("{}  {}\n", report.frame.bold(), message));

            if let Some(fields) = report.outcome.fields() {
                out.push_str(&self.fields_table(fields));
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    fn fields_table(&self, fields: &[ResultField]) -> String {
        if self.show_details {
            let rows = fields.iter().map(|f| FieldRow {
                origin: f.origin.clone(),
                analyzed: f.analyzed.clone(),
                meaning: f.meaning.clone(),
                details: f.meaning_details.clone(),
            });
            styled_table(rows, self.style)
        } else {
            let rows = fields.iter().map(|f| BriefRow {
                origin: f.origin.clone(),
                analyzed: f.analyzed.clone(),
                meaning: f.meaning.clone(),
            });
            styled_table(rows, self.style)
        }
    }

    fn render_csv(&self, reports: &[FrameReport]) -> anyhow::Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut heading = vec!["frame", "outcome", "origin", "analyzed", "meaning"];
        if self.show_details {
            heading.push("meaning_details");
        }
        writer.write_record(&heading)?;

        for report in reports {
            let name = report.outcome.name();
            match report.outcome.fields() {
                Some(fields) => {
                    for field in fields {
                        let mut record = vec![
                            report.frame.as_str(),
                            name,
                            field.origin.as_str(),
                            field.analyzed.as_str(),
                            field.meaning.as_str(),
                        ];
                        if self.show_details {
                            record.push(field.meaning_details.as_str());
                        }
                        writer.write_record(&record)?;
                    }
                }
                None => {
                    let mut record = vec![report.frame.as_str(), name, "", "", ""];
                    if self.show_details {
                        record.push("");
                    }
                    writer.write_record(&record)?;
                }
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
        Ok(String::from_utf8(bytes)?)
    }
}

fn render_json(reports: &[FrameReport]) -> anyhow::Result<String> {
    let reports: Vec<JsonReport<'_>> = reports
        .iter()
        .map(|r| JsonReport {
            frame: &r.frame,
            outcome: r.outcome.name(),
            message: outcome_message(&r.outcome),
            fields: r.outcome.fields(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&reports)? + "\n")
}

/// Registry keys with the function and command they decode
pub fn render_keys(keys: &[u16], style: TableStyle) -> String {
    let rows = keys.iter().map(|&key| {
        let f = (key >> 8) as u8;
        let code = key as u8;
        KeyRow {
            key: format!("{:04X}", key),
            function: esam_protocol::meaning::main_function(f).to_string(),
            command: esam_protocol::meaning::command(f, code).label(),
        }
    });
    styled_table(rows, style)
}

fn styled_table<T: Tabled>(rows: impl IntoIterator<Item = T>, style: TableStyle) -> String {
    let mut table = Table::new(rows);
    match style {
        TableStyle::Modern => table.with(Style::modern()),
        TableStyle::Ascii => table.with(Style::ascii()),
        TableStyle::Markdown => table.with(Style::markdown()),
    };
    table.to_string()
}
