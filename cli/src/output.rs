//! Rendering command results as tables, CSV or JSON

use anyhow::Result;
use comfy_table::{ContentArrangement, Table};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// One titled table of a report
#[derive(Debug, Clone)]
pub struct Section {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Section {
    pub fn new(title: &str, header: &[&str]) -> Self {
        Section {
            title: title.to_string(),
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }
}

/// A command result: tabular sections plus the raw data for JSON output
pub struct Report {
    pub json: Value,
    pub sections: Vec<Section>,
}

impl Report {
    pub fn print(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&self.json)?),
            OutputFormat::Csv => print!("{}", self.to_csv()),
            OutputFormat::Table => {
                for section in &self.sections {
                    println!("{}", section.title);
                    if section.rows.is_empty() {
                        println!("(no rows)\n");
                        continue;
                    }
                    let mut table = Table::new();
                    table.set_content_arrangement(ContentArrangement::Dynamic);
                    table.set_header(&section.header);
                    for row in &section.rows {
                        table.add_row(row);
                    }
                    println!("{}", table);
                    println!("{} row(s)\n", section.rows.len());
                }
            }
        }
        Ok(())
    }

    /// Sections separated by a blank line, each prefixed by a `# title` line
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("# {}\n", section.title));
            out.push_str(&csv_line(&section.header));
            for row in &section.rows {
                out.push_str(&csv_line(row));
            }
        }
        out
    }
}

fn csv_line(cells: &[String]) -> String {
    let escaped: Vec<String> = cells.iter().map(|cell| format_csv_value(cell)).collect();
    format!("{}\n", escaped.join(","))
}

fn format_csv_value(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Space-separated ids
pub fn join_ids<'a, I>(ids: I) -> String
where
    I: IntoIterator<Item = &'a usize>,
{
    ids.into_iter().map(|id| id.to_string()).collect::<Vec<_>>().join(" ")
}

pub fn fmt_f32(value: f32) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.4}", value)
    }
}
