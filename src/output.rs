// src/output.rs
use crate::types::{OsintError, OutputConfig, OutputFormat, ProbeStatus, SearchReport};
use crate::utils::html_escape;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const STYLE: &str = "body{font-family:sans-serif;max-width:900px;margin:2em auto}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #ccc;padding:.4em;text-align:left}\
.success{color:#1a7f37}.warning{color:#9a6700}.error{color:#cf222e}.info{color:#0969da}";

pub struct OutputManager {
    config: OutputConfig,
}

impl OutputManager {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Write all reports in one go, to the configured file or stdout.
    pub fn write_reports(&self, reports: &[SearchReport]) -> Result<(), OsintError> {
        if let Some(file_path) = &self.config.file {
            self.write_to_file(file_path, reports)
        } else {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            self.write_output(&mut handle, reports)
        }
    }

    fn write_to_file(&self, file_path: &str, reports: &[SearchReport]) -> Result<(), OsintError> {
        if let Some(parent) = Path::new(file_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OsintError::OutputError(format!("Failed to create directory: {}", e)))?;
        }

        let mut file = File::create(file_path)
            .map_err(|e| OsintError::OutputError(format!("Failed to create file: {}", e)))?;

        self.write_output(&mut file, reports)?;

        log::info!("Results written to: {}", file_path);
        Ok(())
    }

    fn write_output<W: Write>(&self, writer: &mut W, reports: &[SearchReport]) -> Result<(), OsintError> {
        let rendered = match self.config.format {
            OutputFormat::Text => reports.iter().map(|r| self.render_text(r)).collect::<String>(),
            OutputFormat::Json => render_json(reports)?,
            OutputFormat::Html => {
                let bodies: String = reports.iter().map(render_report_section).collect();
                html_page("OSINT results", &bodies)
            }
        };

        writer
            .write_all(rendered.as_bytes())
            .map_err(|e| OsintError::OutputError(e.to_string()))
    }

    fn render_text(&self, report: &SearchReport) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n[*] Query: {} ({})\n", report.query, report.query_type));
        out.push_str(&format!("[*] Time: {}\n", report.timestamp));
        out.push_str("\n[*] Results:\n");

        for result in &report.results {
            if result.status == ProbeStatus::Error && !self.config.verbose {
                continue;
            }
            let marker = match result.status {
                ProbeStatus::Success => "+",
                ProbeStatus::Warning => "!",
                ProbeStatus::Error => "-",
                ProbeStatus::Info => "i",
            };
            match &result.url {
                Some(url) => out.push_str(&format!("[{}] {}: {} <{}>\n", marker, result.platform, result.data, url)),
                None => out.push_str(&format!("[{}] {}: {}\n", marker, result.platform, result.data)),
            }
        }
        out
    }
}

fn render_json(reports: &[SearchReport]) -> Result<String, OsintError> {
    let json = if reports.len() == 1 {
        serde_json::to_string_pretty(&reports[0])
    } else {
        serde_json::to_string_pretty(reports)
    }
    .map_err(|e| OsintError::OutputError(format!("Failed to serialize JSON: {}", e)))?;
    Ok(format!("{}\n", json))
}

fn html_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head>\n<body>\n{}</body></html>\n",
        html_escape(title),
        STYLE,
        body
    )
}

fn search_form(value: &str) -> String {
    format!(
        "<form method=\"get\" action=\"/search\"><input name=\"q\" maxlength=\"100\" value=\"{}\" \
         placeholder=\"username, email, phone, domain or wallet\"> <button type=\"submit\">Search</button></form>\n",
        html_escape(value)
    )
}

fn render_report_section(report: &SearchReport) -> String {
    let mut rows = String::new();
    for result in &report.results {
        let link = match &result.url {
            Some(url) => format!("<a href=\"{0}\" rel=\"noopener noreferrer\">{0}</a>", html_escape(url)),
            None => String::new(),
        };
        rows.push_str(&format!(
            "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td></tr>\n",
            html_escape(&result.platform),
            result.status,
            result.status,
            html_escape(&result.data),
            link
        ));
    }

    format!(
        "<section><h2>{} <small>({})</small></h2><p>{}</p>\n<table><tr><th>Source</th><th>Status</th><th>Details</th><th>Link</th></tr>\n{}</table></section>\n",
        html_escape(&report.query),
        report.query_type,
        html_escape(&report.timestamp),
        rows
    )
}

/// Full page for one report, with the search form on top.
pub fn render_html(report: &SearchReport) -> String {
    let body = format!("{}{}", search_form(&report.query), render_report_section(report));
    html_page(&format!("OSINT results for {}", report.query), &body)
}

pub fn render_index() -> String {
    html_page("OSINT lookup", &format!("<h1>OSINT lookup</h1>\n{}", search_form("")))
}

pub fn render_error_html(message: &str) -> String {
    html_page(
        "Search failed",
        &format!("{}<p class=\"error\">{}</p>\n", search_form(""), html_escape(message)),
    )
}
