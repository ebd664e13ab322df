// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal rendering: headers, tables, and error reports.

use std::io::IsTerminal;

use colored::Colorize;
use sitedesk_core::SitedeskError;

/// Console writer; colors are off with `--plain` or when stdout is not a TTY.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    color: bool,
}

impl Output {
    pub fn new(plain: bool) -> Self {
        Self {
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    pub fn header(&self, title: &str) {
        println!();
        if self.color {
            println!("  {}", title.bold());
        } else {
            println!("  {title}");
        }
        println!("  {}", "-".repeat(title.chars().count().max(35)));
    }

    pub fn success(&self, message: &str) {
        if self.color {
            println!("{} {message}", "✓".green());
        } else {
            println!("[OK] {message}");
        }
    }

    pub fn info(&self, message: &str) {
        println!("{message}");
    }

    pub fn error(&self, error: &SitedeskError) {
        let label = if self.color {
            "error".red().to_string()
        } else {
            "error".to_string()
        };
        match error.validation_errors() {
            Some(fields) => {
                eprintln!("{label}: please fix the following fields");
                for (field, message) in fields.iter() {
                    eprintln!("  {field}: {message}");
                }
            }
            None => eprintln!("{label}: {error}"),
        }
    }

    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) {
        print!("{}", render_table(headers, rows));
    }

    pub fn page_footer(&self, page: usize, page_size: usize, total: usize) {
        if total == 0 {
            println!("  (no records)");
            return;
        }
        let first = page * page_size + 1;
        let last = (first + page_size - 1).min(total);
        println!("  {first}-{last} of {total}");
    }
}

/// Left-aligned columns separated by two spaces, each as wide as its widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("  {}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers.to_vec());
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_to_widest_cell() {
        let rendered = render_table(
            &["ID", "Name"],
            &[
                vec!["1".into(), "Supermarket".into()],
                vec!["12".into(), "Depot".into()],
            ],
        );
        assert_eq!(
            rendered,
            "  ID  Name\n  1   Supermarket\n  12  Depot\n"
        );
    }

    #[test]
    fn table_without_rows_is_header_only() {
        assert_eq!(render_table(&["ID"], &[]), "  ID\n");
    }
}
