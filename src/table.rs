//! CSV output for a finished batch.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::pipeline::ListingRow;

/// Fixed header row of the output table.
pub const HEADER: [&str; 4] = ["File Name", "Title", "Description", "Keywords"];

/// Write `rows` to `path` as CSV, replacing any existing file.
///
/// The header is always written, so an empty batch yields a header-only file.
pub fn write_listings(path: &Path, rows: &[ListingRow]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    write_listings_to(file, rows)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))
}

/// Serialize `rows` as CSV into any writer.
///
/// Fields are quoted only when they contain a comma, quote or line break.
/// Records end in `\n`.
pub fn write_listings_to<W: Write>(writer: W, rows: &[ListingRow]) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(HEADER).context("Failed to write CSV header")?;
    for row in rows {
        csv.write_record([
            row.file_name.as_str(),
            row.title.as_str(),
            row.description.as_str(),
            row.keywords.as_str(),
        ])
        .with_context(|| format!("Failed to write CSV row for {}", row.file_name))?;
    }
    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(file_name: &str, title: &str, description: &str, keywords: &str) -> ListingRow {
        ListingRow {
            file_name: file_name.into(),
            title: title.into(),
            description: description.into(),
            keywords: keywords.into(),
        }
    }

    fn render(rows: &[ListingRow]) -> String {
        let mut buf = Vec::new();
        write_listings_to(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_only_for_empty_batch() {
        assert_eq!(render(&[]), "File Name,Title,Description,Keywords\n");
    }

    #[test]
    fn keywords_with_commas_are_quoted() {
        let out = render(&[row(
            "shoe.jpg",
            "Running Shoe",
            "Comfortable running shoe",
            "shoe, running, sport",
        )]);
        assert_eq!(
            out,
            "File Name,Title,Description,Keywords\n\
             shoe.jpg,Running Shoe,Comfortable running shoe,\"shoe, running, sport\"\n"
        );
    }

    #[test]
    fn embedded_quotes_and_newlines_are_escaped() {
        let out = render(&[row("a.png", "The \"Best\" Mug", "Line one\nLine two", "mug")]);
        let body = out.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert_eq!(body, "a.png,\"The \"\"Best\"\" Mug\",\"Line one\nLine two\",mug");
    }

    #[test]
    fn rows_keep_insertion_order() {
        let out = render(&[row("z.jpg", "Z", "z", ""), row("a.jpg", "A", "a", "")]);
        let names: Vec<&str> = out
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(names, vec!["z.jpg", "a.jpg"]);
    }

    #[test]
    fn write_listings_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale content that is longer than the new file\n".repeat(10)).unwrap();

        write_listings(&path, &[]).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "File Name,Title,Description,Keywords\n"
        );
    }

    #[test]
    fn write_listings_unwritable_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");
        assert!(write_listings(&path, &[]).is_err());
    }
}
