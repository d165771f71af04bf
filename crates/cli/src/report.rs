//! Console output and the Markdown report.

use std::fmt::{self, Write as _};
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Local};
use lexis_analysis::{DocumentStats, StructureReport};
use lexis_ingest::format_bytes;
use lexis_llm::{SummaryOutcome, SummaryPath};
use tracing::info;

use crate::pipeline::ImageExport;

const SEPARATOR_WIDTH: usize = 70;
const MAX_IMAGES_SHOWN: usize = 5;
const MAX_TITLES_SHOWN: usize = 10;

/// Everything a run produced, for printing and for the report.
pub struct RunReport<'a> {
    pub stats: &'a DocumentStats,
    pub structure: Option<&'a StructureReport>,
    pub images: Option<&'a ImageExport>,
    pub summary: Option<&'a SummaryOutcome>,
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn header(title: &str) {
    let line = "=".repeat(SEPARATOR_WIDTH);
    println!("{line}");
    println!("{title}");
    println!("{line}");
}

pub fn print_stats(stats: &DocumentStats) {
    println!();
    header("DOCUMENT ANALYSIS");
    println!("\nFile: {}", stats.file_name);
    println!("Path: {}", stats.file_path);
    println!("\nPages: {}", stats.page_count);
    println!(
        "File size: {} ({} bytes)",
        format_bytes(stats.file_size_bytes),
        group_thousands(stats.file_size_bytes as usize)
    );
    println!(
        "Words ({}): {}",
        stats.word_count_mode,
        group_thousands(stats.word_count)
    );
    println!(
        "Vocabulary: {} distinct words",
        group_thousands(stats.vocabulary_size)
    );
    println!("Lexical diversity: {:.3}", stats.lexical_diversity);

    println!(
        "\n{} most common words (without stopwords):",
        stats.most_common_words.len()
    );
    for (position, (word, frequency)) in stats.most_common_words.iter().enumerate() {
        println!(
            "   {:2}. {:<20} ({} occurrences)",
            position + 1,
            word,
            group_thousands(*frequency)
        );
    }
    println!();
}

pub fn print_structure(structure: &StructureReport) {
    header("STRUCTURE");
    println!("\nTitles: {}", structure.titles.len());
    for title in structure.titles.iter().take(MAX_TITLES_SHOWN) {
        println!("   - [p.{}] {}", title.page_number, title.text);
    }
    if structure.titles.len() > MAX_TITLES_SHOWN {
        println!("   ... and {} more", structure.titles.len() - MAX_TITLES_SHOWN);
    }
    println!("\nSections: {}", structure.sections.len());
    for section in &structure.sections {
        println!("   {} {}", section.number, section.title);
    }
    let keywords: Vec<&str> = structure.keywords.iter().map(|k| k.word.as_str()).collect();
    println!("\nKeywords: {}", keywords.join(", "));
    println!();
}

pub fn print_images(images: &ImageExport) {
    header("IMAGE EXTRACTION");
    println!(
        "\nImages extracted: {} (of {} found)",
        images.paths.len(),
        images.found
    );
    if !images.paths.is_empty() {
        println!("Output directory: {}", images.output_dir.display());
        println!("\nFirst images:");
        for path in images.paths.iter().take(MAX_IMAGES_SHOWN) {
            if let Some(name) = path.file_name() {
                println!("   - {}", name.to_string_lossy());
            }
        }
        if images.paths.len() > MAX_IMAGES_SHOWN {
            println!("   ... and {} more", images.paths.len() - MAX_IMAGES_SHOWN);
        }
    }
    println!();
}

pub fn print_summary(summary: &SummaryOutcome) {
    header("SUMMARY (model generated)");
    println!("\n{}\n", summary.summary);
}

fn describe_path(path: &SummaryPath) -> String {
    match path {
        SummaryPath::Direct => "single pass".to_string(),
        SummaryPath::MapReduce {
            chunks_total,
            chunks_used,
        } => format!("{chunks_used} of {chunks_total} chunks, then consolidated"),
    }
}

/// Render the Markdown report stamped with `generated_at`.
pub fn render_markdown(report: &RunReport<'_>, generated_at: DateTime<Local>) -> Result<String, fmt::Error> {
    let stats = report.stats;
    let mut md = String::new();

    writeln!(md, "# Document Analysis Report\n")?;

    writeln!(md, "## Document\n")?;
    writeln!(md, "- **File**: `{}`", stats.file_name)?;
    writeln!(md, "- **Path**: `{}`", stats.file_path)?;
    writeln!(md, "- **Pages**: {}", stats.page_count)?;
    writeln!(
        md,
        "- **Size**: {} ({} bytes)",
        format_bytes(stats.file_size_bytes),
        group_thousands(stats.file_size_bytes as usize)
    )?;
    writeln!(
        md,
        "- **Words** ({}): {}",
        stats.word_count_mode,
        group_thousands(stats.word_count)
    )?;
    writeln!(
        md,
        "- **Vocabulary**: {} distinct words",
        group_thousands(stats.vocabulary_size)
    )?;
    writeln!(md, "- **Lexical diversity**: {:.3}\n", stats.lexical_diversity)?;

    writeln!(md, "## Most Common Words\n")?;
    writeln!(md, "| # | Word | Frequency |")?;
    writeln!(md, "|---|------|-----------|")?;
    for (position, (word, frequency)) in stats.most_common_words.iter().enumerate() {
        writeln!(md, "| {} | {} | {} |", position + 1, word, group_thousands(*frequency))?;
    }
    md.push('\n');

    if let Some(images) = report.images {
        writeln!(md, "## Extracted Images\n")?;
        writeln!(md, "**Total**: {} images\n", images.paths.len())?;
        if !images.paths.is_empty() {
            writeln!(md, "### Image List\n")?;
            for path in &images.paths {
                if let Some(name) = path.file_name() {
                    writeln!(md, "- `{}`", name.to_string_lossy())?;
                }
            }
            md.push('\n');
        }
    }

    if let Some(structure) = report.structure {
        writeln!(md, "## Structure\n")?;
        if !structure.titles.is_empty() {
            writeln!(md, "### Titles\n")?;
            for title in &structure.titles {
                writeln!(md, "- {} (page {})", title.text, title.page_number)?;
            }
            md.push('\n');
        }
        if !structure.sections.is_empty() {
            writeln!(md, "### Sections\n")?;
            for section in &structure.sections {
                writeln!(md, "- **{}** {}", section.number, section.title)?;
            }
            md.push('\n');
        }
        if !structure.keywords.is_empty() {
            let keywords: Vec<&str> = structure.keywords.iter().map(|k| k.word.as_str()).collect();
            writeln!(md, "**Keywords**: {}\n", keywords.join(", "))?;
        }
    }

    if let Some(summary) = report.summary {
        writeln!(md, "## Summary\n")?;
        writeln!(md, "{}\n", summary.summary)?;
        writeln!(md, "*{}*\n", describe_path(&summary.path))?;
    }

    writeln!(md, "---")?;
    writeln!(
        md,
        "*Generated by lexis on {}*",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    Ok(md)
}

pub fn write_markdown(path: &Path, report: &RunReport<'_>) -> io::Result<()> {
    info!(path = %path.display(), "writing Markdown report");
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let md = render_markdown(report, Local::now()).map_err(io::Error::other)?;
    fs::write(path, md)?;
    info!(path = %path.display(), "report saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::TimeZone;
    use lexis_analysis::structure::{Keyword, Section, Title};
    use lexis_core::config::WordCountMode;

    use super::*;

    fn stats() -> DocumentStats {
        DocumentStats {
            file_name: "relatorio.pdf".into(),
            file_path: "docs/relatorio.pdf".into(),
            page_count: 12,
            file_size_bytes: 2048,
            word_count: 12_345,
            word_count_mode: WordCountMode::Tokens,
            vocabulary_size: 1_200,
            lexical_diversity: 0.0972,
            most_common_words: vec![("dados".into(), 40), ("sistema".into(), 31)],
        }
    }

    fn timestamp() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn thousands_are_grouped() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn minimal_report_has_document_and_words() {
        let stats = stats();
        let md = render_markdown(
            &RunReport {
                stats: &stats,
                structure: None,
                images: None,
                summary: None,
            },
            timestamp(),
        )
        .unwrap();

        assert!(md.starts_with("# Document Analysis Report"));
        assert!(md.contains("- **File**: `relatorio.pdf`"));
        assert!(md.contains("- **Size**: 2.00 KB (2,048 bytes)"));
        assert!(md.contains("- **Words** (tokens): 12,345"));
        assert!(md.contains("| 1 | dados | 40 |"));
        assert!(!md.contains("## Summary"));
        assert!(!md.contains("## Structure"));
        assert!(md.ends_with("*Generated by lexis on 2024-03-01 10:30:00*\n"));
    }

    #[test]
    fn full_report_lists_images_structure_and_summary() {
        let stats = stats();
        let structure = StructureReport {
            titles: vec![Title {
                text: "Introdução".into(),
                page_number: 1,
            }],
            sections: vec![Section {
                number: "1.".into(),
                title: "Introdução".into(),
            }],
            keywords: vec![Keyword {
                word: "dados".into(),
                frequency: 40,
            }],
        };
        let images = ImageExport {
            output_dir: PathBuf::from("imagens/relatorio"),
            paths: vec![PathBuf::from("imagens/relatorio/page1_img1.jpg")],
            found: 2,
        };
        let summary = SummaryOutcome {
            summary: "Resumo do relatório.".into(),
            path: SummaryPath::MapReduce {
                chunks_total: 7,
                chunks_used: 5,
            },
            requests: 6,
        };

        let md = render_markdown(
            &RunReport {
                stats: &stats,
                structure: Some(&structure),
                images: Some(&images),
                summary: Some(&summary),
            },
            timestamp(),
        )
        .unwrap();

        assert!(md.contains("- `page1_img1.jpg`"));
        assert!(md.contains("- Introdução (page 1)"));
        assert!(md.contains("- **1.** Introdução"));
        assert!(md.contains("**Keywords**: dados"));
        assert!(md.contains("Resumo do relatório."));
        assert!(md.contains("5 of 7 chunks"));
    }

    #[test]
    fn report_is_written_to_nested_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("saida").join("report.md");
        let stats = stats();
        write_markdown(
            &path,
            &RunReport {
                stats: &stats,
                structure: None,
                images: None,
                summary: None,
            },
        )
        .unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("relatorio.pdf"));
    }
}
