//! Tables that make up a rendered report.

use crate::i18n::{MessageKey, Messages};
use crate::model::{Analysis, FileResult, Package, Priority, PriorityCounts, Violation};

use super::{Column, Table};

/// Anchor id of a package's first file section.
///
/// Anchors are injective: `-` only separates the parts, package path
/// separators become `.`, and any other byte outside `[A-Za-z0-9]` is written
/// as `_XX`. The default package has no path part, which no named package
/// can produce.
#[must_use]
pub fn package_anchor(package: &Package) -> String {
    let mut anchor = format!("package-{}", package.source_root);
    if !package.is_default() {
        anchor.push('-');
        encode_into(&mut anchor, &package.path, '/');
    }
    anchor
}

/// Anchor id of a file section.
#[must_use]
pub fn file_anchor(package: &Package, file: &FileResult) -> String {
    let mut anchor = format!("file-{}", package.source_root);
    if !package.is_default() {
        anchor.push('-');
        encode_into(&mut anchor, &package.path, '/');
    }
    anchor.push('-');
    encode_into(&mut anchor, &file.name, '.');
    anchor
}

/// Append `text`, keeping ASCII alphanumerics and writing `separator` as a
/// literal `.`; everything else is hex-escaped byte by byte.
fn encode_into(anchor: &mut String, text: &str, separator: char) {
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            anchor.push(c);
        } else if c == separator {
            anchor.push('.');
        } else {
            let mut bytes = [0; 4];
            for byte in c.encode_utf8(&mut bytes).bytes() {
                anchor.push('_');
                anchor.push(char::from(HEX[usize::from(byte >> 4)]));
                anchor.push(char::from(HEX[usize::from(byte & 0x0f)]));
            }
        }
    }
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Label of a package in tables: dotted name, or the localized default name.
#[must_use]
pub fn package_label(messages: Messages, package: &Package) -> String {
    package
        .name()
        .unwrap_or_else(|| messages.get(MessageKey::DefaultPackage).to_owned())
}

/// One-row table of report totals.
#[must_use]
pub fn summary_table(messages: Messages) -> Table<'static, Analysis> {
    Table::new(vec![
        Column::text(messages.get(MessageKey::TotalFiles), |a: &Analysis| {
            a.total_files().to_string()
        }),
        Column::text(
            messages.get(MessageKey::FilesWithViolations),
            |a: &Analysis| a.files_with_violations().to_string(),
        ),
        Column::text(messages.get(MessageKey::TotalViolations), |a: &Analysis| {
            a.total_violations().to_string()
        }),
        priority_column(messages, Priority::High, Analysis::counts),
        priority_column(messages, Priority::Medium, Analysis::counts),
        priority_column(messages, Priority::Low, Analysis::counts),
    ])
}

/// Per-package totals. The package name links to the package's first file
/// section when the package has violations.
#[must_use]
pub fn package_summary_table(messages: Messages) -> Table<'static, Package> {
    Table::new(vec![
        Column::new(
            messages.get(MessageKey::PackageColumn),
            move |sink, package: &Package| {
                let label = package_label(messages, package);
                if package.files_with_violations() > 0 {
                    sink.link(&package_anchor(package), &label)
                } else {
                    sink.text(&label)
                }
            },
        ),
        Column::text(
            messages.get(MessageKey::FilesWithViolations),
            |p: &Package| p.files_with_violations().to_string(),
        ),
        Column::text(messages.get(MessageKey::TotalViolations), |p: &Package| {
            p.counts().total().to_string()
        }),
        priority_column(messages, Priority::High, Package::counts),
        priority_column(messages, Priority::Medium, Package::counts),
        priority_column(messages, Priority::Low, Package::counts),
    ])
}

/// Violations of one file, in report order.
#[must_use]
pub fn violation_table(messages: Messages) -> Table<'static, Violation> {
    Table::new(vec![
        Column::text(messages.get(MessageKey::RuleNameColumn), |v: &Violation| {
            v.rule_name.clone()
        }),
        Column::text(
            messages.get(MessageKey::PriorityColumn),
            move |v: &Violation| messages.priority_label(v.priority),
        ),
        Column::text(messages.get(MessageKey::LineColumn), |v: &Violation| {
            v.line_number.map_or_else(String::new, |line| line.to_string())
        }),
        Column::new(
            messages.get(MessageKey::SourceLineMessageColumn),
            |sink, v: &Violation| {
                if let Some(source_line) = &v.source_line {
                    sink.start_paragraph()?;
                    sink.emphasis(source_line)?;
                    sink.end_paragraph()?;
                }
                if let Some(message) = &v.message {
                    sink.start_paragraph()?;
                    sink.text(message)?;
                    sink.end_paragraph()?;
                }
                Ok(())
            },
        ),
    ])
}

fn priority_column<T>(
    messages: Messages,
    priority: Priority,
    counts: fn(&T) -> PriorityCounts,
) -> Column<'static, T>
where
    T: 'static,
{
    let header = match priority {
        Priority::High => MessageKey::PriorityOneViolations,
        Priority::Medium => MessageKey::PriorityTwoViolations,
        Priority::Low => MessageKey::PriorityThreeViolations,
    };
    Column::text(messages.get(header), move |row: &T| {
        counts(row).get(priority).to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::sink::{RecordingSink, SinkEvent};

    fn violation(rule: &str, priority: Priority, line: Option<u32>) -> Violation {
        Violation {
            rule_name: rule.to_owned(),
            priority,
            line_number: line,
            source_line: None,
            message: None,
        }
    }

    fn analysis() -> Analysis {
        let mut foo = FileResult::new("Foo.groovy");
        foo.violations.push(Violation {
            source_line: Some("def x = 1".to_owned()),
            message: Some("Variable x is unused".to_owned()),
            ..violation("UnusedVariable", Priority::Medium, Some(10))
        });
        foo.violations
            .push(violation("EmptyCatchBlock", Priority::High, Some(22)));
        let mut example = Package::new("com/example", 0);
        example.files.push(foo);

        let mut clean = Package::new("com/clean", 0);
        clean.files.push(FileResult::new("Clean.groovy"));

        Analysis {
            packages: vec![example, clean],
            ..Analysis::default()
        }
    }

    #[test]
    fn test_summary_table_totals() {
        let table = summary_table(Messages::default());
        assert_eq!(table.column_count(), 6);
        assert_eq!(
            table.headers(),
            vec![
                "Total Files",
                "Files with Violations",
                "Total Violations",
                "Priority 1 Violations",
                "Priority 2 Violations",
                "Priority 3 Violations",
            ]
        );

        let mut sink = RecordingSink::new();
        table.render_rows(&mut sink, [&analysis()]).unwrap();
        assert_eq!(
            sink.tables()[0].rows,
            vec![vec!["2", "1", "2", "1", "1", "0"]]
        );
    }

    #[test]
    fn test_package_summary_links_only_packages_with_violations() {
        let analysis = analysis();
        let mut sink = RecordingSink::new();
        package_summary_table(Messages::default())
            .render_rows(&mut sink, &analysis.packages)
            .unwrap();

        let links: Vec<&SinkEvent> = sink
            .events()
            .iter()
            .filter(|e| matches!(e, SinkEvent::Link { .. }))
            .collect();
        assert_eq!(
            links,
            vec![&SinkEvent::Link {
                target: "package-0-com.example".to_owned(),
                text: "com.example".to_owned(),
            }]
        );
        let tables = sink.tables();
        let rows = &tables[0].rows;
        assert_eq!(rows[0], vec!["com.example", "1", "2", "1", "1", "0"]);
        assert_eq!(rows[1], vec!["com.clean", "0", "0", "0", "0", "0"]);
    }

    #[test]
    fn test_default_package_label_is_localized() {
        let package = Package::new("", 0);
        assert_eq!(
            package_label(Messages::default(), &package),
            "(default package)"
        );
        assert_eq!(
            package_label(Messages::new(Locale::German), &package),
            "(Standardpaket)"
        );
        assert_eq!(package_anchor(&package), "package-0");
        assert_eq!(package_anchor(&Package::new("default", 0)), "package-0-default");
    }

    #[test]
    fn test_violation_table_cells() {
        let analysis = analysis();
        let file = &analysis.packages[0].files[0];
        let mut sink = RecordingSink::new();
        violation_table(Messages::new(Locale::German))
            .render_rows(&mut sink, &file.violations)
            .unwrap();

        let tables = sink.tables();
        let table = &tables[0];
        assert_eq!(
            table.headers,
            vec!["Regel", "Priorit\u{e4}t", "Zeile", "Quellzeile / Meldung"]
        );
        assert_eq!(
            table.rows[0],
            vec![
                "UnusedVariable",
                "Mittel",
                "10",
                "def x = 1\nVariable x is unused"
            ]
        );
        assert_eq!(table.rows[1], vec!["EmptyCatchBlock", "Hoch", "22", ""]);
        assert!(
            sink.events()
                .contains(&SinkEvent::Emphasis("def x = 1".to_owned()))
        );
    }

    #[test]
    fn test_missing_line_renders_empty_cell() {
        let mut sink = RecordingSink::new();
        violation_table(Messages::default())
            .render_rows(&mut sink, [&violation("ClassSize", Priority::Low, None)])
            .unwrap();
        assert_eq!(sink.tables()[0].rows[0], vec!["ClassSize", "Low", "", ""]);
    }

    #[test]
    fn test_file_anchor_uses_full_path() {
        let analysis = analysis();
        let package = &analysis.packages[0];
        assert_eq!(
            file_anchor(package, &package.files[0]),
            "file-0-com.example-Foo.groovy"
        );
    }

    #[test]
    fn test_anchors_do_not_collide() {
        let packages = [
            Package::new("com/my_app", 0),
            Package::new("com/my/app", 0),
            Package::new("com/my-app", 0),
            Package::new("com/my.app", 0),
            Package::new("", 0),
            Package::new("default", 0),
            Package::new("com/my/app", 1),
        ];
        let anchors: Vec<String> = packages.iter().map(package_anchor).collect();
        assert_eq!(
            anchors,
            vec![
                "package-0-com.my_5Fapp",
                "package-0-com.my.app",
                "package-0-com.my_2Dapp",
                "package-0-com.my_2Eapp",
                "package-0",
                "package-0-default",
                "package-1-com.my.app",
            ]
        );
    }

    #[test]
    fn test_file_anchor_separates_package_and_file() {
        let nested = Package::new("a", 0);
        let flat = Package::new("a/b", 0);
        let default = Package::new("", 0);
        assert_eq!(
            file_anchor(&nested, &FileResult::new("b/C.groovy")),
            "file-0-a-b_2FC.groovy"
        );
        assert_eq!(
            file_anchor(&flat, &FileResult::new("C.groovy")),
            "file-0-a.b-C.groovy"
        );
        assert_eq!(
            file_anchor(&default, &FileResult::new("\u{e9}t\u{e9}.groovy")),
            "file-0-_C3_A9t_C3_A9.groovy"
        );
    }
}
