use crate::enums::diff_annotation::DiffAnnotation;
use crate::structs::api::change_request::ChangeRequest;
use crate::structs::api::request_page::RequestPage;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const DEFAULT_WIDTH: usize = 60;
const MAX_WIDTH: usize = 100;

/// Terminal rendering of change requests and their field diffs.
pub struct DiffLogger {
    color: bool,
}

impl DiffLogger {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn print_request_list(&self, page: &RequestPage, current_page: u32) {
        println!("\n📋 CHANGE REQUESTS (page {} of {})", current_page, page.total_pages.max(1));
        println!("{}", self.separator());

        if page.requests.is_empty() {
            println!("  No change requests found.");
        }

        for request in &page.requests {
            println!(
                "  {}  {:<40} {:<12} {}",
                request.id,
                request.title(),
                request.status.label(),
                request.created_at.format("%Y-%m-%d %H:%M"),
            );
        }

        println!("{}", self.separator());
    }

    pub fn print_request_header(&self, request: &ChangeRequest) {
        println!("\n📄 {}", self.bold(&request.title()));
        println!("   Request: {}", request.id);
        println!("   Status:  {}", request.status.label());
        println!("   Created: {}", request.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    /// Prints `No changes.` when there is nothing to show.
    pub fn print_annotations(&self, annotations: &[DiffAnnotation]) {
        println!("{}", self.separator());
        if annotations.is_empty() {
            println!("No changes.");
        } else {
            for annotation in annotations {
                self.print_annotation(annotation, 0);
            }
        }
        println!("{}", self.separator());
        if !annotations.is_empty() {
            println!("{}", Self::summary(annotations));
        }
    }

    /// Counts leaf changes, looking through nested groups.
    pub fn summary(annotations: &[DiffAnnotation]) -> String {
        let total: usize = annotations.iter().map(DiffAnnotation::leaf_count).sum();
        format!("📊 {} changed field(s)", total)
    }

    pub fn render_annotation(&self, annotation: &DiffAnnotation, depth: usize) -> Vec<String> {
        let indent = "  ".repeat(depth);
        let label = annotation.path().last().unwrap_or_default();

        match annotation {
            DiffAnnotation::ScalarChange { old_value, new_value, .. } => {
                let mut line = format!("{}{}: ", indent, label);
                if let Some(old) = old_value {
                    line.push_str(&self.paint(RED, &format!("- {}", old)));
                    line.push(' ');
                }
                line.push_str(&self.paint(GREEN, &format!("+ {}", new_value)));
                vec![line]
            }
            DiffAnnotation::ArrayDelta { added, removed, .. } => {
                let mut lines = vec![format!("{}{}:", indent, label)];
                lines.extend(added.iter().map(|item| format!("{}  {}", indent, self.paint(GREEN, &format!("+ {}", item)))));
                lines.extend(removed.iter().map(|item| format!("{}  {}", indent, self.paint(RED, &format!("- {}", item)))));
                lines
            }
            DiffAnnotation::NestedGroup { children, .. } => {
                let mut lines = vec![format!("{}{}", indent, self.bold(&format!("{}:", label)))];
                for child in children {
                    lines.extend(self.render_annotation(child, depth + 1));
                }
                lines
            }
        }
    }

    fn print_annotation(&self, annotation: &DiffAnnotation, depth: usize) {
        for line in self.render_annotation(annotation, depth) {
            println!("{}", line);
        }
    }

    fn separator(&self) -> String {
        let width = terminal_size::terminal_size()
            .map_or(DEFAULT_WIDTH, |(terminal_size::Width(w), _)| usize::from(w))
            .min(MAX_WIDTH);
        "━".repeat(width)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.color {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::change_value::{ChangeValue, Scalar};
    use crate::structs::field_path::FieldPath;

    #[test]
    fn plain_rendering_marks_additions_and_removals() {
        let logger = DiffLogger::new(false);
        let annotation = DiffAnnotation::NestedGroup {
            path: FieldPath::new(["notes"]),
            children: vec![DiffAnnotation::ArrayDelta {
                path: FieldPath::new(["notes", "top_notes"]),
                added: vec![ChangeValue::text("sea")],
                removed: vec![ChangeValue::text("musk")],
            }],
        };

        assert_eq!(logger.render_annotation(&annotation, 0), vec![
            "notes:".to_string(),
            "  top_notes:".to_string(),
            "    + sea".to_string(),
            "    - musk".to_string(),
        ]);
    }

    #[test]
    fn summary_counts_leaves_inside_groups() {
        let annotations = vec![
            DiffAnnotation::ScalarChange {
                path: FieldPath::new(["name"]),
                old_value: None,
                new_value: Scalar::text("Aqua"),
            },
            DiffAnnotation::NestedGroup {
                path: FieldPath::new(["notes"]),
                children: vec![
                    DiffAnnotation::ArrayDelta {
                        path: FieldPath::new(["notes", "top_notes"]),
                        added: vec![ChangeValue::text("sea")],
                        removed: vec![],
                    },
                    DiffAnnotation::ScalarChange {
                        path: FieldPath::new(["notes", "heart"]),
                        old_value: None,
                        new_value: Scalar::text("rose"),
                    },
                ],
            },
        ];
        assert_eq!(DiffLogger::summary(&annotations), "📊 3 changed field(s)");
    }

    #[test]
    fn scalar_without_original_shows_only_new_value() {
        let logger = DiffLogger::new(false);
        let annotation = DiffAnnotation::ScalarChange {
            path: FieldPath::new(["name"]),
            old_value: None,
            new_value: Scalar::text("Aqua"),
        };
        assert_eq!(logger.render_annotation(&annotation, 0), vec!["name: + Aqua".to_string()]);
    }

    #[test]
    fn colored_rendering_wraps_in_escape_codes() {
        let logger = DiffLogger::new(true);
        let annotation = DiffAnnotation::ScalarChange {
            path: FieldPath::new(["name"]),
            old_value: Some(ChangeValue::text("A")),
            new_value: Scalar::text("B"),
        };
        let line = &logger.render_annotation(&annotation, 0)[0];
        assert!(line.contains("\x1b[31m- A\x1b[0m"));
        assert!(line.contains("\x1b[32m+ B\x1b[0m"));
    }
}
