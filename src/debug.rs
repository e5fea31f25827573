use crate::stack::CellStack;
use colored::Colorize;
use std::fmt::Write;

// Debug Reporter /////////////////////////////////////////////////////////////
//
// Renders what a step did and the stack it left behind, top first. Purely
// observational, the VM decides where the text goes.

pub fn render(step: usize, message: &str, stack: &CellStack, pause: bool) -> String {
    let mut report = String::new();
    let _ = write!(report, "\n############ Step {} ############\n", step);
    let _ = write!(report, "Message: {}", message.yellow());
    for val in stack.iter_top_down() {
        let _ = write!(report, "\n|{:8}|", val);
    }
    if pause {
        report.push_str("\nPress ENTER to step over:");
    } else {
        report.push('\n');
    }
    report
}

// Shortens long file content for messages
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = if max > 3 { max - 3 } else { max };
    let mut short: String = s.chars().take(keep).collect();
    short.push_str("...");
    short
}

// Testing ////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod debug_tests {
    use super::*;

    #[test]
    fn test_render_stack_top_first() {
        let mut stack = CellStack::unbounded();
        stack.push(3).unwrap();
        stack.push(-12).unwrap();
        let report = render(4, "Pushed -12 into the stack", &stack, false);
        assert!(report.contains("Step 4"));
        assert!(report.contains("Pushed -12 into the stack"));
        let top = report.find("|     -12|").unwrap();
        let bottom = report.find("|       3|").unwrap();
        assert!(top < bottom);
        assert!(!report.contains("Press ENTER"));
    }

    #[test]
    fn test_render_pause_prompt() {
        let report = render(1, "", &CellStack::unbounded(), true);
        assert!(report.ends_with("Press ENTER to step over:"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("abcdef", 2), "ab...");
    }
}
