use crate::plan::{FieldChange, PlanState};
use crate::utils::text::{display_width, wrap_text};
use console::style;
use serde_json::Value;
use std::io;

/// Display an assistant reply, rendering markdown when the reply looks
/// like it carries any markup.
pub fn display_reply(reply: &str) {
    if reply.is_empty() {
        return;
    }
    if reply.contains('*') || reply.contains('`') || reply.contains('#') {
        display_markdown(reply);
    } else {
        display_plain_reply(reply);
    }
}

pub fn display_markdown(text: &str) {
    println!("\n{}", style("✈  TRAVEL ASSISTANT").bold().magenta());
    termimad::print_text(text);
}

fn display_plain_reply(reply: &str) {
    // Responsive box, sized to content but capped to the terminal
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    let max_width = std::cmp::min(terminal_width.saturating_sub(4), 100).max(50);

    let mut wrapped_lines = Vec::new();
    for line in reply.lines() {
        if line.is_empty() {
            wrapped_lines.push(String::new());
        } else {
            wrapped_lines.extend(wrap_text(line, max_width.saturating_sub(4)));
        }
    }

    let content_max = wrapped_lines
        .iter()
        .map(|line| display_width(line))
        .max()
        .unwrap_or(0);
    let box_width = std::cmp::min(max_width, content_max + 4);

    let top_border = "┌".to_string() + &"─".repeat(box_width.saturating_sub(2)) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(box_width.saturating_sub(2)) + "┘";

    println!("\n{}", style("✈  TRAVEL ASSISTANT").bold().magenta());
    println!("{}", style(&top_border).dim().magenta());
    for line in &wrapped_lines {
        let padding = box_width.saturating_sub(display_width(line) + 3);
        println!("│ {}{}│", style(line).bold().white(), " ".repeat(padding));
    }
    println!("{}", style(&bottom_border).dim().magenta());
}

/// Render the plan sections as one boxed table.
pub fn display_plan(plan: &PlanState) {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    let width = std::cmp::min(terminal_width.saturating_sub(4), 100).max(50);

    let top_border = "┌".to_string() + &"─".repeat(width.saturating_sub(2)) + "┐";
    let separator = "├".to_string() + &"─".repeat(width.saturating_sub(2)) + "┤";
    let bottom_border = "└".to_string() + &"─".repeat(width.saturating_sub(2)) + "┘";

    println!("\n{}", style("🗺  CURRENT PLAN").bold().cyan());
    println!("{}", style(&top_border).dim().cyan());

    if plan.sections.is_empty() {
        print_row(width, "(empty plan)", &style("(empty plan)").dim().to_string());
    }

    for (i, (name, fields)) in plan.sections.iter().enumerate() {
        if i > 0 {
            println!("{}", style(&separator).dim().cyan());
        }
        print_row(width, name, &style(name).bold().cyan().to_string());
        for (field, value) in fields {
            let raw = format!("  {}: {}", field, format_value(value));
            for line in wrap_text(&raw, width.saturating_sub(4)) {
                print_row(width, &line, &line);
            }
        }
    }

    println!("{}", style(&bottom_border).dim().cyan());
}

/// Show a proposed update as field-level before/after lines.
pub fn display_changes(changes: &[FieldChange]) {
    println!("\n{}", style("📝 PROPOSED PLAN UPDATE").bold().yellow());
    for change in changes {
        let target = format!("{}.{}", change.section, change.field);
        match &change.old {
            Some(old) => println!(
                "  {} {} -> {}",
                style(&target).bold(),
                style(format_value(old)).dim(),
                style(format_value(&change.new)).green()
            ),
            None => println!(
                "  {} {} {}",
                style(&target).bold(),
                style("+").green(),
                style(format_value(&change.new)).green()
            ),
        }
    }
}

/// Ask whether the proposed update should be applied.
pub fn prompt_apply_confirmation() -> bool {
    println!(
        "\n{} {}",
        style("❓").bold().yellow(),
        style("Apply this update to your plan? [y/N]").bold().cyan()
    );
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    input.trim().eq_ignore_ascii_case("y")
}

pub fn display_error(message: &str) {
    eprintln!(
        "{} {}",
        style("❌").bold().red(),
        style(message).bold().red()
    );
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn print_row(width: usize, raw: &str, styled: &str) {
    let padding = width.saturating_sub(display_width(raw) + 3);
    println!("│ {}{}│", styled, " ".repeat(padding));
}
