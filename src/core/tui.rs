//! Terminal rendering of the filtered tree.

use colored::Colorize;

use crate::core::expansion::{ExpansionState, TreeLevel};
use crate::core::model::{Action, ActionStatus, Ambition, Measurable, Priority};
use crate::core::navigator::{Navigator, rounded_percent};
use crate::core::summary::quarter_label;

const BAR_WIDTH: usize = 10;

/// Collapse whitespace and bound length for a single terminal line.
pub fn truncate_title(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = collapsed.chars().take(keep).collect();
    out.push('…');
    out
}

/// `[####......] 40%`
pub fn progress_bar(progress: f64) -> String {
    let pct = rounded_percent(progress);
    let filled = (pct as usize * BAR_WIDTH + 50) / 100;
    let bar = format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));
    let coloured = if pct >= 75 {
        bar.bright_green()
    } else if pct >= 50 {
        bar.bright_yellow()
    } else {
        bar.bright_red()
    };
    format!("{} {:>3}%", coloured, pct)
}

fn disclosure(expanded: bool) -> &'static str {
    if expanded { "▾" } else { "▸" }
}

fn status_icon(status: ActionStatus) -> &'static str {
    match status {
        ActionStatus::Todo => "○",
        ActionStatus::InProgress => "◐",
        ActionStatus::Done => "●",
    }
}

fn priority_tag(priority: Priority) -> String {
    let tag = format!("[{}]", priority);
    match priority {
        Priority::Low => tag.dimmed().to_string(),
        Priority::Medium => tag.blue().to_string(),
        Priority::High => tag.yellow().to_string(),
        Priority::Critical => tag.bright_red().bold().to_string(),
    }
}

pub struct TreeRenderer<'n, 'a> {
    navigator: &'n Navigator<'a>,
    expansion: &'n ExpansionState,
    max_title_chars: usize,
}

impl<'n, 'a> TreeRenderer<'n, 'a> {
    pub fn new(navigator: &'n Navigator<'a>, expansion: &'n ExpansionState, max_title_chars: usize) -> Self {
        Self {
            navigator,
            expansion,
            max_title_chars,
        }
    }

    fn title(&self, raw: &str) -> String {
        truncate_title(raw, self.max_title_chars)
    }

    pub fn render(&self, ambitions: &[&Ambition]) -> Vec<String> {
        let mut lines = Vec::new();
        for ambition in ambitions {
            self.render_ambition(ambition, &mut lines);
        }
        lines
    }

    fn render_ambition(&self, ambition: &Ambition, lines: &mut Vec<String>) {
        let expanded = self.expansion.is_expanded(TreeLevel::Ambition, &ambition.id);
        let objectives = self.navigator.objectives_for_ambition(&ambition.id);
        lines.push(format!(
            "{} {} {} {}",
            disclosure(expanded).bright_magenta(),
            self.title(&ambition.title).bright_magenta().bold(),
            format!("({}, {})", ambition.category, ambition.year).dimmed(),
            format!("{} objectives", objectives.len()).cyan()
        ));
        if !expanded {
            return;
        }

        let key_results = self.navigator.key_results_for_ambition(&ambition.id);
        if !key_results.is_empty() {
            lines.push(format!(
                "    {} {}",
                "Annual key results".dimmed(),
                progress_bar(self.navigator.ambition_progress(&ambition.id))
            ));
            for kr in key_results {
                lines.push(format!(
                    "    • {} {} {}",
                    self.title(&kr.title),
                    progress_bar(kr.progress()),
                    format!("({}/{} {})", kr.current, kr.target, kr.unit).dimmed()
                ));
            }
        }

        for objective in objectives {
            let expanded = self.expansion.is_expanded(TreeLevel::Objective, &objective.id);
            let krs = self.navigator.key_results_for_objective(&objective.id);
            let stats = self.navigator.action_stats_for_objective(&objective.id);
            lines.push(format!(
                "  {} {} {} {} {}",
                disclosure(expanded).bright_cyan(),
                format!("{} {}", quarter_label(objective.quarter), objective.year).cyan(),
                self.title(&objective.title).bold(),
                format!(
                    "{} KR · {} actions ({} todo, {} in progress, {} done)",
                    krs.len(),
                    stats.total,
                    stats.todo,
                    stats.in_progress,
                    stats.done
                )
                .dimmed(),
                progress_bar(self.navigator.objective_progress(&objective.id))
            ));
            if !expanded {
                continue;
            }
            for kr in krs {
                let kr_expanded = self.expansion.is_expanded(TreeLevel::KeyResult, &kr.id);
                let actions = self.navigator.actions_for_key_result(&kr.id);
                let deadline = kr
                    .deadline
                    .map(|d| format!(" due {}", d))
                    .unwrap_or_default();
                lines.push(format!(
                    "      {} {} {} {}{}",
                    disclosure(kr_expanded).green(),
                    self.title(&kr.title),
                    progress_bar(kr.progress()),
                    format!("{} actions", actions.len()).dimmed(),
                    deadline.dimmed()
                ));
                if kr_expanded {
                    for action in actions {
                        lines.push(self.action_line(action));
                    }
                }
            }
        }
    }

    fn action_line(&self, action: &Action) -> String {
        let labels = if action.labels.is_empty() {
            String::new()
        } else {
            format!(
                " {}",
                action
                    .labels
                    .iter()
                    .map(|l| format!("#{}", l))
                    .collect::<Vec<_>>()
                    .join(" ")
            )
        };
        let deadline = action
            .deadline
            .map(|d| format!(" due {}", d))
            .unwrap_or_default();
        format!(
            "          {} {} {}{}{}",
            status_icon(action.status),
            self.title(&action.title),
            priority_tag(action.priority),
            labels.bright_blue(),
            deadline.dimmed()
        )
    }
}
