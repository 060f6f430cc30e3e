//! Markdown rendering of dispatch results for posting back to a ticket.

use wave_models::CommandDispatchResult;

/// Renders a dispatch result as a markdown comment.
///
/// ```text
/// ## ✅ Commands processed
///
/// **Summary**
/// - Total commands: 2
/// - Successful: 1
/// - Processing time: 0.42 ms
///
/// **Results**
/// 1. ✅ Started wave 3
/// 2. ❌ Validation failed for assign team-x to tasks 1 (Unknown team: team-x)
/// ```
///
/// Error and warning sections are only present when non-empty.
pub fn render_response(result: &CommandDispatchResult) -> String {
    let mut out = String::new();

    if result.success {
        out.push_str("## ✅ Commands processed\n");
    } else {
        out.push_str("## ❌ Commands failed\n");
    }

    let meta = &result.metadata;
    out.push_str(&format!(
        "\n**Summary**\n- Total commands: {}\n- Successful: {}\n- Processing time: {:.2} ms\n",
        meta.total_commands, meta.successful_commands, meta.processing_time_ms
    ));

    if !result.results.is_empty() {
        out.push_str("\n**Results**\n");
        for (i, r) in result.results.iter().enumerate() {
            let icon = if r.success { "✅" } else { "❌" };
            let line = match &r.error {
                Some(error) if !r.success => format!("{}. {} {} ({})\n", i + 1, icon, r.message, error),
                _ => format!("{}. {} {}\n", i + 1, icon, r.message),
            };
            out.push_str(&line);
        }
    }

    section(&mut out, "Errors", &result.errors);
    section(&mut out, "Warnings", &result.warnings);

    out
}

fn section(out: &mut String, title: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    out.push_str(&format!("\n**{}**\n", title));
    for line in lines {
        out.push_str(&format!("- {}\n", line));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wave_models::{
        CommandExecutionResult, CommandParameters, DispatchMetadata, ParsedCommand, WaveStart,
    };

    fn command() -> ParsedCommand {
        ParsedCommand::new(
            "start wave 3",
            "octocat",
            CommandParameters::WaveStart(WaveStart {
                wave: "3".to_string(),
                teams: Vec::new(),
            }),
            0.9,
        )
    }

    #[test]
    fn test_render_success() {
        let result = CommandDispatchResult {
            success: true,
            results: vec![
                CommandExecutionResult::succeeded(command(), "Started wave 3", Vec::new()),
                CommandExecutionResult::failed(command(), "Validation failed", "Unknown team: team-x"),
            ],
            errors: Vec::new(),
            warnings: vec!["Task 9 is not in the loaded task list".to_string()],
            metadata: DispatchMetadata {
                total_commands: 2,
                successful_commands: 1,
                processing_time_ms: 1.5,
            },
        };

        let text = render_response(&result);
        assert!(text.starts_with("## ✅ Commands processed"));
        assert!(text.contains("- Total commands: 2"));
        assert!(text.contains("- Successful: 1"));
        assert!(text.contains("- Processing time: 1.50 ms"));
        assert!(text.contains("1. ✅ Started wave 3"));
        assert!(text.contains("2. ❌ Validation failed (Unknown team: team-x)"));
        assert!(text.contains("**Warnings**\n- Task 9 is not in the loaded task list"));
        assert!(!text.contains("**Errors**"));
    }

    #[test]
    fn test_render_failure_without_results() {
        let result = CommandDispatchResult::failed(vec!["Empty command input".to_string()], Vec::new(), 0.0);

        let text = render_response(&result);
        assert!(text.starts_with("## ❌ Commands failed"));
        assert!(!text.contains("**Results**"));
        assert!(text.contains("**Errors**\n- Empty command input"));
        assert!(!text.contains("**Warnings**"));
    }
}
