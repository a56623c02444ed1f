use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Context;
use budget_shogi::Action;

/// Reads a script of actions, one JSON object per line. The path `-` means
/// standard input.
pub fn read_script(path: &Path) -> anyhow::Result<Vec<Action>> {
    if path == Path::new("-") {
        parse_script(std::io::stdin().lock())
    } else {
        let file = File::open(path)
            .with_context(|| format!("Could not open script '{}'", path.display()))?;
        parse_script(BufReader::new(file))
    }
}

/// Parses JSON-lines actions. Empty lines and lines starting with `#` are skipped.
pub fn parse_script(reader: impl BufRead) -> anyhow::Result<Vec<Action>> {
    let mut actions = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let action = serde_json::from_str(line)
            .with_context(|| format!("Line {} is not a valid action", idx + 1))?;
        actions.push(action);
    }
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use budget_shogi::Square;

    use super::*;

    #[test]
    fn skips_blank_lines_and_comments() {
        let script = "# opening\n\n{\"type\": \"confirm_design\"}\n  {\"type\": \"move\", \"from\": {\"row\": 6, \"col\": 0}, \"to\": {\"row\": 5, \"col\": 0}}\n";
        let actions = parse_script(script.as_bytes()).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::ConfirmDesign,
                Action::Move {
                    from: Square::new(6, 0),
                    to: Square::new(5, 0)
                }
            ]
        );
    }

    #[test]
    fn reports_the_broken_line() {
        let script = "{\"type\": \"confirm_design\"}\n{\"type\": \"castle\"}\n";
        let err = parse_script(script.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Line 2 is not a valid action");
    }
}
