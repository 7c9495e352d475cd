use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  theme <text>          set the theme (required)
  style <id>            toggle a style on or off
  size <id>             choose the image size
  purpose <id>|none     choose a purpose, or clear it
  extra <text>          set the extra description (empty clears it)
  submit                generate an illustration
  refine <instruction>  rework the current result
  lookup <id>           show a stored generation
  history               show the refinement history of the current result
  save [path]           download the current image
  show                  redraw the form
  help                  show this help
  quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Theme(String),
    Style(String),
    Size(String),
    Purpose(Option<String>),
    Extra(String),
    Submit,
    Refine(String),
    Lookup(String),
    History,
    Save(Option<PathBuf>),
    Show,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let needs_arg = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("{} needs an argument", what))
        } else {
            Ok(rest.to_string())
        }
    };

    let command = match word.to_ascii_lowercase().as_str() {
        // Themes may be blank here; submit reports that.
        "theme" => Command::Theme(rest.to_string()),
        "style" => Command::Style(needs_arg("style")?),
        "size" => Command::Size(needs_arg("size")?),
        "purpose" => match rest {
            "" | "none" => Command::Purpose(None),
            id => Command::Purpose(Some(id.to_string())),
        },
        "extra" => Command::Extra(rest.to_string()),
        "submit" | "generate" => Command::Submit,
        "refine" => Command::Refine(rest.to_string()),
        "lookup" => Command::Lookup(needs_arg("lookup")?),
        "history" => Command::History,
        "save" => Command::Save((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {} (try `help`)", other)),
    };
    Ok(Some(command))
}
