use std::path::PathBuf;

/// What the user asked for: extra game arguments and whether to inject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchRequest {
    pub args: Vec<String>,
    pub modded: bool,
}

impl LaunchRequest {
    pub fn modded(args: Vec<String>) -> Self {
        Self { args, modded: true }
    }

    pub fn vanilla(args: Vec<String>) -> Self {
        Self {
            args,
            modded: false,
        }
    }
}

/// Fully resolved launch, ready for a `ProcessCreator`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub executable: PathBuf,
    pub args: Vec<String>,
    /// `None` inherits the launcher's working directory.
    pub working_dir: Option<PathBuf>,
    /// Module injected before the entry point runs.
    pub inject: Option<PathBuf>,
}

impl LaunchPlan {
    /// The command line as the OS sees it, for diagnostics and for
    /// `CreateProcessW`.
    pub fn command_line(&self) -> String {
        build_command_line(&self.executable.to_string_lossy(), &self.args)
    }
}

pub fn build_command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(quote_windows_arg)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Quote one token following the MSVC `CommandLineToArgvW` rules.
pub fn quote_windows_arg(raw: &str) -> String {
    let needs_quotes =
        raw.is_empty() || raw.chars().any(|ch| matches!(ch, ' ' | '\t' | '\n' | '\x0b' | '"'));
    if !needs_quotes {
        return raw.to_string();
    }

    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');

    let mut backslashes = 0usize;
    for ch in raw.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                // Escape the run of backslashes and the quote itself
                quoted.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                quoted.push('"');
                backslashes = 0;
            }
            _ => {
                quoted.extend(std::iter::repeat('\\').take(backslashes));
                quoted.push(ch);
                backslashes = 0;
            }
        }
    }

    // Trailing backslashes precede the closing quote
    quoted.extend(std::iter::repeat('\\').take(backslashes * 2));
    quoted.push('"');
    quoted
}
