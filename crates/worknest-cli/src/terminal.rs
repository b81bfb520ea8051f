use std::io::{self, BufRead, Write};

use tracing::info;

use worknest_client::PageHost;

/// Page side effects on a terminal: confirmations are asked on stdin,
/// alerts go to stderr, redirects are remembered for the caller to report.
pub struct TerminalHost {
    assume_yes: bool,
    pub redirected_to: Option<String>,
}

impl TerminalHost {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            redirected_to: None,
        }
    }
}

impl PageHost for TerminalHost {
    fn redirect(&mut self, path: &str) {
        info!("Redirect to {}", path);
        self.redirected_to = Some(path.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", message);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }

    fn alert(&mut self, message: &str) {
        eprintln!("! {}", message);
    }
}
